/// Normalized attribute values and the shared field lookup.
pub mod attribute;
/// Cell widgets built from formatted attribute values.
pub mod cell;
/// Record, Count and Boolean classification of result items.
pub mod classify;
/// HTTP client for the upstream Beacon API.
pub mod client;
/// Plain-text formatters for record attributes.
pub mod format;
/// Typed views over Beacon API responses.
pub mod response;
/// Results table and record detail composition.
pub mod table;
