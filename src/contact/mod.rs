/// Mail transport used by the relay.
pub mod mailer;
/// Contact request validation and error mapping.
pub mod request;
/// Axum router for the relay endpoints.
pub mod server;
/// Relay settings read from the environment.
pub mod settings;
