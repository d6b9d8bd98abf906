pub mod network;
pub mod search;
