// newscast-api: Async Rust client for the newscast news and broadcast API

pub mod client;
pub mod decode;
pub mod error;
pub mod transport;
pub mod types;

pub use client::NewsClient;
pub use error::Error;
pub use transport::TransportConfig;
