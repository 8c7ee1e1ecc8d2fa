pub mod config;
pub mod credentials;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod person;
pub mod refresh;
pub mod service;

pub use config::{Client, ClientConfig};
pub use error::NetworkError;
pub use service::NetworkService;
