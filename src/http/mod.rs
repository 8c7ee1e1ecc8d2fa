//! Transport boundary: request/response values, the [`Transport`] trait,
//! request building and response classification.

mod builder;
mod classify;
mod client;

use async_trait::async_trait;
use reqwest::Url;
use reqwest::header::HeaderMap;
use std::fmt;

use crate::endpoint::{Endpoint, HttpMethod};
use crate::error::NetworkError;

pub use builder::build_request;
pub use classify::{classify, classify_result};
pub use client::ReqwestTransport;

/// A concrete request for one attempt of a call.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub url: Url,
    pub method: HttpMethod,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

/// What came back from the server for one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
    pub method: HttpMethod,
    pub url: Url,
}

/// Failures raised before any HTTP status was received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportFailure {
    NoConnectivity,
    TimedOut,
    Other(String),
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportFailure::NoConnectivity => write!(f, "no connectivity"),
            TransportFailure::TimedOut => write!(f, "timed out"),
            TransportFailure::Other(msg) => write!(f, "transport error: {}", msg),
        }
    }
}

impl std::error::Error for TransportFailure {}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: TransportRequest)
    -> Result<TransportResponse, TransportFailure>;
}

/// One attempt: build, send and classify, with no retry.
pub async fn dispatch(
    transport: &dyn Transport,
    base_url: &str,
    endpoint: &Endpoint,
    access_token: &str,
) -> Result<Vec<u8>, NetworkError> {
    let request = build_request(endpoint, base_url, access_token)?;
    classify_result(transport.send(request).await)
}
