//! Declarative endpoint descriptors.
//!
//! An [`Endpoint`] describes one API call: path, method, query, body and
//! whether the access token must be attached. Concrete APIs are closed enums
//! implementing [`ApiRequest`], one variant per call.

pub mod paths;

use serde::Serialize;
use std::fmt;

use crate::error::NetworkError;

/// HTTP methods supported by descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable description of a single API call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub path: String,
    pub method: HttpMethod,
    pub query: Vec<(String, String)>,
    pub requires_auth: bool,
    pub body: Option<Vec<u8>>,
}

impl Endpoint {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method,
            query: Vec::new(),
            requires_auth: false,
            body: None,
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn with_auth(mut self, requires_auth: bool) -> Self {
        self.requires_auth = requires_auth;
        self
    }

    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }
}

/// A closed set of API calls that can each be described as an [`Endpoint`].
///
/// Implementors are enums; every method is an exhaustive `match` over the
/// variants so adding a call forces every property to be decided.
pub trait ApiRequest {
    fn path(&self) -> String;

    fn method(&self) -> HttpMethod;

    fn requires_auth(&self) -> bool;

    fn query(&self) -> Vec<(String, String)> {
        Vec::new()
    }

    fn body(&self) -> Result<Option<Vec<u8>>, NetworkError> {
        Ok(None)
    }

    /// Builds a fresh descriptor for this call.
    fn endpoint(&self) -> Result<Endpoint, NetworkError> {
        Ok(Endpoint {
            path: self.path(),
            method: self.method(),
            query: self.query(),
            requires_auth: self.requires_auth(),
            body: self.body()?,
        })
    }
}

/// Serializes a request body as JSON.
pub fn json_body<T: Serialize>(value: &T) -> Result<Option<Vec<u8>>, NetworkError> {
    serde_json::to_vec(value)
        .map(Some)
        .map_err(|_| NetworkError::InvalidRequest)
}
