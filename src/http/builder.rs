//! Turns an [`Endpoint`] into a [`TransportRequest`].

use log::debug;
use reqwest::Url;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};

use super::TransportRequest;
use crate::endpoint::Endpoint;
use crate::error::NetworkError;

/// Builds the request for one attempt.
///
/// `access_token` is only attached when the endpoint requires auth, so a
/// retry after a refresh must call this again to pick up the new token.
pub fn build_request(
    endpoint: &Endpoint,
    base_url: &str,
    access_token: &str,
) -> Result<TransportRequest, NetworkError> {
    let address = format!("{}{}", base_url.trim_end_matches('/'), endpoint.path);
    let mut url = Url::parse(&address).map_err(|e| {
        debug!("Rejecting malformed address {}: {}", address, e);
        NetworkError::InvalidRequest
    })?;

    if !endpoint.query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in &endpoint.query {
            pairs.append_pair(key, value);
        }
    }

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    if endpoint.requires_auth {
        let mut auth_value = HeaderValue::from_str(&format!("Bearer {}", access_token))
            .map_err(|_| NetworkError::InvalidRequest)?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);
    }

    Ok(TransportRequest {
        url,
        method: endpoint.method,
        headers,
        body: endpoint.body.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::HttpMethod;

    const BASE: &str = "http://127.0.0.1:8080";

    #[test]
    fn test_no_authorization_header_without_auth() {
        let endpoint = Endpoint::new(HttpMethod::Get, "/persons");
        let request = build_request(&endpoint, BASE, "secret").unwrap();

        assert!(!request.headers.contains_key(AUTHORIZATION));
        assert_eq!(request.headers[CONTENT_TYPE], "application/json");
        assert_eq!(request.url.as_str(), "http://127.0.0.1:8080/persons");
        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.body, None);
    }

    #[test]
    fn test_bearer_header_with_auth() {
        let endpoint = Endpoint::new(HttpMethod::Delete, "/persons/4").with_auth(true);
        let request = build_request(&endpoint, BASE, "tok-1").unwrap();

        let auth = &request.headers[AUTHORIZATION];
        assert_eq!(auth, "Bearer tok-1");
        assert!(auth.is_sensitive());
        assert_eq!(request.headers[CONTENT_TYPE], "application/json");
    }

    #[test]
    fn test_empty_token_still_sends_bearer_prefix() {
        let endpoint = Endpoint::new(HttpMethod::Post, "/persons").with_auth(true);
        let request = build_request(&endpoint, BASE, "").unwrap();

        assert_eq!(request.headers[AUTHORIZATION], "Bearer ");
    }

    #[test]
    fn test_query_kept_in_supplied_order() {
        let endpoint = Endpoint::new(HttpMethod::Get, "/persons")
            .with_query("z", "1")
            .with_query("a", "2")
            .with_query("z", "3");
        let request = build_request(&endpoint, BASE, "").unwrap();

        assert_eq!(request.url.query(), Some("z=1&a=2&z=3"));
    }

    #[test]
    fn test_no_query_string_when_empty() {
        let endpoint = Endpoint::new(HttpMethod::Get, "/persons");
        let request = build_request(&endpoint, BASE, "").unwrap();

        assert_eq!(request.url.query(), None);
    }

    #[test]
    fn test_trailing_slash_on_base_is_ignored() {
        let endpoint = Endpoint::new(HttpMethod::Get, "/persons/1");
        let request = build_request(&endpoint, "http://localhost:9000/", "").unwrap();

        assert_eq!(request.url.as_str(), "http://localhost:9000/persons/1");
    }

    #[test]
    fn test_body_is_carried_over() {
        let endpoint = Endpoint::new(HttpMethod::Put, "/persons/1").with_body(b"{}".to_vec());
        let request = build_request(&endpoint, BASE, "").unwrap();

        assert_eq!(request.body, Some(b"{}".to_vec()));
    }

    #[test]
    fn test_malformed_address_is_invalid_request() {
        let endpoint = Endpoint::new(HttpMethod::Get, "/persons");

        let result = build_request(&endpoint, "not a url", "");
        assert_eq!(result.unwrap_err(), NetworkError::InvalidRequest);

        let result = build_request(&endpoint, "http://bad host", "");
        assert_eq!(result.unwrap_err(), NetworkError::InvalidRequest);
    }

    #[test]
    fn test_unrepresentable_token_is_invalid_request() {
        let endpoint = Endpoint::new(HttpMethod::Get, "/persons").with_auth(true);

        let result = build_request(&endpoint, BASE, "line\nbreak");
        assert_eq!(result.unwrap_err(), NetworkError::InvalidRequest);
    }
}
