//! Maps transport outcomes onto [`NetworkError`].

#[cfg(debug_assertions)]
use log::debug;

use super::{TransportFailure, TransportResponse};
use crate::error::NetworkError;

impl From<TransportFailure> for NetworkError {
    fn from(failure: TransportFailure) -> Self {
        match failure {
            TransportFailure::NoConnectivity => NetworkError::NoInternet,
            TransportFailure::TimedOut => NetworkError::Timeout,
            TransportFailure::Other(_) => NetworkError::Unknown,
        }
    }
}

/// Returns the payload of a 2xx response, or the error its status maps to.
pub fn classify(response: TransportResponse) -> Result<Vec<u8>, NetworkError> {
    #[cfg(debug_assertions)]
    debug!(
        "{} | {} -> {}",
        response.method, response.status, response.url
    );

    match response.status {
        200..=299 => Ok(response.body),
        400 => Err(NetworkError::BadRequest),
        401 => Err(NetworkError::Unauthorized),
        404 => Err(NetworkError::NotFound),
        409 => Err(NetworkError::Conflict),
        422 => Err(NetworkError::FieldIncorrectlyFilled),
        500 | 503 => Err(NetworkError::InternalError),
        _ => Err(NetworkError::Unknown),
    }
}

/// Classifies either side of a transport attempt.
pub fn classify_result(
    result: Result<TransportResponse, TransportFailure>,
) -> Result<Vec<u8>, NetworkError> {
    classify(result?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::HttpMethod;
    use reqwest::Url;

    fn response(status: u16, body: &[u8]) -> TransportResponse {
        TransportResponse {
            status,
            body: body.to_vec(),
            method: HttpMethod::Get,
            url: Url::parse("http://127.0.0.1:8080/persons").unwrap(),
        }
    }

    #[test]
    fn test_success_range_returns_body_unchanged() {
        let body = [0u8, 159, 146, 150, b'{', b'}'];
        for status in [200, 201, 204, 250, 299] {
            assert_eq!(classify(response(status, &body)).unwrap(), body.to_vec());
        }
    }

    #[test]
    fn test_error_statuses() {
        let cases = [
            (400, NetworkError::BadRequest),
            (401, NetworkError::Unauthorized),
            (404, NetworkError::NotFound),
            (409, NetworkError::Conflict),
            (422, NetworkError::FieldIncorrectlyFilled),
            (500, NetworkError::InternalError),
            (503, NetworkError::InternalError),
        ];
        for (status, expected) in cases {
            assert_eq!(classify(response(status, b"oops")), Err(expected), "{}", status);
        }
    }

    #[test]
    fn test_other_statuses_are_unknown() {
        for status in [100, 199, 300, 302, 403, 429, 501, 502, 504] {
            assert_eq!(
                classify(response(status, b"")),
                Err(NetworkError::Unknown),
                "{}",
                status
            );
        }
    }

    #[test]
    fn test_transport_failures() {
        assert_eq!(
            classify_result(Err(TransportFailure::NoConnectivity)),
            Err(NetworkError::NoInternet)
        );
        assert_eq!(
            classify_result(Err(TransportFailure::TimedOut)),
            Err(NetworkError::Timeout)
        );
        assert_eq!(
            classify_result(Err(TransportFailure::Other("tls".to_string()))),
            Err(NetworkError::Unknown)
        );
    }

    #[test]
    fn test_classify_result_passes_responses_through() {
        assert_eq!(classify_result(Ok(response(200, b"[]"))), Ok(b"[]".to_vec()));
        assert_eq!(
            classify_result(Ok(response(401, b""))),
            Err(NetworkError::Unauthorized)
        );
    }
}
