//! Typed error taxonomy for the request pipeline.

/// Every failure a call through [`crate::service::NetworkService`] can end in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetworkError {
    /// The descriptor could not be turned into a well-formed request.
    InvalidRequest,
    /// HTTP 400
    BadRequest,
    /// HTTP 401
    Unauthorized,
    /// HTTP 404
    NotFound,
    /// HTTP 409
    Conflict,
    /// HTTP 422
    FieldIncorrectlyFilled,
    /// HTTP 500 or 503
    InternalError,
    /// The refresh-token exchange failed or the retry ceiling was reached.
    RefreshTokenFailed,
    /// The transport reported no connectivity.
    NoInternet,
    /// The transport timed out.
    Timeout,
    /// A successful payload did not decode into the expected type.
    ParsingError,
    /// Any other status code or transport failure.
    Unknown,
}

impl NetworkError {
    /// Human readable description, suitable for showing to a user.
    pub fn description(&self) -> &'static str {
        match self {
            NetworkError::InvalidRequest => "Invalid request",
            NetworkError::BadRequest => "Bad request",
            NetworkError::Unauthorized => "Unauthorized access",
            NetworkError::NotFound => "Resource not found",
            NetworkError::Conflict => "Conflict in the request",
            NetworkError::FieldIncorrectlyFilled => "One or more fields are incorrectly filled",
            NetworkError::InternalError => "Internal server error",
            NetworkError::RefreshTokenFailed => "Failed to refresh the token",
            NetworkError::NoInternet => "No internet connection",
            NetworkError::Timeout => "Request timed out",
            NetworkError::ParsingError => "Failed to parse the response",
            NetworkError::Unknown => "Unknown error",
        }
    }
}

impl std::fmt::Display for NetworkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

impl std::error::Error for NetworkError {}
