//! Server paths.

pub const PERSONS: &str = "/persons";

pub fn person(id: i64) -> String {
    format!("{}/{}", PERSONS, id)
}

pub fn grant_admin(id: i64) -> String {
    format!("{}/{}/grantAdmin", PERSONS, id)
}

/// The token is percent-encoded so it always stays a single path segment.
pub fn refresh_token(token: &str) -> String {
    format!("/refresh-token/{}", urlencoding::encode(token))
}
