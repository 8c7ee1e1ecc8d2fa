//! Example domain: people stored on the server.

mod repository;
mod request;

use serde::{Deserialize, Serialize};

pub use repository::{LoaderState, PersonRepository};
pub use request::PersonRequest;

/// A person as exchanged with the server. Absent fields are omitted on the wire.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "camelCase")]
pub struct PersonDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i64>,
}

impl PersonDto {
    pub fn new(first_name: &str, last_name: &str, age: i64) -> Self {
        Self {
            id: None,
            first_name: Some(first_name.to_string()),
            last_name: Some(last_name.to_string()),
            age: Some(age),
        }
    }
}
