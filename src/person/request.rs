use crate::endpoint::{ApiRequest, HttpMethod, json_body, paths};
use crate::error::NetworkError;

use super::PersonDto;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonRequest {
    GetPersons,
    GetPerson { id: i64 },
    CreatePerson(PersonDto),
    UpdatePerson { id: i64, body: PersonDto },
    DeletePerson { id: i64 },
    GrantAdmin { id: i64 },
}

impl ApiRequest for PersonRequest {
    fn path(&self) -> String {
        match self {
            PersonRequest::GetPersons => paths::PERSONS.to_string(),
            PersonRequest::GetPerson { id } => paths::person(*id),
            PersonRequest::CreatePerson(_) => paths::PERSONS.to_string(),
            PersonRequest::UpdatePerson { id, .. } => paths::person(*id),
            PersonRequest::DeletePerson { id } => paths::person(*id),
            PersonRequest::GrantAdmin { id } => paths::grant_admin(*id),
        }
    }

    fn method(&self) -> HttpMethod {
        match self {
            PersonRequest::GetPersons => HttpMethod::Get,
            PersonRequest::GetPerson { .. } => HttpMethod::Get,
            PersonRequest::CreatePerson(_) => HttpMethod::Post,
            PersonRequest::UpdatePerson { .. } => HttpMethod::Put,
            PersonRequest::DeletePerson { .. } => HttpMethod::Delete,
            PersonRequest::GrantAdmin { .. } => HttpMethod::Get,
        }
    }

    fn requires_auth(&self) -> bool {
        match self {
            PersonRequest::GetPersons | PersonRequest::GetPerson { .. } => false,
            PersonRequest::CreatePerson(_)
            | PersonRequest::UpdatePerson { .. }
            | PersonRequest::DeletePerson { .. }
            | PersonRequest::GrantAdmin { .. } => true,
        }
    }

    fn body(&self) -> Result<Option<Vec<u8>>, NetworkError> {
        match self {
            PersonRequest::CreatePerson(body) => json_body(body),
            PersonRequest::UpdatePerson { body, .. } => json_body(body),
            PersonRequest::GetPersons
            | PersonRequest::GetPerson { .. }
            | PersonRequest::DeletePerson { .. }
            | PersonRequest::GrantAdmin { .. } => Ok(None),
        }
    }
}
