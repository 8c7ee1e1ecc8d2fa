use log::{debug, info};
use std::sync::Arc;
use tokio::sync::watch;

use super::{PersonDto, PersonRequest};
use crate::endpoint::ApiRequest;
use crate::error::NetworkError;
use crate::service::NetworkService;

/// Progress of the last list load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoaderState {
    #[default]
    Idle,
    Loading,
    Success,
    Failed,
}

/// Local copy of the server's people, kept in sync by the CRUD calls.
///
/// Subscribers are notified whenever the collection changes. A failed call
/// leaves the collection untouched.
pub struct PersonRepository {
    service: Arc<NetworkService>,
    persons: watch::Sender<Vec<PersonDto>>,
    state: watch::Sender<LoaderState>,
}

impl PersonRepository {
    pub fn new(service: Arc<NetworkService>) -> Self {
        let (persons, _) = watch::channel(Vec::new());
        let (state, _) = watch::channel(LoaderState::Idle);
        Self {
            service,
            persons,
            state,
        }
    }

    pub fn persons(&self) -> Vec<PersonDto> {
        self.persons.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<PersonDto>> {
        self.persons.subscribe()
    }

    pub fn state(&self) -> LoaderState {
        *self.state.borrow()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<LoaderState> {
        self.state.subscribe()
    }

    #[tracing::instrument(skip(self))]
    pub async fn fetch_persons(&self) -> Result<Vec<PersonDto>, NetworkError> {
        let endpoint = PersonRequest::GetPersons.endpoint()?;
        self.state.send_replace(LoaderState::Loading);

        match self.service.send::<Vec<PersonDto>>(&endpoint, true).await {
            Ok(persons) => {
                debug!("Fetched {} persons", persons.len());
                self.persons.send_replace(persons.clone());
                self.state.send_replace(LoaderState::Success);
                Ok(persons)
            }
            Err(e) => {
                self.state.send_replace(LoaderState::Failed);
                Err(e)
            }
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn fetch_person(&self, id: i64) -> Result<PersonDto, NetworkError> {
        let endpoint = PersonRequest::GetPerson { id }.endpoint()?;
        self.service.send(&endpoint, true).await
    }

    #[tracing::instrument(skip(self, body))]
    pub async fn create_person(&self, body: PersonDto) -> Result<PersonDto, NetworkError> {
        let endpoint = PersonRequest::CreatePerson(body).endpoint()?;
        let person: PersonDto = self.service.send(&endpoint, true).await?;

        info!("Created person {:?}", person.id);
        self.persons.send_modify(|persons| persons.push(person.clone()));
        Ok(person)
    }

    #[tracing::instrument(skip(self, body))]
    pub async fn update_person(&self, id: i64, body: PersonDto) -> Result<PersonDto, NetworkError> {
        let endpoint = PersonRequest::UpdatePerson { id, body }.endpoint()?;
        let updated: PersonDto = self.service.send(&endpoint, true).await?;

        self.persons.send_if_modified(|persons| {
            match persons.iter_mut().find(|p| p.id == Some(id)) {
                Some(existing) => {
                    existing.first_name = updated.first_name.clone();
                    existing.last_name = updated.last_name.clone();
                    existing.age = updated.age;
                    true
                }
                None => false,
            }
        });
        Ok(updated)
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_person(&self, id: i64) -> Result<(), NetworkError> {
        let endpoint = PersonRequest::DeletePerson { id }.endpoint()?;
        self.service.send_no_content(&endpoint, true).await?;

        info!("Deleted person {}", id);
        self.persons.send_if_modified(|persons| {
            let before = persons.len();
            persons.retain(|p| p.id != Some(id));
            persons.len() != before
        });
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub async fn grant_admin(&self, id: i64) -> Result<(), NetworkError> {
        let endpoint = PersonRequest::GrantAdmin { id }.endpoint()?;
        self.service.send_no_content(&endpoint, true).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::credentials::{CredentialStore, MemorySecretStore};
    use crate::endpoint::HttpMethod;
    use crate::http::{
        MockTransport, Transport, TransportFailure, TransportRequest, TransportResponse,
    };
    use async_trait::async_trait;
    use tokio::sync::Notify;

    fn reply(req: TransportRequest, status: u16, body: &str) -> TransportResponse {
        TransportResponse {
            status,
            body: body.as_bytes().to_vec(),
            method: req.method,
            url: req.url,
        }
    }

    fn repository(transport: MockTransport) -> PersonRepository {
        let credentials = Arc::new(CredentialStore::new(Arc::new(MemorySecretStore::new())));
        let config = ClientConfig::with_base_url("http://127.0.0.1:8080");
        let service = NetworkService::new(Arc::new(transport), credentials, &config);
        PersonRepository::new(Arc::new(service))
    }

    fn person(id: i64, first: &str, age: i64) -> PersonDto {
        PersonDto {
            id: Some(id),
            first_name: Some(first.to_string()),
            last_name: Some("X".to_string()),
            age: Some(age),
        }
    }

    fn expect_list(transport: &mut MockTransport) {
        transport
            .expect_send()
            .withf(|req| req.method == HttpMethod::Get && req.url.path() == "/persons")
            .times(1)
            .returning(|req| {
                Ok(reply(
                    req,
                    200,
                    r#"[{"id":2,"firstName":"B","lastName":"X","age":20},{"id":1,"firstName":"A","lastName":"X","age":10}]"#,
                ))
            });
    }

    #[tokio::test]
    async fn test_fetch_persons_keeps_server_order() {
        let mut transport = MockTransport::new();
        expect_list(&mut transport);

        let repo = repository(transport);
        let mut changes = repo.subscribe();
        assert_eq!(repo.state(), LoaderState::Idle);

        let persons = repo.fetch_persons().await.unwrap();

        assert_eq!(persons, vec![person(2, "B", 20), person(1, "A", 10)]);
        assert_eq!(repo.persons(), persons);
        assert_eq!(repo.state(), LoaderState::Success);
        assert!(changes.has_changed().unwrap());
        assert_eq!(*changes.borrow_and_update(), persons);
    }

    /// Holds every request until the gate is opened.
    struct GatedTransport {
        gate: Arc<Notify>,
    }

    #[async_trait]
    impl Transport for GatedTransport {
        async fn send(
            &self,
            request: TransportRequest,
        ) -> Result<TransportResponse, TransportFailure> {
            self.gate.notified().await;
            Ok(reply(request, 200, r#"[{"id":1,"firstName":"A","lastName":"X","age":10}]"#))
        }
    }

    #[tokio::test]
    async fn test_state_subscribers_see_loading_then_success() {
        let gate = Arc::new(Notify::new());
        let credentials = Arc::new(CredentialStore::new(Arc::new(MemorySecretStore::new())));
        let config = ClientConfig::with_base_url("http://127.0.0.1:8080");
        let transport = Arc::new(GatedTransport { gate: gate.clone() });
        let repo = PersonRepository::new(Arc::new(NetworkService::new(
            transport,
            credentials,
            &config,
        )));

        let mut states = repo.subscribe_state();
        assert_eq!(*states.borrow(), LoaderState::Idle);

        let observe = async {
            states.changed().await.unwrap();
            assert_eq!(*states.borrow_and_update(), LoaderState::Loading);
            gate.notify_one();
            states.changed().await.unwrap();
            assert_eq!(*states.borrow_and_update(), LoaderState::Success);
        };
        let (fetched, ()) = tokio::join!(repo.fetch_persons(), observe);

        assert_eq!(fetched.unwrap(), vec![person(1, "A", 10)]);
        assert!(!states.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_fetch_persons_failure_sets_failed_state() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .times(1)
            .returning(|req| Ok(reply(req, 503, "")));

        let repo = repository(transport);
        assert_eq!(repo.fetch_persons().await, Err(NetworkError::InternalError));
        assert_eq!(repo.state(), LoaderState::Failed);
        assert!(repo.persons().is_empty());
    }

    #[tokio::test]
    async fn test_create_person_appends() {
        let mut transport = MockTransport::new();
        expect_list(&mut transport);
        transport
            .expect_send()
            .withf(|req| req.method == HttpMethod::Post)
            .times(1)
            .returning(|req| {
                Ok(reply(
                    req,
                    201,
                    r#"{"id":3,"firstName":"C","lastName":"X","age":30}"#,
                ))
            });

        let repo = repository(transport);
        repo.fetch_persons().await.unwrap();
        let created = repo
            .create_person(PersonDto::new("C", "X", 30))
            .await
            .unwrap();

        assert_eq!(created, person(3, "C", 30));
        assert_eq!(repo.persons().last(), Some(&created));
        assert_eq!(repo.persons().len(), 3);
    }

    #[tokio::test]
    async fn test_create_person_validation_error_leaves_collection() {
        let mut transport = MockTransport::new();
        expect_list(&mut transport);
        transport
            .expect_send()
            .withf(|req| req.method == HttpMethod::Post)
            .times(1)
            .returning(|req| Ok(reply(req, 422, "")));

        let repo = repository(transport);
        let before = repo.fetch_persons().await.unwrap();
        let changes = repo.subscribe();

        let result = repo.create_person(PersonDto::new("", "", -1)).await;

        assert_eq!(result, Err(NetworkError::FieldIncorrectlyFilled));
        assert_eq!(repo.persons(), before);
        assert!(!changes.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_update_person_replaces_fields() {
        let mut transport = MockTransport::new();
        expect_list(&mut transport);
        transport
            .expect_send()
            .withf(|req| req.method == HttpMethod::Put && req.url.path() == "/persons/1")
            .times(1)
            .returning(|req| {
                Ok(reply(
                    req,
                    200,
                    r#"{"id":1,"firstName":"Z","lastName":"Y","age":11}"#,
                ))
            });

        let repo = repository(transport);
        repo.fetch_persons().await.unwrap();
        repo.update_person(1, PersonDto::new("Z", "Y", 11))
            .await
            .unwrap();

        let persons = repo.persons();
        assert_eq!(persons[0], person(2, "B", 20));
        assert_eq!(
            persons[1],
            PersonDto {
                id: Some(1),
                first_name: Some("Z".to_string()),
                last_name: Some("Y".to_string()),
                age: Some(11),
            }
        );
    }

    #[tokio::test]
    async fn test_delete_person_removes() {
        let mut transport = MockTransport::new();
        expect_list(&mut transport);
        transport
            .expect_send()
            .withf(|req| req.method == HttpMethod::Delete && req.url.path() == "/persons/2")
            .times(1)
            .returning(|req| Ok(reply(req, 204, "")));

        let repo = repository(transport);
        repo.fetch_persons().await.unwrap();
        repo.delete_person(2).await.unwrap();

        assert_eq!(repo.persons(), vec![person(1, "A", 10)]);
    }

    #[tokio::test]
    async fn test_delete_person_not_found_leaves_collection() {
        let mut transport = MockTransport::new();
        expect_list(&mut transport);
        transport
            .expect_send()
            .withf(|req| req.method == HttpMethod::Delete)
            .times(1)
            .returning(|req| Ok(reply(req, 404, "")));

        let repo = repository(transport);
        repo.fetch_persons().await.unwrap();

        assert_eq!(repo.delete_person(9).await, Err(NetworkError::NotFound));
        assert_eq!(repo.persons().len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_person_and_grant_admin() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|req| req.url.path() == "/persons/1")
            .times(1)
            .returning(|req| {
                Ok(reply(
                    req,
                    200,
                    r#"{"id":1,"firstName":"A","lastName":"X","age":10}"#,
                ))
            });
        transport
            .expect_send()
            .withf(|req| req.url.path() == "/persons/1/grantAdmin")
            .times(1)
            .returning(|req| Ok(reply(req, 200, "")));

        let repo = repository(transport);
        assert_eq!(repo.fetch_person(1).await.unwrap(), person(1, "A", 10));
        repo.grant_admin(1).await.unwrap();
        assert!(repo.persons().is_empty());
    }
}
