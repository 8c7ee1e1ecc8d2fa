//! Request executor: build, send, classify, and on an expired token
//! refresh and retry up to a ceiling.

use log::{debug, warn};
use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::config::ClientConfig;
use crate::credentials::CredentialStore;
use crate::endpoint::Endpoint;
use crate::error::NetworkError;
use crate::http::{Transport, dispatch};
use crate::refresh::RefreshCoordinator;

pub struct NetworkService {
    transport: Arc<dyn Transport>,
    credentials: Arc<CredentialStore>,
    refresher: RefreshCoordinator,
    base_url: String,
    max_auth_retries: usize,
}

impl NetworkService {
    pub fn new(
        transport: Arc<dyn Transport>,
        credentials: Arc<CredentialStore>,
        config: &ClientConfig,
    ) -> Self {
        let refresher =
            RefreshCoordinator::new(transport.clone(), credentials.clone(), &config.base_url);
        Self {
            transport,
            credentials,
            refresher,
            base_url: config.base_url.clone(),
            max_auth_retries: config.max_auth_retries,
        }
    }

    pub fn credentials(&self) -> &Arc<CredentialStore> {
        &self.credentials
    }

    pub fn refresher(&self) -> &RefreshCoordinator {
        &self.refresher
    }

    /// Sends the request and decodes the JSON response into `T`.
    ///
    /// With `with_refresh`, a 401 triggers a token refresh and a rebuilt
    /// retry, at most `max_auth_retries` times.
    #[tracing::instrument(skip(self, endpoint), fields(method = %endpoint.method, path = %endpoint.path))]
    pub async fn send<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        with_refresh: bool,
    ) -> Result<T, NetworkError> {
        let payload = self.execute(endpoint, with_refresh).await?;
        serde_json::from_slice(&payload).map_err(|e| {
            debug!("Failed to decode response for {}: {}", endpoint.path, e);
            NetworkError::ParsingError
        })
    }

    /// Sends the request and only checks the status.
    #[tracing::instrument(skip(self, endpoint), fields(method = %endpoint.method, path = %endpoint.path))]
    pub async fn send_no_content(
        &self,
        endpoint: &Endpoint,
        with_refresh: bool,
    ) -> Result<(), NetworkError> {
        self.execute(endpoint, with_refresh).await.map(|_| ())
    }

    async fn execute(&self, endpoint: &Endpoint, with_refresh: bool) -> Result<Vec<u8>, NetworkError> {
        let mut retries = 0;

        loop {
            // One read, so the generation always matches the token being sent.
            let (generation, access_token) = self.credentials.snapshot().await;

            match dispatch(
                self.transport.as_ref(),
                &self.base_url,
                endpoint,
                &access_token,
            )
            .await
            {
                Ok(payload) => return Ok(payload),
                Err(NetworkError::Unauthorized) if with_refresh => {
                    if retries >= self.max_auth_retries {
                        warn!(
                            "{} {}: still unauthorized after {} refreshes, giving up",
                            endpoint.method, endpoint.path, retries
                        );
                        return Err(NetworkError::RefreshTokenFailed);
                    }

                    debug!(
                        "{} {}: unauthorized, refreshing token (retry {}/{})",
                        endpoint.method,
                        endpoint.path,
                        retries + 1,
                        self.max_auth_retries
                    );
                    self.refresher.refresh(generation).await?;
                    retries += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
