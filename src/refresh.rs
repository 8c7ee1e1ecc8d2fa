//! Refresh-token exchange.
//!
//! Only one exchange runs at a time. Callers pass the generation they
//! observed before their failed attempt; if an exchange finished since then
//! they get its outcome instead of starting another one.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::credentials::{CredentialStore, mask};
use crate::endpoint::{ApiRequest, HttpMethod, paths};
use crate::error::NetworkError;
use crate::http::{Transport, dispatch};

/// Body returned by the refresh endpoint.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: Option<String>,
    pub refresh_token: Option<String>,
}

/// Calls that are not tied to a domain resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UtilsRequest {
    RefreshToken { token: String },
}

impl ApiRequest for UtilsRequest {
    fn path(&self) -> String {
        match self {
            UtilsRequest::RefreshToken { token } => paths::refresh_token(token),
        }
    }

    fn method(&self) -> HttpMethod {
        match self {
            UtilsRequest::RefreshToken { .. } => HttpMethod::Get,
        }
    }

    fn requires_auth(&self) -> bool {
        match self {
            UtilsRequest::RefreshToken { .. } => false,
        }
    }
}

pub struct RefreshCoordinator {
    transport: Arc<dyn Transport>,
    credentials: Arc<CredentialStore>,
    base_url: String,
    // Outcome of the most recent exchange; held for the whole exchange.
    last_outcome: Mutex<Result<(), NetworkError>>,
}

impl RefreshCoordinator {
    pub fn new(
        transport: Arc<dyn Transport>,
        credentials: Arc<CredentialStore>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            credentials,
            base_url: base_url.into(),
            last_outcome: Mutex::new(Ok(())),
        }
    }

    /// Number of exchanges completed so far.
    pub async fn generation(&self) -> u64 {
        self.credentials.generation().await
    }

    /// Refreshes the access token unless a refresh already completed after
    /// `seen_generation`.
    ///
    /// Dropping the future mid-exchange leaves the generation untouched, so
    /// the next caller runs a fresh exchange.
    #[tracing::instrument(skip(self))]
    pub async fn refresh(&self, seen_generation: u64) -> Result<(), NetworkError> {
        let mut last_outcome = self.last_outcome.lock().await;

        let current = self.credentials.generation().await;
        if current != seen_generation {
            debug!(
                "Refresh already done (generation {} -> {}), reusing its outcome",
                seen_generation, current
            );
            return *last_outcome;
        }

        let (outcome, access_token) = match self.exchange().await {
            Ok(access_token) => (Ok(()), access_token),
            Err(e) => (Err(e), Some(String::new())),
        };
        *last_outcome = outcome;
        self.credentials
            .complete_refresh(access_token.as_deref())
            .await;
        outcome
    }

    /// Returns the new access token, or `None` when there was nothing to
    /// exchange.
    async fn exchange(&self) -> Result<Option<String>, NetworkError> {
        let refresh_token = match self.credentials.refresh_token() {
            Ok(Some(token)) => token,
            Ok(None) => {
                warn!("No refresh token stored, continuing without refreshing");
                return Ok(None);
            }
            Err(e) => {
                warn!("Failed to read refresh token: {:#}", e);
                return self.fail();
            }
        };

        debug!("Exchanging refresh token {}", mask(&refresh_token));

        match self.request_tokens(&refresh_token).await {
            Ok(TokenResponse {
                token: Some(access_token),
                refresh_token: Some(new_refresh_token),
            }) => {
                if let Err(e) = self.credentials.set_refresh_token(&new_refresh_token) {
                    warn!("Failed to persist refresh token: {:#}", e);
                    return self.fail();
                }
                info!("Access token refreshed");
                Ok(Some(access_token))
            }
            Ok(_) => {
                warn!("Refresh response is missing a token");
                self.fail()
            }
            Err(e) => {
                warn!("Refresh request failed: {}", e);
                self.fail()
            }
        }
    }

    async fn request_tokens(&self, refresh_token: &str) -> Result<TokenResponse, NetworkError> {
        let endpoint = UtilsRequest::RefreshToken {
            token: refresh_token.to_string(),
        }
        .endpoint()?;

        let payload = dispatch(self.transport.as_ref(), &self.base_url, &endpoint, "").await?;

        serde_json::from_slice(&payload).map_err(|_| NetworkError::ParsingError)
    }

    // The access token is cleared by `refresh` together with the generation bump.
    fn fail(&self) -> Result<Option<String>, NetworkError> {
        if let Err(e) = self.credentials.set_refresh_token("") {
            warn!("Failed to clear stored refresh token: {:#}", e);
        }
        Err(NetworkError::RefreshTokenFailed)
    }
}
