//! Credential state shared by every call.
//!
//! The access token lives in memory only. The refresh token is kept in a
//! [`SecretStore`] and read lazily whenever a refresh is attempted.

mod file;
mod memory;

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::RwLock;

pub use file::FileSecretStore;
pub use memory::MemorySecretStore;

/// Secret store key holding the persisted refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// Durable key/value storage for secrets, opaque to the request pipeline.
#[cfg_attr(test, mockall::automock)]
pub trait SecretStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

#[derive(Debug, Default)]
struct Session {
    access_token: String,
    // Refresh exchanges completed so far.
    generation: u64,
}

pub struct CredentialStore {
    session: RwLock<Session>,
    secrets: Arc<dyn SecretStore>,
}

impl CredentialStore {
    /// Starts unauthenticated: the access token is empty until a refresh succeeds.
    pub fn new(secrets: Arc<dyn SecretStore>) -> Self {
        Self {
            session: RwLock::new(Session::default()),
            secrets,
        }
    }

    pub async fn access_token(&self) -> String {
        self.session.read().await.access_token.clone()
    }

    pub async fn set_access_token(&self, token: &str) {
        self.session.write().await.access_token = token.to_string();
    }

    /// Number of refresh exchanges completed so far.
    pub async fn generation(&self) -> u64 {
        self.session.read().await.generation
    }

    /// The generation and the access token it produced, read together.
    pub async fn snapshot(&self) -> (u64, String) {
        let session = self.session.read().await;
        (session.generation, session.access_token.clone())
    }

    /// Closes a refresh exchange: installs `access_token` when given and
    /// bumps the generation under the same write lock.
    pub(crate) async fn complete_refresh(&self, access_token: Option<&str>) -> u64 {
        let mut session = self.session.write().await;
        if let Some(token) = access_token {
            session.access_token = token.to_string();
        }
        session.generation += 1;
        session.generation
    }

    /// Reads the persisted refresh token. Empty values count as absent.
    pub fn refresh_token(&self) -> Result<Option<String>> {
        Ok(self
            .secrets
            .get(REFRESH_TOKEN_KEY)?
            .filter(|token| !token.is_empty()))
    }

    pub fn set_refresh_token(&self, token: &str) -> Result<()> {
        self.secrets.set(REFRESH_TOKEN_KEY, token)
    }

    /// Clears both tokens back to the unauthenticated state.
    pub async fn reset(&self) -> Result<()> {
        self.set_access_token("").await;
        self.set_refresh_token("")
    }
}

/// Shortens a token for log output.
pub(crate) fn mask(token: &str) -> String {
    let prefix: String = token.chars().take(4).collect();
    format!("{}*********", prefix)
}
