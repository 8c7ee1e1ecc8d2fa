use anyhow::Result;
use log::debug;
use reqwest::Client as HttpClient;
use std::sync::Arc;

use crate::credentials::{CredentialStore, SecretStore};
use crate::http::{ReqwestTransport, Transport};
use crate::service::NetworkService;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";

/// Refresh-triggered retries allowed per call.
pub const DEFAULT_MAX_AUTH_RETRIES: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub max_auth_retries: usize,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_auth_retries: DEFAULT_MAX_AUTH_RETRIES,
            user_agent: format!("netplate/{}", env!("NETPLATE_VERSION")),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

/// Everything needed to talk to the API, wired together.
pub struct Client {
    pub config: ClientConfig,
    pub credentials: Arc<CredentialStore>,
    pub service: Arc<NetworkService>,
}

impl Client {
    pub fn new(config: ClientConfig, secrets: Arc<dyn SecretStore>) -> Result<Self> {
        let http = HttpClient::builder()
            .user_agent(config.user_agent.as_str())
            .build()?;
        debug!("Using API at {}", config.base_url);

        let transport: Arc<dyn Transport> = Arc::new(ReqwestTransport::new(http));
        Ok(Self::with_transport(config, secrets, transport))
    }

    pub fn with_transport(
        config: ClientConfig,
        secrets: Arc<dyn SecretStore>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let credentials = Arc::new(CredentialStore::new(secrets));
        let service = Arc::new(NetworkService::new(
            transport,
            credentials.clone(),
            &config,
        ));

        Self {
            config,
            credentials,
            service,
        }
    }
}
