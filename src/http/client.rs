//! reqwest-backed [`Transport`].

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Method};

use super::{Transport, TransportFailure, TransportRequest, TransportResponse};
use crate::endpoint::HttpMethod;

impl From<HttpMethod> for Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }
}

/// Sends [`TransportRequest`]s with a shared reqwest `Client`.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[tracing::instrument(skip(self, request))]
    async fn send(
        &self,
        request: TransportRequest,
    ) -> Result<TransportResponse, TransportFailure> {
        let TransportRequest {
            url,
            method,
            headers,
            body,
        } = request;

        debug!("{} {}...", method, url);

        let mut builder = self
            .client
            .request(method.into(), url.clone())
            .headers(headers);
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(failure_from)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(failure_from)?.to_vec();

        Ok(TransportResponse {
            status,
            body,
            method,
            url,
        })
    }
}

fn failure_from(error: reqwest::Error) -> TransportFailure {
    if error.is_timeout() {
        TransportFailure::TimedOut
    } else if error.is_connect() {
        TransportFailure::NoConnectivity
    } else {
        TransportFailure::Other(error.to_string())
    }
}
