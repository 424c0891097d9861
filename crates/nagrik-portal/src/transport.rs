use crate::{Error, Result};
use async_trait::async_trait;
use nagrik_core::config::PortalConfig;
use std::time::Duration;

pub const ACCEPT_JSON: &str = "application/json";
pub const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A GET-only HTTP seam, so the fetch strategies can run against canned responses.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str, accept: &str) -> Result<TransportResponse>;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// A client sending the configured browser user agent, with the configured timeout.
    pub fn new(config: &PortalConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_millis(config.timeout_ms))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str, accept: &str) -> Result<TransportResponse> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, accept)
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(TransportResponse { status, body })
    }
}

/// Fails every request; used when the portal is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineTransport;

#[async_trait]
impl Transport for OfflineTransport {
    async fn get(&self, url: &str, _accept: &str) -> Result<TransportResponse> {
        Err(Error::Transport(format!("offline: {url}")))
    }
}
