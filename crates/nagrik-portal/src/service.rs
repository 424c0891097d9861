use crate::Result;
use crate::fetch::fetch_schemes;
use crate::transport::{HttpTransport, OfflineTransport, Transport};
use nagrik_core::config::PortalConfig;
use nagrik_core::schemes::{Scheme, SchemeSource, SchemesResponse, mock_schemes};
use std::sync::Arc;
use tracing::{error, info};

pub const API_MESSAGE: &str = "Schemes fetched from myScheme.gov.in API";
pub const HTML_MESSAGE: &str = "Schemes fetched from myScheme.gov.in";
pub const FALLBACK_MESSAGE: &str = "Using sample schemes. myScheme.gov.in data unavailable. Visit myScheme.gov.in for official scheme search.";
pub const ERROR_FALLBACK_MESSAGE: &str = "Using sample schemes due to temporary error. Visit myScheme.gov.in for official scheme search.";

/// Serves the scheme list: live portal data when any strategy yields some, the bundled sample
/// schemes otherwise. Always answers with `success: true`.
#[derive(Clone)]
pub struct SchemeService {
    transport: Arc<dyn Transport>,
    config: PortalConfig,
    fallback: Vec<Scheme>,
}

impl std::fmt::Debug for SchemeService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemeService")
            .field("config", &self.config)
            .field("fallback", &self.fallback.len())
            .finish_non_exhaustive()
    }
}

impl SchemeService {
    pub fn new(transport: Arc<dyn Transport>, config: PortalConfig) -> Result<Self> {
        Ok(Self {
            transport,
            config,
            fallback: mock_schemes()?,
        })
    }

    /// An HTTP-backed service, or an offline one when the portal is disabled.
    pub fn from_config(config: PortalConfig) -> Result<Self> {
        let transport: Arc<dyn Transport> = if config.enabled {
            Arc::new(HttpTransport::new(&config)?)
        } else {
            Arc::new(OfflineTransport)
        };
        Self::new(transport, config)
    }

    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    fn fallback_schemes(&self) -> Vec<Scheme> {
        self.fallback
            .iter()
            .cloned()
            .map(|mut s| {
                s.source_url = Some(self.config.base_url.clone());
                s
            })
            .collect()
    }

    fn fallback_response(&self, message: &str) -> SchemesResponse {
        SchemesResponse {
            success: true,
            schemes: self.fallback_schemes(),
            source: SchemeSource::Fallback,
            message: message.to_string(),
        }
    }

    /// The sample schemes without touching the network.
    pub fn offline_response(&self) -> SchemesResponse {
        self.fallback_response(FALLBACK_MESSAGE)
    }

    pub async fn respond(&self) -> SchemesResponse {
        if !self.config.enabled {
            info!("portal disabled; serving sample schemes");
            return self.offline_response();
        }
        match fetch_schemes(self.transport.as_ref(), &self.config).await {
            Ok(outcome) if !outcome.schemes.is_empty() => {
                let message = match outcome.source {
                    SchemeSource::PortalApi => API_MESSAGE,
                    _ => HTML_MESSAGE,
                };
                SchemesResponse {
                    success: true,
                    schemes: outcome.schemes,
                    source: outcome.source,
                    message: message.to_string(),
                }
            }
            Ok(_) => self.offline_response(),
            Err(err) => {
                error!(error = %err, "scheme fetch failed");
                self.fallback_response(ERROR_FALLBACK_MESSAGE)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::FakeTransport;
    use futures::executor::block_on;

    fn service(transport: FakeTransport, config: PortalConfig) -> SchemeService {
        SchemeService::new(Arc::new(transport), config).unwrap()
    }

    #[test]
    fn all_strategies_failing_serves_the_fallback() {
        let svc = service(FakeTransport::default(), PortalConfig::default());
        let response = block_on(svc.respond());
        assert!(response.success);
        assert_eq!(response.source, SchemeSource::Fallback);
        assert_eq!(response.message, FALLBACK_MESSAGE);
        assert_eq!(response.schemes.len(), 3);
        assert!(
            response
                .schemes
                .iter()
                .all(|s| s.source_url.as_deref() == Some("https://www.myscheme.gov.in"))
        );
    }

    #[test]
    fn live_sources_pick_their_message() {
        let api = FakeTransport::default().with(
            "https://www.myscheme.gov.in/api/schemes",
            200,
            r#"[{"name": "Sukanya Samriddhi"}]"#,
        );
        let response = block_on(service(api, PortalConfig::default()).respond());
        assert_eq!(response.source, SchemeSource::PortalApi);
        assert_eq!(response.message, API_MESSAGE);

        let html = FakeTransport::default().with(
            "https://www.myscheme.gov.in/find-schemes",
            200,
            r#"<div data-scheme-name="Jan Dhan Yojana"></div>"#,
        );
        let response = block_on(service(html, PortalConfig::default()).respond());
        assert_eq!(response.source, SchemeSource::PortalHtml);
        assert_eq!(response.message, HTML_MESSAGE);
        assert_eq!(response.schemes[0].name, "Jan Dhan Yojana");
    }

    #[test]
    fn fetch_errors_use_the_temporary_error_message() {
        let config = PortalConfig {
            base_url: "::".to_string(),
            ..PortalConfig::default()
        };
        let response = block_on(service(FakeTransport::default(), config).respond());
        assert_eq!(response.source, SchemeSource::Fallback);
        assert_eq!(response.message, ERROR_FALLBACK_MESSAGE);
        assert!(!response.schemes.is_empty());
    }

    #[test]
    fn disabled_portal_never_calls_the_transport() {
        let transport = Arc::new(FakeTransport::default());
        let config = PortalConfig {
            enabled: false,
            ..PortalConfig::default()
        };
        let svc = SchemeService::new(transport.clone(), config).unwrap();
        let response = block_on(svc.respond());
        assert_eq!(response.source, SchemeSource::Fallback);
        assert!(transport.requested().is_empty());
    }
}
