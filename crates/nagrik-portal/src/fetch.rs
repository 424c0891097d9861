use crate::api::normalize_api_response;
use crate::html::parse_schemes_from_html;
use crate::transport::{ACCEPT_HTML, ACCEPT_JSON, Transport, TransportResponse};
use crate::{Error, Result};
use nagrik_core::config::PortalConfig;
use nagrik_core::schemes::{Scheme, SchemeSource};
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    pub schemes: Vec<Scheme>,
    pub source: SchemeSource,
}

impl FetchOutcome {
    pub fn empty() -> Self {
        Self {
            schemes: Vec::new(),
            source: SchemeSource::Fallback,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }
}

async fn get_ok(transport: &dyn Transport, url: &str, accept: &str) -> Result<TransportResponse> {
    let response = transport.get(url, accept).await?;
    if !response.is_success() {
        return Err(Error::Status {
            url: url.to_string(),
            status: response.status,
        });
    }
    Ok(response)
}

async fn try_api(transport: &dyn Transport, url: &str) -> Result<Vec<Scheme>> {
    let response = get_ok(transport, url, ACCEPT_JSON).await?;
    let data: Value = serde_json::from_str(&response.body)?;
    Ok(normalize_api_response(&data))
}

async fn try_html(transport: &dyn Transport, url: &str, config: &PortalConfig) -> Result<Vec<Scheme>> {
    let response = get_ok(transport, url, ACCEPT_HTML).await?;
    Ok(parse_schemes_from_html(
        &response.body,
        &config.base_url,
        config.max_html_entries,
    ))
}

/// Runs the strategies in order and returns the first non-empty list.
///
/// Individual strategy failures are logged and skipped. Only an unparseable `base_url` is an
/// error; when every strategy comes back empty the outcome is empty with source
/// [`SchemeSource::Fallback`].
pub async fn fetch_schemes(transport: &dyn Transport, config: &PortalConfig) -> Result<FetchOutcome> {
    Url::parse(&config.base_url)?;

    for path in &config.api_paths {
        let url = config.url_for(path);
        match try_api(transport, &url).await {
            Ok(schemes) if !schemes.is_empty() => {
                info!(%url, count = schemes.len(), "schemes from portal API");
                return Ok(FetchOutcome {
                    schemes,
                    source: SchemeSource::PortalApi,
                });
            }
            Ok(_) => debug!(%url, "API endpoint returned no schemes"),
            Err(err) => debug!(%url, error = %err, "API endpoint unusable"),
        }
    }

    for path in &config.html_paths {
        let url = config.url_for(path);
        match try_html(transport, &url, config).await {
            Ok(schemes) if !schemes.is_empty() => {
                info!(%url, count = schemes.len(), "schemes scraped from portal page");
                return Ok(FetchOutcome {
                    schemes,
                    source: SchemeSource::PortalHtml,
                });
            }
            Ok(_) => debug!(%url, "page had no recognisable schemes"),
            Err(err) => debug!(%url, error = %err, "page unusable"),
        }
    }

    warn!(base_url = %config.base_url, "no portal strategy produced schemes");
    Ok(FetchOutcome::empty())
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Canned responses keyed by URL; unknown URLs fail like a dropped connection.
    #[derive(Default)]
    pub struct FakeTransport {
        pub responses: HashMap<String, TransportResponse>,
        pub requests: Mutex<Vec<(String, String)>>,
    }

    impl FakeTransport {
        pub fn with(mut self, url: &str, status: u16, body: &str) -> Self {
            self.responses.insert(
                url.to_string(),
                TransportResponse {
                    status,
                    body: body.to_string(),
                },
            );
            self
        }

        pub fn requested(&self) -> Vec<String> {
            self.requests
                .lock()
                .unwrap()
                .iter()
                .map(|(url, _)| url.clone())
                .collect()
        }
    }

    #[async_trait]
    impl Transport for FakeTransport {
        async fn get(&self, url: &str, accept: &str) -> Result<TransportResponse> {
            self.requests
                .lock()
                .unwrap()
                .push((url.to_string(), accept.to_string()));
            self.responses
                .get(url)
                .cloned()
                .ok_or_else(|| Error::Transport(format!("connection refused: {url}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FakeTransport;
    use super::*;
    use futures::executor::block_on;

    const BASE: &str = "https://www.myscheme.gov.in";

    #[test]
    fn first_non_empty_api_wins() {
        let transport = FakeTransport::default()
            .with(&format!("{BASE}/api/schemes"), 404, "")
            .with(&format!("{BASE}/api/v1/schemes"), 200, "<html>not json</html>")
            .with(&format!("{BASE}/api/scheme/list"), 200, r#"{"data": []}"#)
            .with(
                &format!("{BASE}/api/search/schemes"),
                200,
                r#"{"schemes": [{"name": "Ayushman Bharat"}]}"#,
            );
        let outcome = block_on(fetch_schemes(&transport, &PortalConfig::default())).unwrap();
        assert_eq!(outcome.source, SchemeSource::PortalApi);
        assert_eq!(outcome.schemes[0].name, "Ayushman Bharat");
        assert_eq!(transport.requested().len(), 4);
        let accepts = transport.requests.lock().unwrap();
        assert!(accepts.iter().all(|(_, accept)| accept == ACCEPT_JSON));
    }

    #[test]
    fn html_pages_follow_failed_api() {
        let transport = FakeTransport::default()
            .with(&format!("{BASE}/"), 200, "<p>welcome</p>")
            .with(
                &format!("{BASE}/schemes"),
                200,
                r#"<a href="/schemes/svanidhi">PM SVANidhi</a>"#,
            );
        let outcome = block_on(fetch_schemes(&transport, &PortalConfig::default())).unwrap();
        assert_eq!(outcome.source, SchemeSource::PortalHtml);
        assert_eq!(outcome.schemes.len(), 1);
        assert_eq!(
            transport.requested().last().map(String::as_str),
            Some("https://www.myscheme.gov.in/schemes")
        );
    }

    #[test]
    fn everything_failing_is_an_empty_fallback() {
        let transport = FakeTransport::default();
        let outcome = block_on(fetch_schemes(&transport, &PortalConfig::default())).unwrap();
        assert!(outcome.is_empty());
        assert_eq!(outcome.source, SchemeSource::Fallback);
        assert_eq!(transport.requested().len(), 7);
    }

    #[test]
    fn bad_base_url_is_an_error() {
        let config = PortalConfig {
            base_url: "not a url".to_string(),
            ..PortalConfig::default()
        };
        let transport = FakeTransport::default();
        assert!(matches!(
            block_on(fetch_schemes(&transport, &config)),
            Err(Error::InvalidUrl(_))
        ));
        assert!(transport.requested().is_empty());
    }
}
