#![forbid(unsafe_code)]

//! Scheme data from the myScheme portal, tried strategy by strategy.
//!
//! The portal documents no API, so every strategy is a guess: a list of JSON endpoints, then
//! HTML pages scraped with generic selectors and embedded JSON-LD. When all of them come back
//! empty the bundled sample schemes are served instead.

pub mod api;
pub mod fetch;
pub mod html;
pub mod service;
pub mod transport;

pub use fetch::{FetchOutcome, fetch_schemes};
pub use service::SchemeService;
pub use transport::{HttpTransport, Transport, TransportResponse};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },
    #[error("invalid portal URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("response is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Core(#[from] nagrik_core::Error),
    #[error("transport error: {0}")]
    Transport(String),
}

pub type Result<T> = std::result::Result<T, Error>;
