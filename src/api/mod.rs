//! Blocking client for the Google Maps Platform web services used by the crawl:
//! Geocoding, Places Nearby Search, Place Details and Place Photo.

pub mod details;
pub mod geocode;
pub mod nearby;
pub mod photo;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

use crate::config::{ApiConfig, DEFAULT_LANGUAGE, DEFAULT_PLACE_TYPE, PacingConfig};

pub use photo::{PhotoUrlBuilder, maps_place_url};

const USER_AGENT: &str = concat!("cafegrid/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("{endpoint} request failed: {source}")]
    Request {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned HTTP {status}")]
    HttpStatus {
        endpoint: &'static str,
        status: StatusCode,
    },

    #[error("failed to parse {endpoint} response: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned status {status}: {}", .message.as_deref().unwrap_or("no error message"))]
    Status {
        endpoint: &'static str,
        status: String,
        message: Option<String>,
    },

    #[error("no geocoding results for '{0}'")]
    NoResults(String),

    #[error("page token still not valid after {0} attempts")]
    PageTokenNotReady(u32),

    #[error("invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Places API client bound to one key, language and place type
///
/// Requests run one at a time. The client applies the page-token pauses from
/// `PacingConfig`; per-cell and per-place pauses belong to the crawl loop.
pub struct PlacesClient {
    http: Client,
    api_key: String,
    api: ApiConfig,
    pacing: PacingConfig,
    language: String,
    place_type: String,
}

impl PlacesClient {
    pub fn new(
        api_key: impl Into<String>,
        api: ApiConfig,
        pacing: PacingConfig,
    ) -> Result<Self, ApiError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(api.timeout())
            .build()
            .map_err(ApiError::Client)?;

        Ok(Self {
            http,
            api_key: api_key.into(),
            api,
            pacing,
            language: DEFAULT_LANGUAGE.to_string(),
            place_type: DEFAULT_PLACE_TYPE.to_string(),
        })
    }

    /// Language for names, addresses and opening hours in responses
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Nearby Search `type` filter
    pub fn with_place_type(mut self, place_type: impl Into<String>) -> Self {
        self.place_type = place_type.into();
        self
    }

    /// Builder for Place Photo URLs signed with this client's key
    pub fn photo_urls(&self, max_width: u32) -> Result<PhotoUrlBuilder, ApiError> {
        PhotoUrlBuilder::new(&self.api.photo_url, &self.api_key, max_width)
    }

    /// GET `url` with the key appended and decode the JSON body
    ///
    /// URLs are stripped from transport errors so the key never ends up in logs.
    fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let response = self
            .http
            .get(url)
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .map_err(|e| ApiError::Request {
                endpoint,
                source: e.without_url(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::HttpStatus { endpoint, status });
        }

        response.json().map_err(|e| ApiError::Decode {
            endpoint,
            source: e.without_url(),
        })
    }
}

/// Sleep unless the pause is zero
pub(crate) fn pause(duration: Duration) {
    if !duration.is_zero() {
        std::thread::sleep(duration);
    }
}
