use serde::Deserialize;

use super::{ApiError, PlacesClient, pause};
use crate::domain::{PlaceSummary, SearchCell};

const ENDPOINT: &str = "nearby search";

/// One page of Nearby Search results
#[derive(Debug, Deserialize)]
struct NearbyPage {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<PlaceSummary>,
    #[serde(default)]
    next_page_token: Option<String>,
}

impl PlacesClient {
    /// Run a Nearby Search for one cell, following page tokens
    ///
    /// Returns every result from up to `max_pages` pages (the platform serves
    /// at most 60 results per query). Follow-up pages are requested with the
    /// token alone, after the token delay. INVALID_REQUEST on a token request
    /// means the token is not active yet and is retried up to `token_retries`
    /// times.
    pub fn nearby_search_all(&self, cell: &SearchCell) -> Result<Vec<PlaceSummary>, ApiError> {
        let location = cell.location_param();
        let radius = cell.radius_m.to_string();
        let first_page = [
            ("location", location.as_str()),
            ("radius", radius.as_str()),
            ("type", self.place_type.as_str()),
            ("language", self.language.as_str()),
        ];

        let mut results = Vec::new();
        let mut token: Option<String> = None;
        let mut pages = 0u32;
        let mut not_ready = 0u32;

        loop {
            let page: NearbyPage = match &token {
                None => self.get_json(ENDPOINT, &self.api.nearby_url, &first_page)?,
                Some(t) => {
                    pause(self.pacing.page_token_delay());
                    self.get_json(ENDPOINT, &self.api.nearby_url, &[("pagetoken", t.as_str())])?
                }
            };

            match page.status.as_str() {
                "OK" | "ZERO_RESULTS" => {}
                "INVALID_REQUEST" if token.is_some() => {
                    not_ready += 1;
                    if not_ready > self.pacing.token_retries {
                        return Err(ApiError::PageTokenNotReady(not_ready));
                    }
                    tracing::debug!(attempt = not_ready, "Page token not ready yet");
                    continue;
                }
                _ => {
                    return Err(ApiError::Status {
                        endpoint: ENDPOINT,
                        status: page.status,
                        message: page.error_message,
                    });
                }
            }

            not_ready = 0;
            pages += 1;
            tracing::debug!(
                location = %location,
                page = pages,
                results = page.results.len(),
                "Nearby Search page"
            );
            results.extend(page.results);

            token = page.next_page_token.filter(|t| !t.is_empty());
            if token.is_none() || pages >= self.pacing.max_pages {
                break;
            }

            pause(self.pacing.page_delay());
        }

        Ok(results)
    }
}
