use serde::Deserialize;

use super::{ApiError, PlacesClient};
use crate::domain::{PlaceDetails, PlaceId};

const ENDPOINT: &str = "place details";

/// Field mask for Place Details; billing depends on it, so keep it minimal
pub const DETAIL_FIELDS: &[&str] = &[
    "place_id",
    "name",
    "formatted_address",
    "formatted_phone_number",
    "international_phone_number",
    "opening_hours/weekday_text",
    "rating",
    "types",
    "url",
    "photos",
];

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    status: String,
    #[serde(default)]
    result: Option<PlaceDetails>,
}

impl PlacesClient {
    /// Fetch details for one place
    ///
    /// `Ok(None)` when the API answers with a status other than OK (closed or
    /// unknown places); the caller then falls back to the search result.
    pub fn fetch_details(&self, place_id: &PlaceId) -> Result<Option<PlaceDetails>, ApiError> {
        let fields = DETAIL_FIELDS.join(",");

        let response: DetailsResponse = self.get_json(
            ENDPOINT,
            &self.api.details_url,
            &[
                ("place_id", place_id.as_str()),
                ("language", self.language.as_str()),
                ("fields", fields.as_str()),
            ],
        )?;

        if response.status != "OK" {
            tracing::debug!(%place_id, status = %response.status, "No details for place");
            return Ok(None);
        }

        Ok(response.result)
    }
}
