use url::Url;

use super::ApiError;
use crate::domain::PlaceId;

const MAPS_PLACE_URL: &str = "https://www.google.com/maps/place/?q=place_id:";

/// Builds Place Photo URLs
///
/// The resulting URL answers with a redirect to the image, so it can be
/// opened directly. It embeds the API key.
#[derive(Debug, Clone)]
pub struct PhotoUrlBuilder {
    base: Url,
    api_key: String,
    max_width: u32,
}

impl PhotoUrlBuilder {
    pub fn new(base: &str, api_key: &str, max_width: u32) -> Result<Self, ApiError> {
        Ok(Self {
            base: Url::parse(base)?,
            api_key: api_key.to_string(),
            max_width,
        })
    }

    pub fn build(&self, photo_reference: &str) -> String {
        let mut url = self.base.clone();
        url.query_pairs_mut()
            .append_pair("maxwidth", &self.max_width.to_string())
            .append_pair("photo_reference", photo_reference)
            .append_pair("key", &self.api_key);
        url.into()
    }
}

/// Portable Google Maps link for a place id
pub fn maps_place_url(place_id: &PlaceId) -> String {
    format!("{MAPS_PLACE_URL}{place_id}")
}
