use serde::Deserialize;
use std::fmt;

/// Opaque place identifier issued by the Places API
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct PlaceId(String);

impl PlaceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Photo attached to a place; only the reference is needed to build a URL
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Photo {
    #[serde(default)]
    pub photo_reference: Option<String>,
}

/// A single Nearby Search result
///
/// Nearby Search does not return phone numbers or opening hours, so this is
/// only used to find places and as a fallback when details are missing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlaceSummary {
    #[serde(default)]
    pub place_id: Option<PlaceId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub vicinity: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub photos: Vec<Photo>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct OpeningHours {
    #[serde(default)]
    pub weekday_text: Vec<String>,
}

/// Place Details result, restricted to the requested field mask
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct PlaceDetails {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub formatted_phone_number: Option<String>,
    #[serde(default)]
    pub international_phone_number: Option<String>,
    #[serde(default)]
    pub opening_hours: Option<OpeningHours>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub types: Option<Vec<String>>,
    /// Google Maps page for the place
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub photos: Option<Vec<Photo>>,
}

/// One output row
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceRecord {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub opening_hours: Vec<String>,
    pub rating: Option<f64>,
    pub types: Vec<String>,
    pub photo_url: Option<String>,
    pub maps_url: String,
}
