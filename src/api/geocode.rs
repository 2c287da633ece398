use serde::Deserialize;

use super::{ApiError, PlacesClient};
use crate::geometry::{BoundingBox, CityBounds};

const ENDPOINT: &str = "geocoding";

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
    #[serde(default)]
    bounds: Option<Viewport>,
    #[serde(default)]
    viewport: Option<Viewport>,
}

#[derive(Debug, Deserialize, Clone, Copy)]
struct Viewport {
    northeast: LatLng,
    southwest: LatLng,
}

#[derive(Debug, Deserialize, Clone, Copy)]
struct LatLng {
    lat: f64,
    lng: f64,
}

impl GeocodeResult {
    /// Prefer administrative `bounds`; some places only carry a `viewport`
    fn into_city_bounds(self) -> CityBounds {
        let geometry = self.geometry;
        let center = (geometry.location.lat, geometry.location.lng);

        let bounds = match geometry.bounds.or(geometry.viewport) {
            Some(b) => BoundingBox::from_corners(
                (b.southwest.lat, b.southwest.lng),
                (b.northeast.lat, b.northeast.lng),
            ),
            None => {
                tracing::warn!("Geocoding result has no bounds or viewport; using its location only");
                BoundingBox::from_corners(center, center)
            }
        };

        CityBounds { bounds, center }
    }
}

impl PlacesClient {
    /// Geocode a city name to its bounding box and centre
    ///
    /// `region` is a ccTLD-style bias such as `tw`; the first result wins.
    pub fn geocode_city_bounds(&self, city: &str, region: &str) -> Result<CityBounds, ApiError> {
        tracing::debug!(city, region, "Geocoding city");

        let response: GeocodeResponse = self.get_json(
            ENDPOINT,
            &self.api.geocode_url,
            &[
                ("address", city),
                ("language", self.language.as_str()),
                ("region", region),
            ],
        )?;

        match response.status.as_str() {
            "OK" => {}
            "ZERO_RESULTS" => return Err(ApiError::NoResults(city.to_string())),
            _ => {
                return Err(ApiError::Status {
                    endpoint: ENDPOINT,
                    status: response.status,
                    message: response.error_message,
                });
            }
        }

        response
            .results
            .into_iter()
            .next()
            .map(GeocodeResult::into_city_bounds)
            .ok_or_else(|| ApiError::NoResults(city.to_string()))
    }
}
