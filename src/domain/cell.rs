/// One circular Nearby Search region
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchCell {
    /// Latitude of the centre in WGS84
    pub lat: f64,
    /// Longitude of the centre in WGS84
    pub lng: f64,
    /// Search radius in meters
    pub radius_m: u32,
}

impl SearchCell {
    pub fn new(lat: f64, lng: f64, radius_m: u32) -> Self {
        Self { lat, lng, radius_m }
    }

    /// `lat,lng` as the Places API expects it in the `location` parameter
    pub fn location_param(&self) -> String {
        format!("{},{}", self.lat, self.lng)
    }
}
