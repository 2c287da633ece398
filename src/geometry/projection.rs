/// Meters per degree of latitude
pub const METERS_PER_DEGREE_LAT: f64 = 110_574.0;
/// Meters per degree of longitude at the equator; scale by cos(lat) elsewhere
pub const METERS_PER_DEGREE_LNG: f64 = 111_320.0;

/// Equirectangular projection from WGS84 to local meters
///
/// - x = (lng - center_lng) * cos(center_lat) * 111320
/// - y = (lat - center_lat) * 110574
///
/// Uses the same constants as grid tiling, so distances measured here agree
/// with the step sizes the grid was built from. Good enough at city scale.
#[derive(Debug, Clone)]
pub struct Projector {
    center_lat: f64,
    center_lng: f64,
    cos_lat: f64,
}

impl Projector {
    /// Create a new projector centered at (lat, lng)
    pub fn new(center: (f64, f64)) -> Self {
        let (lat, lng) = center;
        Self {
            center_lat: lat,
            center_lng: lng,
            cos_lat: lat.to_radians().cos(),
        }
    }

    /// Project a lat/lng point to (x, y) meters relative to the centre
    pub fn project(&self, lat: f64, lng: f64) -> (f64, f64) {
        let x = (lng - self.center_lng) * self.cos_lat * METERS_PER_DEGREE_LNG;
        let y = (lat - self.center_lat) * METERS_PER_DEGREE_LAT;
        (x, y)
    }

    /// Approximate distance in meters between two (lat, lng) points
    pub fn distance_m(&self, a: (f64, f64), b: (f64, f64)) -> f64 {
        let (ax, ay) = self.project(a.0, a.1);
        let (bx, by) = self.project(b.0, b.1);
        (ax - bx).hypot(ay - by)
    }
}
