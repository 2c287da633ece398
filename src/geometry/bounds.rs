use geo::{Rect, coord};

/// Axis-aligned lat/lng bounding box
///
/// Backed by a `geo::Rect` with x = longitude and y = latitude. Boxes that
/// cross the antimeridian are not supported.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    rect: Rect<f64>,
}

impl BoundingBox {
    /// Create a box from its south-west and north-east corners, each (lat, lng)
    pub fn from_corners(southwest: (f64, f64), northeast: (f64, f64)) -> Self {
        let (sw_lat, sw_lng) = southwest;
        let (ne_lat, ne_lng) = northeast;
        Self {
            rect: Rect::new(
                coord! { x: sw_lng, y: sw_lat },
                coord! { x: ne_lng, y: ne_lat },
            ),
        }
    }

    pub fn south(&self) -> f64 {
        self.rect.min().y
    }

    pub fn north(&self) -> f64 {
        self.rect.max().y
    }

    pub fn west(&self) -> f64 {
        self.rect.min().x
    }

    pub fn east(&self) -> f64 {
        self.rect.max().x
    }

    pub fn southwest(&self) -> (f64, f64) {
        (self.south(), self.west())
    }

    pub fn northeast(&self) -> (f64, f64) {
        (self.north(), self.east())
    }

    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        lat >= self.south() && lat <= self.north() && lng >= self.west() && lng <= self.east()
    }
}

/// Geocoded city extent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CityBounds {
    pub bounds: BoundingBox,
    /// Geocoded centre as (lat, lng); used as the grid's reference latitude
    pub center: (f64, f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_corners() {
        let bounds = BoundingBox::from_corners((24.0, 120.4), (24.4, 121.0));

        assert_eq!(bounds.south(), 24.0);
        assert_eq!(bounds.north(), 24.4);
        assert_eq!(bounds.west(), 120.4);
        assert_eq!(bounds.east(), 121.0);
    }

    #[test]
    fn test_swapped_corners_are_normalized() {
        let bounds = BoundingBox::from_corners((24.4, 121.0), (24.0, 120.4));
        assert_eq!(bounds.southwest(), (24.0, 120.4));
        assert_eq!(bounds.northeast(), (24.4, 121.0));
    }

    #[test]
    fn test_contains() {
        let bounds = BoundingBox::from_corners((24.0, 120.4), (24.4, 121.0));
        assert!(bounds.contains(24.2, 120.7));
        assert!(bounds.contains(24.0, 120.4));
        assert!(!bounds.contains(23.9, 120.7));
        assert!(!bounds.contains(24.2, 121.1));
    }
}
