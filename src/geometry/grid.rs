use thiserror::Error;

use super::bounds::BoundingBox;
use super::projection::{METERS_PER_DEGREE_LAT, METERS_PER_DEGREE_LNG};
use crate::domain::SearchCell;

/// Upper bound on cells in one grid
pub const MAX_CELLS: usize = 1_000_000;

#[derive(Debug, Error, PartialEq)]
pub enum GridError {
    #[error("search radius must be greater than zero")]
    ZeroRadius,

    #[error("overlap must be a positive finite number, got {0}")]
    InvalidOverlap(f64),

    #[error("reference latitude {0} is too close to a pole to tile by longitude")]
    PolarLatitude(f64),

    #[error("grid would need {rows} x {columns} cells, more than {max}; raise the radius or overlap", max = MAX_CELLS)]
    TooManyCells { rows: f64, columns: f64 },
}

/// Radius and spacing of the search grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpec {
    pub radius_m: u32,
    /// Step between adjacent centres as a fraction of the radius
    pub overlap: f64,
}

impl GridSpec {
    pub fn new(radius_m: u32, overlap: f64) -> Result<Self, GridError> {
        if radius_m == 0 {
            return Err(GridError::ZeroRadius);
        }
        if !overlap.is_finite() || overlap <= 0.0 {
            return Err(GridError::InvalidOverlap(overlap));
        }
        Ok(Self { radius_m, overlap })
    }

    /// Step between centres in meters
    pub fn step_m(&self) -> f64 {
        self.radius_m as f64 * self.overlap
    }

    /// (lat_step, lng_step) in degrees at the given latitude
    pub fn degree_steps(&self, at_lat: f64) -> Result<(f64, f64), GridError> {
        let (lat_step, lng_step) = degree_steps_for_radius(self.radius_m, at_lat)?;
        Ok((lat_step * self.overlap, lng_step * self.overlap))
    }
}

/// Convert a radius in meters to approximate degree spans (lat, lng)
pub fn degree_steps_for_radius(radius_m: u32, at_lat: f64) -> Result<(f64, f64), GridError> {
    let cos_lat = at_lat.to_radians().cos();
    if !cos_lat.is_finite() || cos_lat < 1e-6 {
        return Err(GridError::PolarLatitude(at_lat));
    }
    let radius = radius_m as f64;
    Ok((
        radius / METERS_PER_DEGREE_LAT,
        radius / (METERS_PER_DEGREE_LNG * cos_lat),
    ))
}

/// Search cells covering a bounding box
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub rows: usize,
    pub columns: usize,
    /// Row-major, south to north then west to east
    pub cells: Vec<SearchCell>,
}

impl Grid {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Tile `bounds` with overlapping circular search cells
///
/// Rows and columns start on the south-west corner and step by
/// `radius * overlap` until they would pass the north-east corner. Step sizes
/// in degrees are derived once at `reference_lat`, so the output depends only
/// on the inputs.
pub fn generate_grid(
    bounds: &BoundingBox,
    reference_lat: f64,
    spec: &GridSpec,
) -> Result<Grid, GridError> {
    let (lat_step, lng_step) = spec.degree_steps(reference_lat)?;

    let rows = axis_count(bounds.south(), bounds.north(), lat_step);
    let columns = axis_count(bounds.west(), bounds.east(), lng_step);
    let total = rows * columns;
    if total.is_nan() || total > MAX_CELLS as f64 {
        return Err(GridError::TooManyCells { rows, columns });
    }

    let lats = axis_points(bounds.south(), rows as usize, lat_step);
    let lngs = axis_points(bounds.west(), columns as usize, lng_step);

    let cells = lats
        .iter()
        .flat_map(|&lat| {
            lngs.iter()
                .map(move |&lng| SearchCell::new(lat, lng, spec.radius_m))
        })
        .collect();

    Ok(Grid {
        rows: lats.len(),
        columns: lngs.len(),
        cells,
    })
}

/// Number of points `start, start + step, ...` not exceeding `end`
///
/// Kept as `f64` so a huge count is caught before any cast. A small tolerance
/// keeps an edge landing exactly on a step.
fn axis_count(start: f64, end: f64, step: f64) -> f64 {
    let span = (end - start).max(0.0);
    (span / step + 1e-9).floor() + 1.0
}

/// `count` points from `start`, computed from the index instead of accumulated
fn axis_points(start: f64, count: usize, step: f64) -> Vec<f64> {
    (0..count).map(|i| start + i as f64 * step).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Projector;

    const CENTER: (f64, f64) = (24.15, 120.67);

    /// 2 km x 2 km box around CENTER
    fn two_km_box() -> BoundingBox {
        let half_lat = 1000.0 / METERS_PER_DEGREE_LAT;
        let half_lng = 1000.0 / (METERS_PER_DEGREE_LNG * CENTER.0.to_radians().cos());
        BoundingBox::from_corners(
            (CENTER.0 - half_lat, CENTER.1 - half_lng),
            (CENTER.0 + half_lat, CENTER.1 + half_lng),
        )
    }

    #[test]
    fn test_grid_spec_validation() {
        assert_eq!(GridSpec::new(0, 0.6), Err(GridError::ZeroRadius));
        assert_eq!(GridSpec::new(1000, 0.0), Err(GridError::InvalidOverlap(0.0)));
        assert_eq!(
            GridSpec::new(1000, -0.5),
            Err(GridError::InvalidOverlap(-0.5))
        );
        assert!(GridSpec::new(1000, f64::NAN).is_err());
        assert!(GridSpec::new(1000, 0.6).is_ok());
    }

    #[test]
    fn test_degree_steps() {
        let (lat_step, lng_step) = degree_steps_for_radius(1500, 24.15).unwrap();

        // 1.5 km / 110.574 km per degree
        assert!((lat_step - 0.013_565).abs() < 1e-5);
        // Longitude degrees are shorter away from the equator, so the step is wider
        assert!(lng_step > lat_step);
    }

    #[test]
    fn test_polar_latitude_rejected() {
        assert_eq!(
            degree_steps_for_radius(1000, 90.0),
            Err(GridError::PolarLatitude(90.0))
        );
    }

    #[test]
    fn test_two_km_box_is_four_by_four() {
        let spec = GridSpec::new(1000, 0.6).unwrap();
        let grid = generate_grid(&two_km_box(), CENTER.0, &spec).unwrap();

        // 2000 m / 600 m step = 3.33 -> 3 steps + origin
        assert_eq!(grid.rows, 4);
        assert_eq!(grid.columns, 4);
        assert_eq!(grid.len(), 16);
        assert!(grid.cells.iter().all(|c| c.radius_m == 1000));
    }

    #[test]
    fn test_grid_is_deterministic() {
        let spec = GridSpec::new(1000, 0.6).unwrap();
        let first = generate_grid(&two_km_box(), CENTER.0, &spec).unwrap();
        let second = generate_grid(&two_km_box(), CENTER.0, &spec).unwrap();
        assert_eq!(first, second);

        let bounds = two_km_box();
        assert_eq!(first.cells[0].lat, bounds.south());
        assert_eq!(first.cells[0].lng, bounds.west());
    }

    #[test]
    fn test_adjacent_spacing_matches_overlap() {
        let spec = GridSpec::new(1000, 0.6).unwrap();
        let grid = generate_grid(&two_km_box(), CENTER.0, &spec).unwrap();
        let proj = Projector::new(CENTER);

        for row in 0..grid.rows {
            for col in 0..grid.columns {
                let here = grid.cells[row * grid.columns + col];
                if col + 1 < grid.columns {
                    let east = grid.cells[row * grid.columns + col + 1];
                    let d = proj.distance_m((here.lat, here.lng), (east.lat, east.lng));
                    assert!((d - spec.step_m()).abs() < 1.0, "east spacing {d}");
                }
                if row + 1 < grid.rows {
                    let north = grid.cells[(row + 1) * grid.columns + col];
                    let d = proj.distance_m((here.lat, here.lng), (north.lat, north.lng));
                    assert!((d - spec.step_m()).abs() < 1.0, "north spacing {d}");
                }
            }
        }
    }

    #[test]
    fn test_cells_cover_the_box() {
        let bounds = two_km_box();
        let spec = GridSpec::new(1000, 0.6).unwrap();
        let grid = generate_grid(&bounds, CENTER.0, &spec).unwrap();
        let proj = Projector::new(CENTER);

        let samples = 20;
        for i in 0..=samples {
            for j in 0..=samples {
                let lat = bounds.south() + (bounds.north() - bounds.south()) * i as f64 / samples as f64;
                let lng = bounds.west() + (bounds.east() - bounds.west()) * j as f64 / samples as f64;
                let nearest = grid
                    .cells
                    .iter()
                    .map(|c| proj.distance_m((lat, lng), (c.lat, c.lng)))
                    .fold(f64::MAX, f64::min);
                assert!(
                    nearest <= spec.radius_m as f64,
                    "({lat}, {lng}) is {nearest}m from the nearest centre"
                );
            }
        }
    }

    #[test]
    fn test_all_cells_inside_box() {
        let bounds = two_km_box();
        let spec = GridSpec::new(300, 0.6).unwrap();
        let grid = generate_grid(&bounds, CENTER.0, &spec).unwrap();

        assert!(grid.len() > 16);
        assert!(grid.cells.iter().all(|c| bounds.contains(c.lat, c.lng)));
    }

    #[test]
    fn test_degenerate_box_yields_single_cell() {
        let bounds = BoundingBox::from_corners(CENTER, CENTER);
        let spec = GridSpec::new(1500, 0.6).unwrap();
        let grid = generate_grid(&bounds, CENTER.0, &spec).unwrap();

        assert_eq!(grid.len(), 1);
        assert_eq!((grid.cells[0].lat, grid.cells[0].lng), CENTER);
    }

    #[test]
    fn test_edge_on_exact_step_is_kept() {
        assert_eq!(axis_count(0.0, 0.3, 0.1), 4.0);
        assert_eq!(axis_points(0.0, 4, 0.1).len(), 4);
    }

    #[test]
    fn test_tiny_overlap_is_rejected_not_allocated() {
        let taichung = BoundingBox::from_corners((23.99, 120.46), (24.44, 121.45));

        for overlap in [1e-300, 1e-6] {
            let spec = GridSpec::new(1500, overlap).unwrap();
            let err = generate_grid(&taichung, 24.1477, &spec).unwrap_err();
            assert!(
                matches!(err, GridError::TooManyCells { .. }),
                "overlap {overlap}: {err:?}"
            );
        }
    }

    #[test]
    fn test_city_sized_grid_is_within_limit() {
        let taichung = BoundingBox::from_corners((23.99, 120.46), (24.44, 121.45));
        let spec = GridSpec::new(1500, 0.6).unwrap();
        let grid = generate_grid(&taichung, 24.1477, &spec).unwrap();

        assert_eq!(grid.len(), grid.rows * grid.columns);
        assert!(grid.len() < MAX_CELLS);
    }
}
