pub mod bounds;
pub mod grid;
pub mod projection;

pub use bounds::{BoundingBox, CityBounds};
pub use grid::{Grid, GridError, GridSpec, generate_grid};
pub use projection::Projector;
