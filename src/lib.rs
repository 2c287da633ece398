//! cafegrid - Enumerate every cafe in a city with a grid of Google Places Nearby Searches

pub mod api;
pub mod config;
pub mod crawl;
pub mod domain;
pub mod geometry;
pub mod logging;
pub mod output;

pub use api::{ApiError, PlacesClient};
pub use crawl::{PlaceSource, collect_places, enrich_places};
pub use geometry::{GridSpec, generate_grid};
pub use output::write_csv;
