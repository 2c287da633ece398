//! Grid crawl: search every cell, keep each place once, then enrich it.

pub mod collect;
pub mod enrich;

use crate::api::{ApiError, PlacesClient};
use crate::domain::{PlaceDetails, PlaceId, PlaceSummary, SearchCell};

pub use collect::{CollectReport, PlaceCollector, collect_places};
pub use enrich::{EnrichReport, build_record, clean_types, enrich_places};

/// Where the crawl gets its data from
///
/// `PlacesClient` is the real implementation; tests substitute canned data.
pub trait PlaceSource {
    /// All search results for one cell, across pages
    fn search_cell(&self, cell: &SearchCell) -> Result<Vec<PlaceSummary>, ApiError>;

    /// Details for one place, `None` when the API has none to give
    fn place_details(&self, place_id: &PlaceId) -> Result<Option<PlaceDetails>, ApiError>;
}

impl PlaceSource for PlacesClient {
    fn search_cell(&self, cell: &SearchCell) -> Result<Vec<PlaceSummary>, ApiError> {
        self.nearby_search_all(cell)
    }

    fn place_details(&self, place_id: &PlaceId) -> Result<Option<PlaceDetails>, ApiError> {
        self.fetch_details(place_id)
    }
}
