use indicatif::ProgressBar;
use std::collections::HashSet;
use std::time::Duration;

use super::PlaceSource;
use crate::api::pause;
use crate::domain::{PlaceId, PlaceSummary, SearchCell};

/// Deduplicates search results by place id
///
/// Neighbouring cells overlap, so the same place comes back many times. The
/// first summary seen for an id is kept; order of arrival is preserved.
#[derive(Debug, Default)]
pub struct PlaceCollector {
    seen: HashSet<PlaceId>,
    places: Vec<(PlaceId, PlaceSummary)>,
}

impl PlaceCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one result. Returns false for duplicates and results without an id.
    pub fn insert(&mut self, summary: PlaceSummary) -> bool {
        let Some(id) = summary.place_id.clone() else {
            return false;
        };
        if !self.seen.insert(id.clone()) {
            return false;
        }
        self.places.push((id, summary));
        true
    }

    /// Add a batch of results, returning how many were new
    pub fn extend(&mut self, summaries: impl IntoIterator<Item = PlaceSummary>) -> usize {
        summaries
            .into_iter()
            .map(|s| self.insert(s))
            .filter(|&added| added)
            .count()
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    pub fn into_places(self) -> Vec<(PlaceId, PlaceSummary)> {
        self.places
    }
}

/// Outcome of searching every cell
#[derive(Debug)]
pub struct CollectReport {
    /// Unique places in first-seen order
    pub places: Vec<(PlaceId, PlaceSummary)>,
    /// Total results returned before deduplication
    pub total_results: usize,
    pub failed_cells: usize,
}

/// Search every cell and deduplicate the results
///
/// A cell whose search fails is logged and skipped. `cell_delay` is slept
/// after each cell; `progress` is advanced once per cell.
pub fn collect_places<S: PlaceSource>(
    source: &S,
    cells: &[SearchCell],
    cell_delay: Duration,
    progress: &ProgressBar,
) -> CollectReport {
    let mut collector = PlaceCollector::new();
    let mut total_results = 0;
    let mut failed_cells = 0;

    for cell in cells {
        match source.search_cell(cell) {
            Ok(results) => {
                total_results += results.len();
                let added = collector.extend(results);
                tracing::debug!(
                    lat = cell.lat,
                    lng = cell.lng,
                    added,
                    unique = collector.len(),
                    "Searched cell"
                );
            }
            Err(e) => {
                failed_cells += 1;
                progress.suspend(|| {
                    tracing::warn!("Skipping cell ({:.5}, {:.5}): {}", cell.lat, cell.lng, e);
                });
            }
        }

        progress.set_message(format!("{} unique", collector.len()));
        progress.inc(1);
        pause(cell_delay);
    }

    CollectReport {
        places: collector.into_places(),
        total_results,
        failed_cells,
    }
}
