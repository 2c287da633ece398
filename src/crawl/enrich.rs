use indicatif::ProgressBar;
use std::time::Duration;

use super::PlaceSource;
use crate::api::{PhotoUrlBuilder, maps_place_url, pause};
use crate::domain::{Photo, PlaceDetails, PlaceId, PlaceRecord, PlaceSummary};

/// Categories every cafe carries; they say nothing in the output
const GENERIC_TYPES: &[&str] = &["establishment", "point_of_interest", "food"];

/// Drop generic categories, keeping order
pub fn clean_types(types: &[String]) -> Vec<String> {
    types
        .iter()
        .filter(|t| !GENERIC_TYPES.iter().any(|g| *g == t.as_str()))
        .cloned()
        .collect()
}

/// Present and not blank; the platform sometimes sends `""` for a missing value
fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

fn first_photo_reference(photos: &[Photo]) -> Option<&str> {
    photos.first().and_then(|p| p.photo_reference.as_deref())
}

/// Merge details over the search summary into an output row
///
/// Each field prefers the details response and falls back to the summary,
/// then to empty. Empty strings count as missing. Pure apart from URL
/// formatting.
pub fn build_record(
    place_id: &PlaceId,
    summary: &PlaceSummary,
    details: Option<&PlaceDetails>,
    photos: &PhotoUrlBuilder,
) -> PlaceRecord {
    let empty = PlaceDetails::default();
    let d = details.unwrap_or(&empty);

    let name = non_empty(&d.name).or_else(|| non_empty(&summary.name));
    let address = non_empty(&d.formatted_address).or_else(|| non_empty(&summary.vicinity));
    let phone =
        non_empty(&d.formatted_phone_number).or_else(|| non_empty(&d.international_phone_number));
    let opening_hours = d
        .opening_hours
        .as_ref()
        .map(|oh| oh.weekday_text.clone())
        .unwrap_or_default();

    let types = match &d.types {
        Some(t) if !t.is_empty() => clean_types(t),
        _ => clean_types(&summary.types),
    };

    let photo_ref = match d.photos.as_deref() {
        Some(p) if !p.is_empty() => first_photo_reference(p),
        _ => first_photo_reference(&summary.photos),
    };

    PlaceRecord {
        name: name.unwrap_or_default(),
        address: address.unwrap_or_default(),
        phone: phone.unwrap_or_default(),
        opening_hours,
        rating: d.rating.or(summary.rating),
        types,
        photo_url: photo_ref.map(|r| photos.build(r)),
        maps_url: non_empty(&d.url).unwrap_or_else(|| maps_place_url(place_id)),
    }
}

/// Outcome of the details stage
#[derive(Debug)]
pub struct EnrichReport {
    pub records: Vec<PlaceRecord>,
    /// Places with no details (row built from the search result)
    pub without_details: usize,
    /// Places dropped because the lookup itself failed
    pub failed: usize,
}

/// Look up details for every unique place and build output rows
///
/// A lookup that fails outright is logged and the place is dropped, so the
/// number of records never exceeds the number of places.
pub fn enrich_places<S: PlaceSource>(
    source: &S,
    places: &[(PlaceId, PlaceSummary)],
    photos: &PhotoUrlBuilder,
    details_delay: Duration,
    progress: &ProgressBar,
) -> EnrichReport {
    let mut records = Vec::with_capacity(places.len());
    let mut without_details = 0;
    let mut failed = 0;

    for (place_id, summary) in places {
        match source.place_details(place_id) {
            Ok(details) => {
                if details.is_none() {
                    without_details += 1;
                }
                records.push(build_record(place_id, summary, details.as_ref(), photos));
            }
            Err(e) => {
                failed += 1;
                progress.suspend(|| {
                    tracing::warn!("Skipping place {}: {}", place_id, e);
                });
            }
        }

        progress.inc(1);
        pause(details_delay);
    }

    EnrichReport {
        records,
        without_details,
        failed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::domain::{OpeningHours, SearchCell};

    fn photos() -> PhotoUrlBuilder {
        PhotoUrlBuilder::new("https://example.test/photo", "KEY", 800).unwrap()
    }

    fn summary() -> PlaceSummary {
        PlaceSummary {
            place_id: Some(PlaceId::new("p1")),
            name: Some("Summary Name".to_string()),
            vicinity: Some("Summary Street".to_string()),
            rating: Some(4.1),
            types: vec!["cafe".into(), "food".into(), "point_of_interest".into()],
            photos: vec![Photo {
                photo_reference: Some("summary-ref".to_string()),
            }],
        }
    }

    fn details() -> PlaceDetails {
        PlaceDetails {
            name: Some("Detail Name".to_string()),
            formatted_address: Some("1 Detail Rd".to_string()),
            formatted_phone_number: None,
            international_phone_number: Some("+886 4 1234 5678".to_string()),
            opening_hours: Some(OpeningHours {
                weekday_text: vec!["Monday: 8AM-5PM".into(), "Tuesday: Closed".into()],
            }),
            rating: Some(4.6),
            types: Some(vec!["cafe".into(), "bakery".into(), "establishment".into()]),
            url: Some("https://maps.google.com/?cid=1".to_string()),
            photos: Some(vec![Photo {
                photo_reference: Some("detail-ref".to_string()),
            }]),
        }
    }

    #[test]
    fn test_clean_types() {
        let types = vec![
            "cafe".to_string(),
            "food".to_string(),
            "store".to_string(),
            "establishment".to_string(),
        ];
        assert_eq!(clean_types(&types), vec!["cafe", "store"]);
    }

    #[test]
    fn test_details_take_precedence() {
        let id = PlaceId::new("p1");
        let record = build_record(&id, &summary(), Some(&details()), &photos());

        assert_eq!(record.name, "Detail Name");
        assert_eq!(record.address, "1 Detail Rd");
        assert_eq!(record.phone, "+886 4 1234 5678");
        assert_eq!(record.opening_hours.len(), 2);
        assert_eq!(record.rating, Some(4.6));
        assert_eq!(record.types, vec!["cafe", "bakery"]);
        assert_eq!(
            record.photo_url.as_deref(),
            Some("https://example.test/photo?maxwidth=800&photo_reference=detail-ref&key=KEY")
        );
        assert_eq!(record.maps_url, "https://maps.google.com/?cid=1");
    }

    #[test]
    fn test_summary_fallback_without_details() {
        let id = PlaceId::new("p1");
        let record = build_record(&id, &summary(), None, &photos());

        assert_eq!(record.name, "Summary Name");
        assert_eq!(record.address, "Summary Street");
        assert_eq!(record.phone, "");
        assert!(record.opening_hours.is_empty());
        assert_eq!(record.rating, Some(4.1));
        assert_eq!(record.types, vec!["cafe"]);
        assert!(record.photo_url.unwrap().contains("summary-ref"));
        assert_eq!(
            record.maps_url,
            "https://www.google.com/maps/place/?q=place_id:p1"
        );
    }

    #[test]
    fn test_empty_everything() {
        let id = PlaceId::new("bare");
        let bare = PlaceSummary {
            place_id: Some(id.clone()),
            name: None,
            vicinity: None,
            rating: None,
            types: Vec::new(),
            photos: Vec::new(),
        };
        let record = build_record(&id, &bare, Some(&PlaceDetails::default()), &photos());

        assert_eq!(record.name, "");
        assert_eq!(record.rating, None);
        assert_eq!(record.photo_url, None);
    }

    #[test]
    fn test_blank_detail_fields_fall_back() {
        let id = PlaceId::new("p1");
        let blank = PlaceDetails {
            name: Some(String::new()),
            formatted_address: Some(String::new()),
            formatted_phone_number: Some(String::new()),
            url: Some(String::new()),
            ..details()
        };
        let record = build_record(&id, &summary(), Some(&blank), &photos());

        assert_eq!(record.name, "Summary Name");
        assert_eq!(record.address, "Summary Street");
        assert_eq!(record.phone, "+886 4 1234 5678");
        assert_eq!(
            record.maps_url,
            "https://www.google.com/maps/place/?q=place_id:p1"
        );
    }

    #[test]
    fn test_record_is_deterministic() {
        let id = PlaceId::new("p1");
        let a = build_record(&id, &summary(), Some(&details()), &photos());
        let b = build_record(&id, &summary(), Some(&details()), &photos());
        assert_eq!(a, b);
    }

    /// Details keyed by id: `Ok(Some)`, `Ok(None)` or an error
    struct DetailsSource {
        missing: Vec<&'static str>,
        failing: Vec<&'static str>,
    }

    impl PlaceSource for DetailsSource {
        fn search_cell(&self, _cell: &SearchCell) -> Result<Vec<PlaceSummary>, ApiError> {
            Ok(Vec::new())
        }

        fn place_details(&self, id: &PlaceId) -> Result<Option<PlaceDetails>, ApiError> {
            if self.failing.iter().any(|f| *f == id.as_str()) {
                return Err(ApiError::NoResults(id.to_string()));
            }
            if self.missing.iter().any(|m| *m == id.as_str()) {
                return Ok(None);
            }
            Ok(Some(details()))
        }
    }

    #[test]
    fn test_row_count_is_successful_lookups() {
        let places: Vec<(PlaceId, PlaceSummary)> = ["a", "b", "c", "d"]
            .iter()
            .map(|id| (PlaceId::new(*id), summary()))
            .collect();
        let source = DetailsSource {
            missing: vec!["b"],
            failing: vec!["c"],
        };

        let report = enrich_places(
            &source,
            &places,
            &photos(),
            Duration::ZERO,
            &ProgressBar::hidden(),
        );

        assert_eq!(report.records.len(), 3);
        assert_eq!(report.without_details, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.records[1].name, "Summary Name");
    }
}
