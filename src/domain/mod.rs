pub mod cell;
pub mod place;

pub use cell::SearchCell;
pub use place::{OpeningHours, Photo, PlaceDetails, PlaceId, PlaceRecord, PlaceSummary};
