use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::domain::PlaceRecord;

/// Header row, in column order
pub const COLUMNS: [&str; 8] = [
    "name",
    "address",
    "phone",
    "opening_hours",
    "rating",
    "types",
    "photo_url",
    "maps_url",
];

/// Spreadsheet apps need the BOM to detect UTF-8 (CJK names otherwise garble)
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    name: &'a str,
    address: &'a str,
    phone: &'a str,
    opening_hours: String,
    rating: String,
    types: String,
    photo_url: &'a str,
    maps_url: &'a str,
}

impl<'a> From<&'a PlaceRecord> for CsvRow<'a> {
    fn from(record: &'a PlaceRecord) -> Self {
        Self {
            name: &record.name,
            address: &record.address,
            phone: &record.phone,
            opening_hours: record.opening_hours.join(" | "),
            rating: format_rating(record.rating),
            types: record.types.join(", "),
            photo_url: record.photo_url.as_deref().unwrap_or(""),
            maps_url: &record.maps_url,
        }
    }
}

/// Shortest form of the rating: `4`, not `4.0`, for whole numbers
fn format_rating(rating: Option<f64>) -> String {
    rating.map(|r| r.to_string()).unwrap_or_default()
}

/// Write records as CSV with a header row to any writer
pub fn write_records<W: Write>(writer: W, records: &[PlaceRecord]) -> Result<()> {
    // Header written by hand so an empty record list still gets one
    let mut csv_writer = ::csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(COLUMNS)?;
    for record in records {
        csv_writer.serialize(CsvRow::from(record))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write records to `path` as UTF-8 CSV with a byte-order mark
///
/// Returns the number of data rows written.
pub fn write_csv(path: &Path, records: &[PlaceRecord]) -> Result<usize> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    writer.write_all(UTF8_BOM)?;

    write_records(&mut writer, records)
        .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
    writer.flush()?;

    Ok(records.len())
}
