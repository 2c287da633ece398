pub mod csv;

pub use self::csv::{COLUMNS, write_csv, write_records};
