mod homepage;
mod internal;
mod reader;

pub use homepage::parse_homepage_csv;
pub use internal::{parse_internal_csv, InternalParseStats};
pub use reader::CsvTable;
