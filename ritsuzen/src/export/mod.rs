//! Result export: JSON export files, their import and the tabular result
//! sheet.

pub mod errors;
pub mod json;
pub mod table;

pub use errors::{ExportError, ExportResult};
pub use json::{
    ExportData, ExportMetadata, all_data_file_name, competition_file_name, csv_file_name,
    parse_import, read_import, validate_import, write_csv, write_export,
};
pub use table::{Cell, Highlight, ResultSheet, SheetOrder};
