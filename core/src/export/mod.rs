pub mod table;

pub use table::{csv_path_for, DetectionTable, TableRow, CSV_HEADER};
