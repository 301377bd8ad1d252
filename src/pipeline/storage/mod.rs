pub mod table;

pub use table::{detect_delimiter, parse_column_list, LocationColumns, Table};
