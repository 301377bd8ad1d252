use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};
use tracing::{debug, info};

use crate::common::constants::LOCATION_COLUMN_COUNT;
use crate::common::error::{GeocoderError, Result};
use crate::common::types::OUTPUT_FIELDS;

/// Pick the delimiter from a header line: `;` first, then `,`, else `;`.
pub fn detect_delimiter(header: &str) -> u8 {
    if header.contains(';') {
        b';'
    } else if header.contains(',') {
        b','
    } else {
        // Spreadsheet exports default to semicolons
        b';'
    }
}

/// Read the first line of `path` and detect its delimiter.
pub fn sniff_delimiter(path: &Path) -> Result<u8> {
    let mut header = String::new();
    BufReader::new(File::open(path)?).read_line(&mut header)?;
    Ok(detect_delimiter(&header))
}

/// Split the `--columns` argument into trimmed column names.
pub fn parse_column_list(list: &str) -> Vec<String> {
    list.split(',').map(|name| name.trim().to_string()).collect()
}

/// The three location columns of a table, coarse to specific.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationColumns {
    pub names: [String; 3],
    pub indices: [usize; 3],
}

impl LocationColumns {
    /// Position of the last location column; output columns go after it.
    pub fn anchor(&self) -> usize {
        self.indices[2]
    }

    /// Column positions once the output columns sit after the anchor.
    pub fn indices_after_insertion(&self) -> [usize; 3] {
        let anchor = self.anchor();
        self.indices
            .map(|index| if index > anchor { index + OUTPUT_FIELDS.len() } else { index })
    }
}

/// A delimited table held fully in memory.
#[derive(Debug, Clone)]
pub struct Table {
    delimiter: u8,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(delimiter: u8, headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { delimiter, headers, rows }
    }

    /// Read a table, detecting its delimiter from the header line.
    pub fn read(path: &Path) -> Result<Self> {
        let delimiter = sniff_delimiter(path)?;
        let table = Self::from_reader(File::open(path)?, delimiter)?;
        info!(
            path = %path.display(),
            delimiter = %(delimiter as char),
            columns = table.headers.len(),
            rows = table.rows.len(),
            "Loaded source table"
        );
        Ok(table)
    }

    pub fn from_reader<R: Read>(reader: R, delimiter: u8) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let mut rows = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let mut row: Vec<String> = record?.iter().map(str::to_string).collect();
            if row.len() < headers.len() {
                debug!(row = index + 1, fields = row.len(), "Padding short row");
                row.resize(headers.len(), String::new());
            }
            rows.push(row);
        }

        Ok(Self { delimiter, headers, rows })
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        self.write_to(File::create(path)?)?;
        info!(path = %path.display(), rows = self.rows.len(), "Wrote result table");
        Ok(())
    }

    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = WriterBuilder::new()
            .delimiter(self.delimiter)
            .flexible(true)
            .from_writer(writer);
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows[row].get(column).map(String::as_str).unwrap_or("")
    }

    pub fn set_cell(&mut self, row: usize, column: usize, value: &str) {
        let row = &mut self.rows[row];
        if row.len() <= column {
            row.resize(column + 1, String::new());
        }
        row[column] = value.to_string();
    }

    /// Check that exactly three names were given, all exist in the header,
    /// and none of the output columns is already present.
    pub fn resolve_location_columns(&self, names: &[String]) -> Result<LocationColumns> {
        if names.len() != LOCATION_COLUMN_COUNT {
            return Err(GeocoderError::ColumnValidation(format!(
                "expected exactly {} location columns, got {}",
                LOCATION_COLUMN_COUNT,
                names.len()
            )));
        }

        let missing: Vec<&str> = names
            .iter()
            .filter(|name| self.column_index(name).is_none())
            .map(String::as_str)
            .collect();
        if !missing.is_empty() {
            return Err(GeocoderError::ColumnValidation(format!(
                "columns not present in the source file: {}",
                missing.join(", ")
            )));
        }

        let clashing: Vec<&str> = OUTPUT_FIELDS
            .iter()
            .map(|field| field.column_name())
            .filter(|name| self.column_index(name).is_some())
            .collect();
        if !clashing.is_empty() {
            return Err(GeocoderError::ColumnValidation(format!(
                "source file already has output columns: {}",
                clashing.join(", ")
            )));
        }

        let index = |i: usize| self.column_index(&names[i]).unwrap_or_default();
        Ok(LocationColumns {
            names: [names[0].clone(), names[1].clone(), names[2].clone()],
            indices: [index(0), index(1), index(2)],
        })
    }

    /// Insert the empty output columns right after `anchor`.
    /// Returns the index of the first inserted column.
    pub fn insert_output_columns(&mut self, anchor: usize) -> usize {
        let first = anchor + 1;
        for (offset, field) in OUTPUT_FIELDS.iter().enumerate() {
            self.headers.insert(first + offset, field.column_name().to_string());
        }
        for row in &mut self.rows {
            if row.len() < first {
                row.resize(first, String::new());
            }
            for offset in 0..OUTPUT_FIELDS.len() {
                row.insert(first + offset, String::new());
            }
        }
        first
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn delimiter_detection() {
        assert_eq!(detect_delimiter("id;region;town\n"), b';');
        assert_eq!(detect_delimiter("id,region,town\n"), b',');
        assert_eq!(detect_delimiter("id;region,town\n"), b';');
        assert_eq!(detect_delimiter("single_column\n"), b';');
        assert_eq!(detect_delimiter(""), b';');
    }

    #[test]
    fn column_list_is_trimmed() {
        assert_eq!(parse_column_list("Region, District ,Town"), ["Region", "District", "Town"]);
    }

    #[test]
    fn reads_and_pads_short_rows() {
        let input = "id;region;town\n1;North;Oakwood\n2;South\n";
        let table = Table::from_reader(input.as_bytes(), b';').unwrap();
        assert_eq!(table.headers(), ["id", "region", "town"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.cell(1, 2), "");
    }

    #[test]
    fn resolves_location_columns_in_given_order() {
        let table = Table::new(b',', names(&["town", "id", "region", "district"]), vec![]);
        let columns = table
            .resolve_location_columns(&names(&["region", "district", "town"]))
            .unwrap();
        assert_eq!(columns.indices, [2, 3, 0]);
        assert_eq!(columns.anchor(), 0);
        assert_eq!(columns.indices_after_insertion(), [6, 7, 0]);
    }

    #[test]
    fn rejects_wrong_column_count() {
        let table = Table::new(b',', names(&["a", "b", "c", "d"]), vec![]);
        let err = table.resolve_location_columns(&names(&["a", "b"])).unwrap_err();
        assert!(matches!(err, GeocoderError::ColumnValidation(_)));
        let err = table
            .resolve_location_columns(&names(&["a", "b", "c", "d"]))
            .unwrap_err();
        assert!(matches!(err, GeocoderError::ColumnValidation(_)));
    }

    #[test]
    fn rejects_unknown_columns() {
        let table = Table::new(b',', names(&["a", "b", "c"]), vec![]);
        let err = table
            .resolve_location_columns(&names(&["a", "b", "zzz"]))
            .unwrap_err();
        assert!(err.to_string().contains("zzz"));
    }

    #[test]
    fn rejects_tables_that_already_have_output_columns() {
        let table = Table::from_reader(
            "a;b;c;Object_name;Latitude;Longitude;Search_query\n1;2;3;X;1.0;2.0;q\n".as_bytes(),
            b';',
        )
        .unwrap();
        let err = table
            .resolve_location_columns(&names(&["a", "b", "c"]))
            .unwrap_err();
        assert!(matches!(err, GeocoderError::ColumnValidation(_)));
        assert!(err.to_string().contains("Object_name"));
        assert_eq!(table.headers().len(), 7);

        let partial = Table::new(b',', names(&["a", "b", "c", "Latitude"]), vec![]);
        let err = partial
            .resolve_location_columns(&names(&["a", "b", "c"]))
            .unwrap_err();
        assert!(err.to_string().contains("Latitude"));
        assert!(!err.to_string().contains("Object_name"));
    }

    #[test]
    fn output_columns_follow_the_anchor() {
        let mut table = Table::new(
            b';',
            names(&["id", "region", "town", "notes"]),
            vec![names(&["1", "North", "Oakwood", "x"])],
        );
        let first = table.insert_output_columns(2);
        assert_eq!(first, 3);
        assert_eq!(
            table.headers(),
            ["id", "region", "town", "Object_name", "Latitude", "Longitude", "Search_query", "notes"]
        );
        assert_eq!(table.rows()[0], ["1", "North", "Oakwood", "", "", "", "", "x"]);
    }

    #[test]
    fn writes_with_source_delimiter() {
        let mut table = Table::from_reader("id;town\n1;Oakwood\n".as_bytes(), b';').unwrap();
        table.set_cell(0, 1, "Oak; Wood");

        let mut out = Vec::new();
        table.write_to(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "id;town\n1;\"Oak; Wood\"\n");
    }
}
