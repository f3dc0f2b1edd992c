// CSV table adapter - Reads Start/Stop range tables

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::domain::errors::*;
use crate::domain::rules::{RangeEntry, RangeValidator};
use crate::ports::*;

/// CSV-backed range table reader
pub struct CsvTableAdapter;

impl CsvTableAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Parse a CSV document with a header row
    pub fn parse_ranges<R: std::io::Read>(reader: R) -> Result<Vec<RangeEntry>, DomainError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()
            .map_err(|e| DomainError::InvalidTable(format!("cannot read header row: {}", e)))?
            .iter()
            .map(str::to_string)
            .collect();
        RangeValidator::check_columns(&headers)?;

        let column = |name: &str| headers.iter().position(|h| h == name);
        let (start_col, stop_col) = match (column("Start"), column("Stop")) {
            (Some(start), Some(stop)) => (start, stop),
            _ => return Err(DomainError::InvalidTable("missing Start/Stop columns".to_string())),
        };

        let mut entries = Vec::new();
        for (row, record) in csv_reader.records().enumerate() {
            let record = record
                .map_err(|e| DomainError::InvalidTable(format!("row {}: {}", row + 1, e)))?;
            if record.iter().all(str::is_empty) {
                continue;
            }
            entries.push(RangeEntry::new(
                row + 1,
                record.get(start_col).unwrap_or_default(),
                record.get(stop_col).unwrap_or_default(),
            ));
        }

        debug!("Read {} range row(s)", entries.len());
        Ok(entries)
    }
}

impl Default for CsvTableAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TablePort for CsvTableAdapter {
    async fn read_ranges(&self, file_path: &Path) -> Result<Vec<RangeEntry>, DomainError> {
        let path: PathBuf = file_path.to_path_buf();
        let file = std::fs::File::open(&path).map_err(|e| {
            DomainError::InvalidTable(format!("cannot open {}: {}", path.display(), e))
        })?;
        Self::parse_ranges(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ranges_reads_rows_in_order() {
        let table = "Start,Stop\n00:00:00,00:00:02\n00:00:05,00:00:07\n";
        let entries = CsvTableAdapter::parse_ranges(table.as_bytes()).unwrap();
        assert_eq!(
            entries,
            vec![
                RangeEntry::new(1, "00:00:00", "00:00:02"),
                RangeEntry::new(2, "00:00:05", "00:00:07"),
            ]
        );
    }

    #[test]
    fn test_parse_ranges_column_order_and_extras() {
        let table = "Label, Stop , Start\nintro, 01:30 ,00:00:10\n";
        let entries = CsvTableAdapter::parse_ranges(table.as_bytes()).unwrap();
        assert_eq!(entries, vec![RangeEntry::new(1, "00:00:10", "01:30")]);
    }

    #[test]
    fn test_parse_ranges_missing_column() {
        let table = "Start,End\n00:00:00,00:00:02\n";
        let err = CsvTableAdapter::parse_ranges(table.as_bytes()).unwrap_err();
        assert!(matches!(err, DomainError::InvalidTable(message) if message.contains("Stop")));
    }

    #[test]
    fn test_parse_ranges_skips_blank_rows() {
        let table = "Start,Stop\n00:00:00,00:00:02\n,\n00:00:03,00:00:04\n";
        let entries = CsvTableAdapter::parse_ranges(table.as_bytes()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].position, 3);
    }

    #[test]
    fn test_parse_ranges_short_row_yields_empty_cell() {
        let table = "Start,Stop\n00:00:00\n";
        let entries = CsvTableAdapter::parse_ranges(table.as_bytes()).unwrap();
        assert_eq!(entries, vec![RangeEntry::new(1, "00:00:00", "")]);
    }

    #[tokio::test]
    async fn test_read_ranges_missing_file() {
        let adapter = CsvTableAdapter::new();
        let err = adapter
            .read_ranges(Path::new("/nonexistent/ranges.csv"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidTable(_)));
    }
}
