//! CSV-backed row source.

use std::path::Path;

use bus_model::{RawRow, RowSource, StoreError};
use csv::{ReaderBuilder, StringRecord};
use serde_json::Value;

#[derive(Debug, Clone, Copy)]
pub struct CsvRowSource {
    delimiter: u8,
}

impl Default for CsvRowSource {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvRowSource {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    fn read(&self, source: &Path) -> Result<(Vec<String>, Vec<StringRecord>), StoreError> {
        let bytes = std::fs::read(source).map_err(|e| StoreError::io(source, e))?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(self.delimiter)
            .from_reader(bytes.as_slice());
        let headers = reader
            .headers()
            .map_err(|e| StoreError::parse(source, e.to_string()))?
            .iter()
            .map(|header| header.trim_matches('\u{feff}').trim().to_string())
            .collect();
        let mut records = Vec::new();
        for record in reader.records() {
            records.push(record.map_err(|e| StoreError::parse(source, e.to_string()))?);
        }
        Ok((headers, records))
    }
}

impl RowSource for CsvRowSource {
    fn columns(&self, source: &Path) -> Result<Vec<String>, StoreError> {
        self.read(source).map(|(headers, _)| headers)
    }

    fn rows(&self, source: &Path) -> Result<Vec<RawRow>, StoreError> {
        let (headers, records) = self.read(source)?;
        Ok(records
            .iter()
            .map(|record| {
                headers
                    .iter()
                    .zip(record.iter())
                    .map(|(header, cell)| (header.clone(), Value::String(cell.to_string())))
                    .collect()
            })
            .collect())
    }
}
