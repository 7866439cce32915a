//! Tabular ingestion boundary
//!
//! Parses the external-interface tables (daily bar CSV, statement CSVs,
//! company-profile JSON) into engine structures. No directory layout is
//! imposed here; callers hand in paths or readers.

use crate::error::{Result, StockLensError};
use crate::fundamentals::statements::StatementTable;
use crate::fundamentals::valuation::CompanyProfile;
use crate::types::Bar;
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// CSV column layout for daily bar tables
#[derive(Debug, Clone)]
pub struct CsvFormat {
    pub date_column: String,
    pub open_column: String,
    pub high_column: String,
    pub low_column: String,
    pub close_column: String,
    pub volume_column: String,
    pub turnover_column: String,
    /// Date format string (e.g. "%Y-%m-%d")
    pub date_format: String,
}

impl Default for CsvFormat {
    fn default() -> Self {
        Self {
            date_column: "Date".to_string(),
            open_column: "Open".to_string(),
            high_column: "High".to_string(),
            low_column: "Low".to_string(),
            close_column: "Close".to_string(),
            volume_column: "Volume".to_string(),
            turnover_column: "Turnover_Value".to_string(),
            date_format: "%Y-%m-%d".to_string(),
        }
    }
}

fn column_index(headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| StockLensError::InvalidData(format!("missing column: {}", name)))
}

fn parse_date(cell: &str, format: &str) -> Result<NaiveDate> {
    // Statement vendors sometimes append a time component; the date is the
    // first 10 characters either way.
    let trimmed = cell.trim();
    let date_part = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, format)
        .map_err(|e| StockLensError::ParseError(format!("bad date '{}': {}", cell, e)))
}

fn parse_number(cell: &str, column: &str) -> Result<f64> {
    cell.trim()
        .parse::<f64>()
        .map_err(|_| StockLensError::ParseError(format!("bad number '{}' in column {}", cell, column)))
}

/// Read a daily bar table from any reader.
///
/// Every row must parse to a date plus numeric OHLCV/turnover fields; a
/// table with no rows is `DataUnavailable`.
pub fn read_bars<R: Read>(reader: R, format: &CsvFormat) -> Result<Vec<Bar>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);
    let headers = rdr.headers()?.clone();

    let date_idx = column_index(&headers, &format.date_column)?;
    let open_idx = column_index(&headers, &format.open_column)?;
    let high_idx = column_index(&headers, &format.high_column)?;
    let low_idx = column_index(&headers, &format.low_column)?;
    let close_idx = column_index(&headers, &format.close_column)?;
    let volume_idx = column_index(&headers, &format.volume_column)?;
    let turnover_idx = column_index(&headers, &format.turnover_column)?;

    let mut bars = Vec::new();
    for record in rdr.records() {
        let record = record?;
        bars.push(Bar {
            date: parse_date(&record[date_idx], &format.date_format)?,
            open: parse_number(&record[open_idx], &format.open_column)?,
            high: parse_number(&record[high_idx], &format.high_column)?,
            low: parse_number(&record[low_idx], &format.low_column)?,
            close: parse_number(&record[close_idx], &format.close_column)?,
            volume: parse_number(&record[volume_idx], &format.volume_column)?,
            turnover_value: parse_number(&record[turnover_idx], &format.turnover_column)?,
        });
    }

    if bars.is_empty() {
        return Err(StockLensError::DataUnavailable(
            "bar table has no rows".to_string(),
        ));
    }

    Ok(bars)
}

/// Load a daily bar table from a CSV file with the default column layout.
pub fn load_bars(path: &Path) -> Result<Vec<Bar>> {
    if !path.exists() {
        return Err(StockLensError::DataUnavailable(format!(
            "bar file not found: {}",
            path.display()
        )));
    }
    read_bars(File::open(path)?, &CsvFormat::default())
}

/// Read a financial-statement table: a `Date` column plus arbitrary
/// line-item columns.
///
/// Blank or non-numeric cells become absent values (`log::warn!`ed, not
/// fatal); an unparseable date is a hard failure.
pub fn read_statements<R: Read>(reader: R) -> Result<StatementTable> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);
    let headers = rdr.headers()?.clone();
    let date_idx = column_index(&headers, "Date")?;

    let mut table = StatementTable::new();
    for record in rdr.records() {
        let record = record?;
        let date = parse_date(&record[date_idx], "%Y-%m-%d")?;

        for (idx, cell) in record.iter().enumerate() {
            if idx == date_idx || cell.trim().is_empty() {
                continue;
            }
            match cell.trim().parse::<f64>() {
                Ok(value) => table.set(date, &headers[idx], value),
                Err(_) => {
                    log::warn!(
                        "skipping non-numeric cell '{}' in column {} at {}",
                        cell,
                        &headers[idx],
                        date
                    );
                }
            }
        }
    }

    if table.is_empty() {
        return Err(StockLensError::DataUnavailable(
            "statement table has no rows".to_string(),
        ));
    }

    Ok(table)
}

/// Load a statement table from a CSV file.
pub fn load_statements(path: &Path) -> Result<StatementTable> {
    if !path.exists() {
        return Err(StockLensError::DataUnavailable(format!(
            "statement file not found: {}",
            path.display()
        )));
    }
    read_statements(File::open(path)?)
}

/// Load company-profile metadata from a flat key/value JSON file.
pub fn load_profile(path: &Path) -> Result<CompanyProfile> {
    if !path.exists() {
        return Err(StockLensError::DataUnavailable(format!(
            "profile file not found: {}",
            path.display()
        )));
    }
    let profile = serde_json::from_reader(File::open(path)?)?;
    Ok(profile)
}
