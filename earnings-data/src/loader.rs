use std::fmt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use earnings_core::{TaxRateTable, normalize_field};
use rust_decimal::Decimal;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

const DEFAULT_TABLE_CSV: &str = include_str!("../data/state_tax_rates.csv");

/// Errors that can occur when loading a tax-rate table.
#[derive(Debug, Error)]
pub enum TaxRateLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("State name cannot be blank")]
    BlankState,

    #[error("Rate for '{state}' is not a number: {value}")]
    InvalidRate { state: String, value: String },

    #[error("Rate for '{state}' must be between 0 and 1, got {rate}")]
    RateOutOfRange { state: String, rate: Decimal },

    #[error("State '{0}' appears more than once")]
    DuplicateState(String),

    #[error("Unsupported tax table format '{0}' (expected .csv or .json)")]
    UnsupportedFormat(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<csv::Error> for TaxRateLoaderError {
    fn from(err: csv::Error) -> Self {
        TaxRateLoaderError::CsvParse(err.to_string())
    }
}

/// On-disk layouts for a tax-rate table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// Header `state,rate`, one state per row.
    Csv,
    /// A single object, `{ "Ohio": 0.035, ... }`.
    Json,
}

impl TableFormat {
    /// Picks a format from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, TaxRateLoaderError> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            _ => Err(TaxRateLoaderError::UnsupportedFormat(
                path.display().to_string(),
            )),
        }
    }
}

/// Entries of a JSON object in document order, repeated keys included.
struct JsonEntries(Vec<(String, serde_json::Value)>);

impl<'de> Deserialize<'de> for JsonEntries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = JsonEntries;

            fn expecting(
                &self,
                formatter: &mut fmt::Formatter,
            ) -> fmt::Result {
                formatter.write_str("an object mapping state names to rates")
            }

            fn visit_map<V>(
                self,
                mut map: V,
            ) -> Result<JsonEntries, V::Error>
            where
                V: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry()? {
                    entries.push(entry);
                }
                Ok(JsonEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

/// A single row of the tax-rate CSV.
///
/// - `state`: state name exactly as users will type it (title case)
/// - `rate`: tax rate as a decimal (e.g. 0.05 for 5%)
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct TaxRateRecord {
    pub state: String,
    pub rate: Decimal,
}

/// Loader for state tax-rate tables.
///
/// State names are trimmed; rates must lie in `[0, 1]`. A state whose name
/// would be changed by form normalization (e.g. `"District of Columbia"`) is
/// still loaded but can never be matched, so a warning is logged.
pub struct TaxRateLoader;

impl TaxRateLoader {
    /// Parse a table from CSV with a `state,rate` header.
    pub fn parse_csv<R: Read>(reader: R) -> Result<TaxRateTable, TaxRateLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: TaxRateRecord = result?;
            records.push(record);
        }

        Self::build(records)
    }

    /// Parse a table from a JSON object mapping state names to rates.
    ///
    /// Rates may be JSON numbers or numeric strings.
    pub fn parse_json<R: Read>(reader: R) -> Result<TaxRateTable, TaxRateLoaderError> {
        let JsonEntries(raw) = serde_json::from_reader(reader)?;
        let mut records = Vec::with_capacity(raw.len());

        for (state, value) in raw {
            let text = match &value {
                serde_json::Value::Number(number) => number.to_string(),
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            let rate = text
                .trim()
                .parse::<Decimal>()
                .or_else(|_| Decimal::from_scientific(text.trim()))
                .map_err(|_| TaxRateLoaderError::InvalidRate {
                    state: state.clone(),
                    value: text.clone(),
                })?;
            records.push(TaxRateRecord { state, rate });
        }

        Self::build(records)
    }

    /// Load a table from a `.csv` or `.json` file.
    pub fn from_path(path: &Path) -> Result<TaxRateTable, TaxRateLoaderError> {
        let format = TableFormat::from_path(path)?;
        let file = File::open(path).map_err(|source| TaxRateLoaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = match format {
            TableFormat::Csv => Self::parse_csv(file)?,
            TableFormat::Json => Self::parse_json(file)?,
        };
        debug!(path = %path.display(), states = table.len(), "tax table loaded");
        Ok(table)
    }

    /// Write a table as `state,rate` CSV.
    pub fn write_csv<W: Write>(
        table: &TaxRateTable,
        writer: W,
    ) -> Result<(), TaxRateLoaderError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for (state, rate) in table.iter() {
            csv_writer.serialize(TaxRateRecord {
                state: state.to_string(),
                rate,
            })?;
        }
        csv_writer
            .flush()
            .map_err(|e| TaxRateLoaderError::CsvParse(e.to_string()))
    }

    /// Render a table as a pretty JSON object.
    pub fn to_json(table: &TaxRateTable) -> Result<String, TaxRateLoaderError> {
        Ok(serde_json::to_string_pretty(table)?)
    }

    fn build(records: Vec<TaxRateRecord>) -> Result<TaxRateTable, TaxRateLoaderError> {
        let mut table = TaxRateTable::new();

        for record in records {
            let state = record.state.trim().to_string();
            if state.is_empty() {
                return Err(TaxRateLoaderError::BlankState);
            }
            if record.rate < Decimal::ZERO || record.rate > Decimal::ONE {
                return Err(TaxRateLoaderError::RateOutOfRange {
                    state,
                    rate: record.rate,
                });
            }
            if normalize_field(&state) != state {
                warn!(%state, "state name is not in title case and cannot match form input");
            }
            if table.insert(state.clone(), record.rate).is_some() {
                return Err(TaxRateLoaderError::DuplicateState(state));
            }
        }

        Ok(table)
    }
}

/// The bundled table of U.S. state rates compiled into the binary.
pub fn default_table() -> Result<TaxRateTable, TaxRateLoaderError> {
    TaxRateLoader::parse_csv(DEFAULT_TABLE_CSV.as_bytes())
}
