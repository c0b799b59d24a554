//! Bulk loading of processed data files
//!
//! Processed files are `|`-delimited with a header row. The whole file is
//! read and coerced in memory, then written with a single bulk insert.

use crate::db::Database;
use crate::error::{LoadError, Result};
use crate::schema::TableDefinition;
use crate::value::Value;
use csv::ReaderBuilder;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, instrument};

pub const DATA_DELIMITER: u8 = b'|';

/// A fully parsed data file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataFile {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl DataFile {
    /// Read and coerce the data file at `path`
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| LoadError::open(path, e))?;
        Self::from_reader(file, path)
    }

    /// Parse data file content. `origin` only labels errors.
    ///
    /// Every row must have as many fields as the header.
    pub fn from_reader<R: Read>(reader: R, origin: impl AsRef<Path>) -> Result<Self> {
        let origin = origin.as_ref();
        let mut reader = ReaderBuilder::new()
            .delimiter(DATA_DELIMITER)
            .from_reader(reader);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| LoadError::csv(origin, e))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut seen = HashSet::with_capacity(headers.len());
        if let Some(duplicate) = headers.iter().find(|h| !seen.insert(h.as_str())) {
            return Err(LoadError::DuplicateHeader {
                path: origin.display().to_string(),
                column: duplicate.clone(),
            });
        }

        let mut rows: Vec<Vec<Value>> = Vec::new();
        for record in reader.into_records() {
            let record = record.map_err(|e| LoadError::csv(origin, e))?;
            rows.push(record.iter().map(|raw| Value::coerce(raw.to_string())).collect());
        }

        Ok(Self { headers, rows })
    }

    /// Number of cells that were coerced to timestamps
    pub fn timestamp_count(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|row| row.iter())
            .filter(|v| v.is_timestamp())
            .count()
    }
}

/// Outcome of loading one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub table: String,
    pub rows: usize,
    pub timestamps_coerced: usize,
}

/// Load the data file at `path` into the already created `table`.
///
/// The file header is used as the column list as-is; columns that do not
/// exist in the table are reported by the database.
#[instrument(skip_all, fields(table = table.name(), path = %path.as_ref().display()))]
pub fn load(db: &mut Database, path: impl AsRef<Path>, table: &TableDefinition) -> Result<LoadReport> {
    let data = DataFile::read(path.as_ref())?;
    let timestamps_coerced = data.timestamp_count();
    debug!(
        columns = data.headers.len(),
        rows = data.rows.len(),
        timestamps_coerced,
        "Data file parsed"
    );

    let rows = db.bulk_insert(table, &data.headers, &data.rows)?;
    info!(rows, "Table loaded");

    Ok(LoadReport {
        table: table.name().to_string(),
        rows,
        timestamps_coerced,
    })
}
