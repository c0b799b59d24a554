//! Full load run: build every table, replace them, then load each dataset

use crate::config::LoadConfig;
use crate::db::Database;
use crate::error::{LoadError, Result};
use crate::loader::{self, LoadReport};
use crate::manifest::check_unique_names;
use crate::schema::{build_table, TableDefinition};
use tracing::{info, instrument};

/// Outcome of a full run, one entry per dataset in load order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub tables: Vec<LoadReport>,
}

impl RunReport {
    pub fn total_rows(&self) -> usize {
        self.tables.iter().map(|t| t.rows).sum()
    }
}

/// Open the configured database, run [`load_datasets`] against it and close it.
///
/// The connection is closed even when loading fails; the load error wins over
/// a close error.
#[instrument(skip_all, fields(database = %config.database_path().display()))]
pub fn run(config: &LoadConfig) -> Result<RunReport> {
    let mut db = Database::open(config.database_path())?;

    let result = load_datasets(&mut db, config);
    let closed = db.close();

    let report = result?;
    closed?;

    info!(
        tables = report.tables.len(),
        total_rows = report.total_rows(),
        "Load complete"
    );
    Ok(report)
}

/// Replace and load every configured dataset.
///
/// All table definitions are built before anything is dropped, so a broken
/// layout leaves the database untouched. Existing tables are then replaced in
/// one transaction and datasets loaded one after another.
pub fn load_datasets(db: &mut Database, config: &LoadConfig) -> Result<RunReport> {
    if config.datasets.is_empty() {
        return Err(LoadError::config("no datasets configured"));
    }

    let tables = config
        .datasets
        .iter()
        .map(|dataset| build_table(&dataset.name, config.resolve(&dataset.layout)))
        .collect::<Result<Vec<TableDefinition>>>()?;
    check_unique_names(tables.iter().map(TableDefinition::name))?;

    db.replace_tables(&tables)?;
    info!(tables = tables.len(), "Schema created");

    let mut report = RunReport::default();
    for (dataset, table) in config.datasets.iter().zip(&tables) {
        report
            .tables
            .push(loader::load(db, config.resolve(&dataset.data), table)?);
    }

    Ok(report)
}
