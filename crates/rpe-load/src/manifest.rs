//! Dataset manifest handling (datasets.yml)
//!
//! The manifest lists the datasets a run loads. Without one, the loader uses
//! the two standard rpe outputs (`tax` and `credit_scores`).
//!
//! ```yaml
//! datasets:
//!   - name: tax
//!     layout: layouts/tax_layout.tsv
//!     data: data/processed/data/tax.txt
//! ```

use crate::error::{LoadError, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// One table to build and load
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Dataset {
    /// Destination table name
    pub name: String,

    /// Layout file describing the table's fields
    pub layout: PathBuf,

    /// Processed `|`-delimited data file
    pub data: PathBuf,
}

impl Dataset {
    pub fn new(name: impl Into<String>, layout: impl Into<PathBuf>, data: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            layout: layout.into(),
            data: data.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Manifest {
    pub datasets: Vec<Dataset>,
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            datasets: vec![
                Dataset::new("tax", "layouts/tax_layout.tsv", "data/processed/data/tax.txt"),
                Dataset::new(
                    "credit_scores",
                    "layouts/credit_score_layout.tsv",
                    "data/processed/data/credit_scores.txt",
                ),
            ],
        }
    }
}

impl Manifest {
    /// Load and validate a manifest file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| LoadError::open(path, e))?;
        Self::parse(&content)
    }

    /// Parse and validate manifest YAML
    pub fn parse(content: &str) -> Result<Self> {
        let manifest: Manifest = serde_yaml::from_str(content)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// A manifest must name at least one dataset and names must be unique
    pub fn validate(&self) -> Result<()> {
        if self.datasets.is_empty() {
            return Err(LoadError::config("dataset manifest lists no datasets"));
        }

        for dataset in &self.datasets {
            if dataset.name.trim().is_empty() {
                return Err(LoadError::InvalidTableName(dataset.name.clone()));
            }
        }
        check_unique_names(self.datasets.iter().map(|d| d.name.as_str()))
    }
}

/// Reject table names that would collide in SQLite, which ignores ASCII case
/// in identifiers. Surrounding whitespace is ignored as table names are trimmed.
pub fn check_unique_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name.trim().to_ascii_lowercase()) {
            return Err(LoadError::config(format!(
                "dataset '{}' is listed more than once",
                name.trim()
            )));
        }
    }
    Ok(())
}
