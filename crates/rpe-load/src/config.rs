//! Configuration for a load run
//!
//! Defaults reproduce the standard rpe directory conventions. Environment
//! variables override the defaults and command-line flags override both.

use crate::error::Result;
use crate::manifest::{Dataset, Manifest};
use std::path::{Path, PathBuf};

// ============================================================================
// Configuration Constants
// ============================================================================

/// Database file used when none is configured, relative to the base directory.
pub const DEFAULT_DATABASE_PATH: &str = "data/data.db";

pub const ENV_BASE_DIR: &str = "RPE_BASE_DIR";
pub const ENV_DATABASE: &str = "RPE_DATABASE";
pub const ENV_DATASETS: &str = "RPE_DATASETS";

/// Load run configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadConfig {
    /// Directory relative paths are resolved against
    pub base_dir: PathBuf,

    /// SQLite database file
    pub database_path: PathBuf,

    /// Datasets to build and load, in order
    pub datasets: Vec<Dataset>,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            datasets: Manifest::default().datasets,
        }
    }
}

impl LoadConfig {
    /// Load config from environment variables
    ///
    /// - `RPE_BASE_DIR`: base directory
    /// - `RPE_DATABASE`: database file
    /// - `RPE_DATASETS`: dataset manifest (YAML) replacing the default datasets
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(dir) = std::env::var(ENV_BASE_DIR) {
            config.set_base_dir(dir);
        }

        if let Ok(db) = std::env::var(ENV_DATABASE) {
            config.set_database_path(db);
        }

        if let Ok(manifest) = std::env::var(ENV_DATASETS) {
            config.load_manifest(manifest)?;
        }

        Ok(config)
    }

    pub fn set_base_dir(&mut self, dir: impl Into<PathBuf>) {
        self.base_dir = dir.into();
    }

    pub fn set_database_path(&mut self, path: impl Into<PathBuf>) {
        self.database_path = path.into();
    }

    /// Replace the configured datasets with those of a manifest file
    pub fn load_manifest(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.datasets = Manifest::load(path)?.datasets;
        Ok(())
    }

    /// Resolve `path` against the base directory unless it is absolute
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Resolved database file path
    pub fn database_path(&self) -> PathBuf {
        self.resolve(&self.database_path)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LoadConfig::default();
        assert_eq!(config.database_path(), PathBuf::from("./data/data.db"));
        assert_eq!(config.datasets.len(), 2);
        assert_eq!(
            config.resolve(&config.datasets[0].layout),
            PathBuf::from("./layouts/tax_layout.tsv")
        );
    }

    #[test]
    fn test_absolute_paths_are_kept() {
        let mut config = LoadConfig::default();
        config.set_base_dir("/srv/rpe");
        config.set_database_path("/tmp/sample.db");

        assert_eq!(config.database_path(), PathBuf::from("/tmp/sample.db"));
        assert_eq!(
            config.resolve("layouts/x.tsv"),
            PathBuf::from("/srv/rpe/layouts/x.tsv")
        );
    }

    #[test]
    fn test_config_from_env() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("datasets.yml");
        std::fs::write(
            &manifest,
            "datasets:\n  - {name: only, layout: l.tsv, data: d.txt}\n",
        )
        .unwrap();

        std::env::set_var(ENV_BASE_DIR, dir.path());
        std::env::set_var(ENV_DATABASE, "out.db");
        std::env::set_var(ENV_DATASETS, &manifest);

        let config = LoadConfig::from_env().unwrap();

        std::env::remove_var(ENV_BASE_DIR);
        std::env::remove_var(ENV_DATABASE);
        std::env::remove_var(ENV_DATASETS);

        assert_eq!(config.database_path(), dir.path().join("out.db"));
        assert_eq!(config.datasets, vec![Dataset::new("only", "l.tsv", "d.txt")]);
    }
}
