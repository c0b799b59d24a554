//! RPE Load Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Builds a sample SQLite database from rpe processed files.
//!
//! # Overview
//!
//! - **Layouts** ([`layout`]): tab-separated field descriptions
//! - **Schema** ([`schema`]): table definitions derived from a layout
//! - **Loading** ([`loader`]): `|`-delimited data files, bulk inserted
//! - **Destination** ([`db`]): the SQLite database being built
//! - **Runs** ([`pipeline`]): drop, recreate and load every configured dataset
//!
//! # Example
//!
//! ```no_run
//! use rpe_load::{config::LoadConfig, pipeline};
//!
//! fn main() -> rpe_load::Result<()> {
//!     let report = pipeline::run(&LoadConfig::from_env()?)?;
//!     println!("loaded {} rows", report.total_rows());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod layout;
pub mod loader;
pub mod manifest;
pub mod pipeline;
pub mod schema;
pub mod value;

// Re-export commonly used types
pub use error::{LoadError, Result};
pub use layout::{FieldDescriptor, Layout};
pub use schema::{build_table, TableDefinition};

use clap::{Args, Parser, Subcommand};
use config::LoadConfig;
use std::path::PathBuf;

/// rpe-load - build a sample database from rpe processed files
#[derive(Parser, Debug)]
#[command(name = "rpe-load")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute (defaults to `run`)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Drop, recreate and load every dataset
    Run(RunArgs),

    /// Print the CREATE TABLE statement generated for a layout
    Schema {
        /// Table name
        #[arg(short, long)]
        name: String,

        /// Layout file
        #[arg(short, long)]
        layout: PathBuf,
    },
}

/// Options of the `run` command. Unset options fall back to the environment,
/// then to the defaults in [`config`].
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Directory relative layout, data and database paths are resolved against
    #[arg(long)]
    pub base_dir: Option<PathBuf>,

    /// SQLite database file
    #[arg(long)]
    pub database: Option<PathBuf>,

    /// Dataset manifest (YAML) to load instead of the standard datasets
    #[arg(long)]
    pub datasets: Option<PathBuf>,
}

impl RunArgs {
    /// Merge these options over the environment configuration
    pub fn into_config(self) -> Result<LoadConfig> {
        let mut config = LoadConfig::from_env()?;

        if let Some(dir) = self.base_dir {
            config.set_base_dir(dir);
        }

        if let Some(db) = self.database {
            config.set_database_path(db);
        }

        if let Some(manifest) = self.datasets {
            config.load_manifest(manifest)?;
        }

        Ok(config)
    }
}
