//! RPE Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types and logging setup for the RPE sample-database tools.
//!
//! # Overview
//!
//! - **Logging**: `tracing` subscriber configuration and initialisation
//! - **Types**: declared layout types and the column types they map to
//!
//! # Example
//!
//! ```no_run
//! use rpe_common::logging::{init_logging, LogConfig};
//! use rpe_common::types::DeclaredType;
//!
//! fn main() -> anyhow::Result<()> {
//!     let _guard = init_logging(&LogConfig::from_env()?)?;
//!     tracing::info!(column_type = %DeclaredType::Number.column_type(), "ready");
//!     Ok(())
//! }
//! ```

pub mod logging;
pub mod types;

// Re-export commonly used types
pub use types::{ColumnType, DeclaredType};
