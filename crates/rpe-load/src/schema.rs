//! Table definitions derived from layouts
//!
//! Every generated table has the same frame around the layout's included
//! fields:
//!
//! ```text
//! RECORD_ID  INTEGER PRIMARY KEY AUTOINCREMENT
//! <included layout fields, in layout order>
//! VALID_SSN  INTEGER
//! IMPORT_DT  DATETIME DEFAULT CURRENT_TIMESTAMP
//! ```

use crate::error::{LoadError, Result};
use crate::layout::Layout;
use rpe_common::types::ColumnType;
use std::path::Path;
use tracing::debug;

pub const RECORD_ID: &str = "RECORD_ID";
pub const VALID_SSN: &str = "VALID_SSN";
pub const IMPORT_DT: &str = "IMPORT_DT";

/// Default applied by the database when an insert omits the column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnDefault {
    /// UTC time of the insert
    CurrentTimestamp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
    pub column_type: ColumnType,
    pub primary_key: bool,
    pub default: Option<ColumnDefault>,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            primary_key: false,
            default: None,
        }
    }

    fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    fn with_default(mut self, default: ColumnDefault) -> Self {
        self.default = Some(default);
        self
    }

    fn sql(&self) -> String {
        let mut sql = format!("{} {}", quote_ident(&self.name), self.column_type.sql_type());
        if self.primary_key {
            sql.push_str(" PRIMARY KEY AUTOINCREMENT");
        }
        match self.default {
            Some(ColumnDefault::CurrentTimestamp) => sql.push_str(" DEFAULT CURRENT_TIMESTAMP"),
            None => {},
        }
        sql
    }
}

/// A destination table built from a layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDefinition {
    name: String,
    columns: Vec<ColumnDef>,
}

/// Build the table definition for `table_name` from the layout file at `layout_path`.
pub fn build_table(table_name: &str, layout_path: impl AsRef<Path>) -> Result<TableDefinition> {
    let layout = Layout::from_path(layout_path)?;
    TableDefinition::from_layout(table_name, &layout)
}

impl TableDefinition {
    /// Frame the layout's included fields with the key and trailer columns.
    ///
    /// An empty layout is accepted and yields only the three fixed columns.
    pub fn from_layout(table_name: &str, layout: &Layout) -> Result<Self> {
        let name = table_name.trim();
        if name.is_empty() {
            return Err(LoadError::InvalidTableName(table_name.to_string()));
        }

        let mut columns = Vec::with_capacity(layout.len() + 3);
        columns.push(ColumnDef::new(RECORD_ID, ColumnType::Integer).primary_key());
        columns.extend(
            layout
                .included()
                .map(|field| ColumnDef::new(field.name.clone(), field.declared_type.column_type())),
        );
        columns.push(ColumnDef::new(VALID_SSN, ColumnType::Integer));
        columns.push(
            ColumnDef::new(IMPORT_DT, ColumnType::Timestamp)
                .with_default(ColumnDefault::CurrentTimestamp),
        );

        debug!(table = name, columns = columns.len(), "Table definition built");

        Ok(Self {
            name: name.to_string(),
            columns,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn create_table_sql(&self) -> String {
        let columns: Vec<String> = self.columns.iter().map(|c| format!("    {}", c.sql())).collect();
        format!(
            "CREATE TABLE {} (\n{}\n)",
            quote_ident(&self.name),
            columns.join(",\n")
        )
    }

    pub fn drop_table_sql(&self) -> String {
        format!("DROP TABLE IF EXISTS {}", quote_ident(&self.name))
    }

    /// `INSERT` into the given columns with numbered placeholders.
    ///
    /// Columns are taken as given; they are not checked against the definition.
    pub fn insert_sql<S: AsRef<str>>(&self, columns: &[S]) -> String {
        let names: Vec<String> = columns.iter().map(|c| quote_ident(c.as_ref())).collect();
        let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{}", i)).collect();
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote_ident(&self.name),
            names.join(", "),
            placeholders.join(", ")
        )
    }
}

/// Quote an SQL identifier, doubling embedded quotes
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}
