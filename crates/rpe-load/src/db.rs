//! SQLite destination
//!
//! [`Database`] owns the only connection used during a run. It is opened by
//! the pipeline, handed to the schema and load steps by reference, and closed
//! when the run finishes.

use crate::error::{LoadError, Result};
use crate::schema::{quote_ident, TableDefinition};
use crate::value::Value;
use rusqlite::{params_from_iter, Connection};
use std::path::Path;
use tracing::{debug, info};

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (creating if needed) the database file at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // Create parent directory if needed
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        info!(path = %path.display(), "Database opened");
        Ok(Self { conn })
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    /// Drop (if present) and recreate every table in a single transaction.
    ///
    /// If any statement fails, nothing is dropped or created.
    pub fn replace_tables(&mut self, tables: &[TableDefinition]) -> Result<()> {
        let tx = self.conn.transaction()?;
        for table in tables {
            tx.execute(&table.drop_table_sql(), [])?;
            debug!(table = table.name(), "Table dropped");
        }
        for table in tables {
            tx.execute(&table.create_table_sql(), [])?;
            debug!(table = table.name(), columns = table.columns().len(), "Table created");
        }
        tx.commit()?;
        Ok(())
    }

    /// Insert every row into `table` as one all-or-nothing operation.
    ///
    /// `columns` names the destination column of each row position. If any row
    /// is rejected the whole insert is rolled back and the error returned.
    pub fn bulk_insert<S: AsRef<str>>(
        &mut self,
        table: &TableDefinition,
        columns: &[S],
        rows: &[Vec<Value>],
    ) -> Result<usize> {
        if rows.is_empty() {
            return Ok(0);
        }

        let sql = table.insert_sql(columns);
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(&sql)?;
            for row in rows {
                stmt.execute(params_from_iter(row.iter()))?;
            }
        }
        tx.commit()?;

        Ok(rows.len())
    }

    /// Number of rows currently in `table`
    pub fn row_count(&self, table: &str) -> Result<u64> {
        let sql = format!("SELECT COUNT(*) FROM {}", quote_ident(table));
        let count: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    /// Column names of `table` in declaration order; empty if it does not exist
    pub fn table_columns(&self, table: &str) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM pragma_table_info(?1) ORDER BY cid")?;
        let columns = stmt
            .query_map([table], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(columns)
    }

    /// Underlying connection, for ad-hoc queries
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Close the connection, reporting any error SQLite raises while doing so
    pub fn close(self) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_, e)| LoadError::Database(e))
    }
}
