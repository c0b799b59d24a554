//! Cell values read from processed data files

use chrono::NaiveDateTime;
use rusqlite::types::{ToSql, ToSqlOutput};

/// Exact timestamp shape rpe jobs write, e.g. `2023-01-15 08:30:00`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single cell after best-effort coercion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Text(String),
    Timestamp(NaiveDateTime),
}

impl Value {
    /// Coerce a raw cell: exact timestamps become [`Value::Timestamp`],
    /// everything else is kept verbatim as text.
    pub fn coerce(raw: String) -> Self {
        match parse_timestamp(&raw) {
            Some(ts) => Value::Timestamp(ts),
            None => Value::Text(raw),
        }
    }

    pub fn is_timestamp(&self) -> bool {
        matches!(self, Value::Timestamp(_))
    }
}

/// Parse `raw` with [`TIMESTAMP_FORMAT`].
///
/// Only the exact zero-padded shape is accepted: `None` for trailing input
/// (fractional seconds, a timezone), extra or missing whitespace and
/// single-digit fields.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    if raw.len() != 19 {
        return None;
    }
    let ts = NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).ok()?;
    (ts.format(TIMESTAMP_FORMAT).to_string() == raw).then_some(ts)
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            Value::Text(s) => s.to_sql(),
            Value::Timestamp(ts) => ts.to_sql(),
        }
    }
}
