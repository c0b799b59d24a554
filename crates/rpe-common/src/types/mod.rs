//! Common types used across RPE tools

/// Default capacity of text columns generated from a layout.
pub const DEFAULT_TEXT_CAPACITY: u32 = 255;

// ============================================================================
// Layout Types
// ============================================================================

/// Type of a field as declared in the `TYPE` column of a layout file.
///
/// Only `DATE` and `NUMBER` are recognised; every other code (including an
/// empty one) declares a text field.
///
/// # Examples
///
/// ```
/// use rpe_common::types::DeclaredType;
///
/// assert_eq!(DeclaredType::from_code("DATE"), DeclaredType::Date);
/// assert_eq!(DeclaredType::from_code("NUMBER"), DeclaredType::Number);
/// assert_eq!(DeclaredType::from_code("CHAR"), DeclaredType::Text);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DeclaredType {
    /// Date or datetime field
    Date,
    /// Numeric field
    Number,
    /// Anything else
    #[default]
    Text,
}

impl DeclaredType {
    /// Interpret a layout `TYPE` code. Codes are case-sensitive.
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "DATE" => DeclaredType::Date,
            "NUMBER" => DeclaredType::Number,
            _ => DeclaredType::Text,
        }
    }

    /// Column type a field of this declared type is stored as.
    pub fn column_type(self) -> ColumnType {
        match self {
            DeclaredType::Date => ColumnType::Timestamp,
            DeclaredType::Number => ColumnType::Float,
            DeclaredType::Text => ColumnType::Text(DEFAULT_TEXT_CAPACITY),
        }
    }
}

impl std::fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeclaredType::Date => write!(f, "DATE"),
            DeclaredType::Number => write!(f, "NUMBER"),
            DeclaredType::Text => write!(f, "TEXT"),
        }
    }
}

// ============================================================================
// Database Types
// ============================================================================

/// Semantic type of a generated table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    /// Integer column
    Integer,
    /// Floating-point column
    Float,
    /// Bounded text column holding up to the given number of characters
    Text(u32),
    /// Date and time without timezone (stored as UTC)
    Timestamp,
}

impl ColumnType {
    /// SQL type name used in `CREATE TABLE` statements.
    pub fn sql_type(&self) -> String {
        match self {
            ColumnType::Integer => "INTEGER".to_string(),
            ColumnType::Float => "FLOAT".to_string(),
            ColumnType::Text(capacity) => format!("VARCHAR({})", capacity),
            ColumnType::Timestamp => "DATETIME".to_string(),
        }
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.sql_type())
    }
}
