//! Layout file parsing
//!
//! A layout is a tab-separated description of the fields an upstream rpe job
//! writes. Only three header columns matter here:
//!
//! | Column | Meaning |
//! |--------|---------|
//! | `DATA` | `1` when the field is materialised as a column |
//! | `NAME` | output column name |
//! | `TYPE` | `DATE`, `NUMBER`, anything else is text |
//!
//! Other columns may be present in any order and are ignored.

use crate::error::{LoadError, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use rpe_common::types::DeclaredType;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

pub const DATA_COLUMN: &str = "DATA";
pub const NAME_COLUMN: &str = "NAME";
pub const TYPE_COLUMN: &str = "TYPE";

/// One field of a layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub declared_type: DeclaredType,
    pub included: bool,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, declared_type: DeclaredType, included: bool) -> Self {
        Self {
            name: name.into(),
            declared_type,
            included,
        }
    }
}

/// Ordered field descriptors keyed by name.
///
/// Iteration follows file order. Inserting a name that already exists
/// replaces the earlier descriptor but keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layout {
    fields: Vec<FieldDescriptor>,
}

impl Layout {
    /// Read a layout file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| LoadError::open(path, e))?;
        let layout = Self::from_reader(file, path)?;

        debug!(
            path = %path.display(),
            fields = layout.len(),
            included = layout.included().count(),
            "Layout loaded"
        );
        Ok(layout)
    }

    /// Parse layout content. `origin` only labels errors.
    pub fn from_reader<R: Read>(reader: R, origin: impl AsRef<Path>) -> Result<Self> {
        let origin = origin.as_ref();
        let mut reader = ReaderBuilder::new()
            .delimiter(b'\t')
            .quoting(false)
            .trim(Trim::Headers)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| LoadError::csv(origin, e))?
            .clone();

        // A zero-byte file is an empty layout, not a malformed one
        if headers.is_empty() {
            return Ok(Self::default());
        }

        let data_idx = column_index(&headers, DATA_COLUMN, origin)?;
        let name_idx = column_index(&headers, NAME_COLUMN, origin)?;
        let type_idx = column_index(&headers, TYPE_COLUMN, origin)?;

        let mut layout = Self::default();
        for record in reader.records() {
            let record = record.map_err(|e| LoadError::csv(origin, e))?;

            let name = record.get(name_idx).unwrap_or_default().trim();
            if name.is_empty() {
                let line = record.position().map(|p| p.line()).unwrap_or_default();
                return Err(LoadError::invalid_layout(
                    origin,
                    format!("empty {} on line {}", NAME_COLUMN, line),
                ));
            }

            layout.insert(FieldDescriptor {
                name: name.to_string(),
                declared_type: DeclaredType::from_code(record.get(type_idx).unwrap_or_default()),
                included: record.get(data_idx).unwrap_or_default().trim() == "1",
            });
        }

        Ok(layout)
    }

    /// Add a descriptor, replacing any existing one with the same name in place
    pub fn insert(&mut self, field: FieldDescriptor) {
        match self.fields.iter_mut().find(|f| f.name == field.name) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Descriptors flagged for inclusion, in layout order
    pub fn included(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.included)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<FieldDescriptor> for Layout {
    fn from_iter<I: IntoIterator<Item = FieldDescriptor>>(iter: I) -> Self {
        let mut layout = Self::default();
        for field in iter {
            layout.insert(field);
        }
        layout
    }
}

fn column_index(headers: &StringRecord, column: &str, origin: &Path) -> Result<usize> {
    headers.iter().position(|h| h == column).ok_or_else(|| {
        LoadError::invalid_layout(origin, format!("missing required column {}", column))
    })
}
