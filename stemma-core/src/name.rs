//! Qualified names for datasets and source tables.
//!
//! A produced dataset is addressed by a namespace-scoped qualified name
//! (catalog, schema, table). Rendering joins the non-empty parts with `.`,
//! so a name without a catalog still renders cleanly as `schema.table`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fully qualified name of a produced dataset.
///
/// Parts are ordered most-general first. Empty parts are skipped when
/// rendering; at least one part must be non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QualifiedName {
    parts: Vec<String>,
}

impl QualifiedName {
    /// Create a qualified name from ordered parts.
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            parts: parts.into_iter().map(Into::into).collect(),
        }
    }

    /// The raw parts, including any empty ones.
    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// True when every part is empty (the rendered name would be empty).
    pub fn is_empty(&self) -> bool {
        self.parts.iter().all(|p| p.is_empty())
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .parts
            .iter()
            .filter(|p| !p.is_empty())
            .cloned()
            .collect::<Vec<_>>()
            .join(".");
        write!(f, "{}", joined)
    }
}

/// Reference to a concrete source table at a lineage leaf.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableRef {
    pub catalog: Option<String>,
    pub schema: Option<String>,
    pub table: String,
}

impl TableRef {
    /// Create a table reference with neither catalog nor schema.
    pub fn bare(table: impl Into<String>) -> Self {
        Self {
            catalog: None,
            schema: None,
            table: table.into(),
        }
    }

    /// Create a schema-qualified table reference.
    pub fn qualified(schema: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            catalog: None,
            schema: Some(schema.into()),
            table: table.into(),
        }
    }

    /// Render as a dotted name, skipping absent parts.
    pub fn qualified_name(&self) -> QualifiedName {
        QualifiedName::new(
            [
                self.catalog.clone().unwrap_or_default(),
                self.schema.clone().unwrap_or_default(),
                self.table.clone(),
            ]
            .into_iter(),
        )
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.qualified_name())
    }
}

// =============================================================================
// TESTS
// =============================================================================
