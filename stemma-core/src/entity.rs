//! Entity descriptors and the column dependency graph boundary.
//!
//! An [`EntityDescriptor`] is the orchestrator-facing view of one produced
//! dataset (table or view) at a point in time: its qualified name, ordered
//! column schema, upstream references, and an optional accessor for the
//! per-column expression-dependency graph. Descriptors are read-only inputs;
//! the core never mutates them.

use crate::{LineageError, QualifiedName, TableRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// One declared column: name plus declared type, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    pub data_type: String,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }
}

/// A node in a column's expression-dependency graph.
///
/// Nodes with downstream edges are internal computations; nodes with no
/// downstream edges are leaves. A leaf contributes a source reference only
/// when its expression resolves to a concrete source table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExprNode {
    /// Column name referenced by this node's expression.
    pub column: String,
    /// Concrete source table, when the expression resolves to one.
    pub table: Option<TableRef>,
    /// Downstream dependencies this node is computed from.
    pub downstream: Vec<ExprNode>,
}

impl ExprNode {
    /// Create a leaf node referencing a source table column.
    pub fn leaf(column: impl Into<String>, table: TableRef) -> Self {
        Self {
            column: column.into(),
            table: Some(table),
            downstream: Vec::new(),
        }
    }

    /// Create a leaf node with no resolvable source table.
    pub fn unresolved(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            table: None,
            downstream: Vec::new(),
        }
    }

    /// Create an internal computation node over downstream dependencies.
    pub fn internal(column: impl Into<String>, downstream: Vec<ExprNode>) -> Self {
        Self {
            column: column.into(),
            table: None,
            downstream,
        }
    }

    /// Leaves are exactly the nodes with no downstream edge.
    pub fn is_leaf(&self) -> bool {
        self.downstream.is_empty()
    }

    /// Preorder traversal over this node and all downstream nodes.
    ///
    /// Visit order is deterministic: a node is visited before its
    /// dependencies, dependencies left to right.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }
}

/// Iterator over an [`ExprNode`] graph in preorder.
pub struct Walk<'a> {
    stack: Vec<&'a ExprNode>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a ExprNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Push in reverse so the leftmost dependency is visited first.
        for child in node.downstream.iter().rev() {
            self.stack.push(child);
        }
        Some(node)
    }
}

/// Boundary to the external expression parser that supplies per-column
/// dependency graphs.
///
/// Implementations may fail per column (malformed expression, untraceable
/// reference); the lineage walker recovers by skipping that column.
pub trait ColumnGraphProvider: Send + Sync {
    /// Build the dependency graph for one output column.
    fn column_graph(&self, column: &str) -> Result<ExprNode, LineageError>;
}

/// A produced dataset (table/view) at a point in time.
#[derive(Clone)]
pub struct EntityDescriptor {
    /// Entity name as the orchestrator addresses it (the job name).
    pub name: String,
    /// Fully qualified dataset name (catalog/schema/table parts).
    pub qualified_name: QualifiedName,
    /// Ordered column schema. Empty when the entity exposes no typed columns.
    pub columns: Vec<ColumnDef>,
    /// Upstream entity names this entity reads from.
    pub parents: Vec<String>,
    /// Whether this entity materializes a dataset. Non-materialized entities
    /// (audits, external references) map to no output dataset.
    pub is_materialized: bool,
    /// Accessor for per-column dependency graphs, when the parser supplied one.
    pub graph: Option<Arc<dyn ColumnGraphProvider>>,
}

impl EntityDescriptor {
    /// Create a materialized entity with no columns, parents, or graph.
    pub fn new(name: impl Into<String>, qualified_name: QualifiedName) -> Self {
        Self {
            name: name.into(),
            qualified_name,
            columns: Vec::new(),
            parents: Vec::new(),
            is_materialized: true,
            graph: None,
        }
    }

    /// Set the ordered column schema.
    pub fn with_columns(mut self, columns: Vec<ColumnDef>) -> Self {
        self.columns = columns;
        self
    }

    /// Set the upstream entity names.
    pub fn with_parents<I, S>(mut self, parents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parents = parents.into_iter().map(Into::into).collect();
        self
    }

    /// Attach a column dependency graph provider.
    pub fn with_graph(mut self, graph: Arc<dyn ColumnGraphProvider>) -> Self {
        self.graph = Some(graph);
        self
    }

    /// Mark this entity as not materializing a dataset.
    pub fn not_materialized(mut self) -> Self {
        self.is_materialized = false;
        self
    }
}

impl fmt::Debug for EntityDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityDescriptor")
            .field("name", &self.name)
            .field("qualified_name", &self.qualified_name)
            .field("columns", &self.columns)
            .field("parents", &self.parents)
            .field("is_materialized", &self.is_materialized)
            .field("graph", &self.graph.as_ref().map(|_| "<provider>"))
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
