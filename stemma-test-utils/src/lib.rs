//! Stemma Test Utilities
//!
//! Centralized test infrastructure for the stemma workspace:
//! - Recording/failing sinks for asserting on emitted events
//! - Fixture entities mirroring a small two-model pipeline
//! - A static column-graph provider with per-column poisoning

// Re-export test sinks from their source crate
pub use stemma_events::{FailingSink, RecordingSink};

// Re-export core types for convenience
pub use stemma_core::{
    ColumnDef, ColumnGraphProvider, EntityDescriptor, ExecutionStats, ExprNode, LineageError,
    QualifiedName, RunEvent, RunState, SinkConfig, TableRef, UpdateOutcome,
};

use std::collections::HashMap;
use std::sync::Arc;

/// Column-graph provider backed by a fixed mapping.
///
/// Unknown columns and explicitly poisoned columns error the way an
/// unparsable expression would, letting tests exercise the walker's
/// per-column isolation.
#[derive(Default)]
pub struct StaticGraphProvider {
    graphs: HashMap<String, ExprNode>,
    poisoned: Vec<String>,
}

impl StaticGraphProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a column's dependency graph.
    pub fn with_graph(mut self, column: impl Into<String>, graph: ExprNode) -> Self {
        self.graphs.insert(column.into(), graph);
        self
    }

    /// Make a column's graph construction fail.
    pub fn with_poisoned(mut self, column: impl Into<String>) -> Self {
        self.poisoned.push(column.into());
        self
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl ColumnGraphProvider for StaticGraphProvider {
    fn column_graph(&self, column: &str) -> Result<ExprNode, LineageError> {
        if self.poisoned.iter().any(|c| c == column) {
            return Err(LineageError::TraversalFailed {
                column: column.to_string(),
                reason: "poisoned for test".to_string(),
            });
        }
        self.graphs
            .get(column)
            .cloned()
            .ok_or_else(|| LineageError::GraphUnavailable {
                column: column.to_string(),
            })
    }
}

/// `source_data`: no parents, columns `id, name`.
pub fn source_data() -> EntityDescriptor {
    EntityDescriptor::new("source_data", QualifiedName::new(["schema", "source_data"]))
        .with_columns(vec![
            ColumnDef::new("id", "INT"),
            ColumnDef::new("name", "VARCHAR"),
        ])
}

/// `processed_data`: parent `source_data`, columns `id, name, name_upper`,
/// each traced back to `source_data` through its dependency graph.
pub fn processed_data() -> EntityDescriptor {
    let source = || TableRef::qualified("schema", "source_data");
    let provider = StaticGraphProvider::new()
        .with_graph("id", ExprNode::leaf("id", source()))
        .with_graph("name", ExprNode::leaf("name", source()))
        .with_graph(
            "name_upper",
            ExprNode::internal("name_upper", vec![ExprNode::leaf("name", source())]),
        );

    EntityDescriptor::new(
        "processed_data",
        QualifiedName::new(["schema", "processed_data"]),
    )
    .with_columns(vec![
        ColumnDef::new("id", "INT"),
        ColumnDef::new("name", "VARCHAR"),
        ColumnDef::new("name_upper", "VARCHAR"),
    ])
    .with_parents(["source_data"])
    .with_graph(provider.into_arc())
}
