//! Column-level lineage extraction.
//!
//! For one output entity, walk each declared column's expression-dependency
//! graph and collect the upstream (table, column) pairs that flow into it.
//! Extraction is best-effort and never blocks emission: a column whose graph
//! cannot be built or walked is skipped, and an entity with no usable graph
//! facility yields no lineage at all.

use std::collections::BTreeMap;
use stemma_core::{ColumnLineage, ColumnLineageFacet, EntityDescriptor, ExprNode, InputField};

/// Extract column-level lineage for an entity.
///
/// Returns `None` when no column produced any source reference, including
/// when the entity carries no graph provider. Columns with zero qualifying
/// leaves are omitted from the facet entirely; duplicates within a column are
/// preserved (two paths to the same upstream column are two entries, since
/// transformation semantics may differ per path).
///
/// Calling this twice on the same unchanged descriptor yields identical
/// output; the walk has no side effects beyond debug logging.
pub fn column_lineage(entity: &EntityDescriptor, namespace: &str) -> Option<ColumnLineageFacet> {
    let provider = entity.graph.as_ref()?;

    let mut fields: BTreeMap<String, ColumnLineage> = BTreeMap::new();
    for column in &entity.columns {
        let root = match provider.column_graph(&column.name) {
            Ok(root) => root,
            Err(error) => {
                // One malformed column must never abort extraction for the
                // whole entity.
                tracing::debug!(
                    entity = %entity.name,
                    column = %column.name,
                    %error,
                    "skipping column with untraceable lineage"
                );
                continue;
            }
        };

        let input_fields = source_references(&root, namespace);
        if !input_fields.is_empty() {
            fields.insert(column.name.clone(), ColumnLineage::direct(input_fields));
        }
    }

    if fields.is_empty() {
        None
    } else {
        Some(ColumnLineageFacet { fields })
    }
}

/// Collect the qualifying source references under one column's graph.
///
/// A node qualifies only when it is a leaf (no downstream dependents) and its
/// expression resolves to a concrete source table. Discovery order follows
/// the preorder walk.
fn source_references(root: &ExprNode, namespace: &str) -> Vec<InputField> {
    root.walk()
        .filter(|node| node.is_leaf())
        .filter_map(|node| {
            node.table.as_ref().map(|table| InputField {
                namespace: namespace.to_string(),
                name: table.qualified_name().to_string(),
                field: node.column.clone(),
            })
        })
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================
