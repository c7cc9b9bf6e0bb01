//! Entity to dataset record conversion.
//!
//! Builds the facet-annotated input and output dataset records attached to
//! lifecycle events. Outputs exist only for materialized entities; inputs are
//! bare references to the entity's parents.

use crate::lineage::column_lineage;
use stemma_core::{
    merge_facets, EntityDescriptor, Facet, FacetMap, InputDataset, OutputDataset, SchemaFacet,
    SchemaField, COLUMN_LINEAGE_KEY, SCHEMA_KEY,
};

/// The qualified dataset name an entity materializes under.
pub fn table_name(entity: &EntityDescriptor) -> String {
    entity.qualified_name.to_string()
}

/// Schema facet for an entity, one field per declared column in declaration
/// order. `None` when the entity exposes no typed columns.
pub fn schema_facet(entity: &EntityDescriptor) -> Option<SchemaFacet> {
    if entity.columns.is_empty() {
        return None;
    }
    Some(SchemaFacet {
        fields: entity
            .columns
            .iter()
            .map(|c| SchemaField {
                name: c.name.clone(),
                data_type: c.data_type.clone(),
            })
            .collect(),
    })
}

/// Build the output dataset record for an entity.
///
/// Returns `None` for non-materialized entities; callers omit outputs in that
/// case. Facets: schema, column lineage (only when non-empty), then
/// caller-supplied extras, which win on key collision.
pub fn output_dataset(
    entity: &EntityDescriptor,
    namespace: &str,
    extra_facets: FacetMap,
) -> Option<OutputDataset> {
    if !entity.is_materialized {
        return None;
    }

    let mut facets = FacetMap::new();
    if let Some(schema) = schema_facet(entity) {
        facets.insert(SCHEMA_KEY.to_string(), Facet::Schema(schema));
    }
    if let Some(lineage) = column_lineage(entity, namespace) {
        facets.insert(COLUMN_LINEAGE_KEY.to_string(), Facet::ColumnLineage(lineage));
    }
    merge_facets(&mut facets, extra_facets);

    Some(OutputDataset {
        namespace: namespace.to_string(),
        name: table_name(entity),
        facets,
    })
}

/// Build one bare input dataset per upstream reference.
pub fn input_datasets(entity: &EntityDescriptor, namespace: &str) -> Vec<InputDataset> {
    entity
        .parents
        .iter()
        .map(|parent| InputDataset {
            namespace: namespace.to_string(),
            name: parent.clone(),
        })
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================
