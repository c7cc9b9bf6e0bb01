//! Facets attached to runs and datasets.
//!
//! Facets are small, independently versioned annotations carried on lifecycle
//! events: the output schema, column-level lineage, output statistics, run
//! execution statistics, and error messages. They serialize to camelCase JSON
//! to match the wire format lineage collectors expect.

use crate::{ExecutionStats, UpdateOutcome};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Producer tag carried on every event and custom facet.
pub const PRODUCER: &str = "stemma";

/// Schema URL advertised on the execution run facet.
pub const EXECUTION_FACET_SCHEMA_URL: &str =
    "https://stemma.dev/spec/facets/1-0-0/ExecutionFacet.json";

/// One field of a schema facet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaField {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
}

/// Output dataset schema: one entry per declared column, declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaFacet {
    pub fields: Vec<SchemaField>,
}

/// One upstream (table, column) reference contributing to an output column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputField {
    pub namespace: String,
    /// Qualified source table name.
    pub name: String,
    /// Source column name.
    pub field: String,
}

/// Lineage of a single output column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnLineage {
    pub input_fields: Vec<InputField>,
    pub transformation_type: String,
    pub transformation_description: String,
}

impl ColumnLineage {
    /// Lineage with no transformation metadata, inputs in discovery order.
    pub fn direct(input_fields: Vec<InputField>) -> Self {
        Self {
            input_fields,
            transformation_type: String::new(),
            transformation_description: String::new(),
        }
    }
}

/// Column-level lineage for an output dataset.
///
/// Columns with no extractable lineage are absent from `fields` entirely,
/// never present with an empty input list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnLineageFacet {
    pub fields: BTreeMap<String, ColumnLineage>,
}

/// Row/byte counts for an output dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputStatisticsFacet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
}

impl OutputStatisticsFacet {
    /// Build from execution statistics; `None` when no row count is known.
    pub fn from_stats(stats: &ExecutionStats) -> Option<Self> {
        stats.rows_processed.map(|rows| Self {
            row_count: Some(rows),
            size: stats.bytes_processed,
        })
    }
}

/// Run-level execution statistics attached to COMPLETE events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionFacet {
    #[serde(rename = "_producer")]
    pub producer: String,
    #[serde(rename = "_schemaURL")]
    pub schema_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows_processed: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes_processed: Option<i64>,
}

impl ExecutionFacet {
    /// Build from an update outcome; `None` when neither duration nor
    /// statistics are known.
    pub fn from_outcome(outcome: &UpdateOutcome) -> Option<Self> {
        if outcome.duration_ms.is_none() && outcome.stats.is_none() {
            return None;
        }
        Some(Self {
            producer: PRODUCER.to_string(),
            schema_url: EXECUTION_FACET_SCHEMA_URL.to_string(),
            duration_ms: outcome.duration_ms,
            rows_processed: outcome.stats.as_ref().and_then(|s| s.rows_processed),
            bytes_processed: outcome.stats.as_ref().and_then(|s| s.bytes_processed),
        })
    }
}

/// Human-readable error attached to FAIL events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorMessageFacet {
    pub message: String,
    pub programming_language: String,
}

impl ErrorMessageFacet {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            programming_language: "rust".to_string(),
        }
    }
}

/// Any facet value carried in a facet map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Facet {
    Schema(SchemaFacet),
    ColumnLineage(ColumnLineageFacet),
    OutputStatistics(OutputStatisticsFacet),
    Execution(ExecutionFacet),
    ErrorMessage(ErrorMessageFacet),
    /// Caller-supplied facet with no dedicated type.
    Custom(serde_json::Value),
}

/// Named facets on a run or dataset.
pub type FacetMap = BTreeMap<String, Facet>;

/// Merge `extra` into `base`; on key collision the caller-supplied `extra`
/// entry wins.
pub fn merge_facets(base: &mut FacetMap, extra: FacetMap) {
    for (key, facet) in extra {
        base.insert(key, facet);
    }
}

// Well-known facet map keys.
pub const SCHEMA_KEY: &str = "schema";
pub const COLUMN_LINEAGE_KEY: &str = "columnLineage";
pub const OUTPUT_STATISTICS_KEY: &str = "outputStatistics";
pub const EXECUTION_KEY: &str = "stemma_execution";
pub const ERROR_MESSAGE_KEY: &str = "errorMessage";

// =============================================================================
// TESTS
// =============================================================================
