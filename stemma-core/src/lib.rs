//! Stemma Core - Lineage Data Types
//!
//! Pure data structures for the stemma lineage framework. All other crates
//! depend on this. This crate contains ONLY data types and their invariants -
//! no emission or tracking logic.
//!
//! # Key Types
//!
//! - [`EntityDescriptor`]: one produced dataset as the orchestrator sees it
//! - [`ExprNode`] / [`ColumnGraphProvider`]: the column dependency graph
//!   boundary consumed by the lineage walker
//! - [`RunEvent`] / [`RunState`]: immutable lifecycle events (START,
//!   COMPLETE, FAIL) with run, job, and dataset records
//! - Facets ([`SchemaFacet`], [`ColumnLineageFacet`], ...): annotations
//!   attached to runs and datasets
//! - [`SinkConfig`]: where events are delivered, resolved once at startup
//! - [`StemmaError`] / [`StemmaResult`]: the error taxonomy

mod config;
mod entity;
mod error;
mod event;
mod facet;
mod name;

pub use config::SinkConfig;
pub use entity::{ColumnDef, ColumnGraphProvider, EntityDescriptor, ExprNode, Walk};
pub use error::{ConfigError, LineageError, SinkError, StemmaError, StemmaResult};
pub use event::{
    new_run_id, ExecutionStats, InputDataset, Job, OutputDataset, Run, RunEvent, RunId, RunState,
    UpdateOutcome,
};
pub use facet::{
    merge_facets, ColumnLineage, ColumnLineageFacet, ErrorMessageFacet, ExecutionFacet, Facet,
    FacetMap, InputField, OutputStatisticsFacet, SchemaFacet, SchemaField, COLUMN_LINEAGE_KEY,
    ERROR_MESSAGE_KEY, EXECUTION_FACET_SCHEMA_URL, EXECUTION_KEY, OUTPUT_STATISTICS_KEY, PRODUCER,
    SCHEMA_KEY,
};
pub use name::{QualifiedName, TableRef};
