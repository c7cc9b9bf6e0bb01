//! Stemma Events - Run Tracking and Lineage Emission
//!
//! This crate turns orchestrator lifecycle callbacks into structured lineage
//! events describing what ran, when, with what inputs and outputs, and with
//! what column-level data flow.
//!
//! # Architecture
//!
//! ```text
//! orchestrator callback
//!        │
//!        ▼
//!   RunTracker ──► datasets ──► lineage walker
//!        │
//!        ▼
//!  LineageEmitter ──► EventSink (console / http)
//! ```
//!
//! - [`RunTracker`]: the state machine correlating start/update/stop
//!   callbacks into START/COMPLETE/FAIL event triples
//! - [`column_lineage`]: best-effort column-level lineage extraction
//! - [`output_dataset`] / [`input_datasets`]: facet-annotated dataset records
//! - [`LineageEmitter`]: assembles and delivers the three event shapes
//! - [`EventSink`]: the delivery boundary, with console and HTTP transports
//! - [`PipelineObserver`]: explicit pass-through to a host's own progress
//!   reporting
//! - [`install`]: optional process-wide configuration with an idempotent
//!   init check

mod datasets;
mod emitter;
mod install;
mod lineage;
mod observer;
mod sink;
mod tracker;

pub use datasets::{input_datasets, output_dataset, schema_facet, table_name};
pub use emitter::LineageEmitter;
pub use install::{install, install_from_env, installed_config, is_installed};
pub use lineage::column_lineage;
pub use observer::PipelineObserver;
pub use sink::{sink_for, ConsoleSink, EventSink, FailingSink, HttpSink, RecordingSink};
pub use tracker::RunTracker;

// Re-export core types for convenience
pub use stemma_core::{
    ColumnDef, ColumnGraphProvider, EntityDescriptor, ExecutionStats, ExprNode, QualifiedName,
    RunEvent, RunId, RunState, SinkConfig, SinkError, StemmaError, StemmaResult, TableRef,
    UpdateOutcome,
};
