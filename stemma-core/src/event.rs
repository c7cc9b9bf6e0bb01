//! Lifecycle event types.
//!
//! A [`RunEvent`] is an immutable fact describing one lifecycle transition of
//! one run: START when evaluation of an entity begins, then exactly one
//! terminal COMPLETE or FAIL. Events serialize to camelCase JSON for the
//! sink's wire format.

use crate::FacetMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Run identifier, generated fresh for every start and never reused.
/// UUIDv7 keeps run ids timestamp-sortable.
pub type RunId = Uuid;

/// Generate a new run identifier.
pub fn new_run_id() -> RunId {
    Uuid::now_v7()
}

/// Lifecycle state carried on an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RunState {
    Start,
    Complete,
    Fail,
}

impl RunState {
    /// COMPLETE and FAIL are terminal; START is not.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Fail)
    }
}

/// The run an event belongs to, with optional run-level facets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Run {
    pub run_id: RunId,
    #[serde(default, skip_serializing_if = "FacetMap::is_empty")]
    pub facets: FacetMap,
}

impl Run {
    /// A run reference with no facets.
    pub fn new(run_id: RunId) -> Self {
        Self {
            run_id,
            facets: FacetMap::new(),
        }
    }

    /// A run reference carrying facets.
    pub fn with_facets(run_id: RunId, facets: FacetMap) -> Self {
        Self { run_id, facets }
    }
}

/// Job identity: the namespace plus the entity name being evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub namespace: String,
    pub name: String,
}

impl Job {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

/// Bare upstream dataset reference attached to START events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDataset {
    pub namespace: String,
    pub name: String,
}

/// Produced dataset with its facets (schema, column lineage, statistics).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputDataset {
    pub namespace: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "FacetMap::is_empty")]
    pub facets: FacetMap,
}

/// One immutable lifecycle event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunEvent {
    pub event_type: RunState,
    pub event_time: DateTime<Utc>,
    pub run: Run,
    pub job: Job,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<InputDataset>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<OutputDataset>,
    pub producer: String,
}

/// Execution statistics reported by the orchestrator with an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ExecutionStats {
    pub rows_processed: Option<i64>,
    pub bytes_processed: Option<i64>,
}

/// Outcome supplied with an entity update callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UpdateOutcome {
    /// Wall-clock evaluation duration, when the orchestrator measured it.
    pub duration_ms: Option<i64>,
    pub audits_passed: u32,
    /// A non-zero count turns the terminal event into FAIL.
    pub audits_failed: u32,
    pub stats: Option<ExecutionStats>,
}

impl UpdateOutcome {
    /// An update with all audits passing and nothing measured.
    pub fn success() -> Self {
        Self::default()
    }

    /// An update reporting failed audits.
    pub fn audit_failure(audits_failed: u32) -> Self {
        Self {
            audits_failed,
            ..Self::default()
        }
    }

    pub fn with_duration_ms(mut self, duration_ms: i64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn with_stats(mut self, stats: ExecutionStats) -> Self {
        self.stats = Some(stats);
        self
    }
}

// =============================================================================
// TESTS
// =============================================================================
