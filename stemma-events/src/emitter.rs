//! Lifecycle event assembly and emission.
//!
//! The emitter owns the sink and the namespace and assembles the three event
//! shapes: START (inputs plus the bare output), COMPLETE (execution facets on
//! the run, statistics on the re-derived output), FAIL (error facet only, no
//! datasets). Timestamps are taken at emission time in UTC, so a run's
//! terminal event never predates its START within a single driver.

use crate::datasets::{input_datasets, output_dataset};
use crate::sink::EventSink;
use chrono::Utc;
use stemma_core::{
    EntityDescriptor, ErrorMessageFacet, ExecutionFacet, Facet, FacetMap, Job,
    OutputStatisticsFacet, Run, RunEvent, RunId, RunState, SinkError, UpdateOutcome,
    ERROR_MESSAGE_KEY, EXECUTION_KEY, OUTPUT_STATISTICS_KEY, PRODUCER,
};

/// Emits lifecycle events for entity evaluations.
pub struct LineageEmitter {
    sink: Box<dyn EventSink>,
    namespace: String,
}

impl LineageEmitter {
    pub fn new(sink: Box<dyn EventSink>, namespace: impl Into<String>) -> Self {
        Self {
            sink,
            namespace: namespace.into(),
        }
    }

    /// The namespace stamped on jobs and datasets.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Emit a START event for an entity evaluation.
    ///
    /// Inputs come from the entity's parents; the output carries schema and
    /// lineage facets but no statistics, which are not yet known.
    pub fn emit_start(&self, entity: &EntityDescriptor, run_id: RunId) -> Result<(), SinkError> {
        let event = RunEvent {
            event_type: RunState::Start,
            event_time: Utc::now(),
            run: Run::new(run_id),
            job: Job::new(&self.namespace, &entity.name),
            inputs: input_datasets(entity, &self.namespace),
            outputs: output_dataset(entity, &self.namespace, FacetMap::new())
                .into_iter()
                .collect(),
            producer: PRODUCER.to_string(),
        };
        self.sink.emit(&event)
    }

    /// Emit a COMPLETE event for an entity evaluation.
    ///
    /// Run facets carry duration and processing statistics when known; the
    /// output is re-derived with an output-statistics facet attached.
    pub fn emit_complete(
        &self,
        entity: &EntityDescriptor,
        run_id: RunId,
        outcome: &UpdateOutcome,
    ) -> Result<(), SinkError> {
        let mut run_facets = FacetMap::new();
        if let Some(execution) = ExecutionFacet::from_outcome(outcome) {
            run_facets.insert(EXECUTION_KEY.to_string(), Facet::Execution(execution));
        }

        let mut output_facets = FacetMap::new();
        if let Some(stats) = outcome
            .stats
            .as_ref()
            .and_then(OutputStatisticsFacet::from_stats)
        {
            output_facets.insert(
                OUTPUT_STATISTICS_KEY.to_string(),
                Facet::OutputStatistics(stats),
            );
        }

        let event = RunEvent {
            event_type: RunState::Complete,
            event_time: Utc::now(),
            run: Run::with_facets(run_id, run_facets),
            job: Job::new(&self.namespace, &entity.name),
            inputs: Vec::new(),
            outputs: output_dataset(entity, &self.namespace, output_facets)
                .into_iter()
                .collect(),
            producer: PRODUCER.to_string(),
        };
        self.sink.emit(&event)
    }

    /// Emit a FAIL event for an entity evaluation.
    ///
    /// Failure is reported with an error-message facet and no datasets, since
    /// dataset derivation itself may be the source of the failure.
    pub fn emit_fail(
        &self,
        entity_name: &str,
        run_id: RunId,
        message: &str,
    ) -> Result<(), SinkError> {
        let mut run_facets = FacetMap::new();
        run_facets.insert(
            ERROR_MESSAGE_KEY.to_string(),
            Facet::ErrorMessage(ErrorMessageFacet::new(message)),
        );

        let event = RunEvent {
            event_type: RunState::Fail,
            event_time: Utc::now(),
            run: Run::with_facets(run_id, run_facets),
            job: Job::new(&self.namespace, entity_name),
            inputs: Vec::new(),
            outputs: Vec::new(),
            producer: PRODUCER.to_string(),
        };
        self.sink.emit(&event)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::RecordingSink;
    use stemma_core::{new_run_id, ColumnDef, ExecutionStats, QualifiedName, SCHEMA_KEY};

    fn emitter_with_recorder() -> (LineageEmitter, RecordingSink) {
        let sink = RecordingSink::new();
        let emitter = LineageEmitter::new(Box::new(sink.clone()), "test");
        (emitter, sink)
    }

    fn entity() -> EntityDescriptor {
        EntityDescriptor::new(
            "test_model",
            QualifiedName::new(["catalog", "schema", "test_model"]),
        )
        .with_columns(vec![
            ColumnDef::new("id", "INT"),
            ColumnDef::new("name", "VARCHAR"),
        ])
        .with_parents(["parent_model"])
    }

    #[test]
    fn test_start_event_shape() {
        let (emitter, sink) = emitter_with_recorder();
        let run_id = new_run_id();

        emitter.emit_start(&entity(), run_id).unwrap();

        let events = sink.events();
        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event.event_type, RunState::Start);
        assert_eq!(event.run.run_id, run_id);
        assert_eq!(event.job.namespace, "test");
        assert_eq!(event.job.name, "test_model");
        assert_eq!(event.inputs.len(), 1);
        assert_eq!(event.outputs.len(), 1);
        assert!(event.run.facets.is_empty());
        // Statistics are unknown at start.
        assert!(!event.outputs[0].facets.contains_key(OUTPUT_STATISTICS_KEY));
    }

    #[test]
    fn test_complete_event_carries_execution_and_statistics() {
        let (emitter, sink) = emitter_with_recorder();
        let outcome = UpdateOutcome::success()
            .with_duration_ms(1000)
            .with_stats(ExecutionStats {
                rows_processed: Some(5),
                bytes_processed: None,
            });

        emitter
            .emit_complete(&entity(), new_run_id(), &outcome)
            .unwrap();

        let event = &sink.events()[0];
        assert_eq!(event.event_type, RunState::Complete);
        assert!(event.run.facets.contains_key(EXECUTION_KEY));
        assert!(event.inputs.is_empty());
        let output = &event.outputs[0];
        assert!(output.facets.contains_key(SCHEMA_KEY));
        assert!(output.facets.contains_key(OUTPUT_STATISTICS_KEY));
    }

    #[test]
    fn test_complete_event_without_measurements_has_no_run_facets() {
        let (emitter, sink) = emitter_with_recorder();

        emitter
            .emit_complete(&entity(), new_run_id(), &UpdateOutcome::success())
            .unwrap();

        let event = &sink.events()[0];
        assert!(event.run.facets.is_empty());
        assert!(!event.outputs[0].facets.contains_key(OUTPUT_STATISTICS_KEY));
    }

    #[test]
    fn test_fail_event_has_error_facet_and_no_datasets() {
        let (emitter, sink) = emitter_with_recorder();

        emitter
            .emit_fail("test_model", new_run_id(), "Audit failed: 2 audit(s) failed")
            .unwrap();

        let event = &sink.events()[0];
        assert_eq!(event.event_type, RunState::Fail);
        assert!(event.inputs.is_empty());
        assert!(event.outputs.is_empty());
        match &event.run.facets[ERROR_MESSAGE_KEY] {
            Facet::ErrorMessage(facet) => {
                assert!(facet.message.contains("Audit failed"));
                assert_eq!(facet.programming_language, "rust");
            }
            other => panic!("unexpected facet: {other:?}"),
        }
    }

    #[test]
    fn test_non_materialized_entity_start_has_no_outputs() {
        let (emitter, sink) = emitter_with_recorder();
        let audit = entity().not_materialized();

        emitter.emit_start(&audit, new_run_id()).unwrap();

        assert!(sink.events()[0].outputs.is_empty());
    }
}
