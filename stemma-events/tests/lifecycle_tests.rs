//! End-to-end lifecycle scenarios through the tracker, emitter, and walker.

use stemma_events::{
    LineageEmitter, RunState, RunTracker, UpdateOutcome,
};
use stemma_test_utils::{processed_data, source_data, RecordingSink};

fn tracker_with_recorder() -> (RunTracker, RecordingSink) {
    let sink = RecordingSink::new();
    let tracker = RunTracker::new(LineageEmitter::new(Box::new(sink.clone()), "test"));
    (tracker, sink)
}

#[test]
fn two_model_pipeline_emits_four_events() {
    let (mut tracker, sink) = tracker_with_recorder();
    let source = source_data();
    let processed = processed_data();

    tracker.on_phase_start(&[source.clone(), processed.clone()]);

    tracker.on_entity_start(&source).unwrap();
    tracker
        .on_entity_update(&source, &UpdateOutcome::success().with_duration_ms(120))
        .unwrap();

    tracker.on_entity_start(&processed).unwrap();
    tracker
        .on_entity_update(&processed, &UpdateOutcome::success().with_duration_ms(340))
        .unwrap();

    tracker.on_phase_stop(true).unwrap();

    let events = sink.events();
    assert_eq!(events.len(), 4);

    let starts: Vec<_> = events
        .iter()
        .filter(|e| e.event_type == RunState::Start)
        .collect();
    let completes: Vec<_> = events
        .iter()
        .filter(|e| e.event_type == RunState::Complete)
        .collect();
    assert_eq!(starts.len(), 2);
    assert_eq!(completes.len(), 2);

    // processed_data's START: one input, three schema fields on the output.
    let processed_start = starts
        .iter()
        .find(|e| e.job.name == "processed_data")
        .unwrap();
    assert_eq!(processed_start.inputs.len(), 1);
    assert_eq!(processed_start.inputs[0].name, "source_data");

    let json = serde_json::to_value(processed_start).unwrap();
    let fields = json["outputs"][0]["facets"]["schema"]["fields"]
        .as_array()
        .unwrap();
    assert_eq!(fields.len(), 3);

    // Column lineage traced every column back to source_data.
    let lineage = &json["outputs"][0]["facets"]["columnLineage"]["fields"];
    for column in ["id", "name", "name_upper"] {
        let inputs = lineage[column]["inputFields"].as_array().unwrap();
        assert_eq!(inputs.len(), 1, "column {column}");
        assert_eq!(inputs[0]["name"], "schema.source_data");
    }
    assert_eq!(lineage["name_upper"]["inputFields"][0]["field"], "name");
}

#[test]
fn start_update_pair_shares_run_id_with_ordered_timestamps() {
    let (mut tracker, sink) = tracker_with_recorder();
    let source = source_data();

    tracker.on_entity_start(&source).unwrap();
    tracker
        .on_entity_update(&source, &UpdateOutcome::success())
        .unwrap();

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].event_type, RunState::Start);
    assert_eq!(events[1].event_type, RunState::Complete);
    assert_eq!(events[0].run.run_id, events[1].run.run_id);
    assert!(events[1].event_time >= events[0].event_time);
}

#[test]
fn interrupted_phase_fails_unfinished_runs() {
    let (mut tracker, sink) = tracker_with_recorder();
    let source = source_data();
    let processed = processed_data();

    tracker.on_phase_start(&[source.clone(), processed.clone()]);
    tracker.on_entity_start(&source).unwrap();
    tracker
        .on_entity_update(&source, &UpdateOutcome::success())
        .unwrap();
    tracker.on_entity_start(&processed).unwrap();
    // The phase dies before processed_data reports back.
    tracker.on_phase_stop(false).unwrap();

    let events = sink.events();
    assert_eq!(events.len(), 4);

    let fail = events
        .iter()
        .find(|e| e.event_type == RunState::Fail)
        .unwrap();
    assert_eq!(fail.job.name, "processed_data");
    let json = serde_json::to_value(fail).unwrap();
    assert!(json["run"]["facets"]["errorMessage"]["message"]
        .as_str()
        .unwrap()
        .contains("interrupted"));

    // The failed run id matches the orphaned START.
    let orphan_start = events
        .iter()
        .find(|e| e.event_type == RunState::Start && e.job.name == "processed_data")
        .unwrap();
    assert_eq!(fail.run.run_id, orphan_start.run.run_id);
}

#[test]
fn audit_failures_mention_the_count() {
    let (mut tracker, sink) = tracker_with_recorder();
    let source = source_data();

    tracker.on_entity_start(&source).unwrap();
    tracker
        .on_entity_update(&source, &UpdateOutcome::audit_failure(3))
        .unwrap();

    let events = sink.events();
    assert_eq!(events[1].event_type, RunState::Fail);
    let json = serde_json::to_value(&events[1]).unwrap();
    let message = json["run"]["facets"]["errorMessage"]["message"]
        .as_str()
        .unwrap();
    assert!(message.contains('3'));

    // Zero failed audits completes instead.
    tracker.on_entity_start(&source).unwrap();
    tracker
        .on_entity_update(&source, &UpdateOutcome::success())
        .unwrap();
    assert_eq!(sink.events()[3].event_type, RunState::Complete);
}

#[test]
fn complete_event_carries_statistics() {
    use stemma_test_utils::ExecutionStats;

    let (mut tracker, sink) = tracker_with_recorder();
    let source = source_data();

    tracker.on_entity_start(&source).unwrap();
    tracker
        .on_entity_update(
            &source,
            &UpdateOutcome::success()
                .with_duration_ms(1000)
                .with_stats(ExecutionStats {
                    rows_processed: Some(500),
                    bytes_processed: Some(65536),
                }),
        )
        .unwrap();

    let json = serde_json::to_value(&sink.events()[1]).unwrap();
    let execution = &json["run"]["facets"]["stemma_execution"];
    assert_eq!(execution["durationMs"], 1000);
    assert_eq!(execution["rowsProcessed"], 500);
    assert_eq!(execution["bytesProcessed"], 65536);
    assert_eq!(
        json["outputs"][0]["facets"]["outputStatistics"]["rowCount"],
        500
    );
}

#[test]
fn events_serialize_with_producer_and_namespace() {
    let (mut tracker, sink) = tracker_with_recorder();
    tracker.on_entity_start(&source_data()).unwrap();

    let json = serde_json::to_value(&sink.events()[0]).unwrap();
    assert_eq!(json["producer"], "stemma");
    assert_eq!(json["job"]["namespace"], "test");
    assert_eq!(json["eventType"], "START");
}
