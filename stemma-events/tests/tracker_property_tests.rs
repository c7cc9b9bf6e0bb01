//! Property tests for the run-tracking state machine.
//!
//! For any interleaving of start/update callbacks followed by a phase stop,
//! every started entity name must end with a terminal event, terminal events
//! must match the most recent start's run id, and no run may survive the
//! stop sweep.

use proptest::prelude::*;
use std::collections::HashMap;
use stemma_events::{LineageEmitter, RunState, RunTracker, UpdateOutcome};
use stemma_test_utils::{ColumnDef, EntityDescriptor, QualifiedName, RecordingSink};

const ENTITY_NAMES: [&str; 3] = ["alpha", "beta", "gamma"];

#[derive(Debug, Clone)]
enum Op {
    Start(usize),
    Update { entity: usize, audits_failed: u32 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..ENTITY_NAMES.len()).prop_map(Op::Start),
        ((0..ENTITY_NAMES.len()), 0..3u32).prop_map(|(entity, audits_failed)| Op::Update {
            entity,
            audits_failed
        }),
    ]
}

fn entity(index: usize) -> EntityDescriptor {
    let name = ENTITY_NAMES[index];
    EntityDescriptor::new(name, QualifiedName::new(["schema", name]))
        .with_columns(vec![ColumnDef::new("id", "INT")])
}

proptest! {
    #[test]
    fn every_started_run_reaches_exactly_one_terminal_event(
        ops in proptest::collection::vec(op_strategy(), 0..24),
        success in any::<bool>(),
    ) {
        let sink = RecordingSink::new();
        let mut tracker = RunTracker::new(LineageEmitter::new(Box::new(sink.clone()), "test"));

        let entities: Vec<EntityDescriptor> = (0..ENTITY_NAMES.len()).map(entity).collect();
        tracker.on_phase_start(&entities);

        for op in &ops {
            match op {
                Op::Start(i) => tracker.on_entity_start(&entities[*i]).unwrap(),
                Op::Update { entity: i, audits_failed } => {
                    let outcome = UpdateOutcome {
                        audits_failed: *audits_failed,
                        ..UpdateOutcome::default()
                    };
                    tracker.on_entity_update(&entities[*i], &outcome).unwrap();
                }
            }
        }
        tracker.on_phase_stop(success).unwrap();

        // Nothing survives the stop sweep.
        prop_assert_eq!(tracker.active_runs(), 0);

        // Replay the emitted stream per entity name: a terminal event must
        // carry the run id of the most recent start, and every name that
        // started must end terminated.
        let mut current: HashMap<String, Option<uuid::Uuid>> = HashMap::new();
        let mut started: HashMap<String, usize> = HashMap::new();
        let mut terminated: HashMap<String, usize> = HashMap::new();

        for event in sink.events() {
            let name = event.job.name.clone();
            match event.event_type {
                RunState::Start => {
                    *started.entry(name.clone()).or_default() += 1;
                    // A new start may supersede an unterminated run.
                    current.insert(name, Some(event.run.run_id));
                }
                RunState::Complete | RunState::Fail => {
                    *terminated.entry(name.clone()).or_default() += 1;
                    let active = current.get_mut(&name).and_then(Option::take);
                    prop_assert_eq!(active, Some(event.run.run_id));
                }
            }
        }

        for (name, slot) in &current {
            prop_assert!(slot.is_none(), "run for {} never terminated", name);
        }
        for (name, starts) in &started {
            let terms = terminated.get(name).copied().unwrap_or(0);
            prop_assert!(terms >= 1, "{} started but never terminated", name);
            prop_assert!(terms <= *starts, "{} terminated more often than it started", name);
        }
        // Names that never started never terminate.
        for name in terminated.keys() {
            prop_assert!(started.contains_key(name));
        }
    }
}
