//! Run tracking state machine.
//!
//! Correlates the orchestrator's asynchronous lifecycle callbacks into
//! well-formed START/COMPLETE/FAIL event sequences. Per entity name the state
//! is `absent -> active -> absent`; there is no resting "completed" state, a
//! new start always creates a fresh run record.
//!
//! The tracker is driven by a single orchestrator thread per pipeline run and
//! takes `&mut self` accordingly. Callers that parallelize entity evaluation
//! must wrap the tracker in a mutual-exclusion lock.

use crate::emitter::LineageEmitter;
use crate::observer::PipelineObserver;
use std::collections::HashMap;
use stemma_core::{new_run_id, EntityDescriptor, RunId, SinkError, UpdateOutcome};

/// FAIL message for runs swept at an unsuccessful phase stop.
const INTERRUPTED_MESSAGE: &str = "evaluation interrupted";
/// FAIL message for runs left active despite a reported successful stop.
const UNKNOWN_ERROR_MESSAGE: &str = "unknown error";

/// Tracks in-flight entity evaluations and emits lifecycle events.
///
/// Guarantee: every entity name that reaches [`RunTracker::on_entity_start`]
/// eventually emits exactly one terminal event, even when the orchestrator
/// never delivers an update - the phase-stop sweep is the safety net.
///
/// Emission failures are not retried; they propagate to the caller of the
/// lifecycle callback. Tracking state is still advanced as if emission
/// succeeded, so no stale run leaks into later callbacks.
pub struct RunTracker {
    emitter: LineageEmitter,
    inner: Option<Box<dyn PipelineObserver>>,
    /// Active run id per entity name. At most one per name.
    active: HashMap<String, RunId>,
    /// Last-seen descriptor per in-flight name, kept so a FAIL can be
    /// emitted when no descriptor accompanies the terminating callback.
    descriptors: HashMap<String, EntityDescriptor>,
}

impl RunTracker {
    pub fn new(emitter: LineageEmitter) -> Self {
        Self {
            emitter,
            inner: None,
            active: HashMap::new(),
            descriptors: HashMap::new(),
        }
    }

    /// Attach an inner observer every callback is forwarded to.
    pub fn with_observer(mut self, inner: Box<dyn PipelineObserver>) -> Self {
        self.inner = Some(inner);
        self
    }

    /// Number of runs currently active.
    pub fn active_runs(&self) -> usize {
        self.active.len()
    }

    /// The evaluation phase begins: record descriptors for later lookup.
    /// Starts no runs and emits nothing.
    pub fn on_phase_start(&mut self, entities: &[EntityDescriptor]) {
        for entity in entities {
            self.descriptors.insert(entity.name.clone(), entity.clone());
        }
        if let Some(inner) = self.inner.as_mut() {
            inner.on_phase_start(entities);
        }
    }

    /// One entity's evaluation starts: generate a fresh run id and emit START.
    ///
    /// An already-active name is silently superseded - the old run id is
    /// discarded and the new attempt takes over (documented overwrite
    /// policy).
    ///
    /// # Errors
    ///
    /// Returns the sink's delivery error; the run is tracked regardless.
    pub fn on_entity_start(&mut self, entity: &EntityDescriptor) -> Result<(), SinkError> {
        let run_id = new_run_id();
        if let Some(superseded) = self.active.insert(entity.name.clone(), run_id) {
            tracing::debug!(
                entity = %entity.name,
                %superseded,
                "new start superseded an active run"
            );
        }
        self.descriptors.insert(entity.name.clone(), entity.clone());

        let result = self.emitter.emit_start(entity, run_id);
        if let Err(error) = &result {
            tracing::warn!(entity = %entity.name, %error, "failed to emit START event");
        }
        if let Some(inner) = self.inner.as_mut() {
            inner.on_entity_start(entity);
        }
        result
    }

    /// One entity's evaluation finished: emit the terminal event.
    ///
    /// An update with no matching active run is a no-op - it does not
    /// correspond to a tracked start. Audit failures (count > 0) terminate
    /// the run with FAIL; otherwise COMPLETE carries the outcome's duration
    /// and statistics.
    ///
    /// # Errors
    ///
    /// Returns the sink's delivery error; the run is untracked regardless.
    pub fn on_entity_update(
        &mut self,
        entity: &EntityDescriptor,
        outcome: &UpdateOutcome,
    ) -> Result<(), SinkError> {
        let result = match self.active.remove(&entity.name) {
            None => Ok(()),
            Some(run_id) if outcome.audits_failed > 0 => self.emitter.emit_fail(
                &entity.name,
                run_id,
                &format!(
                    "Audit failed: {} audit(s) failed",
                    outcome.audits_failed
                ),
            ),
            Some(run_id) => self.emitter.emit_complete(entity, run_id, outcome),
        };
        if let Err(error) = &result {
            tracing::warn!(entity = %entity.name, %error, "failed to emit terminal event");
        }
        if let Some(inner) = self.inner.as_mut() {
            inner.on_entity_update(entity, outcome);
        }
        result
    }

    /// The evaluation phase ends: sweep runs that started but never updated.
    ///
    /// Each still-active run gets a FAIL - "evaluation interrupted" when the
    /// phase was unsuccessful, "unknown error" when the phase reported
    /// success yet an update never arrived. All tracked state is cleared
    /// unconditionally so no run leaks into a subsequent phase.
    ///
    /// # Errors
    ///
    /// Returns the first delivery error encountered; the sweep still visits
    /// every remaining run and state is cleared either way.
    pub fn on_phase_stop(&mut self, success: bool) -> Result<(), SinkError> {
        let active = std::mem::take(&mut self.active);
        let descriptors = std::mem::take(&mut self.descriptors);

        let message = if success {
            UNKNOWN_ERROR_MESSAGE
        } else {
            INTERRUPTED_MESSAGE
        };

        let mut result = Ok(());
        for (name, run_id) in active {
            if !descriptors.contains_key(&name) {
                continue;
            }
            tracing::warn!(entity = %name, %run_id, reason = message, "run never reached a terminal update");
            if let Err(error) = self.emitter.emit_fail(&name, run_id, message) {
                if result.is_ok() {
                    result = Err(error);
                }
            }
        }

        if let Some(inner) = self.inner.as_mut() {
            inner.on_phase_stop(success);
        }
        result
    }

    // Pass-through phases: forwarded to the inner observer untouched.

    pub fn on_creation_start(&mut self, entities: &[EntityDescriptor]) {
        if let Some(inner) = self.inner.as_mut() {
            inner.on_creation_start(entities);
        }
    }

    pub fn on_creation_update(&mut self, entity: &EntityDescriptor) {
        if let Some(inner) = self.inner.as_mut() {
            inner.on_creation_update(entity);
        }
    }

    pub fn on_creation_stop(&mut self, success: bool) {
        if let Some(inner) = self.inner.as_mut() {
            inner.on_creation_stop(success);
        }
    }

    pub fn on_promotion_start(&mut self, entities: &[EntityDescriptor]) {
        if let Some(inner) = self.inner.as_mut() {
            inner.on_promotion_start(entities);
        }
    }

    pub fn on_promotion_update(&mut self, entity: &EntityDescriptor, promoted: bool) {
        if let Some(inner) = self.inner.as_mut() {
            inner.on_promotion_update(entity, promoted);
        }
    }

    pub fn on_promotion_stop(&mut self, success: bool) {
        if let Some(inner) = self.inner.as_mut() {
            inner.on_promotion_stop(success);
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
