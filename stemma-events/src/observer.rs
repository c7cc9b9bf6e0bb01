//! Orchestrator lifecycle observer interface.
//!
//! Every lifecycle method the tracker intercepts or forwards is listed here
//! explicitly; there is no implicit attribute-style delegation. A host
//! integration implements this trait for its own progress reporting and hands
//! it to the tracker, which forwards each callback after its own handling.
//!
//! All methods default to no-ops so implementors only write the callbacks
//! they care about.

use stemma_core::{EntityDescriptor, UpdateOutcome};

/// Lifecycle callbacks driven by the orchestrator.
///
/// Ordering contract (not enforced here): a phase's `on_phase_start`
/// precedes its entity callbacks, which precede `on_phase_stop`.
pub trait PipelineObserver: Send {
    /// The evaluation phase begins for a batch of entities.
    fn on_phase_start(&mut self, entities: &[EntityDescriptor]) {
        let _ = entities;
    }

    /// One entity's evaluation starts.
    fn on_entity_start(&mut self, entity: &EntityDescriptor) {
        let _ = entity;
    }

    /// One entity's evaluation finished, successfully or with audit failures.
    fn on_entity_update(&mut self, entity: &EntityDescriptor, outcome: &UpdateOutcome) {
        let _ = (entity, outcome);
    }

    /// The evaluation phase ends.
    fn on_phase_stop(&mut self, success: bool) {
        let _ = success;
    }

    // Phases the tracker passes through without interception.

    fn on_creation_start(&mut self, entities: &[EntityDescriptor]) {
        let _ = entities;
    }

    fn on_creation_update(&mut self, entity: &EntityDescriptor) {
        let _ = entity;
    }

    fn on_creation_stop(&mut self, success: bool) {
        let _ = success;
    }

    fn on_promotion_start(&mut self, entities: &[EntityDescriptor]) {
        let _ = entities;
    }

    fn on_promotion_update(&mut self, entity: &EntityDescriptor, promoted: bool) {
        let _ = (entity, promoted);
    }

    fn on_promotion_stop(&mut self, success: bool) {
        let _ = success;
    }
}
