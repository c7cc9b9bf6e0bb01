//! Process-wide installation.
//!
//! Composition is explicit: resolve a [`SinkConfig`], build a tracker with
//! [`RunTracker::from_config`], and hand it to whatever drives the
//! orchestrator callbacks. For host runtimes that need a process-wide
//! configuration, [`install`] stores one exactly once behind an idempotent
//! init check - it reports whether this call performed the initialization
//! instead of relying on a bare boolean flag.

use crate::emitter::LineageEmitter;
use crate::sink::sink_for;
use crate::tracker::RunTracker;
use once_cell::sync::OnceCell;
use stemma_core::{SinkConfig, StemmaResult};

static INSTALLED: OnceCell<SinkConfig> = OnceCell::new();

impl RunTracker {
    /// Build a tracker delivering to the sink a configuration names.
    ///
    /// # Errors
    ///
    /// Returns a config error for a missing or unsupported sink target -
    /// fatal before any event is built.
    pub fn from_config(config: &SinkConfig) -> StemmaResult<Self> {
        let sink = sink_for(config)?;
        Ok(Self::new(LineageEmitter::new(sink, config.namespace.clone())))
    }
}

/// Install a process-wide sink configuration.
///
/// Validates the configuration (including transport selection) and stores it
/// once. Returns `Ok(true)` when this call performed the initialization and
/// `Ok(false)` when a configuration was already installed; the stored
/// configuration is never replaced.
///
/// # Errors
///
/// Returns a config error for a missing sink target or unsupported scheme.
pub fn install(config: SinkConfig) -> StemmaResult<bool> {
    // Surface configuration problems before any event is ever built, even
    // when another install already won the race.
    sink_for(&config)?;
    Ok(INSTALLED.set(config).is_ok())
}

/// Install from environment variables (`STEMMA_SINK_URL` et al.).
pub fn install_from_env() -> StemmaResult<bool> {
    let config = SinkConfig::from_env().map_err(stemma_core::StemmaError::from)?;
    install(config)
}

/// Whether a process-wide configuration has been installed.
pub fn is_installed() -> bool {
    INSTALLED.get().is_some()
}

/// The installed configuration, when present.
pub fn installed_config() -> Option<&'static SinkConfig> {
    INSTALLED.get()
}

// =============================================================================
// TESTS
// =============================================================================
