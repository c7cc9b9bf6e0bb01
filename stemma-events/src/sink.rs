//! Event sink boundary and transports.
//!
//! The sink is the single delivery interface the core talks to. It may fail
//! with a delivery error; the core propagates that error to the lifecycle
//! callback's caller without interpreting or retrying it. Any retry policy
//! belongs behind this boundary.

use stemma_core::{ConfigError, RunEvent, SinkConfig, SinkError};

/// Delivery interface for lifecycle events.
pub trait EventSink: Send + Sync {
    /// Deliver one event.
    ///
    /// # Errors
    ///
    /// Returns a [`SinkError`] when the event cannot be serialized or the
    /// transport rejects it.
    fn emit(&self, event: &RunEvent) -> Result<(), SinkError>;
}

/// Sink that prints events as JSON lines on stdout.
///
/// Selected by `console://` targets; useful for local runs and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl EventSink for ConsoleSink {
    fn emit(&self, event: &RunEvent) -> Result<(), SinkError> {
        let json = serde_json::to_string(event).map_err(|e| SinkError::Serialization {
            reason: e.to_string(),
        })?;
        println!("{json}");
        Ok(())
    }
}

/// Sink that posts events to a lineage collector over HTTP.
pub struct HttpSink {
    client: reqwest::blocking::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpSink {
    /// Collector path appended to the configured base URL.
    pub const LINEAGE_PATH: &'static str = "/api/v1/lineage";

    pub fn new(base_url: &str, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), Self::LINEAGE_PATH),
            api_key,
        }
    }

    /// The full endpoint events are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl EventSink for HttpSink {
    fn emit(&self, event: &RunEvent) -> Result<(), SinkError> {
        let mut request = self.client.post(&self.endpoint).json(event);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().map_err(|e| SinkError::Delivery {
            target: self.endpoint.clone(),
            reason: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            tracing::warn!(status = status.as_u16(), %body, "sink rejected event");
            return Err(SinkError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

/// Build the sink a configuration names.
///
/// `console://` targets get a [`ConsoleSink`]; `http://`/`https://` targets
/// get an [`HttpSink`]. Anything else is a configuration error, surfaced
/// before any event is built.
pub fn sink_for(config: &SinkConfig) -> Result<Box<dyn EventSink>, ConfigError> {
    config.validate()?;

    if config.url.starts_with("console://") {
        Ok(Box::new(ConsoleSink))
    } else if config.url.starts_with("http://") || config.url.starts_with("https://") {
        Ok(Box::new(HttpSink::new(&config.url, config.api_key.clone())))
    } else {
        Err(ConfigError::InvalidValue {
            field: "url".to_string(),
            value: config.url.clone(),
            reason: "expected a console://, http:// or https:// target".to_string(),
        })
    }
}

// =============================================================================
// TEST SINKS
// =============================================================================

use std::sync::{Arc, Mutex};

/// Sink that records every emitted event in memory.
///
/// Shared by the workspace test suites through `stemma-test-utils`; cloning
/// shares the underlying recording.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<RunEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far, in emission order.
    pub fn events(&self) -> Vec<RunEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn len(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: &RunEvent) -> Result<(), SinkError> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event.clone());
        Ok(())
    }
}

/// Sink that rejects every event, for delivery-failure tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingSink;

impl EventSink for FailingSink {
    fn emit(&self, _event: &RunEvent) -> Result<(), SinkError> {
        Err(SinkError::Delivery {
            target: "failing://".to_string(),
            reason: "sink configured to fail".to_string(),
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
