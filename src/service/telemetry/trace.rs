//! Telemetry recorded as `tracing` events.
//!
//! With the OpenTelemetry layer installed by the binary, these events are exported with
//! the span they were recorded in.

use std::{collections::BTreeMap, sync::Arc};

use tracing::info;

use super::{GenericTelemetryClient, TelemetryClient};

impl TelemetryClient {
    /// Creates a telemetry client that records events through `tracing`.
    pub fn tracing() -> Self {
        Self {
            inner: Arc::new(TracingTelemetryClient),
        }
    }
}

/// Tracing-backed telemetry sink.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingTelemetryClient;

impl GenericTelemetryClient for TracingTelemetryClient {
    fn track_event(&self, name: &str, properties: &BTreeMap<String, String>) {
        let properties = serde_json::to_string(properties).unwrap_or_default();

        info!(target: "telemetry", event = name, properties = %properties, "Telemetry event `{}`.", name);
    }
}
