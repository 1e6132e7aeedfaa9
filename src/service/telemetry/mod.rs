pub mod trace;

use std::{collections::BTreeMap, ops::Deref, sync::Arc};

// Traits.

/// Generic telemetry sink trait that clients must implement.
///
/// Events are a name plus a flat set of string properties.
pub trait GenericTelemetryClient: Send + Sync + 'static {
    /// Records a named event.
    fn track_event(&self, name: &str, properties: &BTreeMap<String, String>);
}

// Structs.

/// Telemetry client for the application.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct TelemetryClient {
    inner: Arc<dyn GenericTelemetryClient>,
}

impl Deref for TelemetryClient {
    type Target = dyn GenericTelemetryClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl TelemetryClient {
    pub fn new(inner: Arc<dyn GenericTelemetryClient>) -> Self {
        Self { inner }
    }
}
