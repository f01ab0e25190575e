use crate::queue::ExecutionQueue;
use crate::registry::IntentRegistry;

/// Shared application state for gateway handlers
#[derive(Clone)]
pub struct AppState {
    /// Pending intents and their live-status sinks
    pub registry: IntentRegistry,

    /// Enqueue handle for the execution pipeline
    pub queue: ExecutionQueue,
}

impl AppState {
    pub fn new(registry: IntentRegistry, queue: ExecutionQueue) -> Self {
        Self { registry, queue }
    }
}
