pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod oracle;
pub mod publisher;
pub mod queue;
pub mod registry;
pub mod store;
pub mod worker;

pub use config::AppConfig;
pub use domain::{OrderIntent, OrderRecord, OrderState, Quote, TerminalStatus};
pub use error::{Result, SwaplaneError};
pub use oracle::{FixedVariance, MockDexRouter, PriceOracle, UniformVariance, VarianceSource};
pub use publisher::{StatusEvent, StatusPublisher};
pub use queue::ExecutionQueue;
pub use registry::{IntentRegistry, StatusSink};
pub use store::{MemoryOrderStore, OrderStore};
pub use worker::ExecutionWorker;

use std::sync::Arc;

/// Wire the pipeline together: registry, publisher, worker, queue.
/// Returns the gateway state ready to serve.
pub fn build_pipeline(
    config: &AppConfig,
    oracle: Arc<dyn PriceOracle>,
    variance: Arc<dyn VarianceSource>,
    store: Arc<dyn OrderStore>,
) -> api::AppState {
    let registry = IntentRegistry::new();
    let publisher = StatusPublisher::new(registry.clone());
    let worker = Arc::new(ExecutionWorker::new(
        publisher,
        oracle,
        variance,
        store,
        config.execution.clone(),
    ));
    let queue = ExecutionQueue::start(worker, config.queue.clone());
    api::AppState::new(registry, queue)
}
