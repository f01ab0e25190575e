//! Bounded-concurrency execution queue.
//!
//! Decouples submission from execution: `enqueue` returns as soon as the
//! job is queued. A dispatcher task admits at most `concurrency` jobs at
//! once (semaphore-bounded) and each job retries with exponential backoff
//! up to `max_attempts` total. Delivery is at-least-once; the worker's
//! idempotent terminal upsert absorbs the duplicates.

use std::sync::Arc;

use tokio::sync::{mpsc, Semaphore};
use tracing::{error, info, warn};

use crate::config::QueueConfig;
use crate::domain::OrderIntent;
use crate::error::{Result, SwaplaneError};
use crate::worker::ExecutionWorker;

#[derive(Clone)]
pub struct ExecutionQueue {
    tx: mpsc::UnboundedSender<OrderIntent>,
}

impl ExecutionQueue {
    /// Spawn the dispatcher and return the enqueue handle.
    pub fn start(worker: Arc<ExecutionWorker>, config: QueueConfig) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<OrderIntent>();
        let semaphore = Arc::new(Semaphore::new(config.concurrency.max(1)));

        tokio::spawn(async move {
            while let Some(intent) = rx.recv().await {
                let worker = worker.clone();
                let policy = config.clone();
                let semaphore = semaphore.clone();
                tokio::spawn(async move {
                    run_attempts(worker, intent, policy, semaphore).await;
                });
            }
            info!("execution queue dispatcher stopped");
        });

        Self { tx }
    }

    /// Queue a job for execution. "Queued", not "executed": the returned
    /// Ok only means the dispatcher will see it.
    pub fn enqueue(&self, intent: OrderIntent) -> Result<()> {
        self.tx
            .send(intent)
            .map_err(|_| SwaplaneError::Infrastructure("execution queue is closed".into()))
    }
}

/// Retry loop for one job. Every failure kind is retried alike, slippage
/// included; a re-quote may or may not reproduce it.
async fn run_attempts(
    worker: Arc<ExecutionWorker>,
    intent: OrderIntent,
    policy: QueueConfig,
    semaphore: Arc<Semaphore>,
) {
    for attempt in 1..=policy.max_attempts.max(1) {
        // One slot per executing attempt. Waiting here is what bounds
        // concurrency; the permit is dropped before any backoff sleep so
        // a retrying job does not starve queued healthy orders.
        let permit = match semaphore.clone().acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => return,
        };
        let result = worker.execute(&intent).await;
        drop(permit);

        match result {
            Ok(()) => return,
            Err(e) if attempt < policy.max_attempts => {
                let delay = policy.backoff_duration(attempt);
                warn!(
                    order_id = %intent.order_id,
                    attempt,
                    error = %e,
                    "order attempt failed, retrying in {:?}",
                    delay
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => {
                // Attempts exhausted: the last failed event and record
                // already went out; the job just leaves scheduling.
                error!(
                    order_id = %intent.order_id,
                    attempts = policy.max_attempts,
                    error = %e,
                    "order dropped after exhausting retries"
                );
            }
        }
    }
}
