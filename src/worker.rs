//! Execution worker: drives one order through the pipeline state machine.
//!
//! `PENDING → ROUTING → BUILDING → SUBMITTED → CONFIRMED`, or `FAILED`
//! from any non-terminal state once an error is detected. Each run is a
//! single logical sequence; the only suspension points are the oracle
//! call and the two simulated stage delays. Exactly one terminal record
//! is upserted per attempt, even when no client is listening.

use std::sync::Arc;

use rand::distributions::Alphanumeric;
use rand::Rng;
use tokio::time::{sleep, Duration};
use tracing::{debug, error, info};

use crate::config::ExecutionConfig;
use crate::domain::{normalize_token, OrderIntent, OrderRecord};
use crate::error::{Result, SwaplaneError};
use crate::oracle::{PriceOracle, VarianceSource};
use crate::publisher::{StatusEvent, StatusPublisher};
use crate::store::OrderStore;

pub struct ExecutionWorker {
    publisher: StatusPublisher,
    oracle: Arc<dyn PriceOracle>,
    variance: Arc<dyn VarianceSource>,
    store: Arc<dyn OrderStore>,
    config: ExecutionConfig,
}

impl ExecutionWorker {
    pub fn new(
        publisher: StatusPublisher,
        oracle: Arc<dyn PriceOracle>,
        variance: Arc<dyn VarianceSource>,
        store: Arc<dyn OrderStore>,
        config: ExecutionConfig,
    ) -> Self {
        Self {
            publisher,
            oracle,
            variance,
            store,
            config,
        }
    }

    /// Run one execution attempt to a terminal state. On failure the
    /// `failed` event and record are emitted here, then the error is
    /// returned so the queue's retry policy can apply.
    pub async fn execute(&self, intent: &OrderIntent) -> Result<()> {
        match self.try_execute(intent).await {
            Ok(()) => Ok(()),
            Err(e) => {
                error!(order_id = %intent.order_id, error = %e, "order execution failed");

                let reason = e.to_string();
                self.publisher.publish(
                    &intent.order_id,
                    StatusEvent::failed(&intent.order_id, &reason),
                );
                self.store.upsert(OrderRecord::failed(intent, &reason)).await?;

                Err(e)
            }
        }
    }

    async fn try_execute(&self, intent: &OrderIntent) -> Result<()> {
        let order_id = &intent.order_id;

        // PENDING: normalize native symbols before quoting. Informational
        // only, never fails.
        let token_in = normalize_token(&intent.token_in);
        let token_out = normalize_token(&intent.token_out);
        if token_in != intent.token_in || token_out != intent.token_out {
            debug!(order_id = %order_id, "wrapping SOL -> wSOL");
        }
        self.publisher.publish(order_id, StatusEvent::pending(order_id));

        // ROUTING: comparative quote, then the slippage gate.
        self.publisher.publish(order_id, StatusEvent::routing(order_id));
        let quote = self
            .oracle
            .get_best_price(&token_in, &token_out, intent.amount)
            .await?;
        self.publisher.publish(
            order_id,
            StatusEvent::routing_quote(order_id, &quote.provider, quote.price),
        );

        let min_acceptable =
            quote.price * (1.0 - self.config.slippage_bps as f64 / 10_000.0);
        let execution_price = quote.price * (1.0 + self.variance.sample());

        if execution_price < min_acceptable {
            return Err(SwaplaneError::SlippageExceeded {
                execution_price,
                min_acceptable,
            });
        }

        // BUILDING: simulated transaction construction.
        self.publisher.publish(order_id, StatusEvent::building(order_id));
        sleep(Duration::from_millis(self.config.build_delay_ms)).await;

        // SUBMITTED: synthetic broadcast, then confirmation latency.
        let tx_hash = synthetic_tx_hash();
        self.publisher
            .publish(order_id, StatusEvent::submitted(order_id, &tx_hash));
        sleep(Duration::from_millis(self.config.submit_delay_ms)).await;

        // CONFIRMED: publish, then the single terminal upsert.
        self.publisher.publish(
            order_id,
            StatusEvent::confirmed(order_id, &quote.provider, execution_price),
        );
        self.store
            .upsert(OrderRecord::confirmed(
                intent,
                &quote.provider,
                execution_price,
                &tx_hash,
            ))
            .await?;

        info!(
            order_id = %order_id,
            provider = %quote.provider,
            price = execution_price,
            tx_hash = %tx_hash,
            "order confirmed"
        );

        Ok(())
    }
}

/// Synthetic transaction reference, e.g. `tx-4f9k2m1qz`
fn synthetic_tx_hash() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(9)
        .map(|c| (c as char).to_ascii_lowercase())
        .collect();
    format!("tx-{}", suffix)
}
