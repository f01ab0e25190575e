//! Durable order outcome store, consumed through an idempotent upsert.
//!
//! Retries give the pipeline at-least-once execution, so the terminal
//! write is an upsert keyed by order id: latest write wins, never a
//! second record.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::{OrderId, OrderRecord};
use crate::error::Result;

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Insert or overwrite the record for its order id.
    async fn upsert(&self, record: OrderRecord) -> Result<()>;

    async fn get(&self, order_id: &OrderId) -> Result<Option<OrderRecord>>;

    async fn count(&self) -> Result<usize>;
}

/// In-memory store backing the simulated service. A SQL-backed store
/// would implement the same trait.
#[derive(Clone, Default)]
pub struct MemoryOrderStore {
    records: Arc<DashMap<OrderId, OrderRecord>>,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn upsert(&self, record: OrderRecord) -> Result<()> {
        self.records.insert(record.id.clone(), record);
        Ok(())
    }

    async fn get(&self, order_id: &OrderId) -> Result<Option<OrderRecord>> {
        Ok(self.records.get(order_id).map(|r| r.value().clone()))
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.records.len())
    }
}
