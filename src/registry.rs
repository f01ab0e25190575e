//! In-memory intent registry.
//!
//! Binds a pending order to its submission parameters and, once the client
//! connects, to the live-status channel for that order. The sink is
//! non-owning: the receiving half lives in the WebSocket task and may drop
//! at any moment, so it is only ever reached through attach/detach/sink.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;

use crate::domain::{OrderId, OrderIntent};
use crate::publisher::StatusEvent;

/// Sending half of a live-status channel
pub type StatusSink = mpsc::UnboundedSender<StatusEvent>;

struct RegistryEntry {
    intent: OrderIntent,
    sink: Option<StatusSink>,
}

/// Concurrent-safe map from order id to pending intent and optional sink.
/// Constructed once per process (or per test harness) and injected into
/// the gateway, worker and publisher. No eviction policy; the gateway
/// removes entries when it is done with them.
#[derive(Clone)]
pub struct IntentRegistry {
    entries: Arc<DashMap<OrderId, RegistryEntry>>,
}

impl IntentRegistry {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
        }
    }

    /// Store a fresh entry with no sink and return its order id.
    pub fn register(&self, intent: OrderIntent) -> OrderId {
        let order_id = intent.order_id.clone();
        self.entries
            .insert(order_id.clone(), RegistryEntry { intent, sink: None });
        order_id
    }

    /// Attach (or replace) the live-status sink for an order.
    /// Returns false if the order id is unknown.
    pub fn attach_sink(&self, order_id: &OrderId, sink: StatusSink) -> bool {
        match self.entries.get_mut(order_id) {
            Some(mut entry) => {
                entry.sink = Some(sink);
                true
            }
            None => false,
        }
    }

    /// Clear the sink for an order. No-op when absent or unknown.
    pub fn detach_sink(&self, order_id: &OrderId) {
        if let Some(mut entry) = self.entries.get_mut(order_id) {
            entry.sink = None;
        }
    }

    pub fn lookup(&self, order_id: &OrderId) -> Option<OrderIntent> {
        self.entries.get(order_id).map(|e| e.intent.clone())
    }

    /// Current sink for an order, if one is attached.
    pub fn sink(&self, order_id: &OrderId) -> Option<StatusSink> {
        self.entries.get(order_id).and_then(|e| e.sink.clone())
    }

    /// Drop an entry entirely. Called by the gateway once no further
    /// attach can occur.
    pub fn remove(&self, order_id: &OrderId) {
        self.entries.remove(order_id);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for IntentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intent() -> OrderIntent {
        OrderIntent::new("SOL", "USDC", 10.0).unwrap()
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = IntentRegistry::new();
        let order_id = registry.register(intent());

        let found = registry.lookup(&order_id).unwrap();
        assert_eq!(found.order_id, order_id);
        assert_eq!(found.token_in, "SOL");
        assert!(registry.lookup(&"missing".to_string()).is_none());
    }

    #[test]
    fn test_register_yields_unique_ids() {
        let registry = IntentRegistry::new();
        let a = registry.register(intent());
        let b = registry.register(intent());
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_attach_unknown_order_fails() {
        let registry = IntentRegistry::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        assert!(!registry.attach_sink(&"missing".to_string(), tx));
    }

    #[tokio::test]
    async fn test_attach_replaces_existing_sink() {
        let registry = IntentRegistry::new();
        let order_id = registry.register(intent());

        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        assert!(registry.attach_sink(&order_id, tx1));
        assert!(registry.attach_sink(&order_id, tx2));

        let sink = registry.sink(&order_id).unwrap();
        sink.send(StatusEvent::pending(&order_id)).unwrap();

        assert!(rx2.recv().await.is_some());
        assert!(rx1.try_recv().is_err());
    }

    #[test]
    fn test_detach_is_idempotent() {
        let registry = IntentRegistry::new();
        let order_id = registry.register(intent());

        let (tx, _rx) = mpsc::unbounded_channel();
        registry.attach_sink(&order_id, tx);
        registry.detach_sink(&order_id);
        assert!(registry.sink(&order_id).is_none());

        // Absent sink and unknown id: both silent no-ops.
        registry.detach_sink(&order_id);
        registry.detach_sink(&"missing".to_string());
    }

    #[test]
    fn test_remove_clears_entry() {
        let registry = IntentRegistry::new();
        let order_id = registry.register(intent());
        registry.remove(&order_id);
        assert!(registry.lookup(&order_id).is_none());
        assert!(registry.is_empty());
    }
}
