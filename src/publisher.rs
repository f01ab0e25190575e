//! Best-effort status publishing.
//!
//! Events are pushed to the live channel a client attached for its order,
//! if any. This is not a durable event log: no sink means the event is
//! dropped, and a write against a closed sink is logged and swallowed.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{OrderId, OrderState};
use crate::registry::IntentRegistry;

/// Structured event sent over a live-status channel
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusEvent {
    pub order_id: OrderId,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executed_on: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl StatusEvent {
    fn new(order_id: &str, status: &str) -> Self {
        Self {
            order_id: order_id.to_string(),
            status: status.to_string(),
            message: None,
            price: None,
            tx_hash: None,
            executed_on: None,
            reason: None,
        }
    }

    pub fn connected(order_id: &str) -> Self {
        Self {
            message: Some("WebSocket connection established".into()),
            ..Self::new(order_id, "connected")
        }
    }

    pub fn pending(order_id: &str) -> Self {
        Self::new(order_id, OrderState::Pending.as_str())
    }

    pub fn routing(order_id: &str) -> Self {
        Self {
            message: Some("Comparing DEX prices...".into()),
            ..Self::new(order_id, OrderState::Routing.as_str())
        }
    }

    pub fn routing_quote(order_id: &str, provider: &str, price: f64) -> Self {
        Self {
            message: Some(format!("Best price found on {}", provider)),
            price: Some(price),
            ..Self::new(order_id, OrderState::Routing.as_str())
        }
    }

    pub fn building(order_id: &str) -> Self {
        Self {
            message: Some("Building transaction...".into()),
            ..Self::new(order_id, OrderState::Building.as_str())
        }
    }

    pub fn submitted(order_id: &str, tx_hash: &str) -> Self {
        Self {
            tx_hash: Some(tx_hash.to_string()),
            ..Self::new(order_id, OrderState::Submitted.as_str())
        }
    }

    pub fn confirmed(order_id: &str, executed_on: &str, price: f64) -> Self {
        Self {
            message: Some("Transaction confirmed".into()),
            executed_on: Some(executed_on.to_string()),
            price: Some(price),
            ..Self::new(order_id, OrderState::Confirmed.as_str())
        }
    }

    pub fn failed(order_id: &str, reason: &str) -> Self {
        Self {
            message: Some("Order failed".into()),
            reason: Some(reason.to_string()),
            ..Self::new(order_id, OrderState::Failed.as_str())
        }
    }

    /// True when this event's status names a terminal pipeline state.
    pub fn is_terminal(&self) -> bool {
        matches!(self.status.as_str(), "confirmed" | "failed")
    }
}

/// Pushes state-transition events to whatever sink is currently attached
/// for the order. Never propagates a delivery failure into the pipeline.
#[derive(Clone)]
pub struct StatusPublisher {
    registry: IntentRegistry,
}

impl StatusPublisher {
    pub fn new(registry: IntentRegistry) -> Self {
        Self { registry }
    }

    pub fn publish(&self, order_id: &OrderId, event: StatusEvent) {
        let Some(sink) = self.registry.sink(order_id) else {
            return;
        };
        if sink.send(event).is_err() {
            // Receiver dropped between lookup and send (client disconnect)
            debug!(order_id = %order_id, "status sink closed, event dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OrderIntent;

    #[test]
    fn test_event_wire_shape() {
        let event = StatusEvent::submitted("abc", "tx-123456789");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["orderId"], "abc");
        assert_eq!(json["status"], "submitted");
        assert_eq!(json["txHash"], "tx-123456789");
        assert!(json.get("price").is_none());
        assert!(json.get("reason").is_none());
    }

    #[test]
    fn test_routing_quote_carries_provider_and_price() {
        let event = StatusEvent::routing_quote("abc", "Raydium", 99.87);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["message"], "Best price found on Raydium");
        assert_eq!(json["price"], 99.87);
    }

    #[tokio::test]
    async fn test_publish_without_sink_is_noop() {
        let registry = IntentRegistry::new();
        let intent = OrderIntent::new("SOL", "USDC", 1.0).unwrap();
        let order_id = registry.register(intent);

        let publisher = StatusPublisher::new(registry);
        // No sink attached, unknown order: both must be silent no-ops.
        publisher.publish(&order_id, StatusEvent::pending(&order_id));
        publisher.publish(&"missing".to_string(), StatusEvent::pending("missing"));
    }

    #[tokio::test]
    async fn test_publish_to_dropped_sink_is_swallowed() {
        let registry = IntentRegistry::new();
        let intent = OrderIntent::new("SOL", "USDC", 1.0).unwrap();
        let order_id = registry.register(intent);

        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        assert!(registry.attach_sink(&order_id, tx));
        drop(rx);

        let publisher = StatusPublisher::new(registry);
        publisher.publish(&order_id, StatusEvent::pending(&order_id));
    }
}
