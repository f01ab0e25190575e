use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, SwaplaneError};

/// Opaque unique order identifier
pub type OrderId = String;

/// Generate a fresh collision-resistant order id
pub fn new_order_id() -> OrderId {
    Uuid::new_v4().to_string()
}

/// Client-submitted request to convert one token into another.
/// Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderIntent {
    pub order_id: OrderId,
    pub token_in: String,
    pub token_out: String,
    pub amount: f64,
}

impl OrderIntent {
    /// Validate submission parameters and mint a new intent.
    /// Rejections here never enter the pipeline.
    pub fn new(token_in: &str, token_out: &str, amount: f64) -> Result<Self> {
        if token_in.trim().is_empty() || token_out.trim().is_empty() {
            return Err(SwaplaneError::Validation("Missing parameters".into()));
        }
        if !amount.is_finite() || amount <= 0.0 {
            return Err(SwaplaneError::Validation(
                "amount must be a positive number".into(),
            ));
        }

        Ok(Self {
            order_id: new_order_id(),
            token_in: token_in.trim().to_string(),
            token_out: token_out.trim().to_string(),
            amount,
        })
    }
}

/// Rewrite a native-asset symbol to its wrapped form before quoting.
/// Informational only; never fails.
pub fn normalize_token(token: &str) -> String {
    match token {
        "SOL" => "wSOL".to_string(),
        other => other.to_string(),
    }
}

/// Pipeline states, in strict forward order. `Confirmed` and `Failed`
/// are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderState {
    Pending,
    Routing,
    Building,
    Submitted,
    Confirmed,
    Failed,
}

impl OrderState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed | Self::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Routing => "routing",
            Self::Building => "building",
            Self::Submitted => "submitted",
            Self::Confirmed => "confirmed",
            Self::Failed => "failed",
        }
    }
}

/// Terminal status stored in the order record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerminalStatus {
    Confirmed,
    Failed,
}

/// A price and provider returned by the oracle for a prospective trade
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub provider: String,
    pub price: f64,
}

/// Durable outcome of an order, keyed by order id. Written exactly once
/// per execution attempt at a terminal transition; retries overwrite.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub id: OrderId,
    pub token_in: String,
    pub token_out: String,
    pub amount: f64,
    pub status: TerminalStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executed_on: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_reason: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl OrderRecord {
    pub fn confirmed(
        intent: &OrderIntent,
        executed_on: &str,
        price: f64,
        tx_hash: &str,
    ) -> Self {
        Self {
            id: intent.order_id.clone(),
            token_in: intent.token_in.clone(),
            token_out: intent.token_out.clone(),
            amount: intent.amount,
            status: TerminalStatus::Confirmed,
            executed_on: Some(executed_on.to_string()),
            price: Some(price),
            tx_hash: Some(tx_hash.to_string()),
            failed_reason: None,
            updated_at: Utc::now(),
        }
    }

    pub fn failed(intent: &OrderIntent, reason: &str) -> Self {
        Self {
            id: intent.order_id.clone(),
            token_in: intent.token_in.clone(),
            token_out: intent.token_out.clone(),
            amount: intent.amount,
            status: TerminalStatus::Failed,
            executed_on: None,
            price: None,
            tx_hash: None,
            failed_reason: Some(reason.to_string()),
            updated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_validation() {
        assert!(OrderIntent::new("SOL", "USDC", 10.0).is_ok());
        assert!(OrderIntent::new("", "USDC", 10.0).is_err());
        assert!(OrderIntent::new("SOL", "  ", 10.0).is_err());
        assert!(OrderIntent::new("SOL", "USDC", 0.0).is_err());
        assert!(OrderIntent::new("SOL", "USDC", -5.0).is_err());
        assert!(OrderIntent::new("SOL", "USDC", f64::NAN).is_err());
    }

    #[test]
    fn test_intent_ids_are_unique() {
        let a = OrderIntent::new("SOL", "USDC", 1.0).unwrap();
        let b = OrderIntent::new("SOL", "USDC", 1.0).unwrap();
        assert_ne!(a.order_id, b.order_id);
    }

    #[test]
    fn test_normalize_token() {
        assert_eq!(normalize_token("SOL"), "wSOL");
        assert_eq!(normalize_token("USDC"), "USDC");
        assert_eq!(normalize_token("wSOL"), "wSOL");
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let intent = OrderIntent::new("SOL", "USDC", 10.0).unwrap();
        let record = OrderRecord::confirmed(&intent, "Raydium", 100.5, "tx-abc123def");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["tokenIn"], "SOL");
        assert_eq!(json["status"], "confirmed");
        assert_eq!(json["executedOn"], "Raydium");
        assert_eq!(json["txHash"], "tx-abc123def");
        assert!(json.get("failedReason").is_none());
    }

    #[test]
    fn test_terminal_states() {
        assert!(OrderState::Confirmed.is_terminal());
        assert!(OrderState::Failed.is_terminal());
        assert!(!OrderState::Routing.is_terminal());
        assert_eq!(OrderState::Submitted.as_str(), "submitted");
    }
}
