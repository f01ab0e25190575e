//! Shared fixtures for integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use swaplane::{PriceOracle, Quote, Result, SwaplaneError};

/// Oracle pinned to a single provider and price
pub struct FixedOracle(pub f64);

#[async_trait]
impl PriceOracle for FixedOracle {
    async fn get_best_price(&self, _: &str, _: &str, _: f64) -> Result<Quote> {
        Ok(Quote {
            provider: "Raydium".into(),
            price: self.0,
        })
    }
}

/// Oracle that always fails, for routing-error paths
pub struct FailingOracle;

#[async_trait]
impl PriceOracle for FailingOracle {
    async fn get_best_price(&self, _: &str, _: &str, _: f64) -> Result<Quote> {
        Err(SwaplaneError::Routing("all venues unreachable".into()))
    }
}
