//! Price discovery seam.
//!
//! The pipeline consumes quotes through [`PriceOracle`] and execution-price
//! variance through [`VarianceSource`]; both are trait objects so tests can
//! pin exact prices and boundary behavior.

mod mock;

pub use mock::MockDexRouter;

use async_trait::async_trait;
use rand::Rng;

use crate::domain::Quote;
use crate::error::Result;

/// Comparative price discovery for a prospective trade
#[async_trait]
pub trait PriceOracle: Send + Sync {
    /// Best available quote for converting `amount` of `token_in` into
    /// `token_out`. Failure here is a pipeline error.
    async fn get_best_price(&self, token_in: &str, token_out: &str, amount: f64) -> Result<Quote>;
}

/// Source of execution-price variance relative to the quoted price.
/// The only place randomness enters the state machine.
pub trait VarianceSource: Send + Sync {
    /// Fractional deviation applied as `quoted × (1 + sample())`.
    fn sample(&self) -> f64;
}

/// Reference policy: uniform variance in ±0.3%
pub struct UniformVariance {
    half_width: f64,
}

impl UniformVariance {
    pub fn new(half_width: f64) -> Self {
        Self { half_width }
    }
}

impl Default for UniformVariance {
    fn default() -> Self {
        Self::new(0.003)
    }
}

impl VarianceSource for UniformVariance {
    fn sample(&self) -> f64 {
        rand::thread_rng().gen_range(-self.half_width..=self.half_width)
    }
}

/// Deterministic variance for tests
pub struct FixedVariance(pub f64);

impl VarianceSource for FixedVariance {
    fn sample(&self) -> f64 {
        self.0
    }
}
