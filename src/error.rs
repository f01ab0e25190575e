use thiserror::Error;

/// Main error type for the order execution service
#[derive(Error, Debug)]
pub enum SwaplaneError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    // Submission errors — rejected synchronously, never enter the pipeline
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unknown order: {0}")]
    UnknownOrder(String),

    // Pipeline errors — drive the order to FAILED and feed the retry policy
    #[error("Routing error: {0}")]
    Routing(String),

    #[error("Slippage exceeded: executionPrice={execution_price:.4} < minAcceptable={min_acceptable:.4}")]
    SlippageExceeded {
        execution_price: f64,
        min_acceptable: f64,
    },

    #[error("Infrastructure error: {0}")]
    Infrastructure(String),

    // Serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // I/O errors (gateway bind, config file)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type
pub type Result<T> = std::result::Result<T, SwaplaneError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slippage_message_carries_both_prices() {
        let err = SwaplaneError::SlippageExceeded {
            execution_price: 99.1234,
            min_acceptable: 99.5,
        };
        let msg = err.to_string();
        assert!(msg.contains("Slippage exceeded"));
        assert!(msg.contains("99.1234"));
        assert!(msg.contains("99.5000"));
    }
}
