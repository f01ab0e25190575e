//! Core domain types for the order execution pipeline

mod order;

pub use order::{
    normalize_token, OrderId, OrderIntent, OrderRecord, OrderState, Quote, TerminalStatus,
};
