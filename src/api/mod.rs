//! HTTP/WebSocket gateway.
//!
//! Accepts new intents, upgrades a client connection into the live-status
//! sink for its order, and triggers enqueue once the sink is attached.

pub mod handlers;
pub mod routes;
pub mod state;
pub mod websocket;

pub use routes::create_router;
pub use state::AppState;
