use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::api::{handlers, state::AppState, websocket::order_ws_handler};

pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Order submission + live-status WebSocket on the same path,
        // split by method, matching the original gateway contract
        .route(
            "/api/orders/execute",
            post(handlers::create_order).get(order_ws_handler),
        )
        .route("/api/health", get(handlers::health))
        .with_state(state)
        .layer(cors)
}
