use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::api::state::AppState;
use crate::domain::{OrderId, OrderIntent};
use crate::error::SwaplaneError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub token_in: Option<String>,
    #[serde(default)]
    pub token_out: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub order_id: OrderId,
}

/// POST /api/orders/execute — register a new order intent.
///
/// The order is not enqueued here; execution starts once the client
/// attaches its live-status WebSocket.
pub async fn create_order(
    State(state): State<AppState>,
    Json(body): Json<CreateOrderRequest>,
) -> impl IntoResponse {
    let (Some(token_in), Some(token_out), Some(amount)) =
        (body.token_in, body.token_out, body.amount)
    else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Missing parameters" })),
        )
            .into_response();
    };

    let intent = match OrderIntent::new(&token_in, &token_out, amount) {
        Ok(intent) => intent,
        // Bare rejection reason on the wire, e.g. {"error": "Missing parameters"}
        Err(SwaplaneError::Validation(reason)) => {
            return (StatusCode::BAD_REQUEST, Json(json!({ "error": reason }))).into_response();
        }
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response();
        }
    };

    let order_id = state.registry.register(intent);
    info!(order_id = %order_id, "order received");

    Json(CreateOrderResponse { order_id }).into_response()
}

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "pendingOrders": state.registry.len(),
    }))
}
