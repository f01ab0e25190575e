use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::api::state::AppState;
use crate::domain::OrderId;
use crate::publisher::StatusEvent;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WsQuery {
    order_id: Option<OrderId>,
}

/// GET /api/orders/execute?orderId=... — upgrade into the live-status
/// channel for a registered order.
pub async fn order_ws_handler(
    ws: WebSocketUpgrade,
    Query(query): Query<WsQuery>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, query.order_id, state))
}

async fn handle_socket(mut socket: WebSocket, order_id: Option<OrderId>, state: AppState) {
    // Reject before attaching anything: one terminal message, then close.
    let Some(order_id) = order_id else {
        reject(&mut socket).await;
        return;
    };
    let Some(intent) = state.registry.lookup(&order_id) else {
        reject(&mut socket).await;
        return;
    };

    info!(order_id = %order_id, "websocket connected");

    // Attach this connection as the order's sink. The worker only ever
    // sees the sending half; this task owns the receiving half.
    let (sink, mut rx) = mpsc::unbounded_channel::<StatusEvent>();
    state.registry.attach_sink(&order_id, sink);

    let (mut sender, mut receiver) = socket.split();

    // Connection acknowledgement precedes any pipeline event.
    let connected = StatusEvent::connected(&order_id);
    match serde_json::to_string(&connected) {
        Ok(json) => {
            if sender.send(Message::Text(json)).await.is_err() {
                state.registry.detach_sink(&order_id);
                return;
            }
        }
        Err(e) => {
            error!(order_id = %order_id, "failed to serialize connected event: {}", e);
            state.registry.detach_sink(&order_id);
            return;
        }
    }

    // Enqueue only after the sink is live, so the client misses no event.
    if let Err(e) = state.queue.enqueue(intent) {
        error!(order_id = %order_id, "failed to enqueue order: {}", e);
        state.registry.detach_sink(&order_id);
        return;
    }

    // Forward pipeline events to the client until either side closes.
    let saw_terminal = Arc::new(AtomicBool::new(false));
    let terminal_flag = saw_terminal.clone();
    let forward_id = order_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            if event.is_terminal() {
                terminal_flag.store(true, Ordering::SeqCst);
            }
            let json = match serde_json::to_string(&event) {
                Ok(json) => json,
                Err(e) => {
                    error!(order_id = %forward_id, "failed to serialize status event: {}", e);
                    continue;
                }
            };
            if sender.send(Message::Text(json)).await.is_err() {
                break;
            }
        }
    });

    // Drain client frames until the connection drops.
    while let Some(Ok(msg)) = receiver.next().await {
        match msg {
            Message::Ping(_) | Message::Pong(_) => {
                // Axum handles ping/pong automatically
            }
            Message::Close(_) => break,
            _ => {}
        }
    }

    send_task.abort();

    // The pipeline keeps running after a disconnect; publishes simply
    // become no-ops. Entries whose order already reached a terminal
    // state are dropped outright.
    if saw_terminal.load(Ordering::SeqCst) {
        state.registry.remove(&order_id);
    } else {
        state.registry.detach_sink(&order_id);
    }
    debug!(order_id = %order_id, "websocket closed");
}

async fn reject(socket: &mut WebSocket) {
    let payload = json!({ "error": "Invalid or missing orderId" }).to_string();
    let _ = socket.send(Message::Text(payload)).await;
    let _ = socket.send(Message::Close(None)).await;
}
