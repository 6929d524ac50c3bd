use axum::{
    extract::{
        Query, State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use bson::oid::ObjectId;
use futures::{SinkExt, StreamExt};
use gatsishub_db::models::UserRole;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct WsParams {
    pub token: String,
}

pub async fn ws_upgrade(
    State(state): State<AppState>,
    Query(params): Query<WsParams>,
    ws: WebSocketUpgrade,
) -> Response {
    // Verify JWT before accepting the WebSocket
    let claims = match state.auth.verify_access_token(&params.token) {
        Ok(c) => c,
        Err(_) => {
            return Response::builder()
                .status(401)
                .body("Unauthorized".into())
                .unwrap();
        }
    };

    let user_id = match ObjectId::parse_str(&claims.sub) {
        Ok(id) => id,
        Err(_) => {
            return Response::builder()
                .status(400)
                .body("Invalid user ID".into())
                .unwrap();
        }
    };

    let role = claims.role;
    ws.on_upgrade(move |socket| handle_socket(socket, state, user_id, role))
}

async fn handle_socket(socket: WebSocket, state: AppState, user_id: ObjectId, role: UserRole) {
    let connection_id = Uuid::new_v4().to_string();
    info!(?user_id, %connection_id, "WebSocket connected");

    let (sender, mut receiver) = socket.split();
    let sender = Arc::new(Mutex::new(sender));

    // Register connection
    state
        .ws_storage
        .add(user_id, connection_id.clone(), sender.clone());

    // Send connected message
    {
        let msg = serde_json::json!({
            "type": "connected",
            "user_id": user_id.to_hex(),
        });
        let mut guard = sender.lock().await;
        let _ = guard
            .send(Message::text(serde_json::to_string(&msg).unwrap()))
            .await;
    }

    // Message loop
    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                handle_client_message(&state, &user_id, role, &connection_id, &text).await;
            }
            Ok(Message::Ping(data)) => {
                let mut guard = sender.lock().await;
                let _ = guard.send(Message::Pong(data)).await;
            }
            Ok(Message::Close(_)) => {
                break;
            }
            Err(e) => {
                warn!(?user_id, %connection_id, %e, "WebSocket error");
                break;
            }
            _ => {}
        }
    }

    // Cleanup: drops the connection and all its topic subscriptions
    state.ws_storage.remove(&user_id, &connection_id);

    info!(?user_id, %connection_id, "WebSocket disconnected");
}

async fn handle_client_message(
    state: &AppState,
    user_id: &ObjectId,
    role: UserRole,
    connection_id: &str,
    text: &str,
) {
    let parsed: serde_json::Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(_) => return,
    };

    let msg_type = parsed.get("type").and_then(|t| t.as_str()).unwrap_or("");
    let data = parsed.get("data");

    debug!(?user_id, %connection_id, msg_type, "WS message received");

    match msg_type {
        "ping" => {
            let pong = serde_json::json!({ "type": "pong" });
            super::dispatcher::send_to_connection(&state.ws_storage, connection_id, &pong).await;
        }
        "subscribe" => {
            let Some(topic) = data.and_then(|d| d.get("topic")).and_then(|t| t.as_str()) else {
                send_error(state, connection_id, "Missing topic").await;
                return;
            };

            if !topic_allowed(topic, user_id, role) {
                send_error(state, connection_id, "Not allowed to subscribe to topic").await;
                return;
            }

            state.ws_storage.subscribe(topic, connection_id);
            let ack = serde_json::json!({
                "type": "subscribed",
                "data": { "topic": topic },
            });
            super::dispatcher::send_to_connection(&state.ws_storage, connection_id, &ack).await;
        }
        "unsubscribe" => {
            if let Some(topic) = data.and_then(|d| d.get("topic")).and_then(|t| t.as_str()) {
                state.ws_storage.unsubscribe(topic, connection_id);
                let ack = serde_json::json!({
                    "type": "unsubscribed",
                    "data": { "topic": topic },
                });
                super::dispatcher::send_to_connection(&state.ws_storage, connection_id, &ack).await;
            }
        }
        _ => {
            debug!(?user_id, msg_type, "Unknown WS message type");
        }
    }
}

async fn send_error(state: &AppState, connection_id: &str, message: &str) {
    let msg = serde_json::json!({
        "type": "error",
        "data": { "message": message },
    });
    super::dispatcher::send_to_connection(&state.ws_storage, connection_id, &msg).await;
}

/// Change-feed topics mirror the subscription scopes of the client hooks:
/// customer notifications, role notifications, one conversation pair, and
/// the production order board. A subscriber must own the scope it asks for.
fn topic_allowed(topic: &str, user_id: &ObjectId, role: UserRole) -> bool {
    let parts: Vec<&str> = topic.split(':').collect();
    match parts.as_slice() {
        ["notifications", "customer", id] => {
            role == UserRole::Customer && *id == user_id.to_hex()
        }
        ["notifications", "role", target] => match role {
            UserRole::SalesAdmin => *target == "sales_admin",
            UserRole::OperationalManager => *target == "operational_manager",
            _ => false,
        },
        ["conversation", customer_id, employee_id] => match role {
            UserRole::Customer => *customer_id == user_id.to_hex(),
            _ => *employee_id == user_id.to_hex(),
        },
        ["orders", "production"] => role.is_staff(),
        _ => false,
    }
}
