use axum::extract::ws::Message;
use bson::oid::ObjectId;
use futures::SinkExt;
use tracing::{debug, warn};

use super::storage::{WsSender, WsStorage};

/// Broadcasts a JSON message to all connections of the specified users.
/// A failed send to one socket is logged and does not abort the fan-out.
pub async fn broadcast(ws_storage: &WsStorage, user_ids: &[ObjectId], message: &serde_json::Value) {
    let text = serde_json::to_string(message).unwrap_or_default();

    for user_id in user_ids {
        let senders = ws_storage.get_senders(user_id);
        for sender in senders {
            send_text(&sender, text.clone(), || format!("user {}", user_id)).await;
        }
    }
}

/// Sends a JSON message to a specific user's connections.
pub async fn send_to_user(ws_storage: &WsStorage, user_id: &ObjectId, message: &serde_json::Value) {
    broadcast(ws_storage, &[*user_id], message).await;
}

/// Sends a JSON message to a single connection.
pub async fn send_to_connection(
    ws_storage: &WsStorage,
    connection_id: &str,
    message: &serde_json::Value,
) {
    let Some(sender) = ws_storage.sender_of(connection_id) else {
        return;
    };
    let text = serde_json::to_string(message).unwrap_or_default();
    send_text(&sender, text, || format!("connection {}", connection_id)).await;
}

/// Publishes a change-feed event to every connection subscribed to `topic`.
pub async fn publish(ws_storage: &WsStorage, topic: &str, message: &serde_json::Value) {
    let senders = ws_storage.topic_senders(topic);
    if senders.is_empty() {
        return;
    }
    let text = serde_json::to_string(message).unwrap_or_default();
    debug!(topic, subscribers = senders.len(), "Publishing event");
    for sender in senders {
        send_text(&sender, text.clone(), || format!("topic {}", topic)).await;
    }
}

async fn send_text(sender: &WsSender, text: String, target: impl Fn() -> String) {
    let mut guard = sender.lock().await;
    if let Err(e) = guard.send(Message::text(text)).await {
        warn!(target = %target(), %e, "Failed to send WS message");
    }
}
