use axum::extract::ws::{Message, WebSocket};
use bson::oid::ObjectId;
use dashmap::DashMap;
use futures::stream::SplitSink;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;

pub type WsSender = Arc<Mutex<SplitSink<WebSocket, Message>>>;

/// Tracks active WebSocket connections and their topic subscriptions.
/// Each user can have multiple connections (multiple tabs/devices); each
/// connection can subscribe to any number of change-feed topics.
pub struct WsStorage {
    connections: DashMap<ObjectId, Vec<(String, WsSender)>>,
    by_connection: DashMap<String, WsSender>,
    topics: DashMap<String, HashSet<String>>,
}

impl WsStorage {
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
            by_connection: DashMap::new(),
            topics: DashMap::new(),
        }
    }

    pub fn add(&self, user_id: ObjectId, connection_id: String, sender: WsSender) {
        self.by_connection
            .insert(connection_id.clone(), sender.clone());
        self.connections
            .entry(user_id)
            .or_default()
            .push((connection_id, sender));
    }

    /// Drops the connection and every topic subscription it held.
    pub fn remove(&self, user_id: &ObjectId, connection_id: &str) {
        self.by_connection.remove(connection_id);

        if let Some(mut senders) = self.connections.get_mut(user_id) {
            senders.retain(|(id, _)| id != connection_id);
            if senders.is_empty() {
                drop(senders);
                self.connections.remove(user_id);
            }
        }

        self.topics.retain(|_, subscribers| {
            subscribers.remove(connection_id);
            !subscribers.is_empty()
        });
    }

    pub fn get_senders(&self, user_id: &ObjectId) -> Vec<WsSender> {
        self.connections
            .get(user_id)
            .map(|s| s.iter().map(|(_, sender)| sender.clone()).collect())
            .unwrap_or_default()
    }

    pub fn sender_of(&self, connection_id: &str) -> Option<WsSender> {
        self.by_connection.get(connection_id).map(|s| s.clone())
    }

    pub fn subscribe(&self, topic: &str, connection_id: &str) {
        self.topics
            .entry(topic.to_string())
            .or_default()
            .insert(connection_id.to_string());
    }

    pub fn unsubscribe(&self, topic: &str, connection_id: &str) {
        if let Some(mut subscribers) = self.topics.get_mut(topic) {
            subscribers.remove(connection_id);
            if subscribers.is_empty() {
                drop(subscribers);
                self.topics.remove(topic);
            }
        }
    }

    pub fn topic_senders(&self, topic: &str) -> Vec<WsSender> {
        let Some(subscribers) = self.topics.get(topic) else {
            return Vec::new();
        };
        subscribers
            .iter()
            .filter_map(|conn_id| self.sender_of(conn_id))
            .collect()
    }

    pub fn connection_count(&self) -> usize {
        self.by_connection.len()
    }
}

impl Default for WsStorage {
    fn default() -> Self {
        Self::new()
    }
}
