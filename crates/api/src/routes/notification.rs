use axum::{
    Json,
    extract::{Path, Query, State},
};
use bson::oid::ObjectId;
use gatsishub_db::models::{Notification, NotificationType, UserRole};
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub filter: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NotificationResponse {
    pub id: String,
    pub customerid: String,
    #[serde(rename = "type")]
    pub notification_type: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "orderId", skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(rename = "thumbnailType", skip_serializing_if = "Option::is_none")]
    pub thumbnail_type: Option<String>,
    #[serde(rename = "isRead")]
    pub is_read: bool,
    pub timestamp: String,
}

pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<NotificationResponse>>, ApiError> {
    let customer_id = require_owner(&auth, &id)?;

    let unread_only = query.filter.as_deref() == Some("unread");
    let notifications = state
        .notifications
        .find_for_customer(customer_id, unread_only)
        .await?;

    Ok(Json(notifications.into_iter().map(to_response).collect()))
}

/// Idempotent: the second mark-read returns the row unchanged.
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<NotificationResponse>, ApiError> {
    let notification_id = ObjectId::parse_str(&id)
        .map_err(|_| ApiError::BadRequest("Invalid notification id".to_string()))?;

    let existing = state.notifications.base.find_by_id(notification_id).await?;
    if auth.role == UserRole::Customer && existing.customer_id != auth.user_id {
        return Err(ApiError::Forbidden("Not your notification".to_string()));
    }

    let notification = state.notifications.mark_read(notification_id).await?;

    let event = serde_json::json!({
        "type": "notification:update",
        "data": { "notification_id": id },
    });
    let topic = format!("notifications:customer:{}", notification.customer_id.to_hex());
    crate::ws::dispatcher::publish(&state.ws_storage, &topic, &event).await;

    Ok(Json(to_response(notification)))
}

pub async fn mark_all_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let customer_id = require_owner(&auth, &id)?;

    let modified = state.notifications.mark_all_read(customer_id).await?;

    let event = serde_json::json!({
        "type": "notification:update",
        "data": { "customerid": id },
    });
    let topic = format!("notifications:customer:{}", id);
    crate::ws::dispatcher::publish(&state.ws_storage, &topic, &event).await;

    Ok(Json(serde_json::json!({ "modified": modified })))
}

pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let notification_id = ObjectId::parse_str(&id)
        .map_err(|_| ApiError::BadRequest("Invalid notification id".to_string()))?;

    let existing = state.notifications.base.find_by_id(notification_id).await?;
    if auth.role == UserRole::Customer && existing.customer_id != auth.user_id {
        return Err(ApiError::Forbidden("Not your notification".to_string()));
    }

    state.notifications.delete(notification_id).await?;

    let event = serde_json::json!({
        "type": "notification:delete",
        "data": { "notification_id": id },
    });
    let topic = format!("notifications:customer:{}", existing.customer_id.to_hex());
    crate::ws::dispatcher::publish(&state.ws_storage, &topic, &event).await;

    Ok(Json(serde_json::json!({ "message": "Notification deleted" })))
}

fn require_owner(auth: &AuthUser, id: &str) -> Result<ObjectId, ApiError> {
    let customer_id = ObjectId::parse_str(id)
        .map_err(|_| ApiError::BadRequest("Invalid customer id".to_string()))?;
    if auth.role == UserRole::Customer && auth.user_id != customer_id {
        return Err(ApiError::Forbidden("Not your notifications".to_string()));
    }
    Ok(customer_id)
}

pub(crate) fn type_str(t: NotificationType) -> &'static str {
    match t {
        NotificationType::OrderStatus => "order_status",
        NotificationType::Payment => "payment",
        NotificationType::Delivery => "delivery",
        NotificationType::System => "system",
    }
}

fn to_response(n: Notification) -> NotificationResponse {
    NotificationResponse {
        id: n.id.unwrap().to_hex(),
        customerid: n.customer_id.to_hex(),
        notification_type: type_str(n.notification_type).to_string(),
        title: n.title,
        message: n.body,
        order_id: n.order_id.map(|o| o.to_hex()),
        thumbnail: n.thumbnail,
        thumbnail_type: n.thumbnail_type,
        is_read: n.is_read,
        timestamp: n.created_at.try_to_rfc3339_string().unwrap_or_default(),
    }
}
