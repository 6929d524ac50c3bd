use axum::{
    Json,
    extract::{Path, Query, State},
};
use bson::oid::ObjectId;
use gatsishub_db::models::{AdminNotification, TargetRole, UserRole};
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub filter: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AdminNotificationResponse {
    pub id: String,
    pub targetrole: String,
    #[serde(rename = "type")]
    pub notification_type: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "orderid", skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    pub isread: bool,
    pub datecreated: String,
}

pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(role): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<AdminNotificationResponse>>, ApiError> {
    let target = require_role_scope(&auth, &role)?;

    let unread_only = query.filter.as_deref() == Some("unread");
    let notifications = state
        .admin_notifications
        .find_for_role(target, unread_only)
        .await?;

    Ok(Json(notifications.into_iter().map(to_response).collect()))
}

pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<AdminNotificationResponse>, ApiError> {
    auth.require_staff()?;

    let notification_id = ObjectId::parse_str(&id)
        .map_err(|_| ApiError::BadRequest("Invalid notification id".to_string()))?;

    let notification = state.admin_notifications.mark_read(notification_id).await?;

    publish_update(&state, notification.target_role, &id).await;

    Ok(Json(to_response(notification)))
}

pub async fn mark_all_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(role): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let target = require_role_scope(&auth, &role)?;

    let modified = state.admin_notifications.mark_all_read(target).await?;

    publish_update(&state, target, "all").await;

    Ok(Json(serde_json::json!({ "modified": modified })))
}

/// Staff may only read the notification feed of their own role.
fn require_role_scope(auth: &AuthUser, role: &str) -> Result<TargetRole, ApiError> {
    let target = match role {
        "sales_admin" => TargetRole::SalesAdmin,
        "operational_manager" => TargetRole::OperationalManager,
        _ => return Err(ApiError::BadRequest("Unknown role".to_string())),
    };

    let matches = matches!(
        (auth.role, target),
        (UserRole::SalesAdmin, TargetRole::SalesAdmin)
            | (UserRole::OperationalManager, TargetRole::OperationalManager)
    );
    if !matches {
        return Err(ApiError::Forbidden(
            "Not your notification feed".to_string(),
        ));
    }
    Ok(target)
}

async fn publish_update(state: &AppState, target: TargetRole, id: &str) {
    let event = serde_json::json!({
        "type": "admin_notification:update",
        "data": { "notification_id": id },
    });
    let topics: &[&str] = match target {
        TargetRole::SalesAdmin => &["notifications:role:sales_admin"],
        TargetRole::OperationalManager => &["notifications:role:operational_manager"],
        TargetRole::Both => &[
            "notifications:role:sales_admin",
            "notifications:role:operational_manager",
        ],
    };
    for topic in topics {
        crate::ws::dispatcher::publish(&state.ws_storage, topic, &event).await;
    }
}

fn role_str(role: TargetRole) -> &'static str {
    match role {
        TargetRole::SalesAdmin => "sales_admin",
        TargetRole::OperationalManager => "operational_manager",
        TargetRole::Both => "both",
    }
}

fn to_response(n: AdminNotification) -> AdminNotificationResponse {
    AdminNotificationResponse {
        id: n.id.unwrap().to_hex(),
        targetrole: role_str(n.target_role).to_string(),
        notification_type: super::notification::type_str(n.notification_type).to_string(),
        title: n.title,
        message: n.body,
        order_id: n.order_id.map(|o| o.to_hex()),
        isread: n.is_read,
        datecreated: n.created_at.try_to_rfc3339_string().unwrap_or_default(),
    }
}
