use axum::{
    Json,
    extract::{Path, Query, State},
};
use bson::oid::ObjectId;
use gatsishub_db::models::{
    NotificationType, Order, OrderLog, OrderStatus, TargetRole, UserRole,
};
use gatsishub_services::dao::base::PaginationParams;
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
    pub note: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub orderid: String,
    pub customerid: String,
    pub orderstatus: String,
    pub quantity: i64,
    pub totalprice: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    pub companyname: String,
    pub contactperson: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deliveryaddress: Option<String>,
    pub datecreated: String,
}

#[derive(Debug, Serialize)]
pub struct OrderLogResponse {
    pub id: String,
    pub orderid: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub timestamp: String,
}

pub async fn list_all(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    auth.require_staff()?;

    let result = state.orders.find_all(&params).await?;
    let items: Vec<OrderResponse> = result.items.into_iter().map(to_response).collect();

    Ok(Json(serde_json::json!({
        "items": items,
        "total": result.total,
        "page": result.page,
        "per_page": result.per_page,
        "total_pages": result.total_pages,
    })))
}

pub async fn list_customer(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let customer_id = ObjectId::parse_str(&id)
        .map_err(|_| ApiError::BadRequest("Invalid customer id".to_string()))?;

    if auth.role == UserRole::Customer && auth.user_id != customer_id {
        return Err(ApiError::Forbidden("Not your orders".to_string()));
    }

    let orders = state.orders.find_by_customer(customer_id).await?;
    Ok(Json(orders.into_iter().map(to_response).collect()))
}

pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id =
        ObjectId::parse_str(&id).map_err(|_| ApiError::BadRequest("Invalid order id".to_string()))?;

    let order = state.orders.base.find_by_id(order_id).await?;

    if auth.role == UserRole::Customer && order.customer_id != auth.user_id {
        return Err(ApiError::Forbidden("Not your order".to_string()));
    }

    Ok(Json(to_response(order)))
}

/// Status transition with full fan-out: history row, customer notification,
/// counterpart staff notification, and change-feed events.
pub async fn update_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    auth.require_role(UserRole::OperationalManager)?;

    let order_id =
        ObjectId::parse_str(&id).map_err(|_| ApiError::BadRequest("Invalid order id".to_string()))?;

    let order = state
        .orders
        .update_status(order_id, body.status, body.note.clone(), auth.user_id)
        .await?;

    let status_label = body.status.as_str();

    state
        .notifications
        .create(
            order.customer_id,
            NotificationType::OrderStatus,
            "Order status updated".to_string(),
            format!("Your order is now {}", status_label.replace('_', " ")),
            Some(order_id),
            None,
            None,
        )
        .await?;

    state
        .admin_notifications
        .create(
            TargetRole::SalesAdmin,
            NotificationType::OrderStatus,
            "Order status updated".to_string(),
            format!("Order {} moved to {}", order_id.to_hex(), status_label),
            Some(order_id),
        )
        .await?;

    let event = serde_json::json!({
        "type": "order:update",
        "data": { "order_id": id, "status": status_label },
    });
    crate::ws::dispatcher::publish(&state.ws_storage, "orders:production", &event).await;

    let notify_event = serde_json::json!({
        "type": "notification:create",
        "data": { "order_id": id },
    });
    let customer_topic = format!("notifications:customer:{}", order.customer_id.to_hex());
    crate::ws::dispatcher::publish(&state.ws_storage, &customer_topic, &notify_event).await;
    crate::ws::dispatcher::send_to_user(&state.ws_storage, &order.customer_id, &notify_event)
        .await;
    crate::ws::dispatcher::publish(
        &state.ws_storage,
        "notifications:role:sales_admin",
        &notify_event,
    )
    .await;

    Ok(Json(to_response(order)))
}

/// Status history, oldest first.
pub async fn logs(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<OrderLogResponse>>, ApiError> {
    let order_id =
        ObjectId::parse_str(&id).map_err(|_| ApiError::BadRequest("Invalid order id".to_string()))?;

    let order = state.orders.base.find_by_id(order_id).await?;
    if auth.role == UserRole::Customer && order.customer_id != auth.user_id {
        return Err(ApiError::Forbidden("Not your order".to_string()));
    }

    let logs = state.orders.find_logs(order_id).await?;
    Ok(Json(logs.into_iter().map(log_to_response).collect()))
}

pub(crate) fn to_response(o: Order) -> OrderResponse {
    OrderResponse {
        orderid: o.id.unwrap().to_hex(),
        customerid: o.customer_id.to_hex(),
        orderstatus: o.status.as_str().to_string(),
        quantity: o.quantity,
        totalprice: o.total_price,
        deadline: o
            .deadline
            .and_then(|d| d.try_to_rfc3339_string().ok()),
        companyname: o.company_name,
        contactperson: o.contact_person,
        deliveryaddress: o.delivery_address,
        datecreated: o.created_at.try_to_rfc3339_string().unwrap_or_default(),
    }
}

fn log_to_response(l: OrderLog) -> OrderLogResponse {
    OrderLogResponse {
        id: l.id.unwrap().to_hex(),
        orderid: l.order_id.to_hex(),
        status: l.status.as_str().to_string(),
        note: l.note,
        timestamp: l.created_at.try_to_rfc3339_string().unwrap_or_default(),
    }
}
