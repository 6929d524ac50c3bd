use axum::{
    Json,
    extract::{Path, State},
};
use bson::oid::ObjectId;

use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

/// Orders currently assigned to the team the employee belongs to.
pub async fn employee_orders(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<super::order::OrderResponse>>, ApiError> {
    auth.require_staff()?;

    let employee_id = ObjectId::parse_str(&id)
        .map_err(|_| ApiError::BadRequest("Invalid employee id".to_string()))?;

    let team = state.teams.find_by_member(employee_id).await?;
    let orders = state.orders.find_by_ids(&team.order_ids).await?;

    Ok(Json(
        orders.into_iter().map(super::order::to_response).collect(),
    ))
}
