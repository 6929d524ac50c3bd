use axum::{
    Json,
    extract::{Path, Query, State},
};
use bson::oid::ObjectId;
use gatsishub_db::models::{Quota, QuotaStatus};
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

#[derive(Debug, Deserialize)]
pub struct ListQuotasQuery {
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct QuotaResponse {
    pub id: String,
    pub name: String,
    pub status: String,
    pub targetquota: i64,
    pub finishedquota: i64,
    pub order_ids: Vec<String>,
    pub starts_at: String,
    pub ends_at: String,
}

pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListQuotasQuery>,
) -> Result<Json<Vec<QuotaResponse>>, ApiError> {
    auth.require_staff()?;

    let status = match query.status.as_deref() {
        Some("Active") | Some("active") => Some(QuotaStatus::Active),
        Some("Closed") | Some("closed") => Some(QuotaStatus::Closed),
        Some(other) => {
            return Err(ApiError::BadRequest(format!("Unknown status: {}", other)));
        }
        None => None,
    };

    let quotas = state.quotas.find(status).await?;
    Ok(Json(quotas.into_iter().map(to_response).collect()))
}

pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<QuotaResponse>, ApiError> {
    auth.require_staff()?;

    let quota_id =
        ObjectId::parse_str(&id).map_err(|_| ApiError::BadRequest("Invalid quota id".to_string()))?;

    let quota = state.quotas.base.find_by_id(quota_id).await?;
    Ok(Json(to_response(quota)))
}

fn to_response(q: Quota) -> QuotaResponse {
    QuotaResponse {
        id: q.id.unwrap().to_hex(),
        name: q.name,
        status: match q.status {
            QuotaStatus::Active => "active".to_string(),
            QuotaStatus::Closed => "closed".to_string(),
        },
        targetquota: q.target_quota,
        finishedquota: q.finished_quota,
        order_ids: q.order_ids.iter().map(|o| o.to_hex()).collect(),
        starts_at: q.starts_at.try_to_rfc3339_string().unwrap_or_default(),
        ends_at: q.ends_at.try_to_rfc3339_string().unwrap_or_default(),
    }
}
