use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use bson::oid::ObjectId;
use gatsishub_db::models::{
    NotificationType, Submission, SubmissionPriority, SubmissionStatus, TargetRole, UserRole,
};
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

#[derive(Debug, Deserialize)]
pub struct CreateSubmissionRequest {
    pub quota_id: String,
    pub order_id: String,
    pub reported_completed: i64,
    pub notes: Option<String>,
    pub priority: Option<SubmissionPriority>,
}

#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub id: String,
    pub quota_id: String,
    pub order_id: String,
    pub employee_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    pub reported_completed: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub priority: String,
    pub status: String,
    pub created_at: String,
}

/// Fire-and-forget create. The quota counter is untouched until a verifier
/// acts on the submission.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateSubmissionRequest>,
) -> Result<(StatusCode, Json<SubmissionResponse>), ApiError> {
    auth.require_role(UserRole::Worker)?;

    let quota_id = ObjectId::parse_str(&body.quota_id)
        .map_err(|_| ApiError::BadRequest("Invalid quota id".to_string()))?;
    let order_id = ObjectId::parse_str(&body.order_id)
        .map_err(|_| ApiError::BadRequest("Invalid order id".to_string()))?;

    if body.reported_completed < 1 {
        return Err(ApiError::BadRequest(
            "reported_completed must be a positive integer".to_string(),
        ));
    }

    let quota = state.quotas.base.find_by_id(quota_id).await?;
    if !quota.order_ids.contains(&order_id) {
        return Err(ApiError::BadRequest(
            "Order is not part of this quota".to_string(),
        ));
    }

    // Workers without a team still submit; the team tag is informational
    let team_id = state
        .teams
        .find_by_member(auth.user_id)
        .await
        .ok()
        .and_then(|t| t.id);

    let submission = state
        .submissions
        .create(
            quota_id,
            order_id,
            auth.user_id,
            team_id,
            body.reported_completed,
            body.notes,
            body.priority.unwrap_or_default(),
        )
        .await?;

    state
        .admin_notifications
        .create(
            TargetRole::OperationalManager,
            NotificationType::System,
            "New production submission".to_string(),
            format!(
                "{} units reported against quota {}",
                submission.reported_completed, quota.name
            ),
            Some(order_id),
        )
        .await?;

    let response = to_response(submission);

    let event = serde_json::json!({
        "type": "submission:create",
        "data": { "submission_id": response.id, "quota_id": body.quota_id },
    });
    crate::ws::dispatcher::publish(&state.ws_storage, "orders:production", &event).await;
    crate::ws::dispatcher::publish(
        &state.ws_storage,
        "notifications:role:operational_manager",
        &event,
    )
    .await;

    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn list_by_quota(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<SubmissionResponse>>, ApiError> {
    auth.require_staff()?;

    let quota_id =
        ObjectId::parse_str(&id).map_err(|_| ApiError::BadRequest("Invalid quota id".to_string()))?;

    let submissions = state.submissions.find_by_quota(quota_id).await?;
    Ok(Json(submissions.into_iter().map(to_response).collect()))
}

/// pending → verified; increments the quota progress counter by the
/// reported amount. Terminal: a second verify is a conflict.
pub async fn verify(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<SubmissionResponse>, ApiError> {
    auth.require_role(UserRole::OperationalManager)?;

    let submission_id = ObjectId::parse_str(&id)
        .map_err(|_| ApiError::BadRequest("Invalid submission id".to_string()))?;

    let submission = state.submissions.verify(submission_id, auth.user_id).await?;

    state
        .quotas
        .increment_finished(submission.quota_id, submission.reported_completed)
        .await?;

    let event = serde_json::json!({
        "type": "submission:update",
        "data": { "submission_id": id, "status": "verified" },
    });
    crate::ws::dispatcher::publish(&state.ws_storage, "orders:production", &event).await;

    Ok(Json(to_response(submission)))
}

/// pending → rejected; the quota counter stays untouched.
pub async fn reject(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<SubmissionResponse>, ApiError> {
    auth.require_role(UserRole::OperationalManager)?;

    let submission_id = ObjectId::parse_str(&id)
        .map_err(|_| ApiError::BadRequest("Invalid submission id".to_string()))?;

    let submission = state.submissions.reject(submission_id, auth.user_id).await?;

    let event = serde_json::json!({
        "type": "submission:update",
        "data": { "submission_id": id, "status": "rejected" },
    });
    crate::ws::dispatcher::publish(&state.ws_storage, "orders:production", &event).await;

    Ok(Json(to_response(submission)))
}

fn to_response(s: Submission) -> SubmissionResponse {
    SubmissionResponse {
        id: s.id.unwrap().to_hex(),
        quota_id: s.quota_id.to_hex(),
        order_id: s.order_id.to_hex(),
        employee_id: s.employee_id.to_hex(),
        team_id: s.team_id.map(|t| t.to_hex()),
        reported_completed: s.reported_completed,
        notes: s.notes,
        priority: match s.priority {
            SubmissionPriority::Low => "low".to_string(),
            SubmissionPriority::Normal => "normal".to_string(),
            SubmissionPriority::High => "high".to_string(),
        },
        status: match s.status {
            SubmissionStatus::Pending => "pending".to_string(),
            SubmissionStatus::Verified => "verified".to_string(),
            SubmissionStatus::Rejected => "rejected".to_string(),
        },
        created_at: s.created_at.try_to_rfc3339_string().unwrap_or_default(),
    }
}
