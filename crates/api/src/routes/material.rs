use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use bson::oid::ObjectId;
use gatsishub_db::models::Material;
use gatsishub_services::dao::base::DaoError;
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

#[derive(Debug, Deserialize)]
pub struct ListMaterialsQuery {
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct CreateMaterialRequest {
    pub materialname: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMaterialRequest {
    pub materialname: Option<String>,
    pub features: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct MaterialResponse {
    pub id: String,
    pub materialname: String,
    pub features: Vec<String>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListMaterialsQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    auth.require_staff()?;

    let materials = state.materials.find(query.is_active).await?;
    let materials: Vec<MaterialResponse> = materials.into_iter().map(to_response).collect();

    Ok(Json(serde_json::json!({ "materials": materials })))
}

pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateMaterialRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    auth.require_staff()?;

    let name = body
        .materialname
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Material name is required".to_string()))?;

    let material = state
        .materials
        .create(name, body.features)
        .await
        .map_err(|e| match e {
            // Duplicate names are a client error here, not a generic conflict
            DaoError::DuplicateKey(_) => {
                ApiError::BadRequest("Material name already exists".to_string())
            }
            other => other.into(),
        })?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "material": to_response(material) })),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(body): Json<UpdateMaterialRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    auth.require_staff()?;

    let material_id = ObjectId::parse_str(&id)
        .map_err(|_| ApiError::BadRequest("Invalid material id".to_string()))?;

    if let Some(ref name) = body.materialname {
        if name.trim().is_empty() {
            return Err(ApiError::BadRequest(
                "Material name cannot be empty".to_string(),
            ));
        }
    }

    let material = state
        .materials
        .update(
            material_id,
            body.materialname.map(|n| n.trim().to_string()),
            body.features,
            body.is_active,
        )
        .await
        .map_err(|e| match e {
            DaoError::DuplicateKey(_) => {
                ApiError::BadRequest("Material name already exists".to_string())
            }
            other => other.into(),
        })?;

    Ok(Json(serde_json::json!({ "material": to_response(material) })))
}

pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    auth.require_staff()?;

    let material_id = ObjectId::parse_str(&id)
        .map_err(|_| ApiError::BadRequest("Invalid material id".to_string()))?;

    let deleted = state.materials.delete(material_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Material not found".to_string()));
    }

    Ok(Json(serde_json::json!({ "message": "Material deleted" })))
}

fn to_response(m: Material) -> MaterialResponse {
    MaterialResponse {
        id: m.id.unwrap().to_hex(),
        materialname: m.material_name,
        features: m.features,
        is_active: m.is_active,
        created_at: m.created_at.try_to_rfc3339_string().unwrap_or_default(),
        updated_at: m.updated_at.try_to_rfc3339_string().unwrap_or_default(),
    }
}
