use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use gatsishub_db::models::{CustomerProfile, User};
use gatsishub_services::auth::AuthError;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "Company name is required"))]
    pub company_name: String,
    #[validate(length(min = 1, message = "Contact person is required"))]
    pub contact_person: String,
    pub phone: Option<String>,
    pub delivery_address: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyLoginCodeRequest {
    pub email: String,
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteAccountRequest {
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: u64,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub role: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_person: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    pub is_mfa_enabled: bool,
}

fn to_user_response(user: &User) -> UserResponse {
    UserResponse {
        id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
        email: user.email.clone(),
        role: user.role.as_str().to_string(),
        display_name: user.display_name(),
        company_name: user.customer.as_ref().map(|c| c.company_name.clone()),
        contact_person: user.customer.as_ref().map(|c| c.contact_person.clone()),
        full_name: user.employee.as_ref().map(|e| e.full_name.clone()),
        team_id: user
            .employee
            .as_ref()
            .and_then(|e| e.team_id.map(|t| t.to_hex())),
        is_mfa_enabled: user.is_mfa_enabled,
    }
}

fn session_cookie(token: &str, max_age: u64) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let cookie = format!(
        "access_token={}; HttpOnly; Path=/; SameSite=Lax; Max-Age={}",
        token, max_age
    );
    headers.insert(header::SET_COOKIE, cookie.parse().unwrap());
    headers
}

pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> Result<(StatusCode, HeaderMap, Json<AuthResponse>), ApiError> {
    body.validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let password_hash = state.auth.hash_password(&body.password)?;

    let profile = CustomerProfile {
        company_name: body.company_name,
        contact_person: body.contact_person,
        phone: body.phone,
        delivery_address: body.delivery_address,
    };

    let user = state
        .users
        .create_customer(body.email, password_hash, profile)
        .await?;

    let user_id = user.id.unwrap();
    let tokens = state
        .auth
        .generate_tokens(user_id, &user.email, user.role)?;

    let headers = session_cookie(&tokens.access_token, tokens.expires_in);

    let response = AuthResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        expires_in: tokens.expires_in,
        user: to_user_response(&user),
    };

    Ok((StatusCode::CREATED, headers, Json(response)))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    let user = state
        .users
        .find_by_email(&body.email)
        .await
        .map_err(|_| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    let password_hash = user
        .password_hash
        .as_ref()
        .ok_or_else(|| ApiError::Unauthorized("No password set".to_string()))?;

    let valid = state.auth.verify_password(&body.password, password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    let user_id = user.id.unwrap();

    // MFA-enabled accounts get a persisted one-shot code instead of tokens.
    // Delivery of the code (email/SMS) happens outside this service.
    if user.is_mfa_enabled {
        let code = state
            .auth
            .generate_login_code(state.settings.mfa.login_code_digits);
        state
            .login_codes
            .create(user_id, code, state.settings.mfa.login_code_ttl_secs)
            .await?;

        return Ok(Json(serde_json::json!({ "requiresVerification": true })).into_response());
    }

    let tokens = state
        .auth
        .generate_tokens(user_id, &user.email, user.role)?;

    let headers = session_cookie(&tokens.access_token, tokens.expires_in);

    let response = AuthResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        expires_in: tokens.expires_in,
        user: to_user_response(&user),
    };

    Ok((headers, Json(response)).into_response())
}

pub async fn verify_login_code(
    State(state): State<AppState>,
    Json(body): Json<VerifyLoginCodeRequest>,
) -> Result<(HeaderMap, Json<AuthResponse>), ApiError> {
    let user = state
        .users
        .find_by_email(&body.email)
        .await
        .map_err(|_| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    let user_id = user.id.unwrap();

    let consumed = state.login_codes.consume(user_id, &body.code).await?;
    if !consumed {
        return Err(AuthError::CodeInvalid.into());
    }

    let tokens = state
        .auth
        .generate_tokens(user_id, &user.email, user.role)?;

    let headers = session_cookie(&tokens.access_token, tokens.expires_in);

    let response = AuthResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        expires_in: tokens.expires_in,
        user: to_user_response(&user),
    };

    Ok((headers, Json(response)))
}

pub async fn refresh(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> Result<(HeaderMap, Json<AuthResponse>), ApiError> {
    let claims = state.auth.verify_refresh_token(&body.refresh_token)?;

    let user_id = bson::oid::ObjectId::parse_str(&claims.sub)
        .map_err(|_| ApiError::Unauthorized("Invalid user ID".to_string()))?;

    let user = state.users.find_active_by_id(user_id).await?;

    let tokens = state
        .auth
        .generate_tokens(user_id, &user.email, user.role)?;

    let headers = session_cookie(&tokens.access_token, tokens.expires_in);

    let response = AuthResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        expires_in: tokens.expires_in,
        user: to_user_response(&user),
    };

    Ok((headers, Json(response)))
}

pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if body.new_password.len() < 8 {
        return Err(ApiError::BadRequest(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    let user = state.users.find_active_by_id(auth.user_id).await?;
    let password_hash = user
        .password_hash
        .as_ref()
        .ok_or_else(|| ApiError::Unauthorized("No password set".to_string()))?;

    let valid = state
        .auth
        .verify_password(&body.current_password, password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Current password is incorrect".to_string(),
        ));
    }

    let new_hash = state.auth.hash_password(&body.new_password)?;
    state.users.update_password(auth.user_id, new_hash).await?;

    Ok(Json(serde_json::json!({ "message": "Password updated" })))
}

pub async fn delete_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<DeleteAccountRequest>,
) -> Result<(HeaderMap, Json<serde_json::Value>), ApiError> {
    let user = state.users.find_active_by_id(auth.user_id).await?;
    let password_hash = user
        .password_hash
        .as_ref()
        .ok_or_else(|| ApiError::Unauthorized("No password set".to_string()))?;

    let valid = state.auth.verify_password(&body.password, password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    state.users.soft_delete(auth.user_id).await?;

    let mut headers = HeaderMap::new();
    let cookie = "access_token=; HttpOnly; Path=/; SameSite=Lax; Max-Age=0";
    headers.insert(header::SET_COOKIE, cookie.parse().unwrap());

    Ok((headers, Json(serde_json::json!({ "message": "Account deleted" }))))
}

pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.users.find_active_by_id(auth.user_id).await?;
    Ok(Json(to_user_response(&user)))
}
