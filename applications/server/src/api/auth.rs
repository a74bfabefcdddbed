/// Authentication API routes
use crate::{
    error::{Result, ServerError},
    services::AuthService,
    state::AppState,
};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

fn invalid_credentials() -> ServerError {
    ServerError::Auth("Invalid username or password".to_string())
}

/// POST /api/auth/login
pub async fn login(
    State(app_state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let pool = app_state.db.pool();

    let user = setlist_storage::users::find_by_name(pool, &req.username)
        .await?
        .ok_or_else(invalid_credentials)?;

    // Users provisioned without a password cannot log in
    let password_hash = setlist_storage::users::get_password_hash(pool, &user.id)
        .await?
        .ok_or_else(invalid_credentials)?;

    if !AuthService::verify_password(&req.password, &password_hash)? {
        tracing::warn!(username = %req.username, "Rejected login");
        return Err(invalid_credentials());
    }

    let access_token = app_state.auth_service.create_access_token(&user.id)?;
    tracing::debug!(user_id = %user.id, "Issued access token");

    Ok(Json(LoginResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: app_state.auth_service.token_expiration().num_seconds(),
    }))
}
