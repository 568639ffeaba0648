use bcrypt::verify;
use crate::dtos::auth::{LoginRequest, LoginResponse, MeResponse};
use crate::auth::jwt::sign_token;
use crate::error::AppError;
use axum::{extract::State, Json};
use crate::state::AppState;
use crate::middleware::auth::AuthContext;
use axum::extract::Extension;

pub async fn login(
    State(AppState { auth, .. }): State<AppState>,
    Json(payload): Json<LoginRequest>
) -> Result<Json<LoginResponse>, AppError> {
    if payload.username.trim().is_empty() {
        return Err(AppError::validation("Username required"));
    }
    if payload.password.is_empty() {
        return Err(AppError::validation("Password required"));
    }

    let password_ok = verify(&payload.password, &auth.admin_password_hash)
        .map_err(|e| AppError::internal(format!("Hash verify error: {e}")))?;

    if payload.username.trim() != auth.admin_username || !password_ok {
        tracing::warn!(username = %payload.username, "Rejected login");
        return Err(AppError::unauthorized("Invalid credentials"));
    }

    let token = sign_token(&auth.admin_username, &auth.jwt_secret, auth.token_ttl_hours)?;
    tracing::info!(username = %auth.admin_username, "Administrator logged in");

    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer",
        expires_in: auth.token_ttl_hours * 3600,
        username: auth.admin_username.clone(),
    }))
}

pub async fn me(Extension(ctx): Extension<AuthContext>) -> Json<MeResponse> {
    Json(MeResponse { username: ctx.username })
}
