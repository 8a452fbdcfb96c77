use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use serde_json::json;

use crate::auth::{generate_jwt, Claims};
use crate::config;
use crate::error::ApiError;
use crate::middleware::auth::TOKEN_COOKIE;
use crate::middleware::validate::{
    validate_login_input, validate_register_input, LoginInput, RegisterInput,
};
use crate::services::users::UserService;
use crate::state::AppState;

/// POST /api/v1/auth/register - create an account
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterInput>,
) -> Result<impl IntoResponse, ApiError> {
    validate_register_input(&input)?;

    let service = UserService::new(state.pool.clone(), state.blob.clone());
    service.register(&input).await?;

    Ok((StatusCode::CREATED, Json(json!({ "msg": "user registered" }))))
}

/// POST /api/v1/auth/login - verify credentials and set the session cookie
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> Result<impl IntoResponse, ApiError> {
    validate_login_input(&input)?;

    let service = UserService::new(state.pool.clone(), state.blob.clone());
    let user = service
        .verify_credentials(&input.username, &input.password)
        .await?;

    let token = generate_jwt(Claims::new(user.id, user.role.clone()))?;

    let security = &config::config().security;
    let cookie = session_cookie(
        &token,
        security.jwt_expiry_hours * 3600,
        security.secure_cookies,
    );

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(json!({ "msg": "user logged in" })),
    ))
}

/// GET /api/v1/auth/logout - expire the session cookie
pub async fn logout() -> impl IntoResponse {
    let cookie = expired_cookie(config::config().security.secure_cookies);
    (
        [(header::SET_COOKIE, cookie)],
        Json(json!({ "msg": "user logged out" })),
    )
}

fn session_cookie(token: &str, max_age_secs: u64, secure: bool) -> String {
    format!(
        "{}={}; HttpOnly; Path=/; Max-Age={}; SameSite=Strict{}",
        TOKEN_COOKIE,
        token,
        max_age_secs,
        if secure { "; Secure" } else { "" }
    )
}

fn expired_cookie(secure: bool) -> String {
    format!(
        "{}=; HttpOnly; Path=/; Max-Age=0; SameSite=Strict{}",
        TOKEN_COOKIE,
        if secure { "; Secure" } else { "" }
    )
}
