use axum::{
    extract::{Multipart, State},
    response::{IntoResponse, Json},
    Extension,
};
use serde_json::json;

use crate::error::ApiError;
use crate::handlers::multipart;
use crate::middleware::validate::{validate_update_user_input, UpdateUserInput};
use crate::middleware::AuthUser;
use crate::services::users::UserService;
use crate::state::AppState;

/// GET /api/v1/users/current-user - the caller's own profile.
/// The password hash never appears in the payload; the model's
/// serialization strips it unconditionally.
pub async fn current_user(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let service = UserService::new(state.pool.clone(), state.blob.clone());
    let profile = service.current(user.user_id).await?;
    Ok(Json(json!({ "user": profile })))
}

/// PATCH /api/v1/users/update-user - self-service profile update with an
/// optional avatar replacement
pub async fn update_user(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    body: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut form = multipart::collect(body, "avatar").await?;

    // A submitted password field is dropped on the floor here; this path
    // cannot change credentials
    let _ = form.take("password");

    let input = UpdateUserInput {
        full_name: form.take("fullName"),
        username: form.take("username"),
        phone_number: form.take("phoneNumber"),
        campus_residence: form.take("campusResidence"),
    };
    validate_update_user_input(&input)?;

    let service = UserService::new(state.pool.clone(), state.blob.clone());
    service.update(user.user_id, &input, form.file).await?;

    Ok(Json(json!({ "msg": "user updated successfully" })))
}
