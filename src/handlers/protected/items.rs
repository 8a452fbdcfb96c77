use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use serde_json::json;

use crate::config;
use crate::error::ApiError;
use crate::handlers::multipart;
use crate::middleware::validate::{parse_id_param, validate_item_input, ItemInput};
use crate::middleware::AuthUser;
use crate::query::{ItemPage, ListingParams, ListingQuery};
use crate::services::items::ItemService;
use crate::state::AppState;

fn service(state: &AppState) -> ItemService {
    ItemService::new(state.pool.clone(), state.blob.clone())
}

/// GET /api/v1/items - browse listings with search, category filter, sort,
/// and pagination
pub async fn get_all_items(
    State(state): State<AppState>,
    Query(params): Query<ListingParams>,
) -> Result<Json<ItemPage>, ApiError> {
    let query = ListingQuery::from_params(params, &config::config().listing);
    let page = service(&state).list(&query).await?;
    Ok(Json(page))
}

/// GET /api/v1/items/my-items - everything the caller has posted.
/// An empty list is a successful response, matching the general listing.
pub async fn get_user_items(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let user_items = service(&state).list_mine(user.user_id).await?;
    Ok(Json(json!({ "userItems": user_items })))
}

/// POST /api/v1/items - create a listing, with an optional image
pub async fn create_item(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    body: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut form = multipart::collect(body, "image").await?;
    let draft = validate_item_input(&item_input_from(&mut form))?;

    let item = service(&state)
        .create(user.user_id, draft, form.file)
        .await?;

    Ok((StatusCode::CREATED, Json(json!({ "item": item }))))
}

/// GET /api/v1/items/:id
pub async fn get_single_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id_param(&id)?;
    let item = service(&state).get(id).await?;
    Ok(Json(json!({ "item": item })))
}

/// PATCH /api/v1/items/:id - full-field replace, owner only
pub async fn update_item(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    body: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id_param(&id)?;
    let mut form = multipart::collect(body, "image").await?;
    let draft = validate_item_input(&item_input_from(&mut form))?;

    let item = service(&state)
        .update(id, user.user_id, draft, form.file)
        .await?;

    Ok(Json(json!({ "msg": "Item updated successfully", "item": item })))
}

/// DELETE /api/v1/items/:id - owner only
pub async fn delete_item(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id_param(&id)?;
    let item = service(&state).delete(id, user.user_id).await?;
    Ok(Json(json!({ "msg": "Item deleted successfully", "item": item })))
}

/// PATCH /api/v1/items/claim/:id - one-way claimed transition
pub async fn claim_item(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id_param(&id)?;
    let item = service(&state).claim(id, user.user_id).await?;
    Ok(Json(
        json!({ "msg": "Item marked as claimed successfully", "item": item }),
    ))
}

fn item_input_from(form: &mut multipart::FormData) -> ItemInput {
    ItemInput {
        name: form.take("name"),
        description: form.take("description"),
        category: form.take("category"),
        last_seen_location: form.take("lastSeenLocation"),
        found_location: form.take("foundLocation"),
    }
}
