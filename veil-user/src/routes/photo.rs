use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use veil_shared::errors::{AppError, AppResult, ErrorCode};
use veil_shared::types::auth::AuthUser;
use veil_shared::types::ApiResponse;

use crate::events::publisher;
use crate::models::PhotoView;
use crate::services::photo_service;
use crate::AppState;

// --- POST /photos ---

#[derive(Debug, Deserialize)]
pub struct RegisterPhotoRequest {
    pub url: String,
    pub storage_key: String,
}

pub async fn register_photo(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterPhotoRequest>,
) -> AppResult<Json<ApiResponse<PhotoView>>> {
    if req.url.trim().is_empty() || req.storage_key.trim().is_empty() {
        return Err(AppError::new(
            ErrorCode::ValidationError,
            "url and storage_key are required",
        ));
    }

    let photo = photo_service::register_photo(&state.db, user.id, &req.url, &req.storage_key)?;

    tracing::info!(user_id = %user.id, photo_id = %photo.id, "photo registered");

    Ok(Json(ApiResponse::ok(PhotoView::from(photo))))
}

// --- DELETE /photos/:id ---

pub async fn delete_photo(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(photo_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    photo_service::delete_photo(&state.db, user.id, photo_id)?;

    tracing::info!(user_id = %user.id, photo_id = %photo_id, "photo deleted");

    Ok(Json(ApiResponse::ok(())))
}

// --- POST /photos/:id/main ---

pub async fn set_main_photo(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(photo_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<PhotoView>>> {
    let photo = photo_service::set_main_photo(&state.db, user.id, photo_id)?;

    Ok(Json(ApiResponse::ok(PhotoView::from(photo))))
}

// --- POST /photos/like ---

#[derive(Debug, Deserialize)]
pub struct LikePhotoRequest {
    pub photo_url: String,
    /// Accepted for wire compatibility with existing clients, but ignored:
    /// the operation is always a toggle, the caller cannot force an
    /// end-state. See DESIGN.md.
    #[serde(default)]
    #[allow(dead_code)]
    pub is_like: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct LikePhotoResponse {
    pub is_liked: bool,
    pub like_count: i32,
}

pub async fn like_photo(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<LikePhotoRequest>,
) -> AppResult<Json<ApiResponse<LikePhotoResponse>>> {
    let outcome = photo_service::toggle_like(&state.db, user.id, &req.photo_url)?;

    publisher::publish_photo_liked(&state.rabbitmq, &outcome, user.id).await;

    Ok(Json(ApiResponse::ok(LikePhotoResponse {
        is_liked: outcome.is_liked,
        like_count: outcome.like_count,
    })))
}
