use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use veil_shared::errors::{AppError, AppResult, ErrorCode};
use veil_shared::types::auth::AuthUser;
use veil_shared::types::ApiResponse;

use crate::events::publisher;
use crate::models::{
    ClassYear, Gender, GenderPreference, LookingFor, PhotoView, PublicProfile, UpdateUser, User,
};
use crate::services::{photo_service, profile_service};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct MyProfileResponse {
    #[serde(flatten)]
    pub user: User,
    pub photos: Vec<PhotoView>,
}

// --- GET /me ---

pub async fn get_profile(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<MyProfileResponse>>> {
    let me = profile_service::get_user(&state.db, user.id)?;
    let photos = photo_service::list_photos(&state.db, user.id)?;

    Ok(Json(ApiResponse::ok(MyProfileResponse {
        user: me,
        photos: photos.into_iter().map(PhotoView::from).collect(),
    })))
}

// --- PATCH /me ---

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 50, message = "name must be 1-50 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 500, message = "bio must be at most 500 characters"))]
    pub bio: Option<String>,
    #[validate(range(min = 18, max = 100, message = "age must be between 18 and 100"))]
    pub age: Option<i32>,
    pub year: Option<String>,
    pub branch: Option<String>,
    pub gender: Option<String>,
    pub interests: Option<Vec<String>>,
    pub looking_for: Option<String>,
    pub preference: Option<String>,
}

pub async fn update_profile(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdateProfileRequest>,
) -> AppResult<Json<ApiResponse<User>>> {
    req.validate()
        .map_err(|e| AppError::new(ErrorCode::ValidationError, e.to_string()))?;

    // Enum fields arrive as strings and are rejected before touching the row.
    if let Some(ref year) = req.year {
        year.parse::<ClassYear>()
            .map_err(|e| AppError::new(ErrorCode::ValidationError, e))?;
    }
    if let Some(ref gender) = req.gender {
        gender.parse::<Gender>()
            .map_err(|e| AppError::new(ErrorCode::ValidationError, e))?;
    }
    if let Some(ref looking_for) = req.looking_for {
        looking_for.parse::<LookingFor>()
            .map_err(|e| AppError::new(ErrorCode::ValidationError, e))?;
    }
    if let Some(ref preference) = req.preference {
        preference.parse::<GenderPreference>()
            .map_err(|e| AppError::new(ErrorCode::ValidationError, e))?;
    }

    // Interests behave as a set: duplicates collapse, order is not kept.
    let interests = req.interests.map(|items| {
        let set: BTreeSet<String> = items
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        serde_json::Value::Array(set.into_iter().map(serde_json::Value::String).collect())
    });

    let changes = UpdateUser {
        name: req.name,
        bio: req.bio,
        age: req.age,
        year: req.year,
        branch: req.branch,
        gender: req.gender,
        interests,
        looking_for: req.looking_for,
        preference: req.preference,
    };

    let updated = profile_service::update_profile(&state.db, user.id, changes)?;

    publisher::publish_profile_updated(
        &state.rabbitmq,
        updated.id,
        updated.name.as_deref(),
        &updated.college,
    )
    .await;

    Ok(Json(ApiResponse::ok(updated)))
}

// --- GET /users/:id ---

pub async fn get_public_profile(
    _user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<PublicProfile>>> {
    let target = profile_service::get_user(&state.db, id)?;
    let photos = photo_service::list_photos(&state.db, id)?;

    Ok(Json(ApiResponse::ok(PublicProfile::from_parts(target, photos))))
}
