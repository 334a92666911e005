use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use veil_shared::errors::{AppError, AppResult, ErrorCode};
use veil_shared::types::auth::AuthUser;
use veil_shared::types::ApiResponse;

use crate::events::publisher;
use crate::models::{MatchView, SwipeAction};
use crate::services::swipe_service;
use crate::AppState;

// --- POST /swipes ---

#[derive(Debug, Deserialize)]
pub struct SwipeRequest {
    pub target_user_id: Uuid,
    pub action: String,
}

#[derive(Debug, Serialize)]
pub struct SwipeResponse {
    pub is_match: bool,
    /// False when a repeated mutual like rediscovered an existing match.
    pub is_new: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_id: Option<Uuid>,
}

pub async fn swipe(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<SwipeRequest>,
) -> AppResult<Json<ApiResponse<SwipeResponse>>> {
    let action: SwipeAction = req.action.parse().map_err(|_| {
        AppError::new(
            ErrorCode::InvalidSwipeAction,
            format!("unknown swipe action '{}'", req.action),
        )
    })?;

    let outcome = swipe_service::record_swipe(&state.db, user.id, req.target_user_id, action)?;

    tracing::info!(
        target_id = %req.target_user_id,
        action = %action,
        matched = outcome.matched.is_some(),
        "swipe recorded"
    );

    // The event fires only for newly created matches, not rediscoveries.
    if outcome.is_new_match {
        if let Some(ref matched) = outcome.matched {
            publisher::publish_match_created(&state.rabbitmq, &state.db, matched).await;
        }
    }

    Ok(Json(ApiResponse::ok(SwipeResponse {
        is_match: outcome.matched.is_some(),
        is_new: outcome.is_new_match,
        match_id: outcome.matched.map(|m| m.id),
    })))
}

// --- GET /matches ---

pub async fn list_matches(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<Vec<MatchView>>>> {
    let matches = swipe_service::list_matches(&state.db, user.id)?;

    Ok(Json(ApiResponse::ok(matches)))
}
