use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use veil_shared::errors::{AppError, AppResult, ErrorCode};
use veil_shared::reaction::{ReactionCounts, ReactionKind};
use veil_shared::types::auth::AuthUser;
use veil_shared::types::pagination::{Paginated, PaginationParams};
use veil_shared::types::ApiResponse;

use crate::events::publisher;
use crate::models::{ConfessionCategory, ConfessionView};
use crate::services::{confession_service, reaction_service};
use crate::AppState;

// --- POST /confessions ---

#[derive(Debug, Deserialize)]
pub struct CreateConfessionRequest {
    pub content: String,
    pub category: String,
}

pub async fn create_confession(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateConfessionRequest>,
) -> AppResult<Json<ApiResponse<ConfessionView>>> {
    let category: ConfessionCategory = req.category.parse().map_err(|_| {
        AppError::new(
            ErrorCode::InvalidCategory,
            format!("unknown category '{}'", req.category),
        )
    })?;

    let confession =
        confession_service::create_confession(&state.db, user.id, &req.content, category)?;

    tracing::info!(
        confession_id = %confession.id,
        college = %confession.college,
        category = %confession.category,
        "confession created"
    );

    publisher::publish_confession_created(&state.rabbitmq, &confession).await;

    Ok(Json(ApiResponse::ok(confession_service::view_for(&confession, user.id))))
}

// --- GET /confessions ---

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub category: Option<String>,
}

impl FeedQuery {
    fn pagination(&self) -> PaginationParams {
        let defaults = PaginationParams::default();
        PaginationParams {
            page: self.page.unwrap_or(defaults.page),
            per_page: self.per_page.unwrap_or(defaults.per_page),
        }
    }
}

pub async fn feed(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Query(query): Query<FeedQuery>,
) -> AppResult<Json<ApiResponse<Paginated<ConfessionView>>>> {
    let category = query
        .category
        .as_deref()
        .map(|raw| {
            raw.parse::<ConfessionCategory>().map_err(|_| {
                AppError::new(ErrorCode::InvalidCategory, format!("unknown category '{raw}'"))
            })
        })
        .transpose()?;

    let pagination = query.pagination();
    let (items, total) = confession_service::list_feed(&state.db, user.id, category, &pagination)?;

    let views = items
        .iter()
        .map(|c| confession_service::view_for(c, user.id))
        .collect();

    Ok(Json(ApiResponse::ok(Paginated::new(views, total, &pagination))))
}

// --- GET /confessions/:id ---

pub async fn get_confession(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(confession_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ConfessionView>>> {
    let confession = confession_service::get_confession(&state.db, confession_id)?;

    Ok(Json(ApiResponse::ok(confession_service::view_for(&confession, user.id))))
}

// --- POST /confessions/:id/react ---

#[derive(Debug, Deserialize)]
pub struct ReactRequest {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Serialize)]
pub struct ReactResponse {
    pub reaction_counts: ReactionCounts,
    pub user_reacted: bool,
}

pub async fn react(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(confession_id): Path<Uuid>,
    Json(req): Json<ReactRequest>,
) -> AppResult<Json<ApiResponse<ReactResponse>>> {
    let kind: ReactionKind = req.kind.parse().map_err(|_| {
        AppError::new(
            ErrorCode::InvalidReactionKind,
            format!("unknown reaction kind '{}'", req.kind),
        )
    })?;

    let outcome = reaction_service::toggle_reaction(&state.db, confession_id, user.id, kind)?;

    publisher::publish_confession_reacted(&state.rabbitmq, &outcome).await;

    Ok(Json(ApiResponse::ok(ReactResponse {
        reaction_counts: outcome.counts,
        user_reacted: outcome.reacted,
    })))
}

// --- POST /confessions/:id/report ---

#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    #[serde(default)]
    pub reason: String,
}

pub async fn report(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(confession_id): Path<Uuid>,
    Json(req): Json<ReportRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    let reason = req.reason.trim();
    let reason = if reason.is_empty() { "unspecified" } else { reason };

    confession_service::report_confession(&state.db, confession_id, user.id, reason)?;

    tracing::info!(confession_id = %confession_id, "confession reported");

    publisher::publish_confession_reported(&state.rabbitmq, confession_id, user.id, reason).await;

    Ok(Json(ApiResponse::ok(())))
}
