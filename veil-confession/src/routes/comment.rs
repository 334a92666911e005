use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use veil_shared::errors::AppResult;
use veil_shared::types::auth::AuthUser;
use veil_shared::types::ApiResponse;

use crate::events::publisher;
use crate::models::CommentView;
use crate::services::comment_service;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct AddCommentRequest {
    pub content: String,
    #[serde(default)]
    pub is_anonymous: bool,
}

#[derive(Debug, Serialize)]
pub struct CommentCreatedResponse {
    pub id: Uuid,
    pub content: String,
    pub is_anonymous: bool,
    pub author_name: Option<String>,
}

// --- POST /confessions/:id/comments ---

pub async fn add_comment(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(confession_id): Path<Uuid>,
    Json(req): Json<AddCommentRequest>,
) -> AppResult<Json<ApiResponse<CommentCreatedResponse>>> {
    let outcome = comment_service::add_comment(
        &state.db,
        confession_id,
        user.id,
        &req.content,
        req.is_anonymous,
    )?;

    tracing::info!(
        confession_id = %confession_id,
        comment_id = %outcome.comment.id,
        anonymous = req.is_anonymous,
        "comment added"
    );

    publisher::publish_comment_added(&state.rabbitmq, &outcome).await;

    Ok(Json(ApiResponse::ok(CommentCreatedResponse {
        id: outcome.comment.id,
        content: outcome.comment.content,
        is_anonymous: outcome.comment.is_anonymous,
        author_name: outcome.author_name,
    })))
}

// --- POST /confessions/:id/comments/:comment_id/replies ---

pub async fn add_reply(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path((confession_id, comment_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<AddCommentRequest>,
) -> AppResult<Json<ApiResponse<CommentCreatedResponse>>> {
    let outcome = comment_service::add_reply(
        &state.db,
        confession_id,
        comment_id,
        user.id,
        &req.content,
        req.is_anonymous,
    )?;

    publisher::publish_comment_added(&state.rabbitmq, &outcome).await;

    Ok(Json(ApiResponse::ok(CommentCreatedResponse {
        id: outcome.comment.id,
        content: outcome.comment.content,
        is_anonymous: outcome.comment.is_anonymous,
        author_name: outcome.author_name,
    })))
}

// --- GET /confessions/:id/comments ---

pub async fn list_comments(
    _user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(confession_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Vec<CommentView>>>> {
    let tree = comment_service::list_comments(&state.db, confession_id)?;

    Ok(Json(ApiResponse::ok(tree)))
}
