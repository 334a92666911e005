use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::types::ApiErrorResponse;

/// Application error codes following the pattern E{service}{sequence}
///
/// Ranges:
/// - E0xxx: Shared/infrastructure errors
/// - E1xxx: Auth errors (token validation only; issuing is external)
/// - E2xxx: User/photo errors
/// - E3xxx: Matching errors
/// - E4xxx: Confession errors
/// - E5xxx: Notification errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Shared (E0xxx)
    InternalError,
    ValidationError,
    NotFound,
    Unauthorized,
    Forbidden,
    BadRequest,

    // Auth (E1xxx)
    TokenExpired,
    TokenInvalid,

    // User (E2xxx)
    UserNotFound,
    PhotoNotFound,
    PhotoAlreadyExists,

    // Matching (E3xxx)
    InvalidSwipeAction,
    SelfSwipe,
    MatchNotFound,

    // Confession (E4xxx)
    ConfessionNotFound,
    CommentNotFound,
    InvalidReactionKind,
    InvalidCategory,
    CannotReplyToReply,
    SelfReport,

    // Notification (E5xxx)
    NotificationNotFound,
}

impl ErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            // Shared
            Self::InternalError => "E0001",
            Self::ValidationError => "E0002",
            Self::NotFound => "E0003",
            Self::Unauthorized => "E0004",
            Self::Forbidden => "E0005",
            Self::BadRequest => "E0006",

            // Auth
            Self::TokenExpired => "E1001",
            Self::TokenInvalid => "E1002",

            // User
            Self::UserNotFound => "E2001",
            Self::PhotoNotFound => "E2002",
            Self::PhotoAlreadyExists => "E2003",

            // Matching
            Self::InvalidSwipeAction => "E3001",
            Self::SelfSwipe => "E3002",
            Self::MatchNotFound => "E3003",

            // Confession
            Self::ConfessionNotFound => "E4001",
            Self::CommentNotFound => "E4002",
            Self::InvalidReactionKind => "E4003",
            Self::InvalidCategory => "E4004",
            Self::CannotReplyToReply => "E4005",
            Self::SelfReport => "E4006",

            // Notification
            Self::NotificationNotFound => "E5001",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ValidationError | Self::BadRequest | Self::InvalidSwipeAction
            | Self::InvalidReactionKind | Self::InvalidCategory
            | Self::CannotReplyToReply => StatusCode::BAD_REQUEST,
            Self::NotFound | Self::UserNotFound | Self::PhotoNotFound
            | Self::MatchNotFound | Self::ConfessionNotFound | Self::CommentNotFound
            | Self::NotificationNotFound => StatusCode::NOT_FOUND,
            Self::Unauthorized | Self::TokenExpired | Self::TokenInvalid => {
                StatusCode::UNAUTHORIZED
            }
            Self::Forbidden | Self::SelfSwipe | Self::SelfReport => StatusCode::FORBIDDEN,
            Self::PhotoAlreadyExists => StatusCode::CONFLICT,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Known {
        code: ErrorCode,
        message: String,
        details: Option<serde_json::Value>,
    },

    #[error("internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Known {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(code: ErrorCode, message: impl Into<String>, details: serde_json::Value) -> Self {
        Self::Known {
            code,
            message: message.into(),
            details: Some(details),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match &self {
            AppError::Known { code, message, details } => {
                let status = code.status_code();
                let mut resp = ApiErrorResponse::new(code.code(), message);
                if let Some(d) = details {
                    resp = resp.with_details(d.clone());
                }
                (status, resp)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiErrorResponse::new("E0001", "internal server error"),
                )
            }
            AppError::Database(err) => {
                tracing::error!(error = %err, "database error");
                match err {
                    diesel::result::Error::NotFound => (
                        StatusCode::NOT_FOUND,
                        ApiErrorResponse::new("E0003", "resource not found"),
                    ),
                    _ => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ApiErrorResponse::new("E0001", "database error"),
                    ),
                }
            }
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ApiErrorResponse::new("E0002", msg),
            ),
        };

        (status, Json(error_response)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_are_unique() {
        let all = [
            ErrorCode::InternalError,
            ErrorCode::ValidationError,
            ErrorCode::NotFound,
            ErrorCode::Unauthorized,
            ErrorCode::Forbidden,
            ErrorCode::BadRequest,
            ErrorCode::TokenExpired,
            ErrorCode::TokenInvalid,
            ErrorCode::UserNotFound,
            ErrorCode::PhotoNotFound,
            ErrorCode::PhotoAlreadyExists,
            ErrorCode::InvalidSwipeAction,
            ErrorCode::SelfSwipe,
            ErrorCode::MatchNotFound,
            ErrorCode::ConfessionNotFound,
            ErrorCode::CommentNotFound,
            ErrorCode::InvalidReactionKind,
            ErrorCode::InvalidCategory,
            ErrorCode::CannotReplyToReply,
            ErrorCode::SelfReport,
            ErrorCode::NotificationNotFound,
        ];
        let mut codes: Vec<&str> = all.iter().map(|c| c.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), all.len());
    }

    #[test]
    fn not_found_family_maps_to_404() {
        for code in [
            ErrorCode::UserNotFound,
            ErrorCode::PhotoNotFound,
            ErrorCode::ConfessionNotFound,
            ErrorCode::CommentNotFound,
            ErrorCode::MatchNotFound,
            ErrorCode::NotificationNotFound,
        ] {
            assert_eq!(code.status_code(), StatusCode::NOT_FOUND);
        }
    }

    #[test]
    fn invalid_enum_values_map_to_400() {
        assert_eq!(ErrorCode::InvalidReactionKind.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::InvalidSwipeAction.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::InvalidCategory.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn self_swipe_is_forbidden() {
        assert_eq!(ErrorCode::SelfSwipe.status_code(), StatusCode::FORBIDDEN);
    }
}
