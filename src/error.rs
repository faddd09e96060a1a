use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;

/// Every failure the core surfaces to callers. All variants except
/// `Unavailable` are definitive business rejections; `Unavailable` means the
/// store could not be reached and the caller may retry after re-checking
/// state.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("slot lies in the past or is malformed: {0}")]
    InvalidSlot(String),
    #[error("slot is not available")]
    SlotUnavailable,
    #[error("match is already full")]
    MatchFull,
    #[error("player is already a member of this match")]
    AlreadyMember,
    #[error("player is not a member of this match")]
    NotMember,
    #[error("the organizer is implicitly a participant")]
    IsOrganizer,
    #[error("match no longer accepts roster changes")]
    MatchClosed,
    #[error("invalid state transition: {0}")]
    InvalidTransition(String),
    #[error("teams do not form a balanced partition of the roster: {0}")]
    UnbalancedTeams(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Validation(String),
    #[error("backing store unavailable")]
    Unavailable(#[from] sqlx::Error),
}

impl ApiError {
    /// Stable machine-readable code, independent of the human message.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidSlot(_) => "invalid_slot",
            ApiError::SlotUnavailable => "slot_unavailable",
            ApiError::MatchFull => "match_full",
            ApiError::AlreadyMember => "already_member",
            ApiError::NotMember => "not_member",
            ApiError::IsOrganizer => "is_organizer",
            ApiError::MatchClosed => "match_closed",
            ApiError::InvalidTransition(_) => "invalid_transition",
            ApiError::UnbalancedTeams(_) => "unbalanced_teams",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::NotFound(_) => "not_found",
            ApiError::Validation(_) => "validation",
            ApiError::Unavailable(_) => "unavailable",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidSlot(_) | ApiError::Validation(_) | ApiError::UnbalancedTeams(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Forbidden(_) | ApiError::IsOrganizer => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::SlotUnavailable
            | ApiError::MatchFull
            | ApiError::AlreadyMember
            | ApiError::NotMember
            | ApiError::MatchClosed
            | ApiError::InvalidTransition(_) => StatusCode::CONFLICT,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let ApiError::Unavailable(e) = self {
            tracing::error!("Backing store error: {:?}", e);
        }
        HttpResponse::build(self.status_code()).json(json!({
            "success": false,
            "code": self.code(),
            "message": self.to_string(),
        }))
    }
}
