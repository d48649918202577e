//! Maps engine errors onto the HTTP error envelope

use std::fmt;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use roster_db::Error as DbError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

/// Error envelope shared by every endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

/// A domain error with its HTTP rendering
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status).json(ErrorEnvelope {
            error: ErrorBody {
                code: self.code.to_string(),
                message: self.message.clone(),
            },
        })
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        let (status, code) = match &err {
            DbError::TeamAlreadyExists(_) => (StatusCode::BAD_REQUEST, "TEAM_EXISTS"),
            DbError::TeamNotFound(_)
            | DbError::UserNotFound(_)
            | DbError::AuthorNotFound(_)
            | DbError::PullRequestNotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            DbError::PullRequestAlreadyExists(_) => (StatusCode::CONFLICT, "PR_EXISTS"),
            DbError::PullRequestAlreadyMerged(_) => (StatusCode::CONFLICT, "PR_MERGED"),
            DbError::ReviewerNotAssigned { .. } => (StatusCode::CONFLICT, "NOT_ASSIGNED"),
            DbError::NoEligibleCandidate(_) => (StatusCode::CONFLICT, "NO_CANDIDATE"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL"),
        };

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %err, "internal error");
            "internal error".to_string()
        } else {
            err.to_string()
        };

        Self {
            status,
            code,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_map_to_documented_statuses() {
        let cases = [
            (
                ApiError::from(DbError::TeamAlreadyExists("t".into())),
                StatusCode::BAD_REQUEST,
                "TEAM_EXISTS",
            ),
            (
                ApiError::from(DbError::AuthorNotFound("u".into())),
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
            ),
            (
                ApiError::from(DbError::PullRequestAlreadyExists("p".into())),
                StatusCode::CONFLICT,
                "PR_EXISTS",
            ),
            (
                ApiError::from(DbError::PullRequestAlreadyMerged("p".into())),
                StatusCode::CONFLICT,
                "PR_MERGED",
            ),
            (
                ApiError::from(DbError::ReviewerNotAssigned {
                    pull_request: "p".into(),
                    reviewer: "u".into(),
                }),
                StatusCode::CONFLICT,
                "NOT_ASSIGNED",
            ),
            (
                ApiError::from(DbError::NoEligibleCandidate("p".into())),
                StatusCode::CONFLICT,
                "NO_CANDIDATE",
            ),
        ];

        for (err, status, code) in cases {
            assert_eq!(err.status, status);
            assert_eq!(err.code, code);
        }
    }

    #[test]
    fn test_store_failures_are_opaque_internal_errors() {
        let err = ApiError::from(DbError::Migration("boom".into()));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code, "INTERNAL");
        // The store detail must not leak to the caller
        assert_eq!(err.message, "internal error");
    }
}
