//! Error types for storage and assignment operations

use roster_core::SelectorError;
use thiserror::Error;

/// Result type alias for storage operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for storage and assignment operations
///
/// The domain variants are terminal outcomes returned to the caller
/// verbatim; `Sqlx` covers transient store failures (connectivity, busy
/// database, write conflicts) that the caller may retry as a whole.
#[derive(Error, Debug)]
pub enum Error {
    /// SQLx database error
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Migration error
    #[error("migration error: {0}")]
    Migration(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(String),

    /// Team name already taken
    #[error("team already exists: {0}")]
    TeamAlreadyExists(String),

    /// Unknown team name
    #[error("team not found: {0}")]
    TeamNotFound(String),

    /// Unknown user id
    #[error("user not found: {0}")]
    UserNotFound(String),

    /// Pull request author id unknown at creation
    #[error("author not found: {0}")]
    AuthorNotFound(String),

    /// Pull request id already taken
    #[error("pull request already exists: {0}")]
    PullRequestAlreadyExists(String),

    /// Unknown pull request id
    #[error("pull request not found: {0}")]
    PullRequestNotFound(String),

    /// Mutation attempted on a merged pull request
    #[error("pull request already merged: {0}")]
    PullRequestAlreadyMerged(String),

    /// Reassignment target is not currently on the pull request
    #[error("reviewer {reviewer} is not assigned to pull request {pull_request}")]
    ReviewerNotAssigned {
        pull_request: String,
        reviewer: String,
    },

    /// Reassignment pool is empty
    #[error("no eligible reviewer candidate for pull request {0}")]
    NoEligibleCandidate(String),

    /// Selector misuse. Engine operations check pool emptiness before
    /// drawing, so this should never reach a caller.
    #[error(transparent)]
    Selector(#[from] SelectorError),
}

/// True when the error is the store's uniqueness constraint firing.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

/// True when SQLite reports the database busy or locked (SQLITE_BUSY,
/// SQLITE_LOCKED). Pure reads retry once on these.
pub(crate) fn is_busy(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref().is_some_and(is_busy_code))
}

/// SQLite reports extended result codes (SQLITE_BUSY_SNAPSHOT is 517, not
/// 5); the primary code is the low byte.
fn is_busy_code(code: &str) -> bool {
    code.parse::<u32>()
        .is_ok_and(|c| matches!(c & 0xff, 5 | 6))
}
