//! Domain models stored by the roster database

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Pull request lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum PrStatus {
    Open,
    Merged,
}

impl PrStatus {
    pub fn as_str(&self) -> &str {
        match self {
            PrStatus::Open => "OPEN",
            PrStatus::Merged => "MERGED",
        }
    }
}

/// A user as seen inside their team
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TeamMember {
    pub id: String,
    pub username: String,
    pub is_active: bool,
}

/// A team and its members, ordered by username
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    pub members: Vec<TeamMember>,
}

/// A user with their owning team resolved
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub username: String,
    pub is_active: bool,
    pub team_name: String,
}

/// A fully hydrated pull request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    pub id: String,
    pub name: String,
    pub author_id: String,
    /// Fixed to the author's team at creation, never changes
    pub team_name: String,
    pub status: PrStatus,
    pub created_at: DateTime<Utc>,
    /// Set once on first merge, never cleared or overwritten
    pub merged_at: Option<DateTime<Utc>>,
    /// Reviewer ids in assignment order, oldest first
    pub reviewers: Vec<String>,
}

/// Pull request listing entry for a reviewer's queue
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PullRequestSummary {
    pub id: String,
    pub name: String,
    pub author_id: String,
    pub status: PrStatus,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_as_str_matches_stored_values() {
        // These strings are what the status column's CHECK constraint and
        // the decode path expect.
        assert_eq!(PrStatus::Open.as_str(), "OPEN");
        assert_eq!(PrStatus::Merged.as_str(), "MERGED");
    }
}
