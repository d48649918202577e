//! Pull request repository and reviewer-assignment engine
//!
//! Each mutating operation here is one transaction: all reads it decides on
//! happen inside it, and any failure rolls back completely. Cross-row
//! consistency (duplicate ids, "not already assigned", pool exclusions)
//! rests on the store's constraints and the transaction boundary, never on
//! a pre-check outside it.

use chrono::{DateTime, Utc};
use roster_core::Selector;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::debug;

use crate::error::{is_busy, is_unique_violation, Error, Result};
use crate::models::{PrStatus, PullRequest, PullRequestSummary};

/// Reviewers assigned at creation, pool permitting
pub const MAX_REVIEWERS: usize = 2;

/// Repository for pull requests and their reviewer assignments
pub struct PullRequestRepository<'a> {
    pool: &'a SqlitePool,
    selector: &'a Selector,
}

#[derive(sqlx::FromRow)]
struct PullRequestRow {
    id: String,
    name: String,
    author_id: String,
    team_id: i64,
    team_name: String,
    status: PrStatus,
    created_at: DateTime<Utc>,
    merged_at: Option<DateTime<Utc>>,
}

impl<'a> PullRequestRepository<'a> {
    /// Create a new pull request repository
    pub fn new(pool: &'a SqlitePool, selector: &'a Selector) -> Self {
        Self { pool, selector }
    }

    /// Open a pull request and assign up to two reviewers.
    ///
    /// The candidate pool is the author's active teammates. A pool smaller
    /// than two is not an error: the pull request is created with however
    /// many reviewers could be filled (0, 1, or 2).
    pub async fn create(&self, id: &str, name: &str, author_id: &str) -> Result<PullRequest> {
        let mut tx = self.pool.begin().await?;

        let team_id: i64 = sqlx::query_scalar("SELECT team_id FROM users WHERE id = ?")
            .bind(author_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| Error::AuthorNotFound(author_id.to_string()))?;

        let now = Utc::now();
        // The primary key is the duplicate detector; a pre-check would race
        // against concurrent creates of the same id.
        if let Err(e) = sqlx::query(
            "INSERT INTO pull_requests (id, name, author_id, team_id, status, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(name)
        .bind(author_id)
        .bind(team_id)
        .bind(PrStatus::Open.as_str())
        .bind(now)
        .execute(&mut *tx)
        .await
        {
            if is_unique_violation(&e) {
                return Err(Error::PullRequestAlreadyExists(id.to_string()));
            }
            return Err(e.into());
        }

        let candidates = eligible_candidates(&mut tx, team_id, author_id, &[]).await?;
        let reviewers = self.selector.pick_up_to(&candidates, MAX_REVIEWERS);
        for reviewer_id in &reviewers {
            sqlx::query(
                "INSERT INTO pull_request_reviewers (pull_request_id, reviewer_id, assigned_at)
                 VALUES (?, ?, ?)",
            )
            .bind(id)
            .bind(reviewer_id)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        debug!(
            pull_request = id,
            reviewers = reviewers.len(),
            "pull request created"
        );

        self.get(id).await
    }

    /// Replace one assigned reviewer with a fresh pick.
    ///
    /// The replacement pool excludes the author and every currently
    /// assigned reviewer, the outgoing one included: a reassignment must
    /// produce a different reviewer, never re-pick the old one.
    pub async fn reassign(&self, id: &str, old_reviewer_id: &str) -> Result<(PullRequest, String)> {
        let mut tx = self.pool.begin().await?;

        let pr = fetch_row(&mut tx, id)
            .await?
            .ok_or_else(|| Error::PullRequestNotFound(id.to_string()))?;
        if pr.status == PrStatus::Merged {
            return Err(Error::PullRequestAlreadyMerged(id.to_string()));
        }

        let current: Vec<String> = sqlx::query_scalar(
            "SELECT reviewer_id FROM pull_request_reviewers WHERE pull_request_id = ?",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;
        if !current.iter().any(|r| r == old_reviewer_id) {
            return Err(Error::ReviewerNotAssigned {
                pull_request: id.to_string(),
                reviewer: old_reviewer_id.to_string(),
            });
        }

        let candidates = eligible_candidates(&mut tx, pr.team_id, &pr.author_id, &current).await?;
        if candidates.is_empty() {
            return Err(Error::NoEligibleCandidate(id.to_string()));
        }

        let replacement = self.selector.pick(&candidates)?.clone();
        sqlx::query(
            "UPDATE pull_request_reviewers
             SET reviewer_id = ?, assigned_at = ?
             WHERE pull_request_id = ? AND reviewer_id = ?",
        )
        .bind(&replacement)
        .bind(Utc::now())
        .bind(id)
        .bind(old_reviewer_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        debug!(
            pull_request = id,
            old = old_reviewer_id,
            new = %replacement,
            "reviewer reassigned"
        );

        let pr = self.get(id).await?;
        Ok((pr, replacement))
    }

    /// Mark a pull request merged.
    ///
    /// Idempotent: merging an already-merged pull request re-returns its
    /// stored state, and `merged_at` is set once and never overwritten.
    /// Reviewer assignments are not touched.
    pub async fn merge(&self, id: &str) -> Result<PullRequest> {
        let updated = sqlx::query(
            "UPDATE pull_requests
             SET status = ?, merged_at = COALESCE(merged_at, ?)
             WHERE id = ?",
        )
        .bind(PrStatus::Merged.as_str())
        .bind(Utc::now())
        .bind(id)
        .execute(self.pool)
        .await?;
        if updated.rows_affected() == 0 {
            return Err(Error::PullRequestNotFound(id.to_string()));
        }

        self.get(id).await
    }

    /// Fetch a pull request with its reviewers in assignment order,
    /// oldest first.
    pub async fn get(&self, id: &str) -> Result<PullRequest> {
        match self.try_get(id).await {
            Err(Error::Sqlx(e)) if is_busy(&e) => self.try_get(id).await,
            other => other,
        }
    }

    async fn try_get(&self, id: &str) -> Result<PullRequest> {
        let row = sqlx::query_as::<_, PullRequestRow>(
            "SELECT pr.id, pr.name, pr.author_id, pr.team_id, t.name AS team_name,
                    pr.status, pr.created_at, pr.merged_at
             FROM pull_requests pr
             JOIN teams t ON t.id = pr.team_id
             WHERE pr.id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| Error::PullRequestNotFound(id.to_string()))?;

        let reviewers: Vec<String> = sqlx::query_scalar(
            "SELECT reviewer_id FROM pull_request_reviewers
             WHERE pull_request_id = ?
             ORDER BY assigned_at, rowid",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        Ok(PullRequest {
            id: row.id,
            name: row.name,
            author_id: row.author_id,
            team_name: row.team_name,
            status: row.status,
            created_at: row.created_at,
            merged_at: row.merged_at,
            reviewers,
        })
    }

    /// Pull requests a user is assigned to review, newest first
    pub async fn list_by_reviewer(&self, reviewer_id: &str) -> Result<Vec<PullRequestSummary>> {
        match self.try_list_by_reviewer(reviewer_id).await {
            Err(Error::Sqlx(e)) if is_busy(&e) => self.try_list_by_reviewer(reviewer_id).await,
            other => other,
        }
    }

    async fn try_list_by_reviewer(&self, reviewer_id: &str) -> Result<Vec<PullRequestSummary>> {
        let prs = sqlx::query_as::<_, PullRequestSummary>(
            "SELECT pr.id, pr.name, pr.author_id, pr.status, pr.created_at
             FROM pull_requests pr
             JOIN pull_request_reviewers rvr ON rvr.pull_request_id = pr.id
             WHERE rvr.reviewer_id = ?
             ORDER BY pr.created_at DESC",
        )
        .bind(reviewer_id)
        .fetch_all(self.pool)
        .await?;

        Ok(prs)
    }
}

/// Active members of a team, excluding the author and every id in
/// `excluded`, in a stable order for the selector to draw from.
async fn eligible_candidates(
    tx: &mut Transaction<'_, Sqlite>,
    team_id: i64,
    author_id: &str,
    excluded: &[String],
) -> Result<Vec<String>> {
    let candidates: Vec<String> = sqlx::query_scalar(
        "SELECT id FROM users
         WHERE team_id = ? AND is_active = 1 AND id <> ?
         ORDER BY id",
    )
    .bind(team_id)
    .bind(author_id)
    .fetch_all(&mut **tx)
    .await?;

    Ok(candidates
        .into_iter()
        .filter(|c| !excluded.contains(c))
        .collect())
}

async fn fetch_row(tx: &mut Transaction<'_, Sqlite>, id: &str) -> Result<Option<PullRequestRow>> {
    let row = sqlx::query_as::<_, PullRequestRow>(
        "SELECT pr.id, pr.name, pr.author_id, pr.team_id, t.name AS team_name,
                pr.status, pr.created_at, pr.merged_at
         FROM pull_requests pr
         JOIN teams t ON t.id = pr.team_id
         WHERE pr.id = ?",
    )
    .bind(id)
    .fetch_optional(&mut **tx)
    .await?;

    Ok(row)
}
