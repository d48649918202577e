//! Repository for team and user membership operations

use chrono::Utc;
use sqlx::SqlitePool;

use crate::error::{is_unique_violation, Error, Result};
use crate::models::{Team, TeamMember, User};

/// Repository for managing teams and their members
pub struct TeamRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> TeamRepository<'a> {
    /// Create a new team repository
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a team and enrol its members in one transaction.
    ///
    /// Members that already exist are moved onto this team and their
    /// username and active flag updated. Members with an empty id are
    /// skipped.
    pub async fn create_team(&self, name: &str, members: &[TeamMember]) -> Result<Team> {
        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        let team_id: i64 = match sqlx::query_scalar(
            "INSERT INTO teams (name, created_at) VALUES (?, ?) RETURNING id",
        )
        .bind(name)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        {
            Ok(id) => id,
            Err(e) if is_unique_violation(&e) => {
                return Err(Error::TeamAlreadyExists(name.to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        for member in members {
            if member.id.is_empty() {
                continue;
            }
            sqlx::query(
                "INSERT INTO users (id, username, is_active, team_id, updated_at)
                 VALUES (?, ?, ?, ?, ?)
                 ON CONFLICT (id) DO UPDATE
                 SET username = excluded.username,
                     is_active = excluded.is_active,
                     team_id = excluded.team_id,
                     updated_at = excluded.updated_at",
            )
            .bind(&member.id)
            .bind(&member.username)
            .bind(member.is_active)
            .bind(team_id)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        tracing::debug!(team = name, members = members.len(), "team created");

        self.get_team(name).await
    }

    /// Fetch a team with its members ordered by username
    pub async fn get_team(&self, name: &str) -> Result<Team> {
        let team_id: i64 = sqlx::query_scalar("SELECT id FROM teams WHERE name = ?")
            .bind(name)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| Error::TeamNotFound(name.to_string()))?;

        let members = sqlx::query_as::<_, TeamMember>(
            "SELECT id, username, is_active FROM users WHERE team_id = ? ORDER BY username",
        )
        .bind(team_id)
        .fetch_all(self.pool)
        .await?;

        Ok(Team {
            name: name.to_string(),
            members,
        })
    }

    /// Flip a user's active flag.
    ///
    /// Inactive users are never picked as reviewers; assignments they
    /// already hold are left alone.
    pub async fn set_user_active(&self, user_id: &str, active: bool) -> Result<User> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query("UPDATE users SET is_active = ?, updated_at = ? WHERE id = ?")
            .bind(active)
            .bind(Utc::now())
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        if updated.rows_affected() == 0 {
            return Err(Error::UserNotFound(user_id.to_string()));
        }

        let user = sqlx::query_as::<_, User>(
            "SELECT u.id, u.username, u.is_active, t.name AS team_name
             FROM users u
             JOIN teams t ON t.id = u.team_id
             WHERE u.id = ?",
        )
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(user)
    }
}
