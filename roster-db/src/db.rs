//! Database connection and configuration

use std::path::PathBuf;
use std::str::FromStr;

use roster_core::Selector;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::ConnectOptions;

use crate::error::{Error, Result};
use crate::repos::{PullRequestRepository, TeamRepository};

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Path to SQLite database file
    pub path: PathBuf,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        let db_path = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("roster")
            .join("roster.db");

        Self {
            path: db_path,
            max_connections: 5,
        }
    }
}

impl DatabaseConfig {
    /// Create a new database config with the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_connections: 5,
        }
    }

    /// Set the maximum number of connections
    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }
}

/// Database connection pool plus the reviewer selector shared by the
/// assignment operations
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
    selector: Selector,
}

impl Database {
    /// Connect to the database with the given configuration
    pub async fn connect(config: DatabaseConfig) -> Result<Self> {
        Self::connect_with_selector(config, Selector::thread_rng()).await
    }

    /// Connect with an explicit reviewer selector
    ///
    /// Tests pass a seeded selector to make assignment picks deterministic.
    pub async fn connect_with_selector(config: DatabaseConfig, selector: Selector) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = config.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Io(format!("failed to create database directory: {}", e)))?;
        }

        let options =
            SqliteConnectOptions::from_str(&format!("sqlite://{}", config.path.display()))?
                .create_if_missing(true)
                .foreign_keys(true)
                .disable_statement_logging();

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        let db = Self { pool, selector };
        db.migrate().await?;
        Ok(db)
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        let migration_sql = include_str!("../migrations/001_initial_schema.sql");

        sqlx::raw_sql(migration_sql)
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Migration(e.to_string()))?;

        Ok(())
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Get the team and membership repository
    pub fn teams(&self) -> TeamRepository<'_> {
        TeamRepository::new(&self.pool)
    }

    /// Get the pull request repository and assignment engine
    pub fn pull_requests(&self) -> PullRequestRepository<'_> {
        PullRequestRepository::new(&self.pool, &self.selector)
    }

    /// Close the database connection
    pub async fn close(self) {
        self.pool.close().await;
    }
}
