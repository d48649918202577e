//! Database layer for the reviewer roster service
//!
//! Provides persistence for teams, users, and pull requests, and the
//! transactional reviewer-assignment operations on top of them. Every
//! mutating operation runs as a single transaction: it either commits
//! whole or leaves no trace.

pub mod db;
pub mod error;
pub mod models;
pub mod repos;

pub use db::{Database, DatabaseConfig};
pub use error::{Error, Result};
pub use models::{PrStatus, PullRequest, PullRequestSummary, Team, TeamMember, User};
pub use repos::{PullRequestRepository, TeamRepository};
