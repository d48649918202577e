//! Repositories for roster entities

pub mod pull_requests;
pub mod teams;

pub use pull_requests::PullRequestRepository;
pub use teams::TeamRepository;
