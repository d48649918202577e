//! Roster Core - Core library for the reviewer roster service
//!
//! This crate provides the reviewer selection algorithm, configuration
//! loading, and the core error type shared by the rest of the workspace.

pub mod config;
pub mod error;
pub mod selector;

pub use config::Config;
pub use error::{Error, Result};
pub use selector::{RandomSource, SeededSource, Selector, SelectorError, ThreadRngSource};
