//! Shared configuration and error handling for Roster
//!
//! This crate provides common functionality used across the Roster workspace:
//! - Configuration management following 12-factor principles
//! - Error types and their HTTP mapping
//! - Repository error classification

pub mod config;
pub mod db;
pub mod error;

pub use config::Config;
pub use db::RepositoryError;
pub use error::{error_body, Error, Result};
