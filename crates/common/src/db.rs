//! Shared database types for Roster
//!
//! This module provides common database-related types used across domain repositories.

use crate::error::Error;
use thiserror::Error;

/// Postgres SQLSTATE for `unique_violation`
const UNIQUE_VIOLATION: &str = "23505";

/// Database-specific error types
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Record already exists")]
    AlreadyExists,

    #[error("Database connection error: {0}")]
    Connection(sqlx::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<sqlx::Error> for RepositoryError {
    /// Unique-constraint violations become `AlreadyExists` so callers can
    /// treat a lost insert race as a conflict instead of a crash.
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
                return RepositoryError::AlreadyExists;
            }
        }
        RepositoryError::Connection(err)
    }
}

impl From<RepositoryError> for Error {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Error::NotFound("Record not found".to_string()),
            RepositoryError::AlreadyExists => Error::Conflict("Record already exists".to_string()),
            RepositoryError::Connection(e) => Error::Database(e),
            RepositoryError::InvalidData(msg) => Error::Validation(msg),
        }
    }
}
