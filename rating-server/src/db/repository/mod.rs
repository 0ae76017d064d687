//! Repository Module
//!
//! CRUD operations over the SurrealDB tables. All ids use the unified
//! `"table:id"` convention via `RecordId`; repositories accept either that
//! form or a bare key.

pub mod organization;
pub mod rating;

pub use organization::OrganizationRepository;
pub use rating::RatingRepository;

use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Parse an id that may be either `"table:key"` or a bare key.
///
/// A prefixed id naming a different table is rejected.
pub fn parse_record_id(table: &str, id: &str) -> RepoResult<RecordId> {
    if id.contains(':') {
        let record: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {id}")))?;
        if record.table() != table {
            return Err(RepoError::Validation(format!(
                "Invalid ID: expected a {table} id, got {id}"
            )));
        }
        Ok(record)
    } else {
        Ok(RecordId::from_table_key(table, id))
    }
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
