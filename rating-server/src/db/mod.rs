//! Database Module
//!
//! Embedded SurrealDB connection and schema definition.

pub mod models;
pub mod repository;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

const NAMESPACE: &str = "staff_rating";
const DATABASE: &str = "main";

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the on-disk database at `db_path`.
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
        let service = Self::finish(db).await?;
        tracing::info!("Database connection established ({db_path})");
        Ok(service)
    }

    /// In-memory database, used by tests.
    pub async fn memory() -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open in-memory database: {e}")))?;
        Self::finish(db).await
    }

    async fn finish(db: Surreal<Db>) -> Result<Self, AppError> {
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        define_schema(&db).await?;

        Ok(Self { db })
    }
}

/// Define tables and the unique indexes backing the repositories' duplicate
/// checks (email per organization, one rating per staff/category/week).
async fn define_schema(db: &Surreal<Db>) -> Result<(), AppError> {
    db.query(
        r#"
        DEFINE TABLE IF NOT EXISTS organization SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS organization_email_unique ON TABLE organization FIELDS email UNIQUE;
        DEFINE TABLE IF NOT EXISTS rating SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS rating_slot_unique ON TABLE rating FIELDS staff, category, week UNIQUE;
        DEFINE TABLE IF NOT EXISTS rating_snapshot SCHEMALESS;
    "#,
    )
    .await
    .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?;

    Ok(())
}
