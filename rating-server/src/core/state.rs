use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::core::Config;
use crate::db::DbService;
use crate::utils::AppError;

/// Shared server state
///
/// Holds the configuration and the embedded database handle. `Surreal<Db>`
/// is internally reference counted, so cloning the state is cheap and every
/// handler gets the same underlying connection.
#[derive(Clone, Debug)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// Embedded database (SurrealDB)
    pub db: Surreal<Db>,
}

impl ServerState {
    /// Create server state from existing parts.
    ///
    /// Used by tests that bring their own database; production code goes
    /// through [`ServerState::initialize`].
    pub fn new(config: Config, db: Surreal<Db>) -> Self {
        Self { config, db }
    }

    /// Initialize the server state.
    ///
    /// 1. Ensure the work directory layout exists
    /// 2. Open the database at `work_dir/database/rating.db` and define the
    ///    schema (unique indexes)
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        config.ensure_work_dir_structure().map_err(|e| {
            AppError::internal(format!("Failed to create work directory structure: {e}"))
        })?;

        let db_path = config.database_dir().join("rating.db");
        let db_service = DbService::new(&db_path.to_string_lossy()).await?;

        Ok(Self::new(config.clone(), db_service.db))
    }

    /// Database handle
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }
}
