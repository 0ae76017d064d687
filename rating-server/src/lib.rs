//! Staff Performance Rating Server
//!
//! # Architecture overview
//!
//! This crate is the backend for a staff performance-rating system:
//! supervisors score staff members across seven fixed categories on a 1-5
//! scale, and the server persists ratings and an organization hierarchy in an
//! embedded document database, serving aggregated rollup views over HTTP.
//!
//! - **HTTP API** (`api`): RESTful organization and rating endpoints
//! - **Database** (`db`): embedded SurrealDB storage, models and repositories
//! - **Hierarchy** (`hierarchy`): organization tree builder and ancestry walker
//! - **Rollup** (`rollup`): rating rollup aggregator (weekly through multi-year)
//!
//! # Module structure
//!
//! ```text
//! rating-server/src/
//! ├── core/          # Config, state, server, background tasks
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # Database layer (models, repositories)
//! ├── hierarchy/     # Organization tree index
//! ├── rollup/        # Rating aggregation
//! ├── services/      # Background services
//! └── utils/         # Errors, logging, validation
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod hierarchy;
pub mod rollup;
pub mod services;
pub mod utils;

// Re-export public types
pub use crate::core::{Config, Server, ServerState};
pub use crate::utils::{AppError, AppResult};

// Re-export logger functions
pub use crate::utils::logger::{init_logger, init_logger_with_file, setup_environment};

pub fn print_banner() {
    println!(
        r#"
    ____        __  _
   / __ \____ _/ /_(_)___  ____ _
  / /_/ / __ `/ __/ / __ \/ __ `/
 / _, _/ /_/ / /_/ / / / / /_/ /
/_/ |_|\__,_/\__/_/_/ /_/\__, /
    _____                /____/
   / ___/___  ______   _____  _____
   \__ \/ _ \/ ___/ | / / _ \/ ___/
  ___/ /  __/ /   | |/ /  __/ /
 /____/\___/_/    |___/\___/_/
    "#
    );
}
