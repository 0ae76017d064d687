//! Core module - server configuration, state and lifecycle
//!
//! # Module structure
//!
//! - [`Config`] - server configuration
//! - [`ServerState`] - shared server state
//! - [`Server`] - HTTP server
//! - [`BackgroundTasks`] - background task registry

pub mod config;
pub mod server;
pub mod state;
pub mod tasks;

pub use config::Config;
pub use server::Server;
pub use state::ServerState;
pub use tasks::{BackgroundTasks, TaskKind};
