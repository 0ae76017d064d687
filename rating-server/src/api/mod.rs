//! API route modules
//!
//! # Structure
//!
//! - [`health`] - health check
//! - [`organizations`] - organization hierarchy CRUD, tree and ancestry
//! - [`ratings`] - rating submission and rollup reports

pub mod health;
pub mod organizations;
pub mod ratings;

use axum::Router;

use crate::core::ServerState;

/// Build the axum router (without state)
pub fn build_app() -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(health::router())
        .merge(organizations::router())
        .merge(ratings::router())
}
