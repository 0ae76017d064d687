//! Organization API Module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/organizations", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        // Static route must be declared before /{id} to avoid path conflicts
        .route("/tree", get(handler::tree))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/tree", get(handler::subtree))
        .route("/{id}/children", get(handler::children))
        .route("/{id}/ancestry", get(handler::ancestry))
}
