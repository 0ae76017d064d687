//! Rating API Module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/ratings", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::submit))
        .route("/weekly", get(handler::weekly))
        .route("/monthly", get(handler::monthly))
        .route("/trimester", get(handler::trimester))
        .route("/six-month", get(handler::six_month))
        .route("/yearly", get(handler::yearly))
        .route(
            "/{staff_id}/snapshot",
            get(handler::get_snapshot).post(handler::regenerate_snapshot),
        )
}
