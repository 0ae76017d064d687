//! Server implementation
//!
//! HTTP server startup and lifecycle management.

use std::net::SocketAddr;
use std::time::Duration;

use axum::middleware;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;

use crate::core::{BackgroundTasks, Config, ServerState};
use crate::services::rollup_monitor;
use crate::utils::{AppError, AppResult};

/// HTTP request log middleware
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    let status = response.status();

    tracing::info!(target: "http_access", "{} {} {}", method, uri, status);

    response
}

/// HTTP Server
pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create server with existing state
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    pub async fn run(&self) -> AppResult<()> {
        // Create application state if not provided
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config).await?,
        };

        // Start background tasks
        let mut tasks = BackgroundTasks::new();
        rollup_monitor::spawn(&mut tasks, state.clone());
        tasks.log_summary();

        let app = crate::api::build_app()
            .with_state(state)
            .layer(CorsLayer::permissive())
            .layer(CompressionLayer::new())
            .layer(middleware::from_fn(log_request));

        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        tracing::info!("Rating server listening on {}", addr);

        let handle = axum_server::Handle::new();

        // Graceful shutdown on ctrl-c
        let handle_clone = handle.clone();
        tokio::spawn(async move {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
            handle_clone.graceful_shutdown(Some(Duration::from_secs(10)));
        });

        axum_server::bind(addr)
            .handle(handle)
            .serve(app.into_make_service())
            .await
            .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

        tasks.shutdown().await;

        Ok(())
    }
}
