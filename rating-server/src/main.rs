use anyhow::Context;
use rating_server::{Config, Server, ServerState, print_banner, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment setup (dotenv, logging)
    setup_environment().context("Failed to set up environment")?;

    print_banner();

    tracing::info!("Staff rating server starting...");

    // 2. Load configuration
    let config = Config::from_env();

    // 3. Initialize server state (work dir, database, schema)
    let state = ServerState::initialize(&config).await?;

    // 4. Run the HTTP server (spawns background tasks)
    let server = Server::with_state(config, state);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
