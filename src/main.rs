use local_goodies::api::{create_router, AppState};
use local_goodies::config::Config;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("local_goodies=info,tower_http=info")),
        )
        .with_target(true)
        .init();

    // Missing credentials end the process here, before anything binds
    let config = Config::from_env()?;

    let state = AppState::from_config(&config);
    let shutdown = state.shutdown.clone();
    let sweeper = state.spawn_session_sweeper(config.session_sweep_interval());

    let app = create_router(state);

    let address = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
            }
            tracing::info!("Shutting down");
            shutdown.cancel();
        })
        .await?;

    sweeper.await?;
    Ok(())
}
