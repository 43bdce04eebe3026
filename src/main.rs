use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tradepro::config::Config;
use tradepro::{app, websocket, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tradepro=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env();
    info!("Starting TradePro server on {}", config.bind_addr());
    info!(
        symbol = %config.simulation.default_symbol,
        quote_ms = config.simulation.quote_interval.as_millis() as u64,
        candle_ms = config.simulation.candle_interval.as_millis() as u64,
        position_ms = config.simulation.position_interval.as_millis() as u64,
        follow_quotes = config.simulation.candles_follow_quotes,
        "simulation settings"
    );

    let state = AppState::new(config);
    let config = Arc::clone(&state.config);

    // Start the simulation loops and the WebSocket fan-out
    let tasks = state.terminal.start();
    let fanout = websocket::start_fanout(&state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("TradePro server listening on {}", addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    fanout.stop().await;
    tasks.shutdown().await;
    info!("TradePro server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
