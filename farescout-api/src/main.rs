use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use farescout_api::{app, AppState};
use farescout_core::search::TravelSearch;
use farescout_store::{app_config::Config, DbClient, MongoFlightRepository, MongoHotelRepository};
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "farescout_api=debug,farescout_core=debug,farescout_store=debug,tower_http=debug,axum::rejection=trace"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if dotenv.is_err() {
        tracing::debug!("No .env file found");
    }

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting Farescout API on port {}", config.server.port);

    let db = DbClient::new(&config.database)
        .await
        .context("Failed to create MongoDB client")?;

    let search = TravelSearch::new(
        Arc::new(MongoFlightRepository::new(db.database())),
        Arc::new(MongoHotelRepository::new(db.database())),
        config.search.origin_city.clone(),
    );
    let app_state = AppState::new(search, Arc::new(db.clone()), config.search.query_timeout());

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app(app_state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    db.shutdown().await;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => tracing::info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install terminate handler: {}", e);
                std::future::pending::<()>().await
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
