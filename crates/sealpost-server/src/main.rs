mod config;

use axum::extract::DefaultBodyLimit;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use sealpost_api::RelayApi;
use sealpost_mailbox::Mailbox;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sealpost=debug,sealpost_api=debug,sealpost_mailbox=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;

    // Mailbox lives exactly as long as the process; nothing is persisted.
    let mailbox = Mailbox::new();
    let api = RelayApi::new(mailbox.clone());

    let app = sealpost_api::router(api)
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = config.addr()?;
    info!("Sealpost relay listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let stats = mailbox.stats();
    info!(
        "Relay stopped; discarding {} pending messages and {} key offers",
        stats.pending_messages, stats.pending_key_exchanges
    );

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
