use bridvia_assistant::completion::BridAssistant;
use bridvia_assistant::main_helper::{api_key_from_env, build_http_client};
use bridvia_assistant::server::build_router;
use bridvia_assistant::*;

use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(f) => f,
        Err(_) => "bridvia_assistant=debug,tower_http=info".into(),
    };

    // Setup file logging
    let _ = std::fs::create_dir_all(&args.log_dir);
    let file_appender = tracing_appender::rolling::daily(&args.log_dir, "bridvia-assistant.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(logging::Redacting::new(std::io::stdout))
                .with_target(false),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(logging::Redacting::new(non_blocking))
                .with_ansi(false),
        )
        .with(tracing_error::ErrorLayer::default())
        .init();

    logging::setup_panic_hook();

    let client = match build_http_client(&args) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Failed to build HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    let api_key = api_key_from_env();
    if api_key.is_none() {
        tracing::warn!("OPENROUTER_API_KEY is missing or empty; answering from canned replies");
    }

    let assistant = BridAssistant::new(client, args.upstream_config(api_key));
    tracing::info!(
        "Upstream: {} (model {}, mode {})",
        assistant.config().endpoint(),
        assistant.config().model,
        if assistant.has_credential() { "live" } else { "mock" }
    );

    let addr = format!("{}:{}", args.host, args.port);
    let state = Arc::new(AppState::new(assistant, args));
    let app = build_router(state);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    tracing::info!("Brid AI listening on {}", addr);
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("Server error: {}", e);
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}
