//! Property chat server entry point

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use propchat_config::{load_settings, LlmProvider, Settings};
use propchat_dataset::PropertyStore;
use propchat_llm::LlmFactory;
use propchat_server::{create_router, init_metrics, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Priority: env vars > config/{env}.yaml > config/default.yaml > defaults
    let env = std::env::var("PROPCHAT_ENV").ok();
    let config = match load_settings(env.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            // Tracing not yet initialized
            eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
            Settings::default()
        }
    };

    init_tracing(&config);

    tracing::info!("Starting propchat server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(environment = env.as_deref().unwrap_or("default"), "Configuration loaded");

    config.validate().context("invalid configuration")?;

    let metrics_handle = init_metrics();

    let data_config = config.data.clone();
    let store = tokio::task::spawn_blocking(move || PropertyStore::load(&data_config))
        .await
        .context("property loader panicked")?
        .context("failed to load properties")?;

    tracing::info!(
        properties = store.len(),
        source = ?store.source(),
        missing_sources = store.missing_sources().len(),
        "Property collection ready"
    );

    let backend = if config.llm.provider == LlmProvider::None {
        tracing::info!("LLM disabled, using keyword extraction and template summaries");
        None
    } else {
        match LlmFactory::create_backend(&config.llm) {
            Ok(backend) => {
                tracing::info!(
                    provider = backend.provider(),
                    model = backend.model_name(),
                    "LLM backend initialized"
                );
                Some(backend)
            }
            Err(e) => {
                tracing::warn!(
                    "LLM unavailable: {}. Using keyword extraction and template summaries.",
                    e
                );
                None
            }
        }
    };

    let mut state = AppState::new(config.clone(), Arc::new(store), backend);
    if let Some(handle) = metrics_handle {
        state = state.with_metrics(handle);
    }

    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("invalid listen address")?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}

fn init_tracing(config: &Settings) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = &config.observability.log_level;
        format!("propchat={},tower_http=info", level).into()
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);
    let fmt_layer = if config.observability.log_json {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };
    subscriber.with(fmt_layer).init();
}
