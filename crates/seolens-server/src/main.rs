mod api;
mod middleware;

use std::sync::Arc;

use seolens_pipeline::{AppServices, Orchestrator};
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    middleware::{AuthState, RateLimitState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = seolens_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(env = %config.env, bind_addr = %config.bind_addr, "starting seolens-server");

    let services = Arc::new(AppServices::from_config(&config)?);
    let state = AppState {
        orchestrator: Orchestrator::new(services),
    };

    let auth = AuthState::from_settings(
        &config.api,
        matches!(config.env, seolens_core::Environment::Development),
    )?;
    let rate_limit = RateLimitState::from_settings(&config.api);
    tracing::info!(
        auth = auth.is_enabled(),
        requests = config.api.rate_limit_requests,
        window_secs = config.api.rate_limit_window_secs,
        "API access control configured"
    );
    let app = build_app(state, auth, rate_limit);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
