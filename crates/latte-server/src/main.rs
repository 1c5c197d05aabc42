mod api;
mod middleware;
mod supabase;

use std::sync::Arc;

use latte_geocode::GeocodeClient;
use latte_osm::OverpassClient;
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    supabase::SupabaseClient,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = latte_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(?config, "starting latte-server");

    let supabase = SupabaseClient::new(
        &config.supabase_url,
        &config.supabase_anon_key,
        config.http_timeout_secs,
        &config.user_agent,
    )?;
    let overpass = OverpassClient::with_interpreter_url(
        config.http_timeout_secs,
        &config.user_agent,
        &config.overpass_url,
    )?;
    let geocoder = GeocodeClient::new(
        config.http_timeout_secs,
        &config.user_agent,
        config.here_api_key.clone(),
        config.valueserp_api_key.clone(),
    )?;
    if config.here_api_key.is_none() {
        tracing::warn!("HERE_API_KEY not set; /api/geocode will answer 503");
    }
    if config.valueserp_api_key.is_none() {
        tracing::warn!("VALUESERP_API_KEY not set; /api/business-search will answer 500");
    }

    let state = AppState {
        supabase: Arc::new(supabase),
        overpass: Arc::new(overpass),
        geocoder: Arc::new(geocoder),
    };
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
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
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
