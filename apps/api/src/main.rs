mod auth;
mod config;
mod errors;
mod estimation;
mod leads;
mod llm_client;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::session::SupabaseAuth;
use crate::config::Config;
use crate::leads::crm::HubSpotClient;
use crate::leads::email::ResendClient;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

/// Bound on every outbound provider call.
const OUTBOUND_TIMEOUT: Duration = Duration::from_secs(120);

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first; missing secrets abort startup
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting landing API v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "CORS fallback origin {}, login path {}",
        config.cors.fallback_origin(),
        config.access.login_path()
    );

    // One HTTP client shared by every outbound provider
    let http = reqwest::Client::builder()
        .timeout(OUTBOUND_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")?;

    let auth = SupabaseAuth::new(
        http.clone(),
        config.supabase_url.clone(),
        config.supabase_anon_key.clone(),
    );
    let mailer = ResendClient::new(
        http.clone(),
        config.resend_api_url.clone(),
        config.resend_api_key.clone(),
    );
    let crm = HubSpotClient::new(
        http.clone(),
        config.hubspot_api_url.clone(),
        config.hubspot_api_key.clone(),
    );
    let llm = LlmClient::new(http, config.anthropic_api_key.clone());
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let port = config.port;
    let state = AppState {
        config: Arc::new(config),
        auth: Arc::new(auth),
        mailer: Arc::new(mailer),
        crm: Arc::new(crm),
        llm,
    };

    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{port}").parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
