mod auth;
mod config;
mod db;
mod errors;
mod extract;
mod jobs;
mod llm_client;
mod membership;
mod models;
mod permissions;
mod response;
mod roles;
mod routes;
mod state;
mod users;
mod validation;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::auth::HttpAuthProvider;
use crate::config::Config;
use crate::db::create_pool;
use crate::jobs::confidence::HeuristicConfidenceScorer;
use crate::llm_client::LlmClient;
use crate::membership::postgres::{PgPermissionResolver, PgRolePermissionStore, PgUserRoleStore};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting RBAC API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL and the relation stores on top of it
    let db = create_pool(&config.database_url, config.db_max_connections).await?;
    let user_roles = Arc::new(PgUserRoleStore::new(db.clone()));
    let role_permissions = Arc::new(PgRolePermissionStore::new(db.clone()));
    let access = Arc::new(PgPermissionResolver::new(db.clone()));

    // External auth service
    let auth = Arc::new(HttpAuthProvider::new(&config.auth_base_url)?);
    info!("Auth provider initialized ({})", config.auth_base_url);

    // Initialize LLM client
    let llm = LlmClient::new(&config.ollama_base_url, &config.ollama_model)?;
    info!(
        "LLM client initialized ({}, default model: {})",
        config.ollama_base_url,
        llm.default_model()
    );

    let state = AppState {
        db: db.clone(),
        user_roles,
        role_permissions,
        access,
        auth,
        llm,
        confidence_scorer: Arc::new(HeuristicConfidenceScorer),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
