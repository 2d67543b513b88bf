//! Bank Gateway - Main Application Entry Point
//!
//! A thin HTTP front for two hosted APIs: a payments network (customers,
//! funding sources, transfers) and an identity provider (accounts, password
//! sessions). Every endpoint performs one remote call (or one fixed two-step
//! sequence), extracts a single value, and returns it or a failure sentinel.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Remote APIs**: reqwest clients built once at startup
//! - **Session**: identity secret carried in the `appwrite-session` cookie
//! - **Format**: JSON requests/responses
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables (fatal if `DWOLLA_ENV` is invalid)
//! 2. Build the payments and identity clients
//! 3. Build HTTP router with routes and middleware
//! 4. Start server on configured port

mod clients;
mod config;
mod error;
mod handlers;
mod models;
mod services;
mod session;
mod state;

use tracing_subscriber::EnvFilter;

use axum::{
    Router,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the HTTP router over the given provider handles.
pub(crate) fn app(state: AppState) -> Router {
    let payments_routes: Router<AppState> = Router::new()
        .route("/api/v1/customers", post(handlers::payments::create_customer))
        .route(
            "/api/v1/customers/{customer_id}/funding-sources",
            post(handlers::payments::create_funding_source),
        )
        .route(
            "/api/v1/on-demand-authorizations",
            post(handlers::payments::create_on_demand_authorization),
        )
        .route("/api/v1/transfers", post(handlers::payments::create_transfer))
        .route(
            "/api/v1/funding-sources",
            post(handlers::payments::add_funding_source),
        );

    let identity_routes: Router<AppState> = Router::new()
        .route("/api/v1/auth/sign-in", post(handlers::identity::sign_in))
        .route("/api/v1/auth/sign-up", post(handlers::identity::sign_up))
        .route("/api/v1/auth/me", get(handlers::identity::get_logged_in_user))
        .route("/api/v1/auth/logout", post(handlers::identity::logout_account));

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .merge(payments_routes)
        .merge(identity_routes)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        // Share both clients with all handlers via State extraction
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // An invalid or missing DWOLLA_ENV stops the process here
    let config = config::Config::from_env()?;
    tracing::info!(payments_environment = %config.dwolla_env, "Configuration loaded");

    let state = AppState::from_config(&config)?;
    tracing::info!(
        payments_url = %config.payments_base_url(),
        identity_url = %config.appwrite_endpoint,
        "Provider clients created"
    );

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app(state)).await?;

    Ok(())
}
