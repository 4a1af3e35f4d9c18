//! HTTP API for the Seatlock license server.
//!
//! The router is a thin shell over [`LicenseService`] and [`AdminService`];
//! all license and session rules live in `seatlock-session`.

pub mod admin_client;
pub mod api;
pub mod config;
pub mod error;

mod admin;
mod routes;

use api::HealthResponse;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{delete, get, post};
use axum::Router;
use config::ServerConfig;
use seatlock_license::{Clock, TokenIssuer};
use seatlock_session::{AdminService, CredentialVerifier, LicenseService};
use seatlock_store::AccountStore;
use std::sync::Arc;
use tracing::warn;

/// Shared state behind every handler.
#[derive(Clone)]
pub struct AppState {
    service: LicenseService,
    admin: AdminService,
    store: Arc<dyn AccountStore>,
    clock: Arc<dyn Clock>,
    admin_key: Arc<str>,
}

impl AppState {
    pub fn new(
        config: &ServerConfig,
        store: Arc<dyn AccountStore>,
        issuer: Arc<TokenIssuer>,
        clock: Arc<dyn Clock>,
        credentials: Arc<dyn CredentialVerifier>,
    ) -> Self {
        Self {
            service: LicenseService::new(
                Arc::clone(&store),
                issuer,
                Arc::clone(&clock),
                Arc::clone(&credentials),
            ),
            admin: AdminService::new(Arc::clone(&store), credentials, Arc::clone(&clock)),
            store,
            clock,
            admin_key: Arc::from(config.admin_key.as_str()),
        }
    }
}

async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (status, database) = match state.store.ping().await {
        Ok(()) => (StatusCode::OK, "connected"),
        Err(e) => {
            warn!("health check: store unreachable: {e}");
            (StatusCode::SERVICE_UNAVAILABLE, "error")
        }
    };
    let body = HealthResponse {
        status: if status.is_success() { "ok" } else { "error" }.to_string(),
        timestamp: state.clock.now(),
        database: database.to_string(),
    };
    (status, Json(body))
}

/// Build the HTTP API router with the given state.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/v1/login", post(routes::login))
        .route("/api/v1/refresh", post(routes::refresh))
        .route("/api/v1/check", get(routes::check))
        .route("/api/v1/session/validate", post(routes::validate_session))
        .route(
            "/admin/accounts",
            post(admin::create_account).get(admin::list_accounts),
        )
        .route("/admin/accounts/{id}", delete(admin::delete_account))
        .route("/admin/accounts/{id}/extend", post(admin::extend_account))
        .with_state(state)
}
