//! Application startup and lifecycle management.

use crate::config::{BillConfig, ProviderKind};
use crate::handlers;
use crate::services::providers::gemini::{GeminiConfig, GeminiTextProvider};
use crate::services::providers::mock::MockTextProvider;
use crate::services::providers::TextProvider;
use crate::services::{get_metrics, init_metrics, BillStore, TipAdvisor, TipGate};
use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use service_core::error::AppError;
use service_core::middleware::metrics::metrics_middleware;
use service_core::middleware::tracing::request_id_middleware;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: BillConfig,
    pub store: BillStore,
    pub advisor: TipAdvisor,
    pub tip_gate: TipGate,
}

/// State for health check endpoints.
#[derive(Clone)]
struct HealthState {
    store: BillStore,
}

/// Health check endpoint for Docker/K8s liveness probes.
async fn health_check(State(state): State<HealthState>) -> impl IntoResponse {
    match state.store.health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "service": "bill-service",
                "version": env!("CARGO_PKG_VERSION")
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "unhealthy",
                "service": "bill-service",
                "error": e.to_string()
            })),
        ),
    }
}

/// Readiness check endpoint for K8s readiness probes.
async fn readiness_check(State(state): State<HealthState>) -> impl IntoResponse {
    match state.store.health_check().await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Metrics endpoint for Prometheus scraping.
async fn metrics_handler() -> impl IntoResponse {
    let metrics = get_metrics();
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        metrics,
    )
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: BillConfig) -> Result<Self, AppError> {
        // Initialize metrics
        init_metrics();

        let store = BillStore::new();
        if config.seed_demo_bills {
            store.seed_demo().await;
            tracing::info!("Seeded demo bills");
        }

        let provider: Arc<dyn TextProvider> = match config.advisor.provider {
            ProviderKind::Gemini => {
                let gemini_config = GeminiConfig {
                    api_key: config.google.api_key.clone(),
                    model: config.advisor.text_model.clone(),
                };
                Arc::new(GeminiTextProvider::new(gemini_config))
            }
            ProviderKind::Mock => Arc::new(MockTextProvider::new(config.advisor.mock_enabled)),
        };

        tracing::info!(
            provider = config.advisor.provider.as_str(),
            model = %config.advisor.text_model,
            "Initialized text provider"
        );

        let state = AppState {
            config: config.clone(),
            store,
            advisor: TipAdvisor::new(provider),
            tip_gate: TipGate::new(),
        };

        // Bind listener (port 0 = random port for testing)
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Bill service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Get a handle to the bill store.
    pub fn store(&self) -> &BillStore {
        &self.state.store
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let health_state = HealthState {
            store: self.state.store.clone(),
        };

        let api_routes = Router::new()
            .route(
                "/bills",
                get(handlers::bills::list_bills).post(handlers::bills::create_bill),
            )
            .route("/bills/summary", get(handlers::bills::bill_summary))
            .route(
                "/bills/:bill_id",
                get(handlers::bills::get_bill)
                    .put(handlers::bills::update_bill)
                    .delete(handlers::bills::delete_bill),
            )
            .route("/bills/:bill_id/paid", post(handlers::bills::toggle_paid))
            .route(
                "/bills/:bill_id/reminders",
                post(handlers::bills::set_reminders),
            )
            .route("/tips", post(handlers::tips::generate_tips))
            .with_state(self.state);

        let health_router = Router::new()
            .route("/health", get(health_check))
            .route("/ready", get(readiness_check))
            .route("/metrics", get(metrics_handler))
            .with_state(health_state);

        let router = Router::new()
            .nest("/api", api_routes)
            .merge(health_router)
            .layer(middleware::from_fn(request_id_middleware))
            .layer(middleware::from_fn(metrics_middleware))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                    .on_response(DefaultOnResponse::new().level(Level::INFO)),
            )
            .layer(CorsLayer::permissive());

        axum::serve(self.listener, router).await
    }
}
