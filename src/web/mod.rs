use axum::{
    Json, Router,
    extract::State,
    http::Method,
    routing::get,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::db::services::{DeadlineMonitorStore, MonitorStore};
use crate::server::config::AppConfig;
use crate::version::VERSION;
use crate::web::models::HealthResponse;
use crate::web::routes::*;

pub use crate::web::error::AppError;

pub mod error;
pub mod models;
pub mod routes;


#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn MonitorStore>,
    pub config: Arc<AppConfig>,
}

async fn health_check_handler(State(app_state): State<Arc<AppState>>) -> Json<HealthResponse> {
    info!("Serving healthcheck");
    Json(HealthResponse {
        status: "available",
        environment: app_state.config.env.clone(),
        version: VERSION,
    })
}

pub fn create_axum_router(store: Arc<dyn MonitorStore>, config: Arc<AppConfig>) -> Router {
    let store: Arc<dyn MonitorStore> =
        Arc::new(DeadlineMonitorStore::new(store, config.request_timeout));
    let app_state = Arc::new(AppState { store, config });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(vec![Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/v1/healthcheck", get(health_check_handler))
        .nest("/v1/monitors", monitor_routes::create_monitor_router())
        .merge(docs_routes::create_docs_router())
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
