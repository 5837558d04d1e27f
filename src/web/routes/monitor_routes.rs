use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use crate::db::models::Monitor;
use crate::db::services::DbError;
use crate::web::models::monitor_models::CreateMonitorRequest;
use crate::web::{AppError, AppState};

pub fn create_monitor_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_monitors).post(create_monitor))
        .route("/{id}", get(get_monitor).delete(delete_monitor))
}

fn parse_monitor_id(raw: &str) -> Result<i64, AppError> {
    raw.parse::<i64>().map_err(|_| {
        warn!(monitor_id = raw, "Rejected non-integer monitor id");
        AppError::InvalidInput(format!("Invalid monitor id: {raw}"))
    })
}

#[axum::debug_handler]
async fn list_monitors(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<Monitor>>, AppError> {
    info!("Listing all monitors");
    let monitors = app_state.store.get_all().await?;
    Ok(Json(monitors))
}

#[axum::debug_handler]
async fn create_monitor(
    State(app_state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<Monitor>), AppError> {
    // The body is decoded as JSON whatever the Content-Type header says.
    let payload: CreateMonitorRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, "Error decoding the request body");
        AppError::InvalidInput(format!("Invalid request body: {e}"))
    })?;
    let new_monitor = payload.validate(Utc::now()).inspect_err(|e| {
        warn!(error = %e, "Rejected invalid monitor");
    })?;

    let created = app_state
        .store
        .create(new_monitor)
        .await
        .inspect_err(|e| {
            if matches!(e, DbError::UniqueViolation) {
                warn!("Monitor already exists");
            }
        })?;

    info!(monitor_id = created.monitor_id, "Created monitor");
    Ok((StatusCode::CREATED, Json(created)))
}

#[axum::debug_handler]
async fn get_monitor(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Monitor>, AppError> {
    let monitor_id = parse_monitor_id(&id)?;
    info!(monitor_id, "Getting monitor");

    let monitor = app_state
        .store
        .get_by_id(monitor_id)
        .await
        .inspect_err(|e| {
            if matches!(e, DbError::NotFound) {
                warn!(monitor_id, "Monitor not found");
            }
        })?;
    Ok(Json(monitor))
}

#[axum::debug_handler]
async fn delete_monitor(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let monitor_id = parse_monitor_id(&id)?;
    info!(monitor_id, "Deleting monitor");

    // Check existence first; deleting a missing monitor is a 404.
    app_state
        .store
        .get_by_id(monitor_id)
        .await
        .map_err(|e| match e {
            DbError::NotFound => {
                warn!(monitor_id, "Monitor not found");
                AppError::NotFound(
                    "Was not possible to delete the monitor because it does not exist".to_string(),
                )
            }
            other => AppError::from(other),
        })?;

    app_state.store.delete(monitor_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
