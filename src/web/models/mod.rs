use serde::Serialize;

pub mod monitor_models;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub environment: String,
    pub version: &'static str,
}
