use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::db::models::NewMonitor;
use crate::web::AppError;

// Model for creating a new monitor. Every field is optional at decode time so
// that a missing required field is reported as a validation error.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct CreateMonitorRequest {
    pub user_email: Option<String>,
    #[serde(rename = "type")]
    pub monitor_type: Option<String>,
    pub url: Option<String>,
    pub method: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
    pub body: Option<String>,
    pub headers: Option<String>,
    pub parameters: Option<String>,
    pub description: Option<String>,
    pub frequency_minutes: Option<i32>,
    pub threshold_minutes: Option<i32>,
}

fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl CreateMonitorRequest {
    /// Checks the creation invariants and produces the insert payload.
    /// `now` is used when the client does not send `updated_at`.
    pub fn validate(self, now: DateTime<Utc>) -> Result<NewMonitor, AppError> {
        let (Some(user_email), Some(monitor_type), Some(url), Some(method)) = (
            required(self.user_email),
            required(self.monitor_type),
            required(self.url),
            required(self.method),
        ) else {
            return Err(AppError::InvalidInput(
                "User email, type, url and method are required".to_string(),
            ));
        };

        let frequency_minutes = self.frequency_minutes.unwrap_or(0);
        let threshold_minutes = self.threshold_minutes.unwrap_or(0);
        if frequency_minutes < 0 || threshold_minutes < 0 {
            return Err(AppError::InvalidInput(
                "Frequency and threshold minutes must not be negative".to_string(),
            ));
        }

        Ok(NewMonitor {
            user_email,
            monitor_type,
            url,
            method,
            updated_at: self.updated_at.unwrap_or(now),
            body: self.body,
            headers: self.headers,
            parameters: self.parameters,
            description: self.description,
            frequency_minutes,
            threshold_minutes,
        })
    }
}
