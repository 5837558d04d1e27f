use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A tracked check: which URL to call, how, and on what schedule.
/// Corresponds to the `monitors` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Monitor {
    pub monitor_id: i64,
    pub user_email: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub monitor_type: String,
    pub url: String,
    pub method: String,
    pub updated_at: DateTime<Utc>,
    pub body: Option<String>,
    pub headers: Option<String>,
    pub parameters: Option<String>,
    pub description: Option<String>,
    pub frequency_minutes: i32,
    pub threshold_minutes: i32,
}

/// A validated monitor that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMonitor {
    pub user_email: String,
    pub monitor_type: String,
    pub url: String,
    pub method: String,
    pub updated_at: DateTime<Utc>,
    pub body: Option<String>,
    pub headers: Option<String>,
    pub parameters: Option<String>,
    pub description: Option<String>,
    pub frequency_minutes: i32,
    pub threshold_minutes: i32,
}

impl NewMonitor {
    pub fn into_monitor(self, monitor_id: i64) -> Monitor {
        Monitor {
            monitor_id,
            user_email: self.user_email,
            monitor_type: self.monitor_type,
            url: self.url,
            method: self.method,
            updated_at: self.updated_at,
            body: self.body,
            headers: self.headers,
            parameters: self.parameters,
            description: self.description,
            frequency_minutes: self.frequency_minutes,
            threshold_minutes: self.threshold_minutes,
        }
    }
}
