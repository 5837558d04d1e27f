pub mod monitor_service;

pub use monitor_service::{DbError, DeadlineMonitorStore, MonitorStore, PgMonitorStore};
