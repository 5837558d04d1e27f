//! Data access for monitors.
//!
//! Handlers talk to the [`MonitorStore`] trait; [`PgMonitorStore`] is the
//! PostgreSQL implementation. Driver errors are narrowed down to the two
//! conditions callers care about (missing row, duplicate key) and everything
//! else is passed through as [`DbError::Database`].

use async_trait::async_trait;
use sqlx::PgPool;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::db::models::{Monitor, NewMonitor};

#[derive(Error, Debug)]
pub enum DbError {
    #[error("monitor not found")]
    NotFound,
    #[error("unique constraint violation")]
    UniqueViolation,
    #[error("database error: {0}")]
    Database(sqlx::Error),
    #[error("query did not finish within {0:?}")]
    Timeout(Duration),
}

impl DbError {
    fn from_sqlx(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound,
            sqlx::Error::Database(ref database_error) if database_error.is_unique_violation() => {
                DbError::UniqueViolation
            }
            other => DbError::Database(other),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MonitorStore: Send + Sync {
    async fn create(&self, monitor: NewMonitor) -> Result<Monitor, DbError>;
    async fn get_by_id(&self, monitor_id: i64) -> Result<Monitor, DbError>;
    async fn get_all(&self) -> Result<Vec<Monitor>, DbError>;
    async fn delete(&self, monitor_id: i64) -> Result<(), DbError>;
}

const MONITOR_COLUMNS: &str = "monitor_id, user_email, type, url, method, updated_at, body, headers, parameters, description, frequency_minutes, threshold_minutes";

#[derive(Clone)]
pub struct PgMonitorStore {
    pool: PgPool,
}

impl PgMonitorStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl MonitorStore for PgMonitorStore {
    async fn create(&self, monitor: NewMonitor) -> Result<Monitor, DbError> {
        debug!(user_email = %monitor.user_email, url = %monitor.url, "Creating monitor");
        let sql = format!(
            "INSERT INTO monitors (user_email, type, url, method, updated_at, body, headers, parameters, description, frequency_minutes, threshold_minutes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {MONITOR_COLUMNS}"
        );
        sqlx::query_as::<_, Monitor>(&sql)
            .bind(monitor.user_email)
            .bind(monitor.monitor_type)
            .bind(monitor.url)
            .bind(monitor.method)
            .bind(monitor.updated_at)
            .bind(monitor.body)
            .bind(monitor.headers)
            .bind(monitor.parameters)
            .bind(monitor.description)
            .bind(monitor.frequency_minutes)
            .bind(monitor.threshold_minutes)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                let err = DbError::from_sqlx(e);
                if let DbError::Database(ref e) = err {
                    error!(error = %e, "Error creating monitor");
                }
                err
            })
    }

    async fn get_by_id(&self, monitor_id: i64) -> Result<Monitor, DbError> {
        debug!(monitor_id, "Getting monitor by id");
        let sql = format!("SELECT {MONITOR_COLUMNS} FROM monitors WHERE monitor_id = $1");
        sqlx::query_as::<_, Monitor>(&sql)
            .bind(monitor_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                let err = DbError::from_sqlx(e);
                if let DbError::Database(ref e) = err {
                    error!(monitor_id, error = %e, "Error getting monitor by id");
                }
                err
            })
    }

    async fn get_all(&self) -> Result<Vec<Monitor>, DbError> {
        debug!("Getting all monitors");
        let sql = format!("SELECT {MONITOR_COLUMNS} FROM monitors ORDER BY monitor_id");
        sqlx::query_as::<_, Monitor>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Error getting all monitors");
                DbError::Database(e)
            })
    }

    async fn delete(&self, monitor_id: i64) -> Result<(), DbError> {
        debug!(monitor_id, "Deleting monitor");
        let result = sqlx::query("DELETE FROM monitors WHERE monitor_id = $1")
            .bind(monitor_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(monitor_id, error = %e, "Error deleting monitor");
                DbError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }
}

/// Bounds every call on the wrapped store by a deadline. When it expires the
/// in-flight query future is dropped, which cancels it, and the caller gets
/// [`DbError::Timeout`].
pub struct DeadlineMonitorStore {
    inner: Arc<dyn MonitorStore>,
    deadline: Duration,
}

impl DeadlineMonitorStore {
    pub fn new(inner: Arc<dyn MonitorStore>, deadline: Duration) -> Self {
        Self { inner, deadline }
    }

    async fn bounded<T, F>(&self, operation: &'static str, fut: F) -> Result<T, DbError>
    where
        F: Future<Output = Result<T, DbError>> + Send,
    {
        match tokio::time::timeout(self.deadline, fut).await {
            Ok(result) => result,
            Err(_) => {
                warn!(operation, deadline = ?self.deadline, "Monitor query timed out");
                Err(DbError::Timeout(self.deadline))
            }
        }
    }
}

#[async_trait]
impl MonitorStore for DeadlineMonitorStore {
    async fn create(&self, monitor: NewMonitor) -> Result<Monitor, DbError> {
        self.bounded("create", self.inner.create(monitor)).await
    }

    async fn get_by_id(&self, monitor_id: i64) -> Result<Monitor, DbError> {
        self.bounded("get_by_id", self.inner.get_by_id(monitor_id)).await
    }

    async fn get_all(&self) -> Result<Vec<Monitor>, DbError> {
        self.bounded("get_all", self.inner.get_all()).await
    }

    async fn delete(&self, monitor_id: i64) -> Result<(), DbError> {
        self.bounded("delete", self.inner.delete(monitor_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_maps_to_not_found() {
        assert!(matches!(
            DbError::from_sqlx(sqlx::Error::RowNotFound),
            DbError::NotFound
        ));
    }

    #[test]
    fn other_driver_errors_stay_opaque() {
        let err = DbError::from_sqlx(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, DbError::Database(sqlx::Error::PoolTimedOut)));
        assert!(err.to_string().starts_with("database error: "));
    }

    struct SlowStore;

    #[async_trait]
    impl MonitorStore for SlowStore {
        async fn create(&self, _monitor: NewMonitor) -> Result<Monitor, DbError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Err(DbError::NotFound)
        }

        async fn get_by_id(&self, _monitor_id: i64) -> Result<Monitor, DbError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Err(DbError::NotFound)
        }

        async fn get_all(&self) -> Result<Vec<Monitor>, DbError> {
            Ok(Vec::new())
        }

        async fn delete(&self, _monitor_id: i64) -> Result<(), DbError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn slow_calls_hit_the_deadline() {
        let store = DeadlineMonitorStore::new(Arc::new(SlowStore), Duration::from_millis(20));

        let err = store.get_by_id(1).await.unwrap_err();
        assert!(matches!(err, DbError::Timeout(d) if d == Duration::from_millis(20)));
    }

    #[tokio::test]
    async fn fast_calls_pass_through() {
        let mut inner = MockMonitorStore::new();
        inner.expect_get_all().times(1).returning(|| Ok(Vec::new()));
        inner
            .expect_delete()
            .times(1)
            .returning(|_| Err(DbError::NotFound));
        let store = DeadlineMonitorStore::new(Arc::new(inner), Duration::from_secs(1));

        assert!(store.get_all().await.unwrap().is_empty());
        assert!(matches!(store.delete(3).await, Err(DbError::NotFound)));
    }
}
