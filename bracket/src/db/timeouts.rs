//! Store query timeout helpers
//!
//! Every PostgreSQL call made by [`PgStore`](super::PgStore) goes through
//! [`with_timeout`] so a stalled connection aborts the unit of work instead of
//! hanging it.

use super::errors::{StoreError, StoreResult};
use std::time::Duration;
use tokio::time::timeout;

/// Default timeout for single queries (5 seconds)
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Default timeout for beginning and committing transactions (10 seconds)
pub const DEFAULT_TRANSACTION_TIMEOUT: Duration = Duration::from_secs(10);

/// Execute a store operation with a deadline
///
/// sqlx errors are converted through `From<sqlx::Error>`, so unique-constraint
/// violations come back as [`StoreError::UniqueViolation`].
pub async fn with_timeout<F, T>(duration: Duration, future: F) -> StoreResult<T>
where
    F: std::future::Future<Output = Result<T, sqlx::Error>>,
{
    match timeout(duration, future).await {
        Ok(Ok(result)) => Ok(result),
        Ok(Err(e)) => Err(StoreError::from(e)),
        Err(_) => Err(StoreError::Timeout(duration)),
    }
}

/// Execute a query with the default timeout (5 seconds)
pub async fn with_default_timeout<F, T>(future: F) -> StoreResult<T>
where
    F: std::future::Future<Output = Result<T, sqlx::Error>>,
{
    with_timeout(DEFAULT_QUERY_TIMEOUT, future).await
}
