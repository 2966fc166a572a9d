//! Database operation retry module
//!
//! Bounded retries with exponential backoff for transient storage errors,
//! so short contention windows never surface to callers.

use sea_orm::DbErr;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Whether a database error is worth retrying
pub fn is_retryable_error(err: &DbErr) -> bool {
    match err {
        DbErr::ConnectionAcquire(_) | // pool acquisition failed
        DbErr::Conn(_) => true, // connection trouble
        DbErr::Exec(runtime_err) | DbErr::Query(runtime_err) => {
            is_retryable_runtime_error(runtime_err)
        }
        _ => false,
    }
}

/// Whether a runtime error is retryable (deadlock, lock timeout, ...)
fn is_retryable_runtime_error(err: &sea_orm::error::RuntimeErr) -> bool {
    use sea_orm::error::RuntimeErr;

    match err {
        RuntimeErr::SqlxError(sqlx_err) => {
            use std::ops::Deref;
            if let Some(db_err) = sqlx_err.deref().as_database_error() {
                // Recognize retryable errors by vendor error code
                if let Some(code) = db_err.code() {
                    let code_str = code.as_ref();
                    return matches!(
                        code_str,
                        // MySQL deadlock and lock wait timeout
                        "1213" | "1205" |
                        // PostgreSQL serialization failure and deadlock
                        "40001" | "40P01" |
                        // SQLite BUSY and LOCKED
                        "5" | "6"
                    );
                }
            }
            // Fall back to string matching for non-database errors
            let err_str = sqlx_err.to_string().to_lowercase();
            is_retryable_error_message(&err_str)
        }
        RuntimeErr::Internal(msg) => {
            let err_str = msg.to_lowercase();
            is_retryable_error_message(&err_str)
        }
        #[allow(unreachable_patterns)]
        _ => false,
    }
}

/// Message-based retry classification (fallback path)
fn is_retryable_error_message(err_str: &str) -> bool {
    err_str.contains("deadlock")
        || err_str.contains("lock wait timeout")
        || err_str.contains("database is locked")
        || err_str.contains("serialization failure")
}

/// Retry configuration
#[derive(Clone, Copy)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 100,
            max_delay_ms: 2000,
        }
    }
}

/// Exponential-backoff retry executor
///
/// Retries retryable errors automatically, with jitter on top of the
/// exponential delay to keep concurrent retries from stampeding.
pub async fn with_retry<T, F, Fut>(
    operation_name: &str,
    config: RetryConfig,
    mut operation: F,
) -> Result<T, DbErr>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DbErr>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(result) => {
                if attempt > 0 {
                    debug!(
                        "Operation '{}' succeeded after {} retries",
                        operation_name, attempt
                    );
                }
                return Ok(result);
            }
            Err(e) if is_retryable_error(&e) && attempt < config.max_retries => {
                attempt += 1;
                let delay = calculate_backoff(attempt, config.base_delay_ms, config.max_delay_ms);
                warn!(
                    "Operation '{}' failed (attempt {}/{}): {}; retrying in {} ms",
                    operation_name,
                    attempt,
                    config.max_retries + 1,
                    e,
                    delay
                );
                sleep(Duration::from_millis(delay)).await;
            }
            Err(e) => {
                if !is_retryable_error(&e) {
                    debug!(
                        "Operation '{}' failed with non-retryable error: {}",
                        operation_name, e
                    );
                }
                return Err(e);
            }
        }
    }
}

/// Exponential backoff delay with jitter
fn calculate_backoff(attempt: u32, base_ms: u64, max_ms: u64) -> u64 {
    use rand::RngExt;
    let exp_delay = base_ms.saturating_mul(2u64.saturating_pow(attempt - 1));
    let capped = exp_delay.min(max_ms);
    // 0-25% jitter so competing writers back off at different times
    let jitter = rand::rng().random_range(0..=capped / 4);
    capped.saturating_add(jitter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_is_retryable_error_connection_acquire() {
        let err = DbErr::ConnectionAcquire(sea_orm::error::ConnAcquireErr::Timeout);
        assert!(is_retryable_error(&err));
    }

    #[test]
    fn test_is_retryable_error_conn() {
        let err = DbErr::Conn(sea_orm::error::RuntimeErr::Internal(
            "connection lost".to_string(),
        ));
        assert!(is_retryable_error(&err));
    }

    #[test]
    fn test_is_retryable_error_record_not_found() {
        let err = DbErr::RecordNotFound("not found".to_string());
        assert!(!is_retryable_error(&err));
    }

    #[test]
    fn test_is_retryable_error_deadlock() {
        let err = DbErr::Exec(sea_orm::error::RuntimeErr::Internal(
            "Deadlock found when trying to get lock".to_string(),
        ));
        assert!(is_retryable_error(&err));
    }

    #[test]
    fn test_is_retryable_error_database_locked() {
        let err = DbErr::Query(sea_orm::error::RuntimeErr::Internal(
            "database is locked".to_string(),
        ));
        assert!(is_retryable_error(&err));
    }

    #[test]
    fn test_is_retryable_error_lock_wait_timeout() {
        let err = DbErr::Exec(sea_orm::error::RuntimeErr::Internal(
            "Lock wait timeout exceeded".to_string(),
        ));
        assert!(is_retryable_error(&err));
    }

    #[test]
    fn test_calculate_backoff_exponential() {
        // First retry: base_ms * 2^0 = 100
        let delay1 = calculate_backoff(1, 100, 2000);
        assert!((100..=125).contains(&delay1)); // 100 + 0-25% jitter

        // Second retry: base_ms * 2^1 = 200
        let delay2 = calculate_backoff(2, 100, 2000);
        assert!((200..=250).contains(&delay2));

        // Third retry: base_ms * 2^2 = 400
        let delay3 = calculate_backoff(3, 100, 2000);
        assert!((400..=500).contains(&delay3));
    }

    #[test]
    fn test_calculate_backoff_capped_at_max() {
        // The tenth retry would overflow max, so it gets capped
        let delay = calculate_backoff(10, 100, 2000);
        assert!((2000..=2500).contains(&delay)); // 2000 + 0-25% jitter
    }

    #[tokio::test]
    async fn test_with_retry_success_first_try() {
        let config = RetryConfig::default();
        let call_count = AtomicU32::new(0);

        let result = with_retry("test_op", config, || {
            call_count.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, DbErr>(42) }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_with_retry_success_after_retries() {
        let config = RetryConfig {
            max_retries: 3,
            base_delay_ms: 10, // short delay to keep the test quick
            max_delay_ms: 50,
        };
        let call_count = AtomicU32::new(0);

        let result = with_retry("test_op", config, || {
            let count = call_count.fetch_add(1, Ordering::SeqCst);
            async move {
                if count < 2 {
                    Err(DbErr::ConnectionAcquire(
                        sea_orm::error::ConnAcquireErr::Timeout,
                    ))
                } else {
                    Ok(42)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(call_count.load(Ordering::SeqCst), 3); // initial + 2 retries
    }

    #[tokio::test]
    async fn test_with_retry_exhausted() {
        let config = RetryConfig {
            max_retries: 2,
            base_delay_ms: 10,
            max_delay_ms: 50,
        };
        let call_count = AtomicU32::new(0);

        let result = with_retry("test_op", config, || {
            call_count.fetch_add(1, Ordering::SeqCst);
            async {
                Err::<i32, _>(DbErr::ConnectionAcquire(
                    sea_orm::error::ConnAcquireErr::Timeout,
                ))
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(call_count.load(Ordering::SeqCst), 3); // initial + 2 retries
    }

    #[tokio::test]
    async fn test_with_retry_non_retryable_error_no_retry() {
        let config = RetryConfig::default();
        let call_count = AtomicU32::new(0);

        let result = with_retry("test_op", config, || {
            call_count.fetch_add(1, Ordering::SeqCst);
            async { Err::<i32, _>(DbErr::RecordNotFound("not found".to_string())) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(call_count.load(Ordering::SeqCst), 1); // non-retryable, called once
    }
}
