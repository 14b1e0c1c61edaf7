//! Scoped transactions with a time budget.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use sqlx::{SqliteConnection, SqlitePool};
use tokio::time::Instant;
use tigertix_core::error::DomainError;
use tracing::{error, warn};

/// Future returned by a transaction body.
pub(crate) type TxFuture<'c, T> = Pin<Box<dyn Future<Output = Result<T, DomainError>> + Send + 'c>>;

/// Maps a driver error to an opaque `DomainError::Storage`, logging the
/// underlying cause.
pub(crate) fn storage_error(operation: &'static str) -> impl FnOnce(sqlx::Error) -> DomainError {
    move |err| {
        error!(operation, error = %err, "storage operation failed");
        DomainError::Storage(format!("failed to {operation}"))
    }
}

/// Bounds `work` by `timeout`, reporting `DomainError::StorageTimeout` when
/// the budget runs out.
pub(crate) async fn bounded<T>(
    timeout: Duration,
    work: impl Future<Output = Result<T, DomainError>>,
) -> Result<T, DomainError> {
    bounded_until(Instant::now() + timeout, timeout, work).await
}

/// Like `bounded`, but against a deadline shared with earlier steps. `budget`
/// is the total allowance reported in the timeout error.
pub(crate) async fn bounded_until<T>(
    deadline: Instant,
    budget: Duration,
    work: impl Future<Output = Result<T, DomainError>>,
) -> Result<T, DomainError> {
    if let Ok(result) = tokio::time::timeout_at(deadline, work).await {
        result
    } else {
        warn!(timeout_ms = budget.as_millis(), "storage operation timed out");
        Err(DomainError::StorageTimeout(budget))
    }
}

/// Runs `body` inside a transaction.
///
/// Begin and body must finish before `deadline`; past it the transaction is
/// rolled back and `StorageTimeout` returned. Once COMMIT is issued it is
/// awaited without a deadline, so a reported timeout always means nothing
/// was written.
///
/// # Errors
///
/// Returns the body's error, `DomainError::Storage` if begin or commit
/// fails, or `DomainError::StorageTimeout` if begin or body overrun
/// `deadline`.
pub(crate) async fn with_transaction<T, F>(
    pool: &SqlitePool,
    deadline: Instant,
    budget: Duration,
    body: F,
) -> Result<T, DomainError>
where
    F: for<'c> FnOnce(&'c mut SqliteConnection) -> TxFuture<'c, T>,
{
    let mut tx = bounded_until(deadline, budget, async {
        pool.begin().await.map_err(storage_error("begin transaction"))
    })
    .await?;

    let outcome = bounded_until(deadline, budget, body(&mut *tx)).await;
    match outcome {
        Ok(value) => {
            tx.commit()
                .await
                .map_err(storage_error("commit transaction"))?;
            Ok(value)
        }
        Err(err @ DomainError::StorageTimeout(_)) => {
            // A statement may still be running; the rollback queues behind it.
            drop(tx);
            Err(err)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!(error = %rollback_err, "rollback failed; connection will be discarded");
            }
            Err(err)
        }
    }
}
