//! Request-scoped storage context.

use std::future::Future;
use std::time::Duration;

use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection};
use tokio_util::sync::CancellationToken;

use common::{AppError, AppResult};

/// Storage handle for one unit of work.
///
/// Carries the connection pool handle together with the request's
/// cancellation token and per-operation timeout. Repositories run every store
/// call through [`StoreContext::run`]; a cancelled or timed-out call fails
/// without touching the repository's staged changes.
#[derive(Clone)]
pub struct StoreContext {
    db: DatabaseConnection,
    cancel: CancellationToken,
    timeout: Option<Duration>,
}

impl StoreContext {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            cancel: CancellationToken::new(),
            timeout: None,
        }
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn backend(&self) -> DatabaseBackend {
        self.db.get_database_backend()
    }

    /// Race `op` against cancellation and the timeout.
    pub async fn run<F, O>(&self, op: &'static str, fut: F) -> AppResult<O>
    where
        F: Future<Output = AppResult<O>>,
    {
        if self.cancel.is_cancelled() {
            tracing::debug!(op, "store call skipped, context cancelled");
            return Err(AppError::Cancelled);
        }

        let guarded = async {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => Err(AppError::Cancelled),
                result = fut => result,
            }
        };

        match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, guarded).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!(op, timeout_ms = limit.as_millis() as u64, "store call timed out");
                    Err(AppError::Timeout)
                }
            },
            None => guarded.await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::Database;

    async fn context() -> StoreContext {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        StoreContext::new(db)
    }

    #[tokio::test]
    async fn test_passes_result_through() {
        let result = context().await.run("noop", async { Ok::<_, AppError>(7) }).await;
        let value = tokio_test::assert_ok!(result);
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let token = CancellationToken::new();
        token.cancel();
        let ctx = context().await.with_cancellation(token);
        let result = ctx.run("noop", async { Ok::<_, AppError>(()) }).await;
        assert!(matches!(result, Err(AppError::Cancelled)));
    }

    #[tokio::test]
    async fn test_cancelled_while_pending() {
        let token = CancellationToken::new();
        let ctx = context().await.with_cancellation(token.clone());
        let canceller = async {
            tokio::task::yield_now().await;
            token.cancel();
        };
        let (result, ()) = tokio::join!(
            ctx.run("pending", std::future::pending::<AppResult<()>>()),
            canceller
        );
        assert!(matches!(result, Err(AppError::Cancelled)));
    }

    #[tokio::test]
    async fn test_timeout() {
        let ctx = context().await.with_timeout(Some(Duration::from_millis(50)));
        let result = ctx
            .run("slow", async {
                tokio::time::sleep(Duration::from_secs(10)).await;
                Ok::<_, AppError>(())
            })
            .await;
        assert!(matches!(result, Err(AppError::Timeout)));
    }
}
