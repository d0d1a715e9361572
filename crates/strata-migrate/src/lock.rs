//! Cross-process lock coordination.
//!
//! Schema mutation must happen under mutual exclusion across every process
//! touching the database, so the coordinator always goes through the
//! dialect's database-level primitive; the in-process depth counter exists
//! only for reentrancy and never substitutes for it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use strata_core::dialect::{DialectRules, LockStrategy};
use tracing::{debug, warn};

use crate::config::MigrateConfig;
use crate::error::{MigrateError, Result};
use crate::session::Session;

/// Sentinel rows whose heartbeat is older than this are considered left
/// behind by a crashed holder and swept before an insert attempt.
const SENTINEL_STALENESS_SECS: i64 = 900;

/// Injected time source so retry behavior is deterministic under test.
pub trait Clock: Send + Sync {
    /// Current wall-clock time.
    fn now(&self) -> DateTime<Utc>;

    /// Suspends the caller for `duration`.
    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()>;
}

/// Tokio-backed wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()> {
        Box::pin(tokio::time::sleep(duration))
    }
}

/// Cooperative cancellation for lock waits.
///
/// Checked before every poll; a cancelled wait surfaces as
/// [`MigrateError::Cancelled`] instead of being silently absorbed.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a token in the not-cancelled state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation of any wait holding this token.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Derives a stable signed 64-bit advisory lock id from a lock key
/// (FNV-1a over the key bytes).
#[must_use]
pub fn advisory_id(key: &str) -> i64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    let mut hash = OFFSET_BASIS;
    for byte in key.bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(PRIME);
    }
    i64::from_le_bytes(hash.to_le_bytes())
}

/// Cross-process mutual exclusion over schema mutation for one lock key.
///
/// Reentrancy is depth-counted: only the outermost acquire performs the
/// real lock request and only the outermost release performs the real
/// unlock. Acquisition polls the primitive at a fixed interval up to
/// `lock_retry_count` attempts.
pub struct LockCoordinator {
    session: Arc<dyn Session>,
    strategy: LockStrategy,
    table: String,
    key: String,
    owner: String,
    retry_count: u32,
    poll_interval: Duration,
    clock: Arc<dyn Clock>,
    depth: tokio::sync::Mutex<u32>,
}

impl LockCoordinator {
    /// Creates a coordinator keyed by the schema-history table name, using
    /// the lock primitive the dialect exposes.
    #[must_use]
    pub fn new(session: Arc<dyn Session>, rules: &DialectRules, config: &MigrateConfig) -> Self {
        let owner = config
            .installed_by
            .clone()
            .unwrap_or_else(|| format!("pid-{}", std::process::id()));
        Self {
            session,
            strategy: rules.lock.clone(),
            table: config.table.clone(),
            key: config.table.clone(),
            owner,
            retry_count: config.lock_retry_count,
            poll_interval: Duration::from_millis(config.lock_poll_interval_ms),
            clock: Arc::new(SystemClock),
            depth: tokio::sync::Mutex::new(0),
        }
    }

    /// Replaces the clock; tests inject a deterministic one.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// The lock key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Acquires the lock, polling until it is free, retries run out, or the
    /// token is cancelled. Nested calls only bump the depth counter.
    pub async fn lock(&self, token: &CancelToken) -> Result<()> {
        {
            let mut depth = self.depth.lock().await;
            if *depth > 0 {
                *depth += 1;
                debug!(key = %self.key, depth = *depth, "Re-entered migration lock");
                return Ok(());
            }
        }

        for attempt in 1..=self.retry_count {
            if token.is_cancelled() {
                return Err(MigrateError::Cancelled);
            }
            if self.try_acquire().await? {
                *self.depth.lock().await = 1;
                debug!(key = %self.key, attempt, "Acquired migration lock");
                return Ok(());
            }
            debug!(key = %self.key, attempt, "Migration lock held elsewhere, waiting");
            if attempt < self.retry_count {
                self.clock.sleep(self.poll_interval).await;
            }
        }
        Err(MigrateError::LockTimeout {
            key: self.key.clone(),
            retries: self.retry_count,
        })
    }

    /// Releases one level of the lock; only the outermost release touches
    /// the primitive.
    pub async fn unlock(&self) -> Result<()> {
        let mut depth = self.depth.lock().await;
        match *depth {
            0 => {
                warn!(key = %self.key, "Release of a migration lock that is not held");
                Ok(())
            }
            1 => {
                *depth = 0;
                drop(depth);
                self.release().await
            }
            _ => {
                *depth -= 1;
                debug!(key = %self.key, depth = *depth, "Left nested migration lock");
                Ok(())
            }
        }
    }

    /// Runs `work` under the lock.
    ///
    /// If `work` succeeds but the unlock fails, the unlock failure is the
    /// result: the lock state is unknown. If `work` fails, an unlock
    /// failure is logged and the original error propagates unmasked.
    pub async fn with_lock<T, F>(&self, token: &CancelToken, work: F) -> Result<T>
    where
        F: core::future::Future<Output = Result<T>> + Send,
    {
        self.lock(token).await?;
        let outcome = work.await;
        let released = self.unlock().await;
        match (outcome, released) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(release_err)) => Err(release_err),
            (Err(work_err), Ok(())) => Err(work_err),
            (Err(work_err), Err(release_err)) => {
                warn!(
                    key = %self.key,
                    error = %release_err,
                    "Failed to release migration lock while handling an earlier error"
                );
                Err(work_err)
            }
        }
    }

    async fn try_acquire(&self) -> Result<bool> {
        match &self.strategy {
            LockStrategy::Advisory { try_lock_sql, .. } => {
                let sql = self.render(try_lock_sql);
                Ok(self.session.query_scalar(&sql).await? == Some(1))
            }
            LockStrategy::NamedLock { acquire_sql, .. } => {
                let sql = self.render(acquire_sql);
                Ok(self.session.query_scalar(&sql).await? == Some(1))
            }
            LockStrategy::SentinelRow {
                delete_stale_sql,
                insert_sql,
                refresh_sql,
                ..
            } => {
                self.session.execute(&self.render(delete_stale_sql)).await?;
                let inserted = self.session.execute(&self.render(insert_sql)).await?;
                if inserted == 0 {
                    return Ok(false);
                }
                self.session.execute(&self.render(refresh_sql)).await?;
                Ok(true)
            }
            LockStrategy::TableLock { lock_sql } => {
                self.session.execute(&self.render(lock_sql)).await?;
                Ok(true)
            }
            LockStrategy::None => Ok(true),
        }
    }

    async fn release(&self) -> Result<()> {
        match &self.strategy {
            LockStrategy::Advisory { unlock_sql, .. } => {
                let sql = self.render(unlock_sql);
                if self.session.query_scalar(&sql).await? == Some(1) {
                    Ok(())
                } else {
                    Err(MigrateError::LockRelease {
                        key: self.key.clone(),
                    })
                }
            }
            LockStrategy::NamedLock { release_sql, .. } => {
                let sql = self.render(release_sql);
                if self.session.query_scalar(&sql).await? == Some(1) {
                    Ok(())
                } else {
                    Err(MigrateError::LockRelease {
                        key: self.key.clone(),
                    })
                }
            }
            LockStrategy::SentinelRow { delete_sql, .. } => {
                if self.session.execute(&self.render(delete_sql)).await? > 0 {
                    Ok(())
                } else {
                    Err(MigrateError::LockRelease {
                        key: self.key.clone(),
                    })
                }
            }
            // table locks are released with the enclosing transaction
            LockStrategy::TableLock { .. } | LockStrategy::None => Ok(()),
        }
    }

    fn render(&self, template: &str) -> String {
        let now = self.clock.now();
        let stale_before = now - chrono::Duration::seconds(SENTINEL_STALENESS_SECS);
        template
            .replace("{table}", &self.table)
            .replace("{key}", &self.key)
            .replace("{owner}", &self.owner)
            .replace("{id}", &advisory_id(&self.key).to_string())
            .replace("{now}", &now.format("%Y-%m-%d %H:%M:%S").to_string())
            .replace(
                "{stale_before}",
                &stale_before.format("%Y-%m-%d %H:%M:%S").to_string(),
            )
    }
}
