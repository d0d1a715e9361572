//! The driver-layer capability boundary.
//!
//! The engine never manages connectivity itself; it calls into whatever
//! [`Session`] the embedder provides. The sqlx pool implementations below
//! cover the common cases, and anything else (a single pinned connection, a
//! test double) can implement the trait directly.

use futures::future::BoxFuture;
use sqlx::{MySqlPool, PgPool, SqlitePool};

/// Minimal database surface the engine needs: executing statements and
/// probing single values.
///
/// Lock primitives are expressed through these two calls only; see
/// [`crate::lock::LockCoordinator`].
pub trait Session: Send + Sync {
    /// Executes a statement, returning the number of affected rows.
    fn execute<'a>(&'a self, sql: &'a str) -> BoxFuture<'a, sqlx::Result<u64>>;

    /// Fetches the first column of the first row as an integer, if any row
    /// comes back.
    fn query_scalar<'a>(&'a self, sql: &'a str) -> BoxFuture<'a, sqlx::Result<Option<i64>>>;
}

impl Session for PgPool {
    fn execute<'a>(&'a self, sql: &'a str) -> BoxFuture<'a, sqlx::Result<u64>> {
        Box::pin(async move { Ok(sqlx::query(sql).execute(self).await?.rows_affected()) })
    }

    fn query_scalar<'a>(&'a self, sql: &'a str) -> BoxFuture<'a, sqlx::Result<Option<i64>>> {
        Box::pin(async move { sqlx::query_scalar(sql).fetch_optional(self).await })
    }
}

impl Session for MySqlPool {
    fn execute<'a>(&'a self, sql: &'a str) -> BoxFuture<'a, sqlx::Result<u64>> {
        Box::pin(async move { Ok(sqlx::query(sql).execute(self).await?.rows_affected()) })
    }

    fn query_scalar<'a>(&'a self, sql: &'a str) -> BoxFuture<'a, sqlx::Result<Option<i64>>> {
        Box::pin(async move { sqlx::query_scalar(sql).fetch_optional(self).await })
    }
}

impl Session for SqlitePool {
    fn execute<'a>(&'a self, sql: &'a str) -> BoxFuture<'a, sqlx::Result<u64>> {
        Box::pin(async move { Ok(sqlx::query(sql).execute(self).await?.rows_affected()) })
    }

    fn query_scalar<'a>(&'a self, sql: &'a str) -> BoxFuture<'a, sqlx::Result<Option<i64>>> {
        Box::pin(async move { sqlx::query_scalar(sql).fetch_optional(self).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn create_test_pool() -> SqlitePool {
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect(":memory:")
            .await
            .expect("Failed to create in-memory SQLite pool")
    }

    #[tokio::test]
    async fn test_execute_and_query_scalar() {
        let pool = create_test_pool().await;
        let session: &dyn Session = &pool;

        session
            .execute("CREATE TABLE t (id INTEGER PRIMARY KEY)")
            .await
            .unwrap();
        let affected = session
            .execute("INSERT INTO t (id) VALUES (1), (2)")
            .await
            .unwrap();
        assert_eq!(affected, 2);

        let count = session.query_scalar("SELECT COUNT(*) FROM t").await.unwrap();
        assert_eq!(count, Some(2));
        let none = session
            .query_scalar("SELECT id FROM t WHERE id = 99")
            .await
            .unwrap();
        assert_eq!(none, None);
    }
}
