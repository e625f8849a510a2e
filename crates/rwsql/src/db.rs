//! Database handle: pool lifecycle, routing, and statement execution.

use crate::config::DbConfig;
use crate::error::{DbError, DbResult};
use crate::pool::{Pools, build_pool};
use crate::qb::Query;
use crate::router::{self, OpKind, PoolKind};
use mysql_async::prelude::Queryable;
use mysql_async::{Params, Pool, Row};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

/// Lifecycle state. `Closed` is terminal.
enum State {
    Uninitialized,
    Ready(Pools),
    Closed,
}

struct DbInner {
    config: DbConfig,
    state: RwLock<State>,
}

/// Result header of a write statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecResult {
    /// Rows affected by the statement
    pub affected_rows: u64,
    /// Generated identifier, when the statement produced one
    pub last_insert_id: Option<u64>,
}

/// Dual-pool database handle.
///
/// Cheap to clone and safe to share across tasks; each query chain is an
/// owned value, so concurrent chains never contend on builder state. The
/// handle moves through `Uninitialized → Ready → Closed`; every operation
/// between [`init`](Db::init) and [`close`](Db::close) resolves to one pool,
/// borrows one connection for the duration of the statement, and returns it
/// on every exit path.
#[derive(Clone)]
pub struct Db {
    inner: Arc<DbInner>,
}

impl fmt::Debug for Db {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Db").finish_non_exhaustive()
    }
}

impl Db {
    /// Create an uninitialized handle. No connection is attempted until
    /// [`init`](Db::init).
    pub fn new(config: DbConfig) -> Self {
        Self {
            inner: Arc::new(DbInner {
                config,
                state: RwLock::new(State::Uninitialized),
            }),
        }
    }

    /// [`new`](Db::new) followed by [`init`](Db::init).
    pub async fn connect(config: DbConfig) -> DbResult<Self> {
        let db = Self::new(config);
        db.init().await?;
        Ok(db)
    }

    /// Construct the configured pools and verify reachability.
    ///
    /// The write pool is probed when configured, otherwise the read pool
    /// (a read-only deployment is legal). Fails with
    /// [`DbError::Initialization`] when the probe cannot get a connection.
    /// A no-op on an already-ready handle; fails with
    /// [`DbError::NotInitialized`] after [`close`](Db::close).
    pub async fn init(&self) -> DbResult<()> {
        let mut state = self.inner.state.write().await;
        match &*state {
            State::Ready(_) => return Ok(()),
            State::Closed => return Err(DbError::NotInitialized),
            State::Uninitialized => {}
        }

        let config = &self.inner.config;
        let write = config.write.as_ref().map(build_pool).transpose()?;
        let read = config.read.as_ref().map(build_pool).transpose()?;
        if write.is_none() && read.is_none() {
            return Err(DbError::initialization("no pool is configured"));
        }

        let probe = write.as_ref().or(read.as_ref()).expect("at least one pool");
        let mut conn = probe
            .get_conn()
            .await
            .map_err(|e| DbError::initialization(e.to_string()))?;
        conn.ping()
            .await
            .map_err(|e| DbError::initialization(e.to_string()))?;
        drop(conn);

        tracing::debug!(
            read = read.is_some(),
            write = write.is_some(),
            "database pools ready"
        );
        *state = State::Ready(Pools { read, write });
        Ok(())
    }

    /// Drain and release both pools. Idempotent; an uninitialized handle
    /// moves straight to `Closed`.
    pub async fn close(&self) -> DbResult<()> {
        let mut state = self.inner.state.write().await;
        let previous = std::mem::replace(&mut *state, State::Closed);
        if let State::Ready(pools) = previous {
            if let Some(pool) = pools.write {
                pool.disconnect().await?;
            }
            if let Some(pool) = pools.read {
                pool.disconnect().await?;
            }
            tracing::debug!("database pools closed");
        }
        Ok(())
    }

    // ==================== Chain entry points ====================

    /// Start a query chain on `table`.
    pub fn table(&self, table: impl Into<String>) -> Query<'_> {
        Query::new(self, table.into(), None)
    }

    /// Start a query chain on `table` with an explicit routing hint.
    ///
    /// The hint steers read-class operations only; write-class operations
    /// always use the write pool.
    pub fn table_on(&self, table: impl Into<String>, hint: PoolKind) -> Query<'_> {
        Query::new(self, table.into(), Some(hint))
    }

    // ==================== Raw passthrough ====================

    /// Execute a raw statement on the read route and return its rows.
    pub async fn read(&self, sql: &str, params: impl Into<Params>) -> DbResult<Vec<Row>> {
        self.run_query(OpKind::RawRead, None, sql, params.into()).await
    }

    /// Execute a raw statement on the write pool and return its result
    /// header.
    pub async fn write(&self, sql: &str, params: impl Into<Params>) -> DbResult<ExecResult> {
        self.run_exec(OpKind::RawWrite, None, sql, params.into()).await
    }

    // ==================== Execution ====================

    /// Resolve the pool serving `op` under the current lifecycle state.
    async fn checkout(&self, op: OpKind, hint: Option<PoolKind>) -> DbResult<Pool> {
        let state = self.inner.state.read().await;
        let pools = match &*state {
            State::Ready(pools) => pools,
            State::Uninitialized | State::Closed => return Err(DbError::NotInitialized),
        };
        let kind = router::resolve(op, hint, pools.has(PoolKind::Read), pools.has(PoolKind::Write))?;
        pools.get(kind)
    }

    pub(crate) async fn run_query(
        &self,
        op: OpKind,
        hint: Option<PoolKind>,
        sql: &str,
        params: Params,
    ) -> DbResult<Vec<Row>> {
        let pool = self.checkout(op, hint).await?;
        let mut conn = pool.get_conn().await?;
        let start = Instant::now();
        let result = conn.exec(sql, params).await;
        self.observe(sql, start);
        Ok(result?)
    }

    pub(crate) async fn run_exec(
        &self,
        op: OpKind,
        hint: Option<PoolKind>,
        sql: &str,
        params: Params,
    ) -> DbResult<ExecResult> {
        let pool = self.checkout(op, hint).await?;
        let mut conn = pool.get_conn().await?;
        let start = Instant::now();
        let result = conn.exec_drop(sql, params).await;
        self.observe(sql, start);
        result?;
        Ok(ExecResult {
            affected_rows: conn.affected_rows(),
            last_insert_id: conn.last_insert_id(),
        })
    }

    /// Advisory slow-statement side channel; never affects the result.
    fn observe(&self, sql: &str, start: Instant) {
        let elapsed = start.elapsed();
        if elapsed > self.inner.config.slow_query_threshold {
            tracing::warn!(
                target: "rwsql.slow",
                duration_ms = elapsed.as_millis() as u64,
                sql = %sql,
                "slow statement"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DbConfig, PoolConfig};

    fn unreachable_config() -> DbConfig {
        // port 1 is never a MySQL server; nothing here should be dialed
        // by the tests below anyway
        DbConfig::new().write(PoolConfig::new("127.0.0.1", "test").port(1))
    }

    #[tokio::test]
    async fn operations_before_init_fail() {
        let db = Db::new(unreachable_config());
        let err = db.table("users").get().await.unwrap_err();
        assert!(err.is_not_initialized());

        let err = db.read("SELECT 1", ()).await.unwrap_err();
        assert!(err.is_not_initialized());

        let err = db.write("DELETE FROM t", ()).await.unwrap_err();
        assert!(err.is_not_initialized());
    }

    #[tokio::test]
    async fn close_is_idempotent_and_terminal() {
        let db = Db::new(unreachable_config());
        db.close().await.unwrap();
        db.close().await.unwrap();

        let err = db.table("users").get().await.unwrap_err();
        assert!(err.is_not_initialized());

        // the state machine is one-way: no re-init after close
        let err = db.init().await.unwrap_err();
        assert!(err.is_not_initialized());
    }

    #[tokio::test]
    async fn builder_errors_fail_before_lifecycle_checks() {
        // argument errors are detected at render time, before any routing
        let db = Db::new(unreachable_config());
        let err = db.table("users").in_list::<i64>("id", vec![]).get().await.unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[tokio::test]
    async fn init_with_no_pools_fails() {
        let db = Db::new(DbConfig::new());
        let err = db.init().await.unwrap_err();
        assert!(matches!(err, DbError::Initialization(_)));
    }
}
