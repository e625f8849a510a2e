//! Connection pool construction over `mysql_async`.

use crate::config::PoolConfig;
use crate::error::{DbError, DbResult};
use crate::router::PoolKind;
use mysql_async::{OptsBuilder, Pool, PoolConstraints, PoolOpts};

/// Build a bounded pool from a [`PoolConfig`].
///
/// The pool is lazy: no connection is opened here. Reachability is probed
/// separately at `init()` time.
pub(crate) fn build_pool(config: &PoolConfig) -> DbResult<Pool> {
    let constraints = PoolConstraints::new(0, config.max_connections).ok_or_else(|| {
        DbError::invalid_argument(format!(
            "max_connections must be at least 1, got {}",
            config.max_connections
        ))
    })?;

    let opts = OptsBuilder::default()
        .ip_or_hostname(config.host.clone())
        .tcp_port(config.port)
        .user(Some(config.user.clone()))
        .pass(Some(config.password.clone()))
        .db_name(Some(config.database.clone()))
        .init(vec![format!("SET NAMES {}", config.charset)])
        .pool_opts(PoolOpts::default().with_constraints(constraints));

    Ok(Pool::new(opts))
}

/// The pool pair owned by a ready [`Db`](crate::Db) handle.
pub(crate) struct Pools {
    pub(crate) read: Option<Pool>,
    pub(crate) write: Option<Pool>,
}

impl Pools {
    pub(crate) fn has(&self, kind: PoolKind) -> bool {
        match kind {
            PoolKind::Read => self.read.is_some(),
            PoolKind::Write => self.write.is_some(),
        }
    }

    /// Fetch the pool for a resolved kind.
    ///
    /// The router only resolves to a configured kind, so a miss here is a
    /// routing bug.
    pub(crate) fn get(&self, kind: PoolKind) -> DbResult<Pool> {
        let pool = match kind {
            PoolKind::Read => self.read.as_ref(),
            PoolKind::Write => self.write.as_ref(),
        };
        pool.cloned().ok_or(DbError::PoolUnavailable(kind))
    }
}
