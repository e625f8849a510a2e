//! Read/write pool routing.
//!
//! Every terminal operation resolves to exactly one pool before any
//! connection is acquired. Write-class operations always land on the write
//! pool; read-class operations honor an explicit hint and fall back to the
//! write pool when no read pool is configured.

use crate::error::{DbError, DbResult};
use std::fmt;

/// The two pool kinds a statement can be routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolKind {
    /// Read-oriented pool (replica)
    Read,
    /// Write-oriented pool (primary)
    Write,
}

impl fmt::Display for PoolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolKind::Read => f.write_str("read"),
            PoolKind::Write => f.write_str("write"),
        }
    }
}

/// The kind of terminal operation being routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OpKind {
    Get,
    RawRead,
    Insert,
    Update,
    Upsert,
    RawWrite,
}

impl OpKind {
    pub(crate) fn is_write(self) -> bool {
        matches!(self, OpKind::Insert | OpKind::Update | OpKind::Upsert | OpKind::RawWrite)
    }
}

/// Resolve which pool serves the given operation.
///
/// Rule table:
/// - write-class operations require the write pool, regardless of hint
/// - read-class with an explicit `Write` hint require the write pool
/// - read-class otherwise use the read pool, falling back to the write pool
///   when no read pool is configured
pub(crate) fn resolve(
    op: OpKind,
    hint: Option<PoolKind>,
    has_read: bool,
    has_write: bool,
) -> DbResult<PoolKind> {
    if op.is_write() || hint == Some(PoolKind::Write) {
        return if has_write {
            Ok(PoolKind::Write)
        } else {
            Err(DbError::PoolUnavailable(PoolKind::Write))
        };
    }

    if has_read {
        Ok(PoolKind::Read)
    } else if has_write {
        Ok(PoolKind::Write)
    } else {
        Err(DbError::PoolUnavailable(PoolKind::Read))
    }
}
