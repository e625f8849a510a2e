//! # rwsql
//!
//! A read/write-split MySQL access layer for Rust.
//!
//! ## Features
//!
//! - **Dual pools**: independently configured read and write pools; reads
//!   fall back to the write pool when no read pool is configured
//! - **Fluent builder**: chains accumulate clauses and render a single
//!   parameterized statement (JOIN, operator-inferred WHERE, UPSERT,
//!   windowed COUNT)
//! - **No string interpolation of data**: every bound value travels as a
//!   `?` placeholder; the only verbatim SQL is a closed allowlist of
//!   zero-argument function literals
//! - **Explicit lifecycle**: `Uninitialized → Ready → Closed`, with
//!   idempotent shutdown and fail-fast errors outside `Ready`
//! - **Slow-statement side channel**: executions over a threshold are
//!   reported via `tracing`, never affecting results
//!
//! ## Usage
//!
//! ```ignore
//! use rwsql::{Db, DbConfig, Order, PoolConfig};
//!
//! let db = Db::connect(
//!     DbConfig::new()
//!         .write(PoolConfig::new("db-primary", "app").user("app").password("secret"))
//!         .read(PoolConfig::new("db-replica", "app").user("app").password("secret")),
//! )
//! .await?;
//!
//! // SELECT (read pool)
//! let rows = db.table("users")
//!     .select(&["id", "name"])
//!     .eq("status", "active")
//!     .order_by("id", Order::Desc)
//!     .limit(10)
//!     .get()
//!     .await?;
//!
//! // INSERT (write pool)
//! let id = db.table("users")
//!     .set("name", "alice")
//!     .set("created_at", "NOW()")
//!     .insert()
//!     .await?;
//!
//! // UPSERT
//! db.table("page_stats")
//!     .set("page", "/home")
//!     .set("hits", 1)
//!     .on_duplicate_raw("hits = hits + 1")
//!     .upsert()
//!     .await?;
//!
//! db.close().await?;
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod qb;
pub mod router;

mod pool;

pub use config::{DEFAULT_SLOW_QUERY_THRESHOLD, DbConfig, PoolConfig};
pub use db::{Db, ExecResult};
pub use error::{DbError, DbResult};
pub use qb::{FUNCTION_LITERALS, JoinKind, Op, Order, Query, RenderedStatement};
pub use router::PoolKind;

// Re-export the driver types that appear in the public surface.
pub use mysql_async::{Params, Row, Value};
