//! Fluent query builder.
//!
//! A chain starts at [`Db::table`](crate::Db::table), accumulates clauses,
//! and ends in exactly one terminal operation (`get`, `insert`, `update`,
//! `upsert`). Every clause method consumes and returns the builder, so one
//! chain owns its state: two chains can never interleave on the same
//! accumulator, and there is nothing to reset afterwards.
//!
//! ```ignore
//! // SELECT with routing hint, window total, and pagination
//! let page = db.table("users")
//!     .select(&["id", "name"])
//!     .eq("status", "active")
//!     .total()
//!     .order_by("created_at", Order::Desc)
//!     .limit(20)
//!     .get()
//!     .await?;
//!
//! // INSERT
//! let id = db.table("users")
//!     .set("name", "alice")
//!     .set("created_at", "NOW()")
//!     .insert()
//!     .await?;
//!
//! // UPDATE merging literal sets with increments
//! let affected = db.table("counters")
//!     .set("label", "hits")
//!     .increase("value", 1)
//!     .eq("id", 7)
//!     .update()
//!     .await?;
//! ```

mod arg;
mod predicate;
mod render;

pub use arg::FUNCTION_LITERALS;
pub use predicate::{JoinKind, Op, Order};
pub use render::RenderedStatement;

use crate::db::Db;
use crate::error::{DbError, DbResult};
use crate::router::{OpKind, PoolKind};
use arg::Arg;
use mysql_async::prelude::FromRow;
use mysql_async::{Row, Value};
use predicate::{JoinSpec, Predicate};

/// Duplicate-key clause override for UPSERT.
#[derive(Debug, Clone)]
pub(crate) enum DuplicateClause {
    Set(Vec<(String, Arg)>),
    Raw(String),
}

/// Accumulated clause state for one chain.
#[derive(Debug, Clone, Default)]
pub(crate) struct QueryState {
    pub(crate) table: String,
    pub(crate) hint: Option<PoolKind>,
    pub(crate) columns: Vec<String>,
    pub(crate) joins: Vec<JoinSpec>,
    pub(crate) predicates: Vec<Predicate>,
    pub(crate) order_by: Option<(String, Order)>,
    pub(crate) limit: Option<u64>,
    pub(crate) offset: Option<u64>,
    pub(crate) want_total: bool,
    pub(crate) set_fields: Vec<(String, Arg)>,
    pub(crate) increments: Vec<(String, i64)>,
    pub(crate) on_duplicate: Option<DuplicateClause>,
    /// First builder-time argument error, surfaced at the terminal call
    pub(crate) build_error: Option<String>,
}

impl QueryState {
    pub(crate) fn new(table: String, hint: Option<PoolKind>) -> Self {
        Self {
            table,
            hint,
            ..Self::default()
        }
    }

    /// Fail fast on any argument error recorded during accumulation.
    pub(crate) fn check(&self) -> DbResult<()> {
        if let Some(message) = &self.build_error {
            return Err(DbError::invalid_argument(message.clone()));
        }
        Ok(())
    }

    fn fail(&mut self, message: impl Into<String>) {
        if self.build_error.is_none() {
            self.build_error = Some(message.into());
        }
    }
}

/// One query chain, bound to the [`Db`] handle that started it.
#[must_use = "a chain does nothing until a terminal operation is awaited"]
#[derive(Debug, Clone)]
pub struct Query<'a> {
    db: &'a Db,
    state: QueryState,
}

impl<'a> Query<'a> {
    pub(crate) fn new(db: &'a Db, table: String, hint: Option<PoolKind>) -> Self {
        Self {
            db,
            state: QueryState::new(table, hint),
        }
    }

    // ==================== SELECT columns ====================

    /// Add SELECT columns. Additive across calls; an untouched chain
    /// selects `*`.
    pub fn select(mut self, columns: &[&str]) -> Self {
        self.state.columns.extend(columns.iter().map(|c| c.to_string()));
        self
    }

    // ==================== WHERE conditions ====================

    /// Add a condition with an explicit operator.
    pub fn cond(mut self, column: &str, op: Op, value: impl Into<Value>) -> Self {
        let mut value = value.into();
        if op == Op::Like {
            value = wrap_like(value);
        }
        self.state.predicates.push(Predicate::Cmp {
            column: column.to_string(),
            op,
            value: Arg::from_value(value),
        });
        self
    }

    /// Add WHERE: column = value
    pub fn eq(self, column: &str, value: impl Into<Value>) -> Self {
        self.cond(column, Op::Eq, value)
    }

    /// Add WHERE: column != value
    pub fn ne(self, column: &str, value: impl Into<Value>) -> Self {
        self.cond(column, Op::Ne, value)
    }

    /// Add WHERE: column > value
    pub fn gt(self, column: &str, value: impl Into<Value>) -> Self {
        self.cond(column, Op::Gt, value)
    }

    /// Add WHERE: column >= value
    pub fn gte(self, column: &str, value: impl Into<Value>) -> Self {
        self.cond(column, Op::Gte, value)
    }

    /// Add WHERE: column < value
    pub fn lt(self, column: &str, value: impl Into<Value>) -> Self {
        self.cond(column, Op::Lt, value)
    }

    /// Add WHERE: column <= value
    pub fn lte(self, column: &str, value: impl Into<Value>) -> Self {
        self.cond(column, Op::Lte, value)
    }

    /// Add WHERE: column LIKE pattern. The pattern is wrapped with `%...%`
    /// wildcards; `like("name", "John")` binds `"%John%"`.
    pub fn like(self, column: &str, pattern: impl Into<Value>) -> Self {
        self.cond(column, Op::Like, pattern)
    }

    /// Add WHERE: column IN (values...). The list must be non-empty;
    /// an empty list fails the terminal operation with `InvalidArgument`.
    pub fn in_list<T: Into<Value>>(mut self, column: &str, values: Vec<T>) -> Self {
        if values.is_empty() {
            self.state.fail(format!("IN list for column '{column}' must not be empty"));
            return self;
        }
        self.state.predicates.push(Predicate::In {
            column: column.to_string(),
            values: values.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Add a raw WHERE fragment without bound values.
    pub fn raw_cond(mut self, fragment: &str) -> Self {
        self.state.predicates.push(Predicate::Raw(fragment.to_string()));
        self
    }

    // ==================== JOIN ====================

    /// Add INNER JOIN with `=` on the join condition.
    pub fn inner_join(self, table: &str, left: &str, right: &str) -> Self {
        self.join(JoinKind::Inner, table, left, "=", right)
    }

    /// Add LEFT JOIN with `=` on the join condition.
    pub fn left_join(self, table: &str, left: &str, right: &str) -> Self {
        self.join(JoinKind::Left, table, left, "=", right)
    }

    /// Add RIGHT JOIN with `=` on the join condition.
    pub fn right_join(self, table: &str, left: &str, right: &str) -> Self {
        self.join(JoinKind::Right, table, left, "=", right)
    }

    /// Add a JOIN with an explicit condition operator.
    pub fn join(mut self, kind: JoinKind, table: &str, left: &str, op: &str, right: &str) -> Self {
        self.state.joins.push(JoinSpec {
            kind,
            table: table.to_string(),
            left: left.to_string(),
            op: op.to_string(),
            right: right.to_string(),
        });
        self
    }

    // ==================== Ordering & pagination ====================

    /// Set ORDER BY.
    pub fn order_by(mut self, column: &str, order: Order) -> Self {
        self.state.order_by = Some((column.to_string(), order));
        self
    }

    /// Set LIMIT.
    pub fn limit(mut self, n: u64) -> Self {
        self.state.limit = Some(n);
        self
    }

    /// Set OFFSET.
    pub fn offset(mut self, n: u64) -> Self {
        self.state.offset = Some(n);
        self
    }

    /// Request a windowed total: SELECT rendering appends
    /// `COUNT(*) OVER() AS total`, so every row of a limited page carries
    /// the unlimited row count.
    pub fn total(mut self) -> Self {
        self.state.want_total = true;
        self
    }

    // ==================== Values for write statements ====================

    /// Set a column value for INSERT/UPDATE/UPSERT. Entries keep insertion
    /// order. String values exactly matching the function-literal allowlist
    /// ([`FUNCTION_LITERALS`]) are inlined verbatim instead of bound.
    pub fn set(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.state
            .set_fields
            .push((column.to_string(), Arg::from_value(value.into())));
        self
    }

    /// Set a column to the JSON serialization of `value`.
    pub fn set_json<T: serde::Serialize>(mut self, column: &str, value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(json) => self.set(column, json),
            Err(err) => {
                self.state.fail(format!("failed to serialize column '{column}': {err}"));
                self
            }
        }
    }

    /// Record a pending `column = column + delta` update expression. Merges
    /// with literal [`set`](Self::set) entries in the same UPDATE.
    pub fn increase(mut self, column: &str, delta: i64) -> Self {
        self.state.increments.push((column.to_string(), delta));
        self
    }

    /// Restrict the UPSERT duplicate-key clause to the given column.
    /// Without any override the clause updates every inserted column to its
    /// new value.
    pub fn on_duplicate_set(mut self, column: &str, value: impl Into<Value>) -> Self {
        let entry = (column.to_string(), Arg::from_value(value.into()));
        match &mut self.state.on_duplicate {
            Some(DuplicateClause::Set(entries)) => entries.push(entry),
            _ => self.state.on_duplicate = Some(DuplicateClause::Set(vec![entry])),
        }
        self
    }

    /// Replace the UPSERT duplicate-key clause with a verbatim fragment.
    pub fn on_duplicate_raw(mut self, clause: &str) -> Self {
        self.state.on_duplicate = Some(DuplicateClause::Raw(clause.to_string()));
        self
    }

    // ==================== Rendering (no I/O) ====================

    /// Render this chain as a SELECT without executing it.
    pub fn select_statement(&self) -> DbResult<RenderedStatement> {
        render::render_select(&self.state)
    }

    /// Render this chain as an INSERT without executing it.
    pub fn insert_statement(&self) -> DbResult<RenderedStatement> {
        render::render_insert(&self.state)
    }

    /// Render this chain as an UPDATE without executing it.
    pub fn update_statement(&self) -> DbResult<RenderedStatement> {
        render::render_update(&self.state)
    }

    /// Render this chain as an UPSERT without executing it.
    pub fn upsert_statement(&self) -> DbResult<RenderedStatement> {
        render::render_upsert(&self.state)
    }

    // ==================== Terminal operations ====================

    /// Execute as SELECT and return all rows.
    pub async fn get(self) -> DbResult<Vec<Row>> {
        let statement = render::render_select(&self.state)?;
        self.db
            .run_query(OpKind::Get, self.state.hint, &statement.sql, arg::to_params(statement.params))
            .await
    }

    /// Execute as SELECT and map rows into `T`.
    pub async fn get_as<T: FromRow>(self) -> DbResult<Vec<T>> {
        let rows = self.get().await?;
        rows.into_iter()
            .map(|row| T::from_row_opt(row).map_err(|e| DbError::decode(e.to_string())))
            .collect()
    }

    /// Execute as SELECT with `LIMIT 1` and return the first row, if any.
    pub async fn first(self) -> DbResult<Option<Row>> {
        let rows = self.limit(1).get().await?;
        Ok(rows.into_iter().next())
    }

    /// Execute as SELECT with `LIMIT 1` and map the first row, if any.
    pub async fn first_as<T: FromRow>(self) -> DbResult<Option<T>> {
        let row = self.first().await?;
        row.map(|row| T::from_row_opt(row).map_err(|e| DbError::decode(e.to_string())))
            .transpose()
    }

    /// Execute as INSERT. Returns the generated identifier, or `None` when
    /// the statement does not produce one.
    pub async fn insert(self) -> DbResult<Option<u64>> {
        let statement = render::render_insert(&self.state)?;
        let result = self
            .db
            .run_exec(OpKind::Insert, self.state.hint, &statement.sql, arg::to_params(statement.params))
            .await?;
        Ok(result.last_insert_id)
    }

    /// Execute as UPDATE. Returns the affected-row count.
    pub async fn update(self) -> DbResult<u64> {
        let statement = render::render_update(&self.state)?;
        let result = self
            .db
            .run_exec(OpKind::Update, self.state.hint, &statement.sql, arg::to_params(statement.params))
            .await?;
        Ok(result.affected_rows)
    }

    /// Execute as `INSERT ... ON DUPLICATE KEY UPDATE`. Returns the
    /// identifier like [`insert`](Self::insert).
    pub async fn upsert(self) -> DbResult<Option<u64>> {
        let statement = render::render_upsert(&self.state)?;
        let result = self
            .db
            .run_exec(OpKind::Upsert, self.state.hint, &statement.sql, arg::to_params(statement.params))
            .await?;
        Ok(result.last_insert_id)
    }
}

/// Wrap a LIKE pattern with `%...%` wildcards.
fn wrap_like(value: Value) -> Value {
    match value {
        Value::Bytes(bytes) => {
            let mut wrapped = Vec::with_capacity(bytes.len() + 2);
            wrapped.push(b'%');
            wrapped.extend_from_slice(&bytes);
            wrapped.push(b'%');
            Value::Bytes(wrapped)
        }
        other => Value::Bytes(format!("%{}%", other.as_sql(true).trim_matches('\'')).into_bytes()),
    }
}

#[cfg(test)]
mod tests;
