//! Predicate, join, and ordering primitives for the query builder.

use crate::qb::arg::Arg;
use mysql_async::Value;
use std::fmt;

/// Comparison operator for a single-value predicate.
///
/// A closed set: operators are validated at construction time, not carried
/// as free-form strings. `IN` and raw fragments have their own predicate
/// shapes since their payloads differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// column = value
    Eq,
    /// column != value
    Ne,
    /// column > value
    Gt,
    /// column >= value
    Gte,
    /// column < value
    Lt,
    /// column <= value
    Lte,
    /// column LIKE pattern (pattern auto-wrapped with `%...%`)
    Like,
}

impl Op {
    pub(crate) fn as_sql(self) -> &'static str {
        match self {
            Op::Eq => "=",
            Op::Ne => "!=",
            Op::Gt => ">",
            Op::Gte => ">=",
            Op::Lt => "<",
            Op::Lte => "<=",
            Op::Like => "LIKE",
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// One WHERE-clause condition, AND-joined with its neighbors at render time.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Predicate {
    /// `column <op> value`
    Cmp { column: String, op: Op, value: Arg },
    /// `column IN (?, ?, ...)` — list is non-empty by construction
    In { column: String, values: Vec<Value> },
    /// Verbatim SQL fragment, no bound values
    Raw(String),
}

/// Join flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
}

impl JoinKind {
    pub(crate) fn as_sql(self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
        }
    }
}

/// One JOIN clause: `<KIND> JOIN <table> ON <left> <op> <right>`.
///
/// Both sides of the ON condition are column references; joins carry no
/// bound values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct JoinSpec {
    pub(crate) kind: JoinKind,
    pub(crate) table: String,
    pub(crate) left: String,
    pub(crate) op: String,
    pub(crate) right: String,
}

/// ORDER BY direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    #[default]
    Asc,
    Desc,
}

impl Order {
    pub(crate) fn as_sql(self) -> &'static str {
        match self {
            Order::Asc => "ASC",
            Order::Desc => "DESC",
        }
    }
}
