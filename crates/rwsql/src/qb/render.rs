//! Pure rendering of accumulated builder state into parameterized SQL.
//!
//! Rendering never mutates state and never performs I/O. The load-bearing
//! invariant: the number of `?` placeholders in the rendered text equals the
//! number of bound params, in the same left-to-right order (SET-clause
//! params precede WHERE-clause params, matching SQL clause order).

use crate::error::{DbError, DbResult};
use crate::qb::arg::Arg;
use crate::qb::predicate::Predicate;
use crate::qb::{DuplicateClause, QueryState};
use mysql_async::Value;

/// A rendered statement: SQL text plus its positional bound values.
///
/// Produced fresh per terminal call and never cached, so placeholder
/// positions always line up with the param list.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedStatement {
    /// SQL text with `?` placeholders
    pub sql: String,
    /// Bound values, one per placeholder, in placeholder order
    pub params: Vec<Value>,
}

pub(crate) fn render_select(state: &QueryState) -> DbResult<RenderedStatement> {
    state.check()?;

    let mut sql = String::from("SELECT ");
    if state.columns.is_empty() {
        sql.push('*');
    } else {
        sql.push_str(&state.columns.join(", "));
    }
    if state.want_total {
        sql.push_str(", COUNT(*) OVER() AS total");
    }
    sql.push_str(" FROM ");
    sql.push_str(&state.table);

    for join in &state.joins {
        sql.push(' ');
        sql.push_str(join.kind.as_sql());
        sql.push(' ');
        sql.push_str(&join.table);
        sql.push_str(" ON ");
        sql.push_str(&join.left);
        sql.push(' ');
        sql.push_str(&join.op);
        sql.push(' ');
        sql.push_str(&join.right);
    }

    let mut params = Vec::new();
    push_where(&mut sql, &mut params, state);

    if let Some((column, dir)) = &state.order_by {
        sql.push_str(" ORDER BY ");
        sql.push_str(column);
        sql.push(' ');
        sql.push_str(dir.as_sql());
    }
    if let Some(n) = state.limit {
        sql.push_str(&format!(" LIMIT {n}"));
    }
    if let Some(n) = state.offset {
        sql.push_str(&format!(" OFFSET {n}"));
    }

    Ok(RenderedStatement { sql, params })
}

pub(crate) fn render_insert(state: &QueryState) -> DbResult<RenderedStatement> {
    state.check()?;
    let (sql, params) = insert_clause(state)?;
    Ok(RenderedStatement { sql, params })
}

pub(crate) fn render_update(state: &QueryState) -> DbResult<RenderedStatement> {
    state.check()?;
    if state.set_fields.is_empty() && state.increments.is_empty() {
        return Err(DbError::invalid_argument(
            "update requires at least one set field or increment",
        ));
    }

    let mut sql = format!("UPDATE {} SET ", state.table);
    let mut params = Vec::new();

    let mut parts = Vec::with_capacity(state.set_fields.len() + state.increments.len());
    for (column, arg) in &state.set_fields {
        parts.push(assignment(column, arg, &mut params));
    }
    for (column, delta) in &state.increments {
        // increments render as expressions, not bound values
        if *delta >= 0 {
            parts.push(format!("{column} = {column} + {delta}"));
        } else {
            parts.push(format!("{column} = {column} - {}", delta.unsigned_abs()));
        }
    }
    sql.push_str(&parts.join(", "));

    push_where(&mut sql, &mut params, state);

    Ok(RenderedStatement { sql, params })
}

pub(crate) fn render_upsert(state: &QueryState) -> DbResult<RenderedStatement> {
    state.check()?;
    let (mut sql, mut params) = insert_clause(state)?;

    sql.push_str(" ON DUPLICATE KEY UPDATE ");
    match &state.on_duplicate {
        // default: every inserted column updates to its new value
        None => {
            let parts: Vec<String> = state
                .set_fields
                .iter()
                .map(|(column, _)| format!("{column} = VALUES({column})"))
                .collect();
            sql.push_str(&parts.join(", "));
        }
        Some(DuplicateClause::Set(entries)) => {
            let parts: Vec<String> = entries
                .iter()
                .map(|(column, arg)| assignment(column, arg, &mut params))
                .collect();
            sql.push_str(&parts.join(", "));
        }
        Some(DuplicateClause::Raw(clause)) => sql.push_str(clause),
    }

    Ok(RenderedStatement { sql, params })
}

/// `INSERT INTO t (cols) VALUES (...)` shared by insert and upsert.
fn insert_clause(state: &QueryState) -> DbResult<(String, Vec<Value>)> {
    if state.set_fields.is_empty() {
        return Err(DbError::invalid_argument("insert requires at least one column"));
    }

    let mut params = Vec::new();
    let columns: Vec<&str> = state.set_fields.iter().map(|(c, _)| c.as_str()).collect();
    let values: Vec<&'static str> = state
        .set_fields
        .iter()
        .map(|(_, arg)| match arg {
            Arg::Fn(lit) => *lit,
            Arg::Value(v) => {
                params.push(v.clone());
                "?"
            }
        })
        .collect();

    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        state.table,
        columns.join(", "),
        values.join(", ")
    );
    Ok((sql, params))
}

/// Render one `column = ...` assignment, binding a param unless the value is
/// a recognized function literal.
fn assignment(column: &str, arg: &Arg, params: &mut Vec<Value>) -> String {
    match arg {
        Arg::Fn(lit) => format!("{column} = {lit}"),
        Arg::Value(v) => {
            params.push(v.clone());
            format!("{column} = ?")
        }
    }
}

/// Append the WHERE clause (if any), AND-joining predicates in insertion
/// order. WHERE params always land after any params already collected.
fn push_where(sql: &mut String, params: &mut Vec<Value>, state: &QueryState) {
    if state.predicates.is_empty() {
        return;
    }
    sql.push_str(" WHERE ");
    for (i, predicate) in state.predicates.iter().enumerate() {
        if i > 0 {
            sql.push_str(" AND ");
        }
        match predicate {
            Predicate::Cmp { column, op, value } => match value {
                Arg::Fn(lit) => {
                    sql.push_str(&format!("{column} {} {lit}", op.as_sql()));
                }
                Arg::Value(v) => {
                    params.push(v.clone());
                    sql.push_str(&format!("{column} {} ?", op.as_sql()));
                }
            },
            Predicate::In { column, values } => {
                let placeholders = vec!["?"; values.len()].join(",");
                sql.push_str(&format!("{column} IN ({placeholders})"));
                params.extend(values.iter().cloned());
            }
            Predicate::Raw(fragment) => sql.push_str(fragment),
        }
    }
}
