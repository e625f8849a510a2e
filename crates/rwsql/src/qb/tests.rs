//! Builder and renderer tests.
//!
//! Everything here asserts on rendered SQL text and param vectors; no
//! database is involved.

use crate::config::DbConfig;
use crate::db::Db;
use crate::qb::{Op, Order};
use mysql_async::Value;

fn db() -> Db {
    Db::new(DbConfig::new())
}

fn count_placeholders(sql: &str) -> usize {
    sql.matches('?').count()
}

// ==================== SELECT ====================

#[test]
fn select_star_by_default() {
    let db = db();
    let stmt = db.table("users").select_statement().unwrap();
    assert_eq!(stmt.sql, "SELECT * FROM users");
    assert!(stmt.params.is_empty());
}

#[test]
fn select_columns_accumulate() {
    let db = db();
    let stmt = db
        .table("users")
        .select(&["id", "name"])
        .select(&["email"])
        .select_statement()
        .unwrap();
    assert_eq!(stmt.sql, "SELECT id, name, email FROM users");
}

#[test]
fn eq_is_operator_inference_for_cond() {
    let db = db();
    let a = db.table("users").eq("status", "active").select_statement().unwrap();
    let b = db
        .table("users")
        .cond("status", Op::Eq, "active")
        .select_statement()
        .unwrap();
    assert_eq!(a, b);
    assert_eq!(a.sql, "SELECT * FROM users WHERE status = ?");
    assert_eq!(a.params, vec![Value::from("active")]);
}

#[test]
fn predicates_join_with_and_in_order() {
    let db = db();
    let stmt = db
        .table("users")
        .eq("status", "active")
        .gt("age", 18)
        .lte("score", 100)
        .select_statement()
        .unwrap();
    assert_eq!(
        stmt.sql,
        "SELECT * FROM users WHERE status = ? AND age > ? AND score <= ?"
    );
    assert_eq!(
        stmt.params,
        vec![Value::from("active"), Value::from(18), Value::from(100)]
    );
}

#[test]
fn like_wraps_pattern_with_wildcards() {
    let db = db();
    let stmt = db.table("users").like("name", "John").select_statement().unwrap();
    assert_eq!(stmt.sql, "SELECT * FROM users WHERE name LIKE ?");
    assert_eq!(stmt.params, vec![Value::from("%John%")]);
}

#[test]
fn in_list_renders_placeholder_list() {
    let db = db();
    let stmt = db
        .table("users")
        .in_list("id", vec![1, 2, 3])
        .select_statement()
        .unwrap();
    assert_eq!(stmt.sql, "SELECT * FROM users WHERE id IN (?,?,?)");
    assert_eq!(
        stmt.params,
        vec![Value::from(1), Value::from(2), Value::from(3)]
    );
}

#[test]
fn empty_in_list_is_invalid() {
    let db = db();
    let err = db
        .table("users")
        .in_list::<i64>("id", vec![])
        .select_statement()
        .unwrap_err();
    assert!(err.is_invalid_argument());
}

#[test]
fn joins_render_in_insertion_order() {
    let db = db();
    let stmt = db
        .table("orders")
        .inner_join("users", "orders.user_id", "users.id")
        .left_join("coupons", "orders.coupon_id", "coupons.id")
        .eq("users.status", "active")
        .select_statement()
        .unwrap();
    assert_eq!(
        stmt.sql,
        "SELECT * FROM orders \
         INNER JOIN users ON orders.user_id = users.id \
         LEFT JOIN coupons ON orders.coupon_id = coupons.id \
         WHERE users.status = ?"
    );
}

#[test]
fn join_with_explicit_operator() {
    let db = db();
    let stmt = db
        .table("events")
        .join(crate::qb::JoinKind::Right, "windows", "events.ts", ">=", "windows.start")
        .select_statement()
        .unwrap();
    assert_eq!(
        stmt.sql,
        "SELECT * FROM events RIGHT JOIN windows ON events.ts >= windows.start"
    );
}

#[test]
fn order_limit_offset() {
    let db = db();
    let stmt = db
        .table("users")
        .order_by("created_at", Order::Desc)
        .limit(10)
        .offset(20)
        .select_statement()
        .unwrap();
    assert_eq!(
        stmt.sql,
        "SELECT * FROM users ORDER BY created_at DESC LIMIT 10 OFFSET 20"
    );
}

#[test]
fn total_adds_window_count_beside_columns() {
    let db = db();
    let stmt = db
        .table("users")
        .select(&["id", "name"])
        .total()
        .limit(10)
        .select_statement()
        .unwrap();
    assert_eq!(
        stmt.sql,
        "SELECT id, name, COUNT(*) OVER() AS total FROM users LIMIT 10"
    );
}

#[test]
fn function_literal_predicates_are_verbatim() {
    let db = db();
    let stmt = db
        .table("sessions")
        .lte("expires_at", "NOW()")
        .eq("user_id", 9)
        .select_statement()
        .unwrap();
    assert_eq!(
        stmt.sql,
        "SELECT * FROM sessions WHERE expires_at <= NOW() AND user_id = ?"
    );
    // no param entry for the inlined literal
    assert_eq!(stmt.params, vec![Value::from(9)]);
}

#[test]
fn raw_condition_is_verbatim() {
    let db = db();
    let stmt = db
        .table("users")
        .raw_cond("deleted_at IS NULL")
        .eq("status", "active")
        .select_statement()
        .unwrap();
    assert_eq!(
        stmt.sql,
        "SELECT * FROM users WHERE deleted_at IS NULL AND status = ?"
    );
}

// ==================== INSERT ====================

#[test]
fn insert_renders_columns_and_placeholders() {
    let db = db();
    let stmt = db
        .table("users")
        .set("name", "alice")
        .set("age", 30)
        .insert_statement()
        .unwrap();
    assert_eq!(stmt.sql, "INSERT INTO users (name, age) VALUES (?, ?)");
    assert_eq!(stmt.params, vec![Value::from("alice"), Value::from(30)]);
}

#[test]
fn insert_inlines_function_literals() {
    let db = db();
    let stmt = db
        .table("users")
        .set("name", "alice")
        .set("created_at", "NOW()")
        .set("token", "UUID()")
        .insert_statement()
        .unwrap();
    assert_eq!(
        stmt.sql,
        "INSERT INTO users (name, created_at, token) VALUES (?, NOW(), UUID())"
    );
    assert_eq!(stmt.params, vec![Value::from("alice")]);
}

#[test]
fn insert_without_columns_is_invalid() {
    let db = db();
    let err = db.table("users").insert_statement().unwrap_err();
    assert!(err.is_invalid_argument());
}

#[test]
fn set_json_serializes_value() {
    let db = db();
    let stmt = db
        .table("events")
        .set_json("payload", &serde_json::json!({"kind": "login"}))
        .insert_statement()
        .unwrap();
    assert_eq!(stmt.sql, "INSERT INTO events (payload) VALUES (?)");
    assert_eq!(stmt.params, vec![Value::from(r#"{"kind":"login"}"#)]);
}

// ==================== UPDATE ====================

#[test]
fn update_merges_sets_and_increments() {
    let db = db();
    let stmt = db
        .table("counters")
        .set("label", "hits")
        .increase("value", 3)
        .increase("misses", -2)
        .eq("id", 7)
        .update_statement()
        .unwrap();
    assert_eq!(
        stmt.sql,
        "UPDATE counters SET label = ?, value = value + 3, misses = misses - 2 WHERE id = ?"
    );
    // SET params come before WHERE params
    assert_eq!(stmt.params, vec![Value::from("hits"), Value::from(7)]);
}

#[test]
fn update_with_only_increments_is_valid() {
    let db = db();
    let stmt = db
        .table("counters")
        .increase("value", 1)
        .eq("id", 7)
        .update_statement()
        .unwrap();
    assert_eq!(stmt.sql, "UPDATE counters SET value = value + 1 WHERE id = ?");
}

#[test]
fn update_with_nothing_to_set_is_invalid() {
    let db = db();
    let err = db.table("users").update_statement().unwrap_err();
    assert!(err.is_invalid_argument());

    // predicates alone do not make an UPDATE renderable
    let err = db.table("users").eq("id", 1).update_statement().unwrap_err();
    assert!(err.is_invalid_argument());
}

#[test]
fn update_set_params_precede_where_params() {
    let db = db();
    let stmt = db
        .table("users")
        .set("name", "bob")
        .set("email", "bob@example.com")
        .eq("id", 42)
        .in_list("team_id", vec![1, 2])
        .update_statement()
        .unwrap();
    assert_eq!(
        stmt.sql,
        "UPDATE users SET name = ?, email = ? WHERE id = ? AND team_id IN (?,?)"
    );
    assert_eq!(
        stmt.params,
        vec![
            Value::from("bob"),
            Value::from("bob@example.com"),
            Value::from(42),
            Value::from(1),
            Value::from(2),
        ]
    );
}

// ==================== UPSERT ====================

#[test]
fn upsert_defaults_to_updating_every_inserted_column() {
    let db = db();
    let stmt = db
        .table("settings")
        .set("a", 1)
        .set("b", 2)
        .upsert_statement()
        .unwrap();
    assert_eq!(
        stmt.sql,
        "INSERT INTO settings (a, b) VALUES (?, ?) \
         ON DUPLICATE KEY UPDATE a = VALUES(a), b = VALUES(b)"
    );
    assert_eq!(stmt.params, vec![Value::from(1), Value::from(2)]);
}

#[test]
fn upsert_with_explicit_update_columns() {
    let db = db();
    let stmt = db
        .table("settings")
        .set("a", 1)
        .set("b", 2)
        .on_duplicate_set("b", 3)
        .upsert_statement()
        .unwrap();
    assert_eq!(
        stmt.sql,
        "INSERT INTO settings (a, b) VALUES (?, ?) ON DUPLICATE KEY UPDATE b = ?"
    );
    // insert params first, duplicate-clause params after
    assert_eq!(
        stmt.params,
        vec![Value::from(1), Value::from(2), Value::from(3)]
    );
}

#[test]
fn upsert_with_raw_duplicate_clause() {
    let db = db();
    let stmt = db
        .table("page_stats")
        .set("page", "/home")
        .set("hits", 1)
        .on_duplicate_raw("hits = hits + 1")
        .upsert_statement()
        .unwrap();
    assert_eq!(
        stmt.sql,
        "INSERT INTO page_stats (page, hits) VALUES (?, ?) \
         ON DUPLICATE KEY UPDATE hits = hits + 1"
    );
    assert_eq!(stmt.params, vec![Value::from("/home"), Value::from(1)]);
}

#[test]
fn upsert_duplicate_clause_inlines_function_literals() {
    let db = db();
    let stmt = db
        .table("settings")
        .set("key", "theme")
        .set("value", "dark")
        .on_duplicate_set("value", "dark")
        .on_duplicate_set("updated_at", "NOW()")
        .upsert_statement()
        .unwrap();
    assert_eq!(
        stmt.sql,
        "INSERT INTO settings (key, value) VALUES (?, ?) \
         ON DUPLICATE KEY UPDATE value = ?, updated_at = NOW()"
    );
    assert_eq!(
        stmt.params,
        vec![Value::from("theme"), Value::from("dark"), Value::from("dark")]
    );
}

// ==================== Placeholder invariant ====================

#[test]
fn placeholder_count_matches_param_count() {
    let db = db();
    let statements = [
        db.table("users").select_statement().unwrap(),
        db.table("users")
            .select(&["id"])
            .total()
            .eq("status", "active")
            .in_list("role", vec!["admin", "ops"])
            .like("name", "Jo")
            .gte("created_at", "NOW()")
            .order_by("id", Order::Asc)
            .limit(5)
            .offset(10)
            .select_statement()
            .unwrap(),
        db.table("orders")
            .inner_join("users", "orders.user_id", "users.id")
            .gt("orders.total", 100)
            .select_statement()
            .unwrap(),
        db.table("users")
            .set("name", "alice")
            .set("created_at", "NOW()")
            .insert_statement()
            .unwrap(),
        db.table("counters")
            .set("label", "hits")
            .increase("value", 1)
            .eq("id", 7)
            .update_statement()
            .unwrap(),
        db.table("settings")
            .set("a", 1)
            .set("b", "VERSION()")
            .on_duplicate_set("a", 2)
            .upsert_statement()
            .unwrap(),
    ];
    for stmt in statements {
        assert_eq!(
            count_placeholders(&stmt.sql),
            stmt.params.len(),
            "placeholder/param mismatch in: {}",
            stmt.sql
        );
    }
}

// ==================== Rendering purity ====================

#[test]
fn rendering_is_repeatable() {
    let db = db();
    let query = db
        .table("users")
        .eq("status", "active")
        .in_list("id", vec![1, 2])
        .limit(3);
    let first = query.select_statement().unwrap();
    let second = query.select_statement().unwrap();
    assert_eq!(first, second);
}
