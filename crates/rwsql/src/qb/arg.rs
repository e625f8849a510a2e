//! Bound-value handling for the query builder.
//!
//! Values normally travel as `?` placeholders bound through the driver. The
//! single, deliberate exception is a closed allowlist of zero-argument SQL
//! function literals (`NOW()`, `UUID()`, ...) which are inlined verbatim —
//! they are SQL expressions, not user data. The check is an exact byte
//! match; nothing else ever bypasses parameterization.

use mysql_async::{Params, Value};

/// Zero-argument SQL functions recognized for verbatim inlining.
pub const FUNCTION_LITERALS: &[&str] = &[
    "NOW()",
    "CURRENT_TIMESTAMP",
    "UUID()",
    "RAND()",
    "CURDATE()",
    "CURTIME()",
    "UNIX_TIMESTAMP()",
    "UTC_TIMESTAMP()",
    "SYSDATE()",
    "LOCALTIME()",
    "LOCALTIMESTAMP()",
    "PI()",
    "DATABASE()",
    "USER()",
    "VERSION()",
];

/// Return the canonical literal if `bytes` exactly matches an allowlist entry.
pub(crate) fn fn_literal(bytes: &[u8]) -> Option<&'static str> {
    FUNCTION_LITERALS.iter().copied().find(|lit| lit.as_bytes() == bytes)
}

/// A value destined for a rendered statement: either a bound parameter or a
/// recognized function literal emitted verbatim.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Arg {
    Value(Value),
    Fn(&'static str),
}

impl Arg {
    pub(crate) fn from_value(value: Value) -> Self {
        if let Value::Bytes(bytes) = &value {
            if let Some(lit) = fn_literal(bytes) {
                return Arg::Fn(lit);
            }
        }
        Arg::Value(value)
    }
}

/// Convert rendered params into driver [`Params`].
///
/// A statement with no bound values must execute as `Params::Empty`.
pub(crate) fn to_params(values: Vec<Value>) -> Params {
    if values.is_empty() {
        Params::Empty
    } else {
        Params::Positional(values)
    }
}
