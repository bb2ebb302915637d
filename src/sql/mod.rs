//! Building blocks for the SQL fragments the service composes at runtime.
//!
//! Column identifiers and operators are always code controlled. Values never
//! reach the SQL text, they travel as positional parameters (`$1`, `$2`, ...).

pub mod mapping;
pub mod predicate;
pub mod update;

use rusqlite::types::Value;
use serde_json::Value as JsonValue;

pub use mapping::FieldMapping;
pub use predicate::Predicate;
pub use update::{SetClause, UpdatePayload};

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum CompileError {
    #[error("Invalid argument: {}", reason)]
    InvalidArgument { reason: String },
}

/// Renders a positional placeholder for the given 1-based index.
pub fn placeholder(index: usize) -> String {
    format!("${}", index)
}

/// Wraps an identifier in double quotes, doubling any embedded quote.
pub fn quote_identifier(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

/// Converts a JSON scalar into a statement parameter. Arrays and objects
/// are not scalars and yield `None`.
pub fn to_sql_value(value: &JsonValue) -> Option<Value> {
    match value {
        JsonValue::Null => Some(Value::Null),
        JsonValue::Bool(flag) => Some(Value::Integer(*flag as i64)),
        JsonValue::Number(number) => number
            .as_i64()
            .map(Value::Integer)
            .or_else(|| number.as_f64().map(Value::Real)),
        JsonValue::String(text) => Some(Value::Text(text.clone())),
        JsonValue::Array(_) | JsonValue::Object(_) => None,
    }
}
