use rusqlite::types::Value;
use serde_json::{Map, Value as JsonValue};

use super::{placeholder, quote_identifier, to_sql_value, CompileError, FieldMapping};

/// Fields a caller wants changed, in the order they were received.
pub type UpdatePayload = Map<String, JsonValue>;

/// A rendered `SET` clause and the values bound to its placeholders.
/// `values[i]` binds placeholder `$i+1`.
#[derive(Debug, Clone, PartialEq)]
pub struct SetClause {
    pub clause: String,
    pub values: Vec<Value>,
}

impl SetClause {
    /// Index of the first placeholder after the ones used by the clause.
    pub fn next_placeholder(&self) -> usize {
        self.values.len() + 1
    }
}

/// Compiles a partial update into a `SET` clause.
///
/// Columns and values are produced in one pass over the payload so the
/// placeholder order always matches the value order.
///
/// ```ignore
/// {"companyHandle": "c1", "salary": 10} => "company_handle"=$1, "salary"=$2 / ["c1", 10]
/// ```
pub fn compile(payload: &UpdatePayload, mapping: &FieldMapping) -> Result<SetClause, CompileError> {
    if payload.is_empty() {
        return Err(CompileError::InvalidArgument {
            reason: "No data supplied for update".to_owned(),
        });
    }

    let mut columns = Vec::with_capacity(payload.len());
    let mut values = Vec::with_capacity(payload.len());

    for (index, (field, value)) in payload.iter().enumerate() {
        let value = to_sql_value(value).ok_or_else(|| CompileError::InvalidArgument {
            reason: format!("Field '{}' must be a scalar value", field),
        })?;

        columns.push(format!(
            "{}={}",
            quote_identifier(mapping.column(field)),
            placeholder(index + 1)
        ));
        values.push(value);
    }

    Ok(SetClause {
        clause: columns.join(", "),
        values,
    })
}
