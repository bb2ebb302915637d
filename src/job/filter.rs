use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

use crate::sql::Predicate;

/// Optional filters for listing jobs. A missing field does not filter on
/// that dimension. Unknown fields are ignored.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    pub title: Option<String>,
    pub min_salary: Option<i64>,
    pub has_equity: Option<bool>,
}

/// Compiles the criteria into a predicate. Conditions always come out in
/// the order title, minimum salary, equity.
pub fn compile(criteria: Option<&FilterCriteria>) -> Predicate {
    let mut predicate = Predicate::new();

    let criteria = match criteria {
        Some(criteria) => criteria,
        None => return predicate,
    };

    if let Some(title) = &criteria.title {
        predicate.and_param(
            |p| format!("title LIKE {} ESCAPE '\\'", p),
            Value::Text(format!("%{}%", escape_like(title))),
        );
    }

    if let Some(min_salary) = criteria.min_salary {
        predicate.and_param(|p| format!("salary >= {}", p), Value::Integer(min_salary));
    }

    if criteria.has_equity == Some(true) {
        predicate.and("equity > 0");
    }

    predicate
}

// LIKE wildcards in user input match literally.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if c == '\\' || c == '%' || c == '_' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
