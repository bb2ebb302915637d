use rusqlite::types::Value;

use super::placeholder;

/// Conditions joined with `AND`, each with its positional parameters.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Predicate {
    conditions: Vec<String>,
    params: Vec<Value>,
}

impl Predicate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a condition that binds no value, e.g. `equity > 0`.
    pub fn and(&mut self, condition: &str) -> &mut Self {
        self.conditions.push(condition.to_owned());
        self
    }

    /// Adds a condition bound to `value`. `render` receives the placeholder
    /// assigned to the value and returns the condition text.
    pub fn and_param<F>(&mut self, render: F, value: Value) -> &mut Self
    where
        F: FnOnce(&str) -> String,
    {
        self.params.push(value);
        let condition = render(&placeholder(self.params.len()));
        self.conditions.push(condition);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn sql(&self) -> String {
        self.conditions.join(" AND ")
    }

    /// `WHERE <conditions>`, or an empty string when there are none.
    pub fn where_clause(&self) -> String {
        if self.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.sql())
        }
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    pub fn into_params(self) -> Vec<Value> {
        self.params
    }
}
