use crate::sql::FieldMapping;
use crate::store::Table;

use super::Job;

pub const JOBS: Table<Job> = Table {
    name: "jobs",
    columns: "id, title, salary, equity_text, company_handle",
    from_row: Job::from_row,
};

pub const ORDER_BY_ID: &str = "id";

/// Updatable fields. `equity` is written as submitted to `equity_text`; a
/// trigger keeps the numeric `equity` column used by filters in step.
pub const FIELDS: FieldMapping<'static> = FieldMapping::new(&[("equity", "equity_text")]);

pub const INSERT_COLUMNS: &[&str] = &["title", "salary", "equity_text", "company_handle"];
