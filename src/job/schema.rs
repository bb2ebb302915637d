//! Request body validation for jobs.

use serde_json::Value as JsonValue;

use super::NewJob;
use crate::errors::JoblyError;
use crate::sql::UpdatePayload;

const UPDATABLE_FIELDS: &[&str] = &["title", "salary", "equity"];

pub fn validate_new(job: &NewJob) -> Result<(), JoblyError> {
    let mut errors = Vec::new();

    if job.title.is_empty() {
        errors.push("instance.title does not meet minimum length of 1".to_owned());
    }
    if job.company_handle.is_empty() {
        errors.push("instance.companyHandle does not meet minimum length of 1".to_owned());
    }
    if let Some(salary) = job.salary {
        if salary < 0 {
            errors.push("instance.salary must be greater than or equal to 0".to_owned());
        }
    }
    if let Some(equity) = &job.equity {
        if let Err(err) = check_equity(equity) {
            errors.push(err);
        }
    }

    into_result(errors)
}

/// Checks that every field is updatable and holds a value of the right
/// type. An empty payload passes here and is rejected when compiled.
pub fn validate_update(payload: &UpdatePayload) -> Result<(), JoblyError> {
    let mut errors = Vec::new();

    for (field, value) in payload {
        let check = match (field.as_str(), value) {
            ("title", JsonValue::String(title)) if !title.is_empty() => Ok(()),
            ("title", _) => Err("instance.title must be a non-empty string".to_owned()),
            ("salary", JsonValue::Null) | ("equity", JsonValue::Null) => Ok(()),
            ("salary", JsonValue::Number(salary)) if salary.as_i64().map_or(false, |s| s >= 0) => {
                Ok(())
            }
            ("salary", _) => Err("instance.salary must be a non-negative integer".to_owned()),
            ("equity", JsonValue::String(equity)) => check_equity(equity),
            ("equity", _) => Err("instance.equity must be a decimal string".to_owned()),
            (field, _) => Err(format!(
                "instance is not allowed to have the additional property \"{}\", expected one of {}",
                field,
                UPDATABLE_FIELDS.join(", ")
            )),
        };

        if let Err(err) = check {
            errors.push(err);
        }
    }

    into_result(errors)
}

fn check_equity(equity: &str) -> Result<(), String> {
    match equity.parse::<f64>() {
        Ok(value) if (0.0..=1.0).contains(&value) => Ok(()),
        _ => Err(format!(
            "instance.equity \"{}\" must be a decimal between 0 and 1",
            equity
        )),
    }
}

fn into_result(errors: Vec<String>) -> Result<(), JoblyError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(JoblyError::BadRequest {
            message: errors.join("; "),
        })
    }
}
