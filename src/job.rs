use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

use crate::errors::JoblyError;
use crate::sql::{self, Predicate, UpdatePayload};
use crate::store::RecordStore;

pub mod filter;
pub mod query;
pub mod schema;

pub use filter::FilterCriteria;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i64,
    pub title: String,
    pub salary: Option<i64>,
    pub equity: Option<String>,
    pub company_handle: String,
}

impl Job {
    pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            salary: row.get(2)?,
            equity: row.get(3)?,
            company_handle: row.get(4)?,
        })
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewJob {
    pub title: String,
    pub salary: Option<i64>,
    pub equity: Option<String>,
    pub company_handle: String,
}

/// Creates a job. A job with the same title at the same company is a
/// duplicate and is rejected.
pub async fn create(store: &RecordStore, job: NewJob) -> Result<Job, JoblyError> {
    schema::validate_new(&job)?;

    let mut duplicate = Predicate::new();
    duplicate.and_param(
        |p| format!("title = {}", p),
        Value::Text(job.title.clone()),
    );
    duplicate.and_param(
        |p| format!("company_handle = {}", p),
        Value::Text(job.company_handle.clone()),
    );

    if !store
        .select_where(&query::JOBS, duplicate, query::ORDER_BY_ID)
        .await?
        .is_empty()
    {
        return Err(JoblyError::BadRequest {
            message: format!("Duplicate job: {}, for {}", job.title, job.company_handle),
        });
    }

    let title = job.title.clone();
    let company_handle = job.company_handle.clone();
    let values = vec![
        Value::Text(job.title),
        job.salary.map_or(Value::Null, Value::Integer),
        job.equity.map_or(Value::Null, Value::Text),
        Value::Text(job.company_handle),
    ];

    let job = store
        .insert(&query::JOBS, query::INSERT_COLUMNS, values)
        .await
        .map_err(|err| match err {
            JoblyError::Database {
                source: rusqlite::Error::SqliteFailure(failure, _),
            } if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE => {
                JoblyError::BadRequest {
                    message: format!("Duplicate job: {}, for {}", title, company_handle),
                }
            }
            err => err,
        })?;

    debug!("Created job {} for {}", job.id, job.company_handle);
    Ok(job)
}

/// Lists jobs matching the criteria, all of them when there are none.
pub async fn find_all(
    store: &RecordStore,
    criteria: Option<&FilterCriteria>,
) -> Result<Vec<Job>, JoblyError> {
    let predicate = filter::compile(criteria);

    store
        .select_where(&query::JOBS, predicate, query::ORDER_BY_ID)
        .await
}

pub async fn get(store: &RecordStore, id: i64) -> Result<Job, JoblyError> {
    store
        .select_by_id(&query::JOBS, id)
        .await?
        .ok_or_else(|| JoblyError::NotFound {
            message: format!("No job with id: {}", id),
        })
}

/// Partially updates a job, only the fields present in the payload change.
pub async fn update(store: &RecordStore, id: i64, payload: UpdatePayload) -> Result<Job, JoblyError> {
    schema::validate_update(&payload)?;

    let set = sql::update::compile(&payload, &query::FIELDS)
        .map_err(|err| JoblyError::InvalidUpdate { source: err })?;

    let job = store
        .update_where(&query::JOBS, set, id)
        .await?
        .ok_or_else(|| JoblyError::NotFound {
            message: format!("No job: {}", id),
        })?;

    debug!("Updated job {}", id);
    Ok(job)
}

pub async fn remove(store: &RecordStore, id: i64) -> Result<(), JoblyError> {
    if !store.delete_by_id(&query::JOBS, id).await? {
        return Err(JoblyError::NotFound {
            message: format!("No job: {}", id),
        });
    }

    debug!("Removed job {}", id);
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::database::Database;
    use actix::Actor;
    use serde_json::json;

    async fn seeded() -> (RecordStore, Vec<Job>) {
        let store = RecordStore::new(Database::in_memory().unwrap().start());
        let mut jobs = Vec::new();

        for (title, salary, equity, company) in vec![
            ("j1", Some(20000), Some("0"), "c2"),
            ("j2", Some(50000), Some("0.1"), "c2"),
            ("Senior Engineer", Some(90000), None, "c3"),
        ] {
            let job = create(
                &store,
                NewJob {
                    title: title.to_owned(),
                    salary,
                    equity: equity.map(String::from),
                    company_handle: company.to_owned(),
                },
            )
            .await
            .unwrap();
            jobs.push(job);
        }

        (store, jobs)
    }

    fn payload(value: serde_json::Value) -> UpdatePayload {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("payload must be an object"),
        }
    }

    fn titles(jobs: &[Job]) -> Vec<&str> {
        jobs.iter().map(|job| job.title.as_str()).collect()
    }

    #[actix_rt::test]
    async fn test_create() {
        let (store, jobs) = seeded().await;

        assert_eq!(
            jobs[1],
            Job {
                id: jobs[1].id,
                title: "j2".to_owned(),
                salary: Some(50000),
                equity: Some("0.1".to_owned()),
                company_handle: "c2".to_owned(),
            }
        );
        assert_eq!(get(&store, jobs[0].id).await.unwrap().equity, Some("0".to_owned()));
    }

    #[actix_rt::test]
    async fn test_create_rejects_duplicate() {
        let (store, _) = seeded().await;

        let err = create(
            &store,
            NewJob {
                title: "j1".to_owned(),
                salary: None,
                equity: None,
                company_handle: "c2".to_owned(),
            },
        )
        .await
        .unwrap_err();

        assert_eq!(err.to_string(), "Duplicate job: j1, for c2");
    }

    #[actix_rt::test]
    async fn test_find_all_without_criteria() {
        let (store, _) = seeded().await;

        let all = find_all(&store, None).await.unwrap();
        let empty = find_all(&store, Some(&FilterCriteria::default()))
            .await
            .unwrap();

        assert_eq!(titles(&all), vec!["j1", "j2", "Senior Engineer"]);
        assert_eq!(all, empty);
    }

    #[actix_rt::test]
    async fn test_find_all_with_criteria() {
        let (store, _) = seeded().await;

        let by_title = FilterCriteria {
            title: Some("ENG".to_owned()),
            ..FilterCriteria::default()
        };
        let with_equity = FilterCriteria {
            min_salary: Some(10000),
            has_equity: Some(true),
            ..FilterCriteria::default()
        };
        let injection = FilterCriteria {
            title: Some("' OR 1=1 --".to_owned()),
            ..FilterCriteria::default()
        };

        let found = find_all(&store, Some(&by_title)).await.unwrap();
        assert_eq!(titles(&found), vec!["Senior Engineer"]);

        let found = find_all(&store, Some(&with_equity)).await.unwrap();
        assert_eq!(titles(&found), vec!["j2"]);

        let found = find_all(&store, Some(&injection)).await.unwrap();
        assert!(found.is_empty());
    }

    #[actix_rt::test]
    async fn test_get_missing() {
        let (store, _) = seeded().await;

        let err = get(&store, 0).await.unwrap_err();

        assert_eq!(err.to_string(), "No job with id: 0");
    }

    #[actix_rt::test]
    async fn test_update_changes_only_given_fields() {
        let (store, jobs) = seeded().await;
        let before = &jobs[0];

        let updated = update(
            &store,
            before.id,
            payload(json!({ "salary": 40000, "equity": "0.5" })),
        )
        .await
        .unwrap();

        let expected = Job {
            salary: Some(40000),
            equity: Some("0.5".to_owned()),
            ..before.clone()
        };
        assert_eq!(updated, expected);
        assert_eq!(get(&store, before.id).await.unwrap(), expected);
        assert_eq!(get(&store, jobs[1].id).await.unwrap(), jobs[1]);
    }

    #[actix_rt::test]
    async fn test_update_persists_null() {
        let (store, jobs) = seeded().await;

        update(&store, jobs[1].id, payload(json!({ "equity": null })))
            .await
            .unwrap();

        let found = get(&store, jobs[1].id).await.unwrap();
        assert_eq!(found.equity, None);
        assert_eq!(found.salary, Some(50000));
    }

    #[actix_rt::test]
    async fn test_update_rejects_empty_payload() {
        let (store, jobs) = seeded().await;

        let err = update(&store, jobs[0].id, UpdatePayload::new())
            .await
            .unwrap_err();

        assert!(matches!(err, JoblyError::InvalidUpdate { .. }));
        assert_eq!(get(&store, jobs[0].id).await.unwrap(), jobs[0]);
    }

    #[actix_rt::test]
    async fn test_update_missing() {
        let (store, _) = seeded().await;

        let err = update(&store, 0, payload(json!({ "title": "new" })))
            .await
            .unwrap_err();

        assert!(matches!(err, JoblyError::NotFound { .. }));
    }

    #[actix_rt::test]
    async fn test_remove() {
        let (store, jobs) = seeded().await;

        remove(&store, jobs[0].id).await.unwrap();

        assert!(matches!(
            get(&store, jobs[0].id).await.unwrap_err(),
            JoblyError::NotFound { .. }
        ));
        assert!(matches!(
            remove(&store, jobs[0].id).await.unwrap_err(),
            JoblyError::NotFound { .. }
        ));
    }

    #[actix_rt::test]
    async fn test_concurrent_duplicates_store_one_row() {
        let store = RecordStore::new(Database::in_memory().unwrap().start());
        let new_job = || NewJob {
            title: "j1".to_owned(),
            salary: Some(100),
            equity: None,
            company_handle: "c1".to_owned(),
        };

        let (first, second) =
            futures::future::join(create(&store, new_job()), create(&store, new_job())).await;

        let results = vec![first, second];
        assert_eq!(results.iter().filter(|result| result.is_ok()).count(), 1);
        let err = results.into_iter().find_map(Result::err).unwrap();
        assert!(matches!(err, JoblyError::BadRequest { .. }));
        assert_eq!(err.to_string(), "Duplicate job: j1, for c1");
        assert_eq!(find_all(&store, None).await.unwrap().len(), 1);
    }

    #[actix_rt::test]
    async fn test_equity_keeps_submitted_text() {
        let (store, jobs) = seeded().await;

        let job = create(
            &store,
            NewJob {
                title: "j4".to_owned(),
                salary: Some(60000),
                equity: Some("1.0".to_owned()),
                company_handle: "c1".to_owned(),
            },
        )
        .await
        .unwrap();
        assert_eq!(job.equity, Some("1.0".to_owned()));

        let updated = update(&store, jobs[1].id, payload(json!({ "equity": "0.50" })))
            .await
            .unwrap();
        assert_eq!(updated.equity, Some("0.50".to_owned()));

        update(&store, jobs[0].id, payload(json!({ "equity": "0.00" })))
            .await
            .unwrap();
        let with_equity = FilterCriteria {
            has_equity: Some(true),
            ..FilterCriteria::default()
        };
        let found = find_all(&store, Some(&with_equity)).await.unwrap();
        assert_eq!(titles(&found), vec!["j2", "j4"]);
    }

    #[actix_rt::test]
    async fn test_update_rejects_company_handle() {
        let (store, jobs) = seeded().await;

        let err = update(&store, jobs[0].id, payload(json!({ "companyHandle": "c9" })))
            .await
            .unwrap_err();

        assert!(matches!(err, JoblyError::BadRequest { .. }));
        assert_eq!(get(&store, jobs[0].id).await.unwrap(), jobs[0]);
    }
}
