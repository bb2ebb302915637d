use actix::prelude::*;
use rusqlite::types::Value;

use crate::database::{self, Database};
use crate::errors::JoblyError;
use crate::sql::{self, Predicate, SetClause};

/// Describes how to read rows of a table: its name, the select list and
/// how a row maps into a record.
pub struct Table<T: 'static> {
    pub name: &'static str,
    pub columns: &'static str,
    pub from_row: fn(&rusqlite::Row<'_>) -> rusqlite::Result<T>,
}

/// Single-statement access to the tables owned by the database actor.
#[derive(Clone)]
pub struct RecordStore {
    database: Addr<Database>,
}

impl RecordStore {
    pub fn new(database: Addr<Database>) -> Self {
        Self { database }
    }

    pub async fn insert<T: Send + 'static>(
        &self,
        table: &Table<T>,
        columns: &[&str],
        values: Vec<Value>,
    ) -> Result<T, JoblyError> {
        let columns = columns
            .iter()
            .map(|column| sql::quote_identifier(column))
            .collect::<Vec<_>>();
        let placeholders = (1..=values.len())
            .map(sql::placeholder)
            .collect::<Vec<_>>();

        let query = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table.name,
            columns.join(", "),
            placeholders.join(", ")
        );
        debug!("Executing: {}", &query);

        let id = self
            .database
            .send(database::Insert {
                query,
                params: values,
            })
            .await
            .map_err(|err| JoblyError::Mailbox {
                reason: err.to_string(),
            })?
            .map_err(|err| JoblyError::Database { source: err })?;

        self.select_by_id(table, id)
            .await?
            .ok_or_else(|| JoblyError::NotFound {
                message: format!("Inserted row {} in {} vanished", id, table.name),
            })
    }

    pub async fn select_where<T: Send + 'static>(
        &self,
        table: &Table<T>,
        predicate: Predicate,
        order: &str,
    ) -> Result<Vec<T>, JoblyError> {
        let query = format!(
            "SELECT {} FROM {} {} ORDER BY {}",
            table.columns,
            table.name,
            predicate.where_clause(),
            order
        );

        self.query(table, query, predicate.into_params()).await
    }

    pub async fn select_by_id<T: Send + 'static>(
        &self,
        table: &Table<T>,
        id: i64,
    ) -> Result<Option<T>, JoblyError> {
        let query = format!(
            "SELECT {} FROM {} WHERE id = $1",
            table.columns, table.name
        );

        let rows = self
            .query(table, query, vec![Value::Integer(id)])
            .await?;

        Ok(rows.into_iter().next())
    }

    /// Applies `set` to the row with the given id and reads it back.
    /// Resolves to `None` when no such row exists.
    pub async fn update_where<T: Send + 'static>(
        &self,
        table: &Table<T>,
        set: SetClause,
        id: i64,
    ) -> Result<Option<T>, JoblyError> {
        let query = format!(
            "UPDATE {} SET {} WHERE id = {}",
            table.name,
            set.clause,
            sql::placeholder(set.next_placeholder())
        );

        let mut params = set.values;
        params.push(Value::Integer(id));

        if self.execute(query, params).await? == 0 {
            return Ok(None);
        }

        self.select_by_id(table, id).await
    }

    /// Resolves to whether a row existed and was deleted.
    pub async fn delete_by_id<T: 'static>(
        &self,
        table: &Table<T>,
        id: i64,
    ) -> Result<bool, JoblyError> {
        let query = format!("DELETE FROM {} WHERE id = $1", table.name);

        let deleted = self.execute(query, vec![Value::Integer(id)]).await?;

        Ok(deleted > 0)
    }

    async fn execute(&self, query: String, params: Vec<Value>) -> Result<usize, JoblyError> {
        debug!("Executing: {}", &query);

        self.database
            .send(database::Execute { query, params })
            .await
            .map_err(|err| JoblyError::Mailbox {
                reason: err.to_string(),
            })?
            .map_err(|err| JoblyError::Database { source: err })
    }

    async fn query<T: Send + 'static>(
        &self,
        table: &Table<T>,
        query: String,
        params: Vec<Value>,
    ) -> Result<Vec<T>, JoblyError> {
        debug!("Querying: {}", &query);

        self.database
            .send(database::Query {
                query,
                params,
                map_result: table.from_row,
            })
            .await
            .map_err(|err| JoblyError::Mailbox {
                reason: err.to_string(),
            })?
            .map_err(|err| JoblyError::Database { source: err })
    }
}
