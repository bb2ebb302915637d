use actix::prelude::*;
use rusqlite::types::Value;
use rusqlite::Connection;
use std::fs;
use std::path::Path;

use crate::errors::JoblyError;

mod migrate {
    use refinery::embed_migrations;
    embed_migrations!("src/database/migrations");
}

pub struct Database {
    connection: rusqlite::Connection,
}

impl Database {
    pub fn new(path: &str) -> Result<Self, JoblyError> {
        fs::create_dir_all(&path).map_err(|err| JoblyError::CreateDatabaseDir { source: err })?;

        let database_path = Path::new(path).join("jobly-database.db");
        let connection = Connection::open(&database_path)
            .map_err(|err| JoblyError::OpenDatabase { source: err })?;

        debug!("Connected to the database at {}", database_path.display());
        Self::migrated(connection)
    }

    #[cfg(test)]
    pub fn in_memory() -> Result<Self, JoblyError> {
        let connection =
            Connection::open_in_memory().map_err(|err| JoblyError::OpenDatabase { source: err })?;

        Self::migrated(connection)
    }

    fn migrated(mut connection: Connection) -> Result<Self, JoblyError> {
        debug!("Running database migrations");
        migrate::migrations::runner()
            .run(&mut connection)
            .map_err(|err| JoblyError::Migrate { source: err })?;

        Ok(Self { connection })
    }
}

impl Actor for Database {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Context<Self>) {
        debug!("Database actor started");
    }

    fn stopped(&mut self, _ctx: &mut Context<Self>) {
        debug!("Disconnected from database");
    }
}

/// Runs a statement and resolves to the number of changed rows.
#[derive(Message)]
#[rtype(result = "rusqlite::Result<usize>")]
pub struct Execute {
    pub query: String,
    pub params: Vec<Value>,
}

impl Handler<Execute> for Database {
    type Result = rusqlite::Result<usize>;

    fn handle(&mut self, execute: Execute, _ctx: &mut Context<Self>) -> Self::Result {
        self.connection
            .execute(execute.query.as_str(), execute.params)
    }
}

/// Runs an `INSERT` and resolves to the id of the new row.
#[derive(Message)]
#[rtype(result = "rusqlite::Result<i64>")]
pub struct Insert {
    pub query: String,
    pub params: Vec<Value>,
}

impl Handler<Insert> for Database {
    type Result = rusqlite::Result<i64>;

    fn handle(&mut self, insert: Insert, _ctx: &mut Context<Self>) -> Self::Result {
        self.connection
            .execute(insert.query.as_str(), insert.params)?;

        Ok(self.connection.last_insert_rowid())
    }
}

#[derive(Message)]
#[rtype(result = "rusqlite::Result<Vec<T>>")]
pub struct Query<T, F>
where
    T: 'static,
    F: FnMut(&rusqlite::Row<'_>) -> rusqlite::Result<T>,
{
    pub query: String,
    pub params: Vec<Value>,
    pub map_result: F,
}

impl<T, F> Handler<Query<T, F>> for Database
where
    T: 'static,
    F: FnMut(&rusqlite::Row<'_>) -> rusqlite::Result<T>,
{
    type Result = rusqlite::Result<Vec<T>>;

    fn handle(&mut self, query: Query<T, F>, _ctx: &mut Context<Self>) -> Self::Result {
        let result: rusqlite::Result<Vec<T>> = self
            .connection
            .prepare(query.query.as_str())?
            .query_map(query.params, query.map_result)?
            .collect();

        result
    }
}
