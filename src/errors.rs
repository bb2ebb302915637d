use actix_http::ResponseBuilder;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde_json::json;

use crate::sql::CompileError;

#[derive(thiserror::Error, Debug)]
pub enum JoblyError {
    #[error("Failed to read config file, {}", source)]
    ReadConfig { source: std::io::Error },

    #[error("Failed to parse config file, {}", source)]
    ParseConfig { source: toml::de::Error },

    #[error("Failed to create database directory, {}", source)]
    CreateDatabaseDir { source: std::io::Error },

    #[error("Failed to open database, {}", source)]
    OpenDatabase { source: rusqlite::Error },

    #[error("Failed to run database migrations, {}", source)]
    Migrate { source: refinery::Error },

    #[error("Failed to execute database statement, {}", source)]
    Database { source: rusqlite::Error },

    #[error("Failed to reach database actor, {}", reason)]
    Mailbox { reason: String },

    #[error("{}", source)]
    InvalidUpdate { source: CompileError },

    #[error("{}", message)]
    BadRequest { message: String },

    #[error("{}", message)]
    NotFound { message: String },
}

impl actix_web::error::ResponseError for JoblyError {
    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        ResponseBuilder::new(status).json(json!({
            "error": {
                "message": self.to_string(),
                "status": status.as_u16(),
            }
        }))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            JoblyError::BadRequest { .. } | JoblyError::InvalidUpdate { .. } => {
                StatusCode::BAD_REQUEST
            }
            JoblyError::NotFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
