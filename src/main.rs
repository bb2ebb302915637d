use actix::Actor;
use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{delete, get, patch, post, web, App, HttpResponse, HttpServer, Responder, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::ErrorKind;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::{fs, process};

#[macro_use]
extern crate log;

mod cli;
mod database;
mod errors;
mod job;
mod sql;
mod store;

use errors::JoblyError;
use job::{FilterCriteria, NewJob};
use sql::UpdatePayload;
use store::RecordStore;

#[derive(Debug, Default, Deserialize, Serialize)]
struct Config {
    port: Option<u16>,
    database: Option<String>,
}

impl Config {
    fn load(path: &str) -> Result<Self, JoblyError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("No config file at {}, using defaults", path);
                return Ok(Config::default());
            }
            Err(err) => return Err(JoblyError::ReadConfig { source: err }),
        };

        toml::from_str(&content).map_err(|err| JoblyError::ParseConfig { source: err })
    }
}

// Malformed bodies and query strings answer with the same JSON error shape
// as the handlers.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        JoblyError::BadRequest {
            message: err.to_string(),
        }
        .into()
    })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        JoblyError::BadRequest {
            message: err.to_string(),
        }
        .into()
    })
}

#[get("/healthz")]
async fn healthz() -> impl Responder {
    HttpResponse::Ok().body("200 Ok")
}

#[get("/info")]
async fn info() -> Result<web::Json<serde_json::value::Value>> {
    let response = json!({ "version": env!("CARGO_PKG_VERSION") });

    Ok(web::Json(response))
}

#[post("/jobs")]
async fn create_job(
    body: web::Json<NewJob>,
    store: web::Data<RecordStore>,
) -> Result<HttpResponse, JoblyError> {
    let job = job::create(&store, body.into_inner()).await?;

    Ok(HttpResponse::Created().json(json!({ "job": job })))
}

#[get("/jobs")]
async fn get_jobs(
    criteria: web::Query<FilterCriteria>,
    store: web::Data<RecordStore>,
) -> Result<HttpResponse, JoblyError> {
    let criteria = criteria.into_inner();
    let jobs = job::find_all(&store, Some(&criteria)).await?;

    Ok(HttpResponse::Ok().json(json!({ "jobs": jobs })))
}

#[get("/jobs/{id}")]
async fn get_job(
    id: web::Path<i64>,
    store: web::Data<RecordStore>,
) -> Result<HttpResponse, JoblyError> {
    let job = job::get(&store, id.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({ "job": job })))
}

#[patch("/jobs/{id}")]
async fn update_job(
    id: web::Path<i64>,
    body: web::Json<UpdatePayload>,
    store: web::Data<RecordStore>,
) -> Result<HttpResponse, JoblyError> {
    let job = job::update(&store, id.into_inner(), body.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({ "job": job })))
}

#[delete("/jobs/{id}")]
async fn delete_job(
    id: web::Path<i64>,
    store: web::Data<RecordStore>,
) -> Result<HttpResponse, JoblyError> {
    let id = id.into_inner();
    job::remove(&store, id).await?;

    Ok(HttpResponse::Ok().json(json!({ "deleted": format!("job id {}", id) })))
}

#[actix_rt::main]
async fn main() -> std::io::Result<()> {
    let matches = cli::ask().get_matches();

    if std::env::var("RUST_LOG").is_err() {
        let level = if matches.is_present("verbose") {
            "jobly=debug,actix_web=info"
        } else {
            "jobly=info,actix_web=info"
        };
        std::env::set_var("RUST_LOG", level);
    }
    env_logger::init();

    let serve_matches = match matches.subcommand_matches("serve") {
        Some(serve_matches) => serve_matches,
        None => return Ok(()),
    };

    let config_path = serve_matches
        .value_of("config")
        .map(|path| shellexpand::tilde(&path).into_owned())
        .unwrap_or_else(|| "./.joblyrc".to_owned());

    let config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            process::exit(1);
        }
    };

    let default_port = 8080;
    let default_database = "~/.jobly".to_owned();

    let port: u16 = serve_matches
        .value_of("port")
        .and_then(|port| port.parse().ok())
        .or(config.port)
        .unwrap_or(default_port);

    let database_dir = serve_matches
        .value_of("database")
        .map(|s| s.to_string())
        .or(config.database)
        .unwrap_or(default_database);
    let database_dir = shellexpand::tilde(&database_dir).into_owned();

    let database = match database::Database::new(&database_dir) {
        Ok(database) => database,
        Err(err) => {
            eprintln!("{}", err);
            process::exit(1);
        }
    };
    let store = web::Data::new(RecordStore::new(database.start()));

    let localhost = IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1));
    let socket = SocketAddr::new(localhost, port);

    info!("Starting Jobly at {}", &socket);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(Cors::new().supports_credentials().finish())
            .app_data(store.clone())
            .app_data(json_config())
            .app_data(query_config())
            .service(healthz)
            .service(info)
            .service(create_job)
            .service(get_jobs)
            .service(get_job)
            .service(update_job)
            .service(delete_job)
    })
    .bind(socket)?
    .run()
    .await
}
