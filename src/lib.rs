pub mod auth;
pub mod auth_handlers;
pub mod config;
pub mod credentials;
pub mod db;
pub mod errors;
pub mod guard;
pub mod job_handlers;
pub mod models;
pub mod telemetry;
pub mod user_handlers;

use actix_cors::Cors;
use actix_web::http::{header, Method};
use actix_web::{get, web, HttpResponse, Responder};
use auth::TokenCodec;
use config::Config;
use credentials::PasswordHasher;
use db::Store;
use errors::ApiError;

/// Shared per-process state, read-only apart from the store.
pub struct AppState {
    pub store: Store,
    pub tokens: TokenCodec,
    pub passwords: PasswordHasher,
}

impl AppState {
    pub fn new(store: Store, tokens: TokenCodec, passwords: PasswordHasher) -> Self {
        Self {
            store,
            tokens,
            passwords,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Store::default(),
            TokenCodec::new(config.jwt_secret.as_bytes(), config.token_ttl),
            PasswordHasher::new(config.bcrypt_cost),
        )
    }
}

#[get("/")]
async fn index() -> impl Responder {
    let html = r#"
    <!DOCTYPE html>
    <html>
    <head>
        <title>Job Board API</title>
        <style>
            body {
                font-family: monospace;
                padding: 40px;
            }
            code {
                background: #f0f0f0;
                padding: 2px 6px;
                border-radius: 4px;
            }
        </style>
    </head>
    <body>
        <h1>Job Board API</h1>
        <ul>
            <li><code>GET /health</code> – Health check (returns OK)</li>
            <li><code>POST /auth/login</code> – Exchange username and password for a token</li>
            <li><code>POST /auth/refresh</code> – Re-issue a valid token (Bearer)</li>
            <li><code>GET /users</code>, <code>POST /users</code> – List or register users</li>
            <li><code>GET|PUT|DELETE /users/{id}</code> – Read, or edit your own account (Bearer)</li>
            <li><code>GET /jobs</code>, <code>POST /jobs</code> – List jobs, or post one as a recruiter (Bearer)</li>
            <li><code>GET|PUT|DELETE /jobs/{id}</code> – Read, or edit a job you posted (Bearer)</li>
        </ul>
    </body>
    </html>
    "#;

    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}

/// Simple health check
#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().body("OK")
}

/// CORS policy for browser clients. A `*` entry allows any origin.
pub fn cors(allowed_origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allowed_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allowed_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(3600);

    if allowed_origins.iter().any(|o| o == "*") {
        cors.allow_any_origin()
    } else {
        allowed_origins
            .iter()
            .fold(cors, |cors, origin| cors.allowed_origin(origin))
    }
}

/// Registers every route. Shared by `main` and the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| ApiError::Validation(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| ApiError::Validation(err.to_string()).into()),
    )
    .service(index)
    .service(health)
    .service(
        web::scope("/auth")
            .service(auth_handlers::login)
            .service(auth_handlers::refresh),
    )
    .service(
        web::scope("/users")
            .service(user_handlers::list_users)
            .service(user_handlers::create_user)
            .service(user_handlers::get_user)
            .service(user_handlers::update_user)
            .service(user_handlers::delete_user),
    )
    .service(
        web::scope("/jobs")
            .service(job_handlers::list_jobs)
            .service(job_handlers::create_job)
            .service(job_handlers::get_job)
            .service(job_handlers::update_job)
            .service(job_handlers::delete_job),
    );
}
