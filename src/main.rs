use actix_web::{middleware::Logger, web, App, HttpServer};
use jobboard::{config::Config, configure, cors, telemetry, AppState};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    telemetry::init();

    let config = Config::from_env().map_err(|err| {
        tracing::error!(error = %err, "invalid configuration");
        std::io::Error::new(std::io::ErrorKind::InvalidInput, err)
    })?;

    let addr = (config.host.clone(), config.port);
    tracing::info!(
        host = %addr.0,
        port = addr.1,
        token_ttl_days = config.token_ttl.num_days(),
        cors_origins = ?config.cors_allowed_origins,
        "listening"
    );

    let state = web::Data::new(AppState::from_config(&config));
    let origins = config.cors_allowed_origins.clone();

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(cors(&origins))
            .wrap(Logger::default())
            .configure(configure)
    })
    .bind(addr)?
    .run()
    .await
}
