use actix_cors::Cors;
use actix_web::{
    http::header,
    middleware::{DefaultHeaders, Logger},
    web, App, HttpServer,
};
use clap::Parser;
use multimedia_backend::{build_pool, config::Config, routes};
use std::path::PathBuf;

// Room for a maximum-length post once multi-byte characters are counted.
const MAX_PAYLOAD_BYTES: usize = 1024 * 1024;

#[derive(Parser, Debug)]
#[command(name = "multimedia_server", author, version, about = "Starts the multimedia posts API server.")]
struct Cli {
    /// Path to the .env configuration file.
    #[arg(long, required = true, value_name = "FILE")]
    env_file: PathBuf,
}

fn build_cors(allowed_origins: &str) -> Cors {
    let cors = if allowed_origins.trim() == "*" {
        Cors::default().allow_any_origin()
    } else {
        allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    };

    cors.allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE"])
        .allowed_headers(vec![header::AUTHORIZATION, header::ACCEPT, header::CONTENT_TYPE])
        .max_age(3600)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let cli = Cli::parse();

    let config = Config::from_env(&cli.env_file)
        .expect("FATAL: Failed to load or parse configuration.");

    env_logger::init_from_env(env_logger::Env::new().default_filter_or(&config.log_level));

    let db_path = config.multimedia_db_path();
    if !db_path.exists() {
        log::error!(
            "Multimedia database not found at '{}'. Run 'setup_cli --env-file <path> db setup' first.",
            db_path.display()
        );
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "multimedia database is missing",
        ));
    }

    let pool = build_pool(&db_path, config.db_pool_max_size)
        .expect("FATAL: Failed to create Rusqlite connection pool.");
    let pool_data = web::Data::new(pool);

    let server_address = format!("{}:{}", config.web.host, config.web.port);
    log::info!(
        "Server starting at http://{} (pool size {})",
        server_address,
        config.db_pool_max_size
    );

    HttpServer::new(move || {
        App::new()
            .wrap(build_cors(&config.allowed_origins))
            .wrap(Logger::default())
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("X-Frame-Options", "DENY"))
                    .add(("X-XSS-Protection", "1; mode=block")),
            )
            .app_data(web::PayloadConfig::new(MAX_PAYLOAD_BYTES))
            .app_data(pool_data.clone())
            .configure(routes::public::config_api)
            .configure(routes::multimedia::config_api)
    })
    .bind(server_address)?
    .run()
    .await
}
