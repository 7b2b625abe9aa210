mod config;
mod fixed_width;
mod import;
mod services;
mod store;

use crate::config::Config;
use actix_web::{web, App, HttpServer};
use env_logger::Env;
use log::{error, info};
use std::io;

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let config = Config::from_env();

    if let Err(e) = fixed_width::check_layout(fixed_width::DOSSIER_LAYOUT) {
        error!("Invalid dossier layout: {}", e);
        return Err(io::Error::new(io::ErrorKind::InvalidData, e.to_string()));
    }

    // Create the schema once up front so a bad database path fails at startup.
    store::open(&config.database).map_err(|e| {
        error!("Cannot open database {}: {}", config.database.display(), e);
        io::Error::other(e.to_string())
    })?;
    std::fs::create_dir_all(&config.upload_dir)?;

    let host = config.host.clone();
    let port = config.port;
    info!(
        "Server running at http://{}:{} (database {}, uploads in {})",
        host,
        port,
        config.database.display(),
        config.upload_dir.display()
    );

    let config = web::Data::new(config);
    HttpServer::new(move || {
        App::new()
            .app_data(web::JsonConfig::default().limit(1024 * 1024)) // 1 MB
            .app_data(config.clone())
            .service(services::files::configure_routes())
            .service(services::donnees::configure_routes())
            .service(services::enquete::configure_routes())
            .service(services::enqueteurs::configure_routes())
    })
    .bind((host, port))?
    .run()
    .await
}
