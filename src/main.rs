use std::{fs, io};

use actix_cors::Cors;
use actix_web::{middleware::Logger, App, HttpServer};
use log::info;
use payment_logger::config::Env;
use payment_logger::endpoints::configure_app;
use payment_logger::endpoints::handlers::configs::{
    admin_guard::AdminCredentials, connection_pool::get_pool_connection, context::GeneralContext,
};
use payment_logger::repos::file::ReceiptStore;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Cargar variables de entorno desde .env
    dotenv::dotenv().ok();

    env_logger::init();

    let config = Env::env_init().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let pool = get_pool_connection(&config.database_url, config.db_pool_size).map_err(io::Error::other)?;

    fs::create_dir_all(&config.media_root)?;
    let context = GeneralContext {
        pool,
        receipts: ReceiptStore::new(config.media_root.clone(), config.media_url.clone()),
    };
    let admin = AdminCredentials::new(&config.admin_user, &config.admin_password);

    let host = config.host;
    let port = config.port;
    info!("Serving payments on {host}:{port}, database {}", config.database_url);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .configure(|config| configure_app(config, context.clone(), admin.clone()))
            .wrap(Logger::default())
            .wrap(cors)
    })
    .bind((host, port))?
    .run()
    .await
}
