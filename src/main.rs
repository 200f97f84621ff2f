/// Asset Service - HTTP Server
///
/// Ingests profile images, normalizes them to a fixed-width PNG, and serves
/// them back from object storage under deterministic per-identifier keys.
use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use asset_service::handlers;
use asset_service::services::ImageNormalizer;
use asset_service::storage::{AssetStore, S3AssetStore};
use asset_service::Config;
use std::io;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt::init();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    println!("🖼️ Asset Service starting HTTP server on {}", bind_address);

    // Initialize the storage backend once at startup; every pipeline depends
    // on it, so a failed health check aborts the process.
    let store = S3AssetStore::from_config(&config.s3)
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("{e}")))?;
    store
        .health_check()
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("{e}")))?;

    let store: Arc<dyn AssetStore> = Arc::new(store);
    let store_data = web::Data::from(store);
    let normalizer = web::Data::new(Arc::new(ImageNormalizer::with_defaults()));

    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(config.clone()))
            .app_data(store_data.clone())
            .app_data(normalizer.clone())
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .wrap(Cors::permissive())
            .configure(handlers::configure)
    })
    .bind(&bind_address)?
    .run();

    tracing::info!("HTTP server is running");
    let result = server.await;
    tracing::info!("Asset-service shutting down");
    result
}
