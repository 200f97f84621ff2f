/// HTTP handlers for asset endpoints
///
/// This module contains handlers for:
/// - Upload: normalize and store profile images under per-identifier keys
/// - Avatar: generate and store placeholder avatars
/// - Retrieval: stream stored assets back with cache directives
pub mod assets;

use actix_web::web;

pub use assets::{fetch_asset, generate_avatar, health, upload_image, upload_image_legacy};

/// Register the service's routes
///
/// The catch-all retrieval route must stay last so the fixed routes win.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(health))
        .route("/upload", web::post().to(upload_image_legacy))
        .route("/upload/{identifier}", web::post().to(upload_image))
        .route("/generateAvatar/{identifier}", web::post().to(generate_avatar))
        .route("/{asset_name}", web::get().to(fetch_asset));
}
