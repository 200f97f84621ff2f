/// Asset handlers - HTTP endpoints for ingestion and retrieval
use actix_multipart::Multipart;
use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse};
use bytes::Bytes;
use futures::StreamExt;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::services::{resolve_content_type, synthesize_avatar, ImageNormalizer};
use crate::storage::{asset_key, AssetStore};

/// Hard cap on uploaded file size, enforced while draining the multipart
/// stream so oversized requests never reach the image pipeline
const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Success body returned by the ingestion endpoints
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "imageUrl", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// One file field pulled out of a multipart payload
struct UploadedFile {
    bytes: Bytes,
    filename: Option<String>,
    content_type: Option<String>,
}

/// Health / welcome endpoint
/// GET /
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "welcome to the asset management area"
    }))
}

/// Upload a profile image for an identifier
/// POST /upload/{identifier}
///
/// Normalizes the upload to the canonical fixed-width PNG and stores it
/// under `{identifier}.png`, overwriting any previous object. The returned
/// address is derivable from the identifier alone.
pub async fn upload_image(
    config: web::Data<Config>,
    store: web::Data<dyn AssetStore>,
    normalizer: web::Data<Arc<ImageNormalizer>>,
    identifier: web::Path<String>,
    payload: Multipart,
) -> Result<HttpResponse> {
    let identifier = identifier.into_inner();

    let file = read_single_file(payload)
        .await?
        .ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;

    let normalized = normalizer
        .get_ref()
        .clone()
        .normalize_async(file.bytes)
        .await?;

    let key = asset_key(&identifier);
    // Content type is the normalized encoding, not the upload's declared type
    store.put(&key, normalized, "image/png").await?;

    let image_url = format!("{}/{}", config.app.public_base_url, key);
    info!(identifier = %identifier, key = %key, "image uploaded");

    Ok(HttpResponse::Ok().json(UploadResponse {
        success: true,
        message: "File uploaded successfully".to_string(),
        image_url: Some(image_url),
    }))
}

/// Legacy upload endpoint, authorized by origin allow-list
/// POST /upload
///
/// Kept distinct from the identifier-keyed shape rather than merged: the
/// object is keyed by the uploaded file's original filename and stored as-is
/// with its declared content type, without normalization.
pub async fn upload_image_legacy(
    req: HttpRequest,
    config: web::Data<Config>,
    store: web::Data<dyn AssetStore>,
    payload: Multipart,
) -> Result<HttpResponse> {
    let origin = req
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if !config.cors.allowed_origins.iter().any(|o| o == origin) {
        return Err(AppError::Forbidden("Unauthorized domain".to_string()));
    }

    let file = read_single_file(payload)
        .await?
        .ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;

    let key = file
        .filename
        .ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;
    let content_type = file
        .content_type
        .unwrap_or_else(|| "application/octet-stream".to_string());

    store.put(&key, file.bytes, &content_type).await?;

    info!(key = %key, "legacy image uploaded");

    Ok(HttpResponse::Ok().json(UploadResponse {
        success: true,
        message: "File uploaded successfully".to_string(),
        image_url: None,
    }))
}

/// Generate and store a placeholder avatar for an identifier
/// POST /generateAvatar/{identifier}
///
/// Shares the keying and storage steps with the upload path; only the byte
/// source differs.
pub async fn generate_avatar(
    config: web::Data<Config>,
    store: web::Data<dyn AssetStore>,
    identifier: web::Path<String>,
) -> Result<HttpResponse> {
    let identifier = identifier.into_inner();

    let avatar = tokio::task::spawn_blocking(synthesize_avatar)
        .await
        .map_err(|e| AppError::Internal(format!("Avatar task panicked: {e}")))??;

    let key = asset_key(&identifier);
    store.put(&key, avatar, "image/png").await?;

    let image_url = format!("{}/{}", config.app.public_base_url, key);
    info!(identifier = %identifier, key = %key, "avatar generated");

    Ok(HttpResponse::Ok().json(UploadResponse {
        success: true,
        message: "Avatar generated and uploaded successfully".to_string(),
        image_url: Some(image_url),
    }))
}

/// Retrieve a stored asset by name
/// GET /{asset_name}
///
/// Content type comes from the requested name's suffix, not from stored
/// metadata. The body is forwarded chunk by chunk as it arrives from the
/// store; the object is never buffered whole.
pub async fn fetch_asset(
    config: web::Data<Config>,
    store: web::Data<dyn AssetStore>,
    asset_name: web::Path<String>,
) -> Result<HttpResponse> {
    let key = asset_name.into_inner();

    if !store.exists(&key).await? {
        return Err(AppError::NotFound);
    }

    // The object can still vanish before the open; the store reports that
    // as NotFound and it maps to the same 404 as a failed exists check.
    let stream = store.open_read_stream(&key).await?;

    Ok(HttpResponse::Ok()
        .content_type(resolve_content_type(&key))
        .insert_header((
            header::CACHE_CONTROL,
            format!("public, max-age={}", config.cache.max_age_secs),
        ))
        .streaming(stream))
}

/// Pull the first file field out of a multipart payload, enforcing the
/// upload size cap while draining. Non-file fields are consumed and ignored.
async fn read_single_file(mut payload: Multipart) -> Result<Option<UploadedFile>> {
    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?;

        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(|s| s.to_string());
        let content_type = field.content_type().map(|m| m.to_string());

        if filename.is_none() {
            // Not a file field; drain it so the stream stays consumable
            while let Some(chunk) = field.next().await {
                chunk.map_err(|e| AppError::Validation(format!("Upload read error: {e}")))?;
            }
            continue;
        }

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk =
                chunk.map_err(|e| AppError::Validation(format!("Upload read error: {e}")))?;
            if data.len() + chunk.len() > MAX_UPLOAD_BYTES {
                return Err(AppError::PayloadTooLarge);
            }
            data.extend_from_slice(&chunk);
        }

        return Ok(Some(UploadedFile {
            bytes: Bytes::from(data),
            filename,
            content_type,
        }));
    }

    Ok(None)
}
