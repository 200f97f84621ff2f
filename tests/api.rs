//! End-to-end handler tests over the in-memory asset store
//!
//! Drives the real routing table with `actix_web::test`, swapping only the
//! storage backend for `MemoryAssetStore`.

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use bytes::Bytes;
use image::{DynamicImage, GenericImageView, ImageBuffer, ImageOutputFormat, Rgb};
use serde_json::Value;
use std::io::Cursor;
use std::sync::Arc;

use asset_service::config::{AppConfig, CachePolicyConfig, Config, CorsConfig, S3Config};
use asset_service::handlers;
use asset_service::services::ImageNormalizer;
use asset_service::storage::{AssetStore, MemoryAssetStore};

const PUBLIC_BASE_URL: &str = "http://localhost:5000";
const ALLOWED_ORIGIN: &str = "http://localhost:3000";

fn test_config() -> Config {
    Config {
        app: AppConfig {
            host: "127.0.0.1".to_string(),
            port: 5000,
            env: "test".to_string(),
            public_base_url: PUBLIC_BASE_URL.to_string(),
        },
        cors: CorsConfig {
            allowed_origins: vec![ALLOWED_ORIGIN.to_string()],
        },
        cache: CachePolicyConfig { max_age_secs: 5 },
        s3: S3Config {
            bucket: "unused".to_string(),
            region: "us-east-1".to_string(),
            access_key_id: None,
            secret_access_key: None,
            endpoint: None,
        },
    }
}

macro_rules! test_app {
    ($store:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(test_config()))
                .app_data(web::Data::from($store.clone() as Arc<dyn AssetStore>))
                .app_data(web::Data::new(Arc::new(ImageNormalizer::with_defaults())))
                .configure(handlers::configure),
        )
        .await
    };
}

fn sample_image(width: u32, height: u32, color: [u8; 3], format: ImageOutputFormat) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(ImageBuffer::from_fn(width, height, |_, _| Rgb(color)));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), format).unwrap();
    buf
}

/// Build a multipart/form-data body with a single file field
fn multipart_file(filename: &str, content_type: &str, bytes: &[u8]) -> (String, Vec<u8>) {
    let boundary = "-------------------------test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"profileImage\"; \
             filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={boundary}"), body)
}

/// Build a multipart body containing only a non-file text field
fn multipart_text_field(name: &str, value: &str) -> (String, Vec<u8>) {
    let boundary = "-------------------------test-boundary";
    let body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n--{boundary}--\r\n"
    )
    .into_bytes();
    (format!("multipart/form-data; boundary={boundary}"), body)
}

#[actix_web::test]
async fn test_welcome() {
    let store = Arc::new(MemoryAssetStore::new());
    let app = test_app!(store);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["message"].as_str().unwrap().starts_with("welcome"));
}

#[actix_web::test]
async fn test_upload_then_fetch_round_trip() {
    let store = Arc::new(MemoryAssetStore::new());
    let app = test_app!(store);

    let jpeg = sample_image(1000, 1000, [200, 50, 50], ImageOutputFormat::Jpeg(90));
    let (content_type, body) = multipart_file("photo.jpg", "image/jpeg", &jpeg);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/upload/alice")
            .insert_header(("content-type", content_type))
            .set_payload(body)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], Value::Bool(true));
    let image_url = body["imageUrl"].as_str().unwrap();
    assert!(image_url.ends_with("alice.png"));
    assert!(image_url.starts_with(PUBLIC_BASE_URL));

    // The address returned by upload round-trips with retrieval
    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/alice.png").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("content-type").unwrap(),
        "image/png"
    );
    assert_eq!(
        resp.headers().get("cache-control").unwrap(),
        "public, max-age=5"
    );

    let bytes = test::read_body(resp).await;
    let decoded = image::load_from_memory(&bytes).unwrap();
    assert_eq!(image::guess_format(&bytes).unwrap(), image::ImageFormat::Png);
    assert_eq!(decoded.width(), 247);
    assert_eq!(decoded.height(), 247);
}

#[actix_web::test]
async fn test_upload_without_file_field_is_rejected() {
    let store = Arc::new(MemoryAssetStore::new());
    let app = test_app!(store);

    let (content_type, body) = multipart_text_field("note", "no file here");
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/upload/alice")
            .insert_header(("content-type", content_type))
            .set_payload(body)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "No file uploaded");
    assert!(store.is_empty());
}

#[actix_web::test]
async fn test_upload_oversized_file_is_rejected() {
    let store = Arc::new(MemoryAssetStore::new());
    let app = test_app!(store);

    let oversized = vec![0u8; 5 * 1024 * 1024 + 1];
    let (content_type, body) = multipart_file("big.jpg", "image/jpeg", &oversized);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/upload/alice")
            .insert_header(("content-type", content_type))
            .set_payload(body)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(store.is_empty());
}

#[actix_web::test]
async fn test_upload_unrecognizable_image_is_server_error() {
    let store = Arc::new(MemoryAssetStore::new());
    let app = test_app!(store);

    let (content_type, body) = multipart_file("photo.jpg", "image/jpeg", b"not an image at all");
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/upload/alice")
            .insert_header(("content-type", content_type))
            .set_payload(body)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Internal Server Error");
}

#[actix_web::test]
async fn test_upload_twice_last_write_wins() {
    let store = Arc::new(MemoryAssetStore::new());
    let app = test_app!(store);

    for color in [[255u8, 0, 0], [0u8, 0, 255]] {
        let png = sample_image(500, 500, color, ImageOutputFormat::Png);
        let (content_type, body) = multipart_file("pic.png", "image/png", &png);
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/upload/alice")
                .insert_header(("content-type", content_type))
                .set_payload(body)
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    // Exactly one live object, holding the second upload's pixels
    assert_eq!(store.len(), 1);
    let stored = store.bytes_of("alice.png").unwrap();
    let decoded = image::load_from_memory(&stored).unwrap().to_rgb8();
    let pixel = decoded.get_pixel(100, 100);
    assert!(pixel[2] > pixel[0], "expected the blue upload to win: {pixel:?}");
}

#[actix_web::test]
async fn test_generate_avatar_then_fetch() {
    let store = Arc::new(MemoryAssetStore::new());
    let app = test_app!(store);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/generateAvatar/bob")
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], Value::Bool(true));
    assert!(body["imageUrl"].as_str().unwrap().ends_with("bob.png"));

    let resp = test::call_service(&app, test::TestRequest::get().uri("/bob.png").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get("content-type").unwrap(), "image/png");

    let bytes = test::read_body(resp).await;
    let decoded = image::load_from_memory(&bytes).unwrap();
    assert_eq!(decoded.dimensions(), (420, 420));
}

#[actix_web::test]
async fn test_fetch_missing_asset_returns_404() {
    let store = Arc::new(MemoryAssetStore::new());
    let app = test_app!(store);

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/nonexistent.png").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Image not found");
}

#[actix_web::test]
async fn test_fetch_content_type_follows_requested_suffix() {
    let store = Arc::new(MemoryAssetStore::new());

    // Stored bytes and metadata say PNG; the requested name says JPEG and wins
    store
        .put("pic.jpeg", Bytes::from_static(b"\x89PNG\r\n\x1a\n"), "image/png")
        .await
        .unwrap();

    let app = test_app!(store);
    let resp = test::call_service(&app, test::TestRequest::get().uri("/pic.jpeg").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get("content-type").unwrap(), "image/jpeg");
}

#[actix_web::test]
async fn test_legacy_upload_requires_allowed_origin() {
    let store = Arc::new(MemoryAssetStore::new());
    let app = test_app!(store);

    let png = sample_image(10, 10, [1, 2, 3], ImageOutputFormat::Png);
    let (content_type, body) = multipart_file("raw.png", "image/png", &png);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/upload")
            .insert_header(("content-type", content_type))
            .insert_header(("origin", "https://evil.example"))
            .set_payload(body)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Forbidden: Unauthorized domain");
    assert!(store.is_empty());
}

#[actix_web::test]
async fn test_legacy_upload_stores_raw_bytes_under_filename() {
    let store = Arc::new(MemoryAssetStore::new());
    let app = test_app!(store);

    let png = sample_image(64, 32, [9, 9, 9], ImageOutputFormat::Png);
    let (content_type, body) = multipart_file("original.png", "image/png", &png);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/upload")
            .insert_header(("content-type", content_type))
            .insert_header(("origin", ALLOWED_ORIGIN))
            .set_payload(body)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp_body: Value = test::read_body_json(resp).await;
    assert_eq!(resp_body["success"], Value::Bool(true));
    // Legacy shape carries no imageUrl
    assert!(resp_body.get("imageUrl").is_none());

    // Stored verbatim: no normalization, declared content type kept
    let stored = store.bytes_of("original.png").unwrap();
    assert_eq!(&stored[..], &png[..]);
    assert_eq!(store.content_type_of("original.png").unwrap(), "image/png");
    let decoded = image::load_from_memory(&stored).unwrap();
    assert_eq!(decoded.dimensions(), (64, 32));
}
