//! Image normalizer - canonicalizes uploaded images for storage
//!
//! Decodes an upload in whatever format it arrived in, resizes it to a fixed
//! output width while maintaining aspect ratio, and re-encodes it as PNG.
//!
//! Uses `spawn_blocking` for CPU-intensive operations to avoid blocking the
//! async runtime.

use crate::error::{AppError, Result};
use bytes::Bytes;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageOutputFormat};
use std::io::Cursor;
use std::sync::Arc;
use tracing::debug;

/// Output width every stored image is normalized to, in pixels
pub const NORMALIZED_WIDTH: u32 = 247;

/// Image normalizer
pub struct ImageNormalizer {
    width: u32,
}

impl ImageNormalizer {
    /// Create a normalizer with the given output width
    pub fn new(width: u32) -> Self {
        Self { width }
    }

    /// Create a normalizer with the canonical output width
    pub fn with_defaults() -> Self {
        Self::new(NORMALIZED_WIDTH)
    }

    /// Normalize the given image bytes (blocking version)
    ///
    /// **Note:** This method performs CPU-intensive operations and should not
    /// be called directly from async code. Use `normalize_async` instead.
    pub fn normalize(&self, raw: &[u8]) -> Result<Bytes> {
        // Decode the image
        let img = image::load_from_memory(raw)
            .map_err(|e| AppError::Decode(format!("Failed to decode image: {e}")))?;

        let (orig_w, orig_h) = img.dimensions();
        debug!(
            original_width = orig_w,
            original_height = orig_h,
            "Normalizing uploaded image"
        );

        // Scale to the fixed output width, preserving aspect ratio.
        // Smaller images are scaled up as well; output width is invariant.
        let (new_w, new_h) = self.calculate_dimensions(orig_w, orig_h);
        let resized = img.resize_exact(new_w, new_h.max(1), FilterType::Triangle);

        let data = encode_png(&resized)?;

        debug!(width = new_w, height = new_h, size = data.len(), "Image normalized");

        Ok(data)
    }

    /// Normalize asynchronously using a blocking thread pool
    ///
    /// Offloads the CPU-intensive decode/resize/encode to a dedicated thread
    /// pool, preventing the async runtime from being blocked.
    pub async fn normalize_async(self: Arc<Self>, raw: Bytes) -> Result<Bytes> {
        let normalizer = self.clone();

        tokio::task::spawn_blocking(move || normalizer.normalize(&raw))
            .await
            .map_err(|e| AppError::Internal(format!("Normalize task panicked: {e}")))?
    }

    /// Calculate output dimensions for the fixed width, preserving aspect ratio
    fn calculate_dimensions(&self, width: u32, height: u32) -> (u32, u32) {
        let ratio = self.width as f32 / width as f32;
        (self.width, ((height as f32) * ratio).round() as u32)
    }
}

/// Encode image as PNG
pub(crate) fn encode_png(img: &DynamicImage) -> Result<Bytes> {
    let mut buf = Vec::new();
    let mut cursor = Cursor::new(&mut buf);

    img.write_to(&mut cursor, ImageOutputFormat::Png)
        .map_err(|e| AppError::Encode(format!("Failed to encode PNG: {e}")))?;

    Ok(Bytes::from(buf))
}
