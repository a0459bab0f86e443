//! Media preparation for prompt attachments.
//!
//! Loads a still image from disk, normalizes it to three-channel color,
//! downsamples it to fit a bounding box, and re-encodes it as JPEG bytes
//! ready to attach to a model request. Decoding and encoding are CPU-bound
//! and run under `spawn_blocking`.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use std::path::{Path, PathBuf};

use crate::error::MediaError;

/// Still-image extensions accepted for attachments.
const IMAGE_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "gif", "bmp", "webp", "tiff"];

/// Video extensions, recognized only to reject them with a clear error.
const VIDEO_EXTENSIONS: [&str; 4] = ["mp4", "avi", "mov", "mkv"];

/// A prepared media payload ready to send to a multimodal model.
#[derive(Debug, Clone)]
pub struct Attachment {
    /// Base64-encoded payload bytes
    pub data: String,
    /// MIME type (always "image/jpeg" for prepared attachments)
    pub media_type: String,
}

impl Attachment {
    /// Create an attachment from raw bytes and a MIME type.
    pub fn from_bytes(bytes: &[u8], media_type: &str) -> Self {
        Self {
            data: BASE64.encode(bytes),
            media_type: media_type.to_string(),
        }
    }

    /// Return a data URL suitable for OpenAI-style APIs.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }
}

/// Prepare a media file for attachment.
///
/// The image is decoded, converted to RGB, downsampled to fit within
/// `max_dimension` on both axes (aspect ratio preserved), and re-encoded
/// as JPEG. Attachments are built fresh per call, never cached.
pub async fn prepare(path: &Path, max_dimension: u32) -> Result<Attachment, MediaError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    if VIDEO_EXTENSIONS.contains(&extension.as_str()) {
        return Err(MediaError::VideoUnsupported(path.to_path_buf()));
    }
    if !IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        return Err(MediaError::UnsupportedType {
            path: path.to_path_buf(),
            extension,
        });
    }

    let bytes = tokio::fs::read(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            MediaError::NotFound(path.to_path_buf())
        } else {
            MediaError::Processing {
                path: path.to_path_buf(),
                message: format!("cannot read file: {e}"),
            }
        }
    })?;

    let path_owned = path.to_path_buf();
    let jpeg = tokio::task::spawn_blocking(move || {
        downsample_to_jpeg(&bytes, max_dimension, &path_owned)
    })
    .await
    .map_err(|e| MediaError::Processing {
        path: path.to_path_buf(),
        message: format!("task join error: {e}"),
    })??;

    Ok(Attachment::from_bytes(&jpeg, "image/jpeg"))
}

/// Synchronous decode → RGB → downsample → JPEG encode.
fn downsample_to_jpeg(
    bytes: &[u8],
    max_dimension: u32,
    path: &PathBuf,
) -> Result<Vec<u8>, MediaError> {
    let image = image::load_from_memory(bytes).map_err(|e| MediaError::Processing {
        path: path.clone(),
        message: format!("cannot decode image: {e}"),
    })?;

    // thumbnail() preserves aspect ratio and never upscales
    let resized = image.thumbnail(max_dimension, max_dimension);

    // JPEG has no alpha channel; normalize to RGB8 before encoding
    let rgb = DynamicImage::ImageRgb8(resized.to_rgb8());

    let mut buffer = Cursor::new(Vec::new());
    rgb.write_to(&mut buffer, ImageFormat::Jpeg)
        .map_err(|e| MediaError::Processing {
            path: path.clone(),
            message: format!("cannot encode JPEG: {e}"),
        })?;

    Ok(buffer.into_inner())
}
