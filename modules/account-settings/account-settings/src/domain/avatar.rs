//! Avatar upload pipeline: validate, recompress client-side, upload with a
//! collision-resistant key, resolve the public URL.
//!
//! The profile is never touched here; the container links the returned URL
//! only after the upload is confirmed, so a failed upload can never leave a
//! broken image behind.

use std::io::Cursor;
use std::sync::Arc;

use anyhow::Context;
use rand::distr::{Alphanumeric, SampleString};

use account_settings_sdk::models::AvatarUpload;

use super::error::DomainError;
use super::fields::ProfileFields;
use super::ports::{ObjectStorage, StorageError};
use crate::config::AvatarConfig;

const ALLOWED_CONTENT_TYPES: [&str; 4] =
    ["image/jpeg", "image/png", "image/webp", "image/gif"];

const KEY_TOKEN_LEN: usize = 12;

pub struct AvatarPipeline {
    storage: Arc<dyn ObjectStorage>,
    config: AvatarConfig,
}

impl AvatarPipeline {
    #[must_use]
    pub fn new(storage: Arc<dyn ObjectStorage>, config: AvatarConfig) -> Self {
        Self { storage, config }
    }

    /// Run the full pipeline and return the public URL of the stored image.
    pub async fn process(&self, upload: AvatarUpload) -> Result<String, DomainError> {
        // Local rejections happen before any port call.
        if !ALLOWED_CONTENT_TYPES.contains(&upload.content_type.as_str()) {
            return Err(DomainError::validation(
                ProfileFields::AVATAR,
                "Unsupported image type. Use JPEG, PNG, WebP or GIF",
            ));
        }
        if upload.bytes.len() > self.config.max_upload_bytes {
            let max_mb = self.config.max_upload_bytes / (1024 * 1024);
            return Err(DomainError::validation(
                ProfileFields::AVATAR,
                format!("Image must be smaller than {max_mb}MB"),
            ));
        }

        let key = storage_key(&upload.file_name, &upload.content_type);
        let max_dimension = self.config.max_dimension;
        let quality = self.config.jpeg_quality;

        // Image work is CPU-bound; keep it off the async executor.
        let recompressed =
            tokio::task::spawn_blocking(move || recompress(&upload.bytes, max_dimension, quality))
                .await
                .context("recompression task failed")??;

        tracing::debug!(key = %key, bytes = recompressed.len(), "uploading avatar");

        self.storage
            .put(&self.config.bucket, &key, recompressed, "image/jpeg")
            .await
            .map_err(|e| match e {
                StorageError::AlreadyExists { key } => {
                    // Timestamp + random token makes this effectively unreachable.
                    DomainError::conflict(format!("storage key collision on '{key}'"))
                }
                StorageError::Unavailable(e) => DomainError::Storage(e),
            })?;

        Ok(self.storage.public_url(&self.config.bucket, &key))
    }
}

/// `{unix_millis}-{random token}.{original extension}`.
fn storage_key(file_name: &str, content_type: &str) -> String {
    let token = Alphanumeric.sample_string(&mut rand::rng(), KEY_TOKEN_LEN);
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
        .unwrap_or_else(|| extension_for(content_type).to_owned());
    let millis = chrono::Utc::now().timestamp_millis();
    format!("{millis}-{token}.{ext}")
}

fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/png" => "png",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => "jpg",
    }
}

/// Decode, cap both dimensions, re-encode as JPEG at a fixed quality. The
/// point is shrinking the payload before it crosses the network.
fn recompress(bytes: &[u8], max_dimension: u32, quality: u8) -> Result<Vec<u8>, DomainError> {
    let decoded = image::load_from_memory(bytes).map_err(|e| {
        tracing::warn!(error = %e, "avatar decode failed");
        DomainError::validation(ProfileFields::AVATAR, "File is not a readable image")
    })?;

    let scaled = if decoded.width() > max_dimension || decoded.height() > max_dimension {
        decoded.thumbnail(max_dimension, max_dimension)
    } else {
        decoded
    };

    let mut out = Cursor::new(Vec::new());
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, quality);
    scaled
        .to_rgb8()
        .write_with_encoder(encoder)
        .context("jpeg encoding failed")?;
    Ok(out.into_inner())
}
