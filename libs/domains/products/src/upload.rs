//! Product image hosting.

use async_trait::async_trait;
use core_config::{env_or_default, env_required, ConfigError, FromEnv};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::time::Duration;
use tracing::instrument;

use crate::error::{ProductError, ProductResult};
use crate::models::ImageUpload;

/// Stores an image and returns its public URL.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageUploader: Send + Sync {
    async fn upload_image(&self, image: ImageUpload) -> ProductResult<String>;
}

/// - `CLOUDINARY_CLOUD_NAME`, `CLOUDINARY_API_KEY`, `CLOUDINARY_API_SECRET` (required)
/// - `CLOUDINARY_FOLDER` (default: products)
#[derive(Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub folder: String,
}

impl std::fmt::Debug for CloudinaryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .field("folder", &self.folder)
            .finish()
    }
}

impl FromEnv for CloudinaryConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            cloud_name: env_required("CLOUDINARY_CLOUD_NAME")?,
            api_key: env_required("CLOUDINARY_API_KEY")?,
            api_secret: env_required("CLOUDINARY_API_SECRET")?,
            folder: env_or_default("CLOUDINARY_FOLDER", "products"),
        })
    }
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: String,
}

pub struct CloudinaryUploader {
    client: reqwest::Client,
    config: CloudinaryConfig,
}

impl CloudinaryUploader {
    pub fn new(config: CloudinaryConfig) -> ProductResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ProductError::Upload(e.to_string()))?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "https://api.cloudinary.com/v1_1/{}/image/upload",
            self.config.cloud_name
        )
    }
}

/// Signature over the signed params (sorted by key) followed by the secret.
pub fn sign_params(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    format!("{:x}", Sha256::digest(format!("{joined}{api_secret}").as_bytes()))
}

#[async_trait]
impl ImageUploader for CloudinaryUploader {
    #[instrument(skip(self, image), fields(file_name = %image.file_name, size = image.bytes.len()))]
    async fn upload_image(&self, image: ImageUpload) -> ProductResult<String> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = sign_params(
            &[("folder", self.config.folder.as_str()), ("timestamp", timestamp.as_str())],
            &self.config.api_secret,
        );

        let file = Part::bytes(image.bytes)
            .file_name(image.file_name)
            .mime_str(&image.content_type)
            .map_err(|e| ProductError::Upload(e.to_string()))?;

        let form = Form::new()
            .part("file", file)
            .text("api_key", self.config.api_key.clone())
            .text("folder", self.config.folder.clone())
            .text("timestamp", timestamp)
            .text("signature", signature)
            .text("signature_algorithm", "sha256");

        let response = self
            .client
            .post(self.endpoint())
            .multipart(form)
            .send()
            .await
            .map_err(|e| ProductError::Upload(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, body = %body, "image upload rejected");
            return Err(ProductError::Upload(format!("image host answered {status}")));
        }

        let uploaded: UploadResponse = response
            .json()
            .await
            .map_err(|e| ProductError::Upload(e.to_string()))?;

        tracing::info!(url = %uploaded.secure_url, "image uploaded");
        Ok(uploaded.secure_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_sorts_params() {
        let a = sign_params(&[("timestamp", "1700000000"), ("folder", "products")], "s3cr3t");
        let b = sign_params(&[("folder", "products"), ("timestamp", "1700000000")], "s3cr3t");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_signature_matches_manual_digest() {
        let expected = format!(
            "{:x}",
            Sha256::digest(b"folder=products&timestamp=1700000000s3cr3t")
        );
        assert_eq!(
            sign_params(&[("timestamp", "1700000000"), ("folder", "products")], "s3cr3t"),
            expected
        );
    }

    #[test]
    fn test_config_from_env() {
        temp_env::with_vars(
            [
                ("CLOUDINARY_CLOUD_NAME", Some("demo")),
                ("CLOUDINARY_API_KEY", Some("key")),
                ("CLOUDINARY_API_SECRET", Some("secret")),
                ("CLOUDINARY_FOLDER", None),
            ],
            || {
                let config = CloudinaryConfig::from_env().unwrap();
                assert_eq!(config.cloud_name, "demo");
                assert_eq!(config.folder, "products");
                assert!(format!("{config:?}").contains("[REDACTED]"));
            },
        );
    }

    #[test]
    fn test_config_requires_secret() {
        temp_env::with_vars(
            [
                ("CLOUDINARY_CLOUD_NAME", Some("demo")),
                ("CLOUDINARY_API_KEY", Some("key")),
                ("CLOUDINARY_API_SECRET", None::<&str>),
            ],
            || assert!(CloudinaryConfig::from_env().is_err()),
        );
    }

    #[test]
    fn test_endpoint_uses_cloud_name() {
        let uploader = CloudinaryUploader::new(CloudinaryConfig {
            cloud_name: "demo".into(),
            api_key: "k".into(),
            api_secret: "s".into(),
            folder: "products".into(),
        })
        .unwrap();
        assert_eq!(
            uploader.endpoint(),
            "https://api.cloudinary.com/v1_1/demo/image/upload"
        );
    }
}
