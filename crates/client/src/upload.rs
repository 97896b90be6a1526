//! Signed direct-to-CDN image upload.
//!
//! The API signs the upload parameters; the file bytes then go straight to
//! the media CDN without passing through the API. The CDN request carries no
//! bearer token.

use reqwest::multipart::{Form, Part};
use tracing::debug;
use tutorhub_protocol::{UploadResult, UploadSignature};

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::ApiClient;

/// Uploads images via a server-issued signature.
///
/// Unlike the stores, upload failures propagate as errors; callers decide
/// how to present them.
pub struct Uploader {
    api: ApiClient,
    upload_url: String,
}

impl Uploader {
    pub fn new(api: ApiClient, config: &ClientConfig) -> Self {
        Self {
            api,
            upload_url: config.upload_url.clone(),
        }
    }

    /// Uploads one image and returns its public URL.
    pub async fn upload_image(&self, bytes: Vec<u8>, filename: &str) -> Result<String> {
        let signature: UploadSignature = self.api.get_json("/uploads/signature").await?;

        let form = Form::new()
            .part("file", Part::bytes(bytes).file_name(filename.to_string()))
            .text("api_key", signature.api_key)
            .text("timestamp", signature.timestamp.to_string())
            .text("signature", signature.signature)
            .text("folder", signature.folder);

        let response = self
            .api
            .raw()
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "upload failed".to_string());
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        let result: UploadResult = response.json().await?;
        debug!(target = "tutorhub.upload", url = %result.secure_url, "image uploaded");
        Ok(result.secure_url)
    }
}
