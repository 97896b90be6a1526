//! Signed-upload handshake payloads.

use serde::{Deserialize, Serialize};

/// Signed ticket from `GET /uploads/signature`, authorizing one direct
/// upload to the image host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadSignature {
    pub signature: String,
    pub timestamp: i64,
    pub api_key: String,
    pub folder: String,
}

/// Image-host response after a successful upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResult {
    pub secure_url: String,
}
