use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::app::UploadConfig;

/// Body of `POST /chat/`
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
    /// Serialized as `null` when no document is active
    pub hash_code: Option<&'a str>,
}

/// Outcome of one upload, derived from the service response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    pub document_id: String,
    pub already_existed: bool,
}

/// Form fields sent alongside an uploaded file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadSettings {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl From<&UploadConfig> for UploadSettings {
    fn from(config: &UploadConfig) -> Self {
        Self {
            chunk_size: config.chunk_size,
            chunk_overlap: config.chunk_overlap,
        }
    }
}

/// Pull the `detail` field out of an error body
///
/// Structured details (e.g. validation error lists) are rendered as JSON.
pub fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
