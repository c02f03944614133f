use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, Url};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

use super::traits::{DocumentLookup, DocumentService};
use super::types::{extract_detail, ChatRequest, UploadSettings};
use crate::app::ServerConfig;
use crate::constants::{
    CHAT_ENDPOINT, DOCUMENTS_ENDPOINT, NO_RESPONSE_TEXT, STATUS_CHECK_TIMEOUT_SECS,
    UPLOAD_ENDPOINT,
};
use crate::upload::StagedUpload;
use crate::utils::ChatError;

/// HTTP client for the remote document service
pub struct HttpDocumentService {
    client: Client,
    base_url: Url,
}

impl HttpDocumentService {
    /// Create a client rooted at `base_url`
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ChatError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: parse_base_url(base_url)?,
        })
    }

    pub fn from_config(config: &ServerConfig) -> Result<Self, ChatError> {
        Self::new(
            &config.base_url,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Whether anything answers at the base URL (any HTTP status counts)
    pub async fn is_reachable(&self) -> bool {
        let client = match Client::builder()
            .timeout(Duration::from_secs(STATUS_CHECK_TIMEOUT_SECS))
            .build()
        {
            Ok(client) => client,
            Err(_) => return false,
        };

        client.get(self.base_url.clone()).send().await.is_ok()
    }

    fn endpoint(&self, path: &str) -> Result<Url, ChatError> {
        self.base_url
            .join(path)
            .map_err(|e| ChatError::Config(format!("Invalid endpoint '{}': {}", path, e)))
    }
}

#[async_trait]
impl DocumentLookup for HttpDocumentService {
    async fn lookup_document(&self, id: &str) -> Result<Value, ChatError> {
        let mut url = self.endpoint(DOCUMENTS_ENDPOINT)?;
        url.path_segments_mut()
            .map_err(|_| ChatError::Config(format!("Base URL cannot hold a path: {}", self.base_url)))?
            .pop_if_empty()
            .push(id);

        debug!(%url, "looking up document");
        let response = self.client.get(url).send().await?;
        read_json(response).await
    }
}

#[async_trait]
impl DocumentService for HttpDocumentService {
    async fn chat(&self, message: &str, hash_code: Option<&str>) -> Result<String, ChatError> {
        let url = self.endpoint(CHAT_ENDPOINT)?;
        debug!(%url, has_document = hash_code.is_some(), "sending chat message");

        let response = self
            .client
            .post(url)
            .json(&ChatRequest { message, hash_code })
            .send()
            .await?;
        let body = read_json(response).await?;

        Ok(match body.get("response") {
            Some(Value::String(text)) => text.clone(),
            Some(Value::Null) | None => NO_RESPONSE_TEXT.to_string(),
            Some(other) => other.to_string(),
        })
    }

    async fn upload_document(
        &self,
        upload: &StagedUpload,
        settings: &UploadSettings,
    ) -> Result<Value, ChatError> {
        let url = self.endpoint(UPLOAD_ENDPOINT)?;
        let bytes = tokio::fs::read(upload.path()).await?;
        info!(
            file = upload.file_name(),
            size = bytes.len(),
            content_type = upload.content_type(),
            "uploading document"
        );

        let part = Part::bytes(bytes)
            .file_name(upload.file_name().to_string())
            .mime_str(upload.content_type())?;
        let form = Form::new()
            .part("file", part)
            .text("chunk_size", settings.chunk_size.to_string())
            .text("chunk_overlap", settings.chunk_overlap.to_string());

        let response = self.client.post(url).multipart(form).send().await?;
        read_json(response).await
    }

    fn endpoint_description(&self) -> String {
        self.base_url.to_string()
    }
}

/// Normalize so that relative endpoint joins keep any path prefix
fn parse_base_url(raw: &str) -> Result<Url, ChatError> {
    let mut normalized = raw.trim().to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    Url::parse(&normalized)
        .map_err(|e| ChatError::Config(format!("Invalid base URL '{}': {}", raw, e)))
}

/// Map non-success statuses to `Upstream` and decode the body as JSON
async fn read_json(response: Response) -> Result<Value, ChatError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(ChatError::upstream(status.as_u16(), extract_detail(&body)));
    }

    serde_json::from_str(&body)
        .map_err(|e| ChatError::Transport(format!("Invalid JSON from service: {}", e)))
}
