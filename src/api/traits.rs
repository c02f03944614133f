use async_trait::async_trait;
use serde_json::Value;

use super::types::UploadSettings;
use crate::upload::StagedUpload;
use crate::utils::ChatError;

/// Secondary lookup used when an upload response carries no hash code
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentLookup: Send + Sync {
    /// Fetch `/documents/{id}` and return the raw response
    async fn lookup_document(&self, id: &str) -> Result<Value, ChatError>;
}

/// The remote document service as seen by this client
#[async_trait]
pub trait DocumentService: DocumentLookup {
    /// Send a chat message, scoped to a document when one is active
    async fn chat(&self, message: &str, hash_code: Option<&str>) -> Result<String, ChatError>;

    /// Upload a staged file and return the raw, unvalidated response
    async fn upload_document(
        &self,
        upload: &StagedUpload,
        settings: &UploadSettings,
    ) -> Result<Value, ChatError>;

    /// Human-readable location of the service
    fn endpoint_description(&self) -> String;
}
