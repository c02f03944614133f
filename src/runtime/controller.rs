use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::{reconcile_upload, DocumentService, UploadResult, UploadSettings};
use crate::app::UploadConfig;
use crate::session::{Session, TurnRole};
use crate::upload::StagedUpload;
use crate::utils::ChatError;

/// Runs chat and upload actions against the document service
///
/// Cheap to clone; the terminal UI hands clones to background tasks.
#[derive(Clone)]
pub struct ChatController {
    service: Arc<dyn DocumentService>,
    settings: UploadSettings,
    staging_dir: Option<PathBuf>,
}

impl ChatController {
    pub fn new(service: Arc<dyn DocumentService>, upload: &UploadConfig) -> Self {
        Self {
            service,
            settings: UploadSettings::from(upload),
            staging_dir: upload.staging_dir.clone(),
        }
    }

    pub fn service(&self) -> &Arc<dyn DocumentService> {
        &self.service
    }

    pub fn upload_settings(&self) -> UploadSettings {
        self.settings
    }

    /// Ask the service one question; does not touch any session
    pub async fn reply(&self, prompt: &str, document_id: Option<&str>) -> Result<String, ChatError> {
        info!(has_document = document_id.is_some(), "requesting chat reply");
        self.service.chat(prompt, document_id).await
    }

    /// Record the prompt, ask, and record the reply on success
    ///
    /// On failure the user turn stays and no assistant turn is added.
    pub async fn ask(&self, session: &mut Session, prompt: &str) -> Result<String, ChatError> {
        session.append_turn(TurnRole::User, prompt);
        let reply = self.reply(prompt, session.active_document()).await?;
        session.append_turn(TurnRole::Assistant, reply.clone());
        Ok(reply)
    }

    /// Stage, upload and reconcile a document
    ///
    /// The staged copy is removed whatever the outcome.
    pub async fn upload_document(&self, path: &Path) -> Result<UploadResult, ChatError> {
        let staged = StagedUpload::stage(path, self.staging_dir.as_deref())?;
        let outcome = self.send_staged(&staged).await;

        match staged.discard() {
            Ok(removed) => info!(path = %removed.display(), "removed staged upload"),
            Err(e) => warn!("Failed to remove staged upload: {}", e),
        }

        match &outcome {
            Ok(result) => info!(
                document_id = %result.document_id,
                already_existed = result.already_existed,
                "upload reconciled"
            ),
            Err(e) => warn!("Upload of {} failed: {}", path.display(), e),
        }

        outcome
    }

    /// Upload and make the document active in `session`
    pub async fn upload_into(
        &self,
        session: &mut Session,
        path: &Path,
    ) -> Result<UploadResult, ChatError> {
        let result = self.upload_document(path).await?;
        session.apply_upload(&result);
        Ok(result)
    }

    async fn send_staged(&self, staged: &StagedUpload) -> Result<UploadResult, ChatError> {
        let response = self.service.upload_document(staged, &self.settings).await?;
        reconcile_upload(&response, self.service.as_ref()).await
    }
}

/// User-facing confirmation for a successful upload
pub fn upload_notice(result: &UploadResult) -> String {
    if result.already_existed {
        format!("Document already exists! Hash Code: {}", result.document_id)
    } else {
        format!(
            "Document processed successfully! Hash Code: {}",
            result.document_id
        )
    }
}
