use tracing::debug;

use super::turn::{ChatTurn, TurnRole};
use crate::api::UploadResult;

/// In-memory state for one user session
///
/// Turns are append-only. The active document is only ever a value
/// produced by upload reconciliation.
#[derive(Debug, Clone, Default)]
pub struct Session {
    turns: Vec<ChatTurn>,
    active_document_id: Option<String>,
}

impl Session {
    /// Start an empty session with no active document
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn to the end of the transcript
    pub fn append_turn(&mut self, role: TurnRole, content: impl Into<String>) {
        self.turns.push(ChatTurn::new(role, content));
    }

    /// Replace the active document
    pub fn set_active_document(&mut self, id: impl Into<String>) {
        let id = id.into();
        debug!(document_id = %id, "active document set");
        self.active_document_id = Some(id);
    }

    /// Fold a reconciled upload into the session
    pub fn apply_upload(&mut self, result: &UploadResult) {
        self.set_active_document(result.document_id.clone());
    }

    pub fn active_document(&self) -> Option<&str> {
        self.active_document_id.as_deref()
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
