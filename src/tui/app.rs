use std::path::PathBuf;

use crate::api::{DocumentService, UploadResult};
use crate::app::UIConfig;
use crate::runtime::{upload_notice, ChatController};
use crate::session::{Session, TurnRole};
use crate::utils::ChatError;

/// Severity of the status bar message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub level: StatusLevel,
    pub text: String,
}

/// The network action currently in flight
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    Chat,
    Upload { file_name: String },
}

/// Results delivered back to the UI loop from background tasks
#[derive(Debug)]
pub enum UiEvent {
    ChatReply(Result<String, ChatError>),
    UploadFinished {
        path: PathBuf,
        result: Result<UploadResult, ChatError>,
    },
}

/// A chat request ready to be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatJob {
    pub prompt: String,
    pub document_id: Option<String>,
}

/// Application state
pub struct App {
    /// The conversation and active document
    pub session: Session,
    /// Shared with background tasks
    pub controller: ChatController,
    /// User input buffer
    pub input: String,
    /// Is the app running?
    pub running: bool,
    /// At most one network action at a time
    pub pending: Option<PendingAction>,
    /// Lines scrolled up from the bottom of the transcript
    pub scroll_offset: u16,
    /// Upper bound for `scroll_offset`, refreshed on every draw
    pub max_scroll: u16,
    pub show_document_panel: bool,
    /// Command help replaces the document panel until Esc
    pub help_visible: bool,
    pub render_markdown: bool,
    /// Status message
    pub status_message: Option<StatusMessage>,
    /// Most recent successful upload, for the document panel
    pub last_upload: Option<UploadResult>,
    /// Service location for the header
    pub service_url: String,
}

impl App {
    /// Create a new app instance
    pub fn new(controller: ChatController, session: Session, ui: &UIConfig) -> Self {
        let service_url = controller.service().endpoint_description();
        Self {
            session,
            controller,
            input: String::new(),
            running: true,
            pending: None,
            scroll_offset: 0,
            max_scroll: 0,
            show_document_panel: ui.show_document_panel,
            help_visible: false,
            render_markdown: ui.render_markdown,
            status_message: None,
            last_upload: None,
            service_url,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Turn the input buffer into a chat job
    ///
    /// The user turn is recorded right away; the reply arrives later as a
    /// `UiEvent::ChatReply`.
    pub fn submit_message(&mut self) -> Option<ChatJob> {
        let prompt = self.input.trim().to_string();
        if prompt.is_empty() {
            return None;
        }
        if self.is_busy() {
            self.set_status(StatusLevel::Warning, "Still waiting for the previous request");
            return None;
        }

        self.clear_input();
        self.session.append_turn(TurnRole::User, prompt.clone());
        self.pending = Some(PendingAction::Chat);
        self.scroll_offset = 0;
        self.set_status(StatusLevel::Info, "Getting response...");

        Some(ChatJob {
            prompt,
            document_id: self.session.active_document().map(str::to_string),
        })
    }

    /// Mark an upload as started; `false` when another action is running
    pub fn begin_upload(&mut self, path: &std::path::Path) -> bool {
        if self.is_busy() {
            self.set_status(StatusLevel::Warning, "Still waiting for the previous request");
            return false;
        }

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        self.pending = Some(PendingAction::Upload {
            file_name: file_name.clone(),
        });
        self.set_status(
            StatusLevel::Info,
            format!("Uploading and processing {}...", file_name),
        );
        true
    }

    /// Fold a background result into the session
    pub fn apply_event(&mut self, event: UiEvent) {
        self.pending = None;

        match event {
            UiEvent::ChatReply(Ok(reply)) => {
                self.session.append_turn(TurnRole::Assistant, reply);
                self.scroll_offset = 0;
                self.clear_status();
            }
            UiEvent::ChatReply(Err(e)) => {
                self.set_status(StatusLevel::Error, format!("Error: {}", e));
            }
            UiEvent::UploadFinished {
                result: Ok(result), ..
            } => {
                self.record_upload(&result);
            }
            UiEvent::UploadFinished {
                path,
                result: Err(e),
            } => {
                self.set_status(
                    StatusLevel::Error,
                    format!("Error uploading {}: {}", path.display(), e),
                );
            }
        }
    }

    /// Make an uploaded document active and announce it
    pub fn record_upload(&mut self, result: &UploadResult) {
        self.session.apply_upload(result);
        let level = if result.already_existed {
            StatusLevel::Info
        } else {
            StatusLevel::Success
        };
        self.set_status(level, upload_notice(result));
        self.last_upload = Some(result.clone());
    }

    /// Discard the session and start over
    pub fn new_session(&mut self) {
        if self.is_busy() {
            self.set_status(StatusLevel::Warning, "Wait for the current request to finish");
            return;
        }
        self.session = Session::new();
        self.last_upload = None;
        self.scroll_offset = 0;
        self.set_status(StatusLevel::Info, "Started a new session");
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    pub fn show_help(&mut self) {
        self.help_visible = true;
        self.show_document_panel = true;
        self.set_status(StatusLevel::Info, "Press Esc to close help");
    }

    pub fn toggle_document_panel(&mut self) {
        self.show_document_panel = !self.show_document_panel;
    }

    pub fn set_status(&mut self, level: StatusLevel, text: impl Into<String>) {
        self.status_message = Some(StatusMessage {
            level,
            text: text.into(),
        });
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Scroll towards older turns
    pub fn scroll_up(&mut self, amount: u16) {
        self.scroll_offset = self.scroll_offset.saturating_add(amount).min(self.max_scroll);
    }

    /// Scroll towards the newest turn
    pub fn scroll_down(&mut self, amount: u16) {
        self.scroll_offset = self.scroll_offset.saturating_sub(amount);
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::HttpDocumentService;
    use crate::app::UploadConfig;
    use std::sync::Arc;
    use std::time::Duration;

    fn test_app() -> App {
        let service =
            HttpDocumentService::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        let controller = ChatController::new(Arc::new(service), &UploadConfig::default());
        App::new(controller, Session::new(), &UIConfig::default())
    }

    #[test]
    fn test_submit_records_user_turn() {
        let mut app = test_app();
        app.input = "  what is this about?  ".to_string();

        let job = app.submit_message().unwrap();
        assert_eq!(job.prompt, "what is this about?");
        assert_eq!(job.document_id, None);
        assert!(app.input.is_empty());
        assert_eq!(app.pending, Some(PendingAction::Chat));
        assert_eq!(app.session.turns().len(), 1);
        assert_eq!(app.session.turns()[0].role(), TurnRole::User);
    }

    #[test]
    fn test_submit_ignores_blank_and_busy() {
        let mut app = test_app();
        app.input = "   ".to_string();
        assert!(app.submit_message().is_none());

        app.input = "first".to_string();
        assert!(app.submit_message().is_some());
        app.input = "second".to_string();
        assert!(app.submit_message().is_none());
        assert_eq!(app.input, "second");
        assert_eq!(app.session.turns().len(), 1);
    }

    #[test]
    fn test_chat_reply_appends_assistant_turn() {
        let mut app = test_app();
        app.input = "hello".to_string();
        app.submit_message();
        app.apply_event(UiEvent::ChatReply(Ok("hi".to_string())));

        let turns = app.session.turns();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[1].role(), TurnRole::Assistant);
        assert_eq!(turns[1].content(), "hi");
        assert!(!app.is_busy());
    }

    #[test]
    fn test_chat_error_goes_to_status_not_transcript() {
        let mut app = test_app();
        app.input = "hello".to_string();
        app.submit_message();
        app.apply_event(UiEvent::ChatReply(Err(ChatError::upstream(
            500,
            Some("server down".to_string()),
        ))));

        assert_eq!(app.session.turns().len(), 1);
        let status = app.status_message.clone().unwrap();
        assert_eq!(status.level, StatusLevel::Error);
        assert!(status.text.contains("server down"));
        assert!(!app.is_busy());
    }

    #[test]
    fn test_upload_result_activates_document() {
        let mut app = test_app();
        assert!(app.begin_upload(std::path::Path::new("/tmp/report.pdf")));
        assert_eq!(
            app.pending,
            Some(PendingAction::Upload {
                file_name: "report.pdf".to_string()
            })
        );

        app.apply_event(UiEvent::UploadFinished {
            path: PathBuf::from("/tmp/report.pdf"),
            result: Ok(UploadResult {
                document_id: "abc123".to_string(),
                already_existed: true,
            }),
        });

        assert_eq!(app.session.active_document(), Some("abc123"));
        assert!(app
            .status_message
            .as_ref()
            .unwrap()
            .text
            .contains("already exists"));

        app.input = "next".to_string();
        assert_eq!(app.submit_message().unwrap().document_id.as_deref(), Some("abc123"));
    }

    #[test]
    fn test_failed_upload_keeps_previous_document() {
        let mut app = test_app();
        app.record_upload(&UploadResult {
            document_id: "old".to_string(),
            already_existed: false,
        });

        app.begin_upload(std::path::Path::new("new.txt"));
        app.apply_event(UiEvent::UploadFinished {
            path: PathBuf::from("new.txt"),
            result: Err(ChatError::MissingIdentifier {
                response: "{}".to_string(),
            }),
        });

        assert_eq!(app.session.active_document(), Some("old"));
        assert_eq!(app.status_message.unwrap().level, StatusLevel::Error);
    }

    #[test]
    fn test_new_session_resets_state() {
        let mut app = test_app();
        app.record_upload(&UploadResult {
            document_id: "doc".to_string(),
            already_existed: false,
        });
        app.input = "q".to_string();
        app.submit_message();

        // Blocked while a request is in flight
        app.new_session();
        assert_eq!(app.session.turns().len(), 1);

        app.apply_event(UiEvent::ChatReply(Ok("a".to_string())));
        app.new_session();
        assert!(app.session.is_empty());
        assert_eq!(app.session.active_document(), None);
        assert!(app.last_upload.is_none());
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut app = test_app();
        app.max_scroll = 5;
        app.scroll_up(3);
        app.scroll_up(3);
        assert_eq!(app.scroll_offset, 5);
        app.scroll_down(10);
        assert_eq!(app.scroll_offset, 0);
    }
}
