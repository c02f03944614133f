use docchat::api::{HttpDocumentService, UploadResult};
use docchat::app::UploadConfig;
use docchat::cli::OutputFormat;
use docchat::runtime::{ChatController, NonInteractiveRunner};
use docchat::session::{Session, TurnRole};
use docchat::utils::ChatError;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{body_json, body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Fixture {
    server: MockServer,
    controller: ChatController,
    staging: TempDir,
    sources: TempDir,
}

fn controller_at(base_url: &str, staging: &Path) -> ChatController {
    let service = HttpDocumentService::new(base_url, Duration::from_secs(5)).unwrap();
    let upload = UploadConfig {
        staging_dir: Some(staging.to_path_buf()),
        ..UploadConfig::default()
    };
    ChatController::new(Arc::new(service), &upload)
}

/// A local address nothing listens on
fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

impl Fixture {
    async fn start() -> Self {
        let server = MockServer::start().await;
        let staging = TempDir::new().unwrap();
        let sources = TempDir::new().unwrap();

        let controller = controller_at(&server.uri(), staging.path());

        Self {
            server,
            controller,
            staging,
            sources,
        }
    }

    fn document(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.sources.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn staged_files(&self) -> usize {
        std::fs::read_dir(self.staging.path()).unwrap().count()
    }
}

#[tokio::test]
async fn chat_success_records_both_turns() {
    let fx = Fixture::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/"))
        .and(body_json(json!({"message": "What is the total?", "hash_code": null})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "1200 EUR"})))
        .expect(1)
        .mount(&fx.server)
        .await;

    let mut session = Session::new();
    let reply = fx.controller.ask(&mut session, "What is the total?").await.unwrap();

    assert_eq!(reply, "1200 EUR");
    let turns = session.turns();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0].role(), TurnRole::User);
    assert_eq!(turns[0].content(), "What is the total?");
    assert_eq!(turns[1].role(), TurnRole::Assistant);
    assert_eq!(turns[1].content(), "1200 EUR");
}

#[tokio::test]
async fn chat_without_response_field_uses_placeholder() {
    let fx = Fixture::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&fx.server)
        .await;

    let reply = fx.controller.reply("hello", None).await.unwrap();
    assert_eq!(reply, "No response received");
}

#[tokio::test]
async fn chat_failure_keeps_user_turn_only() {
    let fx = Fixture::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"detail": "server down"})))
        .mount(&fx.server)
        .await;

    let mut session = Session::new();
    let err = fx.controller.ask(&mut session, "anyone there?").await.unwrap_err();

    assert!(matches!(err, ChatError::Upstream { status: 500, .. }));
    assert!(err.to_string().contains("server down"));
    assert_eq!(session.turns().len(), 1);
    assert_eq!(session.turns()[0].role(), TurnRole::User);
}

#[tokio::test]
async fn chat_failure_without_detail_is_generic() {
    let fx = Fixture::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&fx.server)
        .await;

    let err = fx.controller.reply("hi", None).await.unwrap_err();
    assert_eq!(err.to_string(), "Unknown error (HTTP 502)");
}

#[tokio::test]
async fn upload_with_file_info_activates_document() {
    let fx = Fixture::start().await;
    Mock::given(method("POST"))
        .and(path("/upload-document/"))
        .and(body_string_contains("name=\"chunk_size\""))
        .and(body_string_contains("name=\"chunk_overlap\""))
        .and(body_string_contains("filename=\"invoice.txt\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "file_info": {"hash_code": "abc123", "existing": true}
        })))
        .expect(1)
        .mount(&fx.server)
        .await;

    let source = fx.document("invoice.txt", "Total: 1200 EUR");
    let mut session = Session::new();
    let result = fx.controller.upload_into(&mut session, &source).await.unwrap();

    assert_eq!(
        result,
        UploadResult {
            document_id: "abc123".to_string(),
            already_existed: true,
        }
    );
    assert_eq!(session.active_document(), Some("abc123"));
    assert_eq!(fx.staged_files(), 0);
    assert!(source.exists());
}

#[tokio::test]
async fn active_document_is_sent_with_chat() {
    let fx = Fixture::start().await;
    Mock::given(method("POST"))
        .and(path("/upload-document/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"hash_code": "doc-7"})))
        .mount(&fx.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/"))
        .and(body_json(json!({"message": "Summarize", "hash_code": "doc-7"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "Short."})))
        .expect(1)
        .mount(&fx.server)
        .await;

    let source = fx.document("notes.md", "# Notes");
    let mut session = Session::new();
    let uploaded = fx.controller.upload_into(&mut session, &source).await.unwrap();
    assert!(!uploaded.already_existed);

    let reply = fx.controller.ask(&mut session, "Summarize").await.unwrap();
    assert_eq!(reply, "Short.");
}

#[tokio::test]
async fn upload_falls_back_to_document_lookup() {
    let fx = Fixture::start().await;
    Mock::given(method("POST"))
        .and(path("/upload-document/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"embedding_id": 42})))
        .mount(&fx.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/documents/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"hash_code": "xyz"})))
        .expect(1)
        .mount(&fx.server)
        .await;

    let source = fx.document("data.csv", "a,b\n1,2\n");
    let result = fx.controller.upload_document(&source).await.unwrap();

    assert_eq!(result.document_id, "xyz");
    assert!(!result.already_existed);
    assert_eq!(fx.staged_files(), 0);
}

#[tokio::test]
async fn upload_without_identifiers_is_rejected() {
    let fx = Fixture::start().await;
    Mock::given(method("POST"))
        .and(path("/upload-document/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .mount(&fx.server)
        .await;

    let source = fx.document("report.pdf", "%PDF-1.4");
    let mut session = Session::new();
    session.set_active_document("previous");

    let err = fx.controller.upload_into(&mut session, &source).await.unwrap_err();

    match err {
        ChatError::MissingIdentifier { response } => assert!(response.contains("status")),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(session.active_document(), Some("previous"));
    assert_eq!(fx.staged_files(), 0);
}

#[tokio::test]
async fn upload_rejected_by_service_reports_detail() {
    let fx = Fixture::start().await;
    Mock::given(method("POST"))
        .and(path("/upload-document/"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({"detail": "file is empty"})),
        )
        .mount(&fx.server)
        .await;

    let source = fx.document("empty.txt", "");
    let err = fx.controller.upload_document(&source).await.unwrap_err();

    assert_eq!(err.status(), Some(422));
    assert!(err.to_string().contains("file is empty"));
    assert_eq!(fx.staged_files(), 0);
}

#[tokio::test]
async fn unsupported_file_type_never_reaches_service() {
    let fx = Fixture::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&fx.server)
        .await;

    let source = fx.document("slides.pptx", "binary");
    let err = fx.controller.upload_document(&source).await.unwrap_err();

    assert!(matches!(err, ChatError::UnsupportedFileType { .. }));
    assert_eq!(fx.staged_files(), 0);
}

#[tokio::test]
async fn missing_source_file_is_an_io_error() {
    let fx = Fixture::start().await;
    let err = fx
        .controller
        .upload_document(Path::new("/definitely/not/here.txt"))
        .await
        .unwrap_err();
    assert!(matches!(err, ChatError::Io(_)));
}

#[tokio::test]
async fn non_interactive_run_uploads_then_asks() {
    let fx = Fixture::start().await;
    Mock::given(method("POST"))
        .and(path("/upload-document/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "file_info": {"hash_code": "h1", "existing": false}
        })))
        .mount(&fx.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/"))
        .and(body_json(json!({"message": "Who signed?", "hash_code": "h1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "Alice"})))
        .mount(&fx.server)
        .await;

    let source = fx.document("contract.txt", "Signed: Alice");
    let mut runner = NonInteractiveRunner::new(fx.controller.clone());
    let result = runner.execute("Who signed?".to_string(), Some(&source)).await;

    assert!(result.errors.is_empty());
    assert_eq!(result.response.as_deref(), Some("Alice"));
    assert_eq!(result.metadata.turns, 2);

    let text = runner.format_result(&result, OutputFormat::Text);
    assert!(text.starts_with("Document processed successfully! Hash Code: h1"));
    assert!(text.ends_with("Alice"));

    let json: serde_json::Value =
        serde_json::from_str(&runner.format_result(&result, OutputFormat::Json)).unwrap();
    assert_eq!(json["document"]["document_id"], "h1");
}

#[tokio::test]
async fn non_interactive_run_skips_question_after_failed_upload() {
    let fx = Fixture::start().await;
    Mock::given(method("POST"))
        .and(path("/upload-document/"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"detail": "disk full"})))
        .mount(&fx.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "x"})))
        .expect(0)
        .mount(&fx.server)
        .await;

    let source = fx.document("a.txt", "a");
    let mut runner = NonInteractiveRunner::new(fx.controller.clone());
    let result = runner.execute("q".to_string(), Some(&source)).await;

    assert!(result.response.is_none());
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("disk full"));
    assert!(runner.session().is_empty());
}

#[tokio::test]
async fn chat_with_non_json_body_is_transport_error() {
    let fx = Fixture::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&fx.server)
        .await;

    let mut session = Session::new();
    let err = fx.controller.ask(&mut session, "hello?").await.unwrap_err();

    assert!(matches!(err, ChatError::Transport(_)));
    assert_eq!(session.turns().len(), 1);
    assert_eq!(session.turns()[0].role(), TurnRole::User);
}

#[tokio::test]
async fn upload_with_non_json_body_keeps_previous_document() {
    let fx = Fixture::start().await;
    Mock::given(method("POST"))
        .and(path("/upload-document/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&fx.server)
        .await;

    let source = fx.document("memo.txt", "memo");
    let mut session = Session::new();
    session.set_active_document("previous");

    let err = fx.controller.upload_into(&mut session, &source).await.unwrap_err();

    assert!(matches!(err, ChatError::Transport(_)));
    assert_eq!(session.active_document(), Some("previous"));
    assert_eq!(fx.staged_files(), 0);
}

#[tokio::test]
async fn unreachable_service_is_transport_error() {
    let staging = TempDir::new().unwrap();
    let sources = TempDir::new().unwrap();
    let controller = controller_at(&closed_port_url(), staging.path());

    let mut session = Session::new();
    session.set_active_document("previous");

    let err = controller.ask(&mut session, "anyone?").await.unwrap_err();
    assert!(matches!(err, ChatError::Transport(_)));
    assert_eq!(session.turns().len(), 1);

    let source = sources.path().join("notes.txt");
    std::fs::write(&source, "notes").unwrap();
    let err = controller.upload_into(&mut session, &source).await.unwrap_err();

    assert!(matches!(err, ChatError::Transport(_)));
    assert_eq!(session.active_document(), Some("previous"));
    assert_eq!(std::fs::read_dir(staging.path()).unwrap().count(), 0);
}
