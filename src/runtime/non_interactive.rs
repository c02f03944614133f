use serde::{Deserialize, Serialize};
use std::path::Path;

use super::controller::{upload_notice, ChatController};
use crate::api::{DocumentService, UploadResult};
use crate::cli::OutputFormat;
use crate::session::Session;

/// Result of a non-interactive run
#[derive(Debug, Serialize, Deserialize)]
pub struct NonInteractiveResult {
    /// The prompt that was asked
    pub prompt: String,
    /// The service's answer, if the chat call succeeded
    pub response: Option<String>,
    /// The uploaded document, if one was given and accepted
    pub document: Option<UploadResult>,
    /// Any errors that occurred
    pub errors: Vec<String>,
    /// Metadata about the execution
    pub metadata: ExecutionMetadata,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExecutionMetadata {
    /// Service the run talked to
    pub service: String,
    /// Execution time in milliseconds
    pub duration_ms: u128,
    /// Turns recorded in the session
    pub turns: usize,
}

/// Non-interactive runner for a single upload-and-ask
pub struct NonInteractiveRunner {
    controller: ChatController,
    session: Session,
}

impl NonInteractiveRunner {
    pub fn new(controller: ChatController) -> Self {
        Self {
            controller,
            session: Session::new(),
        }
    }

    /// Upload `document` when given, then ask `prompt`
    ///
    /// A failed upload skips the question so an answer is never given
    /// without the document the caller asked about.
    pub async fn execute(&mut self, prompt: String, document: Option<&Path>) -> NonInteractiveResult {
        let start_time = std::time::Instant::now();
        let mut errors = Vec::new();
        let mut uploaded = None;
        let mut response = None;

        if let Some(path) = document {
            match self.controller.upload_into(&mut self.session, path).await {
                Ok(result) => uploaded = Some(result),
                Err(e) => errors.push(format!("Error uploading document: {}", e)),
            }
        }

        if errors.is_empty() {
            match self.controller.ask(&mut self.session, &prompt).await {
                Ok(reply) => response = Some(reply),
                Err(e) => errors.push(format!("Error: {}", e)),
            }
        }

        NonInteractiveResult {
            prompt,
            response,
            document: uploaded,
            errors,
            metadata: ExecutionMetadata {
                service: self.controller.service().endpoint_description(),
                duration_ms: start_time.elapsed().as_millis(),
                turns: self.session.turns().len(),
            },
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Format the result according to the output format
    pub fn format_result(&self, result: &NonInteractiveResult, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => serde_json::to_string_pretty(result).unwrap_or_else(|e| {
                format!("{{\"error\": \"Failed to serialize result: {}\"}}", e)
            }),
            OutputFormat::Text => {
                let mut output = String::new();

                if let Some(document) = &result.document {
                    output.push_str(&upload_notice(document));
                    output.push_str("\n\n");
                }

                if let Some(response) = &result.response {
                    output.push_str(response);
                }

                if !result.errors.is_empty() {
                    output.push_str("\n--- Errors ---\n");
                    for error in &result.errors {
                        output.push_str(&format!("• {}\n", error));
                    }
                }

                output
            }
            OutputFormat::Markdown => {
                let mut output = String::new();

                if let Some(document) = &result.document {
                    output.push_str("## Document\n\n");
                    output.push_str(&format!(
                        "- Hash code: `{}`\n- Already existed: {}\n\n",
                        document.document_id, document.already_existed
                    ));
                }

                output.push_str("## Question\n\n");
                output.push_str(&result.prompt);
                output.push_str("\n\n");

                if let Some(response) = &result.response {
                    output.push_str("## Response\n\n");
                    output.push_str(response);
                    output.push_str("\n\n");
                }

                if !result.errors.is_empty() {
                    output.push_str("## Errors\n\n");
                    for error in &result.errors {
                        output.push_str(&format!("- {}\n", error));
                    }
                    output.push('\n');
                }

                output.push_str("---\n");
                output.push_str(&format!(
                    "*Service: {} | Duration: {}ms*\n",
                    result.metadata.service, result.metadata.duration_ms
                ));

                output
            }
        }
    }
}
