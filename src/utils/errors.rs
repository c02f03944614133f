use thiserror::Error;

/// Shown when the service rejects a request without saying why
pub const GENERIC_UPSTREAM_DETAIL: &str = "Unknown error";

/// Main error type for docchat
///
/// Every variant is terminal for the action that raised it only; callers
/// surface the message and leave the session untouched.
#[derive(Error, Debug)]
pub enum ChatError {
    /// The service answered with a non-success status
    #[error("{detail} (HTTP {status})")]
    Upstream { status: u16, detail: String },

    /// No document identifier could be derived from an upload response
    #[error("Unexpected response, hash code not found: {response}")]
    MissingIdentifier { response: String },

    /// Connection failures, timeouts and unreadable bodies
    #[error("Network error: {0}")]
    Transport(String),

    #[error("Unsupported file type '{extension}' (accepted: txt, pdf, csv, md)")]
    UnsupportedFileType { extension: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ChatError {
    /// Build an upstream error, falling back to the generic message
    pub fn upstream(status: u16, detail: Option<String>) -> Self {
        let detail = detail
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| GENERIC_UPSTREAM_DETAIL.to_string());
        ChatError::Upstream { status, detail }
    }

    /// The HTTP status, if the service produced one
    pub fn status(&self) -> Option<u16> {
        match self {
            ChatError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        ChatError::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_keeps_detail() {
        let err = ChatError::upstream(500, Some("server down".to_string()));
        assert!(err.to_string().contains("server down"));
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn test_upstream_generic_when_detail_missing() {
        let err = ChatError::upstream(502, None);
        assert!(err.to_string().contains(GENERIC_UPSTREAM_DETAIL));

        let err = ChatError::upstream(502, Some("   ".to_string()));
        assert!(err.to_string().contains(GENERIC_UPSTREAM_DETAIL));
    }

    #[test]
    fn test_missing_identifier_includes_response() {
        let err = ChatError::MissingIdentifier {
            response: r#"{"status":"ok"}"#.to_string(),
        };
        assert!(err.to_string().contains(r#"{"status":"ok"}"#));
        assert_eq!(err.status(), None);
    }
}
