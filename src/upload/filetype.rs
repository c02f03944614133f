use std::fmt;
use std::path::Path;

use crate::utils::ChatError;

/// Document formats the service accepts, keyed by file extension only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    PlainText,
    Pdf,
    Csv,
    Markdown,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 4] = [
        DocumentKind::PlainText,
        DocumentKind::Pdf,
        DocumentKind::Csv,
        DocumentKind::Markdown,
    ];

    /// Match an extension, ignoring case
    pub fn from_extension(extension: &str) -> Option<Self> {
        let extension = extension.to_ascii_lowercase();
        Self::ALL.into_iter().find(|kind| kind.extension() == extension)
    }

    /// Classify a path, rejecting anything outside the allow-list
    pub fn from_path(path: &Path) -> Result<Self, ChatError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();

        Self::from_extension(extension).ok_or_else(|| ChatError::UnsupportedFileType {
            extension: extension.to_string(),
        })
    }

    pub fn extension(&self) -> &'static str {
        match self {
            DocumentKind::PlainText => "txt",
            DocumentKind::Pdf => "pdf",
            DocumentKind::Csv => "csv",
            DocumentKind::Markdown => "md",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            DocumentKind::PlainText => "text/plain",
            DocumentKind::Pdf => "application/pdf",
            DocumentKind::Csv => "text/csv",
            DocumentKind::Markdown => "text/markdown",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Comma-separated list for help text
pub fn accepted_extensions() -> String {
    DocumentKind::ALL
        .iter()
        .map(|kind| kind.extension())
        .collect::<Vec<_>>()
        .join(", ")
}
