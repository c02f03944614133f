use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

use super::filetype::DocumentKind;
use crate::constants::STAGED_FILE_PREFIX;
use crate::utils::ChatError;

/// A transient copy of a document, removed when dropped
pub struct StagedUpload {
    file: NamedTempFile,
    file_name: String,
    kind: DocumentKind,
}

impl StagedUpload {
    /// Copy `source` into the staging directory (the OS temp dir by default)
    pub fn stage(source: &Path, staging_dir: Option<&Path>) -> Result<Self, ChatError> {
        let kind = DocumentKind::from_path(source)?;
        let file_name = source
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string)
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("Not a file path: {}", source.display()),
                )
            })?;

        let dir = staging_dir
            .map(Path::to_path_buf)
            .unwrap_or_else(std::env::temp_dir);
        fs::create_dir_all(&dir)?;

        let mut source_file = File::open(source)?;
        let mut file = tempfile::Builder::new()
            .prefix(STAGED_FILE_PREFIX)
            .suffix(&format!(".{}", kind.extension()))
            .tempfile_in(&dir)?;
        io::copy(&mut source_file, file.as_file_mut())?;

        debug!(source = %source.display(), staged = %file.path().display(), "staged upload");

        Ok(Self {
            file,
            file_name,
            kind,
        })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Original file name, as sent to the service
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn content_type(&self) -> &'static str {
        self.kind.content_type()
    }

    /// Remove the staged copy now, reporting failures that drop would hide
    pub fn discard(self) -> Result<PathBuf, ChatError> {
        let path = self.file.path().to_path_buf();
        self.file.close()?;
        Ok(path)
    }
}
