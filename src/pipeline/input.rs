//! Input staging: decide the format of a user-supplied file and give the
//! extractor a local path it can open.
//!
//! pdfium and the legacy `.doc` converters only work on file-system paths,
//! so in-memory uploads are written into a `TempDir` under their original
//! file name. The directory lives inside [`StagedInput`] and is removed when
//! it is dropped, on every exit path.

use crate::document::SourceFormat;
use crate::error::DocTranslateError;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;

/// A file ready for extraction.
#[derive(Debug)]
pub enum StagedInput {
    /// Input was already a local file.
    Local {
        path: PathBuf,
        file_name: String,
        format: SourceFormat,
    },
    /// Input arrived as bytes and was written to a temp directory.
    /// The `TempDir` is kept alive until extraction completes.
    Staged {
        path: PathBuf,
        file_name: String,
        format: SourceFormat,
        _temp_dir: TempDir,
    },
}

impl StagedInput {
    pub fn path(&self) -> &Path {
        match self {
            StagedInput::Local { path, .. } | StagedInput::Staged { path, .. } => path,
        }
    }

    /// Original file name as given by the user.
    pub fn file_name(&self) -> &str {
        match self {
            StagedInput::Local { file_name, .. } | StagedInput::Staged { file_name, .. } => file_name,
        }
    }

    pub fn format(&self) -> SourceFormat {
        match self {
            StagedInput::Local { format, .. } | StagedInput::Staged { format, .. } => *format,
        }
    }
}

/// Decide the source format from the file name, or reject it.
pub fn sniff_format(file_name: &str) -> Result<SourceFormat, DocTranslateError> {
    SourceFormat::from_file_name(file_name).ok_or_else(|| DocTranslateError::UnsupportedFormat {
        file_name: file_name.to_string(),
    })
}

/// The last path component as a display name.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Validate a local file: known extension, exists, readable.
pub fn resolve_local(path: &Path) -> Result<StagedInput, DocTranslateError> {
    let file_name = display_name(path);
    let format = sniff_format(&file_name)?;

    if !path.exists() {
        return Err(DocTranslateError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    // Check read permission by attempting to open
    match std::fs::File::open(path) {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(DocTranslateError::PermissionDenied {
                path: path.to_path_buf(),
            });
        }
        Err(_) => {
            return Err(DocTranslateError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
    }

    debug!("Resolved local {} input: {}", format, path.display());
    Ok(StagedInput::Local {
        path: path.to_path_buf(),
        file_name,
        format,
    })
}

/// Write an uploaded file to a fresh temp directory.
///
/// `file_name` is the name the user uploaded; only its last component is
/// used on disk.
pub async fn stage_bytes(file_name: &str, bytes: &[u8]) -> Result<StagedInput, DocTranslateError> {
    let file_name = display_name(Path::new(file_name));
    let format = sniff_format(&file_name)?;

    let temp_dir = TempDir::new().map_err(|e| DocTranslateError::Internal(format!("tempdir: {e}")))?;
    let path = temp_dir.path().join(&file_name);
    tokio::fs::write(&path, bytes)
        .await
        .map_err(|e| DocTranslateError::Internal(format!("Failed to write temp file: {e}")))?;

    debug!("Staged {} bytes of {} at {}", bytes.len(), file_name, path.display());
    Ok(StagedInput::Staged {
        path,
        file_name,
        format,
        _temp_dir: temp_dir,
    })
}
