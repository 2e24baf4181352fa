//! Legacy `.doc` conversion: hand the binary Word file to an external tool
//! that writes a `.docx` next to it.
//!
//! Two converters are known:
//!
//! - [`SofficeConverter`] — LibreOffice in headless mode, available on every
//!   platform once installed:
//!   `soffice --headless --convert-to docx <file> --outdir <dir>`
//! - [`TextutilConverter`] — the `textutil` tool that ships with macOS:
//!   `textutil -convert docx <file> -output <dir>/<stem>.docx`
//!
//! [`ConverterKind::Auto`] picks `textutil` on macOS and `soffice` elsewhere.
//! Callers that already run the converter as a service can inject their own
//! [`DocConverter`] through
//! [`crate::config::TranslationConfigBuilder::doc_converter`].

use crate::config::TranslationConfig;
use crate::error::DocTranslateError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use tokio::process::Command;
use tracing::{debug, info};

/// Converts a legacy `.doc` file into `.docx`.
#[async_trait]
pub trait DocConverter: Send + Sync {
    /// Short tool name used in logs and error messages.
    fn name(&self) -> &str;

    /// Convert `path` and write the result into `out_dir`.
    ///
    /// Returns the path of the written `.docx` file.
    async fn convert_to_docx(&self, path: &Path, out_dir: &Path) -> Result<PathBuf, DocTranslateError>;
}

/// Which external converter to use for `.doc` input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConverterKind {
    /// `textutil` on macOS, `soffice` everywhere else. (default)
    #[default]
    Auto,
    Soffice,
    Textutil,
}

impl fmt::Display for ConverterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConverterKind::Auto => f.write_str("auto"),
            ConverterKind::Soffice => f.write_str("soffice"),
            ConverterKind::Textutil => f.write_str("textutil"),
        }
    }
}

impl FromStr for ConverterKind {
    type Err = DocTranslateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(ConverterKind::Auto),
            "soffice" | "libreoffice" => Ok(ConverterKind::Soffice),
            "textutil" => Ok(ConverterKind::Textutil),
            other => Err(DocTranslateError::InvalidConfig(format!(
                "Unknown .doc converter '{}' (expected auto, soffice or textutil)",
                other
            ))),
        }
    }
}

// ── LibreOffice ──────────────────────────────────────────────────────────────

/// Headless LibreOffice.
#[derive(Debug, Clone)]
pub struct SofficeConverter {
    program: PathBuf,
}

impl Default for SofficeConverter {
    fn default() -> Self {
        Self {
            program: PathBuf::from("soffice"),
        }
    }
}

impl SofficeConverter {
    /// Use a specific `soffice` executable instead of the one on `PATH`.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl DocConverter for SofficeConverter {
    fn name(&self) -> &str {
        "soffice"
    }

    async fn convert_to_docx(&self, path: &Path, out_dir: &Path) -> Result<PathBuf, DocTranslateError> {
        let mut cmd = Command::new(&self.program);
        cmd.arg("--headless")
            .arg("--convert-to")
            .arg("docx")
            .arg(path)
            .arg("--outdir")
            .arg(out_dir);
        run_converter(self.name(), cmd, path).await?;
        expect_output(self.name(), path, docx_target(path, out_dir))
    }
}

// ── macOS textutil ───────────────────────────────────────────────────────────

/// The `textutil` tool bundled with macOS.
#[derive(Debug, Clone, Default)]
pub struct TextutilConverter;

#[async_trait]
impl DocConverter for TextutilConverter {
    fn name(&self) -> &str {
        "textutil"
    }

    async fn convert_to_docx(&self, path: &Path, out_dir: &Path) -> Result<PathBuf, DocTranslateError> {
        let target = docx_target(path, out_dir);
        let mut cmd = Command::new("textutil");
        cmd.arg("-convert")
            .arg("docx")
            .arg(path)
            .arg("-output")
            .arg(&target);
        run_converter(self.name(), cmd, path).await?;
        expect_output(self.name(), path, target)
    }
}

// ── Selection ────────────────────────────────────────────────────────────────

/// Pick the converter for a batch.
///
/// An injected `config.doc_converter` wins; otherwise `config.converter`
/// decides, with `Auto` resolved by the target OS.
pub fn resolve_converter(config: &TranslationConfig) -> Arc<dyn DocConverter> {
    if let Some(ref converter) = config.doc_converter {
        return Arc::clone(converter);
    }
    match config.converter {
        ConverterKind::Soffice => Arc::new(SofficeConverter::default()),
        ConverterKind::Textutil => Arc::new(TextutilConverter),
        ConverterKind::Auto if cfg!(target_os = "macos") => Arc::new(TextutilConverter),
        ConverterKind::Auto => Arc::new(SofficeConverter::default()),
    }
}

/// `<out_dir>/<stem>.docx`, the name both tools write.
fn docx_target(path: &Path, out_dir: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    out_dir.join(format!("{stem}.docx"))
}

async fn run_converter(tool: &str, mut cmd: Command, path: &Path) -> Result<(), DocTranslateError> {
    info!("Converting {} to DOCX with {}", path.display(), tool);
    let output = cmd.kill_on_drop(true).output().await.map_err(|e| {
        let detail = if e.kind() == std::io::ErrorKind::NotFound {
            format!("'{tool}' was not found on PATH; install it or choose another --converter")
        } else {
            e.to_string()
        };
        DocTranslateError::LegacyConversionFailed {
            path: path.to_path_buf(),
            converter: tool.to_string(),
            detail,
        }
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(DocTranslateError::LegacyConversionFailed {
            path: path.to_path_buf(),
            converter: tool.to_string(),
            detail: format!("{} ({})", output.status, stderr.trim()),
        });
    }
    debug!("{} finished: {}", tool, String::from_utf8_lossy(&output.stdout).trim());
    Ok(())
}

/// Some converters exit 0 without writing anything for unreadable input.
fn expect_output(tool: &str, path: &Path, target: PathBuf) -> Result<PathBuf, DocTranslateError> {
    if target.is_file() {
        Ok(target)
    } else {
        Err(DocTranslateError::LegacyConversionFailed {
            path: path.to_path_buf(),
            converter: tool.to_string(),
            detail: format!("no output written to {}", target.display()),
        })
    }
}
