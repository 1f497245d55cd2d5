//! Text sources for receipt images
//!
//! A [`TextSource`] turns an image into recognized text lines. Pixel work
//! happens elsewhere: either an external OCR program or a transcript that
//! was produced ahead of time.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

use crate::config::settings::IMAGE_PLACEHOLDER;

/// Handle to a photographed receipt on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptImage {
    path: PathBuf,
}

impl ReceiptImage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lower-cased file extension, `jpg` when the file has none
    pub fn extension(&self) -> String {
        self.path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .unwrap_or_else(|| "jpg".to_string())
    }
}

/// Lines of text in top-to-bottom reading order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecognizedLines(Vec<String>);

impl RecognizedLines {
    pub fn new(lines: Vec<String>) -> Self {
        Self(lines)
    }

    /// Split a block of recognized text into lines
    pub fn from_text(text: &str) -> Self {
        Self(text.lines().map(str::to_string).collect())
    }

    pub fn lines(&self) -> &[String] {
        &self.0
    }

    pub fn into_lines(self) -> Vec<String> {
        self.0
    }
}

/// Why an image could not be read
#[derive(Debug, Error)]
pub enum RecognitionError {
    #[error("image not found: {}", .0.display())]
    ImageUnavailable(PathBuf),

    #[error("no OCR command configured")]
    NoCommand,

    #[error("failed to run {program}: {message}")]
    Spawn { program: String, message: String },

    #[error("{program} exited with {status}: {stderr}")]
    CommandFailed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("could not read transcript {}: {message}", .path.display())]
    Transcript { path: PathBuf, message: String },
}

/// Something that can read the text printed on a receipt image
#[async_trait]
pub trait TextSource: Send + Sync {
    async fn recognize(&self, image: &ReceiptImage) -> Result<RecognizedLines, RecognitionError>;
}

async fn ensure_image_exists(image: &ReceiptImage) -> Result<(), RecognitionError> {
    match tokio::fs::metadata(image.path()).await {
        Ok(meta) if meta.is_file() => Ok(()),
        _ => Err(RecognitionError::ImageUnavailable(image.path().to_path_buf())),
    }
}

/// Runs an external OCR program and reads its standard output
///
/// Arguments equal to `{image}` are replaced by the image path; if none
/// is present the path is appended as the last argument.
#[derive(Debug, Clone)]
pub struct CommandTextSource {
    program: String,
    args: Vec<String>,
}

impl CommandTextSource {
    /// Build from a command line such as `["tesseract", "{image}", "stdout"]`
    pub fn new(command: &[String]) -> Result<Self, RecognitionError> {
        let (program, args) = command.split_first().ok_or(RecognitionError::NoCommand)?;
        if program.trim().is_empty() {
            return Err(RecognitionError::NoCommand);
        }
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    fn arguments_for(&self, image: &ReceiptImage) -> Vec<String> {
        let path = image.path().display().to_string();
        let mut args: Vec<String> = self
            .args
            .iter()
            .map(|arg| arg.replace(IMAGE_PLACEHOLDER, &path))
            .collect();
        if !self.args.iter().any(|arg| arg.contains(IMAGE_PLACEHOLDER)) {
            args.push(path);
        }
        args
    }
}

#[async_trait]
impl TextSource for CommandTextSource {
    async fn recognize(&self, image: &ReceiptImage) -> Result<RecognizedLines, RecognitionError> {
        ensure_image_exists(image).await?;

        let args = self.arguments_for(image);
        debug!(program = %self.program, ?args, "running OCR command");

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .await
            .map_err(|e| RecognitionError::Spawn {
                program: self.program.clone(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(RecognitionError::CommandFailed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(RecognizedLines::from_text(&String::from_utf8_lossy(
            &output.stdout,
        )))
    }
}

/// Reads an already recognized transcript
///
/// Uses the explicit transcript path when given, otherwise a `.txt`
/// sidecar next to the image (`receipt.jpg` -> `receipt.txt`).
#[derive(Debug, Clone, Default)]
pub struct TranscriptTextSource {
    transcript: Option<PathBuf>,
}

impl TranscriptTextSource {
    /// Look for a sidecar transcript next to each image
    pub fn sidecar() -> Self {
        Self { transcript: None }
    }

    /// Always read the given transcript file
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            transcript: Some(path.into()),
        }
    }

    fn transcript_for(&self, image: &ReceiptImage) -> PathBuf {
        self.transcript
            .clone()
            .unwrap_or_else(|| image.path().with_extension("txt"))
    }
}

#[async_trait]
impl TextSource for TranscriptTextSource {
    async fn recognize(&self, image: &ReceiptImage) -> Result<RecognizedLines, RecognitionError> {
        let path = self.transcript_for(image);
        debug!(transcript = %path.display(), "reading receipt transcript");

        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| RecognitionError::Transcript {
                path: path.clone(),
                message: e.to_string(),
            })?;

        Ok(RecognizedLines::from_text(&text))
    }
}
