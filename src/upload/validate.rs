//! Pre-flight file checks.

use std::path::Path;

use bytes::Bytes;

use crate::error::{PromptResult, UploadError};
use crate::prompt::MediaKind;

use super::config::{SizeLimits, UploadConfig};

/// A file selected for upload, held in memory.
///
/// Cloning is cheap: the contents are a shared `Bytes` buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub mime_type: String,
    pub data: Bytes,
}

impl UploadFile {
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// Reads a file from disk with the given MIME type.
    pub fn read(path: impl AsRef<Path>, mime_type: impl Into<String>) -> PromptResult<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(name, mime_type, data))
    }

    /// Size in bytes.
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// Kind implied by the MIME type, if any.
    pub fn kind(&self) -> Option<MediaKind> {
        MediaKind::from_mime(&self.mime_type)
    }
}

/// Formats a byte ceiling for messages, e.g. `10MB`.
pub fn format_megabytes(bytes: u64) -> String {
    const MIB: u64 = 1024 * 1024;
    if bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else {
        format!("{:.1}MB", bytes as f64 / MIB as f64)
    }
}

/// Checks a byte count against the ceiling for `expected`.
///
/// Usable before a file is read, e.g. with the length from its metadata.
pub fn check_size(limits: &SizeLimits, size: u64, expected: MediaKind) -> Result<(), UploadError> {
    let max = limits.for_kind(expected);
    if size > max {
        return Err(UploadError::validation(format!(
            "File size must be less than {}",
            format_megabytes(max)
        )));
    }
    Ok(())
}

/// Checks a file against the ceiling and MIME prefix for `expected`.
///
/// Size is checked first; the first failure wins.
pub fn validate_file(
    config: &UploadConfig,
    file: &UploadFile,
    expected: MediaKind,
) -> Result<(), UploadError> {
    check_size(&config.limits, file.size(), expected)?;

    if !file.mime_type.starts_with(expected.mime_prefix()) {
        return Err(UploadError::validation(format!(
            "Please select a valid {} file",
            expected.noun()
        )));
    }

    Ok(())
}
