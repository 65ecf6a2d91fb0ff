//! Error types for the prompt builder and the upload orchestrator.

use std::fmt;

use thiserror::Error;

/// Result type alias for draft, rendering and configuration operations.
pub type PromptResult<T> = Result<T, PromptError>;

/// Errors raised by the form store, the renderers and config loading.
///
/// Building a document never fails; these only surface from index-based
/// mutations, serialization and reading files.
#[derive(Error, Debug)]
pub enum PromptError {
    /// Index out of bounds for list operations.
    #[error("Index {index} out of bounds for list of length {length}")]
    IndexOutOfBounds { index: usize, length: usize },

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration could not be parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem error while reading or writing a document or config.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PromptError {
    /// Creates an IndexOutOfBounds error.
    pub fn index_out_of_bounds(index: usize, length: usize) -> Self {
        Self::IndexOutOfBounds { index, length }
    }

    /// Creates a Serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Creates a Config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<serde_json::Error> for PromptError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for PromptError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Remote upload services, in their default priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// Image-only host (ImgBB wire contract).
    ImageHost,
    /// General media host for images and videos (Cloudinary wire contract).
    MediaHost,
    /// Anonymous file host used as the last resort (file.io wire contract).
    FileHost,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ImageHost => "ImgBB",
            Self::MediaHost => "Cloudinary",
            Self::FileHost => "file.io",
        };
        f.write_str(name)
    }
}

/// Terminal outcome of a failed validation or upload call.
///
/// None of these are retried automatically; the caller re-invokes the
/// operation to retry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    /// The selected provider is enabled but lacks credentials.
    #[error("{provider} not configured. Please set up its credentials.")]
    NotConfigured { provider: ProviderKind },

    /// File failed the size or type check. Raised before any network call.
    #[error("{0}")]
    ValidationFailed(String),

    /// Transport-level failure.
    #[error("Network error during upload to {provider}: {message}")]
    Network {
        provider: ProviderKind,
        message: String,
    },

    /// Non-success HTTP status or a provider-reported failure.
    #[error("{provider} rejected the upload: {message}")]
    ProviderRejected {
        provider: ProviderKind,
        message: String,
    },

    /// The provider answered with a body we could not understand.
    #[error("Failed to parse {provider} upload response: {message}")]
    Parse {
        provider: ProviderKind,
        message: String,
    },

    /// The provider chain has no enabled provider for this file.
    #[error("No upload services configured. Please set up at least one upload service.")]
    NoProviderAvailable,
}

impl UploadError {
    /// Creates a ValidationFailed error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationFailed(msg.into())
    }

    /// Creates a Network error.
    pub fn network(provider: ProviderKind, msg: impl Into<String>) -> Self {
        Self::Network {
            provider,
            message: msg.into(),
        }
    }

    /// Creates a ProviderRejected error.
    pub fn rejected(provider: ProviderKind, msg: impl Into<String>) -> Self {
        Self::ProviderRejected {
            provider,
            message: msg.into(),
        }
    }

    /// Creates a Parse error.
    pub fn parse(provider: ProviderKind, msg: impl Into<String>) -> Self {
        Self::Parse {
            provider,
            message: msg.into(),
        }
    }

    /// Returns true for errors raised before any network activity.
    pub fn is_pre_flight(&self) -> bool {
        matches!(
            self,
            Self::ValidationFailed(_) | Self::NoProviderAvailable | Self::NotConfigured { .. }
        )
    }
}
