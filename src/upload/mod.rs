//! Reference media upload.
//!
//! Validates a file, picks one provider from the configured chain and posts
//! the file to it, reporting progress along the way.

pub mod config;
pub mod orchestrator;
pub mod progress;
pub mod provider;
pub mod validate;

pub use config::{ProviderConfig, UploadConfig};
pub use orchestrator::Uploader;
pub use progress::{ProgressCallback, UploadProgress};
pub use provider::UploadResult;
pub use validate::{check_size, validate_file, UploadFile};
