//! Upload configuration: size ceilings, allowed MIME types and the ordered
//! provider chain.
//!
//! Loaded from TOML; every key is optional and falls back to the defaults
//! below.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PromptError, PromptResult, ProviderKind};
use crate::prompt::MediaKind;

pub const DEFAULT_IMAGE_HOST_ENDPOINT: &str = "https://api.imgbb.com/1/upload";
pub const DEFAULT_MEDIA_HOST_ENDPOINT: &str = "https://api.cloudinary.com/v1_1";
pub const DEFAULT_FILE_HOST_ENDPOINT: &str = "https://file.io";

const MIB: u64 = 1024 * 1024;

/// Per-kind file size ceilings in bytes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SizeLimits {
    pub image_max_size: u64,
    pub video_max_size: u64,
}

impl Default for SizeLimits {
    fn default() -> Self {
        Self {
            image_max_size: 10 * MIB,
            video_max_size: 100 * MIB,
        }
    }
}

impl SizeLimits {
    pub fn for_kind(&self, kind: MediaKind) -> u64 {
        match kind {
            MediaKind::Image => self.image_max_size,
            MediaKind::Video => self.video_max_size,
        }
    }
}

/// MIME types offered for each kind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AllowedTypes {
    pub images: Vec<String>,
    pub videos: Vec<String>,
}

impl Default for AllowedTypes {
    fn default() -> Self {
        fn owned(items: &[&str]) -> Vec<String> {
            items.iter().map(|s| s.to_string()).collect()
        }
        Self {
            images: owned(&["image/jpeg", "image/jpg", "image/png", "image/gif", "image/webp"]),
            videos: owned(&["video/mp4", "video/webm", "video/ogg", "video/avi", "video/mov"]),
        }
    }
}

// =============================================================================
// PROVIDERS
// =============================================================================

/// Image-only host. Needs an API key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ImageHostConfig {
    pub enabled: bool,
    pub api_key: String,
    pub endpoint: String,
}

impl Default for ImageHostConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: String::new(),
            endpoint: DEFAULT_IMAGE_HOST_ENDPOINT.to_string(),
        }
    }
}

/// Image and video host. Needs a cloud name and an unsigned upload preset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MediaHostConfig {
    pub enabled: bool,
    pub cloud_name: String,
    pub upload_preset: String,
    pub endpoint: String,
}

impl Default for MediaHostConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            cloud_name: String::new(),
            upload_preset: String::new(),
            endpoint: DEFAULT_MEDIA_HOST_ENDPOINT.to_string(),
        }
    }
}

/// Anonymous file host. No credentials.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FileHostConfig {
    pub enabled: bool,
    pub endpoint: String,
}

impl Default for FileHostConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: DEFAULT_FILE_HOST_ENDPOINT.to_string(),
        }
    }
}

/// One entry of the provider chain.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProviderConfig {
    ImageHost(ImageHostConfig),
    MediaHost(MediaHostConfig),
    FileHost(FileHostConfig),
}

impl ProviderConfig {
    pub fn kind(&self) -> ProviderKind {
        match self {
            Self::ImageHost(_) => ProviderKind::ImageHost,
            Self::MediaHost(_) => ProviderKind::MediaHost,
            Self::FileHost(_) => ProviderKind::FileHost,
        }
    }

    pub fn is_enabled(&self) -> bool {
        match self {
            Self::ImageHost(c) => c.enabled,
            Self::MediaHost(c) => c.enabled,
            Self::FileHost(c) => c.enabled,
        }
    }

    /// Whether this provider takes files of the given kind. Files with an
    /// unrecognised MIME type are passed to the general-purpose hosts.
    pub fn accepts(&self, kind: Option<MediaKind>) -> bool {
        match self {
            Self::ImageHost(_) => kind == Some(MediaKind::Image),
            Self::MediaHost(_) | Self::FileHost(_) => true,
        }
    }

    /// Whether the credentials the provider needs are filled in.
    pub fn is_configured(&self) -> bool {
        match self {
            Self::ImageHost(c) => !c.api_key.trim().is_empty(),
            Self::MediaHost(c) => {
                !c.cloud_name.trim().is_empty() && !c.upload_preset.trim().is_empty()
            }
            Self::FileHost(_) => true,
        }
    }
}

// =============================================================================
// UPLOAD CONFIG
// =============================================================================

/// Static configuration handed to the uploader.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UploadConfig {
    pub limits: SizeLimits,
    pub allowed_types: AllowedTypes,
    /// Providers in priority order.
    pub providers: Vec<ProviderConfig>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            limits: SizeLimits::default(),
            allowed_types: AllowedTypes::default(),
            providers: vec![
                ProviderConfig::ImageHost(ImageHostConfig::default()),
                ProviderConfig::MediaHost(MediaHostConfig::default()),
                ProviderConfig::FileHost(FileHostConfig::default()),
            ],
        }
    }
}

impl UploadConfig {
    /// Parses a TOML document.
    pub fn from_toml_str(input: &str) -> PromptResult<Self> {
        toml::from_str(input).map_err(|e| PromptError::config(e.to_string()))
    }

    /// Reads and parses a TOML file.
    pub fn load(path: impl AsRef<Path>) -> PromptResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Returns the first provider entry of a kind.
    pub fn provider(&self, kind: ProviderKind) -> Option<&ProviderConfig> {
        self.providers.iter().find(|p| p.kind() == kind)
    }

    pub fn provider_mut(&mut self, kind: ProviderKind) -> Option<&mut ProviderConfig> {
        self.providers.iter_mut().find(|p| p.kind() == kind)
    }

    /// Enables the image host with an API key, adding it at the front of the
    /// chain if absent.
    pub fn enable_image_host(&mut self, api_key: impl Into<String>) {
        let api_key = api_key.into();
        match self.provider_mut(ProviderKind::ImageHost) {
            Some(ProviderConfig::ImageHost(c)) => {
                c.enabled = true;
                c.api_key = api_key;
            }
            _ => self.providers.insert(
                0,
                ProviderConfig::ImageHost(ImageHostConfig {
                    enabled: true,
                    api_key,
                    ..ImageHostConfig::default()
                }),
            ),
        }
    }

    /// Enables the media host, adding it before the file host if absent.
    pub fn enable_media_host(
        &mut self,
        cloud_name: impl Into<String>,
        upload_preset: impl Into<String>,
    ) {
        let cloud_name = cloud_name.into();
        let upload_preset = upload_preset.into();
        match self.provider_mut(ProviderKind::MediaHost) {
            Some(ProviderConfig::MediaHost(c)) => {
                c.enabled = true;
                c.cloud_name = cloud_name;
                c.upload_preset = upload_preset;
            }
            _ => {
                let at = self
                    .providers
                    .iter()
                    .position(|p| p.kind() == ProviderKind::FileHost)
                    .unwrap_or(self.providers.len());
                self.providers.insert(
                    at,
                    ProviderConfig::MediaHost(MediaHostConfig {
                        enabled: true,
                        cloud_name,
                        upload_preset,
                        ..MediaHostConfig::default()
                    }),
                );
            }
        }
    }

    /// Guesses a MIME type for a file extension from the allowed lists,
    /// e.g. `png` -> `image/png`, `jpg` -> `image/jpeg`.
    pub fn mime_for_extension(&self, ext: &str) -> Option<String> {
        let ext = ext.trim_start_matches('.').to_ascii_lowercase();
        let ext = match ext.as_str() {
            "jpg" => "jpeg",
            other => other,
        };
        self.allowed_types
            .images
            .iter()
            .chain(self.allowed_types.videos.iter())
            .find(|mime| mime.split('/').nth(1) == Some(ext))
            .cloned()
    }
}
