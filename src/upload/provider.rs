//! Wire contracts of the three upload providers.
//!
//! Each provider takes a multipart POST and answers with JSON. This module
//! knows the field names, the request URL and how to read the response;
//! sending is left to the orchestrator.

use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};

use crate::error::{ProviderKind, UploadError};
use crate::prompt::{MediaKind, ReferenceMedia};

use super::config::ProviderConfig;
use super::validate::UploadFile;

/// A successfully hosted file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Size in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl UploadResult {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            public_id: None,
            width: None,
            height: None,
            size: None,
            format: None,
        }
    }

    /// The reference entry a caller appends to the draft after uploading.
    pub fn to_reference(&self, kind: MediaKind, file_name: &str) -> ReferenceMedia {
        ReferenceMedia::new(
            self.url.clone(),
            format!("Uploaded {}: {}", kind.noun(), file_name),
        )
    }
}

// =============================================================================
// RESPONSE SHAPES
// =============================================================================

#[derive(Debug, Deserialize)]
struct ImageHostResponse {
    #[serde(default)]
    success: bool,
    data: Option<ImageHostData>,
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ImageHostData {
    url: String,
    width: Option<u32>,
    height: Option<u32>,
    size: Option<u64>,
    image: Option<ImageHostImage>,
}

#[derive(Debug, Deserialize)]
struct ImageHostImage {
    format: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MediaHostResponse {
    secure_url: Option<String>,
    public_id: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    bytes: Option<u64>,
    format: Option<String>,
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct FileHostResponse {
    #[serde(default)]
    success: bool,
    link: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

const GENERIC_FAILURE: &str = "Upload failed";

fn failure_message(message: Option<String>) -> String {
    message
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| GENERIC_FAILURE.to_string())
}

// =============================================================================
// REQUESTS
// =============================================================================

impl ProviderConfig {
    /// Fails with `NotConfigured` when required credentials are missing.
    pub fn ensure_configured(&self) -> Result<(), UploadError> {
        if self.is_configured() {
            Ok(())
        } else {
            Err(UploadError::NotConfigured {
                provider: self.kind(),
            })
        }
    }

    /// Where the multipart POST goes.
    pub fn request_url(&self) -> String {
        match self {
            Self::ImageHost(c) => c.endpoint.clone(),
            Self::MediaHost(c) => format!(
                "{}/{}/upload",
                c.endpoint.trim_end_matches('/'),
                c.cloud_name
            ),
            Self::FileHost(c) => c.endpoint.clone(),
        }
    }

    /// Name of the multipart field carrying the file bytes.
    pub fn file_field(&self) -> &'static str {
        match self {
            Self::ImageHost(_) => "image",
            Self::MediaHost(_) | Self::FileHost(_) => "file",
        }
    }

    /// Builds the multipart form around an already prepared file body.
    pub fn build_form(&self, file: &UploadFile, body: reqwest::Body) -> Result<Form, UploadError> {
        let part = Part::stream_with_length(body, file.size())
            .file_name(file.name.clone())
            .mime_str(&file.mime_type)
            .map_err(|_| {
                UploadError::validation(format!("Invalid MIME type: {}", file.mime_type))
            })?;

        let form = Form::new().part(self.file_field(), part);
        let form = match self {
            Self::ImageHost(c) => form.text("key", c.api_key.clone()),
            Self::MediaHost(c) => form
                .text("upload_preset", c.upload_preset.clone())
                .text("cloud_name", c.cloud_name.clone()),
            Self::FileHost(_) => form,
        };
        Ok(form)
    }

    /// Reads a success-status response body.
    pub fn parse_response(&self, body: &str, file: &UploadFile) -> Result<UploadResult, UploadError> {
        let kind = self.kind();
        match self {
            Self::ImageHost(_) => {
                let resp: ImageHostResponse = parse_json(kind, body)?;
                match (resp.success, resp.data) {
                    (true, Some(data)) => Ok(UploadResult {
                        url: data.url,
                        public_id: None,
                        width: data.width,
                        height: data.height,
                        size: data.size,
                        format: data.image.and_then(|i| i.format),
                    }),
                    _ => Err(UploadError::rejected(
                        kind,
                        failure_message(resp.error.and_then(|e| e.message)),
                    )),
                }
            }
            Self::MediaHost(_) => {
                let resp: MediaHostResponse = parse_json(kind, body)?;
                if let Some(error) = resp.error {
                    return Err(UploadError::rejected(kind, failure_message(error.message)));
                }
                let url = resp
                    .secure_url
                    .ok_or_else(|| UploadError::parse(kind, "response has no secure_url"))?;
                Ok(UploadResult {
                    url,
                    public_id: resp.public_id,
                    width: resp.width,
                    height: resp.height,
                    size: resp.bytes,
                    format: resp.format,
                })
            }
            Self::FileHost(_) => {
                let resp: FileHostResponse = parse_json(kind, body)?;
                match (resp.success, resp.link) {
                    (true, Some(link)) => Ok(UploadResult {
                        size: Some(file.size()),
                        format: Some(file.mime_type.clone()),
                        ..UploadResult::new(link)
                    }),
                    _ => Err(UploadError::rejected(kind, failure_message(resp.message))),
                }
            }
        }
    }
}

fn parse_json<T: for<'de> Deserialize<'de>>(kind: ProviderKind, body: &str) -> Result<T, UploadError> {
    serde_json::from_str(body).map_err(|e| UploadError::parse(kind, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::config::{FileHostConfig, ImageHostConfig, MediaHostConfig};

    fn png() -> UploadFile {
        UploadFile::new("still.png", "image/png", b"fake-png".to_vec())
    }

    fn media_host() -> ProviderConfig {
        ProviderConfig::MediaHost(MediaHostConfig {
            enabled: true,
            cloud_name: "demo".to_string(),
            upload_preset: "unsigned".to_string(),
            endpoint: "https://media.example/v1_1/".to_string(),
        })
    }

    #[test]
    fn test_request_urls() {
        assert_eq!(media_host().request_url(), "https://media.example/v1_1/demo/upload");
        let image = ProviderConfig::ImageHost(ImageHostConfig::default());
        assert_eq!(image.request_url(), "https://api.imgbb.com/1/upload");
        assert_eq!(image.file_field(), "image");
    }

    #[test]
    fn test_not_configured() {
        let image = ProviderConfig::ImageHost(ImageHostConfig {
            enabled: true,
            ..ImageHostConfig::default()
        });
        assert_eq!(
            image.ensure_configured(),
            Err(UploadError::NotConfigured {
                provider: ProviderKind::ImageHost
            })
        );
        assert!(media_host().ensure_configured().is_ok());
    }

    #[test]
    fn test_parse_image_host_success() {
        let image = ProviderConfig::ImageHost(ImageHostConfig::default());
        let body = r#"{"success":true,"data":{"url":"https://i.example/a.png","width":640,"height":480,"size":2048,"image":{"format":"png"}}}"#;
        let result = image.parse_response(body, &png()).unwrap();
        assert_eq!(result.url, "https://i.example/a.png");
        assert_eq!(result.width, Some(640));
        assert_eq!(result.size, Some(2048));
        assert_eq!(result.format.as_deref(), Some("png"));
        assert_eq!(result.public_id, None);
    }

    #[test]
    fn test_parse_image_host_failure_flag() {
        let image = ProviderConfig::ImageHost(ImageHostConfig::default());
        let err = image
            .parse_response(r#"{"success":false,"error":{"message":"Invalid API key"}}"#, &png())
            .unwrap_err();
        assert_eq!(err, UploadError::rejected(ProviderKind::ImageHost, "Invalid API key"));

        let err = image.parse_response(r#"{"success":false}"#, &png()).unwrap_err();
        assert_eq!(err, UploadError::rejected(ProviderKind::ImageHost, "Upload failed"));
    }

    #[test]
    fn test_parse_media_host() {
        let body = r#"{"secure_url":"https://m.example/v.mp4","public_id":"abc","width":1920,"height":1080,"bytes":999,"format":"mp4"}"#;
        let result = media_host().parse_response(body, &png()).unwrap();
        assert_eq!(result.public_id.as_deref(), Some("abc"));
        assert_eq!(result.size, Some(999));

        let err = media_host().parse_response("{}", &png()).unwrap_err();
        assert!(matches!(err, UploadError::Parse { provider: ProviderKind::MediaHost, .. }));
    }

    #[test]
    fn test_parse_file_host_uses_file_metadata() {
        let host = ProviderConfig::FileHost(FileHostConfig::default());
        let result = host
            .parse_response(r#"{"success":true,"link":"https://f.example/xyz"}"#, &png())
            .unwrap();
        assert_eq!(result.url, "https://f.example/xyz");
        assert_eq!(result.size, Some(8));
        assert_eq!(result.format.as_deref(), Some("image/png"));
    }

    #[test]
    fn test_malformed_body() {
        let host = ProviderConfig::FileHost(FileHostConfig::default());
        let err = host.parse_response("<html>", &png()).unwrap_err();
        assert!(matches!(err, UploadError::Parse { provider: ProviderKind::FileHost, .. }));
    }

    #[test]
    fn test_to_reference() {
        let result = UploadResult::new("https://f.example/xyz");
        let reference = result.to_reference(MediaKind::Video, "clip.mp4");
        assert_eq!(reference.url, "https://f.example/xyz");
        assert_eq!(reference.description, "Uploaded video: clip.mp4");
    }

    #[test]
    fn test_result_json_is_camel_case() {
        let result = UploadResult {
            public_id: Some("abc".to_string()),
            ..UploadResult::new("u")
        };
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"url":"u","publicId":"abc"}"#);
    }
}
