//! Upload orchestrator: picks a provider from the configured chain and runs
//! one upload against it.
//!
//! The chain is a priority list, not a retry cascade. The first enabled
//! provider that accepts the file is committed to; if its call fails the
//! error is returned as is and the next provider is not tried.

use reqwest::Client;
use tracing::{debug, info, warn};

use crate::error::UploadError;
use crate::prompt::MediaKind;

use super::config::{ProviderConfig, UploadConfig};
use super::progress::{progress_body, ProgressCallback, ProgressTracker};
use super::provider::UploadResult;
use super::validate::{validate_file, UploadFile};

/// Stateless upload service holding only static configuration.
///
/// Concurrent calls on one instance are independent; nothing is queued or
/// shared between them.
#[derive(Debug, Clone)]
pub struct Uploader {
    client: Client,
    config: UploadConfig,
}

impl Uploader {
    /// Create an uploader with a default HTTP client.
    pub fn new(config: UploadConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(concat!("vidprompt/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, config))
    }

    /// Create an uploader around an existing client.
    pub fn with_client(client: Client, config: UploadConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    /// Size and type check against this uploader's limits.
    pub fn validate_file(&self, file: &UploadFile, expected: MediaKind) -> Result<(), UploadError> {
        validate_file(&self.config, file, expected)
    }

    /// Chooses the provider for a file without touching the network.
    ///
    /// An enabled provider with missing credentials yields `NotConfigured`
    /// rather than falling through to the next entry.
    pub fn select_provider(&self, file: &UploadFile) -> Result<&ProviderConfig, UploadError> {
        let kind = file.kind();
        let provider = self
            .config
            .providers
            .iter()
            .find(|p| p.is_enabled() && p.accepts(kind))
            .ok_or(UploadError::NoProviderAvailable)?;
        provider.ensure_configured()?;
        Ok(provider)
    }

    /// Uploads a file to the selected provider.
    ///
    /// `on_progress` receives non-decreasing progress events while the body
    /// is sent and is never called after this returns.
    pub async fn upload_file(
        &self,
        file: &UploadFile,
        on_progress: Option<ProgressCallback>,
    ) -> Result<UploadResult, UploadError> {
        let provider = self.select_provider(file)?;
        debug!(
            provider = %provider.kind(),
            file = %file.name,
            size = file.size(),
            "Selected upload provider"
        );

        let tracker = ProgressTracker::new(on_progress);
        let result = self.send(provider, file, tracker.clone()).await;
        tracker.close();

        match &result {
            Ok(uploaded) => info!(provider = %provider.kind(), url = %uploaded.url, "Upload complete"),
            Err(e) => warn!(provider = %provider.kind(), error = %e, "Upload failed"),
        }
        result
    }

    /// Validates first, then uploads. Validation failures never reach the
    /// network.
    pub async fn validate_and_upload(
        &self,
        file: &UploadFile,
        expected: MediaKind,
        on_progress: Option<ProgressCallback>,
    ) -> Result<UploadResult, UploadError> {
        self.validate_file(file, expected)?;
        self.upload_file(file, on_progress).await
    }

    async fn send(
        &self,
        provider: &ProviderConfig,
        file: &UploadFile,
        tracker: ProgressTracker,
    ) -> Result<UploadResult, UploadError> {
        let kind = provider.kind();
        // `Bytes` clones share the buffer.
        let form = provider.build_form(file, progress_body(file.data.clone(), tracker))?;

        let resp = self
            .client
            .post(provider.request_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadError::network(kind, e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            debug!(provider = %kind, status, body = %message, "Provider returned error status");
            return Err(UploadError::rejected(
                kind,
                format!("Upload failed with status: {}", status),
            ));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| UploadError::network(kind, e.to_string()))?;
        provider.parse_response(&body, file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderKind;
    use crate::upload::config::{FileHostConfig, ImageHostConfig, MediaHostConfig};
    use crate::upload::progress::{UploadProgress, CHUNK_SIZE};
    use mockito::Matcher;
    use std::sync::{Arc, Mutex};

    fn uploader(providers: Vec<ProviderConfig>) -> Uploader {
        Uploader::with_client(
            Client::new(),
            UploadConfig {
                providers,
                ..UploadConfig::default()
            },
        )
    }

    fn image_host(endpoint: &str, api_key: &str) -> ProviderConfig {
        ProviderConfig::ImageHost(ImageHostConfig {
            enabled: true,
            api_key: api_key.to_string(),
            endpoint: endpoint.to_string(),
        })
    }

    fn media_host(endpoint: &str) -> ProviderConfig {
        ProviderConfig::MediaHost(MediaHostConfig {
            enabled: true,
            cloud_name: "demo".to_string(),
            upload_preset: "unsigned".to_string(),
            endpoint: endpoint.to_string(),
        })
    }

    fn file_host(endpoint: &str) -> ProviderConfig {
        ProviderConfig::FileHost(FileHostConfig {
            enabled: true,
            endpoint: endpoint.to_string(),
        })
    }

    fn png(size: usize) -> UploadFile {
        UploadFile::new("still.png", "image/png", vec![b'a'; size])
    }

    #[test]
    fn test_select_image_host_for_images_only() {
        let up = uploader(vec![
            image_host("http://img", "key"),
            file_host("http://file"),
        ]);
        assert_eq!(up.select_provider(&png(4)).unwrap().kind(), ProviderKind::ImageHost);

        let video = UploadFile::new("clip.mp4", "video/mp4", vec![0; 4]);
        assert_eq!(up.select_provider(&video).unwrap().kind(), ProviderKind::FileHost);
    }

    #[test]
    fn test_select_skips_disabled() {
        let mut disabled = media_host("http://media");
        if let ProviderConfig::MediaHost(c) = &mut disabled {
            c.enabled = false;
        }
        let up = uploader(vec![disabled, file_host("http://file")]);
        assert_eq!(up.select_provider(&png(4)).unwrap().kind(), ProviderKind::FileHost);
    }

    #[test]
    fn test_enabled_without_credentials_is_not_configured() {
        let up = uploader(vec![image_host("http://img", ""), file_host("http://file")]);
        assert_eq!(
            up.select_provider(&png(4)).unwrap_err(),
            UploadError::NotConfigured {
                provider: ProviderKind::ImageHost
            }
        );
    }

    #[tokio::test]
    async fn test_no_provider_fails_before_network() {
        let mut server = mockito::Server::new_async().await;
        let mock = server.mock("POST", Matcher::Any).expect(0).create_async().await;

        let mut host = file_host(&server.url());
        if let ProviderConfig::FileHost(c) = &mut host {
            c.enabled = false;
        }
        let up = uploader(vec![host]);

        let err = up.upload_file(&png(10), None).await.unwrap_err();
        assert_eq!(err, UploadError::NoProviderAvailable);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_validation_failure_skips_network() {
        let mut server = mockito::Server::new_async().await;
        let mock = server.mock("POST", Matcher::Any).expect(0).create_async().await;

        let mut up = uploader(vec![file_host(&server.url())]);
        up.config.limits.image_max_size = 4;

        let err = up
            .validate_and_upload(&png(10), MediaKind::Image, None)
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::ValidationFailed(_)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_image_host_upload() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#"name="image""#.to_string()),
                Matcher::Regex(r#"name="key""#.to_string()),
                Matcher::Regex("secret-key".to_string()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success":true,"data":{"url":"https://i.example/a.png","width":1,"height":1,"size":10,"image":{"format":"png"}}}"#)
            .expect(1)
            .create_async()
            .await;

        let up = uploader(vec![image_host(&format!("{}/", server.url()), "secret-key")]);
        let result = up.upload_file(&png(10), None).await.unwrap();

        assert_eq!(result.url, "https://i.example/a.png");
        assert_eq!(result.format.as_deref(), Some("png"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_media_host_upload_path_and_fields() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/demo/upload")
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#"name="file""#.to_string()),
                Matcher::Regex(r#"name="upload_preset""#.to_string()),
                Matcher::Regex(r#"name="cloud_name""#.to_string()),
            ]))
            .with_status(200)
            .with_body(r#"{"secure_url":"https://m.example/v.mp4","public_id":"v1","bytes":4,"format":"mp4"}"#)
            .create_async()
            .await;

        let up = uploader(vec![media_host(&server.url())]);
        let video = UploadFile::new("clip.mp4", "video/mp4", b"mp4!".to_vec());
        let result = up.upload_file(&video, None).await.unwrap();

        assert_eq!(result.public_id.as_deref(), Some("v1"));
        assert_eq!(result.size, Some(4));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_progress_events() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .with_status(200)
            .with_body(r#"{"success":true,"link":"https://f.example/x"}"#)
            .create_async()
            .await;

        let events: Arc<Mutex<Vec<UploadProgress>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let callback: ProgressCallback = Arc::new(move |p: UploadProgress| sink.lock().unwrap().push(p));

        let up = uploader(vec![file_host(&format!("{}/", server.url()))]);
        up.upload_file(&png(CHUNK_SIZE * 2), Some(callback))
            .await
            .unwrap();

        let events = events.lock().unwrap();
        let percentages: Vec<u8> = events.iter().map(|p| p.percentage).collect();
        assert_eq!(percentages, vec![50, 100]);
        assert!(events.iter().all(|p| p.total == (CHUNK_SIZE * 2) as u64));
    }

    #[tokio::test]
    async fn test_error_status_is_rejected_without_cascade() {
        let mut server = mockito::Server::new_async().await;
        let failing = server
            .mock("POST", "/demo/upload")
            .with_status(500)
            .with_body("boom")
            .expect(1)
            .create_async()
            .await;
        let fallback = server.mock("POST", "/").expect(0).create_async().await;

        let up = uploader(vec![
            media_host(&server.url()),
            file_host(&format!("{}/", server.url())),
        ]);
        let err = up.upload_file(&png(10), None).await.unwrap_err();

        assert_eq!(
            err,
            UploadError::rejected(ProviderKind::MediaHost, "Upload failed with status: 500")
        );
        failing.assert_async().await;
        fallback.assert_async().await;
    }

    #[tokio::test]
    async fn test_provider_reported_failure() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .with_status(200)
            .with_body(r#"{"success":false,"error":{"message":"Invalid API v1 key."}}"#)
            .create_async()
            .await;

        let up = uploader(vec![image_host(&format!("{}/", server.url()), "bad")]);
        let err = up.upload_file(&png(10), None).await.unwrap_err();
        assert_eq!(
            err,
            UploadError::rejected(ProviderKind::ImageHost, "Invalid API v1 key.")
        );
    }

    #[tokio::test]
    async fn test_unparseable_response() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let up = uploader(vec![file_host(&format!("{}/", server.url()))]);
        let err = up.upload_file(&png(10), None).await.unwrap_err();
        assert!(matches!(err, UploadError::Parse { provider: ProviderKind::FileHost, .. }));
    }

    #[tokio::test]
    async fn test_network_error() {
        // Nothing listens on port 9 of the loopback interface.
        let up = uploader(vec![file_host("http://127.0.0.1:9/")]);
        let err = up.upload_file(&png(10), None).await.unwrap_err();
        assert!(matches!(err, UploadError::Network { provider: ProviderKind::FileHost, .. }));
    }
}
