//! Inference service HTTP client.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use bytes::Bytes;
use liveportrait_models::{Credential, MediaPayload};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::error::{InferenceError, InferenceResult};
use crate::types::AnimateRequest;

/// Hosted LivePortrait model endpoint.
pub const DEFAULT_INFERENCE_URL: &str =
    "https://api-inference.huggingface.co/models/KwaiVGI/LivePortrait";

/// Configuration for the inference client.
#[derive(Debug, Clone)]
pub struct InferenceClientConfig {
    /// Full URL of the model endpoint
    pub endpoint: String,
    /// Request timeout; `None` inherits the transport default
    pub timeout: Option<Duration>,
}

impl Default for InferenceClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_INFERENCE_URL.to_string(),
            timeout: None,
        }
    }
}

impl InferenceClientConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            endpoint: std::env::var("INFERENCE_URL")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_INFERENCE_URL.to_string()),
            timeout: std::env::var("INFERENCE_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs),
        }
    }

    /// Point the client at a different endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

/// Anything that can turn a portrait and a driving video into a video.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Run one animation. Exactly one upstream attempt is made.
    async fn animate(&self, request: AnimateRequest, credential: &Credential) -> InferenceResult<Bytes>;

    /// Endpoint description for readiness reporting.
    fn endpoint(&self) -> &str;
}

/// HTTP client for the hosted inference model.
pub struct InferenceClient {
    http: Client,
    config: InferenceClientConfig,
}

impl InferenceClient {
    /// Create a new inference client.
    pub fn new(config: InferenceClientConfig) -> InferenceResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(InferenceError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> InferenceResult<Self> {
        Self::new(InferenceClientConfig::from_env())
    }

    pub fn config(&self) -> &InferenceClientConfig {
        &self.config
    }

    /// Build the outbound multipart body, preserving file names and types.
    fn build_form(request: AnimateRequest) -> InferenceResult<Form> {
        let mut form = Form::new();
        for (field, payload) in request.parts() {
            form = form.part(field, file_part(field, payload)?);
        }
        Ok(form)
    }
}

fn file_part(field: &str, payload: &MediaPayload) -> InferenceResult<Part> {
    let length = payload.len() as u64;
    Part::stream_with_length(reqwest::Body::from(payload.data.clone()), length)
        .file_name(payload.file_name.clone())
        .mime_str(payload.content_type_or_default())
        .map_err(|e| {
            InferenceError::InvalidRequest(format!("Invalid content type for {}: {}", field, e))
        })
}

#[async_trait]
impl InferenceBackend for InferenceClient {
    async fn animate(&self, request: AnimateRequest, credential: &Credential) -> InferenceResult<Bytes> {
        let total_bytes = request.total_bytes();
        let form = Self::build_form(request)?;

        info!(
            endpoint = %self.config.endpoint,
            upload_bytes = total_bytes,
            "Calling inference API"
        );
        let start = Instant::now();

        let response = self
            .http
            .post(&self.config.endpoint)
            .bearer_auth(credential.expose())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %body, "HuggingFace API error");
            return Err(InferenceError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        // The whole video is buffered; there is no streaming relay.
        let video = response.bytes().await?;

        debug!(
            result_bytes = video.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Inference API returned video"
        );

        Ok(video)
    }

    fn endpoint(&self) -> &str {
        &self.config.endpoint
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> AnimateRequest {
        AnimateRequest::new(
            MediaPayload::new("portrait.jpg", &b"JPEGDATA"[..]).with_content_type("image/jpeg"),
            MediaPayload::new("driving.mp4", &b"MP4DATA"[..]).with_content_type("video/mp4"),
        )
    }

    fn client_for(server: &MockServer) -> InferenceClient {
        let config = InferenceClientConfig::default()
            .with_endpoint(format!("{}/models/KwaiVGI/LivePortrait", server.uri()));
        InferenceClient::new(config).unwrap()
    }

    #[test]
    fn test_config_defaults() {
        let config = InferenceClientConfig::default();
        assert_eq!(config.endpoint, DEFAULT_INFERENCE_URL);
        assert_eq!(config.timeout, None);
    }

    #[tokio::test]
    async fn test_animate_sends_bearer_and_parts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/KwaiVGI/LivePortrait"))
            .and(header("authorization", "Bearer hf_test"))
            .and(body_string_contains("name=\"source_image\"; filename=\"portrait.jpg\""))
            .and(body_string_contains("name=\"driving_video\"; filename=\"driving.mp4\""))
            .and(body_string_contains("JPEGDATA"))
            .and(body_string_contains("MP4DATA"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"VIDEO".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let credential = Credential::parse("hf_test").unwrap();
        let video = client.animate(request(), &credential).await.unwrap();

        assert_eq!(&video[..], b"VIDEO");
    }

    #[tokio::test]
    async fn test_animate_passes_upstream_error_through() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("model loading"))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let credential = Credential::parse("hf_test").unwrap();
        let err = client.animate(request(), &credential).await.unwrap_err();

        match err {
            InferenceError::Upstream { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "model loading");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_animate_does_not_retry() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let credential = Credential::parse("hf_test").unwrap();
        assert!(client.animate(request(), &credential).await.is_err());
        // `expect(1)` is verified when the server drops.
    }

    #[tokio::test]
    async fn test_animate_network_error() {
        let config = InferenceClientConfig::default().with_endpoint("http://127.0.0.1:9/unreachable");
        let client = InferenceClient::new(config).unwrap();
        let credential = Credential::parse("hf_test").unwrap();

        let err = client.animate(request(), &credential).await.unwrap_err();
        assert!(err.is_transport());
    }

    #[test]
    fn test_invalid_content_type_rejected() {
        let payload = MediaPayload::new("x.bin", &b"x"[..]).with_content_type("not a mime");
        let err = file_part("source_image", &payload).unwrap_err();
        assert!(matches!(err, InferenceError::InvalidRequest(_)));
    }
}
