//! HTTP transport to the proxy endpoint.

use async_trait::async_trait;
use liveportrait_models::{
    Credential, ErrorBody, GenerateResponse, GenerationResult, MediaPayload, API_KEY_FIELD,
    DRIVING_VIDEO_FIELD, DRIVING_VIDEO_UPLOAD_NAME, GENERATE_PATH, SOURCE_IMAGE_FIELD,
    SOURCE_IMAGE_UPLOAD_NAME,
};
use reqwest::multipart::{Form, Part};
use reqwest::{header, Client};
use tracing::{debug, info, warn};

use crate::error::{ClientError, ClientResult, GENERATE_FAILED_MESSAGE};

/// One generation request as sent to the proxy.
#[derive(Debug, Clone)]
pub struct Submission {
    pub source_image: MediaPayload,
    pub driving_video: MediaPayload,
    /// Saved user credential; the proxy falls back to its own when absent
    pub credential: Option<Credential>,
}

/// Everything the uploader needs from the network.
#[async_trait]
pub trait ProxyTransport: Send + Sync {
    /// Download a bundled example asset by its static path.
    async fn fetch_asset(&self, path: &str) -> ClientResult<MediaPayload>;

    /// Submit both payloads and wait for the single response.
    async fn submit(&self, submission: Submission) -> ClientResult<GenerationResult>;
}

/// reqwest-based transport against a running proxy.
#[derive(Debug, Clone)]
pub struct HttpProxyTransport {
    http: Client,
    base_url: String,
}

impl HttpProxyTransport {
    /// Create a transport for the proxy at `base_url`.
    ///
    /// No timeout is configured; the request waits as long as the proxy does.
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        let http = Client::builder()
            .user_agent(concat!("liveportrait/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn build_form(submission: Submission) -> ClientResult<Form> {
        let mut form = Form::new()
            .part(
                SOURCE_IMAGE_FIELD,
                upload_part(&submission.source_image, SOURCE_IMAGE_UPLOAD_NAME)?,
            )
            .part(
                DRIVING_VIDEO_FIELD,
                upload_part(&submission.driving_video, DRIVING_VIDEO_UPLOAD_NAME)?,
            );

        if let Some(credential) = submission.credential {
            form = form.text(API_KEY_FIELD, credential.expose().to_string());
        }

        Ok(form)
    }
}

/// Uploads always go out under fixed file names.
fn upload_part(payload: &MediaPayload, upload_name: &'static str) -> ClientResult<Part> {
    let part = Part::stream_with_length(
        reqwest::Body::from(payload.data.clone()),
        payload.len() as u64,
    )
    .file_name(upload_name)
    .mime_str(payload.content_type_or_default())?;
    Ok(part)
}

/// Message of a non-success proxy response.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|body| body.error)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| GENERATE_FAILED_MESSAGE.to_string())
}

#[async_trait]
impl ProxyTransport for HttpProxyTransport {
    async fn fetch_asset(&self, path: &str) -> ClientResult<MediaPayload> {
        let response = self.http.get(self.url(path)).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!(path = %path, status = status.as_u16(), "Example asset unavailable");
            return Err(ClientError::Asset {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string())
            .or_else(|| mime_guess::from_path(path).first().map(|m| m.essence_str().to_string()));

        let data = response.bytes().await?;
        let file_name = path.rsplit('/').next().unwrap_or(path).to_string();

        debug!(path = %path, bytes = data.len(), "Fetched example asset");

        let payload = MediaPayload::new(file_name, data);
        Ok(match content_type {
            Some(content_type) => payload.with_content_type(content_type),
            None => payload,
        })
    }

    async fn submit(&self, submission: Submission) -> ClientResult<GenerationResult> {
        let upload_bytes = submission.source_image.len() + submission.driving_video.len();
        let with_credential = submission.credential.is_some();
        let form = Self::build_form(submission)?;

        info!(
            url = %self.url(GENERATE_PATH),
            upload_bytes,
            with_credential,
            "Submitting generation"
        );

        let response = self
            .http
            .post(self.url(GENERATE_PATH))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_message(&body);
            warn!(status = status.as_u16(), message = %message, "Generation failed");
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateResponse = response.json().await?;
        Ok(body.into())
    }
}
