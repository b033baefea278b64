//! Generate handler: the proxy in front of the inference service.
//!
//! One client request produces exactly one upstream attempt. The upstream
//! response is buffered in full and returned as a base64 data URI.

use std::time::Instant;

use axum::extract::multipart::{Field, Multipart, MultipartRejection};
use axum::extract::State;
use axum::Json;
use liveportrait_inference::AnimateRequest;
use liveportrait_models::{
    Credential, DataUri, GenerateResponse, MediaPayload, API_KEY_FIELD, DRIVING_VIDEO_FIELD,
    RESULT_VIDEO_MIME, SOURCE_IMAGE_FIELD,
};
use tracing::{debug, info, warn};

use crate::error::{ApiError, ApiResult, MISSING_PARTS_MESSAGE};
use crate::metrics;
use crate::state::AppState;

/// Parsed generate form.
#[derive(Debug, Default)]
pub struct GenerateForm {
    pub source_image: Option<MediaPayload>,
    pub driving_video: Option<MediaPayload>,
    pub api_key: Option<Credential>,
}

impl GenerateForm {
    /// Drain the multipart body. Unknown fields are skipped and a repeated
    /// field keeps its first occurrence.
    pub async fn read(mut multipart: Multipart) -> ApiResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::from_multipart(e.status(), e.body_text()))?
        {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };

            match name.as_str() {
                SOURCE_IMAGE_FIELD if form.source_image.is_none() => {
                    form.source_image = Some(read_payload(&name, field).await?);
                }
                DRIVING_VIDEO_FIELD if form.driving_video.is_none() => {
                    form.driving_video = Some(read_payload(&name, field).await?);
                }
                API_KEY_FIELD if form.api_key.is_none() => {
                    let raw = field
                        .text()
                        .await
                        .map_err(|e| ApiError::from_multipart(e.status(), e.body_text()))?;
                    form.api_key = Credential::parse(&raw);
                }
                _ => debug!(field = %name, "Skipping form field"),
            }
        }

        Ok(form)
    }

    /// Both required parts, or a validation error.
    pub fn into_request(self) -> ApiResult<AnimateRequest> {
        match (self.source_image, self.driving_video) {
            (Some(source_image), Some(driving_video)) => {
                Ok(AnimateRequest::new(source_image, driving_video))
            }
            _ => Err(ApiError::bad_request(MISSING_PARTS_MESSAGE)),
        }
    }
}

async fn read_payload(name: &str, field: Field<'_>) -> ApiResult<MediaPayload> {
    let file_name = field.file_name().unwrap_or(name).to_string();
    let content_type = field.content_type().map(str::to_owned);
    let data = field
        .bytes()
        .await
        .map_err(|e| ApiError::from_multipart(e.status(), e.body_text()))?;

    let mut payload = MediaPayload::new(file_name, data);
    payload.content_type = content_type;
    Ok(payload)
}

/// Generate a talking avatar from a portrait and a driving video.
pub async fn generate(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<GenerateResponse>> {
    let start = Instant::now();
    let result = proxy_generation(&state, multipart).await;

    let outcome = match &result {
        Ok(_) => "success",
        Err(ApiError::BadRequest(_)) => "bad_request",
        Err(ApiError::PayloadTooLarge(_)) => "payload_too_large",
        Err(ApiError::Configuration(_)) => "configuration_error",
        Err(ApiError::Upstream { .. }) => "upstream_error",
        Err(ApiError::Internal(_)) => "internal_error",
    };
    metrics::record_generation(outcome, start.elapsed().as_secs_f64());

    result.map(Json)
}

async fn proxy_generation(
    state: &AppState,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<GenerateResponse> {
    let multipart = multipart.map_err(|e| ApiError::from_multipart(e.status(), e.body_text()))?;
    let form = GenerateForm::read(multipart).await?;

    let credential = state
        .config
        .resolve_credential(form.api_key.clone())
        .ok_or_else(ApiError::missing_api_key)?;

    let request = form.into_request().map_err(|e| {
        warn!("Generate request missing a required part");
        e
    })?;

    let upstream_start = Instant::now();
    let video = state.inference.animate(request, &credential).await;
    metrics::record_upstream_duration(upstream_start.elapsed().as_secs_f64());
    let video = video.map_err(|e| {
        warn!(
            upstream_status = ?e.upstream_status(),
            transport = e.is_transport(),
            "Inference call failed"
        );
        e
    })?;

    metrics::record_result_size(video.len());
    let video_url = DataUri::encode(RESULT_VIDEO_MIME, &video);

    info!(result_bytes = video.len(), "Generated talking avatar");

    Ok(GenerateResponse { video_url })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_request_requires_both_parts() {
        let image = MediaPayload::new("portrait.jpg", &b"img"[..]);
        let video = MediaPayload::new("driving.mp4", &b"vid"[..]);

        let form = GenerateForm {
            source_image: Some(image.clone()),
            driving_video: None,
            api_key: None,
        };
        assert!(matches!(form.into_request(), Err(ApiError::BadRequest(_))));

        let form = GenerateForm {
            source_image: None,
            driving_video: Some(video.clone()),
            api_key: None,
        };
        assert!(matches!(form.into_request(), Err(ApiError::BadRequest(_))));

        let form = GenerateForm {
            source_image: Some(image),
            driving_video: Some(video),
            api_key: None,
        };
        let request = form.into_request().unwrap();
        assert_eq!(request.total_bytes(), 6);
    }
}
