//! HTTP transport and session tests against a mocked proxy.

use liveportrait_client::{
    ClientError, GenerateOutcome, HttpProxyTransport, MediaSource, MemoryCredentialStore, Phase,
    ProxyTransport, Submission, Uploader,
};
use liveportrait_models::{find_example, Credential, DataUri, MediaKind, MediaPayload};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn submission(credential: Option<&str>) -> Submission {
    Submission {
        source_image: MediaPayload::new("selfie.png", &b"PNGDATA"[..]).with_content_type("image/png"),
        driving_video: MediaPayload::new("dance.mov", &b"MOVDATA"[..])
            .with_content_type("video/quicktime"),
        credential: credential.and_then(Credential::parse),
    }
}

#[tokio::test]
async fn test_submit_uses_fixed_upload_names() {
    let server = MockServer::start().await;
    let video_url = DataUri::encode("video/mp4", b"VIDEO");

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_string_contains("name=\"source_image\"; filename=\"portrait.jpg\""))
        .and(body_string_contains("name=\"driving_video\"; filename=\"driving.mp4\""))
        .and(body_string_contains("PNGDATA"))
        .and(body_string_contains("MOVDATA"))
        .and(body_string_contains("name=\"api_key\""))
        .and(body_string_contains("hf_user"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "videoUrl": video_url })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let transport = HttpProxyTransport::new(server.uri()).unwrap();
    let result = transport.submit(submission(Some("hf_user"))).await.unwrap();

    assert_eq!(result.video_url, video_url);
    assert_eq!(result.decode().unwrap(), b"VIDEO");
}

#[tokio::test]
async fn test_submit_without_credential_omits_field() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_string_contains("name=\"api_key\""))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "videoUrl": "data:video/mp4;base64,AA==" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let transport = HttpProxyTransport::new(server.uri()).unwrap();
    transport.submit(submission(None)).await.unwrap();
}

#[tokio::test]
async fn test_submit_surfaces_proxy_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(
            ResponseTemplate::new(503)
                .set_body_json(serde_json::json!({ "error": "HuggingFace API error: 503 - model loading" })),
        )
        .mount(&server)
        .await;

    let transport = HttpProxyTransport::new(server.uri()).unwrap();
    let err = transport.submit(submission(None)).await.unwrap_err();

    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 503);
            assert!(message.contains("model loading"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_submit_falls_back_when_error_body_unreadable() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let transport = HttpProxyTransport::new(server.uri()).unwrap();
    let err = transport.submit(submission(None)).await.unwrap_err();

    assert_eq!(err.display_message(), "Failed to generate avatar");
}

#[tokio::test]
async fn test_fetch_asset() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/mona-lisa-portrait.jpg"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/jpeg")
                .set_body_bytes(b"MONA".to_vec()),
        )
        .mount(&server)
        .await;

    let transport = HttpProxyTransport::new(server.uri()).unwrap();
    let payload = transport.fetch_asset("/mona-lisa-portrait.jpg").await.unwrap();

    assert_eq!(payload.file_name, "mona-lisa-portrait.jpg");
    assert_eq!(payload.content_type.as_deref(), Some("image/jpeg"));
    assert_eq!(payload.data.as_ref(), b"MONA");
}

#[tokio::test]
async fn test_fetch_missing_asset() {
    let server = MockServer::start().await;
    let transport = HttpProxyTransport::new(server.uri()).unwrap();

    let err = transport.fetch_asset("/missing.jpg").await.unwrap_err();
    assert!(matches!(err, ClientError::Asset { status: 404, .. }));
}

#[tokio::test]
async fn test_session_with_examples_round_trip() {
    let server = MockServer::start().await;
    let portrait = find_example(MediaKind::Image, "mona lisa").unwrap();
    let driving = find_example(MediaKind::Video, "Talking 2").unwrap();

    Mock::given(method("GET"))
        .and(path(portrait.src))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"MONA".to_vec()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(driving.src))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"TALK".to_vec()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_string_contains("MONA"))
        .and(body_string_contains("TALK"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            serde_json::json!({ "videoUrl": DataUri::encode("video/mp4", b"AVATAR") }),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let transport = HttpProxyTransport::new(server.uri()).unwrap();
    let session = Uploader::new(transport, MemoryCredentialStore::new());
    session.select_image(MediaSource::Example(portrait)).await;
    session.select_video(MediaSource::Example(driving)).await;

    let outcome = session.generate().await;
    let GenerateOutcome::Completed(result) = outcome else {
        panic!("expected completion, got {:?}", outcome);
    };
    assert_eq!(result.decode().unwrap(), b"AVATAR");
    assert_eq!(session.phase().await, Phase::Success);
}

#[tokio::test]
async fn test_session_network_failure_sets_error() {
    // Port 1 refuses connections.
    let transport = HttpProxyTransport::new("http://127.0.0.1:1").unwrap();
    let session = Uploader::new(transport, MemoryCredentialStore::new());
    session
        .select_image(MediaSource::Uploaded(MediaPayload::new("a.jpg", &b"A"[..])))
        .await;
    session
        .select_video(MediaSource::Uploaded(MediaPayload::new("b.mp4", &b"B"[..])))
        .await;

    let outcome = session.generate().await;
    assert!(matches!(outcome, GenerateOutcome::Failed(_)));

    let state = session.snapshot().await;
    assert!(state.error.is_some());
    assert!(state.image.is_some());
    assert!(state.video.is_some());
    assert_eq!(session.phase().await, Phase::Error);
}
