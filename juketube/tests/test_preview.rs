use axum::body::Body;
use axum::http::Request;
use juketube::{create_preview_router, PreviewState};
use tower::ServiceExt;

fn preview_app() -> axum::Router {
    let state = PreviewState::new("https://preview.example/", "jukebox-test-agent").unwrap();
    create_preview_router(state)
}

fn preview_uri(src: &str) -> String {
    format!("/audio/preview?src={}", urlencoding::encode(src))
}

#[tokio::test]
async fn test_preview_streams_upstream_body_with_provider_headers() {
    let mut server = mockito::Server::new_async().await;

    // Le fournisseur amont exige Referer et User-Agent spécifiques
    let upstream = server
        .mock("GET", "/preview/track.mp3")
        .match_header("referer", "https://preview.example/")
        .match_header("user-agent", "jukebox-test-agent")
        .with_status(200)
        .with_header("content-type", "audio/mpeg")
        .with_body("mp3-bytes")
        .create_async()
        .await;

    let src = format!("{}/preview/track.mp3", server.url());
    let response = preview_app()
        .oneshot(
            Request::builder()
                .uri(preview_uri(&src))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let headers = response.headers();
    assert_eq!(headers.get("content-type").unwrap(), "audio/mpeg");
    assert_eq!(headers.get("access-control-allow-origin").unwrap(), "*");
    assert_eq!(headers.get("content-length").unwrap(), "9");

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"mp3-bytes");

    upstream.assert_async().await;
}

#[tokio::test]
async fn test_preview_upstream_rejection_yields_bad_gateway() {
    let mut server = mockito::Server::new_async().await;

    let upstream = server
        .mock("GET", "/preview/track.mp3")
        .with_status(403)
        .create_async()
        .await;

    let src = format!("{}/preview/track.mp3", server.url());
    let response = preview_app()
        .oneshot(
            Request::builder()
                .uri(preview_uri(&src))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), 502);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "UPSTREAM_ERROR");

    upstream.assert_async().await;
}

#[tokio::test]
async fn test_preview_rejects_non_http_sources() {
    let response = preview_app()
        .oneshot(
            Request::builder()
                .uri(preview_uri("ftp://example.com/track.mp3"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), 400);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "INVALID_URL");
}
