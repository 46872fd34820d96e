use anyhow::{anyhow, Result};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use jukecache::{AudioCache, AudioDecoder};
use juketube::{create_source_router, SourceResolver, TubeClient};
use mockito::Matcher;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;
use tower::ServiceExt;

/// Décodeur de test : écrit un contenu fixe et compte ses invocations
struct CountingDecoder {
    calls: AtomicUsize,
    payload: Vec<u8>,
}

#[async_trait]
impl AudioDecoder for CountingDecoder {
    async fn decode(&self, _resource_id: &str, dest: &Path) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::fs::write(dest, &self.payload).await?;
        Ok(())
    }
}

/// Décodeur qui ne doit jamais être invoqué
struct ForbiddenDecoder {
    calls: AtomicUsize,
}

#[async_trait]
impl AudioDecoder for ForbiddenDecoder {
    async fn decode(&self, resource_id: &str, _dest: &Path) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(anyhow!("decoder must not run for {}", resource_id))
    }
}

fn test_cache(decoder: Arc<dyn AudioDecoder>) -> (TempDir, Arc<AudioCache>) {
    let temp_dir = tempfile::tempdir().unwrap();
    let cache = Arc::new(AudioCache::new(temp_dir.path(), 10, decoder).unwrap());
    (temp_dir, cache)
}

#[tokio::test]
async fn test_play_streams_resolved_track_end_to_end() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"items":[{"id":{"videoId":"abc123xyz00"},"snippet":{"title":"A Song"}}]}"#,
        )
        .create_async()
        .await;

    server
        .mock("GET", "/videos")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"items":[{"id":"abc123xyz00","snippet":{"liveBroadcastContent":"none"},"contentDetails":{"duration":"PT3M42S"}}]}"#,
        )
        .create_async()
        .await;

    let client = TubeClient::with_base_url("test-key", server.url()).unwrap();
    let resolver = Arc::new(SourceResolver::new(Some(client)));
    let decoder = Arc::new(CountingDecoder {
        calls: AtomicUsize::new(0),
        payload: b"decoded audio".to_vec(),
    });
    let (_temp_dir, cache) = test_cache(decoder.clone());

    let app = create_source_router(resolver, cache);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/audio/play?title=Around%20the%20World&artist=Daft%20Punk")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "audio/mp4"
    );

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"decoded audio");
    assert_eq!(decoder.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_play_resolution_miss_is_server_error_without_decode() {
    // Résolveur désactivé (pas de clé d'API) : résolution toujours en échec
    let resolver = Arc::new(SourceResolver::new(None));
    let decoder = Arc::new(ForbiddenDecoder {
        calls: AtomicUsize::new(0),
    });
    let (_temp_dir, cache) = test_cache(decoder.clone());

    let app = create_source_router(resolver, cache);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/audio/play?title=Unknown%20Song")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // Erreur serveur immédiate, sans aucun en-tête de contenu partiel
    assert_eq!(response.status(), 500);
    assert!(response.headers().get("content-range").is_none());

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "NO_SOURCE");

    // Le décodeur n'a jamais été invoqué
    assert_eq!(decoder.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_resolve_endpoint_returns_null_on_miss() {
    let resolver = Arc::new(SourceResolver::new(None));
    let decoder = Arc::new(ForbiddenDecoder {
        calls: AtomicUsize::new(0),
    });
    let (_temp_dir, cache) = test_cache(decoder);

    let app = create_source_router(resolver, cache);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/source/resolve?title=Anything&artist=Anyone")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), 200);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["resource_id"].is_null());
}
