use juketube::{SourceResolver, TubeClient};
use mockito::Matcher;

fn search_body(id: &str) -> String {
    format!(
        r#"{{"items":[{{"id":{{"kind":"video#searchResult","videoId":"{}"}},"snippet":{{"title":"A Song","channelTitle":"An Artist"}}}}]}}"#,
        id
    )
}

fn details_body(id: &str, live_broadcast: &str) -> String {
    format!(
        r#"{{"items":[{{"id":"{}","snippet":{{"title":"A Song","liveBroadcastContent":"{}"}},"contentDetails":{{"duration":"PT3M42S"}}}}]}}"#,
        id, live_broadcast
    )
}

fn resolver_for(server: &mockito::Server) -> SourceResolver {
    let client = TubeClient::with_base_url("test-key", server.url()).unwrap();
    SourceResolver::new(Some(client))
}

#[tokio::test]
async fn test_resolve_success_and_result_is_cached() {
    let mut server = mockito::Server::new_async().await;

    let search = server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(search_body("abc123xyz00"))
        .expect(1)
        .create_async()
        .await;

    let details = server
        .mock("GET", "/videos")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(details_body("abc123xyz00", "none"))
        .expect(1)
        .create_async()
        .await;

    let resolver = resolver_for(&server);

    let first = resolver.resolve("Around the World", "Daft Punk").await;
    assert_eq!(first.as_deref(), Some("abc123xyz00"));

    // Deuxième résolution servie par le cache : aucun nouvel appel API
    let second = resolver.resolve("Around the World", "Daft Punk").await;
    assert_eq!(second.as_deref(), Some("abc123xyz00"));

    search.assert_async().await;
    details.assert_async().await;
}

#[tokio::test]
async fn test_resolve_zero_results_caches_the_miss() {
    let mut server = mockito::Server::new_async().await;

    let search = server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"items":[]}"#)
        .expect(1)
        .create_async()
        .await;

    let resolver = resolver_for(&server);

    assert!(resolver.resolve("Obscure Track", "Nobody").await.is_none());
    // Le miss définitif est en cache : pas de second appel API
    assert!(resolver.resolve("Obscure Track", "Nobody").await.is_none());

    search.assert_async().await;
}

#[tokio::test]
async fn test_transient_errors_are_swallowed_and_not_cached() {
    let mut server = mockito::Server::new_async().await;

    let search = server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(403)
        .with_body(r#"{"error":{"errors":[{"reason":"quotaExceeded"}],"message":"quota"}}"#)
        .expect(2)
        .create_async()
        .await;

    let resolver = resolver_for(&server);

    // L'erreur de quota ne remonte jamais à l'appelant
    assert!(resolver.resolve("Some Track", "Some Artist").await.is_none());

    // Et elle n'est pas mise en cache : la tentative suivante réinterroge l'API
    assert!(resolver.resolve("Some Track", "Some Artist").await.is_none());

    search.assert_async().await;
}

#[tokio::test]
async fn test_live_broadcasts_are_filtered_out() {
    let mut server = mockito::Server::new_async().await;

    let search = server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(search_body("livestream00"))
        .expect(1)
        .create_async()
        .await;

    let details = server
        .mock("GET", "/videos")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(details_body("livestream00", "live"))
        .expect(1)
        .create_async()
        .await;

    let resolver = resolver_for(&server);

    assert!(resolver.resolve("Radio Stream", "Some Channel").await.is_none());

    // Le rejet est définitif et mis en cache
    assert!(resolver.resolve("Radio Stream", "Some Channel").await.is_none());

    search.assert_async().await;
    details.assert_async().await;
}

#[tokio::test]
async fn test_details_are_cached() {
    let mut server = mockito::Server::new_async().await;

    let details = server
        .mock("GET", "/videos")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(details_body("abc123xyz00", "none"))
        .expect(1)
        .create_async()
        .await;

    let resolver = resolver_for(&server);

    let first = resolver.details("abc123xyz00").await.unwrap();
    assert_eq!(first.duration.as_deref(), Some("PT3M42S"));
    assert!(!first.live);

    let second = resolver.details("abc123xyz00").await.unwrap();
    assert_eq!(second.id, "abc123xyz00");

    details.assert_async().await;
}
