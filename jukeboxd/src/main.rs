use jukecache::{janitor, AudioCache, CacheConfigExt};
use jukeserver::Server;
use juketube::{ExtractorDecoder, PreviewState, SourceResolver};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    jukeserver::init_logging();
    let config = jukeconfig::get_config();

    // ========== PHASE 1 : Cache audio ==========

    info!("🎵 Initializing audio cache...");
    let decoder = Arc::new(ExtractorDecoder::from_config(&config));
    let cache = Arc::new(AudioCache::from_config(&config, decoder)?);

    // Balayage de démarrage : récupère les fichiers orphelins d'un run précédent
    let max_age = config.get_janitor_max_age();
    match janitor::sweep(cache.cache_dir(), max_age).await {
        Ok(removed) => info!("🧹 Startup janitor sweep removed {} stale file(s)", removed),
        Err(e) => warn!("⚠️ Startup janitor sweep failed: {}", e),
    }

    if let Some(interval) = config.get_janitor_interval() {
        info!("🧹 Periodic janitor sweep every {}s", interval.as_secs());
        janitor::spawn_periodic(cache.cache_dir().to_path_buf(), max_age, interval);
    }

    // ========== PHASE 2 : Résolution de sources ==========

    info!("📡 Initializing source resolver...");
    let resolver = Arc::new(SourceResolver::from_config(&config));
    if resolver.is_enabled() {
        info!("✅ Source resolution enabled");
    }

    // ========== PHASE 3 : Serveur HTTP ==========

    let mut server = Server::new_configured();
    let server_info = server.info();

    server
        .add_route("/info", move || {
            let info = server_info.clone();
            async move {
                serde_json::json!({
                    "name": info.name,
                    "version": env!("CARGO_PKG_VERSION"),
                })
            }
        })
        .await;

    // Streaming des pistes en cache (plages d'octets comprises)
    server
        .add_router("/", jukecache::create_stream_router(cache.clone()))
        .await;

    // API d'administration du cache
    server
        .add_router("/api/audio", jukecache::create_api_router(cache.clone()))
        .await;

    // Résolution + lecture bout-en-bout
    server
        .add_router(
            "/",
            juketube::create_source_router(resolver.clone(), cache.clone()),
        )
        .await;

    // Fallback : proxy des extraits de prévisualisation
    server
        .add_router("/", juketube::create_preview_router(PreviewState::from_config(&config)?))
        .await;

    info!("🌐 Starting HTTP server...");
    server.start().await;

    info!("✅ Jukebox backend is ready!");
    info!("Press Ctrl+C to stop...");
    server.wait().await;

    Ok(())
}
