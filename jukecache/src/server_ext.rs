//! Service HTTP des fichiers audio du cache
//!
//! Ce module expose la route de streaming des pistes décodées, avec support
//! des requêtes par plage d'octets (seek/reprise côté client).
//!
//! ## Routes générées
//!
//! - `GET /audio/tracks/{rid}` - Piste audio, complète (200) ou partielle
//!   (206) selon l'en-tête `Range`
//!
//! Le paramètre `rid` est soit un identifiant de ressource brut, soit une
//! URL complète de la source vidéo (percent-encodée), dont l'identifiant est
//! extrait avant résolution.
//!
//! ## Sémantique des plages
//!
//! Seule la forme `bytes=<start>-[<end>]` est honorée. Un en-tête `Range`
//! malformé dégrade en réponse complète (200); une plage hors du fichier
//! (`start >= taille` ou `start > end`) répond 416 sans en-têtes partiels.
//! La déconnexion du client abandonne la lecture du fichier; le fichier en
//! cache reste valide pour les requêtes suivantes.

use crate::api::ErrorResponse;
use crate::cache::{AudioCache, CachedTrack};
use axum::{
    Json, Router,
    body::Body,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;
use tracing::{error, warn};

/// Content-Type des pistes décodées
pub const AUDIO_CONTENT_TYPE: &str = "audio/mp4";

/// Directive de cache pour du contenu statique
const CACHE_CONTROL: &str = "public, max-age=86400";

/// Plage d'octets demandée par le client
#[derive(Debug, PartialEq, Eq)]
enum ByteRange {
    /// Pas de plage exploitable : servir le fichier complet
    Full,
    /// Fenêtre [start, end] incluse, bornée par la taille du fichier
    Window { start: u64, end: u64 },
    /// Plage hors du fichier
    Unsatisfiable,
}

/// Interprète un en-tête `Range` de la forme `bytes=<start>-[<end>]`
///
/// `start` est obligatoire; `end` vaut `size - 1` s'il est absent et est
/// borné par la taille du fichier sinon. Toute valeur malformée (unité
/// inconnue, plages multiples, suffixe `-N`) dégrade en [`ByteRange::Full`]
/// plutôt qu'en erreur. La fenêtre retournée a toujours une longueur
/// strictement positive : `start >= size` ou `start > end` donnent
/// [`ByteRange::Unsatisfiable`].
fn parse_range(value: &str, size: u64) -> ByteRange {
    let Some(spec) = value.trim().strip_prefix("bytes=") else {
        return ByteRange::Full;
    };

    let Some((start_s, end_s)) = spec.trim().split_once('-') else {
        return ByteRange::Full;
    };

    let Ok(start) = start_s.trim().parse::<u64>() else {
        return ByteRange::Full;
    };

    let end = match end_s.trim() {
        "" => size.saturating_sub(1),
        s => match s.parse::<u64>() {
            Ok(e) => e.min(size.saturating_sub(1)),
            Err(_) => return ByteRange::Full,
        },
    };

    if size == 0 || start >= size || start > end {
        return ByteRange::Unsatisfiable;
    }

    ByteRange::Window { start, end }
}

/// Extrait l'identifiant de ressource d'une entrée brute
///
/// Accepte soit l'identifiant opaque lui-même, soit une URL complète de la
/// source (`https://.../watch?v=<id>` ou forme courte `https://host/<id>`).
pub fn extract_resource_id(input: &str) -> String {
    if !input.contains("://") {
        return input.to_string();
    }

    // URL complète : priorité au paramètre v=, sinon dernier segment du chemin
    if let Some(query) = input.split('?').nth(1) {
        for pair in query.split('&') {
            if let Some(v) = pair.strip_prefix("v=") {
                if !v.is_empty() {
                    return v.to_string();
                }
            }
        }
    }

    input
        .split('?')
        .next()
        .unwrap_or(input)
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(input)
        .to_string()
}

/// Handler pour GET /audio/tracks/{rid}
async fn stream_track(
    State(cache): State<Arc<AudioCache>>,
    Path(rid): Path<String>,
    headers: HeaderMap,
) -> Response {
    let resource_id = extract_resource_id(&rid);
    serve_cached_track(&cache, &resource_id, &headers).await
}

/// Résout une ressource via le cache et la sert avec support des plages
///
/// Un échec de résolution/décodage répond 500 avec l'enveloppe JSON
/// d'erreur, sans aucun en-tête de contenu partiel.
pub async fn serve_cached_track(
    cache: &AudioCache,
    resource_id: &str,
    headers: &HeaderMap,
) -> Response {
    let track = match cache.get_or_download(resource_id).await {
        Ok(track) => track,
        Err(e) => {
            error!(resource_id, "Unable to provide cached audio: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "DECODE_FAILED".to_string(),
                    message: format!("Cannot materialize audio for '{}'", resource_id),
                }),
            )
                .into_response();
        }
    };

    serve_file_range(&track, headers).await
}

/// Sert le fichier d'une piste, en entier ou sur une fenêtre d'octets
async fn serve_file_range(track: &CachedTrack, headers: &HeaderMap) -> Response {
    let size = track.size;

    let range = headers
        .get(header::RANGE)
        .and_then(|v| v.to_str().ok())
        .map(|v| parse_range(v, size))
        .unwrap_or(ByteRange::Full);

    let mut file = match tokio::fs::File::open(&track.path).await {
        Ok(f) => f,
        Err(e) => {
            warn!(file = %track.path.display(), "Error opening cached file: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "FILE_ERROR".to_string(),
                    message: "Cached file is not readable".to_string(),
                }),
            )
                .into_response();
        }
    };

    match range {
        ByteRange::Full => {
            let body = Body::from_stream(ReaderStream::new(file));
            (
                StatusCode::OK,
                [
                    ("content-type", AUDIO_CONTENT_TYPE.to_string()),
                    ("accept-ranges", "bytes".to_string()),
                    ("access-control-allow-origin", "*".to_string()),
                    ("cache-control", CACHE_CONTROL.to_string()),
                    ("content-length", size.to_string()),
                ],
                body,
            )
                .into_response()
        }
        ByteRange::Window { start, end } => {
            if let Err(e) = file.seek(std::io::SeekFrom::Start(start)).await {
                warn!(file = %track.path.display(), "Error seeking cached file: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: "FILE_ERROR".to_string(),
                        message: "Cached file is not seekable".to_string(),
                    }),
                )
                    .into_response();
            }

            let len = end - start + 1;
            let body = Body::from_stream(ReaderStream::new(file.take(len)));
            (
                StatusCode::PARTIAL_CONTENT,
                [
                    ("content-type", AUDIO_CONTENT_TYPE.to_string()),
                    ("accept-ranges", "bytes".to_string()),
                    ("access-control-allow-origin", "*".to_string()),
                    ("cache-control", CACHE_CONTROL.to_string()),
                    ("content-range", format!("bytes {}-{}/{}", start, end, size)),
                    ("content-length", len.to_string()),
                ],
                body,
            )
                .into_response()
        }
        ByteRange::Unsatisfiable => (
            StatusCode::RANGE_NOT_SATISFIABLE,
            [
                ("accept-ranges", "bytes".to_string()),
                ("access-control-allow-origin", "*".to_string()),
                ("content-range", format!("bytes */{}", size)),
            ],
        )
            .into_response(),
    }
}

/// Crée le router de streaming des pistes audio
///
/// # Routes créées
///
/// - `GET /audio/tracks/{rid}` - Piste audio avec support des plages
pub fn create_stream_router(cache: Arc<AudioCache>) -> Router {
    Router::new()
        .route("/audio/tracks/{rid}", get(stream_track))
        .with_state(cache)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_range_window() {
        assert_eq!(
            parse_range("bytes=0-1023", 2_097_152),
            ByteRange::Window { start: 0, end: 1023 }
        );
        assert_eq!(
            parse_range("bytes=100-", 200),
            ByteRange::Window { start: 100, end: 199 }
        );
        // end borné par la taille du fichier
        assert_eq!(
            parse_range("bytes=0-999999", 512),
            ByteRange::Window { start: 0, end: 511 }
        );
    }

    #[test]
    fn test_parse_range_malformed_degrades_to_full() {
        assert_eq!(parse_range("bytes=", 100), ByteRange::Full);
        assert_eq!(parse_range("bytes=abc-def", 100), ByteRange::Full);
        assert_eq!(parse_range("items=0-10", 100), ByteRange::Full);
        // suffixe et plages multiples non supportés
        assert_eq!(parse_range("bytes=-500", 100), ByteRange::Full);
        assert_eq!(parse_range("bytes=0-10,20-30", 100), ByteRange::Full);
    }

    #[test]
    fn test_parse_range_unsatisfiable() {
        assert_eq!(parse_range("bytes=100-", 100), ByteRange::Unsatisfiable);
        assert_eq!(parse_range("bytes=500-400", 1000), ByteRange::Unsatisfiable);
        assert_eq!(parse_range("bytes=0-", 0), ByteRange::Unsatisfiable);
    }

    #[test]
    fn test_extract_resource_id() {
        assert_eq!(extract_resource_id("dQw4w9WgXcQ"), "dQw4w9WgXcQ");
        assert_eq!(
            extract_resource_id("https://www.example-video.com/watch?v=dQw4w9WgXcQ&t=1"),
            "dQw4w9WgXcQ"
        );
        assert_eq!(
            extract_resource_id("https://short.link/dQw4w9WgXcQ"),
            "dQw4w9WgXcQ"
        );
        assert_eq!(
            extract_resource_id("https://short.link/dQw4w9WgXcQ?feature=share"),
            "dQw4w9WgXcQ"
        );
    }
}
