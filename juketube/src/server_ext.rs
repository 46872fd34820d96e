//! Routes HTTP de la source audio
//!
//! Ce module expose la résolution de sources aux clients HTTP :
//!
//! - `GET /api/source/resolve?title=..&artist=..` - Résolution seule,
//!   retourne l'identifiant de ressource ou `null`
//! - `GET /audio/play?title=..&artist=..` - Bout-en-bout : résolution puis
//!   streaming de la piste en cache (plages d'octets comprises)
//!
//! Une résolution sans candidat répond avec une erreur serveur et
//! l'enveloppe JSON d'erreur, sans jamais invoquer le décodeur.

use crate::resolver::SourceResolver;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use jukecache::{serve_cached_track, AudioCache, ErrorResponse};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// État partagé des routes de la source
#[derive(Clone)]
pub struct SourceState {
    pub resolver: Arc<SourceResolver>,
    pub cache: Arc<AudioCache>,
}

/// Paramètres d'identification d'une piste
#[derive(Debug, Deserialize)]
pub struct TrackQuery {
    /// Titre de la piste
    pub title: String,
    /// Artiste (optionnel)
    #[serde(default)]
    pub artist: String,
}

/// Réponse de la route de résolution
#[derive(Debug, Serialize, Deserialize)]
pub struct ResolveResponse {
    /// Identifiant de ressource, ou `null` si aucun candidat
    pub resource_id: Option<String>,
}

/// Handler pour GET /api/source/resolve
pub async fn resolve_track(
    State(state): State<SourceState>,
    Query(query): Query<TrackQuery>,
) -> Json<ResolveResponse> {
    let resource_id = state.resolver.resolve(&query.title, &query.artist).await;
    Json(ResolveResponse { resource_id })
}

/// Handler pour GET /audio/play
///
/// Résout la piste puis délègue au service de streaming du cache. Un miss de
/// résolution n'atteint jamais le décodeur.
pub async fn play_track(
    State(state): State<SourceState>,
    Query(query): Query<TrackQuery>,
    headers: HeaderMap,
) -> Response {
    match state.resolver.resolve(&query.title, &query.artist).await {
        Some(resource_id) => serve_cached_track(&state.cache, &resource_id, &headers).await,
        None => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "NO_SOURCE".to_string(),
                message: format!("No playable source found for '{}'", query.title),
            }),
        )
            .into_response(),
    }
}

/// Crée le router des routes de la source
pub fn create_source_router(resolver: Arc<SourceResolver>, cache: Arc<AudioCache>) -> Router {
    Router::new()
        .route("/api/source/resolve", get(resolve_track))
        .route("/audio/play", get(play_track))
        .with_state(SourceState { resolver, cache })
}
