//! API REST d'administration du cache audio
//!
//! Ce module expose une petite API JSON pour :
//! - Lister les pistes en cache
//! - Supprimer une piste
//! - Purger le cache

use crate::cache::AudioCache;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Informations d'une piste en cache
#[derive(Debug, Serialize, Deserialize)]
pub struct TrackInfo {
    /// Identifiant de la ressource
    pub resource_id: String,
    /// Taille du fichier en octets
    pub size_bytes: u64,
    /// Nombre d'accès à la piste
    pub hits: u64,
    /// Date/heure du dernier accès (RFC3339)
    pub last_access: String,
}

/// Réponse d'une opération de suppression
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    /// Message de succès
    pub message: String,
}

/// Réponse d'erreur générique
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Code d'erreur
    pub error: String,
    /// Message descriptif
    pub message: String,
}

/// Liste toutes les pistes en cache avec leurs statistiques
///
/// Retourne les entrées de l'index triées par nombre d'accès décroissant.
pub async fn list_tracks(State(cache): State<Arc<AudioCache>>) -> impl IntoResponse {
    let tracks: Vec<TrackInfo> = cache
        .store()
        .snapshot()
        .into_iter()
        .map(|(resource_id, entry)| TrackInfo {
            resource_id,
            size_bytes: entry.size,
            hits: entry.hits,
            last_access: entry.last_access.to_rfc3339(),
        })
        .collect();

    (StatusCode::OK, Json(tracks))
}

/// Supprime une piste du cache
///
/// Supprime l'entrée de l'index et le fichier du disque.
pub async fn delete_track(
    State(cache): State<Arc<AudioCache>>,
    Path(resource_id): Path<String>,
) -> impl IntoResponse {
    match cache.delete_track(&resource_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(DeleteResponse {
                message: format!("Track '{}' deleted successfully", resource_id),
            }),
        )
            .into_response(),
        Err(_) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "NOT_FOUND".to_string(),
                message: format!("Track '{}' not found in cache", resource_id),
            }),
        )
            .into_response(),
    }
}

/// Purge complètement le cache
///
/// Supprime toutes les pistes de l'index et leurs fichiers du disque.
/// Opération irréversible.
pub async fn purge_cache(State(cache): State<Arc<AudioCache>>) -> impl IntoResponse {
    match cache.purge().await {
        Ok(count) => (
            StatusCode::OK,
            Json(DeleteResponse {
                message: format!("Cache purged successfully ({} tracks removed)", count),
            }),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "PURGE_ERROR".to_string(),
                message: format!("Cannot purge cache: {}", e),
            }),
        )
            .into_response(),
    }
}

/// Crée le router de l'API REST du cache
///
/// # Routes créées
///
/// - `GET /` - Liste des pistes en cache
/// - `DELETE /` - Purger le cache
/// - `DELETE /{rid}` - Supprimer une piste
pub fn create_api_router(cache: Arc<AudioCache>) -> axum::Router {
    use axum::routing::{delete, get};

    axum::Router::new()
        .route("/", get(list_tracks).delete(purge_cache))
        .route("/{rid}", delete(delete_track))
        .with_state(cache)
}
