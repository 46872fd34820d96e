//! Caches en mémoire pour la résolution de sources
//!
//! Ce module fournit un cache en mémoire avec TTL pour minimiser les
//! requêtes à l'API de recherche : les recherches par texte sont conservées
//! 24 heures (résultat ou absence de résultat), les détails de ressources
//! 1 heure.

use crate::models::VideoDetails;
use moka::future::Cache as MokaCache;
use std::sync::Arc;
use std::time::Duration;

/// Cache des résolutions de sources
#[derive(Clone)]
pub struct SearchCache {
    /// Cache des recherches texte -> identifiant ou miss définitif (TTL: 24 heures)
    searches: Arc<MokaCache<String, Option<String>>>,
    /// Cache des détails de ressources (TTL: 1 heure)
    details: Arc<MokaCache<String, VideoDetails>>,
}

impl SearchCache {
    /// Crée un nouveau cache avec les paramètres par défaut
    pub fn new() -> Self {
        Self::with_capacity(1000)
    }

    /// Crée un nouveau cache avec une capacité spécifique
    pub fn with_capacity(max_capacity: u64) -> Self {
        Self {
            searches: Arc::new(
                MokaCache::builder()
                    .max_capacity(max_capacity)
                    .time_to_live(Duration::from_secs(24 * 3600)) // 24 heures
                    .build(),
            ),
            details: Arc::new(
                MokaCache::builder()
                    .max_capacity(max_capacity)
                    .time_to_live(Duration::from_secs(3600)) // 1 heure
                    .build(),
            ),
        }
    }

    // ============ Recherches ============

    /// Récupère une résolution depuis le cache
    ///
    /// `Some(None)` signifie que l'absence de résultat est elle-même en
    /// cache : inutile de réinterroger l'API avant l'expiration du TTL.
    pub async fn get_search(&self, query: &str) -> Option<Option<String>> {
        self.searches.get(query).await
    }

    /// Ajoute une résolution (ou un miss définitif) au cache
    pub async fn put_search(&self, query: String, resource_id: Option<String>) {
        self.searches.insert(query, resource_id).await;
    }

    /// Invalide une recherche du cache
    pub async fn invalidate_search(&self, query: &str) {
        self.searches.invalidate(query).await;
    }

    // ============ Détails ============

    /// Récupère le détail d'une ressource depuis le cache
    pub async fn get_details(&self, resource_id: &str) -> Option<VideoDetails> {
        self.details.get(resource_id).await
    }

    /// Ajoute le détail d'une ressource au cache
    pub async fn put_details(&self, resource_id: String, details: VideoDetails) {
        self.details.insert(resource_id, details).await;
    }

    // ============ Maintenance ============

    /// Vide tous les caches
    pub async fn clear_all(&self) {
        self.searches.invalidate_all();
        self.details.invalidate_all();
    }

    /// Retourne des statistiques sur le cache
    pub async fn stats(&self) -> CacheStats {
        self.searches.run_pending_tasks().await;
        self.details.run_pending_tasks().await;

        CacheStats {
            searches_count: self.searches.entry_count(),
            details_count: self.details.entry_count(),
        }
    }
}

impl Default for SearchCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistiques du cache
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CacheStats {
    /// Nombre de recherches en cache
    pub searches_count: u64,
    /// Nombre de détails en cache
    pub details_count: u64,
}
