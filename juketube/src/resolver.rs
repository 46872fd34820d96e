//! Résolution d'une piste vers une ressource de la plateforme vidéo
//!
//! Le résolveur transforme un couple (titre, artiste) en identifiant de
//! ressource lisible par le décodeur. L'absence de résultat est une issue
//! normale : toutes les erreurs (réseau, quota, clé absente) sont absorbées
//! et loggées, et l'appelant reçoit toujours un `Option`.

use crate::cache::SearchCache;
use crate::client::TubeClient;
use crate::config_ext::TubeConfigExt;
use crate::models::VideoDetails;
use jukeconfig::Config;
use tracing::{debug, warn};

/// Résolveur de sources audio
///
/// Sans clé d'API configurée, le résolveur est construit désactivé en
/// permanence : l'avertissement est loggé une fois à la construction, jamais
/// à chaque appel.
pub struct SourceResolver {
    client: Option<TubeClient>,
    cache: SearchCache,
}

impl SourceResolver {
    /// Crée un résolveur avec un client déjà construit (ou aucun)
    pub fn new(client: Option<TubeClient>) -> Self {
        Self {
            client,
            cache: SearchCache::new(),
        }
    }

    /// Crée un résolveur depuis la configuration
    ///
    /// Sans clé d'API, le résolveur est désactivé (toutes les résolutions
    /// retournent `None`).
    pub fn from_config(config: &Config) -> Self {
        let client = match config.get_tube_api_key() {
            Ok(Some(key)) => match TubeClient::new(key) {
                Ok(client) => Some(client.with_region(config.get_tube_region())),
                Err(e) => {
                    warn!("Cannot build search API client: {}", e);
                    None
                }
            },
            _ => None,
        };

        if client.is_none() {
            warn!("No search API key configured, source resolution is permanently disabled");
        }

        Self::new(client)
    }

    /// Indique si le résolveur est opérationnel
    pub fn is_enabled(&self) -> bool {
        self.client.is_some()
    }

    /// Retourne le cache de résolution
    pub fn cache(&self) -> &SearchCache {
        &self.cache
    }

    /// Résout un couple (titre, artiste) en identifiant de ressource
    ///
    /// # Workflow
    ///
    /// 1. Construit la requête texte et consulte le cache (24h de TTL, les
    ///    absences de résultat y compris)
    /// 2. Sur miss, interroge l'API de recherche (meilleur candidat,
    ///    catégorie musique)
    /// 3. Écarte les diffusions en direct via le détail de la ressource
    /// 4. Met en cache le résultat définitif; les erreurs transitoires ne
    ///    sont pas mises en cache
    pub async fn resolve(&self, title: &str, artist: &str) -> Option<String> {
        let query = build_query(title, artist);
        if query.is_empty() {
            return None;
        }

        if let Some(cached) = self.cache.get_search(&query).await {
            debug!(query, "Search cache hit");
            return cached;
        }

        // Résolveur désactivé : déjà signalé à la construction
        let client = self.client.as_ref()?;

        match client.search_top_video(&query).await {
            Ok(Some(resource_id)) => {
                if self.is_live(&resource_id).await {
                    debug!(query, resource_id, "Top candidate is a live broadcast, skipping");
                    self.cache.put_search(query, None).await;
                    return None;
                }

                debug!(query, resource_id, "Resolved audio source");
                self.cache.put_search(query, Some(resource_id.clone())).await;
                Some(resource_id)
            }
            Ok(None) => {
                debug!(query, "No candidate found");
                self.cache.put_search(query, None).await;
                None
            }
            Err(e) => {
                // Erreur transitoire : pas de mise en cache, on pourra retenter
                warn!(query, "Search failed: {}", e);
                None
            }
        }
    }

    /// Récupère le détail d'une ressource, via le cache (1h de TTL)
    pub async fn details(&self, resource_id: &str) -> Option<VideoDetails> {
        if let Some(details) = self.cache.get_details(resource_id).await {
            return Some(details);
        }

        let client = self.client.as_ref()?;
        match client.video_details(resource_id).await {
            Ok(Some(details)) => {
                self.cache
                    .put_details(resource_id.to_string(), details.clone())
                    .await;
                Some(details)
            }
            Ok(None) => None,
            Err(e) => {
                warn!(resource_id, "Detail lookup failed: {}", e);
                None
            }
        }
    }

    /// Vérifie si une ressource est une diffusion en direct
    ///
    /// Un détail indisponible n'écarte pas la ressource.
    async fn is_live(&self, resource_id: &str) -> bool {
        self.details(resource_id)
            .await
            .map(|d| d.live)
            .unwrap_or(false)
    }
}

/// Construit la requête de recherche à partir du titre et de l'artiste
fn build_query(title: &str, artist: &str) -> String {
    format!("{} {}", artist.trim(), title.trim())
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_query() {
        assert_eq!(
            build_query("Around the World", "Daft Punk"),
            "Daft Punk Around the World"
        );
        assert_eq!(build_query("Solo Track", ""), "Solo Track");
        assert_eq!(build_query("", ""), "");
    }

    #[tokio::test]
    async fn test_disabled_resolver_always_returns_none() {
        let resolver = SourceResolver::new(None);

        assert!(!resolver.is_enabled());
        assert!(resolver.resolve("Any Song", "Any Artist").await.is_none());
        assert!(resolver.details("abc").await.is_none());
    }
}
