//! Coordinateur du cache audio
//!
//! Ce module orchestre l'index en mémoire et le décodeur externe : les hits
//! sont servis directement, les requêtes concurrentes pour un même
//! identifiant sont fusionnées sur un unique décodage, et chaque insertion
//! réussie déclenche l'éviction LRU si la limite est dépassée.

use crate::config_ext::CacheConfigExt;
use crate::decoder::AudioDecoder;
use crate::download::Download;
use crate::store::Store;
use anyhow::{anyhow, Result};
use jukeconfig::Config;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Extension des fichiers audio décodés
pub const AUDIO_FILE_EXTENSION: &str = "m4a";

/// Génère la clé de fichier à partir d'un identifiant de ressource
///
/// Utilise SHA1 pour hasher l'identifiant et retourne sa représentation
/// hexadécimale (40 caractères). Le nom de fichier est ainsi déterministe :
/// deux requêtes pour la même ressource visent le même fichier.
pub fn pk_from_resource_id(resource_id: &str) -> String {
    use sha1::{Digest, Sha1};
    let mut hasher = Sha1::new();
    hasher.update(resource_id.as_bytes());
    hex::encode(hasher.finalize())
}

/// Fichier audio servi depuis le cache
#[derive(Debug, Clone)]
pub struct CachedTrack {
    /// Identifiant de la ressource
    pub resource_id: String,
    /// Chemin du fichier décodé
    pub path: PathBuf,
    /// Taille du fichier en octets
    pub size: u64,
}

/// Cache des pistes audio décodées
///
/// Gère le décodage, le stockage borné et la récupération des fichiers
/// audio. L'index et la map des décodages en vol sont la propriété exclusive
/// de ce type : aucun autre composant n'écrit dedans.
///
/// Note : ce type est conçu pour être utilisé derrière un `Arc<AudioCache>`.
/// La synchronisation est gérée par le Mutex interne de l'index et par le
/// RwLock de la map des décodages en vol.
pub struct AudioCache {
    /// Répertoire de stockage
    dir: PathBuf,
    /// Limite de taille du cache (nombre d'éléments)
    limit: usize,
    /// Index des fichiers matérialisés
    store: Arc<Store>,
    /// Map des décodages en cours (resource_id -> Download)
    downloads: Arc<RwLock<HashMap<String, Arc<Download>>>>,
    /// Décodeur externe
    decoder: Arc<dyn AudioDecoder>,
}

impl AudioCache {
    /// Crée un nouveau cache audio
    ///
    /// # Arguments
    ///
    /// * `dir` - Répertoire de stockage du cache
    /// * `limit` - Limite de taille du cache (nombre d'éléments)
    /// * `decoder` - Décodeur matérialisant les ressources externes
    pub fn new(dir: impl AsRef<Path>, limit: usize, decoder: Arc<dyn AudioDecoder>) -> Result<Self> {
        let directory = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&directory)?;

        Ok(Self {
            dir: directory,
            limit,
            store: Arc::new(Store::new()),
            downloads: Arc::new(RwLock::new(HashMap::new())),
            decoder,
        })
    }

    /// Crée un cache audio depuis la configuration
    pub fn from_config(config: &Config, decoder: Arc<dyn AudioDecoder>) -> Result<Self> {
        let dir = config.get_audio_cache_dir()?;
        let limit = config.get_audio_cache_limit();
        Self::new(dir, limit, decoder)
    }

    /// Retourne le répertoire du cache
    pub fn cache_dir(&self) -> &Path {
        &self.dir
    }

    /// Retourne l'index du cache
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Construit le chemin du fichier décodé pour une ressource
    ///
    /// Format: `{sha1(resource_id)}.m4a`
    pub fn file_path(&self, resource_id: &str) -> PathBuf {
        self.dir.join(format!(
            "{}.{}",
            pk_from_resource_id(resource_id),
            AUDIO_FILE_EXTENSION
        ))
    }

    /// Récupère le fichier audio d'une ressource, en le décodant au besoin
    ///
    /// # Workflow
    ///
    /// 1. Hit : l'index connaît la ressource et le fichier existe encore sur
    ///    disque → mise à jour du dernier accès et retour immédiat.
    /// 2. Un décodage est déjà en vol pour cet identifiant → s'y attacher et
    ///    attendre son règlement (fusion des requêtes concurrentes).
    /// 3. Sinon, créer le décodage et le lancer en tâche de fond.
    ///
    /// Les étapes 2 et 3 sont effectuées sous le verrou en écriture de la
    /// map des décodages : deux appelants ne peuvent pas constater tous les
    /// deux l'absence de décodage et en lancer chacun un.
    ///
    /// # Errors
    ///
    /// Retourne une erreur si le décodage échoue; l'échec n'est pas mis en
    /// cache et une requête ultérieure pourra retenter.
    pub async fn get_or_download(&self, resource_id: &str) -> Result<CachedTrack> {
        // 1. Hit : retour immédiat sans décodage
        if let Some(track) = self.lookup(resource_id) {
            debug!(resource_id, "Cache hit");
            return Ok(track);
        }

        // 2/3. S'attacher au décodage en vol, ou en créer un, atomiquement
        let download = {
            let mut downloads = self.downloads.write().await;

            // Re-vérifier l'index sous le verrou : un décodage a pu se
            // régler entre le premier lookup et la prise du verrou
            if let Some(track) = self.lookup(resource_id) {
                return Ok(track);
            }

            match downloads.get(resource_id) {
                Some(existing) => {
                    debug!(resource_id, "Joining in-flight decode");
                    existing.clone()
                }
                None => {
                    debug!(resource_id, "Starting decode");
                    let download = Download::new(resource_id);
                    downloads.insert(resource_id.to_string(), download.clone());
                    self.spawn_decode(resource_id.to_string(), download.clone());
                    download
                }
            }
        };

        // 4. Attendre le règlement du décodage
        download
            .wait_until_finished()
            .await
            .map_err(|e| anyhow!("decode failed for {}: {}", resource_id, e))?;

        self.lookup(resource_id)
            .ok_or_else(|| anyhow!("decoded file missing for {}", resource_id))
    }

    /// Cherche une entrée vivante dans l'index
    ///
    /// Met à jour la date de dernier accès. Une entrée dont le fichier a
    /// disparu du disque (janitor, suppression manuelle) est retirée de
    /// l'index et traitée comme un miss.
    fn lookup(&self, resource_id: &str) -> Option<CachedTrack> {
        let entry = self.store.touch(resource_id)?;

        if entry.path.exists() {
            Some(CachedTrack {
                resource_id: resource_id.to_string(),
                path: entry.path,
                size: entry.size,
            })
        } else {
            warn!(resource_id, "Cached file vanished from disk, dropping index entry");
            self.store.remove(resource_id);
            None
        }
    }

    /// Lance le décodage en tâche de fond
    ///
    /// La tâche règle le `Download` (succès ou échec) puis retire son entrée
    /// de la map des décodages en vol, dans tous les cas : un décodage
    /// échoué ne bloque jamais les tentatives suivantes.
    fn spawn_decode(&self, resource_id: String, download: Arc<Download>) {
        let store = self.store.clone();
        let downloads = self.downloads.clone();
        let decoder = self.decoder.clone();
        let dest = self.file_path(&resource_id);
        let limit = self.limit;

        tokio::spawn(async move {
            let started = Instant::now();

            match decoder.decode(&resource_id, &dest).await {
                Ok(()) => match tokio::fs::metadata(&dest).await {
                    Ok(meta) => {
                        store.insert(&resource_id, dest.clone(), meta.len());

                        // Éviction synchrone juste après l'insertion
                        let victims = store.evict_to_limit(limit);
                        for (victim_id, victim) in victims {
                            info!(
                                resource_id = %victim_id,
                                file = %victim.path.display(),
                                "LRU eviction"
                            );
                            if let Err(e) = tokio::fs::remove_file(&victim.path).await {
                                if e.kind() != std::io::ErrorKind::NotFound {
                                    warn!(
                                        resource_id = %victim_id,
                                        "Error deleting evicted file: {}",
                                        e
                                    );
                                }
                            }
                        }

                        info!(
                            resource_id = %resource_id,
                            size = meta.len(),
                            elapsed_ms = started.elapsed().as_millis() as u64,
                            "Decoded audio registered in cache"
                        );
                        download.settle_ok().await;
                    }
                    Err(e) => {
                        warn!(resource_id = %resource_id, "Decoder produced no readable file: {}", e);
                        download
                            .settle_err(format!("decoder produced no readable file: {}", e))
                            .await;
                    }
                },
                Err(e) => {
                    warn!(resource_id = %resource_id, "Audio decode failed: {}", e);
                    download.settle_err(e.to_string()).await;
                }
            }

            // Retirer l'entrée en vol, succès ou échec
            downloads.write().await.remove(&resource_id);
        });
    }

    /// Récupère l'objet Download pour une ressource (si un décodage est en cours)
    pub async fn get_download(&self, resource_id: &str) -> Option<Arc<Download>> {
        let downloads = self.downloads.read().await;
        downloads.get(resource_id).cloned()
    }

    /// Supprime une entrée du cache et son fichier
    pub async fn delete_track(&self, resource_id: &str) -> Result<()> {
        let entry = self
            .store
            .remove(resource_id)
            .ok_or_else(|| anyhow!("resource {} not in cache", resource_id))?;

        // Oublie un décodage en cours pour cette clé
        self.downloads.write().await.remove(resource_id);

        if let Err(e) = tokio::fs::remove_file(&entry.path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                return Err(e.into());
            }
        }

        Ok(())
    }

    /// Supprime toutes les entrées du cache et leurs fichiers
    ///
    /// # Returns
    ///
    /// Le nombre d'entrées supprimées
    pub async fn purge(&self) -> Result<usize> {
        let drained = self.store.drain();
        let count = drained.len();

        for (resource_id, entry) in drained {
            if let Err(e) = tokio::fs::remove_file(&entry.path).await {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(resource_id = %resource_id, "Error deleting cached file: {}", e);
                }
            }
        }

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pk_is_deterministic_hex_sha1() {
        let pk = pk_from_resource_id("dQw4w9WgXcQ");
        assert_eq!(pk.len(), 40);
        assert_eq!(pk, pk_from_resource_id("dQw4w9WgXcQ"));
        assert_ne!(pk, pk_from_resource_id("other"));
    }
}
