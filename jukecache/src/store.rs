//! Index en mémoire des fichiers audio matérialisés
//!
//! L'index associe un identifiant de ressource au fichier décodé sur disque,
//! avec sa taille et sa date de dernier accès. Il est borné en nombre
//! d'entrées : au-delà de la limite, les entrées les moins récemment
//! utilisées sont retirées. L'index ne survit pas au redémarrage du
//! processus; le janitor récupère les fichiers devenus orphelins.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

/// Entrée de l'index : un fichier audio complètement écrit sur disque.
#[derive(Debug, Clone)]
pub struct StoreEntry {
    /// Chemin du fichier décodé (propriété exclusive du cache)
    pub path: PathBuf,
    /// Taille du fichier en octets
    pub size: u64,
    /// Nombre d'accès à l'entrée
    pub hits: u64,
    /// Date du dernier accès
    pub last_access: DateTime<Utc>,
}

/// Index en mémoire, partagé entre les tâches du coordinateur.
///
/// Le verrou interne n'est jamais conservé au-delà d'une opération sur la
/// map; les suppressions de fichiers se font hors verrou, sur les victimes
/// retournées par [`Store::evict_to_limit`].
#[derive(Debug, Default)]
pub struct Store {
    entries: Mutex<HashMap<String, StoreEntry>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enregistre un fichier complètement écrit.
    ///
    /// N'est appelé qu'après un décodage réussi : un téléchargement partiel
    /// n'entre jamais dans l'index.
    pub fn insert(&self, resource_id: &str, path: PathBuf, size: u64) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(
            resource_id.to_string(),
            StoreEntry {
                path,
                size,
                hits: 0,
                last_access: Utc::now(),
            },
        );
    }

    /// Récupère une entrée sans mettre à jour ses statistiques d'accès.
    pub fn get(&self, resource_id: &str) -> Option<StoreEntry> {
        let entries = self.entries.lock().unwrap();
        entries.get(resource_id).cloned()
    }

    /// Récupère une entrée et met à jour sa date de dernier accès.
    pub fn touch(&self, resource_id: &str) -> Option<StoreEntry> {
        let mut entries = self.entries.lock().unwrap();
        let entry = entries.get_mut(resource_id)?;
        entry.hits += 1;
        entry.last_access = Utc::now();
        Some(entry.clone())
    }

    /// Retire une entrée de l'index et la retourne.
    ///
    /// La suppression du fichier sous-jacent est à la charge de l'appelant.
    pub fn remove(&self, resource_id: &str) -> Option<StoreEntry> {
        let mut entries = self.entries.lock().unwrap();
        entries.remove(resource_id)
    }

    /// Nombre d'entrées dans l'index.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Applique la politique d'éviction LRU.
    ///
    /// Retire les entrées les plus anciennes (dernier accès le plus vieux)
    /// jusqu'à ce que l'index contienne au plus `max_entries` éléments, et
    /// retourne les victimes pour que l'appelant supprime leurs fichiers.
    pub fn evict_to_limit(&self, max_entries: usize) -> Vec<(String, StoreEntry)> {
        let mut entries = self.entries.lock().unwrap();
        let mut victims = Vec::new();

        while entries.len() > max_entries {
            let oldest = entries
                .iter()
                .min_by_key(|(_, e)| e.last_access)
                .map(|(k, _)| k.clone());

            match oldest {
                Some(key) => {
                    if let Some(entry) = entries.remove(&key) {
                        victims.push((key, entry));
                    }
                }
                None => break,
            }
        }

        victims
    }

    /// Retourne une copie de toutes les entrées, triées par hits décroissants.
    pub fn snapshot(&self) -> Vec<(String, StoreEntry)> {
        let entries = self.entries.lock().unwrap();
        let mut all: Vec<_> = entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        all.sort_by(|a, b| b.1.hits.cmp(&a.1.hits));
        all
    }

    /// Vide l'index et retourne toutes les entrées retirées.
    pub fn drain(&self) -> Vec<(String, StoreEntry)> {
        let mut entries = self.entries.lock().unwrap();
        entries.drain().collect()
    }
}
