//! Balayage des fichiers de cache périmés
//!
//! L'index du cache ne survit pas au redémarrage du processus : après un
//! restart, les fichiers décodés encore présents dans le répertoire sont
//! orphelins. Le janitor supprime au démarrage (et périodiquement si
//! configuré) tout fichier audio dont la date de modification est plus
//! vieille que l'âge maximal, indépendamment de l'éviction LRU de l'index.

use crate::cache::AUDIO_FILE_EXTENSION;
use anyhow::Result;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Âge maximal par défaut d'un fichier de cache (2 heures)
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(2 * 60 * 60);

/// Supprime les fichiers audio du répertoire plus vieux que `max_age`
///
/// Seuls les fichiers portant l'extension audio du cache sont considérés;
/// la base du tri est la date de dernière modification. Les erreurs de
/// suppression sont loggées et n'interrompent pas le balayage.
///
/// # Returns
///
/// Le nombre de fichiers supprimés
pub async fn sweep(dir: &Path, max_age: Duration) -> Result<usize> {
    let now = SystemTime::now();
    let mut removed = 0;

    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) != Some(AUDIO_FILE_EXTENSION) {
            continue;
        }

        let Ok(meta) = entry.metadata().await else {
            continue;
        };
        let Ok(modified) = meta.modified() else {
            continue;
        };

        let age = match now.duration_since(modified) {
            Ok(age) => age,
            // Horloge dans le futur : fichier considéré comme frais
            Err(_) => continue,
        };

        if age <= max_age {
            continue;
        }

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                info!(
                    file = %path.display(),
                    age_secs = age.as_secs(),
                    "Janitor removed stale cache file"
                );
                removed += 1;
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                warn!(file = %path.display(), "Janitor could not remove file: {}", e);
            }
        }
    }

    Ok(removed)
}

/// Lance un balayage périodique en tâche de fond
///
/// Le premier tick de l'intervalle est consommé immédiatement : le balayage
/// de démarrage est à la charge de l'appelant.
pub fn spawn_periodic(dir: PathBuf, max_age: Duration, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if let Err(e) = sweep(&dir, max_age).await {
                warn!(directory = %dir.display(), "Janitor sweep failed: {}", e);
            }
        }
    })
}
