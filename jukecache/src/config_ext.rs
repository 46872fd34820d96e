//! Extension de configuration pour le cache audio
//!
//! Ce module fournit le trait `CacheConfigExt` qui ajoute à
//! `jukeconfig::Config` les accesseurs typés du cache audio.

use anyhow::Result;
use jukeconfig::Config;
use serde_yaml::Value;
use std::time::Duration;

/// Limite par défaut du cache (nombre d'entrées)
const DEFAULT_CACHE_LIMIT: usize = 20;

/// Âge maximal par défaut des fichiers pour le janitor (minutes)
const DEFAULT_JANITOR_MAX_AGE_MINUTES: u64 = 120;

/// Intervalle par défaut entre deux balayages du janitor (minutes)
const DEFAULT_JANITOR_INTERVAL_MINUTES: u64 = 30;

/// Trait d'extension pour la configuration du cache audio
///
/// # Exemple
///
/// ```rust,no_run
/// use jukeconfig::get_config;
/// use jukecache::CacheConfigExt;
///
/// let config = get_config();
/// let dir = config.get_audio_cache_dir()?;
/// let limit = config.get_audio_cache_limit();
/// # Ok::<(), anyhow::Error>(())
/// ```
pub trait CacheConfigExt {
    /// Répertoire de stockage du cache audio (créé s'il n'existe pas)
    fn get_audio_cache_dir(&self) -> Result<String>;

    /// Limite du cache en nombre d'entrées
    fn get_audio_cache_limit(&self) -> usize;

    /// Âge maximal des fichiers toléré par le janitor
    fn get_janitor_max_age(&self) -> Duration;

    /// Intervalle entre deux balayages périodiques du janitor
    ///
    /// `None` si le balayage périodique est désactivé (intervalle à 0).
    fn get_janitor_interval(&self) -> Option<Duration>;
}

fn get_u64_or(config: &Config, path: &[&str], default: u64) -> u64 {
    match config.get_value(path) {
        Ok(Value::Number(n)) => n.as_u64().unwrap_or(default),
        _ => default,
    }
}

impl CacheConfigExt for Config {
    fn get_audio_cache_dir(&self) -> Result<String> {
        self.get_managed_dir(&["cache", "audio", "directory"], "cache_audio")
    }

    fn get_audio_cache_limit(&self) -> usize {
        get_u64_or(
            self,
            &["cache", "audio", "limit"],
            DEFAULT_CACHE_LIMIT as u64,
        ) as usize
    }

    fn get_janitor_max_age(&self) -> Duration {
        let minutes = get_u64_or(
            self,
            &["cache", "audio", "janitor", "max_age_minutes"],
            DEFAULT_JANITOR_MAX_AGE_MINUTES,
        );
        Duration::from_secs(minutes * 60)
    }

    fn get_janitor_interval(&self) -> Option<Duration> {
        let minutes = get_u64_or(
            self,
            &["cache", "audio", "janitor", "interval_minutes"],
            DEFAULT_JANITOR_INTERVAL_MINUTES,
        );
        if minutes == 0 {
            None
        } else {
            Some(Duration::from_secs(minutes * 60))
        }
    }
}
