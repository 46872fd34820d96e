//! Extraction audio via l'outil externe
//!
//! Implémente [`jukecache::AudioDecoder`] en invoquant le sous-processus
//! d'extraction (yt-dlp) : une invocation par requête, sans état interne.
//! Le profil d'arguments est figé : meilleur flux audio m4a disponible,
//! sortie vers un chemin cible, pas de playlist, mode silencieux, et les
//! contournements anti-blocage de la plateforme (identité de client
//! alternative, user-agent navigateur, contournement géographique,
//! certificats non vérifiés).

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use jukecache::AudioDecoder;
use jukeconfig::Config;
use std::path::Path;
use tokio::process::Command;
use tracing::debug;

use crate::config_ext::TubeConfigExt;

/// Binaire d'extraction par défaut
pub const DEFAULT_BINARY: &str = "yt-dlp";

/// URL de lecture de la plateforme
const WATCH_URL_BASE: &str = "https://www.youtube.com/watch?v=";

/// User-Agent présenté par l'extracteur
const EXTRACTOR_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:122.0) Gecko/20100101 Firefox/122.0";

/// Décodeur audio basé sur le sous-processus d'extraction
pub struct ExtractorDecoder {
    binary: String,
}

impl ExtractorDecoder {
    /// Crée un décodeur invoquant le binaire donné
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Crée un décodeur depuis la configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.get_decoder_binary())
    }

    /// Construit la ligne d'arguments de l'extracteur
    fn build_args(resource_id: &str, dest: &Path) -> Vec<String> {
        vec![
            "-f".to_string(),
            "bestaudio[ext=m4a]/bestaudio".to_string(),
            "-o".to_string(),
            dest.to_string_lossy().to_string(),
            "--no-playlist".to_string(),
            "--quiet".to_string(),
            "--no-warnings".to_string(),
            "--geo-bypass".to_string(),
            "--no-check-certificate".to_string(),
            "--user-agent".to_string(),
            EXTRACTOR_USER_AGENT.to_string(),
            "--extractor-args".to_string(),
            "youtube:player_client=android".to_string(),
            format!("{}{}", WATCH_URL_BASE, resource_id),
        ]
    }
}

#[async_trait]
impl AudioDecoder for ExtractorDecoder {
    /// Matérialise la ressource dans `dest`
    ///
    /// Succès si et seulement si le processus sort avec le code 0 **et** que
    /// le fichier de sortie existe; toute autre issue est une erreur, avec
    /// un extrait de stderr pour le diagnostic.
    async fn decode(&self, resource_id: &str, dest: &Path) -> Result<()> {
        let args = Self::build_args(resource_id, dest);
        debug!(resource_id, binary = %self.binary, "Spawning audio extractor");

        let output = Command::new(&self.binary)
            .args(&args)
            .output()
            .await
            .map_err(|e| anyhow!("failed to spawn {}: {}", self.binary, e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "{} exited with {}: {}",
                self.binary,
                output.status,
                stderr.trim()
            );
        }

        if !dest.exists() {
            bail!(
                "{} exited successfully but produced no file at {}",
                self.binary,
                dest.display()
            );
        }

        Ok(())
    }
}
