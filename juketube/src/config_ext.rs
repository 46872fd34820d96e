//! Extension de configuration pour la source vidéo
//!
//! Ce module fournit le trait `TubeConfigExt` qui ajoute à
//! `jukeconfig::Config` les accesseurs de la clé d'API de recherche, du
//! binaire d'extraction et des en-têtes du proxy de prévisualisation.

use anyhow::Result;
use jukeconfig::Config;
use serde_yaml::Value;

/// Referer par défaut exigé par le fournisseur de prévisualisation
const DEFAULT_PREVIEW_REFERER: &str = "https://www.deezer.com/";

/// User-Agent par défaut du proxy de prévisualisation
const DEFAULT_PREVIEW_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:122.0) Gecko/20100101 Firefox/122.0";

/// Trait d'extension pour la configuration de la source vidéo
///
/// # Exemple
///
/// ```rust,ignore
/// use jukeconfig::get_config;
/// use juketube::TubeConfigExt;
///
/// let config = get_config();
/// match config.get_tube_api_key() {
///     Ok(Some(key)) => println!("Search API configured"),
///     _ => println!("Source resolution disabled"),
/// }
/// ```
pub trait TubeConfigExt {
    /// Clé de l'API de recherche, `None` si non configurée
    fn get_tube_api_key(&self) -> Result<Option<String>>;

    /// Définit la clé de l'API de recherche
    fn set_tube_api_key(&self, key: &str) -> Result<()>;

    /// Code région pour restreindre les recherches (ISO 3166-1 alpha-2)
    fn get_tube_region(&self) -> Option<String>;

    /// Binaire d'extraction audio (défaut: `yt-dlp`)
    fn get_decoder_binary(&self) -> String;

    /// Referer présenté au fournisseur de prévisualisation
    fn get_preview_referer(&self) -> String;

    /// User-Agent présenté au fournisseur de prévisualisation
    fn get_preview_user_agent(&self) -> String;
}

fn get_string(config: &Config, path: &[&str]) -> Option<String> {
    match config.get_value(path) {
        Ok(Value::String(s)) if !s.is_empty() => Some(s),
        _ => None,
    }
}

impl TubeConfigExt for Config {
    fn get_tube_api_key(&self) -> Result<Option<String>> {
        Ok(get_string(self, &["source", "tube", "api_key"]))
    }

    fn set_tube_api_key(&self, key: &str) -> Result<()> {
        self.set_value(
            &["source", "tube", "api_key"],
            Value::String(key.to_string()),
        )
    }

    fn get_tube_region(&self) -> Option<String> {
        get_string(self, &["source", "tube", "region"])
    }

    fn get_decoder_binary(&self) -> String {
        get_string(self, &["decoder", "binary"]).unwrap_or_else(|| crate::decoder::DEFAULT_BINARY.to_string())
    }

    fn get_preview_referer(&self) -> String {
        get_string(self, &["preview", "referer"])
            .unwrap_or_else(|| DEFAULT_PREVIEW_REFERER.to_string())
    }

    fn get_preview_user_agent(&self) -> String {
        get_string(self, &["preview", "user_agent"])
            .unwrap_or_else(|| DEFAULT_PREVIEW_USER_AGENT.to_string())
    }
}
