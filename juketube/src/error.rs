//! Gestion des erreurs pour la source vidéo externe

use thiserror::Error;

/// Type Result personnalisé pour juketube
pub type Result<T> = std::result::Result<T, TubeError>;

/// Erreurs possibles lors de l'utilisation de la source vidéo
#[derive(Error, Debug)]
pub enum TubeError {
    /// Clé d'API de recherche absente de la configuration
    #[error("Search API key is not configured")]
    MissingApiKey,

    /// Erreur d'authentification (clé invalide)
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Ressource non trouvée
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Quota de l'API dépassé (rate limiting)
    #[error("Search API quota exceeded, please try again later")]
    QuotaExceeded,

    /// Erreur HTTP
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Erreur de parsing JSON
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Erreur de l'API de recherche
    #[error("Search API error (code {code}): {message}")]
    ApiError { code: u16, message: String },

    /// Échec du décodage audio (sous-processus d'extraction)
    #[error("Audio decode failed: {0}")]
    DecodeFailed(String),

    /// Erreur de la source amont (prévisualisation)
    #[error("Upstream error: {0}")]
    Upstream(String),
}

impl TubeError {
    /// Crée une erreur API depuis un code de statut HTTP et un message
    ///
    /// Les quotas dépassés se présentent soit en 429, soit en 403 avec un
    /// corps mentionnant le quota.
    pub fn from_status_code(code: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match code {
            403 if message.contains("quota") => Self::QuotaExceeded,
            401 | 403 => Self::Unauthorized(message),
            404 => Self::NotFound(message),
            429 => Self::QuotaExceeded,
            _ => Self::ApiError { code, message },
        }
    }

    /// Vérifie si l'erreur est une erreur de credentials
    pub fn is_auth_error(&self) -> bool {
        matches!(self, TubeError::Unauthorized(_) | TubeError::MissingApiKey)
    }

    /// Vérifie si l'erreur est un dépassement de quota
    pub fn is_quota(&self) -> bool {
        matches!(self, TubeError::QuotaExceeded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_code() {
        assert!(matches!(
            TubeError::from_status_code(401, "bad key"),
            TubeError::Unauthorized(_)
        ));
        assert!(TubeError::from_status_code(429, "slow down").is_quota());
        assert!(TubeError::from_status_code(403, "quotaExceeded").is_quota());
        assert!(TubeError::from_status_code(403, "forbidden").is_auth_error());
        assert!(matches!(
            TubeError::from_status_code(500, "oops"),
            TubeError::ApiError { code: 500, .. }
        ));
    }
}
