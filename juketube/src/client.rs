//! Client bas-niveau de l'API de recherche
//!
//! Ce module encapsule les appels HTTP à l'API de la plateforme vidéo :
//! recherche du meilleur candidat pour une requête texte et consultation du
//! détail d'une ressource. L'URL de base est injectable pour permettre aux
//! tests de pointer sur un serveur local.

use crate::error::{Result, TubeError};
use crate::models::{SearchResponse, VideoDetails, VideoListResponse};
use std::time::Duration;
use tracing::debug;

/// URL de base de l'API de recherche
pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// Catégorie "Musique" de la plateforme
const MUSIC_CATEGORY_ID: &str = "10";

/// Client de l'API de recherche
pub struct TubeClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    region: Option<String>,
}

impl TubeClient {
    /// Crée un nouveau client avec l'URL de base par défaut
    ///
    /// # Arguments
    ///
    /// * `api_key` - Clé d'API de recherche
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_API_BASE)
    }

    /// Crée un client pointant sur une URL de base spécifique
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            http,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            region: None,
        })
    }

    /// Restreint les recherches à une région (code ISO 3166-1 alpha-2)
    pub fn with_region(mut self, region: Option<String>) -> Self {
        self.region = region.filter(|r| !r.is_empty());
        self
    }

    /// Recherche le meilleur candidat vidéo pour une requête texte
    ///
    /// La recherche est limitée à la catégorie musique et au premier
    /// résultat. Retourne `None` si l'API ne propose aucun candidat.
    pub async fn search_top_video(&self, query: &str) -> Result<Option<String>> {
        let url = format!("{}/search", self.base_url);

        let mut params = vec![
            ("part", "snippet"),
            ("type", "video"),
            ("videoCategoryId", MUSIC_CATEGORY_ID),
            ("maxResults", "1"),
            ("q", query),
            ("key", self.api_key.as_str()),
        ];
        if let Some(ref region) = self.region {
            params.push(("regionCode", region.as_str()));
        }

        debug!(query, "Searching video source");
        let response = self.http.get(&url).query(&params).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TubeError::from_status_code(status.as_u16(), message));
        }

        let body: SearchResponse = response.json().await?;
        Ok(body.items.into_iter().next().and_then(|item| item.id.video_id))
    }

    /// Récupère le détail d'une ressource
    ///
    /// Retourne `None` si la ressource n'existe pas (ou plus).
    pub async fn video_details(&self, resource_id: &str) -> Result<Option<VideoDetails>> {
        let url = format!("{}/videos", self.base_url);

        debug!(resource_id, "Fetching video details");
        let response = self
            .http
            .get(&url)
            .query(&[
                ("part", "snippet,contentDetails"),
                ("id", resource_id),
                ("key", &self.api_key),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TubeError::from_status_code(status.as_u16(), message));
        }

        let body: VideoListResponse = response.json().await?;
        Ok(body.items.into_iter().next().map(VideoDetails::from_item))
    }
}
