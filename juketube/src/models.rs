//! Modèles JSON de l'API de recherche de la plateforme vidéo
//!
//! Seuls les champs consommés par le backend sont désérialisés; le reste de
//! la réponse est ignoré.

use serde::Deserialize;

/// Réponse de l'endpoint de recherche
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub items: Vec<SearchItem>,
}

/// Un résultat de recherche
#[derive(Debug, Clone, Deserialize)]
pub struct SearchItem {
    pub id: SearchItemId,
    #[serde(default)]
    pub snippet: Option<Snippet>,
}

/// Identifiant d'un résultat de recherche
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchItemId {
    #[serde(default)]
    pub video_id: Option<String>,
}

/// Métadonnées descriptives d'une vidéo
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub channel_title: Option<String>,
    /// "none", "live" ou "upcoming"
    #[serde(default)]
    pub live_broadcast_content: Option<String>,
}

/// Réponse de l'endpoint de détail des vidéos
#[derive(Debug, Clone, Deserialize)]
pub struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<VideoItem>,
}

/// Détail brut d'une vidéo
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoItem {
    pub id: String,
    #[serde(default)]
    pub snippet: Option<Snippet>,
    #[serde(default)]
    pub content_details: Option<ContentDetails>,
}

/// Détails de contenu d'une vidéo
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentDetails {
    /// Durée au format ISO 8601 (ex: "PT3M42S")
    #[serde(default)]
    pub duration: Option<String>,
}

/// Détail consolidé d'une vidéo, tel qu'exposé par le client
#[derive(Debug, Clone)]
pub struct VideoDetails {
    /// Identifiant de la ressource
    pub id: String,
    /// Titre de la vidéo
    pub title: Option<String>,
    /// Durée ISO 8601, absente pour les directs
    pub duration: Option<String>,
    /// Diffusion en direct ou programmée
    pub live: bool,
}

impl VideoDetails {
    pub(crate) fn from_item(item: VideoItem) -> Self {
        let live = item
            .snippet
            .as_ref()
            .and_then(|s| s.live_broadcast_content.as_deref())
            .map(|c| c == "live" || c == "upcoming")
            .unwrap_or(false);

        Self {
            id: item.id,
            title: item.snippet.and_then(|s| s.title),
            duration: item.content_details.and_then(|c| c.duration),
            live,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_response_parsing() {
        let json = r#"{
            "items": [
                {
                    "id": {"kind": "video", "videoId": "abc123xyz00"},
                    "snippet": {"title": "A Song", "channelTitle": "An Artist"}
                }
            ]
        }"#;

        let parsed: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.items.len(), 1);
        assert_eq!(parsed.items[0].id.video_id.as_deref(), Some("abc123xyz00"));
    }

    #[test]
    fn test_video_details_live_flag() {
        let json = r#"{
            "id": "abc",
            "snippet": {"title": "Stream", "liveBroadcastContent": "live"},
            "contentDetails": {}
        }"#;

        let item: VideoItem = serde_json::from_str(json).unwrap();
        let details = VideoDetails::from_item(item);
        assert!(details.live);
        assert!(details.duration.is_none());
    }
}
