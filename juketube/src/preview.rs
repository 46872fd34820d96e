//! Proxy de prévisualisation (fallback non mis en cache)
//!
//! Quand la voie principale (résolution + décodage) n'est pas disponible, le
//! backend proxifie directement l'extrait public de la source secondaire
//! vers le client, sans créer d'entrée de cache. Le fournisseur amont rejette
//! les clients HTTP par défaut : les en-têtes `User-Agent` et `Referer`
//! attendus sont posés sur la requête sortante.
//!
//! La déconnexion du client abandonne le corps de la réponse, ce qui détruit
//! la connexion amont. Un échec amont avant l'envoi des en-têtes répond 502;
//! une coupure en cours de streaming termine la réponse sans tenter d'écrire
//! un corps d'erreur.

use crate::config_ext::TubeConfigExt;
use axum::{
    Json, Router,
    body::Body,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use jukecache::ErrorResponse;
use jukeconfig::Config;
use serde::Deserialize;
use std::time::Duration;
use tracing::warn;

/// Content-Type des extraits de prévisualisation
pub const PREVIEW_CONTENT_TYPE: &str = "audio/mpeg";

/// État du proxy de prévisualisation
#[derive(Clone)]
pub struct PreviewState {
    client: reqwest::Client,
    referer: String,
    user_agent: String,
}

impl PreviewState {
    /// Crée l'état du proxy avec les en-têtes exigés par le fournisseur
    pub fn new(referer: impl Into<String>, user_agent: impl Into<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            referer: referer.into(),
            user_agent: user_agent.into(),
        })
    }

    /// Crée l'état du proxy depuis la configuration
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Self::new(config.get_preview_referer(), config.get_preview_user_agent())
    }
}

/// Paramètres de la route de prévisualisation
#[derive(Debug, Deserialize)]
pub struct PreviewQuery {
    /// URL absolue de l'extrait amont
    pub src: String,
}

/// Handler pour GET /audio/preview?src={url}
///
/// Proxifie l'extrait amont vers le client sans mise en cache.
pub async fn preview_proxy(
    State(state): State<PreviewState>,
    Query(params): Query<PreviewQuery>,
) -> Response {
    let url = params.src;

    if !url.starts_with("https://") && !url.starts_with("http://") {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "INVALID_URL".to_string(),
                message: "Preview source must be an absolute HTTP(S) URL".to_string(),
            }),
        )
            .into_response();
    }

    let upstream = state
        .client
        .get(&url)
        .header("user-agent", &state.user_agent)
        .header("referer", &state.referer)
        .send()
        .await;

    let upstream = match upstream {
        Ok(resp) if resp.status().is_success() => resp,
        Ok(resp) => {
            warn!(url, status = %resp.status(), "Preview upstream rejected the request");
            return (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: "UPSTREAM_ERROR".to_string(),
                    message: format!("Preview source answered {}", resp.status()),
                }),
            )
                .into_response();
        }
        Err(e) => {
            warn!(url, "Preview upstream unreachable: {}", e);
            return (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: "UPSTREAM_ERROR".to_string(),
                    message: "Preview source is unreachable".to_string(),
                }),
            )
                .into_response();
        }
    };

    let content_length = upstream.content_length();

    // Piping direct du corps amont vers le client; une coupure amont en
    // cours de route termine la réponse sans corps d'erreur
    let body = Body::from_stream(upstream.bytes_stream());

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header("content-type", PREVIEW_CONTENT_TYPE)
        .header("access-control-allow-origin", "*");

    if let Some(len) = content_length {
        builder = builder.header("content-length", len.to_string());
    }

    builder
        .body(body)
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

/// Crée le router du proxy de prévisualisation
///
/// # Routes créées
///
/// - `GET /audio/preview?src={url}` - Extrait proxifié, non mis en cache
pub fn create_preview_router(state: PreviewState) -> Router {
    Router::new()
        .route("/audio/preview", get(preview_proxy))
        .with_state(state)
}
