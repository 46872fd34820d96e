//! # juketube - Source audio externe du backend jukebox
//!
//! Cette crate relie le backend à la plateforme vidéo externe qui sert de
//! source audio principale :
//!
//! - **Résolution** : transformer un couple (titre, artiste) en identifiant
//!   de ressource via l'API de recherche, avec cache TTL des résultats
//! - **Décodage** : matérialiser une ressource en fichier audio local via
//!   l'outil d'extraction externe (implémentation de
//!   [`jukecache::AudioDecoder`])
//! - **Fallback** : proxifier les extraits de la source de prévisualisation
//!   secondaire, sans mise en cache
//!
//! ## Architecture
//!
//! ```text
//! juketube
//!     ├── client.rs     - Client bas-niveau de l'API de recherche
//!     ├── models.rs     - Modèles JSON de l'API
//!     ├── cache.rs      - Caches TTL (recherches 24h, détails 1h)
//!     ├── resolver.rs   - Résolution (titre, artiste) -> ressource
//!     ├── decoder.rs    - Extraction audio via sous-processus
//!     ├── preview.rs    - Proxy de prévisualisation (non mis en cache)
//!     └── server_ext.rs - Routes HTTP de la source
//! ```
//!
//! La résolution n'échoue jamais vers l'appelant : une ressource absente est
//! une issue normale et se traduit par `None`, toutes les erreurs étant
//! absorbées et loggées à la frontière de la crate.

pub mod cache;
pub mod client;
pub mod config_ext;
pub mod decoder;
pub mod error;
pub mod models;
pub mod preview;
pub mod resolver;
pub mod server_ext;

pub use cache::{CacheStats, SearchCache};
pub use client::TubeClient;
pub use config_ext::TubeConfigExt;
pub use decoder::ExtractorDecoder;
pub use error::{Result, TubeError};
pub use models::VideoDetails;
pub use preview::{create_preview_router, PreviewState};
pub use resolver::SourceResolver;
pub use server_ext::create_source_router;
