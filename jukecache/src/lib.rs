//! # jukecache - Cache audio du backend jukebox
//!
//! Cette crate fournit le cache disque des pistes audio décodées : un index
//! en mémoire borné (éviction LRU), la coordination des décodages avec
//! fusion des requêtes concurrentes, le nettoyage des fichiers périmés et le
//! service HTTP des fichiers avec support des requêtes par plage d'octets.
//!
//! ## Architecture
//!
//! ```text
//! jukecache
//!     ├── store.rs      - Index en mémoire (LRU borné)
//!     ├── download.rs   - Décodage en vol partagé entre appelants
//!     ├── decoder.rs    - Capacité de décodage (trait)
//!     ├── cache.rs      - Coordinateur cache + décodages
//!     ├── janitor.rs    - Balayage des fichiers périmés
//!     ├── server_ext.rs - Routes HTTP de streaming (plages d'octets)
//!     └── api.rs        - API REST d'administration
//! ```
//!
//! L'identifiant de ressource est une chaîne opaque fournie par le résolveur
//! de source; le fichier correspondant est nommé à partir de son hash SHA1.
//!
//! ## Utilisation
//!
//! ```rust,no_run
//! use jukecache::{AudioCache, AudioDecoder};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! struct MyDecoder;
//!
//! #[async_trait::async_trait]
//! impl AudioDecoder for MyDecoder {
//!     async fn decode(&self, resource_id: &str, dest: &Path) -> anyhow::Result<()> {
//!         // invoquer l'outil d'extraction externe
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let cache = Arc::new(AudioCache::new("./cache_audio", 20, Arc::new(MyDecoder))?);
//!     let track = cache.get_or_download("dQw4w9WgXcQ").await?;
//!     println!("audio: {:?} ({} bytes)", track.path, track.size);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cache;
pub mod config_ext;
pub mod decoder;
pub mod download;
pub mod janitor;
pub mod server_ext;
pub mod store;

pub use cache::{pk_from_resource_id, AudioCache, CachedTrack, AUDIO_FILE_EXTENSION};
pub use config_ext::CacheConfigExt;
pub use decoder::AudioDecoder;
pub use download::Download;
pub use server_ext::{create_stream_router, extract_resource_id, serve_cached_track};
pub use store::{Store, StoreEntry};

pub use api::{create_api_router, ErrorResponse, TrackInfo};
