//! # jukeserver - Serveur web haut niveau basé sur Axum
//!
//! Cette crate fournit une abstraction simple pour créer le serveur HTTP du
//! backend jukebox avec Axum, en cachant la configuration et le routage.
//!
//! ## Fonctionnalités
//!
//! - **Routes JSON simples** : ajoutez des endpoints API avec `add_route()`
//! - **Handlers personnalisés** : streaming, proxy, etc. avec
//!   `add_handler_with_state()`
//! - **Sous-routers** : montez les routers des crates métier avec
//!   `add_router()`
//! - **Arrêt gracieux** : arrêt propre sur Ctrl+C
//!
//! ## Exemple d'utilisation
//!
//! ```rust,no_run
//! use jukeserver::ServerBuilder;
//!
//! #[tokio::main]
//! async fn main() {
//!     jukeserver::init_logging();
//!
//!     let mut server = ServerBuilder::new("Jukebox", "http://localhost:8080", 8080).build();
//!
//!     server.add_route("/api/status", || async {
//!         serde_json::json!({"status": "ok"})
//!     }).await;
//!
//!     server.start().await;
//!     server.wait().await;
//! }
//! ```

pub mod logging;
pub mod server;

pub use logging::init_logging;
pub use server::{Server, ServerBuilder, ServerInfo};
