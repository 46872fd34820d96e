//! Initialisation du logging pour le backend
//!
//! Configure `tracing-subscriber` avec un formateur console et un filtre de
//! niveau pilotable par la variable d'environnement `RUST_LOG`.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialise le système de logs.
///
/// Le niveau par défaut est `info`; il peut être ajusté via `RUST_LOG`
/// (ex: `RUST_LOG=jukecache=debug`). L'appel est idempotent : les
/// initialisations suivantes sont ignorées.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init();
}
