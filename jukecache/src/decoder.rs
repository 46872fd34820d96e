//! Capacité de décodage audio
//!
//! Le cache ne sait pas comment une ressource externe devient un fichier
//! audio local : il délègue à une implémentation de [`AudioDecoder`]. La
//! crate `juketube` fournit l'implémentation réelle (outil d'extraction
//! externe); les tests utilisent des stubs.

use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;

/// Matérialise une ressource externe en fichier audio local.
///
/// Le contrat est étroit à dessein : une invocation par requête, pas d'état
/// interne. `decode` ne retourne `Ok(())` que si `dest` existe et est
/// complètement écrit; tout autre issue est une erreur.
#[async_trait]
pub trait AudioDecoder: Send + Sync {
    /// Décode la ressource `resource_id` dans le fichier `dest`.
    async fn decode(&self, resource_id: &str, dest: &Path) -> Result<()>;
}
