//! Décodage en vol partagé entre appelants
//!
//! Un [`Download`] représente un décodage en cours pour un identifiant de
//! ressource. Tous les appelants concurrents pour le même identifiant
//! s'attachent au même objet et attendent son règlement; l'objet est réglé
//! exactement une fois (succès ou échec), puis retiré de la map des
//! décodages en vol par la tâche qui l'a créé.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// État interne du décodage
#[derive(Debug, Clone)]
struct DownloadState {
    /// Indique si le décodage est terminé
    finished: bool,
    /// Erreur éventuelle lors du décodage
    error: Option<String>,
}

/// Objet représentant un décodage en cours
#[derive(Debug)]
pub struct Download {
    /// Identifiant de la ressource en cours de décodage
    resource_id: String,
    /// État partagé entre la tâche de décodage et les appelants en attente
    state: Arc<RwLock<DownloadState>>,
}

impl Download {
    /// Crée une nouvelle instance de Download
    pub(crate) fn new(resource_id: &str) -> Arc<Self> {
        Arc::new(Self {
            resource_id: resource_id.to_string(),
            state: Arc::new(RwLock::new(DownloadState {
                finished: false,
                error: None,
            })),
        })
    }

    /// Retourne l'identifiant de la ressource
    pub fn resource_id(&self) -> &str {
        &self.resource_id
    }

    /// Attend que le décodage soit complètement terminé
    pub async fn wait_until_finished(&self) -> Result<(), String> {
        loop {
            let state = self.state.read().await;

            // Vérifier s'il y a eu une erreur
            if let Some(ref error) = state.error {
                return Err(error.clone());
            }

            if state.finished {
                return Ok(());
            }

            drop(state); // Libérer le lock avant de dormir
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    }

    /// Indique si le décodage est terminé
    pub async fn finished(&self) -> bool {
        let state = self.state.read().await;
        state.finished
    }

    /// Retourne l'erreur éventuelle
    pub async fn error(&self) -> Option<String> {
        let state = self.state.read().await;
        state.error.clone()
    }

    /// Règle le décodage en succès
    pub(crate) async fn settle_ok(&self) {
        let mut state = self.state.write().await;
        state.finished = true;
    }

    /// Règle le décodage en échec
    pub(crate) async fn settle_err(&self, error: String) {
        let mut state = self.state.write().await;
        state.error = Some(error);
        state.finished = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_settle_ok_releases_waiters() {
        let dl = Download::new("abc");

        let waiter = {
            let dl = dl.clone();
            tokio::spawn(async move { dl.wait_until_finished().await })
        };

        dl.settle_ok().await;

        assert!(waiter.await.unwrap().is_ok());
        assert!(dl.finished().await);
        assert!(dl.error().await.is_none());
    }

    #[tokio::test]
    async fn test_settle_err_propagates_to_all_waiters() {
        let dl = Download::new("abc");

        let waiters: Vec<_> = (0..3)
            .map(|_| {
                let dl = dl.clone();
                tokio::spawn(async move { dl.wait_until_finished().await })
            })
            .collect();

        dl.settle_err("decoder exited with status 1".to_string()).await;

        for waiter in waiters {
            let result = waiter.await.unwrap();
            assert_eq!(result.unwrap_err(), "decoder exited with status 1");
        }
    }
}
