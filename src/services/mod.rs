//! Controllers and the collaborators they share

pub mod catalog;
pub mod clock;
pub mod debounce;
pub mod fallback;
pub mod profile;
pub mod session;
pub mod storage;

use std::sync::Arc;

use crate::api::{CancelHandle, CatalogApi, HttpCatalogApi};
use crate::config::AppConfig;
use crate::error::AppResult;

use self::catalog::CatalogController;
use self::clock::{Clock, SystemClock};
use self::profile::{ProfileController, ProfileLoad};
use self::session::CatalogSession;
use self::storage::{FileStorage, Storage};

/// Container for the shared collaborators; controllers are built on demand
#[derive(Clone)]
pub struct Services {
    pub config: Arc<AppConfig>,
    pub api: Arc<dyn CatalogApi>,
    pub storage: Arc<dyn Storage>,
    pub clock: Arc<dyn Clock>,
    /// Aborts requests issued through `api`
    pub cancel: CancelHandle,
}

impl Services {
    /// Wire the HTTP client, the file store and the system clock
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let api = HttpCatalogApi::new(&config.api)?;
        let storage = FileStorage::new(config.storage.resolved_path());
        tracing::debug!("Using storage file {}", storage.path().display());
        let cancel = api.cancel_handle();
        Ok(Self {
            cancel,
            ..Self::with_parts(config, Arc::new(api), Arc::new(storage), Arc::new(SystemClock))
        })
    }

    pub fn with_parts(
        config: AppConfig,
        api: Arc<dyn CatalogApi>,
        storage: Arc<dyn Storage>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            api,
            storage,
            clock,
            cancel: CancelHandle::new(),
        }
    }

    pub fn catalog(&self) -> CatalogController {
        CatalogController::new(Arc::clone(&self.api), self.config.catalog.clone())
    }

    /// Event-driven catalog whose outstanding search is cancelled on close
    pub fn catalog_session(&self) -> CatalogSession {
        CatalogSession::new(self.catalog()).with_cancel(self.cancel.clone())
    }

    pub async fn profile(&self, card_param: Option<&str>) -> AppResult<ProfileLoad> {
        ProfileController::open(
            Arc::clone(&self.api),
            Arc::clone(&self.storage),
            Arc::clone(&self.clock),
            self.config.profile.clone(),
            card_param,
        )
        .await
    }
}
