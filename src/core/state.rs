use std::sync::Arc;

use crate::core::config::Settings;
use crate::db::Database;
use crate::services::storage::StorageService;

#[derive(Clone)]
pub(crate) struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    settings: Settings,
    db: Database,
    storage: Option<StorageService>,
}

impl AppState {
    pub(crate) fn new(settings: Settings, db: Database, storage: Option<StorageService>) -> Self {
        Self { inner: Arc::new(InnerState { settings, db, storage }) }
    }

    pub(crate) fn settings(&self) -> &Settings {
        &self.inner.settings
    }

    pub(crate) fn db(&self) -> &Database {
        &self.inner.db
    }

    pub(crate) fn storage(&self) -> Option<&StorageService> {
        self.inner.storage.as_ref()
    }
}
