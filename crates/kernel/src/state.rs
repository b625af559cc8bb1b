//! Application state shared across all handlers.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::Config;
use crate::db;
use crate::services::MenuService;
use crate::store::{MemoryMenuStore, MenuStore, PgMenuStore};

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Menu storage backend.
    store: Arc<dyn MenuStore>,

    /// Menu service.
    menus: Arc<MenuService>,
}

impl AppState {
    /// Initialize state from configuration.
    ///
    /// Connects to PostgreSQL when `DATABASE_URL` is set; otherwise menus
    /// are kept in memory and lost on restart.
    pub async fn new(config: &Config) -> Result<Self> {
        let store: Arc<dyn MenuStore> = match &config.database_url {
            Some(url) => {
                let pool = db::create_pool(url, config.database_max_connections)
                    .await
                    .context("failed to create database pool")?;
                let store = PgMenuStore::new(pool)
                    .await
                    .context("failed to prepare menu schema")?;
                info!("PostgreSQL menu store ready");
                Arc::new(store)
            }
            None => {
                warn!("DATABASE_URL not set; menu data will be kept in memory only");
                Arc::new(MemoryMenuStore::new())
            }
        };

        Ok(Self::with_store(store))
    }

    /// Build state around an existing store.
    pub fn with_store(store: Arc<dyn MenuStore>) -> Self {
        let menus = MenuService::new(store.clone());
        Self {
            inner: Arc::new(AppStateInner { store, menus }),
        }
    }

    /// Get the menu service.
    pub fn menus(&self) -> &Arc<MenuService> {
        &self.inner.menus
    }

    /// Get the menu store.
    pub fn store(&self) -> &Arc<dyn MenuStore> {
        &self.inner.store
    }

    /// Check if the storage backend is reachable.
    pub async fn store_healthy(&self) -> bool {
        self.inner.store.health().await
    }
}
