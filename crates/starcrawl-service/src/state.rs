//! Shared application state.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use starcrawl_lib::{Atlas, Error as LibError, RoutingConstraints};

use crate::config::ServiceConfig;

#[derive(Debug, Error)]
pub enum AppStateError {
    #[error("failed to load dataset: {0}")]
    Load(#[from] LibError),
}

/// Cheaply cloneable handle to the loaded atlas, shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    atlas: Atlas,
    defaults: RoutingConstraints,
}

impl AppState {
    /// Load the dataset named by `config` and build the index over it.
    pub fn load(config: &ServiceConfig) -> Result<Self, AppStateError> {
        info!(path = %config.data_path.display(), probe = %config.grid.probe, "loading dataset");
        let atlas = Atlas::load(&config.data_path, config.grid, config.planner)?;
        Ok(Self::from_components(atlas, config.defaults))
    }

    pub fn from_components(atlas: Atlas, defaults: RoutingConstraints) -> Self {
        Self {
            inner: Arc::new(AppStateInner { atlas, defaults }),
        }
    }

    pub fn atlas(&self) -> &Atlas {
        &self.inner.atlas
    }

    pub fn defaults(&self) -> &RoutingConstraints {
        &self.inner.defaults
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("points", &self.inner.atlas.len())
            .field("probe", &self.inner.atlas.index().config().probe)
            .field("defaults", &self.inner.defaults)
            .finish()
    }
}
