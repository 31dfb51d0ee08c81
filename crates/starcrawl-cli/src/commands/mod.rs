// One module per subcommand; main.rs parses arguments and dispatches here.

pub mod import;
pub mod points;
pub mod route;

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use starcrawl_lib::{Atlas, GridConfig, PlannerConfig, PointStore};

/// Dataset location and grid shape shared by every subcommand.
#[derive(Debug, Clone)]
pub struct DatasetArgs {
    pub data_path: Option<PathBuf>,
    pub grid: GridConfig,
}

impl DatasetArgs {
    pub fn path(&self) -> Result<&Path> {
        self.data_path
            .as_deref()
            .ok_or_else(|| anyhow!("no dataset given; pass --data-path or set STARCRAWL_DATA_PATH"))
    }

    pub fn load_store(&self) -> Result<PointStore> {
        let path = self.path()?;
        PointStore::load(path)
            .with_context(|| format!("failed to load dataset from {}", path.display()))
    }

    pub fn load_atlas(&self) -> Result<Atlas> {
        let store = self.load_store()?;
        Atlas::build_with(&store, self.grid, PlannerConfig::default())
            .context("failed to index dataset")
    }
}
