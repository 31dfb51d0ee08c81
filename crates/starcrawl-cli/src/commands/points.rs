//! Point lookup and name search handlers.

use anyhow::{Context, Result};

use starcrawl_cli::output::{render_matches, render_point, OutputFormat};
use starcrawl_lib::{NameIndex, PointId, PointStore};

use super::DatasetArgs;

/// Handle the lookup subcommand.
pub fn handle_lookup(dataset: &DatasetArgs, id: PointId, format: OutputFormat) -> Result<()> {
    let atlas = dataset.load_atlas()?;
    let point = atlas.lookup(id)?;
    println!(
        "{}",
        render_point(&point, format).context("failed to render point")?
    );
    Ok(())
}

/// Handle the search subcommand.
///
/// Only the name index is needed, so the spatial grid is never built.
pub fn handle_search(
    dataset: &DatasetArgs,
    fragment: &str,
    limit: usize,
    format: OutputFormat,
) -> Result<()> {
    let store: PointStore = dataset.load_store()?;
    let names = NameIndex::from_store(&store);
    let matches = names.search(fragment, limit);
    println!(
        "{}",
        render_matches(&matches, format).context("failed to render matches")?
    );
    Ok(())
}
