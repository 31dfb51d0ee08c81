//! Import command handler.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use tracing::info;

use starcrawl_lib::{Coordinate, GridIndex, PointStore, SAMPLE_CENTROID, SAMPLE_RADIUS};

use super::DatasetArgs;

/// Arguments for the import command.
#[derive(Args, Debug, Clone)]
pub struct ImportArgs {
    /// Source dataset (.db, .sqlite, .csv or .json).
    #[arg(long)]
    pub input: PathBuf,
    /// SQLite file to write every point to.
    #[arg(long)]
    pub output: PathBuf,
    /// Optional SQLite file for the subset of points near the sample centroid.
    #[arg(long)]
    pub sample_output: Option<PathBuf>,
    /// Radius around the centroid kept in the sample.
    #[arg(long, default_value_t = SAMPLE_RADIUS)]
    pub sample_radius: f64,
    /// Sample centroid as `X,Y,Z`.
    #[arg(long, value_parser = parse_coordinate, default_value = "100,100,100")]
    pub sample_centroid: Coordinate,
}

/// Handle the import subcommand.
///
/// The input is indexed before anything is written so that a dataset the
/// service would refuse to start with is rejected here too.
pub fn handle_import(dataset: &DatasetArgs, args: &ImportArgs) -> Result<()> {
    let store = PointStore::load(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    GridIndex::build(dataset.grid, &store)
        .with_context(|| format!("{} cannot be indexed", args.input.display()))?;

    store
        .write_sqlite(&args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    println!("Wrote {} points to {}", store.len(), args.output.display());

    if let Some(sample_path) = &args.sample_output {
        let sample = store.sample_within(&args.sample_centroid, args.sample_radius);
        sample
            .write_sqlite(sample_path)
            .with_context(|| format!("failed to write {}", sample_path.display()))?;
        info!(
            points = sample.len(),
            radius = args.sample_radius,
            "sample dataset written"
        );
        println!(
            "Wrote {} sample points to {}",
            sample.len(),
            sample_path.display()
        );
    }

    Ok(())
}

fn parse_coordinate(value: &str) -> Result<Coordinate> {
    let parts = value
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<Vec<f64>, _>>()
        .with_context(|| format!("invalid coordinate '{value}'"))?;
    match parts.as_slice() {
        [x, y, z] => Ok(Coordinate::new(*x, *y, *z)),
        _ => bail!("expected X,Y,Z but got '{value}'"),
    }
}
