//! Route command handler.

use anyhow::{Context, Result};
use clap::Args;

use starcrawl_cli::output::{render_route, OutputFormat};
use starcrawl_lib::{
    Atlas, PointId, RoutingConstraints, DEFAULT_MAX_HOPS, DEFAULT_MAX_JUMP, UNSPECIFIED,
};

use super::DatasetArgs;

/// Arguments for the route command.
#[derive(Args, Debug, Clone)]
pub struct RouteArgs {
    /// Starting point, by id or exact name.
    #[arg(long = "from")]
    pub from: Option<String>,
    /// Destination point, by id or exact name.
    #[arg(long = "to")]
    pub to: Option<String>,
    /// Waypoints to visit in any order (comma-separated ids or names).
    #[arg(long = "visit", value_delimiter = ',')]
    pub visit: Vec<String>,
    /// Maximum distance of a single hop.
    #[arg(long, default_value_t = DEFAULT_MAX_JUMP)]
    pub max_jump: f64,
    /// Maximum hops per leg.
    #[arg(long, default_value_t = DEFAULT_MAX_HOPS)]
    pub max_hops: usize,
}

impl RouteArgs {
    pub fn constraints(&self) -> RoutingConstraints {
        RoutingConstraints::new(self.max_jump, self.max_hops)
    }
}

/// Handle the route subcommand.
pub fn handle_route(dataset: &DatasetArgs, args: &RouteArgs, format: OutputFormat) -> Result<()> {
    let atlas = dataset.load_atlas()?;

    let start = resolve_optional(&atlas, args.from.as_deref())?;
    let end = resolve_optional(&atlas, args.to.as_deref())?;
    let waypoints = args
        .visit
        .iter()
        .filter(|reference| !reference.trim().is_empty())
        .map(|reference| resolve_optional(&atlas, Some(reference)))
        .collect::<Result<Vec<PointId>>>()?;

    let route = atlas.plan_route(start, end, &waypoints, &args.constraints())?;
    println!(
        "{}",
        render_route(&route, format).context("failed to render route")?
    );
    Ok(())
}

/// Blank or `0` leaves the point unspecified, matching the HTTP service.
fn resolve_optional(atlas: &Atlas, reference: Option<&str>) -> Result<PointId> {
    match reference.map(str::trim) {
        None | Some("") | Some("0") => Ok(UNSPECIFIED),
        Some(reference) => Ok(atlas.resolve(reference)?),
    }
}
