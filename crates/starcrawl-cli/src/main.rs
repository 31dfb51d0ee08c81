use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use starcrawl_cli::output::OutputFormat;
use starcrawl_lib::{GridConfig, ProbeStrategy, DEFAULT_RADIUS, DEFAULT_SEARCH_LIMIT};

mod commands;

use commands::import::ImportArgs;
use commands::route::RouteArgs;
use commands::DatasetArgs;

#[derive(Parser, Debug)]
#[command(author, version, about = "starcrawl route planning utilities")]
struct Cli {
    /// Dataset file (.db, .sqlite, .csv or .json).
    #[arg(long, env = "STARCRAWL_DATA_PATH", global = true)]
    data_path: Option<PathBuf>,

    /// Granularity radius of the spatial grid.
    #[arg(long, default_value_t = DEFAULT_RADIUS, global = true)]
    grid_radius: f64,

    /// Which buckets radius queries scan.
    #[arg(long, value_enum, default_value_t = ProbeArg::Faces, global = true)]
    probe: ProbeArg,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plan a route between points, optionally through waypoints.
    Route(RouteArgs),
    /// Show a single point by id.
    Lookup {
        /// Point id.
        id: i64,
    },
    /// List points whose names contain a fragment.
    Search {
        /// Case-insensitive name fragment.
        fragment: String,
        /// Maximum number of matches.
        #[arg(long, default_value_t = DEFAULT_SEARCH_LIMIT)]
        limit: usize,
    },
    /// Convert a dataset into the SQLite form, optionally writing a sample subset.
    Import(ImportArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ProbeArg {
    Faces,
    Cube,
}

impl From<ProbeArg> for ProbeStrategy {
    fn from(value: ProbeArg) -> Self {
        match value {
            ProbeArg::Faces => ProbeStrategy::Faces,
            ProbeArg::Cube => ProbeStrategy::Cube,
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let dataset = DatasetArgs {
        data_path: cli.data_path,
        grid: GridConfig::default()
            .with_radius(cli.grid_radius)
            .with_probe(cli.probe.into()),
    };

    match cli.command {
        Command::Route(args) => commands::route::handle_route(&dataset, &args, cli.format),
        Command::Lookup { id } => commands::points::handle_lookup(&dataset, id, cli.format),
        Command::Search { fragment, limit } => {
            commands::points::handle_search(&dataset, &fragment, limit, cli.format)
        }
        Command::Import(args) => commands::import::handle_import(&dataset, &args),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
