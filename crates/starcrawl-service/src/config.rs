//! Service configuration read from the environment.
//!
//! | Variable              | Default          |
//! |-----------------------|------------------|
//! | `STARCRAWL_DATA_PATH` | `data/points.db` |
//! | `SERVICE_PORT`        | `8080`           |
//! | `GRID_RADIUS`         | `1000`           |
//! | `GRID_PROBE`          | `faces`          |
//! | `DEFAULT_MAX_JUMP`    | `18`             |
//! | `DEFAULT_MAX_HOPS`    | `100`            |
//! | `MAX_WAYPOINTS`       | `8`              |
//! | `PLANNER_THREADS`     | rayon default    |

use std::path::PathBuf;
use std::str::FromStr;

use tracing::warn;

use starcrawl_lib::{GridConfig, PlannerConfig, ProbeStrategy, RoutingConstraints};

pub const DEFAULT_DATA_PATH: &str = "data/points.db";
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub data_path: PathBuf,
    pub port: u16,
    pub grid: GridConfig,
    pub planner: PlannerConfig,
    /// Constraints used when a request leaves them out.
    pub defaults: RoutingConstraints,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            port: DEFAULT_PORT,
            grid: GridConfig::default(),
            planner: PlannerConfig::default(),
            defaults: RoutingConstraints::default(),
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Unparseable values fall back
    /// to their defaults with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let parsed = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let grid = GridConfig::default()
            .with_radius(parse_or(&lookup, "GRID_RADIUS", defaults.grid.radius))
            .with_probe(parse_or::<ProbeStrategy>(
                &lookup,
                "GRID_PROBE",
                defaults.grid.probe,
            ));

        Self {
            data_path: parsed("STARCRAWL_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_path),
            port: parse_or(&lookup, "SERVICE_PORT", defaults.port),
            grid,
            planner: PlannerConfig {
                max_waypoints: parse_or(&lookup, "MAX_WAYPOINTS", defaults.planner.max_waypoints),
                worker_threads: parsed("PLANNER_THREADS").and_then(|v| v.trim().parse().ok()),
            },
            defaults: RoutingConstraints::new(
                parse_or(&lookup, "DEFAULT_MAX_JUMP", defaults.defaults.max_jump),
                parse_or(&lookup, "DEFAULT_MAX_HOPS", defaults.defaults.max_hops),
            ),
        }
    }
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                warn!(key, value = %raw, "ignoring unparseable setting");
                default
            }
        },
        _ => default,
    }
}
