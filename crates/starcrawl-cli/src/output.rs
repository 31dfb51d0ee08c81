//! Output formatting for routes, points, and search results.

use std::fmt::Write as _;

use clap::ValueEnum;
use starcrawl_lib::{NameMatch, Point, Route};

/// Output format selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON using the service's wire names.
    Json,
}

/// Render a planned route.
///
/// Requested stops are marked with `*`, pass-through stops with `-`.
pub fn render_route(route: &Route, format: OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(route),
        OutputFormat::Text => {
            let mut out = String::new();
            let _ = writeln!(
                out,
                "Route from {} to {} ({} hop{}):",
                label(&route.origin.point),
                label(&route.destination.point),
                route.hop_count(),
                if route.hop_count() == 1 { "" } else { "s" }
            );
            for stop in &route.stops {
                let marker = if stop.requested { '*' } else { '-' };
                let _ = writeln!(
                    out,
                    "  {marker} {:<32} {:>10.2}",
                    label(&stop.point),
                    stop.distance_from_previous
                );
            }
            let _ = write!(
                out,
                "Total distance: {:.2} (checks: {})",
                route.distance, route.checks
            );
            Ok(out)
        }
    }
}

/// Render a single point.
pub fn render_point(point: &Point, format: OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(point),
        OutputFormat::Text => {
            let mut flags = Vec::new();
            if point.scoopable {
                flags.push("scoopable star");
            }
            if point.refuel {
                flags.push("refuel station");
            }
            let c = &point.coordinate;
            let mut out = format!(
                "{}\n  position: ({:.3}, {:.3}, {:.3})",
                label(point),
                c.x,
                c.y,
                c.z
            );
            if !flags.is_empty() {
                let _ = write!(out, "\n  features: {}", flags.join(", "));
            }
            Ok(out)
        }
    }
}

/// Render autocomplete matches.
pub fn render_matches(matches: &[NameMatch], format: OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(matches),
        OutputFormat::Text => {
            if matches.is_empty() {
                return Ok("No matching points.".to_string());
            }
            Ok(matches
                .iter()
                .map(|m| format!("{} ({})", m.name, m.id))
                .collect::<Vec<_>>()
                .join("\n"))
        }
    }
}

fn label(point: &Point) -> String {
    format!("{} ({})", point.name, point.id)
}
