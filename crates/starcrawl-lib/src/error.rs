use std::path::PathBuf;

use thiserror::Error;

use crate::point::PointId;

/// Convenient result alias for the starcrawl library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when the grid radius cannot produce a usable bucket layout.
    #[error("invalid grid configuration: {message}")]
    InvalidGrid { message: String },

    /// Raised when a point lies outside the universe cube.
    #[error("point {id} ({name}) at ({x}, {y}, {z}) is outside the supported universe")]
    OutOfBounds {
        id: PointId,
        name: String,
        x: f64,
        y: f64,
        z: f64,
    },

    /// Raised when two records share the same identifier.
    #[error("duplicate point id {id} encountered")]
    DuplicatePoint { id: PointId },

    /// Raised when a record uses the reserved `0` identifier.
    #[error("point {name} uses the reserved id 0")]
    ReservedPointId { name: String },

    /// Raised when a point id is not present in the index.
    #[error("unknown point id {id}")]
    PointNotFound { id: PointId },

    /// Raised when a point name could not be resolved.
    #[error("unknown point name: {name}{}", format_suggestions(.suggestions))]
    UnknownPointName {
        name: String,
        suggestions: Vec<String>,
    },

    /// Raised when no route satisfies the constraints.
    #[error("no route found between {start} and {goal}")]
    RouteNotFound { start: PointId, goal: PointId },

    /// Raised when a planning query names no start, end, or waypoints.
    #[error("itinerary has no start, end, or waypoints")]
    EmptyItinerary,

    /// Raised when a planning query cannot be evaluated as given.
    #[error("invalid planning query: {message}")]
    InvalidQuery { message: String },

    /// Raised when a leg cannot be folded into an itinerary.
    #[error("cannot merge leg: {message}")]
    LegMerge { message: String },

    /// Raised when a dataset path has an extension no loader understands.
    #[error("unsupported dataset format at {path}; expected .db, .sqlite, .csv or .json")]
    UnsupportedDataset { path: PathBuf },

    /// Wrapper for SQLite errors.
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for CSV parsing errors.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// Wrapper for JSON parsing errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Raised when a dedicated planner thread pool cannot be created.
    #[error(transparent)]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl Error {
    /// Whether the error means "nothing to return" rather than a broken input.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::PointNotFound { .. }
                | Error::UnknownPointName { .. }
                | Error::RouteNotFound { .. }
                | Error::EmptyItinerary
        )
    }
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}
