//! Loading and writing point datasets.
//!
//! A dataset is a flat list of points. Three on-disk forms are understood,
//! chosen by file extension:
//!
//! - `.db` / `.sqlite`: a SQLite file with a `points` table
//! - `.csv`: a header row `id,name,x,y,z,scoopable,refuel`
//! - `.json`: an array of point records
//!
//! Loading validates ids as it goes. A duplicate id or the reserved id `0`
//! aborts the load.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim};
use rusqlite::{params, Connection, OpenFlags};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::point::{Coordinate, Point, PointId, UNSPECIFIED};

/// Centroid the importer uses for the reduced sample dataset.
pub const SAMPLE_CENTROID: Coordinate = Coordinate::new(100.0, 100.0, 100.0);
/// Radius around [`SAMPLE_CENTROID`] kept in the sample dataset.
pub const SAMPLE_RADIUS: f64 = 100.0;

const CREATE_POINTS_TABLE: &str = "CREATE TABLE IF NOT EXISTS points (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    x REAL NOT NULL,
    y REAL NOT NULL,
    z REAL NOT NULL,
    scoopable INTEGER NOT NULL DEFAULT 0,
    refuel INTEGER NOT NULL DEFAULT 0
)";

/// Row shape shared by the CSV and JSON forms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    pub id: PointId,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    #[serde(default)]
    pub scoopable: bool,
    #[serde(default)]
    pub refuel: bool,
}

impl From<PointRecord> for Point {
    fn from(record: PointRecord) -> Self {
        Point::new(
            record.id,
            record.name,
            Coordinate::new(record.x, record.y, record.z),
        )
        .with_flags(record.scoopable, record.refuel)
    }
}

impl From<&Point> for PointRecord {
    fn from(point: &Point) -> Self {
        Self {
            id: point.id,
            name: point.name.clone(),
            x: point.coordinate.x,
            y: point.coordinate.y,
            z: point.coordinate.z,
            scoopable: point.scoopable,
            refuel: point.refuel,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DatasetFormat {
    Sqlite,
    Csv,
    Json,
}

impl DatasetFormat {
    fn detect(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match extension.as_deref() {
            Some("db") | Some("sqlite") | Some("sqlite3") => Ok(DatasetFormat::Sqlite),
            Some("csv") => Ok(DatasetFormat::Csv),
            Some("json") => Ok(DatasetFormat::Json),
            _ => Err(Error::UnsupportedDataset {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Immutable in-memory collection of points.
#[derive(Debug, Clone, Default)]
pub struct PointStore {
    points: Vec<Point>,
    source: Option<PathBuf>,
}

impl PointStore {
    /// Build a store from already-parsed points, validating their ids.
    pub fn from_points(points: Vec<Point>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(points.len());
        for point in &points {
            if point.id == UNSPECIFIED {
                return Err(Error::ReservedPointId {
                    name: point.name.clone(),
                });
            }
            if !seen.insert(point.id) {
                return Err(Error::DuplicatePoint { id: point.id });
            }
        }
        Ok(Self {
            points,
            source: None,
        })
    }

    /// Load a dataset, picking the parser from the file extension.
    pub fn load(path: &Path) -> Result<Self> {
        let format = DatasetFormat::detect(path)?;
        debug!(path = %path.display(), ?format, "loading point dataset");

        let mut store = match format {
            DatasetFormat::Sqlite => Self::from_sqlite(path)?,
            DatasetFormat::Csv => Self::from_csv_reader(BufReader::new(File::open(path)?))?,
            DatasetFormat::Json => Self::from_json_reader(BufReader::new(File::open(path)?))?,
        };
        store.source = Some(path.to_path_buf());

        info!(points = store.len(), path = %path.display(), "point dataset loaded");
        Ok(store)
    }

    /// Read the `points` table of a SQLite dataset.
    pub fn from_sqlite(path: &Path) -> Result<Self> {
        let connection = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        let mut stmt = connection
            .prepare("SELECT id, name, x, y, z, scoopable, refuel FROM points ORDER BY rowid")?;
        let rows = stmt.query_map([], |row| {
            Ok(PointRecord {
                id: row.get(0)?,
                name: row.get(1)?,
                x: row.get(2)?,
                y: row.get(3)?,
                z: row.get(4)?,
                scoopable: row.get::<_, Option<bool>>(5)?.unwrap_or(false),
                refuel: row.get::<_, Option<bool>>(6)?.unwrap_or(false),
            })
        })?;

        let mut points = Vec::new();
        for row in rows {
            points.push(Point::from(row?));
        }
        Self::from_points(points)
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
        let mut points = Vec::new();
        for record in csv_reader.deserialize::<PointRecord>() {
            points.push(Point::from(record?));
        }
        Self::from_points(points)
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        let records: Vec<PointRecord> = serde_json::from_reader(reader)?;
        Self::from_points(records.into_iter().map(Point::from).collect())
    }

    /// Write every point into the `points` table of a SQLite file, replacing
    /// any rows with the same ids.
    pub fn write_sqlite(&self, path: &Path) -> Result<()> {
        let mut connection = Connection::open(path)?;
        connection.execute(CREATE_POINTS_TABLE, [])?;

        let tx = connection.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO points (id, name, x, y, z, scoopable, refuel)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for point in &self.points {
                stmt.execute(params![
                    point.id,
                    point.name,
                    point.coordinate.x,
                    point.coordinate.y,
                    point.coordinate.z,
                    point.scoopable,
                    point.refuel,
                ])?;
            }
        }
        tx.commit()?;

        info!(points = self.len(), path = %path.display(), "wrote sqlite dataset");
        Ok(())
    }

    /// Points strictly closer than `radius` to `centroid`, in store order.
    pub fn sample_within(&self, centroid: &Coordinate, radius: f64) -> PointStore {
        let points = self
            .points
            .iter()
            .filter(|point| point.coordinate.distance_to(centroid) < radius)
            .cloned()
            .collect();
        PointStore {
            points,
            source: None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point> {
        self.points.iter()
    }

    /// Visit each point once, in store order.
    pub fn for_each<F: FnMut(&Point)>(&self, visit: F) {
        self.points.iter().for_each(visit);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// File the store was loaded from, when it came from disk.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}
