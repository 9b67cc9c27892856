//! Shape state persistence.
//!
//! The shape is stored as one JSON record `{"sides": n, "points": [...]}`
//! under a fixed key. Absent or malformed records fall back to the default
//! shape instead of failing.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use crate::error::{FillError, Result};
use crate::logger;
use crate::math::Point;
use crate::shape::{Polygon, MAX_SIDES, MIN_SIDES};

/// Key the shape record is stored under.
pub const STATE_KEY: &str = "tile-fill.shape";

/// Sides of the shape used when nothing usable is stored.
pub const DEFAULT_SIDES: usize = 4;

/// Persisted shape record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeState {
    pub sides: usize,
    /// Vertex positions; `None` means "lay the vertices out radially".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<Point>>,
}

impl Default for ShapeState {
    fn default() -> Self {
        Self {
            sides: DEFAULT_SIDES,
            points: None,
        }
    }
}

impl ShapeState {
    /// Parses and validates a stored record.
    pub fn parse(text: &str) -> Result<Self> {
        let state: ShapeState = serde_json::from_str(text)?;

        if !(MIN_SIDES..=MAX_SIDES).contains(&state.sides) {
            return Err(FillError::MalformedState(format!(
                "sides must be between {} and {}, got {}",
                MIN_SIDES, MAX_SIDES, state.sides
            )));
        }
        if let Some(points) = &state.points {
            if points.iter().any(|p| !p.is_finite()) {
                return Err(FillError::MalformedState(
                    "points must be finite".to_string(),
                ));
            }
        }

        Ok(state)
    }

    /// Serializes the record for storage.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Loads the stored record, falling back to the default on any problem.
    pub fn load(store: &dyn StateStore) -> Self {
        let text = match store.read(STATE_KEY) {
            Ok(Some(text)) => text,
            Ok(None) => {
                logger::debug("No stored shape, using defaults");
                return Self::default();
            }
            Err(e) => {
                logger::warn(&format!("Could not read stored shape, using defaults: {}", e));
                return Self::default();
            }
        };

        match Self::parse(&text) {
            Ok(state) => {
                logger::debug(&format!("Restored {}-sided shape", state.sides));
                state
            }
            Err(e) => {
                logger::warn(&format!("Ignoring stored shape: {}", e));
                Self::default()
            }
        }
    }

    /// Writes the record to the store.
    pub fn save(&self, store: &mut dyn StateStore) -> Result<()> {
        store.write(STATE_KEY, &self.to_json()?)
    }

    /// Builds the polygon this record describes.
    pub fn to_polygon(&self) -> Result<Polygon> {
        Polygon::new(self.sides, self.points.as_deref())
    }
}

/// Key/value sink for persisted state.
pub trait StateStore {
    /// Returns the stored value, or `None` if nothing is stored under `key`.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn write(&mut self, key: &str, value: &str) -> Result<()>;
}

impl<T: StateStore + ?Sized> StateStore for Box<T> {
    fn read(&self, key: &str) -> Result<Option<String>> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).write(key, value)
    }
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl StateStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(FillError::Io(e)),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)?;
        Ok(())
    }
}

/// In-memory store. Counts writes so callers can observe coalescing.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with one entry.
    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.entries.insert(key.to_string(), value.to_string());
        store
    }

    /// Number of writes performed so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl StateStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}
