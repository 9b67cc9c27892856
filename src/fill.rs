//! Scan-line fill of a polygon onto a tile grid.
//!
//! Tiles are sampled at their centers: every edge endpoint is shifted by
//! half a tile right and up before scanning, so the scan-line at
//! `y = row * tile_size` runs through the centers of that row and the span
//! between two floored crossings covers exactly the tiles whose centers lie
//! between them.
//!
//! 1. Build a `ScanEdge` for every non-horizontal edge.
//! 2. Record each edge's crossings with the scan-lines it spans in a
//!    `ScanlineTable`.
//! 3. Sort the crossings of each row and pair them into inside spans.
//! 4. Collect the spans into an `ActiveTileSet`.

use std::collections::{BTreeMap, BTreeSet};

pub mod edge;

use crate::error::{FillError, Result};
use crate::math::Point;
use crate::shape::Polygon;
use edge::{ScanEdge, ScanlineTable};

/// Integer address of a tile on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TileKey {
    pub col: u32,
    pub row: u32,
}

impl TileKey {
    pub fn new(col: u32, row: u32) -> Self {
        Self { col, row }
    }
}

/// Tiles judged to lie inside the polygon, grouped by column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveTileSet {
    columns: BTreeMap<u32, BTreeSet<u32>>,
}

impl ActiveTileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a tile as inside. Returns false if it was already marked.
    pub fn insert(&mut self, col: u32, row: u32) -> bool {
        self.columns.entry(col).or_default().insert(row)
    }

    pub fn contains(&self, col: u32, row: u32) -> bool {
        self.columns.get(&col).is_some_and(|rows| rows.contains(&row))
    }

    /// Total number of active tiles.
    pub fn len(&self) -> usize {
        self.columns.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Rows marked in one column.
    pub fn rows_in(&self, col: u32) -> Option<&BTreeSet<u32>> {
        self.columns.get(&col)
    }

    /// The column to rows mapping, ordered by column.
    pub fn columns(&self) -> impl Iterator<Item = (u32, &BTreeSet<u32>)> {
        self.columns.iter().map(|(&col, rows)| (col, rows))
    }

    /// Every active tile, ordered by column then row.
    pub fn iter(&self) -> impl Iterator<Item = TileKey> + '_ {
        self.columns
            .iter()
            .flat_map(|(&col, rows)| rows.iter().map(move |&row| TileKey::new(col, row)))
    }
}

impl FromIterator<TileKey> for ActiveTileSet {
    fn from_iter<I: IntoIterator<Item = TileKey>>(iter: I) -> Self {
        let mut set = ActiveTileSet::new();
        for key in iter {
            set.insert(key.col, key.row);
        }
        set
    }
}

/// Scan-line fill engine for a fixed tile size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanFill {
    tile_size: f64,
    bounds: Option<(u32, u32)>,
}

impl ScanFill {
    /// Creates an unbounded engine. The tile size must be positive and finite.
    pub fn new(tile_size: f64) -> Result<Self> {
        if !tile_size.is_finite() || tile_size <= 0.0 {
            return Err(FillError::InvalidTileSize(tile_size));
        }
        Ok(Self {
            tile_size,
            bounds: None,
        })
    }

    /// Limits the scan to a grid of `cols` x `rows` tiles.
    pub fn with_bounds(mut self, cols: u32, rows: u32) -> Self {
        self.bounds = Some((cols, rows));
        self
    }

    pub fn tile_size(&self) -> f64 {
        self.tile_size
    }

    /// Computes the active tiles of a polygon.
    pub fn fill_polygon(&self, polygon: &Polygon) -> ActiveTileSet {
        self.fill_segments(polygon.segments())
    }

    /// Computes the active tiles enclosed by a set of edges.
    ///
    /// Degenerate edges are skipped; they never abort the pass.
    pub fn fill_segments<I>(&self, segments: I) -> ActiveTileSet
    where
        I: IntoIterator<Item = (Point, Point)>,
    {
        let half = self.tile_size / 2.0;
        let mut table = match self.bounds {
            Some((_, rows)) => ScanlineTable::bounded(self.tile_size, rows),
            None => ScanlineTable::new(self.tile_size),
        };

        for (from, to) in segments {
            let shifted = ScanEdge::new(from.offset(half, -half), to.offset(half, -half));
            if let Some(edge) = shifted {
                table.add_edge(&edge);
            }
        }

        let col_limit = self.bounds.map_or(i64::from(u32::MAX), |(cols, _)| cols as i64);
        let mut active = ActiveTileSet::new();

        for span in table.spans() {
            let Ok(row) = u32::try_from(span.row) else {
                continue;
            };
            for col in span.start_col.max(0)..span.end_col.min(col_limit) {
                active.insert(col as u32, row);
            }
        }

        active
    }
}
