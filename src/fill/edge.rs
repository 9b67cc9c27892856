//! Scan-line edges and the per-row crossing table.
//!
//! This module provides the `ScanEdge` and `ScanlineTable` structures used by
//! the fill engine to find where each tile-center scan-line crosses the
//! polygon outline.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use crate::math::{tile_index, Point};

/// Represents a non-horizontal polygon edge in the scan-line algorithm.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanEdge {
    /// Smallest Y coordinate of the edge.
    pub y_min: f64,
    /// Largest Y coordinate of the edge.
    pub y_max: f64,
    /// X coordinate at `y_min`.
    pub x_start: f64,
    /// Reciprocal of the slope (dx/dy). Zero for vertical edges.
    pub inv_slope: f64,
}

impl ScanEdge {
    /// Creates a new `ScanEdge` from two points.
    ///
    /// Returns `None` for horizontal or zero-length edges, which never cross a
    /// scan-line, and for edges with non-finite coordinates.
    pub fn new(p1: Point, p2: Point) -> Option<Self> {
        if !p1.is_finite() || !p2.is_finite() {
            return None;
        }

        if (p1.y - p2.y).abs() < 1e-9 {
            return None;
        }

        let (p_start, p_end) = if p1.y < p2.y { (p1, p2) } else { (p2, p1) };
        let inv_slope = (p_end.x - p_start.x) / (p_end.y - p_start.y);

        Some(ScanEdge {
            y_min: p_start.y,
            y_max: p_end.y,
            x_start: p_start.x,
            inv_slope,
        })
    }

    /// X coordinate where the edge meets the horizontal line at `y`.
    pub fn x_at(&self, y: f64) -> f64 {
        self.x_start + (y - self.y_min) * self.inv_slope
    }

    /// Scan-line rows crossed by this edge.
    ///
    /// Row `r` sits at `y = r * tile_size`. The first row is strictly above
    /// `y_min`, the last one may touch `y_max`, so a vertex shared by two
    /// edges is counted exactly once.
    pub fn rows(&self, tile_size: f64) -> RangeInclusive<i64> {
        let first = (self.y_min / tile_size).floor() as i64 + 1;
        let last = (self.y_max / tile_size).floor() as i64;
        first..=last
    }
}

/// A horizontal run of inside tiles on one row, `start_col..end_col`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub row: i64,
    pub start_col: i64,
    pub end_col: i64,
}

/// Edge crossings organized by scan-line row.
#[derive(Debug, Clone)]
pub struct ScanlineTable {
    tile_size: f64,
    /// Rows outside `row_start..row_end` are never recorded.
    row_start: i64,
    row_end: i64,
    entries: BTreeMap<i64, Vec<f64>>,
}

impl ScanlineTable {
    /// Creates a new empty table covering every non-negative row.
    pub fn new(tile_size: f64) -> Self {
        ScanlineTable {
            tile_size,
            row_start: 0,
            row_end: i64::MAX,
            entries: BTreeMap::new(),
        }
    }

    /// Creates a table that only records rows `0..rows`.
    pub fn bounded(tile_size: f64, rows: u32) -> Self {
        ScanlineTable {
            row_end: rows as i64,
            ..Self::new(tile_size)
        }
    }

    /// Records the crossings of `edge` with every scan-line it spans.
    pub fn add_edge(&mut self, edge: &ScanEdge) {
        let rows = edge.rows(self.tile_size);
        let first = (*rows.start()).max(self.row_start);
        let last = (*rows.end()).min(self.row_end - 1);

        for row in first..=last {
            let y = row as f64 * self.tile_size;
            self.entries.entry(row).or_default().push(edge.x_at(y));
        }
    }

    /// Number of crossings recorded on `row`.
    pub fn crossings(&self, row: i64) -> usize {
        self.entries.get(&row).map_or(0, Vec::len)
    }

    /// Pairs the crossings of each row into inside spans.
    ///
    /// Crossings are sorted by x and consumed two at a time, so the result
    /// does not depend on the order edges were added. A trailing unpaired
    /// crossing is dropped.
    pub fn spans(&self) -> Vec<Span> {
        let mut spans = Vec::new();

        for (&row, xs) in &self.entries {
            let mut xs = xs.clone();
            xs.sort_by(f64::total_cmp);

            for pair in xs.chunks_exact(2) {
                let start_col = tile_index(pair[0], self.tile_size);
                let end_col = tile_index(pair[1], self.tile_size);
                if start_col < end_col {
                    spans.push(Span {
                        row,
                        start_col,
                        end_col,
                    });
                }
            }
        }

        spans
    }
}
