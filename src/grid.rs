//! Tile grid that displays the fill result.

use crate::error::{FillError, Result};
use crate::fill::ActiveTileSet;
use crate::logger;
use crate::math::grid_dimensions;

/// Grid of tiles indexed `[row][col]`, each either active or inactive.
#[derive(Debug, Clone, PartialEq)]
pub struct TileGrid {
    cols: u32,
    rows: u32,
    tile_size: f64,
    tiles: Vec<Vec<bool>>,
}

impl TileGrid {
    /// Creates an all-inactive grid. Fails fast on an empty surface.
    pub fn new(cols: u32, rows: u32, tile_size: f64) -> Result<Self> {
        if !tile_size.is_finite() || tile_size <= 0.0 {
            return Err(FillError::InvalidTileSize(tile_size));
        }
        if cols == 0 || rows == 0 {
            return Err(FillError::InvalidGrid {
                width: cols as f64,
                height: rows as f64,
            });
        }

        Ok(Self {
            cols,
            rows,
            tile_size,
            tiles: vec![vec![false; cols as usize]; rows as usize],
        })
    }

    /// Creates a grid covering a viewport measured in pixels.
    pub fn from_viewport(width: f64, height: f64, tile_size: f64) -> Result<Self> {
        if !tile_size.is_finite() || tile_size <= 0.0 {
            return Err(FillError::InvalidTileSize(tile_size));
        }
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(FillError::InvalidGrid { width, height });
        }

        let (cols, rows) = grid_dimensions(width, height, tile_size);
        Self::new(cols, rows, tile_size)
    }

    /// Grid size as (cols, rows).
    pub fn dimensions(&self) -> (u32, u32) {
        (self.cols, self.rows)
    }

    pub fn tile_size(&self) -> f64 {
        self.tile_size
    }

    /// Changes the grid size. All tiles become inactive until the next
    /// `set_active_tiles`.
    pub fn resize(&mut self, cols: u32, rows: u32) -> Result<()> {
        *self = Self::new(cols, rows, self.tile_size)?;
        Ok(())
    }

    /// Replaces the active state of every tile. Tiles outside the grid are
    /// ignored. Returns the number of tiles that were applied.
    pub fn set_active_tiles(&mut self, active: &ActiveTileSet) -> usize {
        for row in &mut self.tiles {
            row.fill(false);
        }

        let mut applied = 0;
        let mut ignored = 0;
        for (col, rows) in active.columns() {
            for &row in rows {
                match self
                    .tiles
                    .get_mut(row as usize)
                    .and_then(|r| r.get_mut(col as usize))
                {
                    Some(tile) => {
                        *tile = true;
                        applied += 1;
                    }
                    None => ignored += 1,
                }
            }
        }

        if ignored > 0 {
            logger::debug(&format!("Ignored {} tiles outside the grid", ignored));
        }
        applied
    }

    pub fn is_active(&self, col: u32, row: u32) -> bool {
        self.tiles
            .get(row as usize)
            .and_then(|r| r.get(col as usize))
            .copied()
            .unwrap_or(false)
    }

    pub fn active_count(&self) -> usize {
        self.tiles
            .iter()
            .map(|row| row.iter().filter(|&&on| on).count())
            .sum()
    }

    /// Text rendering, one line per row: `#` active, `.` inactive.
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity(((self.cols + 1) * self.rows) as usize);
        for row in &self.tiles {
            out.extend(row.iter().map(|&on| if on { '#' } else { '.' }));
            out.push('\n');
        }
        out
    }
}
