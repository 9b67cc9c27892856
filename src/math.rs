//! Geometric primitives and tile-grid arithmetic.

use serde::{Deserialize, Serialize};

/// Center of the default radial polygon, in canvas pixels.
pub const DEFAULT_CENTER: Point = Point { x: 300.0, y: 300.0 };

/// Radius of the default radial polygon, in canvas pixels.
pub const DEFAULT_RADIUS: f64 = 200.0;

/// A 2D coordinate in canvas space (same unit as the tile size, y pointing down).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Creates a new point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns this point shifted by `(dx, dy)`.
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Returns true if both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Axis-aligned bounding box in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bbox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bbox {
    /// Creates a new bounding box.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Returns the width of the bbox.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Returns the height of the bbox.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Floors `n` down to a multiple of `step`, i.e. `floor(n - n mod step)`.
///
/// Uses the Euclidean remainder so negative inputs still round toward
/// negative infinity.
pub fn floor_to_multiple(n: f64, step: f64) -> f64 {
    (n - n.rem_euclid(step)).floor()
}

/// Index of the tile containing coordinate `n` along one axis.
pub fn tile_index(n: f64, tile_size: f64) -> i64 {
    (floor_to_multiple(n, tile_size) / tile_size).round() as i64
}

/// Calculate grid dimensions (cols, rows) covering a viewport of the given size.
pub fn grid_dimensions(width: f64, height: f64, tile_size: f64) -> (u32, u32) {
    let cols = (width / tile_size).ceil() as u32;
    let rows = (height / tile_size).ceil() as u32;
    (cols, rows)
}

/// Distributes `sides` points evenly on a circle, starting at 90 degrees and
/// going counter-clockwise as seen on screen.
pub fn radial_points(sides: usize, center: Point, radius: f64) -> Vec<Point> {
    let step = 360.0 / sides as f64;
    (0..sides)
        .map(|i| {
            let angle = (90.0 + step * i as f64).to_radians();
            Point::new(
                center.x + radius * angle.cos(),
                center.y - radius * angle.sin(),
            )
        })
        .collect()
}
