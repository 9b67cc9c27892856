//! Scan-line fill of an editable polygon onto a tile grid.
//!
//! A [`shape::ShapeModel`] owns the polygon and recomputes the set of tiles
//! whose centers lie inside it every time a vertex moves. A
//! [`session::Session`] applies each result to a [`grid::TileGrid`] and saves
//! the shape through a debounced [`persistence::StateStore`].

pub mod cli;
pub mod debounce;
pub mod error;
pub mod fill;
pub mod grid;
pub mod logger;
pub mod math;
pub mod persistence;
pub mod render;
pub mod session;
pub mod shape;

pub use error::{FillError, Result};
pub use fill::{ActiveTileSet, ScanFill, TileKey};
pub use grid::TileGrid;
pub use math::Point;
pub use shape::{Polygon, ShapeModel};
