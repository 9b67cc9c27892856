//! CLI argument parsing and validation.

use clap::Parser;
use std::path::PathBuf;

use crate::error::{FillError, Result};
use crate::logger::VerbosityLevel;
use crate::math::Point;
use crate::render::RenderConfig;
use crate::session::SessionConfig;
use crate::shape::{MAX_SIDES, MIN_SIDES};

/// Command line arguments for tile-fill.
#[derive(Parser, Debug)]
#[command(name = "tile-fill")]
#[command(version, about = "Fill the grid tiles covered by an editable polygon", long_about = None)]
pub struct Args {
    /// Number of polygon sides (regenerates the shape if it differs from the stored one).
    #[arg(long)]
    pub sides: Option<usize>,

    /// Tile size in pixels.
    #[arg(short, long, default_value = "20")]
    pub tile_size: f64,

    /// Viewport width in pixels.
    #[arg(long, default_value = "640")]
    pub width: f64,

    /// Viewport height in pixels.
    #[arg(long, default_value = "480")]
    pub height: f64,

    /// Directory holding the persisted shape (in-memory only if omitted).
    #[arg(short, long)]
    pub state_dir: Option<PathBuf>,

    /// Ignore the persisted shape and start from the default one.
    #[arg(long)]
    pub reset: bool,

    /// Drag a vertex: "INDEX:X,Y". May be repeated.
    #[arg(short, long = "move", value_name = "INDEX:X,Y")]
    pub moves: Vec<String>,

    /// Write the grid as a PNG image.
    #[arg(short, long)]
    pub png: Option<PathBuf>,

    /// Output pixels per tile in the PNG (default: the tile size).
    #[arg(long)]
    pub pixels_per_tile: Option<u32>,

    /// Active tile color RGBA hex (e.g., "3366FFC0").
    #[arg(long, default_value = "3366FFC0")]
    pub fill: String,

    /// Outline color RGB hex (e.g., "FF0000").
    #[arg(long, default_value = "FF0000")]
    pub stroke: String,

    /// Outline width in pixels.
    #[arg(long, default_value = "1")]
    pub stroke_width: u32,

    /// Print active tiles as "col,row" lines instead of the grid.
    #[arg(long)]
    pub list: bool,

    /// Timestamped debug output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print errors and written file paths.
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output.
    #[arg(long)]
    pub no_color: bool,
}

/// A vertex drag requested on the command line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexMove {
    pub index: usize,
    pub position: Point,
}

/// Fully validated configuration object.
#[derive(Debug)]
pub struct Config {
    /// Grid, shape and debounce settings.
    pub session: SessionConfig,
    /// Persistence directory (None keeps state in memory).
    pub state_dir: Option<PathBuf>,
    /// Drags to apply, in order.
    pub moves: Vec<VertexMove>,
    /// PNG output path.
    pub png: Option<PathBuf>,
    /// PNG appearance.
    pub render: RenderConfig,
    /// Print a tile list rather than the grid.
    pub list: bool,
}

impl Args {
    /// Verbosity implied by the flags.
    pub fn verbosity(&self) -> VerbosityLevel {
        VerbosityLevel::from_flags(self.quiet, self.verbose)
    }

    /// Validates arguments and converts them to a structured `Config`.
    pub fn validate(self) -> Result<Config> {
        if self.quiet && self.verbose {
            return Err(FillError::ConflictingOptions(
                "quiet".to_string(),
                "verbose".to_string(),
            ));
        }

        if !self.tile_size.is_finite() || self.tile_size <= 0.0 {
            return Err(FillError::InvalidTileSize(self.tile_size));
        }

        if !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
        {
            return Err(FillError::InvalidGrid {
                width: self.width,
                height: self.height,
            });
        }

        if let Some(sides) = self.sides {
            if !(MIN_SIDES..=MAX_SIDES).contains(&sides) {
                return Err(FillError::InvalidSides(sides));
            }
        }

        let moves = self
            .moves
            .iter()
            .map(|m| parse_move(m))
            .collect::<Result<Vec<_>>>()?;

        let fill = parse_rgba(&self.fill)?;
        let stroke = parse_rgb(&self.stroke)?;

        let pixels_per_tile = self
            .pixels_per_tile
            .unwrap_or_else(|| self.tile_size.round().max(1.0) as u32)
            .max(1);

        Ok(Config {
            session: SessionConfig {
                tile_size: self.tile_size,
                width: self.width,
                height: self.height,
                sides: self.sides,
                reset: self.reset,
                ..SessionConfig::default()
            },
            state_dir: self.state_dir,
            moves,
            png: self.png,
            render: RenderConfig {
                pixels_per_tile,
                fill,
                stroke,
                stroke_width: self.stroke_width,
            },
            list: self.list,
        })
    }
}

fn parse_move(s: &str) -> Result<VertexMove> {
    let (index, coords) = s
        .split_once(':')
        .ok_or_else(|| FillError::InvalidMove(format!("expected INDEX:X,Y, got '{}'", s)))?;

    let index: usize = index
        .trim()
        .parse()
        .map_err(|_| FillError::InvalidMove(format!("invalid vertex index '{}'", index)))?;

    let parts: Vec<&str> = coords.split(',').collect();
    if parts.len() != 2 {
        return Err(FillError::InvalidMove(format!(
            "expected 2 comma-separated coordinates, got {}",
            parts.len()
        )));
    }

    let values: std::result::Result<Vec<f64>, _> = parts.iter().map(|p| p.trim().parse()).collect();
    let values =
        values.map_err(|_| FillError::InvalidMove("invalid number format".to_string()))?;

    let position = Point::new(values[0], values[1]);
    if !position.is_finite() {
        return Err(FillError::NonFinitePoint {
            x: position.x,
            y: position.y,
        });
    }

    Ok(VertexMove { index, position })
}

fn parse_rgba(s: &str) -> Result<[u8; 4]> {
    let bytes = hex::decode(s).map_err(|_| FillError::InvalidColor(s.to_string()))?;
    if bytes.len() != 4 {
        return Err(FillError::InvalidColor(format!(
            "RGBA color must be 8 hex digits, got {}",
            s.len()
        )));
    }
    Ok([bytes[0], bytes[1], bytes[2], bytes[3]])
}

fn parse_rgb(s: &str) -> Result<[u8; 3]> {
    let bytes = hex::decode(s).map_err(|_| FillError::InvalidColor(s.to_string()))?;
    if bytes.len() != 3 {
        return Err(FillError::InvalidColor(format!(
            "RGB color must be 6 hex digits, got {}",
            s.len()
        )));
    }
    Ok([bytes[0], bytes[1], bytes[2]])
}
