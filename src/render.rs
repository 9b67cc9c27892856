//! PNG rendering of the tile grid and the polygon outline.
//!
//! Active tiles are painted with alpha blending; the polygon outline is drawn
//! on top with Bresenham's algorithm.

use geo::Coord;
use image::{ImageBuffer, Rgba, RgbaImage};
use std::path::Path;

use crate::error::{FillError, Result};
use crate::grid::TileGrid;
use crate::shape::Polygon;

const MAX_DIMENSION: u32 = 20000;

/// Render configuration for a grid snapshot.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Edge length of one tile in output pixels.
    pub pixels_per_tile: u32,
    /// Active tile color in RGBA format.
    pub fill: [u8; 4],
    /// Outline color in RGB format.
    pub stroke: [u8; 3],
    /// Outline width in pixels. Zero disables the outline.
    pub stroke_width: u32,
}

/// Renderer that owns the output image buffer.
pub struct Renderer {
    config: RenderConfig,
    width: u32,
    height: u32,
    /// Output pixels per canvas unit.
    scale: f64,
    image: RgbaImage,
}

impl Renderer {
    /// Create a renderer sized for `grid`.
    ///
    /// Validates that the resulting image dimensions don't exceed `MAX_DIMENSION`.
    pub fn new(config: RenderConfig, grid: &TileGrid) -> Result<Self> {
        let (cols, rows) = grid.dimensions();
        let ppt = u64::from(config.pixels_per_tile.max(1));
        let width = u64::from(cols) * ppt;
        let height = u64::from(rows) * ppt;

        if width > u64::from(MAX_DIMENSION) || height > u64::from(MAX_DIMENSION) {
            return Err(FillError::ImageTooLarge {
                width: width.min(u64::from(u32::MAX)) as u32,
                height: height.min(u64::from(u32::MAX)) as u32,
                max: MAX_DIMENSION,
            });
        }

        let (width, height) = (width as u32, height as u32);
        let image = ImageBuffer::from_pixel(width, height, Rgba([0, 0, 0, 0]));

        Ok(Self {
            scale: ppt as f64 / grid.tile_size(),
            config,
            width,
            height,
            image,
        })
    }

    /// Get image dimensions
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Paint the active tiles of `grid`, then the outline of `polygon`.
    pub fn render(&mut self, grid: &TileGrid, polygon: &Polygon) {
        let (cols, rows) = grid.dimensions();
        let ppt = self.config.pixels_per_tile.max(1);
        let fill = Rgba(self.config.fill);

        for row in 0..rows {
            for col in 0..cols {
                if !grid.is_active(col, row) {
                    continue;
                }
                for y in row * ppt..(row + 1) * ppt {
                    for x in col * ppt..(col + 1) * ppt {
                        blend_pixel(&mut self.image, x, y, fill);
                    }
                }
            }
        }

        if self.config.stroke_width > 0 {
            self.render_outline(polygon);
        }
    }

    /// Draw the closed outline of a polygon.
    fn render_outline(&mut self, polygon: &Polygon) {
        let stroke = Rgba([
            self.config.stroke[0],
            self.config.stroke[1],
            self.config.stroke[2],
            255,
        ]);
        let width = self.config.stroke_width;

        let screen: Vec<(f64, f64)> = polygon
            .to_geo()
            .exterior()
            .coords()
            .map(|c: &Coord<f64>| (c.x * self.scale, c.y * self.scale))
            .collect();

        // keep a margin so thick strokes near the border are still drawn
        let margin = f64::from(width) + 1.0;
        let lo = (-margin, -margin);
        let hi = (self.width as f64 + margin, self.height as f64 + margin);

        for window in screen.windows(2) {
            if let Some((from, to)) = clip_segment(window[0], window[1], lo, hi) {
                self.draw_line(from, to, stroke, width);
            }
        }
    }

    /// Draw a line segment using Bresenham's algorithm.
    ///
    /// Thick lines are drawn as a square of pixels around each point of the
    /// ideal line. Endpoints must already be clipped near the image.
    fn draw_line(&mut self, from: (f64, f64), to: (f64, f64), color: Rgba<u8>, width: u32) {
        let (x0, y0) = (from.0 as i64, from.1 as i64);
        let (x1, y1) = (to.0 as i64, to.1 as i64);

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        let mut x = x0;
        let mut y = y0;

        let half_width = i64::from(width / 2);
        let (img_w, img_h) = (i64::from(self.width), i64::from(self.height));

        loop {
            for wx in -half_width..=half_width {
                for wy in -half_width..=half_width {
                    let px = x + wx;
                    let py = y + wy;
                    if px >= 0 && px < img_w && py >= 0 && py < img_h {
                        self.image.put_pixel(px as u32, py as u32, color);
                    }
                }
            }

            if x == x1 && y == y1 {
                break;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Save the image to a PNG file
    pub fn save(&self, path: &Path) -> Result<()> {
        self.image.save(path)?;
        Ok(())
    }
}

/// Clip a segment to the rectangle `lo..=hi` (Liang-Barsky).
///
/// Returns `None` when the segment lies entirely outside.
fn clip_segment(
    from: (f64, f64),
    to: (f64, f64),
    lo: (f64, f64),
    hi: (f64, f64),
) -> Option<((f64, f64), (f64, f64))> {
    let dx = to.0 - from.0;
    let dy = to.1 - from.1;
    let mut t0: f64 = 0.0;
    let mut t1: f64 = 1.0;

    for (p, q) in [
        (-dx, from.0 - lo.0),
        (dx, hi.0 - from.0),
        (-dy, from.1 - lo.1),
        (dy, hi.1 - from.1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
        }
    }

    if t0 > t1 {
        return None;
    }

    Some((
        (from.0 + t0 * dx, from.1 + t0 * dy),
        (from.0 + t1 * dx, from.1 + t1 * dy),
    ))
}

/// Blend a pixel with alpha compositing (Porter-Duff 'Over' operator).
fn blend_pixel(image: &mut RgbaImage, x: u32, y: u32, color: Rgba<u8>) {
    let dst = *image.get_pixel(x, y);
    let src_a = color.0[3] as f32 / 255.0;
    let dst_a = dst.0[3] as f32 / 255.0;

    let out_a = src_a + dst_a * (1.0 - src_a);

    if out_a == 0.0 {
        return;
    }

    let blend = |src: u8, dst: u8| -> u8 {
        let src = src as f32;
        let dst = dst as f32;
        ((src * src_a + dst * dst_a * (1.0 - src_a)) / out_a) as u8
    };

    image.put_pixel(
        x,
        y,
        Rgba([
            blend(color.0[0], dst.0[0]),
            blend(color.0[1], dst.0[1]),
            blend(color.0[2], dst.0[2]),
            (out_a * 255.0) as u8,
        ]),
    );
}
