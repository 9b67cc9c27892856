//! Polygon state and the shape model that keeps its fill current.

use geo::{Area, BoundingRect, Coord, LineString};
use std::sync::mpsc::{channel, Receiver, Sender};

use crate::error::{FillError, Result};
use crate::fill::{ActiveTileSet, ScanFill};
use crate::logger;
use crate::math::{radial_points, Bbox, Point, DEFAULT_CENTER, DEFAULT_RADIUS};
use crate::persistence::ShapeState;

/// Fewest sides a polygon may have.
pub const MIN_SIDES: usize = 3;

/// Most sides a polygon may have.
pub const MAX_SIDES: usize = 1024;

/// Connection between two vertices, stored as indices into the polygon.
///
/// An edge has no position of its own; its endpoints are always read
/// through the polygon's current vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub left: usize,
    pub right: usize,
}

/// Notification emitted when a vertex is dragged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexMoved {
    pub index: usize,
    pub from: Point,
    pub to: Point,
    /// Indices of the edges ending and starting at the moved vertex.
    pub edges: [usize; 2],
}

/// Closed polygon with a fixed number of sides and counter-clockwise winding.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Point>,
    edges: Vec<Edge>,
}

impl Polygon {
    /// Creates a polygon from `points` if it has at least `sides` entries,
    /// otherwise lays the vertices out radially around the default center.
    pub fn new(sides: usize, points: Option<&[Point]>) -> Result<Self> {
        match points {
            Some(points) if points.len() >= sides => Self::from_points(sides, points),
            _ => Self::radial(sides, DEFAULT_CENTER, DEFAULT_RADIUS),
        }
    }

    /// Creates a regular polygon on a circle, first vertex straight up.
    pub fn radial(sides: usize, center: Point, radius: f64) -> Result<Self> {
        if !(MIN_SIDES..=MAX_SIDES).contains(&sides) {
            return Err(FillError::InvalidSides(sides));
        }
        Self::from_points(sides, &radial_points(sides, center, radius))
    }

    fn from_points(sides: usize, points: &[Point]) -> Result<Self> {
        if !(MIN_SIDES..=MAX_SIDES).contains(&sides) {
            return Err(FillError::InvalidSides(sides));
        }

        let vertices = points[..sides].to_vec();
        if let Some(bad) = vertices.iter().find(|p| !p.is_finite()) {
            return Err(FillError::NonFinitePoint { x: bad.x, y: bad.y });
        }

        let edges = (0..sides)
            .map(|i| Edge {
                left: i,
                right: (i + 1) % sides,
            })
            .collect();

        Ok(Self { vertices, edges })
    }

    pub fn sides(&self) -> usize {
        self.vertices.len()
    }

    pub fn vertex(&self, index: usize) -> Option<Point> {
        self.vertices.get(index).copied()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Current endpoint positions of an edge.
    pub fn endpoints(&self, edge: &Edge) -> (Point, Point) {
        (self.vertices[edge.left], self.vertices[edge.right])
    }

    /// Endpoint pairs of every edge, in winding order.
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.edges.iter().map(|edge| self.endpoints(edge))
    }

    /// Ordered vertex coordinates, as persisted.
    pub fn vertex_positions(&self) -> Vec<Point> {
        self.vertices.clone()
    }

    /// Moves one vertex. Edge adjacency never changes.
    pub fn move_vertex(&mut self, index: usize, position: Point) -> Result<VertexMoved> {
        let sides = self.sides();
        if index >= sides {
            return Err(FillError::VertexOutOfRange { index, sides });
        }
        if !position.is_finite() {
            return Err(FillError::NonFinitePoint {
                x: position.x,
                y: position.y,
            });
        }

        let from = std::mem::replace(&mut self.vertices[index], position);
        Ok(VertexMoved {
            index,
            from,
            to: position,
            edges: [(index + sides - 1) % sides, index],
        })
    }

    /// Converts to a `geo` polygon (exterior ring only).
    pub fn to_geo(&self) -> geo::Polygon<f64> {
        let ring: Vec<Coord<f64>> = self
            .vertices
            .iter()
            .map(|p| Coord { x: p.x, y: p.y })
            .collect();
        geo::Polygon::new(LineString::from(ring), vec![])
    }

    /// Enclosed area, regardless of winding.
    pub fn area(&self) -> f64 {
        self.to_geo().unsigned_area()
    }

    pub fn bounds(&self) -> Option<Bbox> {
        self.to_geo()
            .bounding_rect()
            .map(|r| Bbox::new(r.min().x, r.min().y, r.max().x, r.max().y))
    }
}

/// Event published by the shape model after it recomputes the fill.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeEvent {
    /// A vertex moved and the fill was recomputed.
    Moved {
        vertex: VertexMoved,
        active: ActiveTileSet,
    },
    /// The scan bounds changed and the fill was recomputed.
    Refilled { active: ActiveTileSet },
}

impl ShapeEvent {
    pub fn active(&self) -> &ActiveTileSet {
        match self {
            ShapeEvent::Moved { active, .. } | ShapeEvent::Refilled { active } => active,
        }
    }
}

/// Mutable polygon plus its current fill.
#[derive(Debug)]
pub struct ShapeModel {
    polygon: Polygon,
    engine: ScanFill,
    active: ActiveTileSet,
    subscribers: Vec<Sender<ShapeEvent>>,
}

impl ShapeModel {
    /// Creates the model and computes the initial fill.
    pub fn new(polygon: Polygon, engine: ScanFill) -> Self {
        let active = engine.fill_polygon(&polygon);
        Self {
            polygon,
            engine,
            active,
            subscribers: Vec::new(),
        }
    }

    /// Registers a new listener for shape events.
    pub fn subscribe(&mut self) -> Receiver<ShapeEvent> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    pub fn active_tiles(&self) -> &ActiveTileSet {
        &self.active
    }

    /// Moves a vertex, recomputes the fill and notifies subscribers.
    pub fn move_vertex(&mut self, index: usize, position: Point) -> Result<&ActiveTileSet> {
        let vertex = self.polygon.move_vertex(index, position)?;
        self.recompute();
        logger::debug(&format!(
            "Vertex {} moved to ({:.1}, {:.1}): {} active tiles",
            vertex.index,
            vertex.to.x,
            vertex.to.y,
            self.active.len()
        ));
        self.publish(ShapeEvent::Moved {
            vertex,
            active: self.active.clone(),
        });
        Ok(&self.active)
    }

    /// Restricts the scan to a `cols` x `rows` grid and refills.
    pub fn set_bounds(&mut self, cols: u32, rows: u32) -> &ActiveTileSet {
        self.engine = self.engine.with_bounds(cols, rows);
        self.recompute();
        self.publish(ShapeEvent::Refilled {
            active: self.active.clone(),
        });
        &self.active
    }

    /// Persistence record of the current shape.
    pub fn state(&self) -> ShapeState {
        ShapeState {
            sides: self.polygon.sides(),
            points: Some(self.polygon.vertex_positions()),
        }
    }

    fn recompute(&mut self) {
        self.active = self.engine.fill_polygon(&self.polygon);
    }

    fn publish(&mut self, event: ShapeEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}
