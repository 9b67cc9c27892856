//! Application session: one shape over one grid, with debounced side effects.

use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use crate::debounce::{Debouncer, PERSIST_QUIET, RESIZE_QUIET};
use crate::error::{FillError, Result};
use crate::fill::ScanFill;
use crate::grid::TileGrid;
use crate::logger;
use crate::math::{grid_dimensions, Point};
use crate::persistence::{ShapeState, StateStore};
use crate::shape::{ShapeEvent, ShapeModel, MAX_SIDES, MIN_SIDES};

/// Settings a session is opened with.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Tile edge length in pixels.
    pub tile_size: f64,
    /// Viewport width in pixels.
    pub width: f64,
    /// Viewport height in pixels.
    pub height: f64,
    /// Forces this many sides; a stored shape with another count is replaced.
    pub sides: Option<usize>,
    /// Ignore any stored shape.
    pub reset: bool,
    pub persist_quiet: Duration,
    pub resize_quiet: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tile_size: 20.0,
            width: 640.0,
            height: 480.0,
            sides: None,
            reset: false,
            persist_quiet: PERSIST_QUIET,
            resize_quiet: RESIZE_QUIET,
        }
    }
}

/// What a `tick` or `flush` did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    pub resized: bool,
    pub saved: bool,
}

/// Wires the shape model to the grid and to the state store.
pub struct Session<S: StateStore> {
    model: ShapeModel,
    grid: TileGrid,
    store: S,
    events: Receiver<ShapeEvent>,
    persist: Debouncer,
    resize: Debouncer,
    pending_viewport: Option<(f64, f64)>,
}

impl<S: StateStore> Session<S> {
    /// Opens a session, restoring the stored shape when there is a usable one.
    pub fn open(config: SessionConfig, store: S) -> Result<Self> {
        let mut grid = TileGrid::from_viewport(config.width, config.height, config.tile_size)?;

        let mut state = if config.reset {
            ShapeState::default()
        } else {
            ShapeState::load(&store)
        };
        let mut regenerated = config.reset;

        if let Some(sides) = config.sides {
            if !(MIN_SIDES..=MAX_SIDES).contains(&sides) {
                return Err(FillError::InvalidSides(sides));
            }
            if sides != state.sides {
                state = ShapeState {
                    sides,
                    points: None,
                };
                regenerated = true;
            }
        }

        let (cols, rows) = grid.dimensions();
        let engine = ScanFill::new(config.tile_size)?.with_bounds(cols, rows);
        let mut model = ShapeModel::new(state.to_polygon()?, engine);
        let events = model.subscribe();
        grid.set_active_tiles(model.active_tiles());

        logger::info(&format!(
            "Opened {}-sided shape on a {}x{} grid ({} active tiles)",
            model.polygon().sides(),
            cols,
            rows,
            model.active_tiles().len()
        ));

        let mut persist = Debouncer::new(config.persist_quiet);
        if regenerated {
            persist.trigger(Instant::now());
        }

        Ok(Self {
            model,
            grid,
            store,
            events,
            persist,
            resize: Debouncer::new(config.resize_quiet),
            pending_viewport: None,
        })
    }

    /// Drags vertex `index` to `position` and schedules a save.
    pub fn drag(&mut self, index: usize, position: Point, now: Instant) -> Result<()> {
        self.model.move_vertex(index, position)?;
        self.apply_events();
        self.persist.trigger(now);
        Ok(())
    }

    /// Schedules a grid resize to a new viewport size in pixels.
    pub fn resize(&mut self, width: f64, height: f64, now: Instant) -> Result<()> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(FillError::InvalidGrid { width, height });
        }
        self.pending_viewport = Some((width, height));
        self.resize.trigger(now);
        Ok(())
    }

    /// Runs whatever debounced work is due at `now`.
    pub fn tick(&mut self, now: Instant) -> Result<TickOutcome> {
        let mut outcome = TickOutcome::default();
        if self.resize.fire(now) {
            outcome.resized = self.apply_resize()?;
        }
        if self.persist.fire(now) {
            self.save()?;
            outcome.saved = true;
        }
        Ok(outcome)
    }

    /// Runs all pending debounced work immediately.
    pub fn flush(&mut self) -> Result<TickOutcome> {
        let mut outcome = TickOutcome::default();
        if self.resize.flush() {
            outcome.resized = self.apply_resize()?;
        }
        if self.persist.flush() {
            self.save()?;
            outcome.saved = true;
        }
        Ok(outcome)
    }

    /// Writes the current shape to the store now.
    pub fn save(&mut self) -> Result<()> {
        let state = self.model.state();
        state.save(&mut self.store)?;
        logger::debug(&format!("Saved {}-sided shape", state.sides));
        Ok(())
    }

    pub fn model(&self) -> &ShapeModel {
        &self.model
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn has_pending_save(&self) -> bool {
        self.persist.is_pending()
    }

    fn apply_resize(&mut self) -> Result<bool> {
        let Some((width, height)) = self.pending_viewport.take() else {
            return Ok(false);
        };

        let (cols, rows) = grid_dimensions(width, height, self.grid.tile_size());
        if (cols, rows) == self.grid.dimensions() {
            return Ok(false);
        }

        self.grid.resize(cols, rows)?;
        self.model.set_bounds(cols, rows);
        self.apply_events();
        logger::debug(&format!("Resized grid to {}x{}", cols, rows));
        Ok(true)
    }

    /// Applies the latest published fill to the grid.
    fn apply_events(&mut self) {
        if let Some(event) = self.events.try_iter().last() {
            self.grid.set_active_tiles(event.active());
        }
    }
}
