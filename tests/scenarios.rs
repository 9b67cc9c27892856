use std::time::{Duration, Instant};

use geo::Contains;
use tile_fill::persistence::{FileStore, MemoryStore, ShapeState, StateStore, STATE_KEY};
use tile_fill::session::{Session, SessionConfig};
use tile_fill::shape::ShapeModel;
use tile_fill::{ActiveTileSet, Point, Polygon, ScanFill, TileKey};

fn points(coords: &[(f64, f64)]) -> Vec<Point> {
    coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
}

fn session_config() -> SessionConfig {
    SessionConfig {
        tile_size: 20.0,
        width: 640.0,
        height: 640.0,
        ..SessionConfig::default()
    }
}

#[test]
fn test_square_fills_exactly_its_tiles() {
    let square = points(&[
        (100.0, 100.0),
        (200.0, 100.0),
        (200.0, 200.0),
        (100.0, 200.0),
    ]);
    let polygon = Polygon::new(4, Some(&square)).unwrap();
    let active = ScanFill::new(20.0).unwrap().fill_polygon(&polygon);

    let expected: ActiveTileSet = (5..10)
        .flat_map(|col| (5..10).map(move |row| TileKey::new(col, row)))
        .collect();
    assert_eq!(active.len(), 25);
    assert_eq!(active, expected);
}

#[test]
fn test_radial_polygons_are_never_empty() {
    for sides in 3..=12 {
        let polygon = Polygon::new(sides, None).unwrap();
        for tile_size in [10.0, 20.0, 40.0, 75.0] {
            let bbox = polygon.bounds().unwrap();
            assert!(bbox.width() > tile_size && bbox.height() > tile_size);

            let active = ScanFill::new(tile_size).unwrap().fill_polygon(&polygon);
            assert!(
                !active.is_empty(),
                "{}-gon with tile size {} filled nothing",
                sides,
                tile_size
            );
        }
    }
}

#[test]
fn test_fill_is_idempotent() {
    let polygon = Polygon::new(7, None).unwrap();
    let engine = ScanFill::new(20.0).unwrap();
    assert_eq!(engine.fill_polygon(&polygon), engine.fill_polygon(&polygon));
}

#[test]
fn test_edge_visit_order_does_not_matter() {
    let engine = ScanFill::new(20.0).unwrap();
    for sides in 3..=9 {
        let polygon = Polygon::new(sides, None).unwrap();
        let reference = engine.fill_polygon(&polygon);

        let mut segments: Vec<(Point, Point)> = polygon.segments().collect();
        segments.reverse();
        assert_eq!(engine.fill_segments(segments.clone()), reference);

        segments.rotate_left(sides / 2);
        assert_eq!(engine.fill_segments(segments), reference);
    }
}

#[test]
fn test_fill_matches_tile_center_containment() {
    let tile_size = 20.0;
    let polygon = Polygon::radial(7, Point::new(313.7, 287.3), 171.9).unwrap();
    let active = ScanFill::new(tile_size).unwrap().fill_polygon(&polygon);
    let shape = polygon.to_geo();

    for col in 0..40u32 {
        for row in 0..40u32 {
            let center = geo::Point::new(
                (f64::from(col) + 0.5) * tile_size,
                (f64::from(row) + 0.5) * tile_size,
            );
            assert_eq!(
                active.contains(col, row),
                shape.contains(&center),
                "tile {},{}",
                col,
                row
            );
        }
    }
}

#[test]
fn test_vertex_positions_round_trip() {
    let given = points(&[
        (12.5, 40.0),
        (300.25, 18.0),
        (280.0, 260.75),
        (33.0, 199.0),
        (5.5, 120.0),
    ]);
    let polygon = Polygon::new(5, Some(&given)).unwrap();
    let positions = polygon.vertex_positions();

    assert_eq!(positions.len(), given.len());
    for (a, b) in positions.iter().zip(&given) {
        assert!((a.x - b.x).abs() < 1e-10);
        assert!((a.y - b.y).abs() < 1e-10);
    }
}

#[test]
fn test_polygon_inside_one_tile_is_empty() {
    let tiny = points(&[(101.0, 101.0), (108.0, 101.0), (104.0, 108.0)]);
    let polygon = Polygon::new(3, Some(&tiny)).unwrap();
    assert!(ScanFill::new(20.0).unwrap().fill_polygon(&polygon).is_empty());
}

#[test]
fn test_collapsing_to_zero_area_empties_the_fill() {
    let engine = ScanFill::new(20.0).unwrap();

    let triangle = points(&[(100.0, 100.0), (200.0, 100.0), (150.0, 200.0)]);
    let mut model = ShapeModel::new(Polygon::new(3, Some(&triangle)).unwrap(), engine);
    assert!(!model.active_tiles().is_empty());
    model.move_vertex(2, Point::new(150.0, 100.0)).unwrap();
    assert!(model.polygon().area() < 1e-9);
    assert!(model.active_tiles().is_empty());

    // collapse along a diagonal rather than onto a horizontal line
    let triangle = points(&[(100.0, 100.0), (200.0, 200.0), (60.0, 220.0)]);
    let mut model = ShapeModel::new(Polygon::new(3, Some(&triangle)).unwrap(), engine);
    assert!(!model.active_tiles().is_empty());
    model.move_vertex(2, Point::new(150.0, 150.0)).unwrap();
    assert!(model.active_tiles().is_empty());
}

#[test]
fn test_persisted_pentagon_matches_fresh_construction() {
    let pentagon = points(&[
        (320.0, 90.0),
        (130.0, 230.0),
        (200.0, 450.0),
        (440.0, 450.0),
        (510.0, 230.0),
    ]);
    let state = ShapeState {
        sides: 5,
        points: Some(pentagon.clone()),
    };
    let store = MemoryStore::with_entry(STATE_KEY, &state.to_json().unwrap());

    let session = Session::open(session_config(), store).unwrap();

    let engine = ScanFill::new(20.0).unwrap().with_bounds(32, 32);
    let fresh = ShapeModel::new(Polygon::new(5, Some(&pentagon)).unwrap(), engine);

    assert_eq!(session.model().active_tiles(), fresh.active_tiles());
    assert_eq!(session.grid().active_count(), fresh.active_tiles().len());
}

#[test]
fn test_malformed_state_falls_back_to_default() {
    let store = MemoryStore::with_entry(STATE_KEY, r#"{"sides":5,"points":"nope"}"#);
    let session = Session::open(session_config(), store).unwrap();

    assert_eq!(session.model().polygon(), &Polygon::new(4, None).unwrap());
    assert!(session.grid().active_count() > 0);
}

#[test]
fn test_drag_burst_writes_once() {
    let dir = tempfile::tempdir().unwrap();
    let start = Instant::now();
    let mut session = Session::open(session_config(), FileStore::new(dir.path())).unwrap();

    for step in 0..20u32 {
        let now = start + Duration::from_millis(u64::from(step) * 16);
        let y = 100.0 - f64::from(step);
        session.drag(0, Point::new(300.0, y), now).unwrap();
        assert!(!session.tick(now).unwrap().saved);
    }
    assert!(session.store().read(STATE_KEY).unwrap().is_none());

    let quiet = start + Duration::from_millis(19 * 16 + 200);
    assert!(session.tick(quiet).unwrap().saved);
    assert!(!session.tick(quiet + Duration::from_secs(1)).unwrap().saved);

    let stored = ShapeState::load(session.store());
    assert_eq!(stored.sides, 4);
    assert_eq!(stored.points.unwrap()[0], Point::new(300.0, 81.0));
}

#[test]
fn test_reopen_restores_dragged_shape() {
    let dir = tempfile::tempdir().unwrap();

    let mut session = Session::open(session_config(), FileStore::new(dir.path())).unwrap();
    session
        .drag(1, Point::new(60.5, 310.25), Instant::now())
        .unwrap();
    session.flush().unwrap();
    let before = session.model().active_tiles().clone();
    drop(session);

    let reopened = Session::open(session_config(), FileStore::new(dir.path())).unwrap();
    assert_eq!(
        reopened.model().polygon().vertex(1),
        Some(Point::new(60.5, 310.25))
    );
    assert_eq!(reopened.model().active_tiles(), &before);
}

#[test]
fn test_shrinking_grid_ignores_outside_tiles() {
    let start = Instant::now();
    let mut session = Session::open(session_config(), MemoryStore::new()).unwrap();
    let full = session.grid().active_count();

    session.resize(200.0, 200.0, start).unwrap();
    session.tick(start + Duration::from_millis(100)).unwrap();

    assert_eq!(session.grid().dimensions(), (10, 10));
    assert!(session.grid().active_count() < full);
    assert!(session
        .model()
        .active_tiles()
        .iter()
        .all(|key| key.col < 10 && key.row < 10));
}
