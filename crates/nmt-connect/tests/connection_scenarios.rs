//! End-to-end connection solves on typical road layouts.

use approx::assert_relative_eq;
use nmt_connect::{check_radii, Circle, Connection, Direction, PathPoint, SolveState};
use nmt_core::{ConnectionConfig, Highlight, Tolerance};
use nmt_math::{DVec3, FlatExt, OverlayItem, Trajectory};

fn connection(first: (DVec3, DVec3), last: (DVec3, DVec3)) -> Connection {
    connection_with(ConnectionConfig::default(), first, last)
}

fn connection_with(config: ConnectionConfig, first: (DVec3, DVec3), last: (DVec3, DVec3)) -> Connection {
    let mut c = Connection::new(config).unwrap();
    c.init(Trajectory::ray(first.0, first.1), Trajectory::ray(last.0, last.1))
        .unwrap();
    c
}

fn s_curve() -> Connection {
    connection(
        (DVec3::ZERO, DVec3::X),
        (DVec3::new(100.0, 0.0, 20.0), -DVec3::X),
    )
}

fn positions(points: &[PathPoint]) -> Vec<DVec3> {
    points.iter().filter_map(PathPoint::position).collect()
}

#[test]
fn test_s_curve_between_parallel_ends() {
    let mut c = s_curve();
    let points: Vec<PathPoint> = c.calculate().collect();
    assert_eq!(c.state(), SolveState::Calculated);

    let first = &c.circles()[0];
    let last = &c.circles()[1];
    assert_eq!(first.direction(), Direction::Left);
    assert_eq!(last.direction(), Direction::Right);
    assert_relative_eq!(first.radius(), 65.0, epsilon = 1e-9);
    assert_relative_eq!(last.radius(), 65.0, epsilon = 1e-9);
    assert!((first.center() - DVec3::new(0.0, 0.0, 65.0)).length() < 1e-9);
    assert!((last.center() - DVec3::new(100.0, 0.0, -45.0)).length() < 1e-9);

    let middle = c.straights()[1].unwrap();
    assert_relative_eq!(middle.length(), 5200f64.sqrt(), epsilon = 1e-9);
    assert!((first.end_pos() - middle.start).length() < 1e-9);
    assert!((last.start_pos() - middle.end).length() < 1e-9);
    assert!((first.end_dir() - middle.direction).length() < 1e-9);
    assert!((last.end_dir() - DVec3::X).length() < 1e-9);

    // Short arcs have no interior samples; the middle straight has five points
    assert!(points.iter().all(|p| !p.is_gap()));
    let pos = positions(&points);
    assert_eq!(pos.len(), 5);
    assert!((pos[0] - middle.start).length() < 1e-9);
    assert!((pos[4] - middle.end).length() < 1e-9);
    for pair in pos.windows(2) {
        assert!(pair[0].flat_distance(pair[1]) <= 20.0 + 1e-9);
    }
}

#[test]
fn test_nearly_parallel_guides_need_big_radius() {
    let mut c = connection(
        (DVec3::ZERO, DVec3::new(1.0, 0.0, 0.02)),
        (DVec3::new(2000.0, 0.0, 0.0), DVec3::new(-1.0, 0.0, 0.02)),
    );
    let points: Vec<PathPoint> = c.calculate().collect();

    assert_eq!(c.state(), SolveState::BigRadius);
    assert_eq!(c.circles()[0].direction(), Direction::Right);
    assert_eq!(c.circles()[1].direction(), Direction::Right);
    let r = c.circles()[0].radius();
    assert!(r > 49_000.0 && r < 51_000.0, "radius {r}");
    assert!(c.circles().iter().all(|circle| !circle.is_correct()));

    assert_eq!(points, vec![PathPoint::Gap]);

    let overlay = c.overlay();
    assert_eq!(overlay.len(), 4);
    assert!(overlay.iter().all(|item| item.highlight() == Highlight::Incorrect));
}

#[test]
fn test_calculate_is_idempotent() {
    let mut c = s_curve();
    let first: Vec<PathPoint> = c.calculate().collect();
    let circles = c.circles().to_vec();
    let second: Vec<PathPoint> = c.calculate().collect();
    assert_eq!(first, second);
    assert_eq!(circles, c.circles());
    assert_eq!(c.parts().collect::<Vec<_>>(), second);
}

#[test]
fn test_right_angle_corner() {
    let mut c = connection(
        (DVec3::ZERO, DVec3::X),
        (DVec3::new(100.0, 0.0, 100.0), -DVec3::Z),
    );
    let points: Vec<PathPoint> = c.calculate().collect();
    assert_eq!(c.state(), SolveState::Calculated);

    let (a, b) = (&c.circles()[0], &c.circles()[1]);
    assert_eq!(a.direction(), Direction::Left);
    assert_eq!(b.direction(), Direction::Left);
    assert_relative_eq!(a.radius(), 100.0, epsilon = 1e-9);
    assert!(a.center().flat_distance(DVec3::new(0.0, 0.0, 100.0)) < 1e-9);
    assert!(b.center().flat_distance(DVec3::new(0.0, 0.0, 100.0)) < 1e-9);

    let total = a.arc_length() + b.arc_length();
    assert_relative_eq!(total, 50.0 * std::f64::consts::PI, epsilon = 1e-6);

    // Every sample lies on the shared quarter circle
    for p in positions(&points) {
        assert_relative_eq!(p.flat_distance(a.center()), 100.0, epsilon = 1e-6);
    }
}

#[test]
fn test_u_turn_radius_bounds() {
    let ends = (
        (DVec3::ZERO, DVec3::X),
        (DVec3::new(0.0, 0.0, 20.0), DVec3::X),
    );
    let mut tight = connection(ends.0, ends.1);
    let _ = tight.calculate().count();
    assert_eq!(tight.state(), SolveState::SmallRadius);

    let cfg = ConnectionConfig {
        min_radius: 5.0,
        ..Default::default()
    };
    let mut relaxed = connection_with(cfg, ends.0, ends.1);
    let _ = relaxed.calculate().count();
    assert_eq!(relaxed.state(), SolveState::Calculated);
    assert_relative_eq!(relaxed.circles()[0].radius(), 10.0, epsilon = 1e-9);
    let total: f64 = relaxed.circles().iter().map(Circle::arc_length).sum();
    assert_relative_eq!(total, 10.0 * std::f64::consts::PI, epsilon = 1e-6);
}

#[test]
fn test_offset_shows_outer_straight() {
    let mut c = s_curve();
    c.set_offset(0, 30.0).unwrap();
    let points: Vec<PathPoint> = c.calculate().collect();
    assert_eq!(c.state(), SolveState::Calculated);
    assert_relative_eq!(c.circles()[0].radius(), 33.125, epsilon = 1e-9);

    let pos = positions(&points);
    assert!((pos[0] - DVec3::new(15.0, 0.0, 0.0)).length() < 1e-9);
    assert!((pos[1] - DVec3::new(30.0, 0.0, 0.0)).length() < 1e-9);

    c.set_offset(0, -10.0).unwrap();
    assert_eq!(c.circles()[0].edge_anchor().unwrap().offset(), 0.0);

    c.move_circle_center(0, DVec3::new(2000.0, 0.0, 50.0)).unwrap();
    assert_eq!(c.circles()[0].edge_anchor().unwrap().offset(), 500.0);
}

#[test]
fn test_overlapping_pinned_radius_is_wrong_shape() {
    let mut c = s_curve();
    c.set_radius(0, Some(200.0)).unwrap();
    let points: Vec<PathPoint> = c.calculate().collect();
    assert_eq!(c.state(), SolveState::WrongShape);
    assert_eq!(points, vec![PathPoint::Gap]);

    c.set_radius(0, None).unwrap();
    let _ = c.calculate().count();
    assert_eq!(c.state(), SolveState::Calculated);
}

#[test]
fn test_free_circle_in_between() {
    let mut c = connection(
        (DVec3::ZERO, DVec3::X),
        (DVec3::new(400.0, 0.0, 0.0), -DVec3::X),
    );
    c.insert_circle(1, DVec3::new(200.0, 0.0, -100.0), 30.0, Direction::Left)
        .unwrap();
    let points: Vec<PathPoint> = c.calculate().collect();

    assert_eq!(c.state(), SolveState::Calculated);
    assert_relative_eq!(c.circles()[0].radius(), 30.0);
    assert_relative_eq!(c.circles()[2].radius(), 30.0);
    assert_eq!(c.straights().len(), 4);

    for i in 1..3 {
        let s = c.straights()[i].unwrap();
        assert!((c.circles()[i - 1].end_pos() - s.start).length() < 1e-6);
        assert!((c.circles()[i].start_pos() - s.end).length() < 1e-6);
    }

    let pos = positions(&points);
    assert!(!pos.is_empty());
    for pair in pos.windows(2) {
        assert!(pair[0].flat_distance(pair[1]) <= 25.0, "spacing {:?}", pair);
    }
}

#[test]
fn test_check_radii_symmetric_over_layouts() {
    let tol = Tolerance::default();
    let circles = [
        Circle::free(DVec3::ZERO, 20.0, Direction::Left),
        Circle::free(DVec3::new(30.0, 0.0, 0.0), 10.0, Direction::Right),
        Circle::free(DVec3::new(5.0, 0.0, 5.0), 40.0, Direction::Left),
        Circle::free(DVec3::new(-60.0, 0.0, 10.0), 25.0, Direction::Right),
    ];
    for a in &circles {
        for b in &circles {
            assert_eq!(check_radii(a, b, &tol), check_radii(b, a, &tol));
        }
    }
}

#[test]
fn test_calculated_overlay() {
    let mut c = s_curve();
    let _ = c.calculate().count();
    let overlay = c.overlay();
    let arcs = overlay
        .iter()
        .filter(|i| matches!(i, OverlayItem::Arc { .. }))
        .count();
    let lines = overlay
        .iter()
        .filter(|i| matches!(i, OverlayItem::Line { .. }))
        .count();
    assert_eq!(arcs, 2);
    assert_eq!(lines, 3);
    assert!(overlay.iter().all(|i| i.highlight() == Highlight::Neutral));
}
