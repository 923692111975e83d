//! Shape tracing game
//!
//! A shape outline is sampled into a closed polyline. The player must start
//! near the first point and then follow the outline forward; each sample that
//! strays further than the tolerance costs a life.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

use crate::consts::*;

/// Shapes available for tracing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Circle,
    Triangle,
    Square,
    Diamond,
    Star,
    Heart,
    Hexagon,
    Tree,
    Pentagon,
    Cross,
    House,
}

pub const ALL_SHAPES: [ShapeKind; 11] = [
    ShapeKind::Circle,
    ShapeKind::Triangle,
    ShapeKind::Square,
    ShapeKind::Diamond,
    ShapeKind::Star,
    ShapeKind::Heart,
    ShapeKind::Hexagon,
    ShapeKind::Tree,
    ShapeKind::Pentagon,
    ShapeKind::Cross,
    ShapeKind::House,
];

/// Parametric definition of an outline, in units of the shape radius
#[derive(Debug, Clone, PartialEq)]
pub enum Outline {
    /// Closed polygon walked edge by edge; `samples` points per edge at `t = i * step`
    Polygon {
        vertices: Vec<Vec2>,
        samples: usize,
        step: f32,
    },
    /// Circle sampled every `step_degrees`, 0 through 360 inclusive
    Circle { step_degrees: usize },
    /// Classic quartic heart curve, `samples` points at `t = i * step`
    Heart { samples: usize, step: f32 },
}

impl ShapeKind {
    /// Stable identifier used for completion stats
    pub fn id(&self) -> &'static str {
        match self {
            ShapeKind::Circle => "circle",
            ShapeKind::Triangle => "triangle",
            ShapeKind::Square => "square",
            ShapeKind::Diamond => "diamond",
            ShapeKind::Star => "star5",
            ShapeKind::Heart => "heart",
            ShapeKind::Hexagon => "hexagon",
            ShapeKind::Tree => "tree",
            ShapeKind::Pentagon => "pentagon",
            ShapeKind::Cross => "cross",
            ShapeKind::House => "house",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        ALL_SHAPES.iter().copied().find(|s| s.id() == id)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Circle => "Circle",
            ShapeKind::Triangle => "Triangle",
            ShapeKind::Square => "Square",
            ShapeKind::Diamond => "Diamond",
            ShapeKind::Star => "Star",
            ShapeKind::Heart => "Heart",
            ShapeKind::Hexagon => "Hexagon",
            ShapeKind::Tree => "Tree",
            ShapeKind::Pentagon => "Pentagon",
            ShapeKind::Cross => "Cross",
            ShapeKind::House => "House",
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            ShapeKind::Circle => "⭕",
            ShapeKind::Triangle => "△",
            ShapeKind::Square => "⬜",
            ShapeKind::Diamond => "◇",
            ShapeKind::Star => "⭐",
            ShapeKind::Heart => "❤️",
            ShapeKind::Hexagon => "⬡",
            ShapeKind::Tree => "🎄",
            ShapeKind::Pentagon => "⬠",
            ShapeKind::Cross => "✚",
            ShapeKind::House => "🏠",
        }
    }

    /// Difficulty tier 1-3
    pub fn difficulty(&self) -> u8 {
        match self {
            ShapeKind::Circle | ShapeKind::Triangle | ShapeKind::Square => 1,
            ShapeKind::Tree | ShapeKind::House => 3,
            _ => 2,
        }
    }

    pub fn outline(&self) -> Outline {
        match self {
            ShapeKind::Circle => Outline::Circle { step_degrees: 5 },
            ShapeKind::Heart => Outline::Heart {
                samples: 63,
                step: 0.1,
            },
            ShapeKind::Triangle => fine_polygon(vec![
                Vec2::new(0.0, -1.0),
                Vec2::new(0.866, 0.5),
                Vec2::new(-0.866, 0.5),
            ]),
            ShapeKind::Square => fine_polygon(vec![
                Vec2::new(-0.7, -0.7),
                Vec2::new(0.7, -0.7),
                Vec2::new(0.7, 0.7),
                Vec2::new(-0.7, 0.7),
            ]),
            ShapeKind::Diamond => fine_polygon(vec![
                Vec2::new(0.0, -1.0),
                Vec2::new(0.6, 0.0),
                Vec2::new(0.0, 1.0),
                Vec2::new(-0.6, 0.0),
            ]),
            ShapeKind::Star => coarse_polygon(
                (0..10)
                    .map(|i| {
                        let r = if i % 2 == 0 { 1.0 } else { 0.4 };
                        unit_at_degrees(i as f32 * 36.0 - 90.0) * r
                    })
                    .collect(),
            ),
            ShapeKind::Hexagon => medium_polygon(regular_vertices(6)),
            ShapeKind::Pentagon => medium_polygon(regular_vertices(5)),
            ShapeKind::Tree => coarse_polygon(vec![
                Vec2::new(0.0, -1.0),
                Vec2::new(0.3, -0.4),
                Vec2::new(0.15, -0.4),
                Vec2::new(0.5, 0.1),
                Vec2::new(0.25, 0.1),
                Vec2::new(0.7, 0.6),
                Vec2::new(0.15, 0.6),
                Vec2::new(0.15, 1.0),
                Vec2::new(-0.15, 1.0),
                Vec2::new(-0.15, 0.6),
                Vec2::new(-0.7, 0.6),
                Vec2::new(-0.25, 0.1),
                Vec2::new(-0.5, 0.1),
                Vec2::new(-0.15, -0.4),
                Vec2::new(-0.3, -0.4),
            ]),
            ShapeKind::Cross => {
                let w = 0.3;
                coarse_polygon(vec![
                    Vec2::new(-w, -1.0),
                    Vec2::new(w, -1.0),
                    Vec2::new(w, -w),
                    Vec2::new(1.0, -w),
                    Vec2::new(1.0, w),
                    Vec2::new(w, w),
                    Vec2::new(w, 1.0),
                    Vec2::new(-w, 1.0),
                    Vec2::new(-w, w),
                    Vec2::new(-1.0, w),
                    Vec2::new(-1.0, -w),
                    Vec2::new(-w, -w),
                ])
            }
            ShapeKind::House => coarse_polygon(vec![
                Vec2::new(0.0, -1.0),
                Vec2::new(0.8, -0.2),
                Vec2::new(0.8, 1.0),
                Vec2::new(0.2, 1.0),
                Vec2::new(0.2, 0.3),
                Vec2::new(-0.2, 0.3),
                Vec2::new(-0.2, 1.0),
                Vec2::new(-0.8, 1.0),
                Vec2::new(-0.8, -0.2),
            ]),
        }
    }
}

fn fine_polygon(vertices: Vec<Vec2>) -> Outline {
    Outline::Polygon {
        vertices,
        samples: 20,
        step: 0.05,
    }
}

fn medium_polygon(vertices: Vec<Vec2>) -> Outline {
    Outline::Polygon {
        vertices,
        samples: 13,
        step: 0.08,
    }
}

/// Edge end points are included, so neighbouring edges share a sample
fn coarse_polygon(vertices: Vec<Vec2>) -> Outline {
    Outline::Polygon {
        vertices,
        samples: 11,
        step: 0.1,
    }
}

fn unit_at_degrees(degrees: f32) -> Vec2 {
    let rad = degrees * PI / 180.0;
    Vec2::new(rad.cos(), rad.sin())
}

/// Regular polygon with the first vertex pointing up
fn regular_vertices(n: usize) -> Vec<Vec2> {
    let step = 360.0 / n as f32;
    (0..n)
        .map(|i| unit_at_degrees(i as f32 * step - 90.0))
        .collect()
}

/// Sample a shape outline around `center`. The first point is the trace start.
pub fn build_path(kind: ShapeKind, center: Vec2, radius: f32) -> Vec<Vec2> {
    match kind.outline() {
        Outline::Polygon {
            vertices,
            samples,
            step,
        } => {
            let n = vertices.len();
            let mut points = Vec::with_capacity(n * samples);
            for i in 0..n {
                let start = center + vertices[i] * radius;
                let end = center + vertices[(i + 1) % n] * radius;
                for s in 0..samples {
                    points.push(start.lerp(end, s as f32 * step));
                }
            }
            points
        }
        Outline::Circle { step_degrees } => (0..=360)
            .step_by(step_degrees)
            .map(|deg| center + unit_at_degrees(deg as f32) * radius)
            .collect(),
        Outline::Heart { samples, step } => (0..samples)
            .map(|s| s as f32 * step)
            .take_while(|&t| t <= TAU)
            .map(|t| {
                let x = 16.0 * t.sin().powi(3);
                let y = -(13.0 * t.cos()
                    - 5.0 * (2.0 * t).cos()
                    - 2.0 * (3.0 * t).cos()
                    - (4.0 * t).cos());
                center + Vec2::new(x, y) * radius / 18.0
            })
            .collect(),
    }
}

/// Result of a proximity search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathCheck {
    pub on_path: bool,
    pub distance: f32,
    pub index: usize,
}

/// Find the closest path point in the window `[start, start + TRACE_LOOKAHEAD)`.
///
/// The search never looks behind `start`, so progress cannot move backward.
pub fn is_on_path(point: Vec2, path: &[Vec2], start: usize, tolerance: f32) -> PathCheck {
    let end = path.len().min(start + TRACE_LOOKAHEAD);
    let mut check = PathCheck {
        on_path: false,
        distance: f32::INFINITY,
        index: start,
    };
    for (i, p) in path.iter().enumerate().take(end).skip(start) {
        let d = point.distance(*p);
        if d < check.distance {
            check.distance = d;
            check.index = i;
        }
    }
    check.on_path = check.distance <= tolerance;
    check
}

/// Starting is easier than tracing: 1.5x the tolerance around the first point
pub fn is_near_start(point: Vec2, path: &[Vec2], tolerance: f32) -> bool {
    path.first()
        .is_some_and(|start| point.distance(*start) <= tolerance * 1.5)
}

/// Harder shapes get a tighter tolerance (37, 34, 31)
pub fn tolerance_for(difficulty: u8) -> f32 {
    40.0 - 3.0 * difficulty as f32
}

/// Whole percent of the path covered
pub fn progress(index: usize, len: usize) -> u8 {
    if len == 0 {
        return 0;
    }
    (index * 100 / len).min(100) as u8
}

/// Pick a shape uniformly
pub fn random_shape(rng: &mut impl Rng) -> ShapeKind {
    ALL_SHAPES[rng.random_range(0..ALL_SHAPES.len())]
}

/// Tracing game state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceState {
    pub shape: ShapeKind,
    pub path: Vec<Vec2>,
    /// Accepted input points of the current attempt
    pub traced: Vec<Vec2>,
    pub current_index: usize,
    pub lives: u8,
    /// 0-100
    pub progress: u8,
    pub drawing: bool,
    pub completed: bool,
    pub failed: bool,
    pub tolerance: f32,
}

impl TraceState {
    /// Fresh attempt at `shape`, centered on a square canvas
    pub fn new(shape: ShapeKind, canvas_size: f32) -> Self {
        let center = Vec2::splat(canvas_size / 2.0);
        let radius = canvas_size * SHAPE_RADIUS_FACTOR;
        Self {
            shape,
            path: build_path(shape, center, radius),
            traced: Vec::new(),
            current_index: 0,
            lives: TRACE_LIVES,
            progress: 0,
            drawing: false,
            completed: false,
            failed: false,
            tolerance: tolerance_for(shape.difficulty()),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.completed || self.failed
    }

    /// The point the player has to touch first
    pub fn start_point(&self) -> Option<Vec2> {
        self.path.first().copied()
    }
}

/// Touch down: only starts drawing near the path's start point
pub fn begin_stroke(state: &TraceState, point: Vec2) -> TraceState {
    if state.is_terminal() || !is_near_start(point, &state.path, state.tolerance) {
        return state.clone();
    }
    TraceState {
        drawing: true,
        traced: vec![point],
        ..state.clone()
    }
}

/// Touch move: advance along the path or lose a life
pub fn trace_point(state: &TraceState, point: Vec2) -> TraceState {
    if !state.drawing || state.is_terminal() {
        return state.clone();
    }

    let mut next = state.clone();
    let check = is_on_path(point, &state.path, state.current_index, state.tolerance);

    if check.on_path {
        let index = state.current_index.max(check.index);
        next.traced.push(point);
        next.current_index = index;

        if index + TRACE_END_MARGIN >= state.path.len() {
            log::debug!("Traced {} to the end", state.shape.id());
            next.progress = 100;
            next.completed = true;
            next.drawing = false;
        } else {
            next.progress = progress(index, state.path.len());
        }
    } else {
        next.lives = state.lives.saturating_sub(1);
        log::debug!(
            "Off path by {:.1} (tolerance {:.1}), {} lives left",
            check.distance,
            state.tolerance,
            next.lives
        );
        if next.lives == 0 {
            next.failed = true;
            next.drawing = false;
        }
    }

    next
}

/// Touch up: stop drawing, keep progress
pub fn end_stroke(state: &TraceState) -> TraceState {
    TraceState {
        drawing: false,
        ..state.clone()
    }
}

/// Start the same shape over
pub fn restart(state: &TraceState, canvas_size: f32) -> TraceState {
    TraceState::new(state.shape, canvas_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn center() -> Vec2 {
        Vec2::splat(150.0)
    }

    #[test]
    fn test_path_sample_counts() {
        let r = 100.0;
        assert_eq!(build_path(ShapeKind::Circle, center(), r).len(), 73);
        assert_eq!(build_path(ShapeKind::Triangle, center(), r).len(), 60);
        assert_eq!(build_path(ShapeKind::Square, center(), r).len(), 80);
        assert_eq!(build_path(ShapeKind::Star, center(), r).len(), 110);
        assert_eq!(build_path(ShapeKind::Hexagon, center(), r).len(), 78);
        assert_eq!(build_path(ShapeKind::Pentagon, center(), r).len(), 65);
        assert_eq!(build_path(ShapeKind::Heart, center(), r).len(), 63);
        assert_eq!(build_path(ShapeKind::Tree, center(), r).len(), 165);
    }

    #[test]
    fn test_path_starts_at_canonical_point() {
        let circle = build_path(ShapeKind::Circle, center(), 100.0);
        assert!(circle[0].distance(Vec2::new(250.0, 150.0)) < 1e-3);
        // Circle closes on itself
        assert!(circle[72].distance(circle[0]) < 1e-3);

        let triangle = build_path(ShapeKind::Triangle, center(), 100.0);
        assert!(triangle[0].distance(Vec2::new(150.0, 50.0)) < 1e-3);

        let heart = build_path(ShapeKind::Heart, center(), 90.0);
        // t = 0: x = 0, y = -(13 - 5 - 2 - 1) = -5
        assert!(heart[0].distance(Vec2::new(150.0, 150.0 - 25.0)) < 1e-3);
    }

    #[test]
    fn test_shape_ids_round_trip() {
        for shape in ALL_SHAPES {
            assert_eq!(ShapeKind::from_id(shape.id()), Some(shape));
            assert!((1..=3).contains(&shape.difficulty()));
        }
        assert_eq!(ShapeKind::from_id("blob"), None);
    }

    #[test]
    fn test_tolerance_decreases_with_difficulty() {
        assert_eq!(tolerance_for(1), 37.0);
        assert_eq!(tolerance_for(2), 34.0);
        assert_eq!(tolerance_for(3), 31.0);
    }

    #[test]
    fn test_is_on_path_bounded_window() {
        let path: Vec<Vec2> = (0..100).map(|i| Vec2::new(i as f32 * 10.0, 0.0)).collect();
        // Point 50 lies outside the window starting at 0
        let check = is_on_path(Vec2::new(500.0, 0.0), &path, 0, 5.0);
        assert!(!check.on_path);
        assert_eq!(check.index, 29);
        // Behind the start index does not count
        let check = is_on_path(Vec2::new(0.0, 0.0), &path, 10, 5.0);
        assert!(!check.on_path);
        assert_eq!(check.index, 10);
        // Past the end is a miss, not a panic
        let check = is_on_path(Vec2::ZERO, &path, 200, 5.0);
        assert!(!check.on_path);
        assert!(check.distance.is_infinite());
    }

    #[test]
    fn test_near_start() {
        let path = vec![Vec2::ZERO, Vec2::new(10.0, 0.0)];
        assert!(is_near_start(Vec2::new(0.0, 45.0), &path, 30.0));
        assert!(!is_near_start(Vec2::new(0.0, 46.0), &path, 30.0));
        assert!(!is_near_start(Vec2::ZERO, &[], 30.0));
    }

    #[test]
    fn test_progress_floors() {
        assert_eq!(progress(0, 73), 0);
        assert_eq!(progress(36, 73), 49);
        assert_eq!(progress(73, 73), 100);
        assert_eq!(progress(5, 0), 0);
    }

    #[test]
    fn test_begin_stroke_requires_start() {
        let state = TraceState::new(ShapeKind::Circle, CANVAS_SIZE);
        let far = begin_stroke(&state, Vec2::ZERO);
        assert!(!far.drawing);

        let start = state.start_point().unwrap();
        let drawing = begin_stroke(&state, start);
        assert!(drawing.drawing);
        assert_eq!(drawing.traced, vec![start]);
    }

    #[test]
    fn test_three_misses_fail() {
        let state = TraceState::new(ShapeKind::Square, CANVAS_SIZE);
        let mut state = begin_stroke(&state, state.start_point().unwrap());
        let off = Vec2::new(-500.0, -500.0);

        state = trace_point(&state, off);
        assert_eq!(state.lives, 2);
        assert!(!state.failed);
        state = trace_point(&state, off);
        assert_eq!(state.lives, 1);
        state = trace_point(&state, off);
        assert_eq!(state.lives, 0);
        assert!(state.failed);
        assert!(!state.drawing);

        // Terminal: further input is ignored
        let after = trace_point(&begin_stroke(&state, state.path[0]), state.path[1]);
        assert_eq!(after, state);
    }

    #[test]
    fn test_full_trace_completes() {
        let state = TraceState::new(ShapeKind::Circle, CANVAS_SIZE);
        let mut state = begin_stroke(&state, state.path[0]);
        let path = state.path.clone();
        let mut last_index = 0;
        for p in path.iter().skip(1) {
            state = trace_point(&state, *p);
            assert!(state.current_index >= last_index);
            last_index = state.current_index;
            if state.completed {
                break;
            }
        }
        assert!(state.completed);
        assert!(!state.failed);
        assert_eq!(state.progress, 100);
        assert!(!state.drawing);
        assert_eq!(state.lives, TRACE_LIVES);
    }

    #[test]
    fn test_end_stroke_keeps_progress() {
        let state = TraceState::new(ShapeKind::Triangle, CANVAS_SIZE);
        let mut state = begin_stroke(&state, state.path[0]);
        for p in state.path.clone().iter().take(10) {
            state = trace_point(&state, *p);
        }
        let idx = state.current_index;
        let lifted = end_stroke(&state);
        assert!(!lifted.drawing);
        assert_eq!(lifted.current_index, idx);
        // Moving while lifted does nothing
        assert_eq!(trace_point(&lifted, Vec2::ZERO), lifted);

        let fresh = restart(&lifted, CANVAS_SIZE);
        assert_eq!(fresh.current_index, 0);
        assert_eq!(fresh.shape, ShapeKind::Triangle);
    }

    proptest! {
        #[test]
        fn path_point_is_found_from_any_start_in_window(
            shape_idx in 0usize..ALL_SHAPES.len(),
            i_frac in 0.0f64..1.0,
            back in 0usize..TRACE_LOOKAHEAD,
        ) {
            let path = build_path(ALL_SHAPES[shape_idx], center(), 105.0);
            let i = ((path.len() - 1) as f64 * i_frac) as usize;
            let start = i.saturating_sub(back);
            let check = is_on_path(path[i], &path, start, 1.0);
            prop_assert!(check.on_path);
            prop_assert!(check.distance == 0.0);
            prop_assert!(check.index >= start);
        }
    }
}
