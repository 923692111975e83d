//! Squid Math - arithmetic mini-games as pure state machines
//!
//! Core modules:
//! - `problems`: Arithmetic problem generators shared by the quiz-style games
//! - `quiz`, `tracing`, `bridge`, `rope`, `reaction`, `marbles`, `shooter`: one engine per game
//! - `store`: Screen navigation and event dispatch over the game slices
//! - `stats`, `settings`: Small persisted records
//! - `feedback`: Haptic cues derived from state edges
//! - `platform`: Browser/native platform abstraction

pub mod bridge;
pub mod feedback;
pub mod marbles;
pub mod platform;
pub mod problems;
pub mod quiz;
pub mod reaction;
pub mod rng;
pub mod rope;
pub mod settings;
pub mod shooter;
pub mod stats;
pub mod store;
pub mod tracing;

pub use feedback::Haptic;
pub use settings::Settings;
pub use stats::Stats;
pub use store::{Event, Game, Screen, Store};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Problems per arithmetic quiz session
    pub const QUIZ_SESSION_LENGTH: usize = 10;
    /// Correct answers needed to unlock the tracing game
    pub const TRACING_UNLOCK_SCORE: u32 = 8;

    /// Tracing canvas edge length (square canvas)
    pub const CANVAS_SIZE: f32 = 300.0;
    /// Shape radius as a fraction of the canvas size
    pub const SHAPE_RADIUS_FACTOR: f32 = 0.35;
    /// Lives at the start of a tracing attempt
    pub const TRACE_LIVES: u8 = 3;
    /// Path points checked ahead of the current index
    pub const TRACE_LOOKAHEAD: usize = 30;
    /// Trailing points that count as "reached the end"
    pub const TRACE_END_MARGIN: usize = 5;

    /// Glass bridge rows
    pub const BRIDGE_DEFAULT_ROWS: usize = 6;
    pub const BRIDGE_MIN_ROWS: usize = 4;
    pub const BRIDGE_MAX_ROWS: usize = 10;

    /// Tug of war
    pub const ROPE_START: i32 = 50;
    pub const ROPE_STEP: i32 = 10;
    pub const ROPE_MIN: i32 = 0;
    pub const ROPE_MAX: i32 = 100;
    pub const ROPE_PROBLEM_COUNT: usize = 20;

    /// Marbles
    pub const MARBLES_START: u32 = 10;

    /// Number of answer buttons in multiple-choice games
    pub const OPTION_COUNT: usize = 3;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) around `center` to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(center: Vec2, r: f32, theta: f32) -> Vec2 {
    center + Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Direction (radians) from `from` toward `to`
#[inline]
pub fn heading(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}
