//! Number shooter engine
//!
//! All gameplay logic lives here and is deterministic given the RNG:
//! - Time only advances through `advance(dt)`
//! - Ball values come from the injected RNG
//! - No rendering or platform dependencies

pub mod path;
pub mod state;
pub mod tick;

pub use path::{PATH_CENTER, SpiralPath, spiral};
pub use state::{
    BALL_SPACING, Ball, COMBO_WINDOW, MAX_LEVEL, POINTS_PER_BALL, Shooter, ShooterState,
    clamp_level, combo_multiplier, random_ball_value,
};
pub use tick::{Shot, advance, aim, next_level, shoot, toggle_pause};
