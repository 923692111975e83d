//! Number shooter state
//!
//! A chain of numbered balls rolls along the spiral toward the sink. The
//! player fires numbered balls into the chain; three to five neighbours that
//! add up to the target sum are cleared.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;

/// Gap kept between neighbouring balls (normalized track units)
pub const BALL_SPACING: f32 = 0.04;
/// Offset of a fired ball from the ball it hit
pub const INSERT_GAP: f32 = 0.02;
/// Points per cleared ball before the combo bonus
pub const POINTS_PER_BALL: u32 = 10;
/// Seconds between matches that still count as a combo
pub const COMBO_WINDOW: f32 = 2.0;
/// Half-width of the aiming cone (30 degrees)
pub const AIM_WINDOW: f32 = std::f32::consts::PI / 6.0;
/// Smallest and largest windows checked for a sum match
pub const MIN_WINDOW: usize = 3;
pub const MAX_WINDOW: usize = 5;
/// Highest playable level; later levels replay it
pub const MAX_LEVEL: u32 = 50;

/// Level within `1..=MAX_LEVEL`
pub fn clamp_level(level: u32) -> u32 {
    level.clamp(1, MAX_LEVEL)
}

/// Target sum for a level: 10, 12, 14, ...
pub fn target_sum_for(level: u32) -> i32 {
    10 + 2 * (clamp_level(level) as i32 - 1)
}

/// Chain length for a level: 20, 25, 30, ...
pub fn ball_count_for(level: u32) -> usize {
    15 + 5 * clamp_level(level) as usize
}

/// Track units per second for a level
pub fn speed_for(level: u32) -> f32 {
    0.008 + 0.002 * clamp_level(level) as f32
}

/// Ball value in `1..=min(target - 2, 9)`, so three balls can always reach the target
pub fn random_ball_value(target_sum: i32, rng: &mut impl Rng) -> i32 {
    let max = (target_sum - 2).min(9).max(1);
    rng.random_range(1..=max)
}

/// A numbered ball in the chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    pub value: i32,
    /// Normalized track position; negative means still queued before the entry
    pub position: f32,
    /// Part of a cleared window, about to be removed
    #[serde(default)]
    pub matched: bool,
}

impl Ball {
    pub fn is_visible(&self) -> bool {
        self.position >= 0.0
    }
}

/// The launcher in the middle of the spiral
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shooter {
    /// Aim angle (radians)
    pub angle: f32,
    /// Value loaded for the next shot
    pub current: i32,
    /// Preview of the value after that
    pub next: i32,
}

/// Complete shooter game state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShooterState {
    /// Chain ordered by position, tail first
    pub balls: Vec<Ball>,
    pub shooter: Shooter,
    pub target_sum: i32,
    pub score: u32,
    pub combo: u32,
    /// Game clock (seconds) of the last match
    pub last_match_at: Option<f32>,
    /// Seconds of simulated time
    pub clock: f32,
    pub level: u32,
    pub speed: f32,
    pub paused: bool,
    pub completed: bool,
    pub failed: bool,
    /// Next ball ID
    next_id: u32,
}

impl ShooterState {
    /// Create a level, the whole chain queued behind the entry
    pub fn new(level: u32, rng: &mut impl Rng) -> Self {
        let level = clamp_level(level);
        let target_sum = target_sum_for(level);
        let count = ball_count_for(level);

        let balls = (0..count)
            .map(|i| Ball {
                id: i as u32,
                value: random_ball_value(target_sum, rng),
                position: -((count - 1 - i) as f32) * BALL_SPACING,
                matched: false,
            })
            .collect();

        let shooter = Shooter {
            angle: -FRAC_PI_2, // Point up
            current: random_ball_value(target_sum, rng),
            next: random_ball_value(target_sum, rng),
        };

        Self {
            balls,
            shooter,
            target_sum,
            score: 0,
            combo: 0,
            last_match_at: None,
            clock: 0.0,
            level,
            speed: speed_for(level),
            paused: false,
            completed: false,
            failed: false,
            next_id: count as u32,
        }
    }

    /// Build a state around a hand-placed chain (positions must ascend)
    pub fn with_chain(level: u32, chain: &[(i32, f32)], shooter: Shooter) -> Self {
        let level = clamp_level(level);
        let balls = chain
            .iter()
            .enumerate()
            .map(|(i, &(value, position))| Ball {
                id: i as u32,
                value,
                position,
                matched: false,
            })
            .collect();
        Self {
            balls,
            shooter,
            target_sum: target_sum_for(level),
            score: 0,
            combo: 0,
            last_match_at: None,
            clock: 0.0,
            level,
            speed: speed_for(level),
            paused: false,
            completed: false,
            failed: false,
            next_id: chain.len() as u32,
        }
    }

    /// Allocate a new ball ID
    pub fn next_ball_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_terminal(&self) -> bool {
        self.completed || self.failed
    }

    /// Score multiplier for the current combo
    pub fn combo_multiplier(&self) -> f32 {
        combo_multiplier(self.combo)
    }

    /// Position of the ball closest to the sink
    pub fn lead_position(&self) -> Option<f32> {
        self.balls.last().map(|b| b.position)
    }
}

/// `1 + combo * 0.5`
pub fn combo_multiplier(combo: u32) -> f32 {
    1.0 + combo as f32 * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::seeded;

    #[test]
    fn test_level_scaling_is_monotonic() {
        for level in 1..10 {
            assert!(target_sum_for(level + 1) > target_sum_for(level));
            assert!(ball_count_for(level + 1) > ball_count_for(level));
            assert!(speed_for(level + 1) > speed_for(level));
        }
        assert_eq!(target_sum_for(1), 10);
        assert_eq!(ball_count_for(1), 20);
        assert!((speed_for(1) - 0.01).abs() < 1e-6);
    }

    #[test]
    fn test_ball_values_in_range() {
        let mut rng = seeded(5);
        for _ in 0..500 {
            let v = random_ball_value(10, &mut rng);
            assert!((1..=8).contains(&v));
            let v = random_ball_value(30, &mut rng);
            assert!((1..=9).contains(&v));
        }
    }

    #[test]
    fn test_new_chain_is_queued_in_order() {
        let mut rng = seeded(9);
        let state = ShooterState::new(1, &mut rng);
        assert_eq!(state.balls.len(), 20);
        assert_eq!(state.lead_position(), Some(0.0));
        assert!(state.balls.windows(2).all(|w| w[0].position < w[1].position));
        assert!(state.balls.iter().all(|b| b.position <= 0.0));
        assert_eq!(state.shooter.angle, -FRAC_PI_2);
    }

    #[test]
    fn test_level_is_capped() {
        assert_eq!(clamp_level(0), 1);
        assert_eq!(clamp_level(u32::MAX), MAX_LEVEL);
        assert_eq!(ball_count_for(u32::MAX), ball_count_for(MAX_LEVEL));
        assert_eq!(target_sum_for(u32::MAX), target_sum_for(MAX_LEVEL));

        let state = ShooterState::new(1_000_000_000, &mut seeded(3));
        assert_eq!(state.level, MAX_LEVEL);
        assert_eq!(state.balls.len(), ball_count_for(MAX_LEVEL));
    }

    #[test]
    fn test_combo_multiplier() {
        assert_eq!(combo_multiplier(0), 1.0);
        assert_eq!(combo_multiplier(1), 1.5);
        assert_eq!(combo_multiplier(2), 2.0);
    }
}
