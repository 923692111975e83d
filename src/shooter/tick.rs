//! Shooter transitions
//!
//! `advance` is driven by the shell's frame clock with a time delta; `aim` and
//! `shoot` come from pointer input. Each returns a new state.

use glam::Vec2;
use rand::Rng;

use super::path::{PATH_CENTER, spiral};
use super::state::*;
use crate::{heading, normalize_angle};

/// Result of firing a ball
#[derive(Debug, Clone, PartialEq)]
pub struct Shot {
    pub state: ShooterState,
    /// Track position of the ball that was hit
    pub hit_position: Option<f32>,
    /// Number of balls cleared by the shot
    pub cleared: usize,
}

/// Roll the chain forward by `speed * dt`
pub fn advance(state: &ShooterState, dt: f32) -> ShooterState {
    if state.paused || state.is_terminal() {
        return state.clone();
    }

    let mut next = state.clone();
    next.clock += dt;
    next.balls.retain(|b| !b.matched);
    for ball in &mut next.balls {
        ball.position += state.speed * dt;
    }

    next.failed = next.balls.iter().any(|b| b.position >= 1.0);
    next.completed = next.balls.is_empty();
    if next.failed {
        log::debug!("Chain reached the sink at level {}", state.level);
    }
    next
}

/// Point the launcher at `target`
pub fn aim(state: &ShooterState, target: Vec2) -> ShooterState {
    if state.is_terminal() {
        return state.clone();
    }
    let mut next = state.clone();
    next.shooter.angle = heading(PATH_CENTER, target);
    next
}

pub fn toggle_pause(state: &ShooterState) -> ShooterState {
    if state.is_terminal() {
        return state.clone();
    }
    let mut next = state.clone();
    next.paused = !state.paused;
    next
}

/// Start the following level once this one is cleared; score carries over
pub fn next_level(state: &ShooterState, rng: &mut impl Rng) -> ShooterState {
    if !state.completed {
        return state.clone();
    }
    let mut next = ShooterState::new(state.level.saturating_add(1), rng);
    next.score = state.score;
    next
}

/// Index of the first ball further along than `position`
pub fn find_insertion_index(balls: &[Ball], position: f32) -> usize {
    balls
        .iter()
        .position(|b| b.position > position)
        .unwrap_or(balls.len())
}

/// Push balls from `from` onward so each sits at least one spacing ahead of its predecessor
pub fn respace(balls: &mut [Ball], from: usize) {
    for i in from.max(1)..balls.len() {
        let min_pos = balls[i - 1].position + BALL_SPACING;
        if balls[i].position < min_pos {
            balls[i].position = min_pos;
        }
    }
}

/// First window (start, size) around `index` whose values add up to `target`.
///
/// Window starts range over `index - 2 ..= index`, sizes over 3..=5, so every
/// candidate contains the ball at `index`.
pub fn find_match(balls: &[Ball], target: i32, index: usize) -> Option<(usize, usize)> {
    if balls.len() < MIN_WINDOW {
        return None;
    }
    let first = index.saturating_sub(2);
    let last = index.min(balls.len() - MIN_WINDOW);
    for start in first..=last {
        let max_size = MAX_WINDOW.min(balls.len() - start);
        for size in MIN_WINDOW..=max_size {
            let sum: i32 = balls[start..start + size].iter().map(|b| b.value).sum();
            if sum == target {
                return Some((start, size));
            }
        }
    }
    None
}

/// The visible ball closest to the launcher inside the aiming cone, and
/// whether the new ball goes before it
fn find_target(state: &ShooterState, angle: f32) -> Option<(f32, bool)> {
    let path = spiral();
    let shoot_dir = Vec2::from_angle(angle);

    let mut best: Option<(f32, f32, bool)> = None; // (distance, position, before)
    for ball in state.balls.iter().filter(|b| b.is_visible()) {
        let pos = path.point_at(ball.position);
        let diff = normalize_angle(heading(PATH_CENTER, pos) - angle).abs();
        if diff >= AIM_WINDOW {
            continue;
        }
        let dist = pos.distance(PATH_CENTER);
        if best.is_none_or(|(d, _, _)| dist < d) {
            let before = shoot_dir.dot(path.tangent_at(ball.position)) < 0.0;
            best = Some((dist, ball.position, before));
        }
    }
    best.map(|(_, position, before)| (position, before))
}

/// Fire the loaded ball toward `target`.
///
/// A shot with no ball in the aiming cone changes nothing. Otherwise the ball
/// joins the chain next to the one it hit, the chain is respaced, and the
/// first window summing to the target is cleared.
pub fn shoot(state: &ShooterState, target: Vec2, rng: &mut impl Rng) -> Shot {
    let miss = || Shot {
        state: state.clone(),
        hit_position: None,
        cleared: 0,
    };
    if state.paused || state.is_terminal() {
        return miss();
    }

    let angle = heading(PATH_CENTER, target);
    let Some((hit_position, before)) = find_target(state, angle) else {
        return miss();
    };

    let mut next = state.clone();
    let offset = if before { -INSERT_GAP } else { INSERT_GAP };
    let ball = Ball {
        id: next.next_ball_id(),
        value: state.shooter.current,
        position: hit_position + offset,
        matched: false,
    };
    let index = find_insertion_index(&next.balls, ball.position);
    next.balls.insert(index, ball);
    respace(&mut next.balls, index);

    let cleared = match find_match(&next.balls, state.target_sum, index) {
        Some((start, size)) => {
            for ball in &mut next.balls[start..start + size] {
                ball.matched = true;
            }
            next.balls.retain(|b| !b.matched);
            size
        }
        None => 0,
    };

    if cleared > 0 {
        let chained = state
            .last_match_at
            .is_some_and(|t| state.clock - t < COMBO_WINDOW);
        next.combo = if chained { state.combo + 1 } else { 1 };
        next.last_match_at = Some(state.clock);

        let base = cleared as u32 * POINTS_PER_BALL;
        // base * (1 + combo / 2), kept in integers
        next.score += base * (2 + next.combo) / 2;
        log::debug!(
            "Cleared {} balls (combo {}), score {}",
            cleared,
            next.combo,
            next.score
        );
    } else {
        next.combo = 0;
    }

    next.shooter.current = state.shooter.next;
    next.shooter.next = random_ball_value(state.target_sum, rng);
    next.completed = next.balls.is_empty();
    // Respacing can push the head of the chain into the sink
    next.failed = next.balls.iter().any(|b| b.position >= 1.0);
    if next.failed {
        log::debug!("Shot pushed the chain into the sink at level {}", state.level);
    }

    Shot {
        state: next,
        hit_position: Some(hit_position),
        cleared,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::seeded;
    use proptest::prelude::*;

    fn loaded(value: i32) -> Shooter {
        Shooter {
            angle: 0.0,
            current: value,
            next: 5,
        }
    }

    /// Only the ball at 0.3 is visible; 3 + 4 + 3 = 10 whichever side it lands on
    fn match_setup() -> ShooterState {
        ShooterState::with_chain(1, &[(9, -0.08), (3, -0.04), (3, 0.3)], loaded(4))
    }

    #[test]
    fn test_advance_moves_chain() {
        let mut rng = seeded(1);
        let state = ShooterState::new(1, &mut rng);
        let next = advance(&state, 1.0);
        assert!((next.balls[0].position - (state.balls[0].position + state.speed)).abs() < 1e-6);
        assert!((next.clock - 1.0).abs() < 1e-6);
        assert!(!next.failed);
        // Input untouched
        assert_eq!(state.clock, 0.0);
    }

    #[test]
    fn test_advance_fails_at_sink() {
        let state = ShooterState::with_chain(1, &[(1, 0.5), (2, 0.995)], loaded(1));
        let next = advance(&state, 1.0);
        assert!(next.failed);
        assert!(!next.completed);
        // Terminal: no more movement
        assert_eq!(advance(&next, 1.0), next);
    }

    #[test]
    fn test_shot_pushing_chain_into_sink_fails() {
        let state = ShooterState::with_chain(1, &[(1, 0.91), (1, 0.95), (1, 0.99)], loaded(1));
        let shot = shoot(&state, spiral().point_at(0.95), &mut seeded(3));
        assert_eq!(shot.hit_position, Some(0.95));
        assert_eq!(shot.cleared, 0);
        assert!(shot.state.lead_position().unwrap() >= 1.0);
        assert!(shot.state.failed);
        assert!(shot.state.is_terminal());

        // No further shots are taken
        let again = shoot(&shot.state, spiral().point_at(0.95), &mut seeded(4));
        assert_eq!(again.hit_position, None);
        assert_eq!(again.state, shot.state);
    }

    #[test]
    fn test_advance_paused_is_noop() {
        let state = toggle_pause(&match_setup());
        assert!(state.paused);
        assert_eq!(advance(&state, 5.0), state);
        assert!(!toggle_pause(&state).paused);
    }

    #[test]
    fn test_empty_chain_completes() {
        let state = ShooterState::with_chain(1, &[], loaded(1));
        let next = advance(&state, 0.1);
        assert!(next.completed);
        assert!(!next.failed);
    }

    #[test]
    fn test_shot_completing_sum_clears_three() {
        let mut rng = seeded(2);
        let state = match_setup();
        let target = spiral().point_at(0.3);
        let shot = shoot(&state, target, &mut rng);

        assert_eq!(shot.hit_position, Some(0.3));
        assert_eq!(shot.cleared, 3);
        assert_eq!(shot.state.balls.len(), 1);
        assert_eq!(shot.state.balls[0].value, 9);
        assert_eq!(shot.state.combo, 1);
        let expected = 3.0 * POINTS_PER_BALL as f32 * combo_multiplier(1);
        assert_eq!(shot.state.score as f32, expected);
        // Shooter refilled from the preview
        assert_eq!(shot.state.shooter.current, 5);
        assert!(!shot.state.completed);
    }

    #[test]
    fn test_combo_within_window() {
        let mut rng = seeded(3);
        let first = shoot(&match_setup(), spiral().point_at(0.3), &mut rng).state;

        // Rebuild a matchable chain, keeping score/combo bookkeeping
        let mut second = match_setup();
        second.score = first.score;
        second.combo = first.combo;
        second.last_match_at = first.last_match_at;
        second.clock = first.clock + 1.0;

        let shot = shoot(&second, spiral().point_at(0.3), &mut rng);
        assert_eq!(shot.state.combo, 2);
        assert_eq!(shot.state.score, 45 + 60);

        // Too late for a combo
        let mut late = match_setup();
        late.combo = 2;
        late.last_match_at = Some(0.0);
        late.clock = COMBO_WINDOW + 0.5;
        let shot = shoot(&late, spiral().point_at(0.3), &mut rng);
        assert_eq!(shot.state.combo, 1);
    }

    #[test]
    fn test_shot_without_match_grows_chain() {
        let mut rng = seeded(4);
        let state = ShooterState::with_chain(1, &[(1, 0.2), (1, 0.24)], loaded(1));
        let shot = shoot(&state, spiral().point_at(0.24), &mut rng);
        assert!(shot.hit_position.is_some());
        assert_eq!(shot.cleared, 0);
        assert_eq!(shot.state.balls.len(), 3);
        assert_eq!(shot.state.combo, 0);
        assert_eq!(shot.state.score, 0);
        assert!(
            shot.state
                .balls
                .windows(2)
                .all(|w| w[1].position - w[0].position > 0.0)
        );
    }

    #[test]
    fn test_miss_is_noop() {
        let mut rng = seeded(5);
        let state = match_setup();
        // Aim directly away from the only visible ball
        let ball = spiral().point_at(0.3);
        let away = PATH_CENTER - (ball - PATH_CENTER);
        let shot = shoot(&state, away, &mut rng);
        assert_eq!(shot.hit_position, None);
        assert_eq!(shot.state, state);
    }

    #[test]
    fn test_find_match_window_bounds() {
        let balls: Vec<Ball> = [2, 2, 2, 2, 2, 2]
            .iter()
            .enumerate()
            .map(|(i, &value)| Ball {
                id: i as u32,
                value,
                position: i as f32 * BALL_SPACING,
                matched: false,
            })
            .collect();
        assert_eq!(find_match(&balls, 6, 0), Some((0, 3)));
        assert_eq!(find_match(&balls, 10, 2), Some((0, 5)));
        // Starting at 2 leaves room for only four balls
        assert_eq!(find_match(&balls, 10, 4), None);
        assert_eq!(find_match(&balls, 12, 3), None);
        assert_eq!(find_match(&balls[..2], 4, 1), None);
    }

    #[test]
    fn test_respace_pushes_forward() {
        let mut balls: Vec<Ball> = [0.0, 0.01, 0.02, 0.5]
            .iter()
            .enumerate()
            .map(|(i, &position)| Ball {
                id: i as u32,
                value: 1,
                position,
                matched: false,
            })
            .collect();
        respace(&mut balls, 1);
        assert!((balls[1].position - 0.04).abs() < 1e-6);
        assert!((balls[2].position - 0.08).abs() < 1e-6);
        assert_eq!(balls[3].position, 0.5);
    }

    #[test]
    fn test_next_level_only_after_clear() {
        let mut rng = seeded(6);
        let state = match_setup();
        assert_eq!(next_level(&state, &mut rng), state);

        let mut cleared = ShooterState::with_chain(2, &[], loaded(1));
        cleared.completed = true;
        cleared.score = 300;
        let next = next_level(&cleared, &mut rng);
        assert_eq!(next.level, 3);
        assert_eq!(next.score, 300);
        assert_eq!(next.target_sum, 14);
        assert!(!next.completed);
    }

    proptest! {
        #[test]
        fn chain_stays_ordered_after_shots(
            seed in any::<u64>(),
            warmup in 1.0f32..40.0,
            angles in proptest::collection::vec(-3.14f32..3.14, 1..8),
        ) {
            let mut rng = seeded(seed);
            let mut state = advance(&ShooterState::new(1, &mut rng), warmup);
            for angle in angles {
                let target = PATH_CENTER + Vec2::from_angle(angle) * 100.0;
                state = shoot(&state, target, &mut rng).state;
                prop_assert!(state.balls.windows(2).all(|w| w[0].position < w[1].position));
            }
        }
    }
}
