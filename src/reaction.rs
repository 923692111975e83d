//! Red light, green light
//!
//! Tap to move on green, freeze on red. The shell owns every timer: it sends
//! countdown ticks, one-second clock ticks, light changes and elapsed time;
//! this module only reacts to them.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Total game time in seconds
pub const GAME_DURATION: u32 = 30;
/// Distance per tap
pub const MOVE_DISTANCE: u32 = 2;
pub const FINISH_LINE: u32 = 100;
/// Light durations (ms)
pub const MIN_GREEN_MS: u32 = 800;
pub const MAX_GREEN_MS: u32 = 5000;
pub const MIN_RED_MS: u32 = 800;
pub const MAX_RED_MS: u32 = 4000;
/// Movement forgiven this long after a light change (ms)
pub const REACTION_GRACE_MS: u32 = 150;
pub const COUNTDOWN_START: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Light {
    Countdown,
    Green,
    Red,
}

impl Light {
    /// The light that follows this one
    pub fn next(self) -> Self {
        match self {
            Light::Green => Light::Red,
            Light::Red | Light::Countdown => Light::Green,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionState {
    pub position: u32,
    pub light: Light,
    pub countdown: u32,
    /// Seconds left on the game clock
    pub time_left: u32,
    /// Milliseconds since the light last changed
    pub since_light_change_ms: u32,
    pub started: bool,
    pub moving: bool,
    pub completed: bool,
    pub failed: bool,
}

/// Result of a single tap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveResult {
    pub position: u32,
    pub caught: bool,
    pub finished: bool,
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Finished,
    Caught,
    TimeUp,
}

impl Default for ReactionState {
    fn default() -> Self {
        Self::new(GAME_DURATION)
    }
}

impl ReactionState {
    pub fn new(duration_secs: u32) -> Self {
        Self {
            position: 0,
            light: Light::Countdown,
            countdown: COUNTDOWN_START,
            time_left: duration_secs.max(1),
            since_light_change_ms: 0,
            started: false,
            moving: false,
            completed: false,
            failed: false,
        }
    }

    pub fn timed_out(&self) -> bool {
        self.started && self.time_left == 0 && !self.completed && !self.failed
    }

    pub fn is_terminal(&self) -> bool {
        self.completed || self.failed || self.timed_out()
    }

    /// Accepting taps
    pub fn is_live(&self) -> bool {
        self.started && !self.is_terminal()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        if self.completed {
            Some(Outcome::Finished)
        } else if self.failed {
            Some(Outcome::Caught)
        } else if self.timed_out() {
            Some(Outcome::TimeUp)
        } else {
            None
        }
    }

    /// Seconds spent running
    pub fn elapsed_secs(&self, duration_secs: u32) -> u32 {
        duration_secs.saturating_sub(self.time_left)
    }
}

/// Pure move rule: red outside the grace window is caught, anything else steps forward
pub fn calculate_move(position: u32, light: Light, since_change_ms: u32) -> MoveResult {
    let in_grace = since_change_ms < REACTION_GRACE_MS;
    if light == Light::Red && !in_grace {
        return MoveResult {
            position,
            caught: true,
            finished: false,
        };
    }
    let position = (position + MOVE_DISTANCE).min(FINISH_LINE);
    MoveResult {
        position,
        caught: false,
        finished: position >= FINISH_LINE,
    }
}

/// Random duration (ms) for how long `light` stays on
pub fn light_duration(light: Light, rng: &mut impl Rng) -> u32 {
    match light {
        Light::Green => rng.random_range(MIN_GREEN_MS..MAX_GREEN_MS),
        _ => rng.random_range(MIN_RED_MS..MAX_RED_MS),
    }
}

/// One second of pre-game countdown; the first light turns green at zero
pub fn countdown_tick(state: &ReactionState) -> ReactionState {
    if state.light != Light::Countdown || state.countdown == 0 {
        return state.clone();
    }
    let mut next = state.clone();
    next.countdown -= 1;
    if next.countdown == 0 {
        next.light = Light::Green;
        next.started = true;
        next.since_light_change_ms = 0;
    }
    next
}

/// One second of game clock
pub fn clock_tick(state: &ReactionState) -> ReactionState {
    if !state.is_live() {
        return state.clone();
    }
    let mut next = state.clone();
    next.time_left -= 1;
    if next.timed_out() {
        log::debug!("Time up at {}", next.position);
    }
    next
}

/// The shell switched the light; repeating the current light changes nothing
pub fn set_light(state: &ReactionState, light: Light) -> ReactionState {
    if !state.is_live() || light == Light::Countdown || light == state.light {
        return state.clone();
    }
    ReactionState {
        light,
        since_light_change_ms: 0,
        ..state.clone()
    }
}

/// Wall time passed since the last event
pub fn advance_time(state: &ReactionState, elapsed_ms: u32) -> ReactionState {
    if !state.is_live() {
        return state.clone();
    }
    ReactionState {
        since_light_change_ms: state.since_light_change_ms.saturating_add(elapsed_ms),
        ..state.clone()
    }
}

/// Tap: step forward, or get caught moving on red
pub fn move_forward(state: &ReactionState) -> ReactionState {
    if !state.is_live() {
        return state.clone();
    }
    let result = calculate_move(state.position, state.light, state.since_light_change_ms);
    let mut next = state.clone();
    if result.caught {
        log::debug!("Caught moving on red at {}", state.position);
        next.failed = true;
        next.moving = false;
    } else {
        next.position = result.position;
        next.completed = result.finished;
        next.moving = !result.finished;
    }
    next
}

/// Finger lifted
pub fn rest(state: &ReactionState) -> ReactionState {
    ReactionState {
        moving: false,
        ..state.clone()
    }
}
