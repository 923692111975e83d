//! Tug of war
//!
//! Every correct answer pulls the rope toward the player, every wrong one
//! toward the opponent. The game ends as soon as the rope hits either end.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{ROPE_MAX, ROPE_MIN, ROPE_START, ROPE_STEP};
use crate::problems::{ChoiceProblem, choice_problem};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RopeState {
    /// 0 = opponent wins, 100 = player wins
    pub position: i32,
    pub problems: Vec<ChoiceProblem>,
    pub current: usize,
    pub completed: bool,
    pub failed: bool,
}

/// Outcome of one pull
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RopeMove {
    pub position: i32,
    pub completed: bool,
    pub failed: bool,
}

impl RopeState {
    pub fn new(problem_count: usize, rng: &mut impl Rng) -> Self {
        Self {
            position: ROPE_START,
            problems: (0..problem_count.max(1))
                .map(|_| choice_problem(rng))
                .collect(),
            current: 0,
            completed: false,
            failed: false,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.completed || self.failed
    }

    pub fn current_problem(&self) -> Option<&ChoiceProblem> {
        self.problems.get(self.current)
    }
}

/// Move the rope one step and clamp it to [0, 100]
pub fn rope_move(position: i32, correct: bool) -> RopeMove {
    let delta = if correct { ROPE_STEP } else { -ROPE_STEP };
    let position = (position + delta).clamp(ROPE_MIN, ROPE_MAX);
    RopeMove {
        position,
        completed: position >= ROPE_MAX,
        failed: position <= ROPE_MIN,
    }
}

/// Answer the current problem. Returns the new state and whether the choice was right.
///
/// The next problem is only shown while the game goes on; after the last
/// problem the list starts over.
pub fn answer(state: &RopeState, choice: i32) -> (RopeState, bool) {
    if state.is_terminal() {
        return (state.clone(), false);
    }
    let Some(problem) = state.current_problem() else {
        return (state.clone(), false);
    };

    let correct = choice == problem.answer;
    let pull = rope_move(state.position, correct);

    let mut next = state.clone();
    next.position = pull.position;
    next.completed = pull.completed;
    next.failed = pull.failed;
    if next.is_terminal() {
        log::debug!("Tug of war over at {}", next.position);
    } else {
        next.current = (state.current + 1) % state.problems.len();
    }
    (next, correct)
}
