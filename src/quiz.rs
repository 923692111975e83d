//! Arithmetic quiz session
//!
//! A fixed-length run of chain problems. A wrong answer resets the streak and
//! can be retried; once the current problem is answered correctly further
//! answers are ignored until `next_problem`.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::TRACING_UNLOCK_SCORE;
use crate::problems::{ChainProblem, Grade, session, stars};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizState {
    pub problems: Vec<ChainProblem>,
    pub current: usize,
    pub correct: u32,
    pub streak: u32,
    /// Verdict on the latest answer to the current problem
    pub last_answer: Option<bool>,
    pub finished: bool,
}

/// Summary shown on the result screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizResult {
    pub correct: u32,
    pub total: u32,
    pub stars: u8,
    pub grade: Grade,
}

impl QuizState {
    pub fn new_session(length: usize, rng: &mut impl Rng) -> Self {
        Self {
            problems: session(length.max(1), rng),
            current: 0,
            correct: 0,
            streak: 0,
            last_answer: None,
            finished: false,
        }
    }

    pub fn current_problem(&self) -> Option<&ChainProblem> {
        self.problems.get(self.current)
    }

    /// Percent of the session reached, counting the problem on screen
    pub fn progress(&self) -> u8 {
        if self.problems.is_empty() {
            return 0;
        }
        (((self.current + 1) * 100) / self.problems.len()).min(100) as u8
    }

    pub fn total(&self) -> u32 {
        self.problems.len() as u32
    }

    pub fn result(&self) -> QuizResult {
        QuizResult {
            correct: self.correct,
            total: self.total(),
            stars: stars(self.correct, self.total()),
            grade: Grade::from_score(self.correct, self.total()),
        }
    }

    /// Enough correct answers to open the tracing game
    pub fn unlocks_tracing(&self) -> bool {
        self.correct >= TRACING_UNLOCK_SCORE
    }
}

/// Check an answer against the current problem
pub fn submit(state: &QuizState, answer: i32) -> QuizState {
    if state.finished || state.last_answer == Some(true) {
        return state.clone();
    }
    let Some(problem) = state.current_problem() else {
        return state.clone();
    };

    let mut next = state.clone();
    if answer == problem.answer {
        next.correct += 1;
        next.streak += 1;
        next.last_answer = Some(true);
    } else {
        next.streak = 0;
        next.last_answer = Some(false);
    }
    next
}

/// Move on; past the last problem the session is finished
pub fn next_problem(state: &QuizState) -> QuizState {
    if state.finished {
        return state.clone();
    }
    let mut next = state.clone();
    next.last_answer = None;
    if state.current + 1 >= state.problems.len() {
        next.finished = true;
        log::debug!("Quiz finished: {}/{}", next.correct, next.total());
    } else {
        next.current += 1;
    }
    next
}
