//! Haptic feedback cues
//!
//! Cues are derived by comparing a game slice before and after a transition,
//! so the engines stay free of side effects. The shell plays them.

use serde::{Deserialize, Serialize};

use crate::bridge::BridgeState;
use crate::marbles::{MarblesState, RoundOutcome};
use crate::platform;
use crate::quiz::QuizState;
use crate::reaction::{Light, ReactionState};
use crate::shooter::ShooterState;
use crate::tracing::TraceState;

/// Vibration cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Haptic {
    /// Correct step or answer
    Correct,
    /// Game won
    Success,
    /// Wrong answer, life lost, red light
    Wrong,
    /// Game lost
    Fail,
}

impl Haptic {
    /// Vibration pattern in milliseconds (on, off, on, ...)
    pub fn pattern(&self) -> &'static [u32] {
        match self {
            Haptic::Correct => &[30],
            Haptic::Success => &[50],
            Haptic::Wrong => &[100, 50, 100],
            Haptic::Fail => &[200, 100, 200, 100, 200],
        }
    }

    pub fn play(&self) {
        platform::vibrate(self.pattern());
    }
}

/// Success or Fail when a game just ended
fn finish(prev: (bool, bool), next: (bool, bool), cues: &mut Vec<Haptic>) {
    let (was_completed, was_failed) = prev;
    let (completed, failed) = next;
    if completed && !was_completed {
        cues.push(Haptic::Success);
    } else if failed && !was_failed {
        cues.push(Haptic::Fail);
    }
}

/// The quiz only buzzes on a wrong answer
pub fn quiz_cues(next: &QuizState) -> Vec<Haptic> {
    match next.last_answer {
        Some(false) => vec![Haptic::Wrong],
        _ => Vec::new(),
    }
}

pub fn trace_cues(prev: &TraceState, next: &TraceState) -> Vec<Haptic> {
    let mut cues = Vec::new();
    if next.lives < prev.lives && !next.failed {
        cues.push(Haptic::Wrong);
    }
    finish(
        (prev.completed, prev.failed),
        (next.completed, next.failed),
        &mut cues,
    );
    cues
}

pub fn bridge_cues(prev: &BridgeState, next: &BridgeState) -> Vec<Haptic> {
    let mut cues = Vec::new();
    if next.selected_panel != prev.selected_panel
        && let Some(panel) = next
            .selected_panel
            .and_then(|id| next.panels.iter().find(|p| p.id == id))
    {
        cues.push(if panel.safe {
            Haptic::Correct
        } else {
            Haptic::Wrong
        });
    }
    finish(
        (prev.completed, prev.failed),
        (next.completed, next.failed),
        &mut cues,
    );
    cues
}

/// Tug of war reacts to every answer
pub fn rope_cues(correct: bool) -> Vec<Haptic> {
    vec![if correct {
        Haptic::Correct
    } else {
        Haptic::Wrong
    }]
}

pub fn marbles_cues(prev: &MarblesState, next: &MarblesState) -> Vec<Haptic> {
    let mut cues = Vec::new();
    if prev.outcome.is_none() {
        match next.outcome {
            Some(RoundOutcome::Win) => cues.push(Haptic::Correct),
            Some(RoundOutcome::Loss) => cues.push(Haptic::Wrong),
            None => {}
        }
    }
    finish(
        (prev.completed, prev.failed),
        (next.completed, next.failed),
        &mut cues,
    );
    cues
}

pub fn reaction_cues(prev: &ReactionState, next: &ReactionState) -> Vec<Haptic> {
    let mut cues = Vec::new();
    if next.started && next.light == Light::Red && prev.light != Light::Red {
        cues.push(Haptic::Wrong);
    }
    finish(
        (prev.completed, prev.failed),
        (next.completed, next.failed),
        &mut cues,
    );
    cues
}

pub fn shooter_cues(prev: &ShooterState, next: &ShooterState, cleared: usize) -> Vec<Haptic> {
    let mut cues = Vec::new();
    if cleared > 0 {
        cues.push(Haptic::Correct);
    }
    finish(
        (prev.completed, prev.failed),
        (next.completed, next.failed),
        &mut cues,
    );
    cues
}
