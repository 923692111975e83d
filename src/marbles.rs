//! Odd or even marbles
//!
//! Each round the player bets marbles, guesses whether the answer to the next
//! problem is odd or even, then solves it. Both the answer and the parity
//! guess must be right to win the bet.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::MARBLES_START;
use crate::problems::{ChoiceProblem, choice_problem};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Parity {
    Odd,
    Even,
}

impl Parity {
    pub fn of(n: i32) -> Self {
        if n % 2 != 0 { Parity::Odd } else { Parity::Even }
    }
}

/// Round phases, always visited in this order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Bet,
    Guess,
    Solve,
    Result,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundOutcome {
    Win,
    Loss,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarblesState {
    pub player: u32,
    pub opponent: u32,
    pub bet: u32,
    pub guess: Option<Parity>,
    pub problem: Option<ChoiceProblem>,
    pub phase: Phase,
    pub outcome: Option<RoundOutcome>,
    /// Opponent ran out of marbles
    pub completed: bool,
    /// Player ran out of marbles
    pub failed: bool,
}

/// Marble counts after a round is scored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settlement {
    pub answer_correct: bool,
    pub guess_correct: bool,
    pub won: bool,
    pub player: u32,
    pub opponent: u32,
}

impl Default for MarblesState {
    fn default() -> Self {
        Self {
            player: MARBLES_START,
            opponent: MARBLES_START,
            bet: 1,
            guess: None,
            problem: None,
            phase: Phase::Bet,
            outcome: None,
            completed: false,
            failed: false,
        }
    }
}

impl MarblesState {
    pub fn is_terminal(&self) -> bool {
        self.completed || self.failed
    }
}

/// Score a round without changing the state.
///
/// Without a problem and a guess nothing moves.
pub fn settle(state: &MarblesState, choice: i32) -> Settlement {
    let (Some(problem), Some(guess)) = (&state.problem, state.guess) else {
        return Settlement {
            answer_correct: false,
            guess_correct: false,
            won: false,
            player: state.player,
            opponent: state.opponent,
        };
    };

    let answer_correct = choice == problem.answer;
    let guess_correct = guess == Parity::of(problem.answer);
    let won = answer_correct && guess_correct;

    let (player, opponent) = if won {
        (
            state.player + state.bet,
            state.opponent.saturating_sub(state.bet),
        )
    } else {
        (
            state.player.saturating_sub(state.bet),
            state.opponent + state.bet,
        )
    };

    Settlement {
        answer_correct,
        guess_correct,
        won,
        player,
        opponent,
    }
}

/// Pick the bet (clamped to the player's marbles) and move on to guessing
pub fn place_bet(state: &MarblesState, amount: u32) -> MarblesState {
    if state.phase != Phase::Bet || state.is_terminal() {
        return state.clone();
    }
    MarblesState {
        bet: amount.clamp(1, state.player.max(1)),
        phase: Phase::Guess,
        ..state.clone()
    }
}

/// Guess the parity; the problem is drawn now so the guess can't depend on it
pub fn choose_parity(state: &MarblesState, parity: Parity, rng: &mut impl Rng) -> MarblesState {
    if state.phase != Phase::Guess || state.is_terminal() {
        return state.clone();
    }
    MarblesState {
        guess: Some(parity),
        problem: Some(choice_problem(rng)),
        phase: Phase::Solve,
        ..state.clone()
    }
}

/// Submit an answer and transfer the bet
pub fn answer(state: &MarblesState, choice: i32) -> MarblesState {
    if state.phase != Phase::Solve || state.is_terminal() {
        return state.clone();
    }
    let result = settle(state, choice);
    let mut next = state.clone();
    next.player = result.player;
    next.opponent = result.opponent;
    next.outcome = Some(if result.won {
        RoundOutcome::Win
    } else {
        RoundOutcome::Loss
    });
    next.phase = Phase::Result;
    next.completed = next.opponent == 0;
    next.failed = next.player == 0;
    log::debug!(
        "Marbles round {:?}: {} vs {}",
        next.outcome,
        next.player,
        next.opponent
    );
    next
}

/// Start another round unless someone is out of marbles
pub fn next_round(state: &MarblesState) -> MarblesState {
    if state.phase != Phase::Result || state.is_terminal() {
        return state.clone();
    }
    MarblesState {
        bet: state.bet.clamp(1, state.player.max(1)),
        guess: None,
        problem: None,
        phase: Phase::Bet,
        outcome: None,
        ..state.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problems::Operator;
    use crate::rng::seeded;

    fn solving(bet: u32, guess: Parity, answer: i32) -> MarblesState {
        MarblesState {
            bet,
            guess: Some(guess),
            problem: Some(ChoiceProblem {
                a: answer - 1,
                b: 1,
                op: Operator::Add,
                answer,
                options: vec![answer, answer + 1, answer + 2],
            }),
            phase: Phase::Solve,
            ..MarblesState::default()
        }
    }

    #[test]
    fn test_phase_order() {
        let mut rng = seeded(41);
        let state = MarblesState::default();
        // Out-of-phase input is ignored
        assert_eq!(answer(&state, 3), state);
        assert_eq!(choose_parity(&state, Parity::Odd, &mut rng), state);

        let state = place_bet(&state, 3);
        assert_eq!(state.phase, Phase::Guess);
        assert_eq!(state.bet, 3);
        assert_eq!(place_bet(&state, 5), state);

        let state = choose_parity(&state, Parity::Even, &mut rng);
        assert_eq!(state.phase, Phase::Solve);
        assert!(state.problem.is_some());

        let correct = state.problem.as_ref().unwrap().answer;
        let state = answer(&state, correct);
        assert_eq!(state.phase, Phase::Result);
        assert!(state.outcome.is_some());

        let state = next_round(&state);
        assert_eq!(state.phase, Phase::Bet);
        assert_eq!(state.guess, None);
        assert_eq!(state.problem, None);
    }

    #[test]
    fn test_bet_clamped_to_marbles() {
        let state = MarblesState {
            player: 2,
            ..MarblesState::default()
        };
        assert_eq!(place_bet(&state, 5).bet, 2);
        assert_eq!(place_bet(&state, 0).bet, 1);
    }

    #[test]
    fn test_win_needs_answer_and_parity() {
        let win = answer(&solving(3, Parity::Odd, 7), 7);
        assert_eq!(win.outcome, Some(RoundOutcome::Win));
        assert_eq!((win.player, win.opponent), (13, 7));

        let wrong_parity = answer(&solving(3, Parity::Even, 7), 7);
        assert_eq!(wrong_parity.outcome, Some(RoundOutcome::Loss));
        assert_eq!((wrong_parity.player, wrong_parity.opponent), (7, 13));

        let wrong_answer = settle(&solving(3, Parity::Odd, 7), 8);
        assert!(!wrong_answer.answer_correct);
        assert!(wrong_answer.guess_correct);
        assert!(!wrong_answer.won);
        assert_eq!((wrong_answer.player, wrong_answer.opponent), (7, 13));
    }

    #[test]
    fn test_counts_never_negative_and_game_ends() {
        let state = MarblesState {
            opponent: 2,
            ..solving(5, Parity::Even, 4)
        };
        let won = answer(&state, 4);
        assert_eq!(won.opponent, 0);
        assert!(won.completed);
        assert_eq!(next_round(&won), won);

        let state = MarblesState {
            player: 3,
            ..solving(3, Parity::Even, 4)
        };
        let lost = answer(&state, 5);
        assert_eq!(lost.player, 0);
        assert!(lost.failed);
        assert!(!lost.completed);
    }

    #[test]
    fn test_settle_without_problem_is_neutral() {
        let state = MarblesState::default();
        let result = settle(&state, 4);
        assert!(!result.won);
        assert_eq!((result.player, result.opponent), (10, 10));
    }
}
