//! Arithmetic problem generators
//!
//! Each game samples operands from its own fixed ranges. Subtraction is always
//! drawn so the result stays non-negative; multiple-choice games get a shuffled
//! set of near-miss options around the answer.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::consts::OPTION_COUNT;

/// Maximum resampling attempts for a chain problem
pub const CHAIN_MAX_ATTEMPTS: u32 = 100;
/// Largest allowed chain result
pub const CHAIN_MAX_RESULT: i32 = 20;

/// Binary arithmetic operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Sub,
}

impl Operator {
    pub fn apply(self, lhs: i32, rhs: i32) -> i32 {
        match self {
            Operator::Add => lhs + rhs,
            Operator::Sub => lhs - rhs,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
        }
    }

    /// Fair coin between addition and subtraction
    pub fn random(rng: &mut impl Rng) -> Self {
        if rng.random_bool(0.5) {
            Operator::Add
        } else {
            Operator::Sub
        }
    }
}

/// The four operator pairings a chain problem can use
const CHAIN_OPS: [(Operator, Operator); 4] = [
    (Operator::Add, Operator::Add),
    (Operator::Add, Operator::Sub),
    (Operator::Sub, Operator::Add),
    (Operator::Sub, Operator::Sub),
];

/// Three-operand problem: `a op1 b op2 c = ?`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainProblem {
    pub a: i32,
    pub b: i32,
    pub c: i32,
    pub op1: Operator,
    pub op2: Operator,
    pub answer: i32,
}

impl ChainProblem {
    /// Evaluate the operator chain left to right
    pub fn recompute(&self) -> i32 {
        self.op2.apply(self.op1.apply(self.a, self.b), self.c)
    }

    pub fn display(&self) -> String {
        format!(
            "{} {} {} {} {} = ?",
            self.a,
            self.op1.symbol(),
            self.b,
            self.op2.symbol(),
            self.c
        )
    }

    /// Whether the result range and intermediate constraints hold
    pub fn in_range(&self) -> bool {
        let intermediate_ok = self.op1 != Operator::Sub || self.a - self.b >= 0;
        (0..=CHAIN_MAX_RESULT).contains(&self.answer) && intermediate_ok
    }
}

/// Generate a chain problem with a result in [0, 20].
///
/// Resamples operands up to [`CHAIN_MAX_ATTEMPTS`] times; if no sample fits,
/// the last one is returned as-is.
pub fn chain_problem(rng: &mut impl Rng) -> ChainProblem {
    let (op1, op2) = CHAIN_OPS[rng.random_range(0..CHAIN_OPS.len())];
    let mut attempts = 0;
    loop {
        let a = rng.random_range(3..=17);
        let b = rng.random_range(1..=9);
        let c = rng.random_range(1..=9);
        let problem = ChainProblem {
            a,
            b,
            c,
            op1,
            op2,
            answer: op2.apply(op1.apply(a, b), c),
        };
        attempts += 1;
        if problem.in_range() || attempts >= CHAIN_MAX_ATTEMPTS {
            return problem;
        }
    }
}

/// A quiz session worth of chain problems
pub fn session(count: usize, rng: &mut impl Rng) -> Vec<ChainProblem> {
    (0..count).map(|_| chain_problem(rng)).collect()
}

/// Two-operand problem with shuffled answer options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceProblem {
    pub a: i32,
    pub b: i32,
    pub op: Operator,
    pub answer: i32,
    pub options: Vec<i32>,
}

impl ChoiceProblem {
    pub fn is_odd(&self) -> bool {
        self.answer % 2 != 0
    }

    pub fn display(&self) -> String {
        format!("{} {} {} = ?", self.a, self.op.symbol(), self.b)
    }
}

/// Generate a problem for tug of war or marbles.
///
/// Addition: both operands in 1..=10. Subtraction: minuend in 10..=19 and a
/// strictly smaller subtrahend, so the answer is at least 1.
pub fn choice_problem(rng: &mut impl Rng) -> ChoiceProblem {
    let op = Operator::random(rng);
    let (a, b) = match op {
        Operator::Add => (rng.random_range(1..=10), rng.random_range(1..=10)),
        Operator::Sub => {
            let a = rng.random_range(10..=19);
            (a, rng.random_range(1..a))
        }
    };
    let answer = op.apply(a, b);
    ChoiceProblem {
        a,
        b,
        op,
        answer,
        options: answer_options(answer, rng),
    }
}

/// Build [`OPTION_COUNT`] distinct positive options containing `answer`.
///
/// Wrong values are small offsets (1..=5) above or below the answer. The
/// result is shuffled so the answer's slot is random.
pub fn answer_options(answer: i32, rng: &mut impl Rng) -> Vec<i32> {
    let mut options = vec![answer];
    while options.len() < OPTION_COUNT {
        let offset = rng.random_range(1..=5);
        let wrong = if rng.random_bool(0.5) {
            answer + offset
        } else {
            (answer - offset).max(1)
        };
        if wrong > 0 && !options.contains(&wrong) {
            options.push(wrong);
        }
    }
    options.shuffle(rng);
    options
}

/// Problem shown on a glass bridge row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeProblem {
    pub a: i32,
    pub b: i32,
    pub op: Operator,
    pub answer: i32,
    pub wrong_answer: i32,
}

impl BridgeProblem {
    pub fn display(&self) -> String {
        format!("{} {} {} = ?", self.a, self.op.symbol(), self.b)
    }
}

/// Generate a bridge problem plus a single close wrong answer
pub fn bridge_problem(rng: &mut impl Rng) -> BridgeProblem {
    let op = Operator::random(rng);
    let (a, b) = match op {
        // Result 5-21
        Operator::Add => (rng.random_range(3..=12), rng.random_range(2..=9)),
        // Result 0-15
        Operator::Sub => (rng.random_range(8..=17), rng.random_range(2..=8)),
    };
    let answer = op.apply(a, b);

    let sign = if rng.random_bool(0.5) { 1 } else { -1 };
    let offset = rng.random_range(1..=3);
    let mut wrong_answer = answer + sign * offset;
    if wrong_answer <= 0 || wrong_answer == answer {
        wrong_answer = answer + offset;
    }

    BridgeProblem {
        a,
        b,
        op,
        answer,
        wrong_answer,
    }
}

/// One step of a worked decomposition (`lhs op rhs = result`); empty slots are unanswered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecompositionStep {
    pub lhs: Option<i32>,
    pub rhs: Option<i32>,
    pub op: Operator,
    pub result: Option<i32>,
}

/// A step is valid only when every slot is filled and the arithmetic holds
pub fn validate_step(step: &DecompositionStep) -> bool {
    match (step.lhs, step.rhs, step.result) {
        (Some(lhs), Some(rhs), Some(result)) => step.op.apply(lhs, rhs) == result,
        _ => false,
    }
}

/// Star rating: 3 for a perfect run, 2 from 80%, 1 from 50%
pub fn stars(correct: u32, total: u32) -> u8 {
    if correct >= total {
        3
    } else if 5 * correct >= 4 * total {
        2
    } else if 2 * correct >= total {
        1
    } else {
        0
    }
}

/// Result classification shown on the quiz result screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    Perfect,
    Great,
    Good,
    TryAgain,
}

impl Grade {
    pub fn from_score(correct: u32, total: u32) -> Self {
        match stars(correct, total) {
            3 => Grade::Perfect,
            2 => Grade::Great,
            1 => Grade::Good,
            _ => Grade::TryAgain,
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            Grade::Perfect => "🏆",
            Grade::Great => "🎉",
            Grade::Good => "👍",
            Grade::TryAgain => "💪",
        }
    }
}
