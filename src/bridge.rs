//! Glass bridge game
//!
//! Each row of the bridge has two glass panels showing a number. The panel
//! with the right answer to the row's problem holds; the other one breaks.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{BRIDGE_MAX_ROWS, BRIDGE_MIN_ROWS};
use crate::problems::{BridgeProblem, bridge_problem};

/// Left or right panel of a row
pub const LEFT: usize = 0;
pub const RIGHT: usize = 1;

/// A single glass panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Panel {
    /// `row * 2 + col`
    pub id: usize,
    pub row: usize,
    pub col: usize,
    pub safe: bool,
    pub revealed: bool,
    pub broken: bool,
    /// Number shown on the glass
    pub value: i32,
}

/// Glass bridge state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeState {
    /// Two panels per row, ordered by ID
    pub panels: Vec<Panel>,
    pub problems: Vec<BridgeProblem>,
    /// Last row stood on; `None` while still on the starting platform
    pub current_row: Option<usize>,
    pub total_rows: usize,
    pub completed: bool,
    pub failed: bool,
    /// Panel stepped on most recently
    pub selected_panel: Option<usize>,
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BridgeSummary {
    /// Crossed in `steps` steps
    Crossed { steps: usize },
    /// Fell (or stopped) at step `reached` of `total`
    Fell { reached: usize, total: usize },
}

impl BridgeState {
    /// Build a bridge of `rows` rows (clamped to 4..=10)
    pub fn new(rows: usize, rng: &mut impl Rng) -> Self {
        let total_rows = rows.clamp(BRIDGE_MIN_ROWS, BRIDGE_MAX_ROWS);
        let mut panels = Vec::with_capacity(total_rows * 2);
        let mut problems = Vec::with_capacity(total_rows);

        for row in 0..total_rows {
            let problem = bridge_problem(rng);
            let safe_col = if rng.random_bool(0.5) { LEFT } else { RIGHT };

            for col in [LEFT, RIGHT] {
                let safe = col == safe_col;
                panels.push(Panel {
                    id: row * 2 + col,
                    row,
                    col,
                    safe,
                    revealed: false,
                    broken: false,
                    value: if safe {
                        problem.answer
                    } else {
                        problem.wrong_answer
                    },
                });
            }
            problems.push(problem);
        }

        Self {
            panels,
            problems,
            current_row: None,
            total_rows,
            completed: false,
            failed: false,
            selected_panel: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.completed || self.failed
    }

    /// The only row that can be stepped on
    pub fn next_row(&self) -> usize {
        self.current_row.map_or(0, |r| r + 1)
    }

    /// Left and right panel of a row
    pub fn row_panels(&self, row: usize) -> Option<(&Panel, &Panel)> {
        let left = self.panels.iter().find(|p| p.row == row && p.col == LEFT)?;
        let right = self.panels.iter().find(|p| p.row == row && p.col == RIGHT)?;
        Some((left, right))
    }

    pub fn problem_for_row(&self, row: usize) -> Option<&BridgeProblem> {
        self.problems.get(row)
    }

    /// Rows crossed as a rounded percentage
    pub fn progress(&self) -> u8 {
        match self.current_row {
            None => 0,
            Some(row) => (((row + 1) * 100 + self.total_rows / 2) / self.total_rows) as u8,
        }
    }

    pub fn summary(&self) -> BridgeSummary {
        if self.completed {
            BridgeSummary::Crossed {
                steps: self.next_row(),
            }
        } else {
            BridgeSummary::Fell {
                reached: self.next_row() + 1,
                total: self.total_rows,
            }
        }
    }
}

/// Step on a panel. Returns the new state and whether the panel held.
///
/// Only panels on the next row count; anything else leaves the state as is.
/// Stepping reveals both panels of the row.
pub fn step(state: &BridgeState, panel_id: usize) -> (BridgeState, bool) {
    if state.is_terminal() {
        return (state.clone(), false);
    }
    let Some(panel) = state.panels.iter().find(|p| p.id == panel_id) else {
        return (state.clone(), false);
    };
    let row = state.next_row();
    if panel.row != row {
        return (state.clone(), false);
    }
    let safe = panel.safe;

    let mut next = state.clone();
    for p in next.panels.iter_mut().filter(|p| p.row == row) {
        p.revealed = true;
        if p.id == panel_id {
            p.broken = !p.safe;
        }
    }
    next.selected_panel = Some(panel_id);

    if safe {
        next.current_row = Some(row);
        next.completed = row + 1 >= state.total_rows;
        if next.completed {
            log::debug!("Bridge crossed in {} steps", row + 1);
        }
    } else {
        log::debug!("Panel {} broke on row {}", panel_id, row);
        next.failed = true;
    }

    (next, safe)
}
