//! Squid Math entry point
//!
//! On the web the shell drives a [`Store`] from DOM events. Natively there is
//! no UI, so the binary autoplays every game once and logs how it went.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

use squid_math::platform;
#[cfg(not(target_arch = "wasm32"))]
use squid_math::{Event, Screen, Store};

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    platform::init_logging();
    let store = squid_math::Store::load();
    log::info!(
        "Squid Math starting ({} sessions today, best {})",
        store.stats.sessions,
        store.stats.best
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    platform::init_logging();
    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);
    log::info!("Squid Math (native) autoplay with seed {}", seed);

    let mut store = Store::with_seed(seed);
    autoplay::quiz(&mut store);
    autoplay::tracing(&mut store);
    autoplay::bridge(&mut store);
    autoplay::reaction(&mut store);
    autoplay::rope(&mut store);
    autoplay::marbles(&mut store);
    autoplay::shooter(&mut store);

    println!(
        "\nToday: {} sessions, {} correct, best {}, shapes {:?}",
        store.stats.sessions, store.stats.correct, store.stats.best, store.stats.completed_shapes
    );
}

/// Scripted players, one per game
#[cfg(not(target_arch = "wasm32"))]
mod autoplay {
    use super::*;
    use squid_math::marbles::Parity;
    use squid_math::reaction::Light;
    use squid_math::shooter::spiral;
    use squid_math::store::Game;

    const SHOOTER_DT: f32 = 1.0 / 30.0;
    const SHOOTER_MAX_TICKS: u32 = 20_000;

    fn report(store: &Store, game: Game, detail: String) {
        let done = store.screen == Screen::Result(game);
        println!("{:?}: {} ({})", game, detail, if done { "over" } else { "stopped" });
    }

    pub fn quiz(store: &mut Store) {
        store.dispatch(Event::StartQuiz);
        while store.screen == Screen::Playing(Game::Quiz) {
            let Some(answer) = store
                .quiz
                .as_ref()
                .and_then(|q| q.current_problem())
                .map(|p| p.answer)
            else {
                break;
            };
            store.dispatch(Event::QuizAnswer(answer));
            store.dispatch(Event::NextProblem);
        }
        if let Some(quiz) = &store.quiz {
            let result = quiz.result();
            report(
                store,
                Game::Quiz,
                format!(
                    "{}/{} {}",
                    result.correct,
                    result.total,
                    result.grade.glyph()
                ),
            );
        }
    }

    pub fn tracing(store: &mut Store) {
        store.dispatch(Event::StartTracing(None));
        let Some(path) = store.tracing.as_ref().map(|t| t.path.clone()) else {
            return;
        };
        if let Some(&start) = path.first() {
            store.dispatch(Event::BeginStroke(start));
        }
        for point in path {
            if store.screen != Screen::Playing(Game::Tracing) {
                break;
            }
            store.dispatch(Event::TracePoint(point));
        }
        if let Some(state) = &store.tracing {
            report(
                store,
                Game::Tracing,
                format!("{} {}%", state.shape.name(), state.progress),
            );
        }
    }

    /// Solve each row's problem and step on the panel showing the answer
    pub fn bridge(store: &mut Store) {
        store.dispatch(Event::StartBridge);
        while store.screen == Screen::Playing(Game::Bridge) {
            let Some(panel) = store.bridge.as_ref().and_then(|b| {
                let row = b.next_row();
                let answer = b.problem_for_row(row)?.answer;
                b.panels
                    .iter()
                    .find(|p| p.row == row && p.value == answer)
                    .map(|p| p.id)
            }) else {
                break;
            };
            store.dispatch(Event::StepPanel(panel));
        }
        if let Some(bridge) = &store.bridge {
            report(store, Game::Bridge, format!("{:?}", bridge.summary()));
        }
    }

    /// Run on green, rest on red
    pub fn reaction(store: &mut Store) {
        store.dispatch(Event::StartReaction);
        for _ in 0..3 {
            store.dispatch(Event::CountdownTick);
        }
        while store.screen == Screen::Playing(Game::Reaction) {
            for _ in 0..10 {
                store.dispatch(Event::MoveForward);
                store.dispatch(Event::Elapsed(100));
            }
            store.dispatch(Event::Rest);
            store.dispatch(Event::ClockTick);

            store.dispatch(Event::SetLight(Light::Red));
            let red_ms = store.light_duration(Light::Red);
            store.dispatch(Event::Elapsed(red_ms));
            for _ in 0..red_ms / 1000 {
                store.dispatch(Event::ClockTick);
            }
            store.dispatch(Event::SetLight(Light::Green));
        }
        if let Some(state) = &store.reaction {
            report(
                store,
                Game::Reaction,
                format!("{:?} at {}", state.outcome(), state.position),
            );
        }
    }

    pub fn rope(store: &mut Store) {
        store.dispatch(Event::StartRope);
        while store.screen == Screen::Playing(Game::Rope) {
            let Some(answer) = store
                .rope
                .as_ref()
                .and_then(|r| r.current_problem())
                .map(|p| p.answer)
            else {
                break;
            };
            store.dispatch(Event::RopeAnswer(answer));
        }
        if let Some(rope) = &store.rope {
            report(store, Game::Rope, format!("rope at {}", rope.position));
        }
    }

    /// Always bet three on even and answer correctly
    pub fn marbles(store: &mut Store) {
        store.dispatch(Event::StartMarbles);
        for _ in 0..50 {
            if store.screen != Screen::Playing(Game::Marbles) {
                break;
            }
            store.dispatch(Event::PlaceBet(3));
            store.dispatch(Event::ChooseParity(Parity::Even));
            let Some(answer) = store
                .marbles
                .as_ref()
                .and_then(|m| m.problem.as_ref())
                .map(|p| p.answer)
            else {
                break;
            };
            store.dispatch(Event::MarblesAnswer(answer));
            store.dispatch(Event::NextRound);
        }
        if let Some(m) = &store.marbles {
            report(
                store,
                Game::Marbles,
                format!("{} vs {}", m.player, m.opponent),
            );
        }
    }

    /// Fire at the ball closest to the sink twice a second
    pub fn shooter(store: &mut Store) {
        store.dispatch(Event::StartShooter);
        for tick in 0..SHOOTER_MAX_TICKS {
            if store.screen != Screen::Playing(Game::Shooter) {
                break;
            }
            store.dispatch(Event::Tick(SHOOTER_DT));
            if tick % 15 != 0 {
                continue;
            }
            let target = store.shooter.as_ref().and_then(|s| {
                s.balls
                    .iter()
                    .rev()
                    .find(|b| b.is_visible())
                    .map(|b| spiral().point_at(b.position))
            });
            if let Some(target) = target {
                store.dispatch(Event::Aim(target));
                store.dispatch(Event::Shoot(target));
            }
        }
        if let Some(s) = &store.shooter {
            report(
                store,
                Game::Shooter,
                format!("level {} score {}", s.level, s.score),
            );
        }
    }
}
