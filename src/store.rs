//! Central game store
//!
//! Owns the current screen, one state slice per game, stats, settings and the
//! RNG. The shell feeds it [`Event`]s; each event is routed to the active
//! game's pure transition and the returned state replaces the slice.

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::bridge::{self, BridgeState};
use crate::feedback::{self, Haptic};
use crate::marbles::{self, MarblesState, Parity};
use crate::platform;
use crate::quiz::{self, QuizState};
use crate::reaction::{self, Light, ReactionState};
use crate::rng;
use crate::rope::{self, RopeState};
use crate::settings::Settings;
use crate::shooter::{self, ShooterState};
use crate::stats::Stats;
use crate::tracing::{self, ShapeKind, TraceState};

/// The mini-games
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Game {
    Quiz,
    Tracing,
    Bridge,
    Reaction,
    Rope,
    Marbles,
    Shooter,
}

/// Which screen the shell should show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Screen {
    #[default]
    Start,
    Playing(Game),
    Result(Game),
}

/// Everything the shell can ask the store to do
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    GoToStart,

    // Arithmetic quiz
    StartQuiz,
    QuizAnswer(i32),
    NextProblem,

    // Tracing (random shape when `None`)
    StartTracing(Option<ShapeKind>),
    BeginStroke(Vec2),
    TracePoint(Vec2),
    EndStroke,
    RestartTracing,

    // Glass bridge
    StartBridge,
    StepPanel(usize),

    // Red light, green light
    StartReaction,
    CountdownTick,
    ClockTick,
    SetLight(Light),
    Elapsed(u32),
    MoveForward,
    Rest,

    // Tug of war
    StartRope,
    RopeAnswer(i32),

    // Marbles
    StartMarbles,
    PlaceBet(u32),
    ChooseParity(Parity),
    MarblesAnswer(i32),
    NextRound,

    // Number shooter
    StartShooter,
    Tick(f32),
    Aim(Vec2),
    Shoot(Vec2),
    TogglePause,
    NextLevel,
}

pub struct Store {
    pub screen: Screen,
    pub quiz: Option<QuizState>,
    pub tracing: Option<TraceState>,
    pub bridge: Option<BridgeState>,
    pub reaction: Option<ReactionState>,
    pub rope: Option<RopeState>,
    pub marbles: Option<MarblesState>,
    pub shooter: Option<ShooterState>,
    pub stats: Stats,
    pub settings: Settings,
    rng: Pcg32,
}

impl Store {
    /// Fresh store; seeded from `settings.seed` when set
    pub fn new(settings: Settings, stats: Stats) -> Self {
        let rng = rng::for_seed(settings.seed);
        Self {
            screen: Screen::Start,
            quiz: None,
            tracing: None,
            bridge: None,
            reaction: None,
            rope: None,
            marbles: None,
            shooter: None,
            stats,
            settings,
            rng,
        }
    }

    /// Deterministic store with default settings
    pub fn with_seed(seed: u64) -> Self {
        let settings = Settings {
            seed: Some(seed),
            ..Settings::default()
        };
        Self::new(settings, Stats::new(&platform::today_key()))
    }

    /// Store built from persisted settings and stats
    pub fn load() -> Self {
        let settings = Settings::load();
        let stats = Stats::load(&platform::today_key());
        Self::new(settings, stats)
    }

    pub fn is_playing(&self, game: Game) -> bool {
        self.screen == Screen::Playing(game)
    }

    /// How long the shell should keep `light` on before switching
    pub fn light_duration(&mut self, light: Light) -> u32 {
        reaction::light_duration(light, &mut self.rng)
    }

    /// Apply an event. Returns the haptic cues it produced (empty when haptics are off).
    pub fn dispatch(&mut self, event: Event) -> Vec<Haptic> {
        let cues = match event {
            Event::GoToStart => {
                self.screen = Screen::Start;
                Vec::new()
            }

            Event::StartQuiz => self.start_quiz(),
            Event::QuizAnswer(answer) => self.quiz_answer(answer),
            Event::NextProblem => self.next_problem(),

            Event::StartTracing(shape) => self.start_tracing(shape),
            Event::BeginStroke(point) => self.update_tracing(|s| tracing::begin_stroke(s, point)),
            Event::TracePoint(point) => self.update_tracing(|s| tracing::trace_point(s, point)),
            Event::EndStroke => self.update_tracing(tracing::end_stroke),
            Event::RestartTracing => self.restart_tracing(),

            Event::StartBridge => {
                let rows = self.settings.effective_bridge_rows();
                self.bridge = Some(BridgeState::new(rows, &mut self.rng));
                self.screen = Screen::Playing(Game::Bridge);
                Vec::new()
            }
            Event::StepPanel(panel_id) => self.step_panel(panel_id),

            Event::StartReaction => {
                self.reaction = Some(ReactionState::new(self.settings.reaction_duration));
                self.screen = Screen::Playing(Game::Reaction);
                Vec::new()
            }
            Event::CountdownTick => self.update_reaction(reaction::countdown_tick),
            Event::ClockTick => self.update_reaction(reaction::clock_tick),
            Event::SetLight(light) => self.update_reaction(|s| reaction::set_light(s, light)),
            Event::Elapsed(ms) => self.update_reaction(|s| reaction::advance_time(s, ms)),
            Event::MoveForward => self.update_reaction(reaction::move_forward),
            Event::Rest => self.update_reaction(reaction::rest),

            Event::StartRope => {
                let count = self.settings.rope_problems;
                self.rope = Some(RopeState::new(count, &mut self.rng));
                self.screen = Screen::Playing(Game::Rope);
                Vec::new()
            }
            Event::RopeAnswer(choice) => self.rope_answer(choice),

            Event::StartMarbles => {
                self.marbles = Some(MarblesState::default());
                self.screen = Screen::Playing(Game::Marbles);
                Vec::new()
            }
            Event::PlaceBet(amount) => self.update_marbles(|s, _| marbles::place_bet(s, amount)),
            Event::ChooseParity(parity) => {
                self.update_marbles(|s, rng| marbles::choose_parity(s, parity, rng))
            }
            Event::MarblesAnswer(choice) => self.update_marbles(|s, _| marbles::answer(s, choice)),
            Event::NextRound => self.update_marbles(|s, _| marbles::next_round(s)),

            Event::StartShooter => {
                let level = self.settings.effective_shooter_level();
                self.shooter = Some(ShooterState::new(level, &mut self.rng));
                self.screen = Screen::Playing(Game::Shooter);
                Vec::new()
            }
            Event::Tick(dt) => self.update_shooter(|s| shooter::advance(s, dt)),
            Event::Aim(target) => self.update_shooter(|s| shooter::aim(s, target)),
            Event::Shoot(target) => self.shoot(target),
            Event::TogglePause => self.update_shooter(shooter::toggle_pause),
            Event::NextLevel => self.next_level(),
        };

        if self.settings.haptics {
            cues
        } else {
            Vec::new()
        }
    }

    /// Move to the result screen when a game just ended
    fn end_if_terminal(&mut self, game: Game, was_terminal: bool, is_terminal: bool) {
        if is_terminal && !was_terminal {
            log::info!("{:?} over", game);
            self.screen = Screen::Result(game);
        }
    }

    fn start_quiz(&mut self) -> Vec<Haptic> {
        self.stats.reset_if_new_day(&platform::today_key());
        self.quiz = Some(QuizState::new_session(
            self.settings.quiz_length,
            &mut self.rng,
        ));
        self.screen = Screen::Playing(Game::Quiz);
        Vec::new()
    }

    fn quiz_answer(&mut self, answer: i32) -> Vec<Haptic> {
        if !self.is_playing(Game::Quiz) {
            return Vec::new();
        }
        let Some(prev) = self.quiz.as_ref() else {
            return Vec::new();
        };
        let next = quiz::submit(prev, answer);
        let changed = next != *prev;
        let scored = next.correct > prev.correct;

        if scored {
            self.stats.record_answer(true);
            self.stats.save();
        }
        let cues = if changed {
            feedback::quiz_cues(&next)
        } else {
            Vec::new()
        };
        self.quiz = Some(next);
        cues
    }

    fn next_problem(&mut self) -> Vec<Haptic> {
        if !self.is_playing(Game::Quiz) {
            return Vec::new();
        }
        let Some(prev) = self.quiz.as_ref() else {
            return Vec::new();
        };
        let next = quiz::next_problem(prev);
        let just_finished = next.finished && !prev.finished;

        if just_finished {
            self.stats.record_session(next.correct);
            self.stats.save();
        }
        self.quiz = Some(next);
        self.end_if_terminal(Game::Quiz, false, just_finished);
        Vec::new()
    }

    fn start_tracing(&mut self, shape: Option<ShapeKind>) -> Vec<Haptic> {
        let shape = shape.unwrap_or_else(|| tracing::random_shape(&mut self.rng));
        self.tracing = Some(TraceState::new(shape, self.settings.canvas_size));
        self.screen = Screen::Playing(Game::Tracing);
        Vec::new()
    }

    fn update_tracing(&mut self, transition: impl FnOnce(&TraceState) -> TraceState) -> Vec<Haptic> {
        if !self.is_playing(Game::Tracing) {
            return Vec::new();
        }
        let Some(prev) = self.tracing.as_ref() else {
            return Vec::new();
        };
        let next = transition(prev);
        let cues = feedback::trace_cues(prev, &next);
        let was_terminal = prev.is_terminal();

        if next.completed && !prev.completed && self.stats.record_shape(next.shape.id()) {
            self.stats.save();
        }
        let is_terminal = next.is_terminal();
        self.tracing = Some(next);
        self.end_if_terminal(Game::Tracing, was_terminal, is_terminal);
        cues
    }

    fn restart_tracing(&mut self) -> Vec<Haptic> {
        let on_tracing = matches!(
            self.screen,
            Screen::Playing(Game::Tracing) | Screen::Result(Game::Tracing)
        );
        if !on_tracing {
            return Vec::new();
        }
        if let Some(prev) = self.tracing.as_ref() {
            let next = tracing::restart(prev, self.settings.canvas_size);
            self.tracing = Some(next);
            self.screen = Screen::Playing(Game::Tracing);
        }
        Vec::new()
    }

    fn step_panel(&mut self, panel_id: usize) -> Vec<Haptic> {
        if !self.is_playing(Game::Bridge) {
            return Vec::new();
        }
        let Some(prev) = self.bridge.as_ref() else {
            return Vec::new();
        };
        let (next, _) = bridge::step(prev, panel_id);
        let cues = feedback::bridge_cues(prev, &next);
        let was_terminal = prev.is_terminal();
        let is_terminal = next.is_terminal();
        self.bridge = Some(next);
        self.end_if_terminal(Game::Bridge, was_terminal, is_terminal);
        cues
    }

    fn update_reaction(
        &mut self,
        transition: impl FnOnce(&ReactionState) -> ReactionState,
    ) -> Vec<Haptic> {
        if !self.is_playing(Game::Reaction) {
            return Vec::new();
        }
        let Some(prev) = self.reaction.as_ref() else {
            return Vec::new();
        };
        let next = transition(prev);
        let cues = feedback::reaction_cues(prev, &next);
        let was_terminal = prev.is_terminal();
        let is_terminal = next.is_terminal();
        self.reaction = Some(next);
        self.end_if_terminal(Game::Reaction, was_terminal, is_terminal);
        cues
    }

    fn rope_answer(&mut self, choice: i32) -> Vec<Haptic> {
        if !self.is_playing(Game::Rope) {
            return Vec::new();
        }
        let Some(prev) = self.rope.as_ref() else {
            return Vec::new();
        };
        let (next, correct) = rope::answer(prev, choice);
        let cues = if next != *prev {
            feedback::rope_cues(correct)
        } else {
            Vec::new()
        };
        let was_terminal = prev.is_terminal();
        let is_terminal = next.is_terminal();
        self.rope = Some(next);
        self.end_if_terminal(Game::Rope, was_terminal, is_terminal);
        cues
    }

    fn update_marbles(
        &mut self,
        transition: impl FnOnce(&MarblesState, &mut Pcg32) -> MarblesState,
    ) -> Vec<Haptic> {
        if !self.is_playing(Game::Marbles) {
            return Vec::new();
        }
        let Some(prev) = self.marbles.as_ref() else {
            return Vec::new();
        };
        let next = transition(prev, &mut self.rng);
        let cues = feedback::marbles_cues(prev, &next);
        let was_terminal = prev.is_terminal();
        let is_terminal = next.is_terminal();
        self.marbles = Some(next);
        self.end_if_terminal(Game::Marbles, was_terminal, is_terminal);
        cues
    }

    fn update_shooter(
        &mut self,
        transition: impl FnOnce(&ShooterState) -> ShooterState,
    ) -> Vec<Haptic> {
        if !self.is_playing(Game::Shooter) {
            return Vec::new();
        }
        let Some(prev) = self.shooter.as_ref() else {
            return Vec::new();
        };
        let next = transition(prev);
        let cues = feedback::shooter_cues(prev, &next, 0);
        let was_terminal = prev.is_terminal();
        let is_terminal = next.is_terminal();
        self.shooter = Some(next);
        self.end_if_terminal(Game::Shooter, was_terminal, is_terminal);
        cues
    }

    fn shoot(&mut self, target: Vec2) -> Vec<Haptic> {
        if !self.is_playing(Game::Shooter) {
            return Vec::new();
        }
        let Some(prev) = self.shooter.as_ref() else {
            return Vec::new();
        };
        let shot = shooter::shoot(prev, target, &mut self.rng);
        let cues = feedback::shooter_cues(prev, &shot.state, shot.cleared);
        let was_terminal = prev.is_terminal();
        let is_terminal = shot.state.is_terminal();
        self.shooter = Some(shot.state);
        self.end_if_terminal(Game::Shooter, was_terminal, is_terminal);
        cues
    }

    /// Cleared levels continue from the result screen
    fn next_level(&mut self) -> Vec<Haptic> {
        let on_shooter = matches!(
            self.screen,
            Screen::Playing(Game::Shooter) | Screen::Result(Game::Shooter)
        );
        if !on_shooter {
            return Vec::new();
        }
        if let Some(prev) = self.shooter.as_ref()
            && prev.completed
        {
            let next = shooter::next_level(prev, &mut self.rng);
            self.shooter = Some(next);
            self.screen = Screen::Playing(Game::Shooter);
        }
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_on_start_screen() {
        let store = Store::with_seed(1);
        assert_eq!(store.screen, Screen::Start);
        assert!(store.quiz.is_none());
        assert!(store.shooter.is_none());
    }

    #[test]
    fn test_events_for_inactive_game_are_ignored() {
        let mut store = Store::with_seed(2);
        store.dispatch(Event::StartBridge);
        let bridge = store.bridge.clone();

        store.dispatch(Event::StartRope);
        assert_eq!(store.screen, Screen::Playing(Game::Rope));
        assert!(store.dispatch(Event::StepPanel(0)).is_empty());
        assert_eq!(store.bridge, bridge);
    }

    #[test]
    fn test_go_to_start_keeps_slices() {
        let mut store = Store::with_seed(3);
        store.dispatch(Event::StartMarbles);
        store.dispatch(Event::PlaceBet(2));
        store.dispatch(Event::GoToStart);
        assert_eq!(store.screen, Screen::Start);
        assert_eq!(store.marbles.as_ref().map(|m| m.bet), Some(2));
        // No longer playing, so the bet can't change
        store.dispatch(Event::ChooseParity(Parity::Odd));
        assert_eq!(
            store.marbles.as_ref().map(|m| m.phase),
            Some(marbles::Phase::Guess)
        );
    }

    #[test]
    fn test_quiz_wrong_answer_buzzes_unless_haptics_off() {
        let mut store = Store::with_seed(4);
        store.dispatch(Event::StartQuiz);
        let answer = store.quiz.as_ref().unwrap().problems[0].answer;
        assert_eq!(
            store.dispatch(Event::QuizAnswer(answer + 1)),
            vec![Haptic::Wrong]
        );

        store.settings.haptics = false;
        store.dispatch(Event::NextProblem);
        let answer = store.quiz.as_ref().unwrap().problems[1].answer;
        assert!(store.dispatch(Event::QuizAnswer(answer + 1)).is_empty());
    }

    #[test]
    fn test_tracing_restart_from_result() {
        let mut store = Store::with_seed(5);
        store.dispatch(Event::StartTracing(Some(ShapeKind::Square)));
        let start = store.tracing.as_ref().unwrap().start_point().unwrap();
        store.dispatch(Event::BeginStroke(start));
        for _ in 0..3 {
            store.dispatch(Event::TracePoint(Vec2::ZERO));
        }
        assert_eq!(store.screen, Screen::Result(Game::Tracing));
        assert!(store.tracing.as_ref().unwrap().failed);

        store.dispatch(Event::RestartTracing);
        assert_eq!(store.screen, Screen::Playing(Game::Tracing));
        let state = store.tracing.as_ref().unwrap();
        assert_eq!(state.shape, ShapeKind::Square);
        assert_eq!(state.lives, 3);
        assert!(!state.failed);
    }

    #[test]
    fn test_settings_drive_new_games() {
        let settings = Settings {
            bridge_rows: 8,
            rope_problems: 5,
            reaction_duration: 12,
            seed: Some(6),
            ..Settings::default()
        };
        let mut store = Store::new(settings, Stats::new("2026-01-01"));
        store.dispatch(Event::StartBridge);
        assert_eq!(store.bridge.as_ref().unwrap().total_rows, 8);
        store.dispatch(Event::StartRope);
        assert_eq!(store.rope.as_ref().unwrap().problems.len(), 5);
        store.dispatch(Event::StartReaction);
        assert_eq!(store.reaction.as_ref().unwrap().time_left, 12);
    }
}
