//! Daily stats
//!
//! Sessions and correct answers count per calendar day. The best quiz score
//! and the set of traced shapes survive the daily reset.

use serde::{Deserialize, Serialize};

use crate::platform;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Stats {
    /// Day these counters belong to (`YYYY-MM-DD`)
    pub date: String,
    /// Quiz sessions finished today
    pub sessions: u32,
    /// Correct quiz answers today
    pub correct: u32,
    /// Best quiz score ever
    pub best: u32,
    /// IDs of shapes traced at least once
    pub completed_shapes: Vec<String>,
}

impl Stats {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "squid_math_stats";

    pub fn new(today: &str) -> Self {
        Self {
            date: today.to_string(),
            ..Self::default()
        }
    }

    /// Start a new day's counters if the date changed.
    /// Returns whether anything was reset.
    pub fn reset_if_new_day(&mut self, today: &str) -> bool {
        if self.date == today {
            return false;
        }
        log::info!("New day {}, resetting daily stats", today);
        self.date = today.to_string();
        self.sessions = 0;
        self.correct = 0;
        true
    }

    pub fn record_answer(&mut self, correct: bool) {
        if correct {
            self.correct += 1;
        }
    }

    /// A quiz session ended with `score` correct answers
    pub fn record_session(&mut self, score: u32) {
        self.sessions += 1;
        self.best = self.best.max(score);
    }

    /// Remember a traced shape. Returns false if it was already known.
    pub fn record_shape(&mut self, shape_id: &str) -> bool {
        if self.completed_shapes.iter().any(|s| s == shape_id) {
            return false;
        }
        self.completed_shapes.push(shape_id.to_string());
        true
    }

    pub fn has_completed(&self, shape_id: &str) -> bool {
        self.completed_shapes.iter().any(|s| s == shape_id)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Load stats from storage and roll them over to `today`
    pub fn load(today: &str) -> Self {
        let mut stats = match platform::storage_get(Self::STORAGE_KEY) {
            Some(json) => match Self::from_json(&json) {
                Ok(stats) => {
                    log::info!("Loaded stats for {}", stats.date);
                    stats
                }
                Err(e) => {
                    log::warn!("Ignoring stored stats: {}", e);
                    Self::new(today)
                }
            },
            None => {
                log::info!("No stats found, starting fresh");
                Self::new(today)
            }
        };
        stats.reset_if_new_day(today);
        stats
    }

    /// Save stats to storage
    pub fn save(&self) {
        if let Ok(json) = self.to_json()
            && platform::storage_set(Self::STORAGE_KEY, &json)
        {
            log::debug!("Stats saved ({} sessions today)", self.sessions);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_day_keeps_best_and_shapes() {
        let mut stats = Stats::new("2026-01-01");
        stats.record_answer(true);
        stats.record_answer(false);
        stats.record_session(7);
        stats.record_shape("circle");
        assert_eq!((stats.sessions, stats.correct, stats.best), (1, 1, 7));

        assert!(!stats.reset_if_new_day("2026-01-01"));
        assert!(stats.reset_if_new_day("2026-01-02"));
        assert_eq!(stats.date, "2026-01-02");
        assert_eq!((stats.sessions, stats.correct, stats.best), (0, 0, 7));
        assert!(stats.has_completed("circle"));
    }

    #[test]
    fn test_best_only_increases() {
        let mut stats = Stats::new("2026-01-01");
        stats.record_session(9);
        stats.record_session(4);
        assert_eq!(stats.best, 9);
        assert_eq!(stats.sessions, 2);
    }

    #[test]
    fn test_shapes_deduplicated() {
        let mut stats = Stats::new("2026-01-01");
        assert!(stats.record_shape("star5"));
        assert!(!stats.record_shape("star5"));
        assert_eq!(stats.completed_shapes, vec!["star5".to_string()]);
    }

    #[test]
    fn test_json_roundtrip_and_missing_fields() {
        let stats = Stats::from_json(r#"{"date":"2026-03-04","best":6}"#).unwrap();
        assert_eq!(stats.best, 6);
        assert_eq!(stats.sessions, 0);
        assert!(stats.completed_shapes.is_empty());

        let back = Stats::from_json(&stats.to_json().unwrap()).unwrap();
        assert_eq!(back, stats);
    }

    #[test]
    fn test_load_without_storage_starts_fresh() {
        let stats = Stats::load("2026-05-06");
        assert_eq!(stats, Stats::new("2026-05-06"));
    }
}
