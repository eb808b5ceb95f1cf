//! Round clock and score bookkeeping

use serde::{Deserialize, Serialize};

use super::figures::EnemyVariant;
use crate::consts::*;

/// Millisecond countdown that only runs while started
///
/// Stopping it freezes the remaining time exactly, so a paused round resumes
/// with the true amount of play time left.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundClock {
    remaining_ms: i64,
    running: bool,
}

impl RoundClock {
    pub fn new(duration_ms: u64) -> Self {
        Self {
            remaining_ms: duration_ms as i64,
            running: false,
        }
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Count down by `elapsed_ms` if running
    pub fn advance(&mut self, elapsed_ms: u64) {
        if self.running {
            self.remaining_ms -= elapsed_ms as i64;
        }
    }

    pub fn remaining_ms(&self) -> i64 {
        self.remaining_ms
    }

    /// Whole seconds left, never below zero
    pub fn remaining_secs(&self) -> u32 {
        (self.remaining_ms.max(0) / 1000) as u32
    }

    /// True once the remaining time has gone negative
    pub fn is_expired(&self) -> bool {
        self.remaining_ms < 0
    }

    /// Force the clock past zero (cheat: end round now)
    pub fn expire(&mut self) {
        self.remaining_ms = self.remaining_ms.min(-1);
    }
}

/// Per-round scores, clock and scoring cooldown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundState {
    /// 1-based round number
    pub round_id: u32,
    pub round_score: i32,
    /// Score over the whole game (carried into the next round)
    pub total_score: i32,
    pub clock: RoundClock,
    /// Scoring is blocked until `cool_down_ms` after this instant (may lie in the future)
    cooldown_deadline: i64,
}

impl RoundState {
    /// Fresh round; `total_score` is carried from the previous round
    pub fn new(round_id: u32, total_score: i32, duration_ms: u64) -> Self {
        debug_assert!((1..=NUM_ROUNDS).contains(&round_id));
        Self {
            round_id,
            round_score: 0,
            total_score,
            clock: RoundClock::new(duration_ms),
            cooldown_deadline: 0,
        }
    }

    /// Start the countdown with an initial grace period before anything can score
    pub fn start(&mut self, now_ms: u64, grace_ms: u64) {
        self.reset_cooldown(now_ms, grace_ms);
        self.clock.start();
    }

    pub fn threshold(&self) -> Option<i32> {
        score_threshold(self.round_id)
    }

    pub fn is_last_round(&self) -> bool {
        self.round_id == NUM_ROUNDS
    }

    pub fn is_round_over(&self) -> bool {
        self.clock.is_expired()
    }

    /// Round score met the threshold (never true on the last round)
    pub fn passed_level(&self) -> bool {
        !self.is_last_round() && self.threshold().is_some_and(|t| self.round_score >= t)
    }

    pub fn cooldown_elapsed(&self, now_ms: u64, cool_down_ms: u64) -> bool {
        now_ms as i64 - self.cooldown_deadline > cool_down_ms as i64
    }

    /// Restart the cooldown at `now_ms`, pushed back by `extra_ms`
    pub fn reset_cooldown(&mut self, now_ms: u64, extra_ms: u64) {
        self.cooldown_deadline = now_ms as i64 + extra_ms as i64;
    }

    pub fn cooldown_deadline(&self) -> i64 {
        self.cooldown_deadline
    }

    fn add_points(&mut self, points: i32) {
        self.round_score += points;
        self.total_score += points;
    }

    /// Apply an enemy tag and return the score change
    pub fn score_enemy(&mut self, zone_multiplier: i32, variant: EnemyVariant) -> i32 {
        let delta = ENEMY_SCORE * variant.score_multiplier() * zone_multiplier;
        self.add_points(delta);
        delta
    }

    pub fn score_scoreboard(&mut self) -> i32 {
        self.add_points(SCOREBOARD_SCORE);
        SCOREBOARD_SCORE
    }

    pub fn add_cheat_points(&mut self) {
        self.add_points(CHEAT_POINTS);
    }

    pub fn subtract_cheat_points(&mut self) {
        self.add_points(-CHEAT_POINTS);
    }
}

/// Minimum round score needed to advance past `round_id` (None for the last round)
pub fn score_threshold(round_id: u32) -> Option<i32> {
    let index = round_id.checked_sub(1)? as usize;
    ROUND_SCORE_THRESHOLDS.get(index).copied().flatten()
}
