//! Game settings and tuning
//!
//! Persisted as JSON next to the leaderboard. Every field has a default so a
//! partial file only overrides what it names.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::StorageError;

/// Timing, scoring-window and storage configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Round timing ===
    /// Length of every round (ms)
    pub round_time_ms: u64,
    /// Simulation step (ms)
    pub tick_ms: u64,

    // === Scoring windows ===
    /// Minimum gap between scoring events (ms)
    pub cool_down_ms: u64,
    /// Extra gap after a bad tag (ms)
    pub immunity_ms: u64,
    /// How long a bad tag freezes the player (ms)
    pub paralyze_ms: u64,

    // === Figures ===
    /// Distance covered by one movement command
    pub player_step: i32,
    /// Upper bound on random warm-up moves at round setup
    pub warmup_moves_max: u32,
    /// Fixed RNG seed for reproducible runs (random when absent)
    pub seed: Option<u64>,

    // === Storage / audio ===
    /// Leaderboard file
    pub ledger_path: PathBuf,
    /// Start each game with sound cues muted
    pub start_muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            round_time_ms: ROUND_TIME_MS,
            tick_ms: TICK_MS,

            cool_down_ms: COOL_DOWN_MS,
            immunity_ms: IMMUNITY_MS,
            paralyze_ms: PARALYZE_MS,

            player_step: PLAYER_MOVE_DISTANCE,
            warmup_moves_max: WARMUP_MOVES_MAX,
            seed: None,

            ledger_path: PathBuf::from("HighScores.txt"),
            start_muted: false,
        }
    }
}

impl Settings {
    /// Load settings, falling back to defaults when the file is missing or invalid
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) if e.is_not_found() => {
                log::info!("No settings at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring settings: {}", e);
                Self::default()
            }
        }
    }

    pub fn try_load(path: &Path) -> Result<Self, StorageError> {
        let json = fs::read_to_string(path).map_err(|e| StorageError::io(path, e))?;
        let settings: Self =
            serde_json::from_str(&json).map_err(|e| StorageError::json(path, e))?;
        Ok(settings.sanitized())
    }

    pub fn save(&self, path: &Path) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(self).map_err(|e| StorageError::json(path, e))?;
        fs::write(path, json).map_err(|e| StorageError::io(path, e))?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Clamp values the simulation cannot run with
    fn sanitized(mut self) -> Self {
        self.tick_ms = self.tick_ms.max(1);
        self.player_step = self.player_step.max(1);
        self
    }
}
