//! Templar Hunt - A zone-scoring arena tag game
//!
//! Core modules:
//! - `sim`: Per-tick simulation (figures, zones, collisions, round clock)
//! - `game`: Session state machine driving rounds from abstract commands
//! - `highscores`: Five-slot leaderboard with plain-text storage
//! - `settings`: Data-driven timing and storage configuration
//! - `autopilot`: Demo player used by the headless runner

pub mod autopilot;
pub mod error;
pub mod game;
pub mod highscores;
pub mod settings;
pub mod sim;

pub use error::StorageError;
pub use game::{Command, ConfirmPrompt, Game, GamePhase, Hud, TitleView};
pub use highscores::{HighScoreEntry, Ledger};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Square arena edge length (pixels)
    pub const ARENA_SIZE: i32 = 816;
    /// Number of rounds in a full game
    pub const NUM_ROUNDS: u32 = 7;

    /// Fixed simulation timestep (ms)
    pub const TICK_MS: u64 = 20;
    /// Maximum substeps per `advance` call to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Zone grid: 3x3 cells covering the arena
    pub const ZONES_PER_SIDE: i32 = 3;
    pub const NUM_ZONES: usize = 9;
    pub const ZONE_SIZE: i32 = ARENA_SIZE / ZONES_PER_SIDE;
    /// Ticks between zone axis flips (rounds 4+)
    pub const ZONE_MOVEMENT_LENGTH: u32 = (ZONE_SIZE / 2) as u32;

    /// Player defaults
    pub const PLAYER_SIZE: i32 = 80;
    pub const PLAYER_MOVE_DISTANCE: i32 = 50;
    pub const PARALYZE_MS: u64 = 1000;

    /// Enemy defaults
    pub const ENEMY_SIZE: i32 = 100;
    /// Elite enemies flip a velocity component with odds 1 in this, per axis
    pub const ELITE_REVERSE_ODDS: u32 = 150;
    /// Ordinary enemies per round (index = round - 1)
    pub const ENEMIES_IN_ROUND: [usize; NUM_ROUNDS as usize] = [3, 3, 4, 4, 5, 6, 6];
    /// Elite enemies per round (index = round - 1)
    pub const ELITES_IN_ROUND: [usize; NUM_ROUNDS as usize] = [0, 0, 0, 1, 1, 1, 2];
    /// Upper bound (exclusive) on warm-up moves applied before a round starts
    pub const WARMUP_MOVES_MAX: u32 = 100_000;

    /// Scoreboard figure
    pub const SCOREBOARD_WIDTH: i32 = 140;
    pub const SCOREBOARD_HEIGHT: i32 = 96;

    /// Scoring
    pub const ENEMY_SCORE: i32 = 20;
    pub const ELITE_MULTIPLIER: i32 = 2;
    pub const SCOREBOARD_SCORE: i32 = 1;
    pub const CHEAT_POINTS: i32 = 10;
    /// Minimum round score to advance; the last round has no threshold
    pub const ROUND_SCORE_THRESHOLDS: [Option<i32>; NUM_ROUNDS as usize] = [
        Some(200),
        Some(200),
        Some(250),
        Some(300),
        Some(350),
        Some(400),
        None,
    ];

    /// Round timing (ms)
    pub const ROUND_TIME_MS: u64 = 60_000;
    pub const COOL_DOWN_MS: u64 = 700;
    pub const IMMUNITY_MS: u64 = 1500;

    /// Leaderboard
    pub const NUM_HIGH_SCORES: usize = 5;
    pub const MAX_NAME_LENGTH: usize = 15;
}
