//! Deterministic simulation module
//!
//! All per-tick gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (zones, enemies, scoreboard)
//! - No rendering or platform dependencies

pub mod collision;
pub mod figures;
pub mod geometry;
pub mod round;
pub mod state;
pub mod tick;
pub mod zone;

pub use collision::resolve_collisions;
pub use figures::{Enemy, EnemyVariant, Figure, FigureKind, FigureSnapshot, Player, Scoreboard};
pub use geometry::Rect;
pub use round::{RoundClock, RoundState, score_threshold};
pub use state::{GameEvent, GamePhase, RoundFigures, SoundCue};
pub use tick::{FixedStep, tick};
pub use zone::{Axis, Zone, ZoneGrid, ZoneMotion};
