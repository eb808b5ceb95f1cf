//! Arena figures: the player, enemies and the bouncing scoreboard
//!
//! Collision logic only ever looks at [`Figure::bounds`]; everything else on
//! the trait exists for the presentation layer.

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geometry::{Rect, overlaps};
use crate::consts::*;

/// Draw order, lowest first
pub const ZONE_PRIORITY: i32 = 0;
pub const ENEMY_PRIORITY: i32 = 1;
pub const SCOREBOARD_PRIORITY: i32 = 2;
pub const PLAYER_PRIORITY: i32 = 3;

/// Enemy variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyVariant {
    Ordinary,
    /// Worth double and changes direction at random
    Elite,
}

impl EnemyVariant {
    /// Score multiplier applied on top of the zone multiplier
    pub fn score_multiplier(self) -> i32 {
        match self {
            EnemyVariant::Ordinary => 1,
            EnemyVariant::Elite => ELITE_MULTIPLIER,
        }
    }
}

/// What a figure is, for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FigureKind {
    Player,
    Enemy { variant: EnemyVariant },
    Zone { favorable: bool },
    Scoreboard,
}

/// Render-state snapshot of one figure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FigureSnapshot {
    pub kind: FigureKind,
    pub bounds: Rect,
    pub priority: i32,
    pub visible: bool,
}

/// Anything placed in the arena
pub trait Figure {
    fn bounds(&self) -> Rect;
    fn kind(&self) -> FigureKind;
    fn priority(&self) -> i32;

    fn visible(&self) -> bool {
        true
    }

    fn collided_with(&self, other: &dyn Figure) -> bool {
        overlaps(&self.bounds(), &other.bounds())
    }

    fn snapshot(&self) -> FigureSnapshot {
        FigureSnapshot {
            kind: self.kind(),
            bounds: self.bounds(),
            priority: self.priority(),
            visible: self.visible(),
        }
    }
}

/// Wrap one axis so the figure's center stays within `[0, ARENA_SIZE]`
fn wrap_axis(pos: i32, size: i32) -> i32 {
    let half = size / 2;
    let center = pos + half;
    if (0..=ARENA_SIZE).contains(&center) {
        pos
    } else {
        center.rem_euclid(ARENA_SIZE) - half
    }
}

/// The player's figure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub rect: Rect,
    paralyzed: bool,
    paralyzed_at: u64,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    /// New player at the arena center
    pub fn new() -> Self {
        let start = ARENA_SIZE / 2 - PLAYER_SIZE / 2;
        Self {
            rect: Rect::new(start, start, PLAYER_SIZE, PLAYER_SIZE),
            paralyzed: false,
            paralyzed_at: 0,
        }
    }

    /// Move by `delta`, wrapping each axis to the opposite edge
    pub fn move_by(&mut self, delta: IVec2) {
        let pos = self.rect.pos + delta;
        self.rect.pos = IVec2::new(
            wrap_axis(pos.x, self.rect.size.x),
            wrap_axis(pos.y, self.rect.size.y),
        );
    }

    /// Freeze the player starting at `now_ms`
    pub fn paralyze(&mut self, now_ms: u64) {
        self.paralyzed = true;
        self.paralyzed_at = now_ms;
    }

    /// Whether input is still locked out; clears itself once `duration_ms` has passed
    pub fn is_paralyzed(&mut self, now_ms: u64, duration_ms: u64) -> bool {
        if self.paralyzed && now_ms.saturating_sub(self.paralyzed_at) > duration_ms {
            self.paralyzed = false;
        }
        self.paralyzed
    }
}

impl Figure for Player {
    fn bounds(&self) -> Rect {
        self.rect
    }

    fn kind(&self) -> FigureKind {
        FigureKind::Player
    }

    fn priority(&self) -> i32 {
        PLAYER_PRIORITY
    }
}

/// Constant-velocity body that bounces off the arena walls
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bouncer {
    pub rect: Rect,
    pub vel: IVec2,
}

impl Bouncer {
    /// Random start inside the arena, moving down-right
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, w: i32, h: i32) -> Self {
        Self {
            rect: Rect::new(
                rng.random_range(0..ARENA_SIZE),
                rng.random_range(0..ARENA_SIZE),
                w,
                h,
            ),
            vel: IVec2::ONE,
        }
    }

    pub fn translate(&mut self) {
        self.rect.pos += self.vel;
    }

    /// Reflect each velocity component whose leading edge reached a wall
    pub fn bounce(&mut self) {
        let r = self.rect;
        if (self.vel.x < 0 && r.pos.x <= 0) || (self.vel.x > 0 && r.right() >= ARENA_SIZE) {
            self.vel.x = -self.vel.x;
        }
        if (self.vel.y < 0 && r.pos.y <= 0) || (self.vel.y > 0 && r.bottom() >= ARENA_SIZE) {
            self.vel.y = -self.vel.y;
        }
    }

    pub fn step(&mut self) {
        self.translate();
        self.bounce();
    }
}

/// An enemy figure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub body: Bouncer,
    pub variant: EnemyVariant,
    tagged: bool,
}

impl Enemy {
    pub fn spawn<R: Rng + ?Sized>(variant: EnemyVariant, rng: &mut R) -> Self {
        Self {
            body: Bouncer::spawn(rng, ENEMY_SIZE, ENEMY_SIZE),
            variant,
            tagged: false,
        }
    }

    /// One tick of movement; elites may reverse on either axis first
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.body.translate();
        if self.variant == EnemyVariant::Elite {
            if rng.random_ratio(1, ELITE_REVERSE_ODDS) {
                self.body.vel.x = -self.body.vel.x;
            }
            if rng.random_ratio(1, ELITE_REVERSE_ODDS) {
                self.body.vel.y = -self.body.vel.y;
            }
        }
        self.body.bounce();
    }

    pub fn is_elite(&self) -> bool {
        self.variant == EnemyVariant::Elite
    }

    pub fn is_tagged(&self) -> bool {
        self.tagged
    }

    pub fn tag(&mut self) {
        self.tagged = true;
    }

    pub fn untag(&mut self) {
        self.tagged = false;
    }

    pub fn center(&self) -> IVec2 {
        self.body.rect.center()
    }
}

impl Figure for Enemy {
    fn bounds(&self) -> Rect {
        self.body.rect
    }

    fn kind(&self) -> FigureKind {
        FigureKind::Enemy {
            variant: self.variant,
        }
    }

    fn priority(&self) -> i32 {
        ENEMY_PRIORITY
    }

    fn visible(&self) -> bool {
        !self.tagged
    }
}

/// The moving scoreboard; bumping into it is worth a point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scoreboard {
    pub body: Bouncer,
}

impl Scoreboard {
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            body: Bouncer::spawn(rng, SCOREBOARD_WIDTH, SCOREBOARD_HEIGHT),
        }
    }

    pub fn advance(&mut self) {
        self.body.step();
    }
}

impl Figure for Scoreboard {
    fn bounds(&self) -> Rect {
        self.body.rect
    }

    fn kind(&self) -> FigureKind {
        FigureKind::Scoreboard
    }

    fn priority(&self) -> i32 {
        SCOREBOARD_PRIORITY
    }
}
