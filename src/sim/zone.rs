//! The 3x3 zone grid underneath the action
//!
//! Zones decide whether a tag is worth points or costs points. From round 2
//! on they drift, and all nine share one motion state so they always turn in
//! lockstep.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::figures::{Figure, FigureKind, ZONE_PRIORITY};
use super::geometry::Rect;
use crate::consts::*;

/// Drift axis shared by every zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    fn flipped(self) -> Self {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }
}

/// One grid cell
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zone {
    pub rect: Rect,
    /// Tagging an enemy centered here scores (otherwise it costs)
    pub favorable: bool,
    pub vel: IVec2,
}

impl Zone {
    /// Zone `index` (row-major) in its starting cell
    ///
    /// Even indices are favorable; the middle column starts drifting up and
    /// the middle row starts drifting left.
    pub fn new(index: usize) -> Self {
        let col = (index % 3) as i32;
        let row = (index / 3) as i32;
        let vel = IVec2::new(
            if row == 1 { -1 } else { 1 },
            if col == 1 { -1 } else { 1 },
        );
        Self {
            rect: Rect::new(col * ZONE_SIZE, row * ZONE_SIZE, ZONE_SIZE, ZONE_SIZE),
            favorable: index % 2 == 0,
            vel,
        }
    }

    fn drift(&mut self, axis: Axis) {
        match axis {
            Axis::X => self.rect.pos.x = wrap_zone(self.rect.pos.x + self.vel.x),
            Axis::Y => self.rect.pos.y = wrap_zone(self.rect.pos.y + self.vel.y),
        }
    }

    /// +1 for a favorable zone containing `p`, -1 for an unfavorable one, else 0
    pub fn multiplier_at(&self, p: IVec2) -> i32 {
        match (self.rect.contains_point_strict(p), self.favorable) {
            (false, _) => 0,
            (true, true) => 1,
            (true, false) => -1,
        }
    }
}

impl Figure for Zone {
    fn bounds(&self) -> Rect {
        self.rect
    }

    fn kind(&self) -> FigureKind {
        FigureKind::Zone {
            favorable: self.favorable,
        }
    }

    fn priority(&self) -> i32 {
        ZONE_PRIORITY
    }
}

/// Send a zone that slid fully off one edge to the opposite edge
fn wrap_zone(pos: i32) -> i32 {
    if pos >= ARENA_SIZE {
        -ZONE_SIZE
    } else if pos <= -ZONE_SIZE {
        ARENA_SIZE
    } else {
        pos
    }
}

/// Round-dependent motion pattern shared by all zones
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneMotion {
    round: u32,
    axis: Axis,
    counter: u32,
    /// Round 5 only: flip interval is `ZONE_MOVEMENT_LENGTH / divisor`
    divisor: u32,
}

impl ZoneMotion {
    pub fn new(round: u32) -> Self {
        Self {
            round,
            axis: Axis::Y,
            counter: 0,
            divisor: 1,
        }
    }

    /// Axis zones drift along this tick, if any
    pub fn active_axis(&self) -> Option<Axis> {
        match self.round {
            1 => None,
            2 => Some(Axis::X),
            3 => Some(Axis::Y),
            _ => Some(self.axis),
        }
    }

    /// Ticks until the next flip counts from zero again after this many ticks
    pub fn flip_interval(&self) -> u32 {
        match self.round {
            5 => (ZONE_MOVEMENT_LENGTH / self.divisor).max(1),
            _ => ZONE_MOVEMENT_LENGTH,
        }
    }

    /// Advance the shared counter; true when the axis flipped this tick
    pub fn step(&mut self) -> bool {
        if self.round < 4 {
            return false;
        }
        self.counter += 1;
        if self.counter < self.flip_interval() {
            return false;
        }
        self.counter = 0;
        if self.round == 5 {
            self.divisor += 1;
        }
        self.axis = self.axis.flipped();
        true
    }

    /// Whether a flip also reverses vertical drift
    pub fn flips_reverse_y(&self) -> bool {
        self.round == 7
    }
}

/// The nine zones of one round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneGrid {
    zones: Vec<Zone>,
    motion: ZoneMotion,
}

impl ZoneGrid {
    pub fn new(round: u32) -> Self {
        Self {
            zones: (0..NUM_ZONES).map(Zone::new).collect(),
            motion: ZoneMotion::new(round),
        }
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn motion(&self) -> &ZoneMotion {
        &self.motion
    }

    /// Move every zone one step, then update the shared toggle
    pub fn advance(&mut self) {
        if let Some(axis) = self.motion.active_axis() {
            for zone in &mut self.zones {
                zone.drift(axis);
            }
        }
        if self.motion.step() && self.motion.flips_reverse_y() {
            for zone in &mut self.zones {
                zone.vel.y = -zone.vel.y;
            }
        }
    }

    /// Net zone multiplier for a point (additive over every containing zone)
    pub fn multiplier_at(&self, p: IVec2) -> i32 {
        self.zones.iter().map(|z| z.multiplier_at(p)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_pattern() {
        let grid = ZoneGrid::new(1);
        let favorable: Vec<bool> = grid.zones().iter().map(|z| z.favorable).collect();
        assert_eq!(
            favorable,
            vec![true, false, true, false, true, false, true, false, true]
        );
        let vels: Vec<(i32, i32)> = grid.zones().iter().map(|z| (z.vel.x, z.vel.y)).collect();
        assert_eq!(
            vels,
            vec![(1, 1), (1, -1), (1, 1), (-1, 1), (-1, -1), (-1, 1), (1, 1), (1, -1), (1, 1)]
        );
        assert_eq!(grid.zones()[5].rect, Rect::new(544, 272, 272, 272));
    }

    #[test]
    fn test_round_one_is_stationary() {
        let mut grid = ZoneGrid::new(1);
        let before: Vec<Rect> = grid.zones().iter().map(|z| z.rect).collect();
        for _ in 0..500 {
            grid.advance();
        }
        let after: Vec<Rect> = grid.zones().iter().map(|z| z.rect).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_round_two_drifts_and_wraps_on_x() {
        let mut grid = ZoneGrid::new(2);
        grid.advance();
        assert_eq!(grid.zones()[0].rect.pos, IVec2::new(1, 0));
        assert_eq!(grid.zones()[3].rect.pos, IVec2::new(-1, 272));

        // Zone 2 starts at x=544 moving right: reaches 816 after 272 ticks
        for _ in 1..272 {
            grid.advance();
        }
        assert_eq!(grid.zones()[2].rect.pos.x, -ZONE_SIZE);
        // Zone 3 starts at 0 moving left: reaches -272 at the same tick
        assert_eq!(grid.zones()[3].rect.pos.x, ARENA_SIZE);
    }

    #[test]
    fn test_round_three_drifts_on_y() {
        let mut grid = ZoneGrid::new(3);
        grid.advance();
        assert_eq!(grid.zones()[0].rect.pos, IVec2::new(0, 1));
        assert_eq!(grid.zones()[1].rect.pos, IVec2::new(272, -1));
    }

    #[test]
    fn test_round_four_toggles_axis_in_lockstep() {
        let mut grid = ZoneGrid::new(4);
        assert_eq!(grid.motion().active_axis(), Some(Axis::Y));
        for _ in 0..ZONE_MOVEMENT_LENGTH - 1 {
            grid.advance();
        }
        assert_eq!(grid.motion().active_axis(), Some(Axis::Y));
        grid.advance();
        assert_eq!(grid.motion().active_axis(), Some(Axis::X));
        // Every zone moved the same distance along Y
        assert_eq!(grid.zones()[0].rect.pos, IVec2::new(0, ZONE_MOVEMENT_LENGTH as i32));
    }

    #[test]
    fn test_round_five_flips_accelerate() {
        let mut motion = ZoneMotion::new(5);
        let mut flips = Vec::new();
        for tick in 1..=400u32 {
            if motion.step() {
                flips.push(tick);
            }
        }
        assert_eq!(&flips[..3], &[136, 136 + 68, 136 + 68 + 45]);
        let gaps: Vec<u32> = flips.windows(2).map(|w| w[1] - w[0]).collect();
        assert!(gaps.windows(2).all(|g| g[1] <= g[0]));
    }

    #[test]
    fn test_round_seven_flip_reverses_y() {
        let mut grid = ZoneGrid::new(7);
        for _ in 0..ZONE_MOVEMENT_LENGTH {
            grid.advance();
        }
        let vels: Vec<i32> = grid.zones().iter().map(|z| z.vel.y).collect();
        assert_eq!(vels, vec![-1, 1, -1, -1, 1, -1, -1, 1, -1]);

        let mut grid = ZoneGrid::new(6);
        for _ in 0..ZONE_MOVEMENT_LENGTH {
            grid.advance();
        }
        assert_eq!(grid.zones()[0].vel.y, 1);
    }

    #[test]
    fn test_overlapping_zones_add_up() {
        // Round 4: 136 ticks on Y then 136 on X puts zones 0 and 4 on the same cell
        let mut grid = ZoneGrid::new(4);
        for _ in 0..2 * ZONE_MOVEMENT_LENGTH {
            grid.advance();
        }
        assert_eq!(grid.zones()[0].rect, grid.zones()[4].rect);
        assert_eq!(grid.zones()[0].rect.pos, IVec2::splat(136));
        assert_eq!(grid.multiplier_at(IVec2::new(200, 200)), 2);

        // Favorable zone 0 under unfavorable zone 1 cancels out
        let mut grid = ZoneGrid::new(1);
        grid.zones[1].rect.pos = IVec2::new(100, 0);
        assert_eq!(grid.multiplier_at(IVec2::new(200, 100)), 0);
        assert_eq!(grid.multiplier_at(IVec2::new(50, 100)), 1);
        assert_eq!(grid.multiplier_at(IVec2::new(300, 100)), -1);
    }

    #[test]
    fn test_multiplier_uses_strict_containment() {
        let grid = ZoneGrid::new(1);
        assert_eq!(grid.multiplier_at(IVec2::new(100, 100)), 1);
        assert_eq!(grid.multiplier_at(IVec2::new(400, 100)), -1);
        // On the shared edge between zones 0 and 1: in neither
        assert_eq!(grid.multiplier_at(IVec2::new(272, 100)), 0);
    }
}
