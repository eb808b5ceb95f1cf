//! Fixed timestep simulation tick
//!
//! The host reports elapsed wall time; [`FixedStep`] turns it into a whole
//! number of simulation ticks and [`tick`] advances one round by one step.

use rand::Rng;

use super::collision::resolve_collisions;
use super::round::RoundState;
use super::state::{GameEvent, RoundFigures};
use crate::consts::MAX_SUBSTEPS;
use crate::settings::Settings;

/// Accumulator converting elapsed milliseconds into fixed ticks
#[derive(Debug, Clone)]
pub struct FixedStep {
    step_ms: u64,
    accumulator_ms: u64,
    halted: bool,
}

impl FixedStep {
    pub fn new(step_ms: u64) -> Self {
        Self {
            step_ms: step_ms.max(1),
            accumulator_ms: 0,
            halted: false,
        }
    }

    /// Add elapsed time and return how many ticks are due now
    ///
    /// Long stalls are clamped so a single call never runs more than
    /// `MAX_SUBSTEPS` ticks.
    pub fn accumulate(&mut self, elapsed_ms: u64) -> u32 {
        if self.halted {
            return 0;
        }
        let max_backlog = self.step_ms * MAX_SUBSTEPS as u64;
        self.accumulator_ms = (self.accumulator_ms + elapsed_ms).min(max_backlog);

        let mut substeps = 0;
        while self.accumulator_ms >= self.step_ms && substeps < MAX_SUBSTEPS {
            self.accumulator_ms -= self.step_ms;
            substeps += 1;
        }
        substeps
    }

    /// Drop any partial step (e.g. after a resume)
    pub fn reset(&mut self) {
        self.accumulator_ms = 0;
    }

    /// Stop producing ticks for good
    pub fn halt(&mut self) {
        self.halted = true;
        self.accumulator_ms = 0;
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }
}

/// Advance a live round by one step: score overlaps, then move every figure
pub fn tick<R: Rng + ?Sized>(
    figures: &mut RoundFigures,
    round: &mut RoundState,
    now_ms: u64,
    settings: &Settings,
    rng: &mut R,
) -> Vec<GameEvent> {
    let events = resolve_collisions(figures, round, now_ms, settings);
    figures.advance(rng);
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_fixed_step_accumulates() {
        let mut step = FixedStep::new(TICK_MS);
        assert_eq!(step.accumulate(50), 2);
        assert_eq!(step.accumulate(10), 1);
        assert_eq!(step.accumulate(19), 0);
        assert_eq!(step.accumulate(1), 1);
    }

    #[test]
    fn test_fixed_step_clamps_stalls() {
        let mut step = FixedStep::new(TICK_MS);
        assert_eq!(step.accumulate(10_000), MAX_SUBSTEPS);
        assert_eq!(step.accumulate(0), 0);
    }

    #[test]
    fn test_halted_step_never_ticks() {
        let mut step = FixedStep::new(TICK_MS);
        step.accumulate(15);
        step.halt();
        assert!(step.is_halted());
        assert_eq!(step.accumulate(1_000), 0);
    }

    #[test]
    fn test_tick_moves_figures() {
        let mut rng = Pcg32::seed_from_u64(8);
        let mut figures = RoundFigures::new(2, &mut rng, 0);
        let mut round = RoundState::new(2, 0, ROUND_TIME_MS);
        round.start(0, IMMUNITY_MS);
        let zone_before = figures.zones.zones()[0].rect.pos;
        let board_before = figures.scoreboard.body.rect.pos;

        let events = tick(&mut figures, &mut round, 10, &Settings::default(), &mut rng);
        assert!(events.is_empty(), "grace period blocks scoring");
        assert_ne!(figures.zones.zones()[0].rect.pos, zone_before);
        assert_ne!(figures.scoreboard.body.rect.pos, board_before);
    }

    #[test]
    fn test_determinism() {
        let run = |seed: u64| {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut figures = RoundFigures::new(7, &mut rng, 500);
            let mut round = RoundState::new(7, 0, ROUND_TIME_MS);
            round.start(0, 0);
            for i in 0..300 {
                tick(&mut figures, &mut round, i * TICK_MS, &Settings::default(), &mut rng);
            }
            (figures.snapshots(), round.total_score)
        };
        assert_eq!(run(77), run(77));
    }
}
