//! Per-round figure collection and the events the simulation emits

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::figures::{Enemy, EnemyVariant, Figure, FigureSnapshot, Player, Scoreboard};
use super::zone::ZoneGrid;
use crate::consts::*;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen and its sub-views
    Title,
    /// Active round
    InRound,
    /// Round suspended, clock stopped
    Paused,
    /// Post-round summary
    BetweenRounds,
    /// Game over, high score entry
    Ended,
    /// Process is shutting down
    Quitting,
}

/// Sound the presentation layer should play (only emitted while unmuted)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    GoodTag,
    BadTag,
    WinRound,
    LoseRound,
}

/// Things that happened, drained by the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PhaseChanged {
        from: GamePhase,
        to: GamePhase,
    },
    RoundStarted {
        round: u32,
    },
    EnemyTagged {
        index: usize,
        zone_multiplier: i32,
        points: i32,
    },
    ScoreboardBumped {
        points: i32,
    },
    PlayerParalyzed,
    TagsReset,
    RoundEnded {
        round: u32,
        round_score: i32,
        total_score: i32,
        passed: bool,
    },
    HighScoreRecorded {
        rank: usize,
        score: i32,
    },
    LedgerSaveFailed {
        reason: String,
    },
    Sound(SoundCue),
}

/// Every figure of one round; rebuilt at each round setup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundFigures {
    pub player: Player,
    pub scoreboard: Scoreboard,
    pub enemies: Vec<Enemy>,
    pub zones: ZoneGrid,
}

impl RoundFigures {
    /// Populate round `round_id` and scramble the bouncing figures
    pub fn new<R: Rng + ?Sized>(round_id: u32, rng: &mut R, warmup_moves_max: u32) -> Self {
        let index = (round_id.clamp(1, NUM_ROUNDS) - 1) as usize;
        let mut figures = Self {
            player: Player::new(),
            scoreboard: Scoreboard::spawn(rng),
            enemies: Vec::with_capacity(ENEMIES_IN_ROUND[index] + ELITES_IN_ROUND[index]),
            zones: ZoneGrid::new(round_id),
        };
        for _ in 0..ENEMIES_IN_ROUND[index] {
            figures.enemies.push(Enemy::spawn(EnemyVariant::Ordinary, rng));
        }
        for _ in 0..ELITES_IN_ROUND[index] {
            figures.enemies.push(Enemy::spawn(EnemyVariant::Elite, rng));
        }
        figures.warm_up(rng, warmup_moves_max);
        figures
    }

    /// Apply a random number of moves to the scoreboard and each enemy so
    /// their bounce phases look unrelated when play begins
    fn warm_up<R: Rng + ?Sized>(&mut self, rng: &mut R, max_moves: u32) {
        if max_moves == 0 {
            return;
        }
        for _ in 0..rng.random_range(0..max_moves) {
            self.scoreboard.advance();
        }
        for enemy in &mut self.enemies {
            for _ in 0..rng.random_range(0..max_moves) {
                enemy.advance(rng);
            }
        }
    }

    /// Move every autonomous figure one tick (the player only moves on command)
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for enemy in &mut self.enemies {
            enemy.advance(rng);
        }
        self.zones.advance();
        self.scoreboard.advance();
    }

    pub fn tagged_count(&self) -> usize {
        self.enemies.iter().filter(|e| e.is_tagged()).count()
    }

    pub fn all_tagged(&self) -> bool {
        self.enemies.iter().all(Enemy::is_tagged)
    }

    pub fn untag_all(&mut self) {
        for enemy in &mut self.enemies {
            enemy.untag();
        }
    }

    /// Render list, lowest draw priority first
    pub fn snapshots(&self) -> Vec<FigureSnapshot> {
        let mut out: Vec<FigureSnapshot> = self
            .zones
            .zones()
            .iter()
            .map(Figure::snapshot)
            .chain(self.enemies.iter().map(Figure::snapshot))
            .chain(std::iter::once(self.scoreboard.snapshot()))
            .chain(std::iter::once(self.player.snapshot()))
            .collect();
        out.sort_by_key(|s| s.priority);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::figures::FigureKind;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_enemy_counts_per_round() {
        let mut rng = Pcg32::seed_from_u64(11);
        for round in 1..=NUM_ROUNDS {
            let figures = RoundFigures::new(round, &mut rng, 100);
            let elites = figures.enemies.iter().filter(|e| e.is_elite()).count();
            let i = (round - 1) as usize;
            assert_eq!(figures.enemies.len(), ENEMIES_IN_ROUND[i] + ELITES_IN_ROUND[i]);
            assert_eq!(elites, ELITES_IN_ROUND[i]);
            assert_eq!(figures.zones.zones().len(), NUM_ZONES);
            assert_eq!(figures.tagged_count(), 0);
        }
    }

    #[test]
    fn test_snapshots_sorted_and_hide_tagged() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut figures = RoundFigures::new(1, &mut rng, 0);
        figures.enemies[0].tag();

        let snaps = figures.snapshots();
        assert_eq!(snaps.len(), NUM_ZONES + 3 + 2);
        assert!(snaps.windows(2).all(|w| w[0].priority <= w[1].priority));
        assert_eq!(snaps.last().map(|s| s.kind), Some(FigureKind::Player));
        let hidden = snaps.iter().filter(|s| !s.visible).count();
        assert_eq!(hidden, 1);
    }

    #[test]
    fn test_untag_all() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut figures = RoundFigures::new(2, &mut rng, 0);
        for enemy in &mut figures.enemies {
            enemy.tag();
        }
        assert!(figures.all_tagged());
        figures.untag_all();
        assert_eq!(figures.tagged_count(), 0);
    }
}
