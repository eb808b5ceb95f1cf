//! Demo player for unattended runs
//!
//! Walks the game through every phase: starts a game, chases enemies that
//! sit in favorable zones, continues between rounds, signs the leaderboard
//! and finally quits.

use glam::IVec2;

use crate::game::{Command, ConfirmPrompt, Game, GamePhase, TitleView};
use crate::sim::figures::Figure;
use crate::sim::state::RoundFigures;

/// How often the runner should ask for a new decision (ms)
pub const DECISION_INTERVAL_MS: u64 = 100;

/// Name signed on the leaderboard
pub const AUTOPILOT_NAME: &str = "Autopilot";

/// Pick the next command, or None to just let time pass
pub fn autopilot_command(game: &Game) -> Option<Command> {
    if game.prompt() == ConfirmPrompt::ArmedForQuit {
        return Some(Command::Confirm);
    }
    match game.phase() {
        GamePhase::Title if game.title_view() != TitleView::None => Some(Command::GoToTitle),
        GamePhase::Title => Some(Command::StartGame),
        GamePhase::InRound => chase(game),
        GamePhase::Paused => Some(Command::Resume),
        GamePhase::BetweenRounds => Some(Command::Confirm),
        GamePhase::Ended if game.is_awaiting_name() => {
            Some(Command::SubmitName(AUTOPILOT_NAME.to_string()))
        }
        GamePhase::Ended => Some(Command::Quit),
        GamePhase::Quitting => None,
    }
}

/// Step toward the nearest untagged enemy whose tag would score
fn chase(game: &Game) -> Option<Command> {
    plan_move(game.figures()?, game.settings().player_step)
}

/// Movement command toward the best target in `figures`, if any
pub fn plan_move(figures: &RoundFigures, step: i32) -> Option<Command> {
    let player = figures.player.bounds().center();
    let target = figures
        .enemies
        .iter()
        .filter(|e| !e.is_tagged() && figures.zones.multiplier_at(e.center()) > 0)
        .map(|e| e.center())
        .min_by_key(|&c| (c - player).length_squared())?;

    step_toward(player, target, step)
}

/// One move along the axis with the larger gap; None once within half a step
fn step_toward(from: IVec2, to: IVec2, step: i32) -> Option<Command> {
    let d = to - from;
    let slack = step / 2;
    if d.x.abs() <= slack && d.y.abs() <= slack {
        return None;
    }
    let command = if d.x.abs() >= d.y.abs() {
        if d.x > 0 {
            Command::MoveRight
        } else {
            Command::MoveLeft
        }
    } else if d.y > 0 {
        Command::MoveDown
    } else {
        Command::MoveUp
    };
    Some(command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::highscores::Ledger;
    use crate::settings::Settings;

    fn seeded_game() -> Game {
        Game::with_ledger(
            Settings {
                seed: Some(3),
                warmup_moves_max: 0,
                ..Settings::default()
            },
            Ledger::new(),
        )
    }

    #[test]
    fn test_step_toward_prefers_larger_gap() {
        let from = IVec2::new(400, 400);
        assert_eq!(step_toward(from, IVec2::new(600, 450), 50), Some(Command::MoveRight));
        assert_eq!(step_toward(from, IVec2::new(380, 100), 50), Some(Command::MoveUp));
        assert_eq!(step_toward(from, IVec2::new(420, 390), 50), None);
    }

    #[test]
    fn test_title_starts_game() {
        let game = seeded_game();
        assert_eq!(autopilot_command(&game), Some(Command::StartGame));
    }

    #[test]
    fn test_ignores_enemies_in_bad_zones() {
        let mut game = seeded_game();
        game.handle(Command::StartGame);
        // Every enemy parked in unfavorable zone 1
        let mut parked = game.figures().expect("round").clone();
        for enemy in &mut parked.enemies {
            enemy.body.rect.pos = IVec2::new(ZONE_SIZE + 80, 80);
        }
        assert!(plan_move(&parked, PLAYER_MOVE_DISTANCE).is_none());

        // One moved into favorable zone 8 becomes the target
        parked.enemies[0].body.rect.pos = IVec2::new(650, 650);
        assert_eq!(plan_move(&parked, PLAYER_MOVE_DISTANCE), Some(Command::MoveRight));
    }

    #[test]
    fn test_full_unattended_game_reaches_quit() {
        let mut game = seeded_game();
        let mut since_decision = DECISION_INTERVAL_MS;
        for _ in 0..200_000 {
            if !game.is_running() {
                break;
            }
            if since_decision >= DECISION_INTERVAL_MS {
                if let Some(command) = autopilot_command(&game) {
                    game.handle(command);
                }
                since_decision = 0;
            }
            game.advance(TICK_MS);
            since_decision += TICK_MS;
        }
        assert_eq!(game.phase(), GamePhase::Quitting);
        assert_eq!(game.ledger().len(), 1);
        assert_eq!(
            game.ledger().entries().next().map(|e| e.name.as_str()),
            Some(AUTOPILOT_NAME)
        );
    }
}
