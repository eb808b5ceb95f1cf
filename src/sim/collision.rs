//! Collision detection and scoring
//!
//! Runs once per tick while a round is live. Nothing scores until the
//! cooldown window has passed; every scoring event restarts it, and a bad tag
//! restarts it with an extra immunity period.

use super::figures::Figure;
use super::round::RoundState;
use super::state::{GameEvent, RoundFigures};
use crate::settings::Settings;

/// Resolve player overlaps for this tick and return what happened
///
/// Each enemy scores at most once: tagging hides it until every enemy has
/// been tagged, at which point the whole pool is released again.
pub fn resolve_collisions(
    figures: &mut RoundFigures,
    round: &mut RoundState,
    now_ms: u64,
    settings: &Settings,
) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if !round.cooldown_elapsed(now_ms, settings.cool_down_ms) {
        return events;
    }

    let player_box = figures.player.bounds();
    for (index, enemy) in figures.enemies.iter_mut().enumerate() {
        if enemy.is_tagged() || !enemy.bounds().overlaps(&player_box) {
            continue;
        }

        enemy.tag();
        let zone_multiplier = figures.zones.multiplier_at(enemy.center());
        let points = round.score_enemy(zone_multiplier, enemy.variant);

        if zone_multiplier < 0 {
            figures.player.paralyze(now_ms);
            round.reset_cooldown(now_ms, settings.immunity_ms);
            events.push(GameEvent::PlayerParalyzed);
        } else {
            round.reset_cooldown(now_ms, 0);
        }

        log::debug!(
            "Tagged enemy {} (multiplier {}, {:+} points)",
            index,
            zone_multiplier,
            points
        );
        events.push(GameEvent::EnemyTagged {
            index,
            zone_multiplier,
            points,
        });
    }

    if figures.player.collided_with(&figures.scoreboard) {
        let points = round.score_scoreboard();
        round.reset_cooldown(now_ms, 0);
        events.push(GameEvent::ScoreboardBumped { points });
    }

    if !figures.enemies.is_empty()
        && figures.all_tagged()
        && round.cooldown_elapsed(now_ms, settings.cool_down_ms)
    {
        figures.untag_all();
        round.reset_cooldown(now_ms, 0);
        events.push(GameEvent::TagsReset);
    }

    events
}
