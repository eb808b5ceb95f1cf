//! Templar Hunt - headless runner
//!
//! Plays one unattended game with the autopilot and prints every game event
//! as a JSON line.

use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use templar_hunt::autopilot::{DECISION_INTERVAL_MS, autopilot_command};
use templar_hunt::{Game, Settings};

const DEFAULT_SETTINGS_PATH: &str = "settings.json";

#[derive(Parser, Debug)]
#[command(name = "templar-hunt")]
#[command(about = "Play one unattended Templar Hunt game and print its events as JSON lines")]
struct Cli {
    /// Settings file (missing or unreadable files fall back to defaults)
    #[arg(default_value = DEFAULT_SETTINGS_PATH)]
    settings: PathBuf,

    /// Pace the loop against the wall clock instead of running flat out
    #[arg(long)]
    realtime: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    log::info!("Templar Hunt (headless) starting...");
    let settings = Settings::load(&cli.settings);
    let step_ms = settings.tick_ms;
    let mut game = Game::new(settings);

    let mut since_decision = DECISION_INTERVAL_MS;
    let mut last_frame = Instant::now();
    while game.is_running() {
        if since_decision >= DECISION_INTERVAL_MS {
            if let Some(command) = autopilot_command(&game) {
                log::debug!("Autopilot: {:?}", command);
                game.handle(command);
            }
            since_decision = 0;
        }

        let elapsed_ms = if cli.realtime {
            thread::sleep(Duration::from_millis(step_ms));
            let now = Instant::now();
            let dt = now.duration_since(last_frame).as_millis() as u64;
            last_frame = now;
            dt
        } else {
            step_ms
        };
        game.advance(elapsed_ms);
        since_decision += elapsed_ms;

        for event in game.drain_events() {
            match serde_json::to_string(&event) {
                Ok(line) => println!("{}", line),
                Err(e) => log::warn!("Could not encode event {:?}: {}", event, e),
            }
        }
    }

    let hud = game.hud();
    log::info!(
        "Finished after round {} with {} points",
        hud.round,
        hud.total_score
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["templar-hunt"]);
        assert_eq!(cli.settings, PathBuf::from(DEFAULT_SETTINGS_PATH));
        assert!(!cli.realtime);
    }

    #[test]
    fn test_cli_settings_and_realtime() {
        let cli = Cli::parse_from(["templar-hunt", "--realtime", "custom.json"]);
        assert_eq!(cli.settings, PathBuf::from("custom.json"));
        assert!(cli.realtime);
    }

    #[test]
    fn test_cli_rejects_unknown_flag() {
        assert!(Cli::try_parse_from(["templar-hunt", "--fast"]).is_err());
    }
}
