//! Game session: phases, commands and round lifecycle
//!
//! [`Game`] owns everything that outlives a single tick: the round clock and
//! score, the per-round figures, the leaderboard and the fixed-step
//! scheduler. The host feeds it abstract [`Command`]s and elapsed time, and
//! drains [`GameEvent`]s for presentation.

use glam::IVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::highscores::{HighScoreEntry, Ledger};
use crate::settings::Settings;
use crate::sim::figures::{Figure, FigureSnapshot, Player};
use crate::sim::round::RoundState;
use crate::sim::state::{GameEvent, RoundFigures, SoundCue};
use crate::sim::tick::{FixedStep, tick};

pub use crate::sim::state::GamePhase;

/// Abstract input, already decoded from whatever the host reads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Pause,
    Resume,
    Mute,
    ToggleCheat,
    CheatAddPoints,
    CheatSubtractPoints,
    ForceEndRound,
    Confirm,
    Cancel,
    GoToTitle,
    GoToHighScores,
    GoToControls,
    GoToInstructions,
    StartGame,
    Quit,
    /// Name for a qualifying final score
    SubmitName(String),
}

impl Command {
    /// Movement delta for the four move commands
    fn move_delta(&self, step: i32) -> Option<IVec2> {
        match self {
            Command::MoveUp => Some(IVec2::new(0, -step)),
            Command::MoveDown => Some(IVec2::new(0, step)),
            Command::MoveLeft => Some(IVec2::new(-step, 0)),
            Command::MoveRight => Some(IVec2::new(step, 0)),
            _ => None,
        }
    }
}

/// Two-step confirmation state; at most one target is armed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfirmPrompt {
    Idle,
    ArmedForTitle,
    ArmedForQuit,
}

/// Informational screens reachable from the title
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TitleView {
    None,
    Instructions,
    Controls,
    HighScores,
}

/// Everything the heads-up display shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hud {
    pub phase: GamePhase,
    pub prompt: ConfirmPrompt,
    pub title_view: TitleView,
    /// 1-based
    pub round: u32,
    pub remaining_secs: u32,
    pub round_score: i32,
    pub total_score: i32,
    /// Best of the leaderboard and the running total
    pub high_score: i32,
    pub threshold: Option<i32>,
    pub tagged: usize,
    pub cheat: bool,
    pub muted: bool,
    pub awaiting_name: bool,
}

/// One play session, from the title screen until quit
pub struct Game {
    settings: Settings,
    phase: GamePhase,
    prompt: ConfirmPrompt,
    title_view: TitleView,
    /// Figure moved around on the controls screen
    practice: Player,
    ledger: Ledger,
    rng: Pcg32,
    /// Monotonic session time (ms); drives cooldown and paralysis
    now_ms: u64,
    scheduler: FixedStep,
    round: RoundState,
    figures: Option<RoundFigures>,
    cheat: bool,
    muted: bool,
    /// Cheat: end the round on the next tick
    force_end: bool,
    last_round_passed: bool,
    /// Ended with a qualifying score and no name given yet
    awaiting_name: bool,
    events: Vec<GameEvent>,
}

impl Game {
    /// New session with the leaderboard read from `settings.ledger_path`
    pub fn new(settings: Settings) -> Self {
        let ledger = Ledger::load(&settings.ledger_path);
        Self::with_ledger(settings, ledger)
    }

    pub fn with_ledger(settings: Settings, ledger: Ledger) -> Self {
        let seed = settings.seed.unwrap_or_else(rand::random);
        log::info!("Game initialized with seed: {}", seed);
        Self {
            phase: GamePhase::Title,
            prompt: ConfirmPrompt::Idle,
            title_view: TitleView::None,
            practice: Player::new(),
            ledger,
            rng: Pcg32::seed_from_u64(seed),
            now_ms: 0,
            scheduler: FixedStep::new(settings.tick_ms),
            round: RoundState::new(1, 0, settings.round_time_ms),
            figures: None,
            cheat: false,
            muted: settings.start_muted,
            force_end: false,
            last_round_passed: false,
            awaiting_name: false,
            events: Vec::new(),
            settings,
        }
    }

    // === Queries ===

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn prompt(&self) -> ConfirmPrompt {
        self.prompt
    }

    pub fn title_view(&self) -> TitleView {
        self.title_view
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn leaderboard(&self) -> Vec<HighScoreEntry> {
        self.ledger.entries().cloned().collect()
    }

    pub fn round(&self) -> &RoundState {
        &self.round
    }

    pub fn figures(&self) -> Option<&RoundFigures> {
        self.figures.as_ref()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn is_cheating(&self) -> bool {
        self.cheat
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn is_awaiting_name(&self) -> bool {
        self.awaiting_name
    }

    pub fn is_running(&self) -> bool {
        self.phase != GamePhase::Quitting
    }

    pub fn hud(&self) -> Hud {
        let total = self.round.total_score;
        Hud {
            phase: self.phase,
            prompt: self.prompt,
            title_view: self.title_view,
            round: self.round.round_id,
            remaining_secs: self.round.clock.remaining_secs(),
            round_score: self.round.round_score,
            total_score: total,
            high_score: self.ledger.top_score().map_or(total, |best| best.max(total)),
            threshold: self.round.threshold(),
            tagged: self.figures.as_ref().map_or(0, RoundFigures::tagged_count),
            cheat: self.cheat,
            muted: self.muted,
            awaiting_name: self.awaiting_name,
        }
    }

    /// Render list in draw order
    pub fn snapshots(&self) -> Vec<FigureSnapshot> {
        match (&self.figures, self.phase, self.title_view) {
            (_, GamePhase::Title, TitleView::Controls) => vec![self.practice.snapshot()],
            (Some(figures), GamePhase::InRound | GamePhase::Paused | GamePhase::BetweenRounds, _) => {
                figures.snapshots()
            }
            _ => Vec::new(),
        }
    }

    /// Take every event emitted since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // === Time ===

    /// Report `elapsed_ms` of wall time
    ///
    /// Session time always moves (until quit); the round clock and the
    /// simulation only run while a round is in play.
    pub fn advance(&mut self, elapsed_ms: u64) {
        if self.phase == GamePhase::Quitting {
            return;
        }
        self.now_ms += elapsed_ms;
        if self.phase != GamePhase::InRound {
            return;
        }

        self.round.clock.advance(elapsed_ms);
        let steps = self.scheduler.accumulate(elapsed_ms);
        for _ in 0..steps {
            self.step();
            if self.phase != GamePhase::InRound {
                break;
            }
        }
    }

    /// One simulation tick followed by the round-over check
    fn step(&mut self) {
        let Some(figures) = self.figures.as_mut() else {
            return;
        };
        let events = tick(
            figures,
            &mut self.round,
            self.now_ms,
            &self.settings,
            &mut self.rng,
        );
        for event in events {
            if let GameEvent::EnemyTagged { zone_multiplier, .. } = event {
                if zone_multiplier > 0 {
                    self.cue(SoundCue::GoodTag);
                } else if zone_multiplier < 0 {
                    self.cue(SoundCue::BadTag);
                }
            }
            self.events.push(event);
        }

        if self.force_end || self.round.is_round_over() {
            self.end_round();
        }
    }

    // === Commands ===

    /// Apply one command; commands that mean nothing in the current phase are ignored
    pub fn handle(&mut self, command: Command) {
        let phase = self.phase;
        let handled = phase != GamePhase::Quitting
            && (self.handle_global(&command)
                || match phase {
                    GamePhase::Title => self.handle_title(&command),
                    GamePhase::InRound => self.handle_in_round(&command),
                    GamePhase::Paused => self.handle_paused(&command),
                    GamePhase::BetweenRounds => self.handle_between_rounds(&command),
                    GamePhase::Ended => self.handle_ended(&command),
                    GamePhase::Quitting => false,
                });
        if !handled {
            log::debug!("Ignored {:?} in {:?}", command, self.phase);
        }
    }

    /// Prompt keys, quit and mute behave the same in every live phase
    fn handle_global(&mut self, command: &Command) -> bool {
        match (command, self.prompt) {
            (Command::Quit | Command::Confirm, ConfirmPrompt::ArmedForQuit) => self.quit(),
            (Command::GoToTitle | Command::Confirm, ConfirmPrompt::ArmedForTitle) => {
                self.return_to_title()
            }
            (Command::Cancel, ConfirmPrompt::ArmedForQuit | ConfirmPrompt::ArmedForTitle) => {
                self.prompt = ConfirmPrompt::Idle;
            }
            (Command::Quit, _) => {
                if self.phase == GamePhase::InRound {
                    self.pause();
                }
                self.prompt = ConfirmPrompt::ArmedForQuit;
            }
            (Command::Mute, _) => {
                self.muted = !self.muted;
                log::info!("Sound {}", if self.muted { "muted" } else { "on" });
            }
            _ => return false,
        }
        true
    }

    fn handle_title(&mut self, command: &Command) -> bool {
        match command {
            Command::StartGame => self.start_new_game(),
            Command::Confirm | Command::GoToTitle if self.title_view != TitleView::None => {
                self.title_view = TitleView::None;
            }
            Command::Confirm => self.start_new_game(),
            Command::GoToInstructions => return self.toggle_view(TitleView::Instructions),
            Command::GoToControls => return self.toggle_view(TitleView::Controls),
            Command::GoToHighScores => return self.toggle_view(TitleView::HighScores),
            _ => match command.move_delta(self.settings.player_step) {
                Some(delta) if self.title_view == TitleView::Controls => {
                    self.practice.move_by(delta);
                }
                _ => return false,
            },
        }
        true
    }

    /// Open `view` when nothing else is open, close it when it is
    fn toggle_view(&mut self, view: TitleView) -> bool {
        if self.title_view == view {
            self.title_view = TitleView::None;
        } else if self.title_view == TitleView::None {
            if view == TitleView::Controls {
                self.practice = Player::new();
            }
            self.title_view = view;
        } else {
            return false;
        }
        true
    }

    fn handle_in_round(&mut self, command: &Command) -> bool {
        match command {
            Command::Pause => self.pause(),
            _ => {
                if let Some(delta) = command.move_delta(self.settings.player_step) {
                    return self.move_player(delta);
                }
                return self.handle_cheat(command);
            }
        }
        true
    }

    fn handle_paused(&mut self, command: &Command) -> bool {
        match command {
            Command::Resume => self.resume(),
            Command::GoToTitle => self.prompt = ConfirmPrompt::ArmedForTitle,
            Command::ToggleCheat => self.toggle_cheat(),
            _ => match command.move_delta(self.settings.player_step) {
                Some(delta) => return self.cheat && self.move_player(delta),
                None => return false,
            },
        }
        true
    }

    fn handle_between_rounds(&mut self, command: &Command) -> bool {
        match command {
            Command::Confirm | Command::StartGame => self.continue_game(),
            Command::GoToTitle => self.prompt = ConfirmPrompt::ArmedForTitle,
            Command::ForceEndRound if self.cheat && !self.round.is_last_round() => {
                log::info!("Skipping to round {}", self.round.round_id + 1);
                self.next_round();
            }
            Command::ToggleCheat => self.toggle_cheat(),
            _ => return false,
        }
        true
    }

    fn handle_ended(&mut self, command: &Command) -> bool {
        match command {
            Command::SubmitName(name) if self.awaiting_name => self.record_high_score(name),
            Command::Cancel if self.awaiting_name => {
                log::info!("High score entry declined");
                self.awaiting_name = false;
            }
            _ if self.awaiting_name => return false,
            Command::StartGame | Command::Confirm => self.start_new_game(),
            Command::GoToTitle => self.return_to_title(),
            _ => return false,
        }
        true
    }

    /// Cheat commands while a round is running
    fn handle_cheat(&mut self, command: &Command) -> bool {
        match command {
            Command::ToggleCheat => self.toggle_cheat(),
            Command::CheatAddPoints if self.cheat => self.round.add_cheat_points(),
            Command::CheatSubtractPoints if self.cheat => self.round.subtract_cheat_points(),
            Command::ForceEndRound if self.cheat => self.force_end = true,
            _ => return false,
        }
        true
    }

    fn toggle_cheat(&mut self) {
        self.cheat = !self.cheat;
        log::info!("Cheat mode {}", if self.cheat { "on" } else { "off" });
    }

    /// Move the round's player unless paralyzed
    fn move_player(&mut self, delta: IVec2) -> bool {
        let Some(figures) = self.figures.as_mut() else {
            return false;
        };
        if figures.player.is_paralyzed(self.now_ms, self.settings.paralyze_ms) {
            return false;
        }
        figures.player.move_by(delta);
        true
    }

    // === Transitions ===

    fn set_phase(&mut self, to: GamePhase) {
        let from = self.phase;
        if from == to {
            return;
        }
        log::info!("Phase {:?} -> {:?}", from, to);
        self.phase = to;
        self.prompt = ConfirmPrompt::Idle;
        self.events.push(GameEvent::PhaseChanged { from, to });
    }

    fn cue(&mut self, sound: SoundCue) {
        if !self.muted {
            self.events.push(GameEvent::Sound(sound));
        }
    }

    /// Clear every per-game counter
    fn reset_for_new_game(&mut self) {
        self.round = RoundState::new(1, 0, self.settings.round_time_ms);
        self.figures = None;
        self.cheat = false;
        self.muted = self.settings.start_muted;
        self.force_end = false;
        self.last_round_passed = false;
        self.awaiting_name = false;
        self.title_view = TitleView::None;
        self.scheduler.reset();
    }

    /// Build round `round_id` and start its clock
    fn reset_for_new_round(&mut self, round_id: u32, total_score: i32) {
        self.round = RoundState::new(round_id, total_score, self.settings.round_time_ms);
        self.figures = Some(RoundFigures::new(
            round_id,
            &mut self.rng,
            self.settings.warmup_moves_max,
        ));
        self.round.start(self.now_ms, self.settings.immunity_ms);
        self.force_end = false;
        self.scheduler.reset();
        log::info!("Round {} set up (total score {})", round_id, total_score);
        self.events.push(GameEvent::RoundStarted { round: round_id });
    }

    fn start_new_game(&mut self) {
        self.reset_for_new_game();
        self.reset_for_new_round(1, 0);
        self.set_phase(GamePhase::InRound);
    }

    fn next_round(&mut self) {
        let (round_id, total) = (self.round.round_id + 1, self.round.total_score);
        self.reset_for_new_round(round_id, total);
        self.set_phase(GamePhase::InRound);
    }

    fn pause(&mut self) {
        self.round.clock.stop();
        self.set_phase(GamePhase::Paused);
    }

    fn resume(&mut self) {
        self.round.clock.start();
        self.round.reset_cooldown(self.now_ms, 0);
        self.scheduler.reset();
        self.set_phase(GamePhase::InRound);
    }

    fn end_round(&mut self) {
        self.round.clock.stop();
        self.force_end = false;
        let passed = self.round.passed_level();
        self.last_round_passed = passed;
        log::info!(
            "Round {} over: {} points ({})",
            self.round.round_id,
            self.round.round_score,
            if passed { "passed" } else { "failed" }
        );
        self.events.push(GameEvent::RoundEnded {
            round: self.round.round_id,
            round_score: self.round.round_score,
            total_score: self.round.total_score,
            passed,
        });
        // Finishing the last round counts as a win even without a threshold
        self.cue(if passed || self.round.is_last_round() {
            SoundCue::WinRound
        } else {
            SoundCue::LoseRound
        });
        self.set_phase(GamePhase::BetweenRounds);
    }

    /// Leave the round summary: next round if passed, otherwise game over
    fn continue_game(&mut self) {
        if self.last_round_passed && !self.round.is_last_round() {
            self.next_round();
        } else {
            self.awaiting_name = self.ledger.is_high_score(self.round.total_score);
            log::info!(
                "Game over with {} points{}",
                self.round.total_score,
                if self.awaiting_name { ", new high score" } else { "" }
            );
            self.set_phase(GamePhase::Ended);
        }
    }

    fn record_high_score(&mut self, name: &str) {
        self.awaiting_name = false;
        let score = self.round.total_score;
        let Some(rank) = self.ledger.set_high_score(name, score) else {
            return;
        };
        self.events.push(GameEvent::HighScoreRecorded { rank, score });
        if let Err(e) = self.ledger.save() {
            log::error!("Failed to save high scores: {}", e);
            self.events.push(GameEvent::LedgerSaveFailed {
                reason: e.to_string(),
            });
        }
    }

    fn return_to_title(&mut self) {
        self.reset_for_new_game();
        self.set_phase(GamePhase::Title);
    }

    fn quit(&mut self) {
        self.round.clock.stop();
        self.scheduler.halt();
        self.set_phase(GamePhase::Quitting);
    }
}
