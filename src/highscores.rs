//! High score leaderboard system
//!
//! Five ranked slots persisted as plain text, one `"<name> <score>"` line per
//! slot. Names may contain spaces; the last space-separated token is the score.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_NAME_LENGTH, NUM_HIGH_SCORES};
use crate::error::StorageError;

/// Name shown in every slot when the ledger file could not be read
pub const SENTINEL_NAME: &str = "N/A";
/// Score of every slot when the ledger file could not be read
pub const SENTINEL_SCORE: i32 = i32::MIN;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub name: String,
    pub score: i32,
}

impl HighScoreEntry {
    pub fn new(name: &str, score: i32) -> Self {
        Self {
            name: sanitize_name(name),
            score,
        }
    }

    fn parse_line(line: &str) -> Option<Self> {
        let (name, score) = line.trim_end_matches('\r').rsplit_once(' ')?;
        let score = score.parse().ok()?;
        Some(Self {
            name: name.to_string(),
            score,
        })
    }
}

/// High score leaderboard
///
/// Always holds exactly [`NUM_HIGH_SCORES`] slots ordered by descending score.
/// A slot is empty only when the backing file had no usable line for it, and
/// committing a new score packs the filled entries to the top.
#[derive(Debug, Clone, Serialize)]
pub struct Ledger {
    slots: Vec<Option<HighScoreEntry>>,
    #[serde(skip)]
    path: Option<PathBuf>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    /// Empty leaderboard that is never written to disk
    pub fn new() -> Self {
        Self {
            slots: vec![None; NUM_HIGH_SCORES],
            path: None,
        }
    }

    /// Build from ranked entries (extra entries are dropped)
    pub fn from_entries(entries: Vec<HighScoreEntry>) -> Self {
        let mut ledger = Self::new();
        for (slot, entry) in ledger.slots.iter_mut().zip(entries) {
            *slot = Some(entry);
        }
        ledger
    }

    /// Every slot filled with the unbeatable-looking sentinel entry
    pub fn sentinel() -> Self {
        Self::from_entries(vec![
            HighScoreEntry {
                name: SENTINEL_NAME.to_string(),
                score: SENTINEL_SCORE,
            };
            NUM_HIGH_SCORES
        ])
    }

    /// Load the leaderboard stored at `path`
    ///
    /// A missing file starts an empty board; any other read failure yields
    /// the sentinel board. Either way later commits are written to `path`.
    pub fn load(path: &Path) -> Self {
        let mut ledger = match Self::try_load(path) {
            Ok(ledger) => {
                log::info!("Loaded {} high scores", ledger.len());
                ledger
            }
            Err(e) if e.is_not_found() => {
                log::info!("No high scores found, starting fresh");
                Self::new()
            }
            Err(e) => {
                log::warn!("Could not read high scores ({}), using placeholders", e);
                Self::sentinel()
            }
        };
        ledger.path = Some(path.to_path_buf());
        ledger
    }

    pub fn try_load(path: &Path) -> Result<Self, StorageError> {
        let text = fs::read_to_string(path).map_err(|e| StorageError::io(path, e))?;
        let mut ledger = Self::parse(&text);
        ledger.path = Some(path.to_path_buf());
        Ok(ledger)
    }

    /// Parse ledger text; malformed lines leave their slot empty
    pub fn parse(text: &str) -> Self {
        let mut ledger = Self::new();
        for (i, line) in text.lines().take(NUM_HIGH_SCORES).enumerate() {
            ledger.slots[i] = HighScoreEntry::parse_line(line);
            if ledger.slots[i].is_none() && !line.trim().is_empty() {
                log::warn!("Skipping malformed high score line {}: {:?}", i + 1, line);
            }
        }
        ledger
    }

    /// Serialized form: one line per slot in rank order, blank for an empty slot
    pub fn to_text(&self) -> String {
        self.slots
            .iter()
            .map(|slot| match slot {
                Some(e) => format!("{} {}\n", e.name, e.score),
                None => "\n".to_string(),
            })
            .collect()
    }

    /// Rewrite the backing file in full (no-op for in-memory ledgers)
    pub fn save(&self) -> Result<(), StorageError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        fs::write(path, self.to_text()).map_err(|e| StorageError::io(path, e))?;
        log::info!("High scores saved to {}", path.display());
        Ok(())
    }

    /// All slots in rank order, including empty ones
    pub fn slots(&self) -> &[Option<HighScoreEntry>] {
        &self.slots
    }

    /// Filled slots in rank order
    pub fn entries(&self) -> impl Iterator<Item = &HighScoreEntry> {
        self.slots.iter().flatten()
    }

    /// Number of filled slots
    pub fn len(&self) -> usize {
        self.entries().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The all-time best score (if any)
    pub fn top_score(&self) -> Option<i32> {
        self.slots[0].as_ref().map(|e| e.score)
    }

    /// True if `score` would earn a slot (ties with last place qualify)
    pub fn is_high_score(&self, score: i32) -> bool {
        self.placement_index(score).is_some()
    }

    /// Slot a new `score` would take; ties go to the newer entry
    ///
    /// Empty slots rank below every filled one.
    pub fn placement_index(&self, score: i32) -> Option<usize> {
        let index = self
            .entries()
            .position(|e| score >= e.score)
            .unwrap_or_else(|| self.len());
        (index < NUM_HIGH_SCORES).then_some(index)
    }

    /// Insert a new entry, pushing lower ones down and dropping the last
    ///
    /// Returns the slot index taken, or None if the score does not qualify.
    pub fn set_high_score(&mut self, name: &str, score: i32) -> Option<usize> {
        let index = self.placement_index(score)?;
        let mut entries: Vec<HighScoreEntry> = self.slots.drain(..).flatten().collect();
        entries.insert(index, HighScoreEntry::new(name, score));
        entries.truncate(NUM_HIGH_SCORES);
        self.slots = entries.into_iter().map(Some).collect();
        self.slots.resize(NUM_HIGH_SCORES, None);
        Some(index)
    }
}

/// Clamp a player-entered name to what the ledger format can hold
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .take(MAX_NAME_LENGTH)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Ledger {
        Ledger::from_entries(vec![
            HighScoreEntry::new("Bob", 600),
            HighScoreEntry::new("Carl", 500),
            HighScoreEntry::new("Dee", 400),
            HighScoreEntry::new("Eve", 300),
            HighScoreEntry::new("Fae", 200),
        ])
    }

    fn names(ledger: &Ledger) -> Vec<(&str, i32)> {
        ledger.entries().map(|e| (e.name.as_str(), e.score)).collect()
    }

    #[test]
    fn test_tie_goes_to_newer_entry() {
        let mut ledger = sample();
        assert_eq!(ledger.set_high_score("Alice", 500), Some(1));
        assert_eq!(
            names(&ledger),
            vec![
                ("Bob", 600),
                ("Alice", 500),
                ("Carl", 500),
                ("Dee", 400),
                ("Eve", 300)
            ]
        );
    }

    #[test]
    fn test_is_high_score_against_last_place() {
        let ledger = sample();
        assert!(ledger.is_high_score(200));
        assert!(ledger.is_high_score(900));
        assert!(!ledger.is_high_score(199));
        assert!(Ledger::new().is_high_score(-50));
    }

    #[test]
    fn test_non_qualifying_score_is_rejected() {
        let mut ledger = sample();
        assert_eq!(ledger.set_high_score("Zed", 10), None);
        assert_eq!(ledger.len(), 5);
        assert_eq!(ledger.top_score(), Some(600));
    }

    #[test]
    fn test_parse_names_with_spaces_and_bad_lines() {
        let ledger = Ledger::parse("Mary Ann Lee 320\nbroken\nSam 12\n");
        assert_eq!(ledger.slots()[0], Some(HighScoreEntry::new("Mary Ann Lee", 320)));
        assert_eq!(ledger.slots()[1], None);
        assert_eq!(ledger.slots()[2], Some(HighScoreEntry::new("Sam", 12)));
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_sparse_ledger_keeps_order_and_fills_gap() {
        let mut ledger = Ledger::parse("Bob 600\nbroken\nDee 400\nEve 300\nFae 200\n");
        assert!(ledger.is_high_score(100));

        assert_eq!(ledger.set_high_score("Zed", 100), Some(4));
        assert_eq!(
            names(&ledger),
            vec![("Bob", 600), ("Dee", 400), ("Eve", 300), ("Fae", 200), ("Zed", 100)]
        );
        assert!(ledger.slots().iter().all(Option::is_some));

        // Full again: last place is the bar
        assert!(!ledger.is_high_score(99));
    }

    #[test]
    fn test_sparse_ledger_insert_mid_table() {
        let mut ledger = Ledger::parse("Bob 600\n\nDee 400\n");
        assert_eq!(ledger.set_high_score("Cy", 500), Some(1));
        assert_eq!(names(&ledger), vec![("Bob", 600), ("Cy", 500), ("Dee", 400)]);
        assert_eq!(ledger.slots()[3], None);
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("A very long player name"), "A very long pla");
        assert_eq!(sanitize_name("two\nlines"), "two lines");
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("HighScores.txt");

        let mut ledger = Ledger::load(&path);
        assert!(ledger.is_empty());
        for (name, score) in [("Bob", 600), ("Carl", 500), ("Dee Dee", 400), ("Eve", -3), ("Fae", -40)] {
            ledger.set_high_score(name, score);
        }
        ledger.save().unwrap();

        let reloaded = Ledger::try_load(&path).unwrap();
        assert_eq!(reloaded.slots(), ledger.slots());
        assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 5);
    }

    #[test]
    fn test_sparse_file_roundtrip_keeps_slots() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("HighScores.txt");
        fs::write(&path, "Bob 600\nbroken\nDee 400\n").unwrap();

        let ledger = Ledger::load(&path);
        ledger.save().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), NUM_HIGH_SCORES);

        let reloaded = Ledger::try_load(&path).unwrap();
        assert_eq!(reloaded.slots(), ledger.slots());
        assert_eq!(reloaded.slots()[1], None);
        assert_eq!(reloaded.slots()[2], Some(HighScoreEntry::new("Dee", 400)));
    }

    #[test]
    fn test_unreadable_file_yields_sentinels() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be read as a file
        let ledger = Ledger::load(dir.path());
        assert_eq!(ledger.len(), 5);
        assert!(ledger
            .entries()
            .all(|e| e.name == SENTINEL_NAME && e.score == SENTINEL_SCORE));
        assert!(ledger.is_high_score(i32::MIN));
    }

    #[test]
    fn test_save_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger = Ledger::load(dir.path());
        ledger.set_high_score("Ann", 10);
        assert!(matches!(ledger.save(), Err(StorageError::Io { .. })));
        assert_eq!(ledger.top_score(), Some(10));
    }
}
