//! Scorecard for the holes played this session
//!
//! Kept in memory only; a new page load starts a fresh card.

use serde::{Deserialize, Serialize};

/// One completed hole
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScorecardEntry {
    /// 1-based hole number within the session
    pub hole: u32,
    pub par: u32,
    pub strokes: u32,
}

impl ScorecardEntry {
    /// Strokes relative to par (negative is under)
    pub fn score(&self) -> i32 {
        self.strokes as i32 - self.par as i32
    }
}

/// Completed holes in play order
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Scorecard {
    pub entries: Vec<ScorecardEntry>,
}

impl Scorecard {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Record a finished hole. A hole number that is already on the card is
    /// ignored and returns false.
    pub fn record(&mut self, hole: u32, par: u32, strokes: u32) -> bool {
        if self.entries.iter().any(|e| e.hole == hole) {
            log::warn!("Hole {} already on the scorecard", hole);
            return false;
        }
        self.entries.push(ScorecardEntry { hole, par, strokes });
        true
    }

    pub fn holes_played(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_strokes(&self) -> u32 {
        self.entries.iter().map(|e| e.strokes).sum()
    }

    pub fn total_par(&self) -> u32 {
        self.entries.iter().map(|e| e.par).sum()
    }

    /// Running total relative to par
    pub fn total_score(&self) -> i32 {
        self.total_strokes() as i32 - self.total_par() as i32
    }

    /// Best single-hole score relative to par
    pub fn best_score(&self) -> Option<i32> {
        self.entries.iter().map(ScorecardEntry::score).min()
    }

    /// "E", "+3" or "-2" style running total
    pub fn total_label(&self) -> String {
        match self.total_score() {
            0 => "E".to_string(),
            s if s > 0 => format!("+{}", s),
            s => s.to_string(),
        }
    }
}
