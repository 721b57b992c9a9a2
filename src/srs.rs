//! Spaced repetition scheduling methods and their interval tables.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Highest memory level a card can reach.
pub const MAX_MEM_LEVEL: u8 = 9;

/// Days to wait after a review before a card comes due again, indexed by
/// memory level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalTable {
    days: [i64; 9],
}

impl IntervalTable {
    /// Minimum number of whole days between a review at `mem_level` and the
    /// card coming due again. Levels past the end of the table reuse the
    /// last entry, so lookups are defined for the full 0..=9 range.
    pub fn days_for(&self, mem_level: u8) -> i64 {
        let idx = (mem_level as usize).min(self.days.len() - 1);
        self.days[idx]
    }
}

/// Fibonacci-like growth curve: a fresh or missed card is due immediately,
/// a mastered one rests for three weeks.
static FIBONACCI: IntervalTable = IntervalTable {
    days: [0, 1, 1, 2, 3, 5, 8, 13, 21],
};

/// Scheduling method a deck is created with. Fixed for the deck's lifetime;
/// new algorithms are added as new variants with their own tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SrsMethod {
    Fibonacci,
}

impl SrsMethod {
    /// The interval table governing decks that use this method.
    pub fn intervals(&self) -> &'static IntervalTable {
        match self {
            Self::Fibonacci => &FIBONACCI,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Fibonacci => "Fibonacci",
        }
    }
}

impl fmt::Display for SrsMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SrsMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fibonacci" => Ok(Self::Fibonacci),
            _ => Err(format!("unknown scheduling method '{}'", s)),
        }
    }
}
