//! Data model for flashcards and their persisted records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DeckError, Result};
use crate::srs::{IntervalTable, MAX_MEM_LEVEL};

/// A single question/answer card with its review state.
///
/// `front` and `back` are immutable after creation; `last_review` and
/// `mem_level` change only through the review transitions below, which keep
/// the level inside `0..=MAX_MEM_LEVEL`.
#[derive(Debug, Clone, PartialEq)]
pub struct Flashcard {
    front: String,
    back: String,
    last_review: DateTime<Utc>,
    mem_level: u8,
}

impl Flashcard {
    /// Create a brand-new card. It starts at memory level 0 with
    /// `last_review` set to now, which makes it immediately due.
    pub fn new(front: String, back: String) -> Self {
        Self {
            front,
            back,
            last_review: Utc::now(),
            mem_level: 0,
        }
    }

    /// Rebuild a card from its stored record.
    ///
    /// Fails with [`DeckError::MalformedRecord`] when a field is absent and
    /// with [`DeckError::Corrupted`] when `last_review` does not parse or
    /// `mem_level` lies outside `0..=MAX_MEM_LEVEL`.
    pub fn from_record(record: &CardRecord) -> Result<Self> {
        let front = record.front.clone().ok_or_else(|| missing("front"))?;
        let back = record.back.clone().ok_or_else(|| missing("back"))?;
        let raw_review = record
            .last_review
            .as_deref()
            .ok_or_else(|| missing("last_review"))?;
        let mem_level = record.mem_level.ok_or_else(|| missing("mem_level"))?;

        if mem_level > MAX_MEM_LEVEL {
            return Err(DeckError::Corrupted(format!(
                "mem_level {} is out of range 0..={}",
                mem_level, MAX_MEM_LEVEL
            )));
        }

        let last_review = DateTime::parse_from_rfc3339(raw_review)
            .map_err(|e| {
                DeckError::Corrupted(format!(
                    "unparsable last_review '{}': {}",
                    raw_review, e
                ))
            })?
            .with_timezone(&Utc);

        Ok(Self {
            front,
            back,
            last_review,
            mem_level,
        })
    }

    /// The card's stored form, with the timestamp rendered as RFC 3339.
    pub fn to_record(&self) -> CardRecord {
        CardRecord {
            front: Some(self.front.clone()),
            back: Some(self.back.clone()),
            last_review: Some(self.last_review.to_rfc3339()),
            mem_level: Some(self.mem_level),
        }
    }

    pub fn front(&self) -> &str {
        &self.front
    }

    pub fn back(&self) -> &str {
        &self.back
    }

    pub fn last_review(&self) -> DateTime<Utc> {
        self.last_review
    }

    pub fn mem_level(&self) -> u8 {
        self.mem_level
    }

    /// Record a successful review: bump the level (capped at
    /// `MAX_MEM_LEVEL`) and restart the due timer.
    pub fn record_correct_answer(&mut self, now: DateTime<Utc>) {
        self.last_review = now;
        self.mem_level = (self.mem_level + 1).min(MAX_MEM_LEVEL);
    }

    /// Record a failed review: drop the level (floored at 0) and restart
    /// the due timer.
    pub fn record_incorrect_answer(&mut self, now: DateTime<Utc>) {
        self.last_review = now;
        self.mem_level = self.mem_level.saturating_sub(1);
    }

    /// Whether the card is due at `now`: the elapsed whole days since the
    /// last review meet or exceed the interval for its memory level. A
    /// level-0 card has interval 0 and is always due.
    pub fn is_due_at(&self, now: DateTime<Utc>, table: &IntervalTable) -> bool {
        let elapsed_days = (now - self.last_review).num_days();
        elapsed_days >= table.days_for(self.mem_level)
    }
}

/// Persisted form of a [`Flashcard`].
///
/// Fields are optional so that a record missing a key is reported per card
/// via [`Flashcard::from_record`] instead of failing the whole document
/// parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub back: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_review: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mem_level: Option<u8>,
}

fn missing(field: &str) -> DeckError {
    DeckError::MalformedRecord(format!("missing field '{}'", field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    use crate::srs::SrsMethod;

    fn card_at_level(level: u8, last_review: DateTime<Utc>) -> Flashcard {
        Flashcard::from_record(&CardRecord {
            front: Some("Q".to_string()),
            back: Some("A".to_string()),
            last_review: Some(last_review.to_rfc3339()),
            mem_level: Some(level),
        })
        .unwrap()
    }

    #[test]
    fn test_correct_answer_bumps_level_and_caps_at_max() {
        let now = Utc::now();
        for level in 0..=MAX_MEM_LEVEL {
            let mut card = card_at_level(level, now);
            card.record_correct_answer(now);
            assert_eq!(card.mem_level(), (level + 1).min(MAX_MEM_LEVEL));
            assert_eq!(card.last_review(), now);
        }
    }

    #[test]
    fn test_incorrect_answer_drops_level_and_floors_at_zero() {
        let now = Utc::now();
        for level in 0..=MAX_MEM_LEVEL {
            let mut card = card_at_level(level, now);
            card.record_incorrect_answer(now);
            assert_eq!(card.mem_level(), level.saturating_sub(1));
            assert_eq!(card.last_review(), now);
        }
    }

    #[test]
    fn test_new_card_is_immediately_due() {
        let card = Flashcard::new("Q".to_string(), "A".to_string());
        assert!(card.is_due_at(Utc::now(), SrsMethod::Fibonacci.intervals()));
    }

    #[test]
    fn test_due_exactly_on_the_interval_boundary() {
        let now = Utc::now();
        let table = SrsMethod::Fibonacci.intervals();

        // Level 4 waits 3 days. Exactly 3 days ago: due.
        let card = card_at_level(4, now - Duration::days(3));
        assert!(card.is_due_at(now, table));

        // 2 days 23 hours ago: one hour short, not due.
        let card = card_at_level(4, now - Duration::days(2) - Duration::hours(23));
        assert!(!card.is_due_at(now, table));

        // Level 1 waits 1 day. Exactly 24 hours: due; a minute less: not.
        let card = card_at_level(1, now - Duration::hours(24));
        assert!(card.is_due_at(now, table));

        let card = card_at_level(1, now - Duration::hours(23) - Duration::minutes(59));
        assert!(!card.is_due_at(now, table));
    }

    #[test]
    fn test_record_round_trips_exactly() {
        let now = Utc::now();
        let card = card_at_level(7, now);
        let restored = Flashcard::from_record(&card.to_record()).unwrap();
        assert_eq!(restored, card);
        assert_eq!(restored.last_review(), now);
    }

    #[test]
    fn test_missing_fields_are_malformed_records() {
        let full = card_at_level(2, Utc::now()).to_record();

        for wipe in 0..4 {
            let mut record = full.clone();
            match wipe {
                0 => record.front = None,
                1 => record.back = None,
                2 => record.last_review = None,
                _ => record.mem_level = None,
            }
            let err = Flashcard::from_record(&record).unwrap_err();
            assert!(matches!(err, DeckError::MalformedRecord(_)), "{:?}", err);
        }
    }

    #[test]
    fn test_unparsable_timestamp_is_corruption() {
        let mut record = card_at_level(1, Utc::now()).to_record();
        record.last_review = Some("yesterday-ish".to_string());
        let err = Flashcard::from_record(&record).unwrap_err();
        assert!(matches!(err, DeckError::Corrupted(_)), "{:?}", err);
    }

    #[test]
    fn test_out_of_range_level_is_corruption() {
        let mut record = card_at_level(0, Utc::now()).to_record();
        record.mem_level = Some(MAX_MEM_LEVEL + 1);
        let err = Flashcard::from_record(&record).unwrap_err();
        assert!(matches!(err, DeckError::Corrupted(_)), "{:?}", err);
    }
}
