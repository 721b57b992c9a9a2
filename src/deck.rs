//! The deck aggregate: owns the cards, derives the pending subset, applies
//! review outcomes, and keeps the stored copy in sync.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::Flashcard;
use crate::srs::SrsMethod;
use crate::storage::{DeckRecord, DeckStore};

/// Cards at this level or above wait the full 21 days between reviews.
const MATURE_LEVEL: u8 = 8;

/// Opaque handle to a card inside its deck.
///
/// A handle is the card's position in the deck. Cards are never removed, so
/// a handle stays valid for the life of the deck it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardHandle(usize);

/// Statistics for a deck.
#[derive(Debug, Default)]
pub struct DeckStats {
    pub total_cards: usize,
    pub pending_cards: usize,
    pub learning_cards: usize,
    pub mature_cards: usize,
}

/// A named collection of flashcards sharing one scheduling method.
///
/// The stored record is the system of record; this aggregate is its
/// in-memory mirror and writes the whole deck back after every mutation, so
/// review state survives process restarts.
#[derive(Debug)]
pub struct Deck {
    name: String,
    method: SrsMethod,
    cards: Vec<Flashcard>,
    /// Indices into `cards` of the currently due subset, in card order.
    /// Rebuilt from scratch on open and after every mutation, never patched
    /// incrementally.
    pending: Vec<usize>,
    store: DeckStore,
}

impl Deck {
    /// Create a new, empty deck and persist it immediately.
    ///
    /// Any stored deck under the same name is overwritten; callers gate
    /// creation on [`DeckStore::exists`].
    pub fn create(store: DeckStore, name: &str, method: SrsMethod) -> Result<Self> {
        let deck = Self {
            name: name.to_string(),
            method,
            cards: Vec::new(),
            pending: Vec::new(),
            store,
        };
        deck.persist()?;

        log::info!("Created deck '{}' with method {}", deck.name, method);
        Ok(deck)
    }

    /// Open a stored deck: load its record, rebuild every card, bind the
    /// interval table for the stored method, and compute the pending set.
    pub fn open(store: DeckStore, name: &str) -> Result<Self> {
        let record = store.load(name)?;

        let mut cards = Vec::with_capacity(record.flashcards.len());
        for card_record in &record.flashcards {
            cards.push(Flashcard::from_record(card_record)?);
        }

        let mut deck = Self {
            name: name.to_string(),
            method: record.srs_method,
            cards,
            pending: Vec::new(),
            store,
        };
        deck.recompute_pending(Utc::now());

        log::info!(
            "Opened deck '{}': {} cards, {} pending",
            deck.name,
            deck.total_count(),
            deck.pending_count()
        );
        Ok(deck)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn method(&self) -> SrsMethod {
        self.method
    }

    /// Number of cards in the deck.
    pub fn total_count(&self) -> usize {
        self.cards.len()
    }

    /// Number of cards currently due. Reads the view computed by the last
    /// mutation, so repeated calls agree until the next add or review.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// The card behind `handle`, if the handle belongs to this deck.
    pub fn card(&self, handle: CardHandle) -> Option<&Flashcard> {
        self.cards.get(handle.0)
    }

    /// All cards in insertion order.
    pub fn cards(&self) -> &[Flashcard] {
        &self.cards
    }

    /// Append a new card and persist the deck. The card starts at level 0
    /// and is immediately pending. Duplicates of an existing front/back are
    /// allowed and treated as distinct cards.
    pub fn add_card(&mut self, front: String, back: String) -> Result<CardHandle> {
        self.cards.push(Flashcard::new(front, back));
        self.recompute_pending(Utc::now());
        self.persist()?;
        Ok(CardHandle(self.cards.len() - 1))
    }

    /// One due card, or `None` when nothing is pending. Selection is a pure
    /// read; the deck is not mutated.
    ///
    /// The pending subset is ordered by card position, and selection takes
    /// the entry nearest the end, so the most recently added or just-missed
    /// due card is served first.
    pub fn next_pending_card(&self) -> Option<(CardHandle, &Flashcard)> {
        let idx = *self.pending.last()?;
        Some((CardHandle(idx), &self.cards[idx]))
    }

    /// Record a review outcome at the current time.
    pub fn record_outcome(&mut self, handle: CardHandle, correct: bool) -> Result<()> {
        self.record_outcome_at(handle, correct, Utc::now())
    }

    /// Record a review outcome as of `now`: apply the card's transition,
    /// rebuild the pending set from the full card list, and persist.
    ///
    /// Rebuilding rather than patching guarantees the pending view reflects
    /// the outcome just applied: a card demoted to level 0 shows up as due
    /// again right away. A handle that does not belong to this deck is
    /// ignored.
    pub fn record_outcome_at(
        &mut self,
        handle: CardHandle,
        correct: bool,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let card = match self.cards.get_mut(handle.0) {
            Some(card) => card,
            None => {
                log::warn!(
                    "Ignoring outcome for unknown card handle {:?} in deck '{}'",
                    handle,
                    self.name
                );
                return Ok(());
            }
        };

        if correct {
            card.record_correct_answer(now);
        } else {
            card.record_incorrect_answer(now);
        }
        log::debug!(
            "Reviewed '{}' in deck '{}': correct={}, level now {}",
            card.front(),
            self.name,
            correct,
            card.mem_level()
        );

        self.recompute_pending(now);
        self.persist()
    }

    /// Current deck statistics.
    pub fn stats(&self) -> DeckStats {
        let mut stats = DeckStats {
            total_cards: self.cards.len(),
            pending_cards: self.pending.len(),
            ..Default::default()
        };

        for card in &self.cards {
            if card.mem_level() >= MATURE_LEVEL {
                stats.mature_cards += 1;
            } else {
                stats.learning_cards += 1;
            }
        }

        stats
    }

    /// Rebuild the pending view from the authoritative card list.
    fn recompute_pending(&mut self, now: DateTime<Utc>) {
        let table = self.method.intervals();
        self.pending = self
            .cards
            .iter()
            .enumerate()
            .filter(|(_, card)| card.is_due_at(now, table))
            .map(|(idx, _)| idx)
            .collect();
    }

    /// Write the whole deck back to the store.
    fn persist(&self) -> Result<()> {
        let record = DeckRecord {
            srs_method: self.method,
            flashcards: self.cards.iter().map(Flashcard::to_record).collect(),
        };
        self.store.save(&self.name, &record)
    }
}
