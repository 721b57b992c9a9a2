//! Spaced repetition flashcard engine
//!
//! This crate provides:
//! - Fibonacci-interval scheduling over ten memorization levels
//! - Deck management with a pending-card review queue
//! - Whole-deck JSON persistence under a local decks directory
//! - Optional TOML configuration for the decks location

pub mod config;
pub mod deck;
pub mod error;
pub mod models;
pub mod srs;
pub mod storage;

pub use deck::{CardHandle, Deck, DeckStats};
pub use error::{DeckError, Result};
pub use models::{CardRecord, Flashcard};
pub use srs::{IntervalTable, SrsMethod, MAX_MEM_LEVEL};
pub use storage::{DeckRecord, DeckStore};
