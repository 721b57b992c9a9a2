//! Error types for deck loading, persistence, and review operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeckError {
    /// No stored deck exists under the requested name. Recoverable: the
    /// caller may offer to create the deck.
    #[error("Deck not found: {0}")]
    NotFound(String),

    /// The stored deck fails structural or type validation (missing keys,
    /// unknown scheduling method, unparsable timestamp). Never repaired
    /// automatically; the caller decides whether to abort or start fresh.
    #[error("Deck is corrupted: {0}")]
    Corrupted(String),

    /// An individual flashcard record is missing a required field.
    #[error("Malformed flashcard record: {0}")]
    MalformedRecord(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failure serializing a deck for write. Load-side JSON problems are
    /// classified as [`DeckError::Corrupted`] instead.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DeckError>;
