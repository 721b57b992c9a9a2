//! Storage module for saving and loading flashcard decks.
//!
//! One JSON document per deck, keyed by deck name; the name doubles as the
//! file stem under the decks directory.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{DeckError, Result};
use crate::models::CardRecord;
use crate::srs::SrsMethod;

/// Stored form of a whole deck: the scheduling method plus every card's
/// record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckRecord {
    pub srs_method: SrsMethod,
    pub flashcards: Vec<CardRecord>,
}

/// Handles deck persistence.
#[derive(Debug, Clone)]
pub struct DeckStore {
    decks_dir: PathBuf,
}

impl DeckStore {
    pub fn new(decks_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&decks_dir)?;
        Ok(Self { decks_dir })
    }

    /// Get default storage location.
    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("flashdeck")
            .join("decks")
    }

    fn deck_path(&self, name: &str) -> PathBuf {
        self.decks_dir.join(format!("{}.json", name))
    }

    /// Whether a deck is stored under `name`. Supports collision checks
    /// before deck creation.
    pub fn exists(&self, name: &str) -> bool {
        self.deck_path(name).exists()
    }

    /// Load the stored record for `name`.
    pub fn load(&self, name: &str) -> Result<DeckRecord> {
        let path = self.deck_path(name);
        if !path.exists() {
            return Err(DeckError::NotFound(name.to_string()));
        }

        let json = fs::read_to_string(&path)?;
        let record: DeckRecord = serde_json::from_str(&json)
            .map_err(|e| DeckError::Corrupted(format!("{}: {}", path.display(), e)))?;

        log::debug!("Loaded deck '{}' ({} cards)", name, record.flashcards.len());
        Ok(record)
    }

    /// Overwrite the stored record for `name` using an atomic write (write
    /// to .tmp then rename), so no partial deck is ever visible on disk.
    pub fn save(&self, name: &str, record: &DeckRecord) -> Result<()> {
        let path = self.deck_path(name);
        let tmp_path = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(record)?;
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &path)?;

        log::debug!("Saved deck '{}' ({} cards)", name, record.flashcards.len());
        Ok(())
    }

    /// List names of all stored decks, sorted.
    pub fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();

        for entry in fs::read_dir(&self.decks_dir)? {
            let entry = entry?;
            let path = entry.path();

            if path.extension().map_or(false, |ext| ext == "json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }

        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::models::Flashcard;

    fn store() -> (tempfile::TempDir, DeckStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = DeckStore::new(dir.path().join("decks")).unwrap();
        (dir, store)
    }

    fn sample_record() -> DeckRecord {
        DeckRecord {
            srs_method: SrsMethod::Fibonacci,
            flashcards: vec![
                Flashcard::new("2+2".to_string(), "4".to_string()).to_record(),
                Flashcard::new("3*3".to_string(), "9".to_string()).to_record(),
            ],
        }
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let (_dir, store) = store();
        let record = sample_record();

        store.save("maths", &record).unwrap();
        let loaded = store.load("maths").unwrap();
        assert_eq!(loaded, record);
    }

    #[test]
    fn test_load_of_absent_deck_is_not_found() {
        let (_dir, store) = store();
        let err = store.load("ghost").unwrap_err();
        assert!(matches!(err, DeckError::NotFound(name) if name == "ghost"));
    }

    #[test]
    fn test_invalid_json_is_corruption() {
        let (dir, store) = store();
        fs::write(dir.path().join("decks").join("bad.json"), "not json {").unwrap();
        let err = store.load("bad").unwrap_err();
        assert!(matches!(err, DeckError::Corrupted(_)), "{:?}", err);
    }

    #[test]
    fn test_missing_top_level_keys_are_corruption() {
        let (dir, store) = store();
        let decks = dir.path().join("decks");

        fs::write(decks.join("nocards.json"), r#"{"srs_method":"Fibonacci"}"#).unwrap();
        assert!(matches!(
            store.load("nocards").unwrap_err(),
            DeckError::Corrupted(_)
        ));

        fs::write(decks.join("nomethod.json"), r#"{"flashcards":[]}"#).unwrap();
        assert!(matches!(
            store.load("nomethod").unwrap_err(),
            DeckError::Corrupted(_)
        ));
    }

    #[test]
    fn test_unknown_method_is_corruption() {
        let (dir, store) = store();
        fs::write(
            dir.path().join("decks").join("odd.json"),
            r#"{"srs_method":"Mnemosyne","flashcards":[]}"#,
        )
        .unwrap();
        assert!(matches!(
            store.load("odd").unwrap_err(),
            DeckError::Corrupted(_)
        ));
    }

    #[test]
    fn test_exists_tracks_saved_decks() {
        let (_dir, store) = store();
        assert!(!store.exists("maths"));
        store.save("maths", &sample_record()).unwrap();
        assert!(store.exists("maths"));
    }

    #[test]
    fn test_list_returns_sorted_names_and_skips_other_files() {
        let (dir, store) = store();
        store.save("zoology", &sample_record()).unwrap();
        store.save("algebra", &sample_record()).unwrap();
        fs::write(dir.path().join("decks").join("notes.txt"), "x").unwrap();

        assert_eq!(store.list().unwrap(), vec!["algebra", "zoology"]);
    }

    #[test]
    fn test_save_cleans_up_its_temporary_file() {
        let (dir, store) = store();
        store.save("maths", &sample_record()).unwrap();
        assert!(!dir.path().join("decks").join("maths.json.tmp").exists());
    }

    #[test]
    fn test_saved_timestamps_are_rfc3339_text() {
        let (dir, store) = store();
        let record = sample_record();
        store.save("maths", &record).unwrap();

        let raw = fs::read_to_string(dir.path().join("decks").join("maths.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let stamp = value["flashcards"][0]["last_review"].as_str().unwrap();
        let parsed = chrono::DateTime::parse_from_rfc3339(stamp).unwrap();
        assert!(parsed.with_timezone(&Utc) <= Utc::now());
    }
}
