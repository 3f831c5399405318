//! Dataset Store: the loaded collection, the morals table, and load ordering
//!
//! Parsing is pure so it runs under native tests; the network side lives in
//! `fetch.rs`. Each task-variant switch takes a `LoadTicket`; only the newest
//! ticket may install its collection, so a slow earlier response can never
//! overwrite a faster later one.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

use super::record::DialogueRecord;
use super::strategy::extract_strategy_vocabulary;
use crate::config::TaskVariant;

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum DatasetError {
    /// Primary dataset could not be fetched or parsed. Fatal to the load.
    DataUnavailable { source: String, reason: String },
    /// Morals file could not be fetched or parsed. Non-fatal.
    MoralsUnavailable { source: String, reason: String },
    UnknownTaskVariant(String),
}

impl std::fmt::Display for DatasetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetError::DataUnavailable { source, reason } => {
                write!(f, "Dataset unavailable from {}: {}", source, reason)
            }
            DatasetError::MoralsUnavailable { source, reason } => {
                write!(f, "Morals unavailable from {}: {}", source, reason)
            }
            DatasetError::UnknownTaskVariant(v) => {
                write!(f, "Unknown task variant '{}' (expected 'image' or 'story')", v)
            }
        }
    }
}

impl std::error::Error for DatasetError {}

// =============================================================================
// Collection
// =============================================================================

/// Records of one task variant, with their strategy vocabulary
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    variant: TaskVariant,
    records: Vec<DialogueRecord>,
    vocabulary: BTreeSet<String>,
}

impl Collection {
    pub fn new(variant: TaskVariant, records: Vec<DialogueRecord>) -> Self {
        let vocabulary = extract_strategy_vocabulary(&records);
        Self {
            variant,
            records,
            vocabulary,
        }
    }

    pub fn empty(variant: TaskVariant) -> Self {
        Self::new(variant, Vec::new())
    }

    pub fn variant(&self) -> TaskVariant {
        self.variant
    }

    pub fn records(&self) -> &[DialogueRecord] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&DialogueRecord> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct normalized strategy labels across all records
    pub fn vocabulary(&self) -> &BTreeSet<String> {
        &self.vocabulary
    }

    /// Vocabulary in display order
    pub fn sorted_vocabulary(&self) -> Vec<String> {
        self.vocabulary.iter().cloned().collect()
    }
}

/// Parse a dataset file body. Anything but an array of records is rejected whole.
pub fn parse_collection(variant: TaskVariant, source: &str, body: &str) -> Result<Collection, DatasetError> {
    let records: Vec<DialogueRecord> =
        serde_json::from_str(body).map_err(|e| DatasetError::DataUnavailable {
            source: source.to_string(),
            reason: e.to_string(),
        })?;
    Ok(Collection::new(variant, records))
}

// =============================================================================
// Morals
// =============================================================================

/// Story title -> moral text. Loaded once, never mutated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MoralsTable {
    morals: HashMap<String, String>,
}

impl MoralsTable {
    pub fn new(morals: HashMap<String, String>) -> Self {
        Self { morals }
    }

    pub fn moral_for(&self, story_title: &str) -> Option<&str> {
        self.morals.get(story_title).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.morals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.morals.is_empty()
    }
}

pub fn parse_morals(source: &str, body: &str) -> Result<MoralsTable, DatasetError> {
    serde_json::from_str(body).map_err(|e| DatasetError::MoralsUnavailable {
        source: source.to_string(),
        reason: e.to_string(),
    })
}

// =============================================================================
// DatasetStore
// =============================================================================

/// Issued when a load starts; proves the load is still the newest on completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    variant: TaskVariant,
}

impl LoadTicket {
    pub fn variant(&self) -> TaskVariant {
        self.variant
    }
}

/// Status of the current collection, reported to the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadStatus {
    Idle,
    Loading,
    Ready,
    Failed,
}

pub struct DatasetStore {
    current: Rc<Collection>,
    morals: MoralsTable,
    generation: u64,
    status: LoadStatus,
}

impl Default for DatasetStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetStore {
    pub fn new() -> Self {
        Self {
            current: Rc::new(Collection::empty(TaskVariant::default())),
            morals: MoralsTable::default(),
            generation: 0,
            status: LoadStatus::Idle,
        }
    }

    /// Start a load for `variant`. Drops the previous collection and
    /// invalidates every ticket issued before this one.
    pub fn begin_load(&mut self, variant: TaskVariant) -> LoadTicket {
        self.generation += 1;
        self.current = Rc::new(Collection::empty(variant));
        self.status = LoadStatus::Loading;
        LoadTicket {
            generation: self.generation,
            variant,
        }
    }

    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Install the outcome of a load. Returns the installed collection, or
    /// `None` if the ticket was superseded (state is left untouched).
    /// A failed load installs an empty collection.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        outcome: Result<Collection, DatasetError>,
    ) -> Option<Result<Rc<Collection>, DatasetError>> {
        if !self.is_current(&ticket) {
            return None;
        }
        match outcome {
            Ok(collection) => {
                self.current = Rc::new(collection);
                self.status = LoadStatus::Ready;
                Some(Ok(Rc::clone(&self.current)))
            }
            Err(e) => {
                self.current = Rc::new(Collection::empty(ticket.variant));
                self.status = LoadStatus::Failed;
                Some(Err(e))
            }
        }
    }

    pub fn collection(&self) -> Rc<Collection> {
        Rc::clone(&self.current)
    }

    pub fn status(&self) -> LoadStatus {
        self.status
    }

    pub fn set_morals(&mut self, morals: MoralsTable) {
        self.morals = morals;
    }

    pub fn morals(&self) -> &MoralsTable {
        &self.morals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IMAGES: &str = r#"[
        { "personality": { "assertive": true }, "record": [{ "strategy": "humor, candor" }],
          "dialogue": [["hi", "A"]], "image_url": " https://img/1.png " },
        { "personality": { "assertive": false }, "record": [{ "strategy": "calm and humor" }],
          "dialogue": [["yo", "B"]], "image_url": "https://img/2.png" }
    ]"#;

    #[test]
    fn test_parse_collection() {
        let collection = parse_collection(TaskVariant::Image, "images.json", IMAGES).unwrap();
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.variant(), TaskVariant::Image);
        assert_eq!(collection.sorted_vocabulary(), vec!["Calm", "Candor", "Humor"]);
    }

    #[test]
    fn test_parse_collection_tolerates_null_fields() {
        let body = r#"[
            { "personality": null, "record": [{ "strategy": "humor" }], "dialogue": [], "image_url": "a.png" },
            { "personality": { "assertive": true }, "record": null, "dialogue": [], "image_url": "b.png" }
        ]"#;
        let collection = parse_collection(TaskVariant::Image, "images.json", body).unwrap();
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.sorted_vocabulary(), vec!["Humor"]);
    }

    #[test]
    fn test_parse_collection_rejects_non_array() {
        let err = parse_collection(TaskVariant::Story, "stories.json", r#"{"a": 1}"#).unwrap_err();
        assert!(matches!(err, DatasetError::DataUnavailable { ref source, .. } if source == "stories.json"));
    }

    #[test]
    fn test_parse_collection_rejects_garbage() {
        assert!(parse_collection(TaskVariant::Image, "x", "<html>404</html>").is_err());
    }

    #[test]
    fn test_parse_morals() {
        let morals = parse_morals("morals.json", r#"{ "The Fox": "Sour grapes." }"#).unwrap();
        assert_eq!(morals.moral_for("The Fox"), Some("Sour grapes."));
        assert_eq!(morals.moral_for("The Hare"), None);

        let err = parse_morals("morals.json", "[1, 2]").unwrap_err();
        assert!(matches!(err, DatasetError::MoralsUnavailable { .. }));
    }

    #[test]
    fn test_load_lifecycle() {
        let mut store = DatasetStore::new();
        assert_eq!(store.status(), LoadStatus::Idle);

        let ticket = store.begin_load(TaskVariant::Image);
        assert_eq!(store.status(), LoadStatus::Loading);
        assert!(store.collection().is_empty());

        let collection = parse_collection(TaskVariant::Image, "images.json", IMAGES).unwrap();
        let installed = store.complete_load(ticket, Ok(collection)).unwrap().unwrap();
        assert_eq!(installed.len(), 2);
        assert_eq!(store.status(), LoadStatus::Ready);
        assert!(Rc::ptr_eq(&installed, &store.collection()));
    }

    #[test]
    fn test_stale_load_discarded() {
        let mut store = DatasetStore::new();
        let slow = store.begin_load(TaskVariant::Image);
        let fast = store.begin_load(TaskVariant::Story);

        let stories = Collection::new(TaskVariant::Story, vec![DialogueRecord::default()]);
        assert!(store.complete_load(fast, Ok(stories)).is_some());

        let images = parse_collection(TaskVariant::Image, "images.json", IMAGES).unwrap();
        assert!(store.complete_load(slow, Ok(images)).is_none());

        assert_eq!(store.collection().variant(), TaskVariant::Story);
        assert_eq!(store.collection().len(), 1);
    }

    #[test]
    fn test_failed_load_leaves_empty_collection() {
        let mut store = DatasetStore::new();
        let ticket = store.begin_load(TaskVariant::Story);
        let err = DatasetError::DataUnavailable {
            source: "stories.json".to_string(),
            reason: "HTTP 404".to_string(),
        };
        let result = store.complete_load(ticket, Err(err.clone())).unwrap();
        assert_eq!(result.unwrap_err(), err);
        assert_eq!(store.status(), LoadStatus::Failed);
        assert!(store.collection().is_empty());
        assert_eq!(store.collection().variant(), TaskVariant::Story);
    }

    #[test]
    fn test_error_display() {
        let err = DatasetError::DataUnavailable {
            source: "a.json".to_string(),
            reason: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "Dataset unavailable from a.json: boom");
    }
}
