//! Render payloads for the presentation layer
//!
//! Engine state is the source of truth; the presentation layer only ever
//! receives these owned snapshots and talks back through engine operations.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::TaskVariant;
use crate::dataset::{DatasetStore, DialogueTurn, LoadStatus, MoralsTable, TraitLevel};
use crate::navigator::{FilterState, NavigationMode, Navigator, Selection};

/// Everything needed to draw one selected dialogue
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DialogueView {
    pub absolute_index: usize,
    pub relative_index: Option<usize>,
    /// 1-based, within the active space
    pub position: usize,
    pub total: usize,
    pub has_previous: bool,
    pub has_next: bool,
    pub turns: Vec<DialogueTurn>,
    /// Sorted normalized labels
    pub strategies: Vec<String>,
    pub traits: BTreeMap<String, TraitLevel>,
    pub personality: String,
    pub image_url: Option<String>,
    pub story_title: Option<String>,
    pub moral: Option<String>,
}

impl DialogueView {
    pub fn new(selection: &Selection<'_>, variant: TaskVariant, morals: &MoralsTable) -> Self {
        let record = selection.record;

        let (image_url, story_title) = match variant {
            TaskVariant::Image => (record.image_url.as_deref().map(|url| url.trim().to_string()), None),
            TaskVariant::Story => (None, record.story_title.clone()),
        };
        let moral = story_title
            .as_deref()
            .and_then(|title| morals.moral_for(title))
            .map(str::to_string);

        Self {
            absolute_index: selection.absolute_index,
            relative_index: selection.relative_index,
            position: selection.position,
            total: selection.total,
            has_previous: selection.has_previous,
            has_next: selection.has_next,
            turns: record.turns.clone(),
            strategies: record.strategies().into_iter().collect(),
            traits: record
                .personality
                .iter()
                .map(|(name, &high)| (name.clone(), TraitLevel::from(high)))
                .collect(),
            personality: record.personality_description(),
            image_url: image_url.filter(|url| !url.is_empty()),
            story_title,
            moral,
        }
    }
}

/// Full explorer state as seen by the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExplorerSnapshot {
    pub task: TaskVariant,
    pub status: LoadStatus,
    pub mode: NavigationMode,
    pub filter: FilterState,
    /// Size of the active space; 0 when nothing is selected
    pub total: usize,
    pub current: Option<DialogueView>,
    pub vocabulary: Vec<String>,
}

impl ExplorerSnapshot {
    pub fn capture(store: &DatasetStore, navigator: &Navigator) -> Self {
        let collection = navigator.collection();
        let current = navigator
            .current()
            .map(|selection| DialogueView::new(&selection, collection.variant(), store.morals()));
        Self {
            task: collection.variant(),
            status: store.status(),
            mode: navigator.mode(),
            filter: navigator.filter().clone(),
            total: current.as_ref().map_or(0, |view| view.total),
            current,
            vocabulary: collection.sorted_vocabulary(),
        }
    }
}
