//! Navigator: Filter & Navigation Engine
//!
//! Holds the filter selections and the current position over a shared,
//! read-only `Collection`. Navigation always resolves against the *active
//! space*: the filtered subsequence after a successful `search()`, the full
//! collection otherwise.
//!
//! # State Machine
//! - `Unfiltered { current }` - active index is the absolute index.
//!   `current` is `None` when nothing is selected (fresh load, or no match).
//! - `Filtered { matches, position }` - `matches` holds absolute indices in
//!   collection order and is never empty; `position` indexes into it.
//!
//! `search()` enters `Filtered` on a match and `Unfiltered { None }` on no
//! match. `pick_random()`, `reset()` and a collection swap return to
//! `Unfiltered`. Step and seek operations never change the mode.

use serde::{Deserialize, Serialize};
use std::rc::Rc;

use super::filter::FilterState;
use crate::dataset::{Collection, DialogueRecord, TraitLevel};

/// Fallback seed when the platform has no entropy source
const FALLBACK_SEED: u64 = 0x853c_49e6_748f_ea9b;

// =============================================================================
// Types
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationMode {
    Unfiltered,
    Filtered,
}

/// The index space navigation currently operates against
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActiveSpace {
    Unfiltered { current: Option<usize> },
    Filtered { matches: Vec<usize>, position: usize },
}

/// A selected record plus everything needed to render its position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection<'a> {
    pub record: &'a DialogueRecord,
    /// Index into the full collection
    pub absolute_index: usize,
    /// Index into the filtered subsequence, when filtered
    pub relative_index: Option<usize>,
    /// 1-based position within the active space
    pub position: usize,
    /// Length of the active space
    pub total: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SearchOutcome<'a> {
    /// First match, with the filtered subsequence now active
    Match(Selection<'a>),
    /// Nothing matched; no record is selected
    NoMatch,
}

/// Seek target outside `[1, active length]`. Position is unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidPosition {
    pub requested: i64,
    /// 1-based position still displayed, if any
    pub current_position: Option<usize>,
}

impl std::fmt::Display for InvalidPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid position: {}", self.requested)
    }
}

impl std::error::Error for InvalidPosition {}

// =============================================================================
// Navigator
// =============================================================================

pub struct Navigator {
    collection: Rc<Collection>,
    filter: FilterState,
    space: ActiveSpace,
    // RNG state for random picks (LCG)
    rng_state: u64,
}

impl Navigator {
    /// Navigator seeded from the platform entropy source
    pub fn new(collection: Rc<Collection>) -> Self {
        Self::with_seed(collection, getrandom::u64().unwrap_or(FALLBACK_SEED))
    }

    /// Deterministic random picks, for tests and replays
    pub fn with_seed(collection: Rc<Collection>, seed: u64) -> Self {
        Self {
            collection,
            filter: FilterState::new(),
            space: ActiveSpace::Unfiltered { current: None },
            rng_state: seed,
        }
    }

    /// Swap in a new collection (task-variant switch). Clears filters and position.
    pub fn replace_collection(&mut self, collection: Rc<Collection>) {
        self.collection = collection;
        self.filter.clear();
        self.space = ActiveSpace::Unfiltered { current: None };
    }

    pub fn collection(&self) -> &Rc<Collection> {
        &self.collection
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn space(&self) -> &ActiveSpace {
        &self.space
    }

    pub fn mode(&self) -> NavigationMode {
        match self.space {
            ActiveSpace::Unfiltered { .. } => NavigationMode::Unfiltered,
            ActiveSpace::Filtered { .. } => NavigationMode::Filtered,
        }
    }

    /// Absolute indices of the active filtered subsequence
    pub fn filtered_indices(&self) -> Option<&[usize]> {
        match &self.space {
            ActiveSpace::Filtered { matches, .. } => Some(matches),
            ActiveSpace::Unfiltered { .. } => None,
        }
    }

    pub fn active_len(&self) -> usize {
        match &self.space {
            ActiveSpace::Unfiltered { .. } => self.collection.len(),
            ActiveSpace::Filtered { matches, .. } => matches.len(),
        }
    }

    pub fn active_index(&self) -> Option<usize> {
        match &self.space {
            ActiveSpace::Unfiltered { current } => *current,
            ActiveSpace::Filtered { position, .. } => Some(*position),
        }
    }

    pub fn absolute_index(&self) -> Option<usize> {
        match &self.space {
            ActiveSpace::Unfiltered { current } => *current,
            ActiveSpace::Filtered { matches, position } => matches.get(*position).copied(),
        }
    }

    /// The currently selected record, if any
    pub fn current(&self) -> Option<Selection<'_>> {
        let (absolute_index, relative_index, active_index) = match &self.space {
            ActiveSpace::Unfiltered { current } => {
                let index = (*current)?;
                (index, None, index)
            }
            ActiveSpace::Filtered { matches, position } => {
                (*matches.get(*position)?, Some(*position), *position)
            }
        };
        let record = self.collection.get(absolute_index)?;
        let total = self.active_len();
        Some(Selection {
            record,
            absolute_index,
            relative_index,
            position: active_index + 1,
            total,
            has_previous: active_index > 0,
            has_next: active_index + 1 < total,
        })
    }

    // ========================================================================
    // Filter Operations (applied lazily at `search`)
    // ========================================================================

    pub fn set_trait_filter(&mut self, trait_name: &str, level: Option<TraitLevel>) {
        self.filter.set_trait(trait_name, level);
    }

    pub fn toggle_trait_filter(&mut self, trait_name: &str, level: TraitLevel) {
        self.filter.toggle_trait(trait_name, level);
    }

    pub fn toggle_strategy_filter(&mut self, label: &str, included: bool) {
        self.filter.toggle_strategy(label, included);
    }

    // ========================================================================
    // Navigation Operations
    // ========================================================================

    /// Stable filter of the full collection against the current filter state
    pub fn search(&mut self) -> SearchOutcome<'_> {
        let matches: Vec<usize> = self
            .collection
            .records()
            .iter()
            .enumerate()
            .filter(|(_, record)| self.filter.matches(record))
            .map(|(index, _)| index)
            .collect();

        if matches.is_empty() {
            self.space = ActiveSpace::Unfiltered { current: None };
            return SearchOutcome::NoMatch;
        }

        self.space = ActiveSpace::Filtered { matches, position: 0 };
        match self.current() {
            Some(selection) => SearchOutcome::Match(selection),
            None => SearchOutcome::NoMatch,
        }
    }

    /// Uniform pick over the full collection; leaves filtered mode.
    /// Returns `None` (state untouched) on an empty collection.
    pub fn pick_random(&mut self) -> Option<Selection<'_>> {
        if self.collection.is_empty() {
            return None;
        }
        let index = self.next_index(self.collection.len());
        self.space = ActiveSpace::Unfiltered { current: Some(index) };
        self.current()
    }

    /// Clear every filter, then pick a random record if there is one
    pub fn reset(&mut self) -> Option<Selection<'_>> {
        self.filter.clear();
        if self.collection.is_empty() {
            return None;
        }
        self.pick_random()
    }

    /// Move back one within the active space. `None` at the first element
    /// or with nothing selected.
    pub fn step_previous(&mut self) -> Option<Selection<'_>> {
        let index = self.active_index()?;
        if index == 0 {
            return None;
        }
        self.move_to(index - 1);
        self.current()
    }

    /// Move forward one within the active space. `None` at the last element
    /// or with nothing selected.
    pub fn step_next(&mut self) -> Option<Selection<'_>> {
        let index = self.active_index()?;
        if index + 1 >= self.active_len() {
            return None;
        }
        self.move_to(index + 1);
        self.current()
    }

    /// Jump to a 1-based position in the active space
    pub fn seek(&mut self, position: i64) -> Result<Selection<'_>, InvalidPosition> {
        let invalid = InvalidPosition {
            requested: position,
            current_position: self.active_index().map(|index| index + 1),
        };
        if position < 1 || position > self.active_len() as i64 {
            return Err(invalid);
        }
        self.move_to((position - 1) as usize);
        self.current().ok_or(invalid)
    }

    // ========================================================================
    // Internal Methods
    // ========================================================================

    fn move_to(&mut self, active_index: usize) {
        match &mut self.space {
            ActiveSpace::Unfiltered { current } => *current = Some(active_index),
            ActiveSpace::Filtered { position, .. } => *position = active_index,
        }
    }

    /// Uniform index in `0..len` (len > 0) from the top 53 bits of the LCG
    fn next_index(&mut self, len: usize) -> usize {
        self.rng_state = self.rng_state.wrapping_mul(6364136223846793005).wrapping_add(1);
        let unit = (self.rng_state >> 11) as f64 / (1u64 << 53) as f64;
        ((unit * len as f64) as usize).min(len - 1)
    }
}
