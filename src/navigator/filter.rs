//! Filter State: trait predicates + required strategy labels
//!
//! One required level per trait (a new level replaces the old one) and a set
//! of labels every match must mention. Strategy matching is AND: a record
//! matches when its label set is a superset of the required set.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::dataset::{normalize_label, DialogueRecord, TraitLevel};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    traits: BTreeMap<String, TraitLevel>,
    strategies: BTreeSet<String>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `level` for `trait_name`, or lift the constraint with `None`
    pub fn set_trait(&mut self, trait_name: &str, level: Option<TraitLevel>) {
        match level {
            Some(level) => {
                self.traits.insert(trait_name.to_string(), level);
            }
            None => {
                self.traits.remove(trait_name);
            }
        }
    }

    /// Button semantics: selecting the active level again clears it
    pub fn toggle_trait(&mut self, trait_name: &str, level: TraitLevel) {
        if self.traits.get(trait_name) == Some(&level) {
            self.traits.remove(trait_name);
        } else {
            self.traits.insert(trait_name.to_string(), level);
        }
    }

    pub fn toggle_strategy(&mut self, label: &str, included: bool) {
        let label = normalize_label(label);
        if included {
            self.strategies.insert(label);
        } else {
            self.strategies.remove(&label);
        }
    }

    pub fn clear(&mut self) {
        self.traits.clear();
        self.strategies.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.traits.is_empty() && self.strategies.is_empty()
    }

    pub fn trait_level(&self, trait_name: &str) -> Option<TraitLevel> {
        self.traits.get(trait_name).copied()
    }

    pub fn traits(&self) -> &BTreeMap<String, TraitLevel> {
        &self.traits
    }

    pub fn strategies(&self) -> &BTreeSet<String> {
        &self.strategies
    }

    /// Evaluate this filter against a record
    pub fn matches(&self, record: &DialogueRecord) -> bool {
        let traits_match = self
            .traits
            .iter()
            .all(|(name, level)| record.trait_level(name) == Some(*level));
        if !traits_match {
            return false;
        }
        if self.strategies.is_empty() {
            return true;
        }
        self.strategies.is_subset(&record.strategies())
    }
}
