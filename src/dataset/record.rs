//! DialogueRecord: one unit of browsable content
//!
//! Mirrors the JSON shape of the image and story dataset files:
//!
//! ```json
//! {
//!   "personality": { "assertive": true, "calm": false },
//!   "record": [ { "strategy": "assertive, logical and calm" } ],
//!   "dialogue": [ ["Hello there.", "Persuader"], ["Hi.", "Persuadee"] ],
//!   "image_url": "https://...",
//!   "story_title": "The Fox and the Grapes"
//! }
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use super::strategy::split_strategies;

// =============================================================================
// Trait Levels
// =============================================================================

/// Required value of a personality trait
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraitLevel {
    High,
    Low,
}

impl TraitLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            TraitLevel::High => "high",
            TraitLevel::Low => "low",
        }
    }

    /// The boolean stored in a record's personality map
    pub fn as_bool(&self) -> bool {
        matches!(self, TraitLevel::High)
    }
}

impl From<bool> for TraitLevel {
    fn from(b: bool) -> Self {
        if b {
            TraitLevel::High
        } else {
            TraitLevel::Low
        }
    }
}

impl fmt::Display for TraitLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait value outside `high` / `low`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTraitLevel(pub String);

impl fmt::Display for UnknownTraitLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown trait level '{}' (expected 'high' or 'low')", self.0)
    }
}

impl std::error::Error for UnknownTraitLevel {}

impl FromStr for TraitLevel {
    type Err = UnknownTraitLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(TraitLevel::High),
            "low" => Ok(TraitLevel::Low),
            _ => Err(UnknownTraitLevel(s.to_string())),
        }
    }
}

// =============================================================================
// Record Parts
// =============================================================================

/// One free-text strategy annotation (`{"strategy": "..."}`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategyEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
}

impl StrategyEvent {
    pub fn new(strategy: &str) -> Self {
        Self {
            strategy: Some(strategy.to_string()),
        }
    }
}

/// A single utterance. Read from `[text, role]` pairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, String)")]
pub struct DialogueTurn {
    pub text: String,
    pub role: String,
}

impl From<(String, String)> for DialogueTurn {
    fn from((text, role): (String, String)) -> Self {
        Self { text, role }
    }
}

impl DialogueTurn {
    pub fn new(text: &str, role: &str) -> Self {
        Self {
            text: text.to_string(),
            role: role.to_string(),
        }
    }

    /// Lowercased role, used by renderers as a style key
    pub fn role_key(&self) -> String {
        self.role.to_lowercase()
    }
}

// =============================================================================
// DialogueRecord
// =============================================================================

/// `null` reads as an empty container, like a missing key
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DialogueRecord {
    /// Trait name -> true (high) / false (low)
    #[serde(default, deserialize_with = "null_as_default")]
    pub personality: BTreeMap<String, bool>,
    /// Strategy annotations, in dialogue order
    #[serde(rename = "record", default, deserialize_with = "null_as_default")]
    pub strategy_events: Vec<StrategyEvent>,
    #[serde(rename = "dialogue", default, deserialize_with = "null_as_default")]
    pub turns: Vec<DialogueTurn>,
    /// Image variant only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Story variant only; key into the morals table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub story_title: Option<String>,
}

impl DialogueRecord {
    /// Level of `trait_name`, if the record carries it
    pub fn trait_level(&self, trait_name: &str) -> Option<TraitLevel> {
        self.personality.get(trait_name).map(|&b| TraitLevel::from(b))
    }

    /// Every normalized strategy label mentioned by this record
    pub fn strategies(&self) -> BTreeSet<String> {
        self.strategy_events
            .iter()
            .filter_map(|event| event.strategy.as_deref())
            .flat_map(split_strategies)
            .collect()
    }

    /// "High assertive, Low calm"
    pub fn personality_description(&self) -> String {
        if self.personality.is_empty() {
            return "Personality information not available".to_string();
        }
        self.personality
            .iter()
            .map(|(name, &high)| format!("{} {}", if high { "High" } else { "Low" }, name))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
