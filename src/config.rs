//! Configuration types and defaults for the explorer
//!
//! Data source locations plus the task variant selector.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::dataset::DatasetError;

/// Default locations, relative to the page serving the explorer
pub const DEFAULT_IMAGE_SOURCE: &str = "./images_L3.json";
pub const DEFAULT_STORY_SOURCE: &str = "./Stories_L3.json";
pub const DEFAULT_MORALS_SOURCE: &str = "./morals.json";

// =============================================================================
// Task Variant
// =============================================================================

/// Which parallel dataset is being browsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskVariant {
    /// Image-grounded dialogues (records carry `image_url`)
    #[default]
    Image,
    /// Story-grounded dialogues (records carry `story_title`)
    Story,
}

impl TaskVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskVariant::Image => "image",
            TaskVariant::Story => "story",
        }
    }
}

impl fmt::Display for TaskVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskVariant {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "image" => Ok(TaskVariant::Image),
            "story" => Ok(TaskVariant::Story),
            _ => Err(DatasetError::UnknownTaskVariant(s.to_string())),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Where each dataset file is fetched from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Image variant records. Default: `./images_L3.json`
    pub image_source: String,
    /// Story variant records. Default: `./Stories_L3.json`
    pub story_source: String,
    /// Story title -> moral table. Default: `./morals.json`
    pub morals_source: String,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            image_source: DEFAULT_IMAGE_SOURCE.to_string(),
            story_source: DEFAULT_STORY_SOURCE.to_string(),
            morals_source: DEFAULT_MORALS_SOURCE.to_string(),
        }
    }
}

impl ExplorerConfig {
    /// Default file names served from `base` instead of the page directory
    pub fn rooted_at(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        let join = |path: &str| format!("{}/{}", base, path.trim_start_matches("./"));
        Self {
            image_source: join(DEFAULT_IMAGE_SOURCE),
            story_source: join(DEFAULT_STORY_SOURCE),
            morals_source: join(DEFAULT_MORALS_SOURCE),
        }
    }

    /// Record source for a task variant
    pub fn source_for(&self, variant: TaskVariant) -> &str {
        match variant {
            TaskVariant::Image => &self.image_source,
            TaskVariant::Story => &self.story_source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_parse() {
        assert_eq!("image".parse::<TaskVariant>().unwrap(), TaskVariant::Image);
        assert_eq!(" Story ".parse::<TaskVariant>().unwrap(), TaskVariant::Story);
        assert!(matches!(
            "video".parse::<TaskVariant>(),
            Err(DatasetError::UnknownTaskVariant(v)) if v == "video"
        ));
    }

    #[test]
    fn test_source_for() {
        let config = ExplorerConfig::default();
        assert_eq!(config.source_for(TaskVariant::Image), "./images_L3.json");
        assert_eq!(config.source_for(TaskVariant::Story), "./Stories_L3.json");
    }

    #[test]
    fn test_rooted_at() {
        let config = ExplorerConfig::rooted_at("https://cdn.example.org/data/");
        assert_eq!(config.image_source, "https://cdn.example.org/data/images_L3.json");
        assert_eq!(config.morals_source, "https://cdn.example.org/data/morals.json");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: ExplorerConfig =
            serde_json::from_str(r#"{ "story_source": "/stories.json" }"#).unwrap();
        assert_eq!(config.story_source, "/stories.json");
        assert_eq!(config.image_source, DEFAULT_IMAGE_SOURCE);
    }
}
