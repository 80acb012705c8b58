//! Patcher settings.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Result;

/// User-facing switches of a patch run.
///
/// Read from `settings.json`; absent fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Give vampires with default skin the default skin color of their base
    /// race, so fixes to the player vampire's skin do not spill onto NPCs.
    #[serde(alias = "defaultVampireColorPatch")]
    pub default_vampire_color_patch: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_vampire_color_patch: true,
        }
    }
}

impl Settings {
    /// Parse settings from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load settings from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
