// Data-driven defaults for the chord assistant.
//
// `AssistantConfig` holds the tunable encoder and selector parameters. It is
// loaded from JSON; every field has a default, so an empty object (or no
// file at all) yields the stock behavior. Command-line flags override
// whatever the file sets.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MusicError, Result};
use crate::midi::{EncodeOptions, TICKS_PER_QUARTER};
use crate::progression::DEFAULT_LENGTH;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Duration of each chord in ticks (480 = one quarter note).
    pub ticks_per_chord: u32,
    /// NoteOn/NoteOff velocity, 0-127.
    pub velocity: u8,
    /// Number of chords in a generated progression.
    pub progression_length: usize,
    /// Where temporary MIDI files go. `None` means the OS temp directory.
    pub temp_dir: Option<PathBuf>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            ticks_per_chord: TICKS_PER_QUARTER as u32,
            velocity: 64,
            progression_length: DEFAULT_LENGTH,
            temp_dir: None,
        }
    }
}

impl AssistantConfig {
    /// Parse a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| MusicError::Config(e.to_string()))
    }

    /// Load a config from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| MusicError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json(&text)
    }

    pub fn encode_options(&self) -> EncodeOptions {
        EncodeOptions {
            ticks_per_chord: self.ticks_per_chord,
            velocity: self.velocity,
        }
    }

    pub fn temp_dir(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}
