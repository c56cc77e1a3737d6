//! Persisted seed and difficulty.
//!
//! Stored as a small JSON object: `{"seed": 1234, "difficulty": 0}`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::Difficulty;
use crate::error::{MazeError, Result};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub seed: Option<u32>,
    pub difficulty: Difficulty,
}

/// The file as written, before the difficulty code is checked.
#[derive(Debug, Default, Deserialize)]
struct StoredSettings {
    #[serde(default)]
    seed: Option<u32>,
    #[serde(default)]
    difficulty: Option<i64>,
}

impl TryFrom<StoredSettings> for Settings {
    type Error = MazeError;

    fn try_from(stored: StoredSettings) -> Result<Self> {
        let difficulty = match stored.difficulty {
            Some(code) => Difficulty::from_code(code)?,
            None => Difficulty::default(),
        };
        Ok(Self {
            seed: stored.seed,
            difficulty,
        })
    }
}

pub struct SettingsStore {
    file_path: PathBuf,
    settings: Settings,
}

impl SettingsStore {
    /// Loads `file_path`; a missing file gives the defaults.
    pub fn open(file_path: impl Into<PathBuf>) -> Result<Self> {
        let file_path = file_path.into();
        let settings = load_settings(&file_path)?;
        Ok(Self {
            file_path,
            settings,
        })
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn seed(&self) -> Option<u32> {
        self.settings.seed
    }

    pub fn difficulty(&self) -> Difficulty {
        self.settings.difficulty
    }

    pub fn set_seed(&mut self, seed: u32) -> Result<()> {
        self.settings.seed = Some(seed);
        self.save()
    }

    pub fn clear_seed(&mut self) -> Result<()> {
        self.settings.seed = None;
        self.save()
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> Result<()> {
        self.settings.difficulty = difficulty;
        self.save()
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let text = serde_json::to_string_pretty(&self.settings)?;
        fs::write(&self.file_path, text)?;
        debug!("saved settings to {}", self.file_path.display());
        Ok(())
    }
}

fn load_settings(file_path: &Path) -> Result<Settings> {
    match fs::read_to_string(file_path) {
        Ok(text) => serde_json::from_str::<StoredSettings>(&text)?.try_into(),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Settings::default()),
        Err(err) => Err(err.into()),
    }
}
