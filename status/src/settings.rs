use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::atomic_write::{read_json, write_atomic};
use crate::error::StatusError;
use crate::paths::settings_path;

fn default_thread_count() -> u32 {
    4
}

/// The process-wide settings document, shared by every worker and the
/// front end. Workers only ever read `downloadDirectory` and
/// `threadCount`, and read-modify-write `runningGames`; every other
/// field the front end owns is preserved untouched via `#[serde(flatten)]`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SettingsDocument {
    #[serde(default)]
    pub download_directory: String,
    #[serde(default = "default_thread_count")]
    pub thread_count: u32,
    /// Game name -> executable path, present only while a handler holds
    /// that game running. Authoritative: `isRunning=true` on a game
    /// document without a matching entry here is a stale crash leftover.
    #[serde(default)]
    pub running_games: HashMap<String, String>,
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

impl SettingsDocument {
    pub fn load() -> Result<Self, StatusError> {
        let path = settings_path();
        if !path.exists() {
            return Ok(SettingsDocument::default());
        }
        read_json(&path)
    }

    pub fn save(&self) -> Result<(), StatusError> {
        write_atomic(&settings_path(), self)
    }

    pub fn download_dir(&self) -> PathBuf {
        PathBuf::from(&self.download_directory)
    }

    /// Host-helper downloads default to five parallel file fetches; every
    /// other caller of `threadCount` (direct, ranged downloads) defaults
    /// to four when the field is absent, which `#[serde(default)]` above
    /// already supplies. Host-helper overrides the default explicitly.
    pub fn thread_count_or(&self, default: u32) -> u32 {
        if self.thread_count == 0 {
            default
        } else {
            self.thread_count
        }
    }

    /// Marks `game` as running with `executable`, reloading the settings
    /// document immediately beforehand so a concurrent writer's changes
    /// to unrelated fields (e.g. the front end toggling a preference)
    /// are not clobbered by a stale in-memory copy.
    pub fn mark_running(game: &str, executable: &str) -> Result<(), StatusError> {
        let mut settings = SettingsDocument::load()?;
        settings
            .running_games
            .insert(game.to_string(), executable.to_string());
        settings.save()
    }

    pub fn clear_running(game: &str) -> Result<(), StatusError> {
        let mut settings = SettingsDocument::load()?;
        settings.running_games.remove(game);
        settings.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_thread_count_is_four() {
        let settings = SettingsDocument::default();
        assert_eq!(settings.thread_count, 4);
    }

    #[test]
    fn unknown_front_end_fields_survive_a_round_trip() {
        let raw = r#"{"downloadDirectory":"/games","threadCount":4,"theme":"dark","runningGames":{}}"#;
        let settings: SettingsDocument = serde_json::from_str(raw).unwrap();
        let back = serde_json::to_string(&settings).unwrap();
        assert!(back.contains("\"theme\":\"dark\""));
    }

    #[test]
    fn thread_count_or_falls_back_when_unset() {
        let mut settings = SettingsDocument::default();
        settings.thread_count = 0;
        assert_eq!(settings.thread_count_or(5), 5);
    }
}
