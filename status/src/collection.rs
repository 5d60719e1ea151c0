use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::atomic_write::{read_json, write_atomic};
use crate::error::StatusError;
use crate::paths::collection_index_path;

/// One entry in `games.json` — a user-added ("custom") game whose
/// installer this system did not produce, tracked only for play-time
/// and launch-state bookkeeping by the game handler.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CustomGameEntry {
    pub game: String,
    #[serde(default)]
    pub executable: String,
    #[serde(default)]
    pub play_time: u64,
    #[serde(default)]
    pub launch_count: u64,
    #[serde(default)]
    pub is_running: bool,
}

/// The sibling document `<download_dir>/games.json`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct CollectionIndex {
    #[serde(default)]
    pub games: Vec<CustomGameEntry>,
    /// Front-end-owned fields this workspace never writes, preserved
    /// untouched across a load/mutate/save round-trip.
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

impl CollectionIndex {
    pub fn load(download_dir: &Path) -> Result<Self, StatusError> {
        let path = collection_index_path(download_dir);
        if !path.exists() {
            return Ok(CollectionIndex::default());
        }
        read_json(&path)
    }

    pub fn save(&self, download_dir: &Path) -> Result<(), StatusError> {
        write_atomic(&collection_index_path(download_dir), self)
    }

    pub fn find(&self, game: &str) -> Option<&CustomGameEntry> {
        self.games.iter().find(|g| g.game == game)
    }

    pub fn find_mut(&mut self, game: &str) -> Option<&mut CustomGameEntry> {
        self.games.iter_mut().find(|g| g.game == game)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_collection_index_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let index = CollectionIndex::load(dir.path()).unwrap();
        assert!(index.games.is_empty());
    }

    #[test]
    fn round_trips_custom_entries() {
        let dir = tempfile::tempdir().unwrap();
        let mut index = CollectionIndex::default();
        index.games.push(CustomGameEntry {
            game: "Emulated Classic".into(),
            executable: "/games/Emulated Classic/run.exe".into(),
            play_time: 0,
            launch_count: 0,
            is_running: false,
        });
        index.save(dir.path()).unwrap();

        let reloaded = CollectionIndex::load(dir.path()).unwrap();
        assert_eq!(reloaded.find("Emulated Classic").unwrap().executable, "/games/Emulated Classic/run.exe");
    }

    #[test]
    fn unknown_front_end_fields_survive_a_round_trip() {
        let raw = r#"{"games":[],"sortOrder":"alphabetical"}"#;
        let index: CollectionIndex = serde_json::from_str(raw).unwrap();
        let back = serde_json::to_string(&index).unwrap();
        assert!(back.contains("\"sortOrder\":\"alphabetical\""));
    }
}
