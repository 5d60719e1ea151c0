use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::atomic_write::{read_json, write_atomic};
use crate::error::StatusError;
use crate::paths::status_document_path;

/// The acquisition sub-document, present on a [`StatusDocument`] only
/// while a game is being downloaded, extracted or updated. Removed
/// entirely once installation completes successfully.
///
/// Field spelling is `downloadingData` (camelCase) uniformly; an older
/// lowercase `downloadingdata` spelling is not read or written here.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DownloadingData {
    #[serde(default)]
    pub downloading: bool,
    #[serde(default)]
    pub extracting: bool,
    #[serde(default)]
    pub updating: bool,
    #[serde(default)]
    pub waiting: bool,
    #[serde(default = "zero_progress")]
    pub progress_completed: String,
    #[serde(default)]
    pub progress_download_speeds: String,
    #[serde(default)]
    pub time_until_complete: String,
    #[serde(default)]
    pub error: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

fn zero_progress() -> String {
    "0.00".to_string()
}

impl DownloadingData {
    /// The stub written the moment a worker first targets a game
    /// directory: every phase flag false except `downloading`.
    pub fn starting() -> Self {
        DownloadingData {
            downloading: true,
            progress_completed: zero_progress(),
            progress_download_speeds: "0.00 B/s".to_string(),
            time_until_complete: "calculating...".to_string(),
            ..Default::default()
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        DownloadingData {
            error: true,
            message: Some(message.into()),
            ..Default::default()
        }
    }
}

/// The per-game status document at `<install_dir>/<game>/<game>.ascendara.json`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatusDocument {
    pub game: String,
    #[serde(default)]
    pub online: bool,
    #[serde(default)]
    pub dlc: bool,
    #[serde(default)]
    pub is_vr: bool,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub executable: String,
    #[serde(default)]
    pub is_running: bool,
    #[serde(default)]
    pub launch_count: u64,
    #[serde(default)]
    pub play_time: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downloading_data: Option<DownloadingData>,
    /// Front-end-owned fields this workspace never writes, preserved
    /// untouched across a load/mutate/save round-trip.
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

impl StatusDocument {
    /// The document created by whichever worker first targets a game
    /// directory, with a `downloadingData` stub marking the fetch as
    /// just beginning.
    pub fn new_acquiring(
        game: &str,
        online: bool,
        dlc: bool,
        is_vr: bool,
        version: &str,
        size: &str,
        executable: &str,
    ) -> Self {
        StatusDocument {
            game: game.to_string(),
            online,
            dlc,
            is_vr,
            version: version.to_string(),
            size: size.to_string(),
            executable: executable.to_string(),
            is_running: false,
            launch_count: 0,
            play_time: 0,
            run_error: None,
            downloading_data: Some(DownloadingData::starting()),
            other: serde_json::Map::new(),
        }
    }

    pub fn load(download_dir: &Path, game: &str) -> Result<Self, StatusError> {
        read_json(&status_document_path(download_dir, game))
    }

    pub fn save(&self, download_dir: &Path) -> Result<(), StatusError> {
        write_atomic(&status_document_path(download_dir, &self.game), self)
    }

    /// On fatal acquisition failure: blank most fields and replace
    /// `downloadingData` with `{error: true, message}`. The document is
    /// kept (not deleted) for diagnostic display in the front end.
    pub fn mark_acquisition_failed(&mut self, message: impl Into<String>) {
        self.online = false;
        self.dlc = false;
        self.is_running = false;
        self.version.clear();
        self.executable.clear();
        self.downloading_data = Some(DownloadingData::error(message));
    }

    /// Installation completed: the acquisition sub-document is dropped
    /// entirely.
    pub fn mark_installed(&mut self) {
        self.downloading_data = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquiring_document_serializes_camelcase_fields() {
        let doc = StatusDocument::new_acquiring(
            "My Game", true, false, false, "1.0", "12 GB", "/games/My Game/My Game.exe",
        );
        let json = serde_json::to_string(&doc).unwrap();
        assert!(json.contains("\"isVr\""));
        assert!(json.contains("\"downloadingData\""));
        assert!(json.contains("\"downloading\":true"));
        assert!(!json.contains("runError"));
    }

    #[test]
    fn unknown_fields_are_tolerated_on_read() {
        let raw = r#"{"game":"x","unknownField":123}"#;
        let doc: StatusDocument = serde_json::from_str(raw).unwrap();
        assert_eq!(doc.game, "x");
        assert!(!doc.is_running);
    }

    #[test]
    fn unknown_front_end_fields_survive_a_round_trip() {
        let raw = r#"{"game":"x","coverImage":"cover.png","favorited":true}"#;
        let doc: StatusDocument = serde_json::from_str(raw).unwrap();
        let back = serde_json::to_string(&doc).unwrap();
        assert!(back.contains("\"coverImage\":\"cover.png\""));
        assert!(back.contains("\"favorited\":true"));
    }

    #[test]
    fn acquisition_failure_blanks_fields_and_keeps_document() {
        let mut doc = StatusDocument::new_acquiring("g", true, false, false, "1.0", "1 GB", "e");
        doc.mark_acquisition_failed("connection reset");
        assert!(doc.version.is_empty());
        assert!(doc.executable.is_empty());
        let data = doc.downloading_data.unwrap();
        assert!(data.error);
        assert_eq!(data.message.as_deref(), Some("connection reset"));
    }

    #[test]
    fn install_removes_downloading_data() {
        let mut doc = StatusDocument::new_acquiring("g", true, false, false, "1.0", "1 GB", "e");
        assert!(doc.downloading_data.is_some());
        doc.mark_installed();
        assert!(doc.downloading_data.is_none());
    }
}
