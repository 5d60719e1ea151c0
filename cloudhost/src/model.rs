use std::collections::HashMap;

use serde::Deserialize;

/// The envelope every `/contents/<id>` response is wrapped in.
#[derive(Deserialize, Debug)]
pub struct ContentsEnvelope {
    pub status: String,
    #[serde(default)]
    pub data: Option<ContentNode>,
}

/// A single node in the host's content tree: either a folder (carrying
/// `children`/`childrenIds`) or a file (carrying `link`).
#[derive(Deserialize, Debug, Clone)]
pub struct ContentNode {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub children: HashMap<String, ContentNode>,
    #[serde(default, rename = "childrenIds")]
    pub children_ids: Vec<String>,
    #[serde(default)]
    pub link: Option<String>,
}

impl ContentNode {
    pub fn is_folder(&self) -> bool {
        self.kind == "folder"
    }
}

/// A resolved file entry queued for sequential download, keyed by its
/// content id in [`crate::resolver::resolve_tree`]'s flat map (spec.md
/// §4.3 step 5).
#[derive(Debug, Clone)]
pub struct FileRecord {
    /// Directory path relative to the install root, mirroring the folder
    /// hierarchy walked to reach this file.
    pub path: String,
    pub filename: String,
    pub link: String,
}

#[derive(Deserialize, Debug)]
pub struct AccountResponse {
    pub status: String,
    pub data: AccountData,
}

#[derive(Deserialize, Debug)]
pub struct AccountData {
    pub token: String,
}
