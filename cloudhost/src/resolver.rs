//! Recursive content-tree resolution against the host's `/contents/<id>`
//! endpoint (spec.md §4.3).

use std::collections::VecDeque;

use netio::client::HTTP_CLIENT;
use sha2::{Digest, Sha256};

use crate::error::CloudHostError;
use crate::model::{ContentNode, ContentsEnvelope, FileRecord};
use crate::token;

const CONTENTS_ENDPOINT: &str = "https://api.gofile.io/contents";

/// Accepts both `https://host/d/<id>` and `//host/d/<id>` prefix variants
/// (spec.md §4.3 step 3), prepending `https:` when the scheme is elided.
pub fn normalize_share_url(url: &str) -> String {
    if let Some(stripped) = url.strip_prefix("//") {
        format!("https://{stripped}")
    } else {
        url.to_string()
    }
}

/// The share's content id is its URL's last path component.
pub fn content_id_from_url(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or("")
}

/// Hex SHA-256 of a UTF-8 password, transmitted as the `password` query
/// parameter when the share is protected.
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Walks the share's content tree breadth-first starting at `content_id`,
/// returning a flat, order-preserved list of files to download. Folder
/// names become subdirectory path components; folders are never
/// downloaded themselves, only recursed into.
pub fn resolve_tree(content_id: &str, password: Option<&str>) -> Result<Vec<FileRecord>, CloudHostError> {
    let mut files = Vec::new();
    let mut queue: VecDeque<(String, String)> = VecDeque::new();
    queue.push_back((String::new(), content_id.to_string()));

    while let Some((path, id)) = queue.pop_front() {
        let node = fetch_contents(&id, password)?;

        if node.is_folder() {
            let folder_path = if path.is_empty() {
                node.name.clone()
            } else {
                format!("{path}/{}", node.name)
            };

            for child_id in &node.children_ids {
                let Some(child) = node.children.get(child_id) else {
                    continue;
                };
                if child.is_folder() {
                    queue.push_back((folder_path.clone(), child_id.clone()));
                } else {
                    files.push(FileRecord {
                        path: folder_path.clone(),
                        filename: child.name.clone(),
                        link: child.link.clone().unwrap_or_default(),
                    });
                }
            }
        } else {
            files.push(FileRecord {
                path,
                filename: node.name.clone(),
                link: node.link.clone().unwrap_or_default(),
            });
        }
    }

    Ok(files)
}

fn fetch_contents(content_id: &str, password: Option<&str>) -> Result<ContentNode, CloudHostError> {
    let wt = token::wt()?;
    let bearer = token::token()?;

    let mut url = format!("{CONTENTS_ENDPOINT}/{content_id}?wt={wt}&cache=true");
    if let Some(password) = password {
        url.push_str(&format!("&password={}", hash_password(password)));
    }

    let response: ContentsEnvelope = HTTP_CLIENT
        .get(&url)
        .header("Authorization", format!("Bearer {bearer}"))
        .send()?
        .json()?;

    if response.status != "ok" {
        return Err(CloudHostError::ApiError(format!(
            "failed to resolve content {content_id}"
        )));
    }

    response
        .data
        .ok_or_else(|| CloudHostError::ApiError("response carried no data field".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_protocol_relative_urls() {
        assert_eq!(normalize_share_url("//gofile.io/d/ABCD"), "https://gofile.io/d/ABCD");
        assert_eq!(
            normalize_share_url("https://gofile.io/d/ABCD"),
            "https://gofile.io/d/ABCD"
        );
    }

    #[test]
    fn content_id_is_the_last_path_segment() {
        assert_eq!(content_id_from_url("https://gofile.io/d/ABCD"), "ABCD");
    }

    #[test]
    fn password_hash_matches_scenario_d() {
        let hash = hash_password("hunter2");
        assert!(hash.starts_with("f52fbd"));
    }
}
