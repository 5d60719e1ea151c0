//! Top-level orchestration tying the resolver, per-file downloader and
//! aggregate progress together (spec.md §4.3 steps 6-10).

use std::path::Path;

use log::info;
use status::StatusDocument;

use crate::cancel::CancelFlag;
use crate::download::{download_file, probe_size};
use crate::error::CloudHostError;
use crate::progress::AggregateProgress;
use crate::resolver::{content_id_from_url, normalize_share_url, resolve_tree};
use crate::token;

/// Resolves `share_url` into a file tree and downloads every file
/// sequentially into `install_dir`, persisting progress through `doc`.
/// Returns the final (possibly already-mutated) status document so the
/// caller can run extraction against it next.
pub fn download_share(
    share_url: &str,
    password: Option<&str>,
    install_dir: &Path,
    download_dir: &Path,
    doc: StatusDocument,
) -> Result<StatusDocument, CloudHostError> {
    let normalized = normalize_share_url(share_url);
    let content_id = content_id_from_url(&normalized);

    let bearer = token::token()?.to_string();

    let files = resolve_tree(content_id, password)?;
    info!("resolved {} file(s) from share {content_id}", files.len());

    let mut total = 0u64;
    for file in &files {
        total += probe_size(file, &bearer)?;
    }

    let cancel = CancelFlag::new();
    cancel.install_signal_handler();

    let progress = AggregateProgress::new(total, doc, download_dir.to_path_buf());

    for file in &files {
        let key = format!("{}/{}", file.path, file.filename);
        if let Err(e) = download_file(file, install_dir, &bearer, &cancel, &progress, &key) {
            if matches!(e, CloudHostError::Cancelled) {
                return Err(CloudHostError::Cancelled);
            }
            return Err(e);
        }
    }

    progress.flush();
    Ok(progress.into_document())
}
