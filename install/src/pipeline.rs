use std::path::Path;

use log::{info, warn};
use status::StatusDocument;

use crate::archives::extract_all_archives;
use crate::cleanup::{prune_empty_dirs, remove_junk_files};
use crate::error::InstallError;
use crate::unnest::unnest;

/// Runs the full extraction and layout-normalization pipeline
/// (spec.md §4.4) against a completed download, mutating and persisting
/// `doc` as it goes: `extracting` is raised before work starts and
/// `downloadingData` is removed entirely once installation succeeds.
pub fn run(
    install_dir: &Path,
    download_dir: &Path,
    mut doc: StatusDocument,
) -> Result<StatusDocument, InstallError> {
    if let Some(data) = doc.downloading_data.as_mut() {
        data.downloading = false;
        data.extracting = true;
    }
    let game = doc.game.clone();
    if let Err(e) = doc.save(download_dir) {
        warn!("failed to persist extracting status for {game}: {e}");
    }

    extract_all_archives(install_dir)?;
    remove_junk_files(install_dir)?;
    unnest(install_dir, &game)?;
    prune_empty_dirs(install_dir)?;

    doc.mark_installed();
    if let Err(e) = doc.save(download_dir) {
        warn!("failed to persist installed status for {game}: {e}");
    }

    info!("{game} installed to {}", install_dir.display());
    Ok(doc)
}
