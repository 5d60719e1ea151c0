use std::path::Path;

use log::info;

use crate::error::InstallError;
use crate::fsops::{merge_move, names_match, single_entry_dir};

/// Un-nests publisher-packaged layouts (spec.md §4.4 step 4): if the
/// install directory's only entry is a directory matching `game`
/// (case-insensitive), or a directory whose only entry in turn matches
/// `game` (the `<opaque-id>/<game>` shape some hosts wrap releases in),
/// that inner directory's contents are lifted to the install root and
/// the wrapper is removed.
///
/// A no-op (not an error) when neither shape is present, since by far
/// most archives already extract flat.
pub fn unnest(root: &Path, game: &str) -> Result<(), InstallError> {
    let Some(top) = single_entry_dir(root)? else {
        return Ok(());
    };

    let source = if names_match(&top, game) {
        top.clone()
    } else if let Some(inner) = single_entry_dir(&top)? {
        if names_match(&inner, game) {
            inner
        } else {
            return Ok(());
        }
    } else {
        return Ok(());
    };

    info!("un-nesting {} into {}", source.display(), root.display());
    merge_move(&source, root)?;
    std::fs::remove_dir_all(&top)?;
    Ok(())
}
