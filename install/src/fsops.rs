use std::io;
use std::path::Path;

/// Moves every entry of `src` into `dest`, merging into existing
/// directories and overwriting colliding files. Used by both the
/// un-nesting pass and `retryfolder` to lift a wrapper directory's
/// contents up without losing anything already present at the
/// destination.
pub(crate) fn merge_move(src: &Path, dest: &Path) -> io::Result<()> {
    std::fs::create_dir_all(dest)?;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let target = dest.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            merge_move(&entry.path(), &target)?;
        } else {
            if target.exists() {
                std::fs::remove_file(&target)?;
            }
            std::fs::rename(entry.path(), &target)?;
        }
    }
    Ok(())
}

/// Returns the single subdirectory of `dir` if it contains exactly one
/// entry and that entry is a directory.
pub(crate) fn single_entry_dir(dir: &Path) -> io::Result<Option<std::path::PathBuf>> {
    let mut entries = std::fs::read_dir(dir)?;
    let first = entries.next().transpose()?;
    let second = entries.next();
    match (first, second) {
        (Some(e), None) if e.file_type()?.is_dir() => Ok(Some(e.path())),
        _ => Ok(None),
    }
}

pub(crate) fn names_match(path: &Path, game: &str) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.eq_ignore_ascii_case(game))
        .unwrap_or(false)
}
