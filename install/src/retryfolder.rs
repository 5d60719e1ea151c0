use std::path::Path;

use log::info;

use crate::cleanup::remove_junk_files;
use crate::error::InstallError;
use crate::fsops::merge_move;

/// The standalone `retryfolder` entry point (spec.md §4.4 "Retry entry
/// point"): performs only the un-nesting step against a single named
/// candidate subdirectory of `root`, for when the front end's heuristic
/// detection in [`crate::unnest::unnest`] missed a layout it shouldn't
/// have (or the user points it at a name the heuristic doesn't cover).
///
/// Copies `candidate_name` to a temp location, removes the original,
/// then merges the copy back into `root` and purges `.url` files. Doing
/// the round trip through a temp directory rather than lifting in place
/// avoids ever renaming a directory into one of its own descendants.
///
/// The temp directory is allocated as a sibling *under* `root`, not the
/// OS temp directory: `merge_move` moves entries with `std::fs::rename`,
/// which fails with `EXDEV` across filesystems, and `root` is very
/// commonly on a different drive/filesystem than the OS temp directory.
/// This mirrors the original tool's own `retryfolder`, which creates its
/// scratch directory under `download_dir` for the same reason.
///
/// Idempotent: if `candidate_name` doesn't exist under `root` (already
/// un-nested by a prior run, or never present), this is a no-op.
pub fn retryfolder(root: &Path, candidate_name: &str) -> Result<(), InstallError> {
    let candidate = root.join(candidate_name);
    if !candidate.is_dir() {
        return Ok(());
    }

    let temp = tempfile::Builder::new().prefix("temp-").tempdir_in(root)?;
    merge_move(&candidate, temp.path())?;
    std::fs::remove_dir_all(&candidate)?;
    merge_move(temp.path(), root)?;
    remove_junk_files(root)?;

    info!("retried un-nesting of {candidate_name} under {}", root.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn lifts_the_named_candidate_and_purges_junk() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("My Game");
        fs::create_dir_all(nested.join("bin")).unwrap();
        fs::write(nested.join("bin/game.exe"), b"exe").unwrap();
        fs::write(nested.join("readme.txt"), b"hi").unwrap();

        retryfolder(dir.path(), "My Game").unwrap();

        assert!(dir.path().join("bin/game.exe").exists());
        assert!(!dir.path().join("readme.txt").exists());
        assert!(!dir.path().join("My Game").exists());
    }

    #[test]
    fn running_twice_is_identical_to_running_once() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("My Game");
        fs::create_dir_all(nested.join("bin")).unwrap();
        fs::write(nested.join("bin/game.exe"), b"exe").unwrap();

        retryfolder(dir.path(), "My Game").unwrap();
        let after_first: Vec<_> = walkdir::WalkDir::new(dir.path())
            .into_iter()
            .filter_map(Result::ok)
            .map(|e| e.path().to_path_buf())
            .collect();

        retryfolder(dir.path(), "My Game").unwrap();
        let after_second: Vec<_> = walkdir::WalkDir::new(dir.path())
            .into_iter()
            .filter_map(Result::ok)
            .map(|e| e.path().to_path_buf())
            .collect();

        assert_eq!(after_first, after_second);
    }
}
