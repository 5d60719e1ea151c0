use std::path::Path;

use log::debug;
use walkdir::WalkDir;

use crate::error::InstallError;

/// Deletes extracted `.url` shortcut files and `.txt` readme files at any
/// depth under `root` (spec.md §4.4 step 3). Publisher archives routinely
/// ship a `Support the developers.url` or `README.txt` alongside the game;
/// neither belongs in the final layout.
pub fn remove_junk_files(root: &Path) -> Result<(), InstallError> {
    let mut victims = Vec::new();
    for entry in WalkDir::new(root).into_iter().filter_map(Result::ok) {
        if !entry.file_type().is_file() {
            continue;
        }
        let ext = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        if matches!(ext.as_deref(), Some("url") | Some("txt")) {
            victims.push(entry.path().to_path_buf());
        }
    }

    for path in victims {
        debug!("removing junk file {}", path.display());
        std::fs::remove_file(&path)?;
    }

    Ok(())
}

/// Prunes empty directories under `root`, bottom-up, except any named
/// `_CommonRedist` (spec.md §4.4 step 5): these may legitimately be left
/// empty after a bundled redistributable installer (vcredist, DirectX)
/// runs and deletes its own payload.
pub fn prune_empty_dirs(root: &Path) -> Result<(), InstallError> {
    let mut dirs: Vec<_> = WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_dir())
        .map(|e| e.path().to_path_buf())
        .collect();

    // Deepest first so a directory that becomes empty only after its
    // child was pruned is itself pruned in the same pass.
    dirs.sort_by_key(|p| std::cmp::Reverse(p.components().count()));

    for dir in dirs {
        if dir == root {
            continue;
        }
        if dir.file_name().and_then(|n| n.to_str()) == Some("_CommonRedist") {
            continue;
        }
        let is_empty = std::fs::read_dir(&dir)?.next().is_none();
        if is_empty {
            debug!("pruning empty directory {}", dir.display());
            std::fs::remove_dir(&dir)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn removes_url_and_txt_files_at_any_depth() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Support us.url"), b"[InternetShortcut]").unwrap();
        fs::create_dir_all(dir.path().join("docs")).unwrap();
        fs::write(dir.path().join("docs/readme.txt"), b"hi").unwrap();
        fs::write(dir.path().join("docs/manual.pdf"), b"keep").unwrap();

        remove_junk_files(dir.path()).unwrap();

        assert!(!dir.path().join("Support us.url").exists());
        assert!(!dir.path().join("docs/readme.txt").exists());
        assert!(dir.path().join("docs/manual.pdf").exists());
    }

    #[test]
    fn prunes_nested_empty_directories_but_keeps_common_redist() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a/b/c")).unwrap();
        fs::create_dir_all(dir.path().join("_CommonRedist")).unwrap();
        fs::write(dir.path().join("game.exe"), b"exe").unwrap();

        prune_empty_dirs(dir.path()).unwrap();

        assert!(!dir.path().join("a").exists());
        assert!(dir.path().join("_CommonRedist").exists());
        assert!(dir.path().join("game.exe").exists());
    }

    #[test]
    fn a_directory_holding_only_common_redist_is_not_pruned() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("_CommonRedist")).unwrap();

        prune_empty_dirs(dir.path()).unwrap();

        assert!(dir.path().join("_CommonRedist").exists());
    }
}
