use std::path::{Path, PathBuf};

use log::warn;
use status::{CollectionIndex, SettingsDocument, StatusDocument};

use crate::error::RunGameError;

/// The document a launch updates: a managed game's `StatusDocument`, or a
/// custom game's entry in the `CollectionIndex` (spec.md §4.5 step 1,
/// §3 CollectionIndex). Every mutation here reloads the owning document
/// fresh immediately before writing it back, the same discipline
/// `SettingsDocument::mark_running` uses, so a concurrent writer (the
/// front end toggling an unrelated field) is never clobbered by a stale
/// in-memory copy.
pub enum GameTarget {
    Managed { download_dir: PathBuf, game: String },
    Custom { download_dir: PathBuf, game: String },
}

impl GameTarget {
    pub fn game_name(&self) -> &str {
        match self {
            GameTarget::Managed { game, .. } | GameTarget::Custom { game, .. } => game,
        }
    }

    /// Resolves the document owning `executable`, per spec.md §4.5 step 1.
    /// For a managed game the status document lives alongside the
    /// executable (`<install_dir>/<game>.ascendara.json`, where `game` is
    /// the sanitized install directory's own name); for a custom game the
    /// executable path is looked up in `games.json` under the settings
    /// document's `downloadDirectory`.
    pub fn resolve(executable: &Path, is_custom: bool) -> Result<Self, RunGameError> {
        if is_custom {
            let settings = SettingsDocument::load()?;
            let download_dir = settings.download_dir();
            if download_dir.as_os_str().is_empty() {
                return Err(RunGameError::MissingDownloadDirectory);
            }
            let index = CollectionIndex::load(&download_dir)?;
            let entry = index
                .games
                .iter()
                .find(|g| Path::new(&g.executable) == executable)
                .ok_or_else(|| RunGameError::UnknownGame(executable.display().to_string()))?;
            Ok(GameTarget::Custom {
                download_dir,
                game: entry.game.clone(),
            })
        } else {
            let install_dir = executable
                .parent()
                .ok_or_else(|| RunGameError::UnknownGame(executable.display().to_string()))?;
            let game = install_dir
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or_else(|| RunGameError::UnknownGame(executable.display().to_string()))?
                .to_string();
            let download_dir = install_dir
                .parent()
                .ok_or_else(|| RunGameError::UnknownGame(executable.display().to_string()))?
                .to_path_buf();
            Ok(GameTarget::Managed { download_dir, game })
        }
    }

    /// Step 3: atomically increments `launchCount`, sets `isRunning`, and
    /// records the game in `SettingsDocument.runningGames`.
    pub fn mark_launch_attempt(&self, executable: &Path) -> Result<(), RunGameError> {
        self.bump_launch_document()?;
        SettingsDocument::mark_running(self.game_name(), &executable.display().to_string())?;
        Ok(())
    }

    /// The `StatusDocument`/`CollectionIndex` half of [`mark_launch_attempt`],
    /// split out so it can be exercised without touching the real,
    /// per-user `SettingsDocument` path.
    fn bump_launch_document(&self) -> Result<(), RunGameError> {
        match self {
            GameTarget::Managed { download_dir, game } => {
                let mut doc = StatusDocument::load(download_dir, game)?;
                doc.launch_count += 1;
                doc.is_running = true;
                doc.run_error = None;
                doc.save(download_dir)?;
            }
            GameTarget::Custom { download_dir, game } => {
                let mut index = CollectionIndex::load(download_dir)?;
                if let Some(entry) = index.find_mut(game) {
                    entry.launch_count += 1;
                    entry.is_running = true;
                }
                index.save(download_dir)?;
            }
        }
        Ok(())
    }

    /// Step 8: the launch "did not happen" from the user's perspective —
    /// reverses the `launchCount` bump and clears running state.
    pub fn rollback_launch_attempt(&self) {
        let game = self.game_name();
        let result = match self {
            GameTarget::Managed { download_dir, game } => {
                (|| -> Result<(), RunGameError> {
                    let mut doc = StatusDocument::load(download_dir, game)?;
                    doc.launch_count = doc.launch_count.saturating_sub(1);
                    doc.is_running = false;
                    doc.save(download_dir)?;
                    Ok(())
                })()
            }
            GameTarget::Custom { download_dir, game } => (|| -> Result<(), RunGameError> {
                let mut index = CollectionIndex::load(download_dir)?;
                if let Some(entry) = index.find_mut(game) {
                    entry.launch_count = entry.launch_count.saturating_sub(1);
                    entry.is_running = false;
                }
                index.save(download_dir)?;
                Ok(())
            })(),
        };
        if let Err(e) = result {
            warn!("failed to roll back launch attempt for {game}: {e}");
        }
        if let Err(e) = SettingsDocument::clear_running(game) {
            warn!("failed to clear runningGames entry for {game}: {e}");
        }
    }

    /// Step 5: credits one second of wall time to `playTime`.
    pub fn add_play_second(&self) -> Result<(), RunGameError> {
        match self {
            GameTarget::Managed { download_dir, game } => {
                let mut doc = StatusDocument::load(download_dir, game)?;
                doc.play_time += 1;
                doc.save(download_dir)?;
            }
            GameTarget::Custom { download_dir, game } => {
                let mut index = CollectionIndex::load(download_dir)?;
                if let Some(entry) = index.find_mut(game) {
                    entry.play_time += 1;
                }
                index.save(download_dir)?;
            }
        }
        Ok(())
    }

    /// Step 6: a run under one second nets no play-time change at all —
    /// the compensating decrement exists only because the source credits
    /// one second optimistically before the first poll; here `playTime`
    /// is only ever incremented after a full second elapses (see
    /// `rungame::process::monitor`), so there is nothing to undo.
    pub fn compensate_instant_exit(&self) {}

    /// Steps 7/8: clears `isRunning` in the owning document and removes
    /// the entry from `SettingsDocument.runningGames`, on every exit path.
    pub fn clear_running(&self) {
        let game = self.game_name();
        let result = match self {
            GameTarget::Managed { download_dir, game } => (|| -> Result<(), RunGameError> {
                let mut doc = StatusDocument::load(download_dir, game)?;
                doc.is_running = false;
                doc.save(download_dir)?;
                Ok(())
            })(),
            GameTarget::Custom { download_dir, game } => (|| -> Result<(), RunGameError> {
                let mut index = CollectionIndex::load(download_dir)?;
                if let Some(entry) = index.find_mut(game) {
                    entry.is_running = false;
                }
                index.save(download_dir)?;
                Ok(())
            })(),
        };
        if let Err(e) = result {
            warn!("failed to clear isRunning for {game}: {e}");
        }
        if let Err(e) = SettingsDocument::clear_running(game) {
            warn!("failed to clear runningGames entry for {game}: {e}");
        }
    }

    /// Step 2: surfaces a `runError` on the managed-game document. Custom
    /// games have no field for this in `games.json`, so the failure is
    /// only logged, matching the original tool's behavior.
    pub fn set_run_error(&self, message: &str) {
        match self {
            GameTarget::Managed { download_dir, game } => {
                let result = (|| -> Result<(), RunGameError> {
                    let mut doc = StatusDocument::load(download_dir, game)?;
                    doc.run_error = Some(message.to_string());
                    doc.save(download_dir)?;
                    Ok(())
                })();
                if let Err(e) = result {
                    warn!("failed to persist runError for {game}: {e}");
                }
            }
            GameTarget::Custom { game, .. } => {
                warn!("{game} (custom): {message}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn setup_managed(dir: &Path, game: &str) -> PathBuf {
        let install_dir = dir.join(game);
        fs::create_dir_all(&install_dir).unwrap();
        let exe = install_dir.join("game.exe");
        fs::write(&exe, b"exe").unwrap();
        let doc = StatusDocument::new_acquiring(game, true, false, false, "1.0", "1 GB", exe.to_str().unwrap());
        let mut doc = doc;
        doc.mark_installed();
        doc.save(dir).unwrap();
        exe
    }

    #[test]
    fn resolves_a_managed_game_from_its_executable_path() {
        let dir = tempfile::tempdir().unwrap();
        let exe = setup_managed(dir.path(), "My Game");

        let target = GameTarget::resolve(&exe, false).unwrap();
        assert_eq!(target.game_name(), "My Game");
    }

    #[test]
    fn launch_attempt_increments_count_and_sets_running() {
        let dir = tempfile::tempdir().unwrap();
        let exe = setup_managed(dir.path(), "My Game");
        let target = GameTarget::resolve(&exe, false).unwrap();

        target.bump_launch_document().unwrap();

        let doc = StatusDocument::load(dir.path(), "My Game").unwrap();
        assert_eq!(doc.launch_count, 1);
        assert!(doc.is_running);
    }

    #[test]
    fn add_play_second_increments_play_time() {
        let dir = tempfile::tempdir().unwrap();
        let exe = setup_managed(dir.path(), "My Game");
        let target = GameTarget::resolve(&exe, false).unwrap();

        target.add_play_second().unwrap();
        target.add_play_second().unwrap();

        let doc = StatusDocument::load(dir.path(), "My Game").unwrap();
        assert_eq!(doc.play_time, 2);
    }

    #[test]
    fn set_run_error_persists_on_the_managed_document() {
        let dir = tempfile::tempdir().unwrap();
        let exe = setup_managed(dir.path(), "My Game");
        let target = GameTarget::resolve(&exe, false).unwrap();

        target.set_run_error("the exe file does not exist");

        let doc = StatusDocument::load(dir.path(), "My Game").unwrap();
        assert_eq!(doc.run_error.as_deref(), Some("the exe file does not exist"));
    }
}
