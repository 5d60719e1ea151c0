//! Spawn-and-monitor protocol (spec.md §4.5 steps 2-8): launches the
//! executable as a detached child via `shared_child`, generalizing the
//! reference app's `process::process_manager::ProcessManager` (which
//! spawns through `SharedChild` and waits on a background thread) to the
//! simpler single-game lifecycle this workspace's game handler owns.

use std::path::Path;
use std::process::Command;
use std::thread::sleep;
use std::time::{Duration, Instant};

use log::{info, warn};
use shared_child::SharedChild;

use crate::error::RunGameError;
use crate::presence::PresenceClient;
use crate::target::GameTarget;

const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Runs the full launch-and-monitor protocol against `executable`,
/// crediting play time and launch count on `target` and clearing running
/// state on every exit path including an early return here.
pub fn launch_and_monitor(
    executable: &Path,
    target: &GameTarget,
    presence: &mut dyn PresenceClient,
) -> Result<(), RunGameError> {
    // Step 2.
    if !executable.is_file() {
        let message = "The exe file does not exist".to_string();
        target.set_run_error(&message);
        return Err(RunGameError::MissingExecutable(
            executable.display().to_string(),
        ));
    }

    // Step 3.
    target.mark_launch_attempt(executable)?;

    // Step 4: spawn detached so the handler's own lifetime is independent
    // of the game's.
    let child = match spawn_detached(executable) {
        Ok(child) => child,
        Err(e) => {
            warn!("failed to launch {}: {e}", executable.display());
            target.rollback_launch_attempt();
            return Err(RunGameError::LaunchFailure(e.to_string()));
        }
    };

    info!("launched {} (pid {})", executable.display(), child.id());
    presence.start(target.game_name());

    // Step 5: poll at ~1s cadence, crediting one play-second per full
    // tick the process is still alive when checked. A run that exits
    // before the first tick credits nothing at all, which is exactly the
    // "net 0" resolution spec.md §9 calls for — there is no decrement to
    // apply because nothing was ever added.
    let start = Instant::now();
    loop {
        sleep(POLL_INTERVAL);
        match child.try_wait() {
            Ok(Some(_status)) => break,
            Ok(None) => {
                if let Err(e) = target.add_play_second() {
                    warn!("failed to credit play time for {}: {e}", target.game_name());
                }
            }
            Err(e) => {
                warn!("failed to poll child process: {e}");
                break;
            }
        }
    }
    let elapsed = start.elapsed();
    info!(
        "{} exited after {:.1}s",
        target.game_name(),
        elapsed.as_secs_f64()
    );

    // Steps 7/8, on every exit path.
    target.clear_running();
    presence.clear();

    Ok(())
}

#[cfg(unix)]
fn spawn_detached(executable: &Path) -> std::io::Result<SharedChild> {
    use std::os::unix::process::CommandExt;

    let mut command = Command::new(executable);
    if let Some(dir) = executable.parent() {
        command.current_dir(dir);
    }
    unsafe {
        command.pre_exec(|| {
            // Move into our own session so the game's lifetime is
            // independent of the handler's (spec.md §4.5 step 4).
            if libc::setsid() == -1 {
                return Err(std::io::Error::last_os_error());
            }
            Ok(())
        });
    }
    SharedChild::spawn(&mut command)
}

#[cfg(windows)]
fn spawn_detached(executable: &Path) -> std::io::Result<SharedChild> {
    use std::os::windows::process::CommandExt;

    const CREATE_NEW_PROCESS_GROUP: u32 = 0x0000_0200;
    const DETACHED_PROCESS: u32 = 0x0000_0008;

    let mut command = Command::new(executable);
    if let Some(dir) = executable.parent() {
        command.current_dir(dir);
    }
    command.creation_flags(CREATE_NEW_PROCESS_GROUP | DETACHED_PROCESS);
    SharedChild::spawn(&mut command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presence::NoopPresence;
    use status::StatusDocument;
    use std::fs;

    fn setup_managed(dir: &Path, game: &str, exe_name: &str) -> std::path::PathBuf {
        let install_dir = dir.join(game);
        fs::create_dir_all(&install_dir).unwrap();
        let exe = install_dir.join(exe_name);
        let mut doc = StatusDocument::new_acquiring(
            game,
            true,
            false,
            false,
            "1.0",
            "1 GB",
            exe.to_str().unwrap(),
        );
        doc.mark_installed();
        doc.save(dir).unwrap();
        exe
    }

    #[test]
    fn missing_executable_sets_run_error_and_fails() {
        let dir = tempfile::tempdir().unwrap();
        let exe = setup_managed(dir.path(), "My Game", "missing.exe");
        let target = GameTarget::resolve(&exe, false).unwrap();
        let mut presence = NoopPresence;

        let result = launch_and_monitor(&exe, &target, &mut presence);

        assert!(matches!(result, Err(RunGameError::MissingExecutable(_))));
        let doc = StatusDocument::load(dir.path(), "My Game").unwrap();
        assert_eq!(doc.run_error.as_deref(), Some("The exe file does not exist"));
    }
}
