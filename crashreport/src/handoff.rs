use std::process::{Command, Stdio};
use std::sync::{Mutex, OnceLock};

use log::{error, warn};

use crate::taxonomy::{ToolId, WorkerError};

/// The arguments the crash reporter binary is spawned with: a tool id,
/// a numeric error code from the fixed taxonomy, and a free-text message.
#[derive(Debug, Clone)]
pub struct CrashInfo {
    pub tool_id: ToolId,
    pub code: u32,
    pub message: String,
}

static CRASH_INFO: OnceLock<Mutex<Option<CrashInfo>>> = OnceLock::new();
static HOOK_INSTALLED: OnceLock<()> = OnceLock::new();

fn crash_info_slot() -> &'static Mutex<Option<CrashInfo>> {
    CRASH_INFO.get_or_init(|| Mutex::new(None))
}

/// Registers an at-exit hook that spawns the crash reporter with the most
/// recently recorded [`CrashInfo`] on panic. Further calls to
/// [`report`]/[`report_error`] overwrite the payload but this hook is
/// installed at most once, per spec.md's register-once semantics.
fn ensure_hook_installed() {
    HOOK_INSTALLED.get_or_init(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            previous(info);
            if let Some(crash_info) = crash_info_slot()
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .clone()
            {
                spawn_reporter(&crash_info);
            } else {
                spawn_reporter(&CrashInfo {
                    tool_id: ToolId::TopLevel,
                    code: WorkerError::Unhandled(info.to_string()).code(),
                    message: info.to_string(),
                });
            }
        }));
    });
}

/// Records `info` as the payload to hand off to the crash reporter and
/// ensures the panic hook is installed. Call this from every fatal-error
/// exit path, not only from inside a panic: most fatal exits in a CLI
/// worker return `Err` and call `std::process::exit` rather than panic.
pub fn report(info: CrashInfo) {
    ensure_hook_installed();
    *crash_info_slot()
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(info.clone());
    spawn_reporter(&info);
}

/// Convenience wrapper translating a [`WorkerError`] into a [`CrashInfo`]
/// before handing off.
pub fn report_error(error: &WorkerError) {
    report(CrashInfo {
        tool_id: error.tool_id(),
        code: error.code(),
        message: error.message().to_string(),
    });
}

/// Locates and spawns the crash-reporter binary detached, with its
/// console hidden. Failure to locate it is logged but never prevents the
/// calling worker from exiting.
fn spawn_reporter(info: &CrashInfo) {
    let reporter = match reporter_path() {
        Some(path) => path,
        None => {
            warn!("crash reporter binary not found, skipping hand-off for {info:?}");
            return;
        }
    };

    let mut command = Command::new(reporter);
    command
        .arg(info.tool_id.as_str())
        .arg(info.code.to_string())
        .arg(&info.message)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;
        const CREATE_NO_WINDOW: u32 = 0x0800_0000;
        const DETACHED_PROCESS: u32 = 0x0000_0008;
        command.creation_flags(CREATE_NO_WINDOW | DETACHED_PROCESS);
    }

    if let Err(e) = command.spawn() {
        error!("failed to spawn crash reporter: {e}");
    }
}

fn reporter_path() -> Option<std::path::PathBuf> {
    let exe_dir = std::env::current_exe().ok()?.parent()?.to_path_buf();
    let candidate = exe_dir.join(format!(
        "ascendara-crashreporter{}",
        std::env::consts::EXE_SUFFIX
    ));
    if candidate.exists() {
        Some(candidate)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_reporter_does_not_panic() {
        // reporter_path() will not resolve in the test sandbox; report()
        // must be a no-op rather than propagate an error.
        report(CrashInfo {
            tool_id: ToolId::TopLevel,
            code: 1000,
            message: "test".into(),
        });
    }
}
