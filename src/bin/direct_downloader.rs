//! The Direct Downloader worker (spec.md §2, §4.2, §6): fetches a single
//! archive by HTTP(S) URL, extracts it, and normalizes its layout.
//!
//! `link game online dlc isVr version size download_dir [--withNotification <theme>]`

use std::path::PathBuf;
use std::process::{Command, Stdio};

use clap::Parser;
use crashreport::WorkerError;
use log::{error, info};
use netio::{DownloadError, ProgressTracker};
use status::{SettingsDocument, StatusDocument};
use utils::cli::parse_spec_bool;

const RETRY_BUDGET: u32 = 3;
const DEFAULT_THREAD_COUNT: u32 = 4;

#[derive(Parser, Debug)]
#[command(name = "direct-downloader")]
struct Args {
    link: String,
    game: String,
    #[arg(value_parser = parse_spec_bool)]
    online: bool,
    #[arg(value_parser = parse_spec_bool)]
    dlc: bool,
    #[arg(value_parser = parse_spec_bool)]
    is_vr: bool,
    version: String,
    size: String,
    download_dir: PathBuf,
    #[arg(long = "withNotification")]
    with_notification: Option<String>,
}

fn main() {
    let args = Args::parse();
    utils::logging::init("maindownloader");

    if let Err(worker_error) = run(&args) {
        error!("{worker_error}");
        crashreport::report_error(&worker_error);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), WorkerError> {
    let game = status::paths::sanitize_folder_name(&args.game);
    let install_dir = status::paths::install_dir(&args.download_dir, &game);
    std::fs::create_dir_all(&install_dir)
        .map_err(|e| WorkerError::DownloaderInitError(e.to_string()))?;

    // The original downloader records `<game>.exe` under the install
    // directory as the executable path at creation time, before the
    // archive's actual layout is known; this workspace keeps that same
    // assumption rather than inventing an executable-discovery step the
    // source never had.
    let executable = install_dir.join(format!("{game}.exe"));
    let doc = StatusDocument::new_acquiring(
        &game,
        args.online,
        args.dlc,
        args.is_vr,
        &args.version,
        &args.size,
        &executable.to_string_lossy(),
    );
    doc.save(&args.download_dir)
        .map_err(|e| WorkerError::DownloaderSettingsIoError(e.to_string()))?;

    let settings = SettingsDocument::load().map_err(|e| WorkerError::DownloaderSettingsIoError(e.to_string()))?;
    let worker_count = settings.thread_count_or(DEFAULT_THREAD_COUNT);

    let probe = netio::probe(&args.link).map_err(|e| download_failed(&doc, &args.download_dir, e))?;

    let target_path = install_dir.join(format!("{game}.{}", probe.extension));
    let tracker = ProgressTracker::new(probe.total, doc, args.download_dir.clone());

    if let Err(e) = netio::run(
        &args.link,
        &target_path,
        probe.total,
        worker_count,
        RETRY_BUDGET,
        &tracker,
    ) {
        return Err(fail_acquisition(tracker, e));
    }

    let doc = tracker.into_document();
    install::run_pipeline(&install_dir, &args.download_dir, doc).map_err(|e| {
        error!("extraction failed for {game}: {e}");
        let mut failed = StatusDocument::load(&args.download_dir, &game)
            .unwrap_or_else(|_| StatusDocument::new_acquiring(&game, false, false, false, "", "", ""));
        failed.mark_acquisition_failed(e.to_string());
        let _ = failed.save(&args.download_dir);
        WorkerError::DownloaderExtractError(e.to_string())
    })?;

    if let Some(theme) = &args.with_notification {
        spawn_notification(theme, &format!("{game} has finished downloading"));
    }

    info!("{game} acquisition complete");
    Ok(())
}

/// The probe (HEAD) call failed before any bytes moved: persist the
/// failure straight onto the freshly-created document.
fn download_failed(doc: &StatusDocument, download_dir: &std::path::Path, e: DownloadError) -> WorkerError {
    let mut doc = doc.clone();
    doc.mark_acquisition_failed(e.to_string());
    let _ = doc.save(download_dir);
    classify(e)
}

fn fail_acquisition(tracker: ProgressTracker, e: DownloadError) -> WorkerError {
    let message = e.to_string();
    tracker.mutate_document(|doc| doc.mark_acquisition_failed(message.clone()));
    classify(e)
}

fn classify(e: DownloadError) -> WorkerError {
    match e {
        DownloadError::ContentTypeError(_) => WorkerError::Network(e.to_string()),
        DownloadError::VerifyFailed { .. } => WorkerError::DownloaderVerifyError(e.to_string()),
        DownloadError::RetriesExhausted(_) => WorkerError::DownloaderVerifyError(e.to_string()),
        DownloadError::Network(_) => WorkerError::Network(e.to_string()),
        DownloadError::Io(_) => WorkerError::DownloaderCleanupError(e.to_string()),
    }
}

/// Hands off to the Notification Helper (spec.md §2, peripheral, no
/// shared state). Failure to spawn it is logged, not fatal.
fn spawn_notification(theme: &str, message: &str) {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()));
    let Some(exe_dir) = exe_dir else { return };
    let binary = exe_dir.join(format!("notification-helper{}", std::env::consts::EXE_SUFFIX));

    let result = Command::new(binary)
        .arg("--theme")
        .arg(theme)
        .arg("--title")
        .arg("Ascendara")
        .arg("--message")
        .arg(message)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();

    if let Err(e) = result {
        error!("failed to spawn notification helper: {e}");
    }
}
