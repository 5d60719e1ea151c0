//! The Host Helper worker (spec.md §2, §4.3, §6): resolves a content-host
//! share URL into a file tree, downloads each file sequentially, extracts,
//! and normalizes layout.
//!
//! `url game online dlc isVr version size download_dir [--password <p>] [--withNotification <theme>]`

use std::path::PathBuf;
use std::process::{Command, Stdio};

use clap::Parser;
use cloudhost::CloudHostError;
use crashreport::WorkerError;
use log::{error, info};
use status::StatusDocument;
use utils::cli::parse_spec_bool;

#[derive(Parser, Debug)]
#[command(name = "host-helper")]
struct Args {
    url: String,
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
    #[arg(long)]
    password: Option<String>,
    #[arg(long = "withNotification")]
    with_notification: Option<String>,
}

fn main() {
    let args = Args::parse();
    utils::logging::init("gofilehelper");

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
        .map_err(|e| WorkerError::HostFileProcessingError(e.to_string()))?;

    // Same assumption the direct downloader makes: the executable is
    // recorded as `<game>.exe` under the install directory at creation
    // time, matching the original tool's own eager (and occasionally
    // wrong) guess rather than adding an executable-discovery step.
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
        .map_err(|e| WorkerError::HostFileProcessingError(e.to_string()))?;

    let doc = match cloudhost::download_share(
        &args.url,
        args.password.as_deref(),
        &install_dir,
        &args.download_dir,
        doc,
    ) {
        Ok(doc) => doc,
        Err(CloudHostError::Cancelled) => {
            info!("{game} acquisition cancelled by signal");
            std::process::exit(1);
        }
        Err(e) => {
            let message = e.to_string();
            let mut failed = StatusDocument::load(&args.download_dir, &game)
                .unwrap_or_else(|_| StatusDocument::new_acquiring(&game, false, false, false, "", "", ""));
            failed.mark_acquisition_failed(message.clone());
            let _ = failed.save(&args.download_dir);
            return Err(classify(e));
        }
    };

    install::run_pipeline(&install_dir, &args.download_dir, doc).map_err(|e| {
        error!("extraction failed for {game}: {e}");
        let mut failed = StatusDocument::load(&args.download_dir, &game)
            .unwrap_or_else(|_| StatusDocument::new_acquiring(&game, false, false, false, "", "", ""));
        failed.mark_acquisition_failed(e.to_string());
        let _ = failed.save(&args.download_dir);
        WorkerError::HostFileProcessingError(e.to_string())
    })?;

    if let Some(theme) = &args.with_notification {
        spawn_notification(theme, &format!("{game} has finished downloading"));
    }

    info!("{game} acquisition complete");
    Ok(())
}

fn classify(e: CloudHostError) -> WorkerError {
    match e {
        CloudHostError::AccountCreationFailed | CloudHostError::WtConstantNotFound => {
            WorkerError::HostAuthError(e.to_string())
        }
        CloudHostError::ApiError(_) | CloudHostError::InvalidShareUrl(_) => {
            WorkerError::HostApiError(e.to_string())
        }
        CloudHostError::VerifyFailed { .. } | CloudHostError::RetriesExhausted(_) => {
            WorkerError::HostTransferError(e.to_string())
        }
        CloudHostError::Network(_) => WorkerError::HostTransferError(e.to_string()),
        CloudHostError::Io(_) => WorkerError::HostFileProcessingError(e.to_string()),
        CloudHostError::Cancelled => unreachable!("handled by the caller before classify()"),
    }
}

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
