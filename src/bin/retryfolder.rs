//! The standalone retry-entry-point binary (spec.md §4.4 "Retry entry
//! point", SPEC_FULL.md §6): re-runs only the un-nesting step against a
//! single named candidate subdirectory, for when the heuristic detection
//! in the normal pipeline missed a layout it shouldn't have.
//!
//! `game online dlc version size download_dir newfolder`

use std::path::PathBuf;

use clap::Parser;
use crashreport::WorkerError;
use log::{error, info};
use status::StatusDocument;
use utils::cli::parse_spec_bool;

#[derive(Parser, Debug)]
#[command(name = "retryfolder")]
struct Args {
    game: String,
    #[arg(value_parser = parse_spec_bool)]
    online: bool,
    #[arg(value_parser = parse_spec_bool)]
    dlc: bool,
    version: String,
    size: String,
    download_dir: PathBuf,
    newfolder: String,
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

    let mut doc = StatusDocument::load(&args.download_dir, &game).unwrap_or_else(|_| {
        StatusDocument::new_acquiring(&game, args.online, args.dlc, false, &args.version, &args.size, "")
    });

    install::retryfolder(&install_dir, &args.newfolder).map_err(|e| {
        doc.mark_acquisition_failed(e.to_string());
        let _ = doc.save(&args.download_dir);
        WorkerError::DownloaderExtractError(e.to_string())
    })?;

    info!("retried un-nesting of {} under {}", args.newfolder, install_dir.display());
    Ok(())
}
