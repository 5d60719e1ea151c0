//! The Game Handler worker (spec.md §2, §4.5, §6): resolves which status
//! document or collection entry a launch belongs to, then runs the
//! spawn-and-monitor lifecycle against it.
//!
//! `game_path is_custom_game [--shortcut]`

use std::path::PathBuf;

use clap::Parser;
use crashreport::WorkerError;
use log::error;
use rungame::{DiscordPresence, GameTarget, NoopPresence, PresenceClient, RunGameError};
use utils::cli::parse_spec_bool;

#[derive(Parser, Debug)]
#[command(name = "game-handler")]
struct Args {
    game_path: PathBuf,
    #[arg(value_parser = parse_spec_bool)]
    is_custom_game: bool,
    /// Launched from a desktop shortcut: enables rich presence
    /// (spec.md §4.5 step 4).
    #[arg(long)]
    shortcut: bool,
}

fn main() {
    let args = Args::parse();
    utils::logging::init("gamehandler");

    if let Err(e) = run(&args) {
        error!("{e}");
        let worker_error: WorkerError = (&e).into();
        crashreport::report_error(&worker_error);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), RunGameError> {
    let target = GameTarget::resolve(&args.game_path, args.is_custom_game)?;

    let mut boxed: Box<dyn PresenceClient> = if args.shortcut {
        Box::new(DiscordPresence::connect())
    } else {
        Box::new(NoopPresence)
    };

    rungame::launch_and_monitor(&args.game_path, &target, boxed.as_mut())
}
