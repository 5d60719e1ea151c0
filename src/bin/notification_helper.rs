//! The Notification Helper (spec.md §1, §2, §6): peripheral, interface
//! only. Renders a themed toast in the reference app; this workspace
//! implements the hand-off contract and logs the notification it would
//! have shown, leaving the toast window itself out of scope.
//!
//! `--theme <t> --title <s> --message <s>`

use clap::Parser;
use log::info;

#[derive(Parser, Debug)]
#[command(name = "notification-helper")]
struct Args {
    #[arg(long)]
    theme: String,
    #[arg(long)]
    title: String,
    #[arg(long)]
    message: String,
}

fn main() {
    let args = Args::parse();
    utils::logging::init("notificationhelper");

    info!(
        "[{}] {}: {}",
        args.theme, args.title, args.message
    );
}
