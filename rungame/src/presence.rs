//! Rich presence (spec.md §4.5): optional, enabled only when the handler
//! is invoked with the shortcut flag. Modeled as a small trait so the
//! monitor loop in [`crate::process`] never has to know whether presence
//! is wired up or not; a failed connect is logged at `warn` and the
//! no-op client takes over silently, exactly as spec.md specifies.

use std::time::{SystemTime, UNIX_EPOCH};

use discord_rich_presence::activity::{Activity, Timestamps};
use discord_rich_presence::{DiscordIpc, DiscordIpcClient};
use log::warn;

/// A game-being-played advertisement to an external presence client.
pub trait PresenceClient {
    fn start(&mut self, game: &str);
    fn clear(&mut self);
}

/// The default, always-succeeds client used when `--shortcut` was not
/// passed.
pub struct NoopPresence;

impl PresenceClient for NoopPresence {
    fn start(&mut self, _game: &str) {}
    fn clear(&mut self) {}
}

/// An application id registered for this workspace's rich-presence
/// advertisement. A real deployment would source this from
/// configuration; it is fixed here since only one client integration
/// exists.
const CLIENT_ID: &str = "1104490249049170031";

/// Connects to the local Discord IPC socket on construction,
/// best-effort: a failed connect is logged and leaves `client` `None`,
/// so every subsequent call is silently a no-op.
pub struct DiscordPresence {
    client: Option<DiscordIpcClient>,
}

impl DiscordPresence {
    pub fn connect() -> Self {
        let mut client = match DiscordIpcClient::new(CLIENT_ID) {
            Ok(c) => c,
            Err(e) => {
                warn!("failed to construct discord ipc client: {e}");
                return DiscordPresence { client: None };
            }
        };
        match client.connect() {
            Ok(()) => DiscordPresence {
                client: Some(client),
            },
            Err(e) => {
                warn!("failed to connect to discord ipc: {e}");
                DiscordPresence { client: None }
            }
        }
    }
}

impl PresenceClient for DiscordPresence {
    fn start(&mut self, game: &str) {
        let Some(client) = self.client.as_mut() else {
            return;
        };
        let start = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);

        let activity = Activity::new()
            .details("Playing a Game")
            .state(game)
            .timestamps(Timestamps::new().start(start));

        if let Err(e) = client.set_activity(activity) {
            warn!("failed to publish rich presence for {game}: {e}");
        }
    }

    fn clear(&mut self) {
        let Some(client) = self.client.as_mut() else {
            return;
        };
        if let Err(e) = client.clear_activity() {
            warn!("failed to clear rich presence: {e}");
        }
    }
}

impl Drop for DiscordPresence {
    fn drop(&mut self) {
        if let Some(client) = self.client.as_mut() {
            let _ = client.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_presence_never_panics() {
        let mut presence = NoopPresence;
        presence.start("My Game");
        presence.clear();
    }
}
