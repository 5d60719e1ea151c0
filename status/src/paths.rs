use std::path::{Path, PathBuf};

/// Reduces a game name to the folder-safe character class `[A-Za-z0-9 ._()-]`,
/// stripping everything else. Applied consistently before any filesystem
/// use of a game name, per the sanitization rule every worker shares.
pub fn sanitize_folder_name(name: &str) -> String {
    name.chars()
        .filter(|c| {
            c.is_ascii_alphanumeric() || matches!(c, ' ' | '.' | '_' | '(' | ')' | '-')
        })
        .collect()
}

/// `<download_dir>/<game>/<game>.ascendara.json`
pub fn status_document_path(download_dir: &Path, game: &str) -> PathBuf {
    let game = sanitize_folder_name(game);
    download_dir.join(&game).join(format!("{game}.ascendara.json"))
}

/// `<download_dir>/<game>`
pub fn install_dir(download_dir: &Path, game: &str) -> PathBuf {
    download_dir.join(sanitize_folder_name(game))
}

/// `<download_dir>/games.json`
pub fn collection_index_path(download_dir: &Path) -> PathBuf {
    download_dir.join("games.json")
}

/// `<user-config-root>/ascendara/ascendarasettings.json`
pub fn settings_path() -> PathBuf {
    dirs::config_dir()
        .expect("no config directory available for this platform")
        .join("ascendara")
        .join("ascendarasettings.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_disallowed_characters() {
        assert_eq!(sanitize_folder_name("Half-Life 2: Episode One!"), "Half-Life 2 Episode One");
        assert_eq!(sanitize_folder_name("Doom (1993)"), "Doom (1993)");
        assert_eq!(sanitize_folder_name("a/b\\c"), "abc");
    }

    #[test]
    fn builds_status_path_from_sanitized_game_name() {
        let path = status_document_path(Path::new("/games"), "Quake II");
        assert_eq!(path, Path::new("/games/Quake II/Quake II.ascendara.json"));
    }
}
