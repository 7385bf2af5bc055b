//! Path handling for the Zellij plugin sandbox.
//!
//! Inside the sandbox the host filesystem (rooted at the directory Zellij
//! considers the host cwd, usually `$HOME`) is mounted at `/host`. File reads
//! made by the plugin itself go through that mount, while commands started with
//! `run_command` execute on the host relative to the same directory.

use std::path::PathBuf;

/// File name of the OTLP trace log inside [`data_dir`].
pub const TRACE_FILE_NAME: &str = "gameshelf-otlp.json";

/// Returns the plugin's data directory, `~/.local/share/zellij/gameshelf` on the host.
///
/// ```
/// use gameshelf::infrastructure::data_dir;
///
/// assert_eq!(data_dir().to_str(), Some("/host/.local/share/zellij/gameshelf"));
/// ```
#[must_use]
pub fn data_dir() -> PathBuf {
    PathBuf::from("/host/.local/share/zellij").join("gameshelf")
}

/// Maps a `~`-relative path to its location inside the sandbox.
///
/// ```
/// use gameshelf::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("~/themes/dark.toml"), "/host/themes/dark.toml");
/// assert_eq!(expand_tilde("~"), "/host");
/// assert_eq!(expand_tilde("/etc/theme.toml"), "/etc/theme.toml");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    if path.starts_with("~/") {
        path.replacen('~', "/host", 1)
    } else if path == "~" {
        "/host".to_string()
    } else {
        path.to_string()
    }
}

/// Normalizes a download directory for use as a host command argument.
///
/// Commands already run relative to the host home, so a leading `~/` is
/// dropped rather than expanded. Blank input means the current directory.
///
/// ```
/// use gameshelf::infrastructure::command_relative;
///
/// assert_eq!(command_relative("~/Games"), "Games");
/// assert_eq!(command_relative("~"), ".");
/// assert_eq!(command_relative("  "), ".");
/// assert_eq!(command_relative("/mnt/games"), "/mnt/games");
/// ```
#[must_use]
pub fn command_relative(path: &str) -> String {
    let path = path.trim();
    match path {
        "" | "~" | "~/" => ".".to_string(),
        _ => path.strip_prefix("~/").unwrap_or(path).to_string(),
    }
}
