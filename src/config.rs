//! Locating and loading the marker configuration.

use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use tracing::debug;

use worktally_core::{Markers, Result};

/// File name of the user's marker overrides inside the config directory.
pub const MARKERS_FILE: &str = "markers.toml";

/// Platform config location of `markers.toml`, if the platform has one.
pub fn default_markers_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "worktally")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push(MARKERS_FILE);
    Some(path)
}

/// Load markers from `explicit`, or else from the default location.
///
/// An explicit path must exist. A missing default file means defaults.
pub fn load_markers(explicit: Option<&Path>) -> Result<Markers> {
    if let Some(path) = explicit {
        debug!(path = %path.display(), "loading markers");
        return Markers::load(path);
    }
    match default_markers_path() {
        Some(path) if path.exists() => {
            debug!(path = %path.display(), "loading markers");
            Markers::load(&path)
        }
        _ => Ok(Markers::default()),
    }
}
