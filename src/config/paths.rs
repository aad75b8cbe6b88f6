//! Cross-platform application paths using the `dirs` crate.
//!
//! Layout:
//!
//! Config dir (settings + user-uploaded sprites):
//!   Windows: %APPDATA%\good-morning\
//!   macOS:   ~/Library/Application Support/good-morning/
//!   Linux:   ~/.config/good-morning/
//!
//! Bundled data (default sprites, icons, sounds) lives in a `data/` directory
//! next to the executable, or in the working directory when running from a
//! checkout.

use std::path::{Path, PathBuf};

/// Holds all resolved application directory/file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory for `settings.toml` and the user image area.
    pub config_dir: PathBuf,
    /// Full path to `settings.toml`.
    pub settings_file: PathBuf,
    /// User-uploaded sprite overrides.
    pub user_images_dir: PathBuf,
    /// Root of the bundled read-only assets.
    pub data_dir: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "good-morning";

    /// Resolves all paths using the `dirs` crate.
    ///
    /// Falls back to the current directory if the platform cannot provide a
    /// standard path.
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        Self::with_roots(config_dir, bundled_data_dir())
    }

    /// Build the layout under explicit roots (tests, portable installs).
    pub fn with_roots(config_dir: impl Into<PathBuf>, data_dir: impl Into<PathBuf>) -> Self {
        let config_dir = config_dir.into();
        Self {
            settings_file: config_dir.join("settings.toml"),
            user_images_dir: config_dir.join("images"),
            config_dir,
            data_dir: data_dir.into(),
        }
    }

    /// Directory holding the bundled sprite and clock icon images.
    pub fn bundled_images_dir(&self) -> PathBuf {
        self.data_dir.join("image")
    }

    /// Directory holding the bundled sound clips.
    pub fn bundled_audio_dir(&self) -> PathBuf {
        self.data_dir.join("audio")
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

/// Prefer `<exe dir>/data`, fall back to `./data`.
fn bundled_data_dir() -> PathBuf {
    let beside_exe = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .map(|dir| dir.join("data"));

    match beside_exe {
        Some(dir) if dir.is_dir() => dir,
        _ => PathBuf::from("data"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_non_empty() {
        let paths = AppPaths::new();
        assert!(paths.config_dir.to_str().is_some_and(|s| !s.is_empty()));
        assert!(paths
            .settings_file
            .file_name()
            .is_some_and(|n| n == "settings.toml"));
        assert!(paths.user_images_dir.ends_with("images"));
    }

    #[test]
    fn with_roots_places_everything_under_roots() {
        let paths = AppPaths::with_roots("/tmp/cfg", "/opt/gm/data");
        assert_eq!(paths.settings_file, PathBuf::from("/tmp/cfg/settings.toml"));
        assert_eq!(paths.user_images_dir, PathBuf::from("/tmp/cfg/images"));
        assert_eq!(paths.bundled_images_dir(), PathBuf::from("/opt/gm/data/image"));
        assert_eq!(paths.bundled_audio_dir(), PathBuf::from("/opt/gm/data/audio"));
    }
}
