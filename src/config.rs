//! Runtime settings.
//!
//! Defaults place the store next to the executable. With the `config` feature,
//! `<config_dir>/tldr-pack/config.toml` may override any field:
//!
//! ```toml
//! store_path = "/var/cache/tldr/pages.dat"
//! pages_url = "https://example.org/tldr.tar.gz"
//! pages_dir = "/usr/share/tldr"
//! color = false
//! heading_toggle = true
//! ```
//!
//! Command-line flags are applied on top by the binary.

use crate::error::Result;
use crate::render::TitleMode;
use crate::source::DEFAULT_PAGES_URL;
use std::path::PathBuf;

/// File name of the store inside the executable's directory
pub const STORE_FILE_NAME: &str = "pages.dat";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Location of the packed page store
    pub store_path: PathBuf,
    /// Tarball downloaded when the store has to be built
    pub pages_url: String,
    /// Local corpus used instead of the download, when set
    pub pages_dir: Option<PathBuf>,
    /// Emit terminal colors
    pub color: bool,
    pub title_mode: TitleMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            pages_url: DEFAULT_PAGES_URL.to_string(),
            pages_dir: None,
            color: true,
            title_mode: TitleMode::FirstLine,
        }
    }
}

/// `pages.dat` beside the running executable, or in the working directory if
/// the executable path is unavailable
pub fn default_store_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(STORE_FILE_NAME)))
        .unwrap_or_else(|| PathBuf::from(STORE_FILE_NAME))
}

impl Settings {
    /// Defaults merged with the user's config file, if the feature is enabled
    #[cfg(feature = "config")]
    pub fn load() -> Result<Self> {
        let defaults = Self::default();
        match file::config_path() {
            Some(path) if path.is_file() => file::load_from(&path, defaults),
            _ => Ok(defaults),
        }
    }

    /// Defaults; config file support is compiled out
    #[cfg(not(feature = "config"))]
    pub fn load() -> Result<Self> {
        Ok(Self::default())
    }
}

#[cfg(feature = "config")]
mod file {
    use super::Settings;
    use crate::error::{PageError, Result};
    use crate::render::TitleMode;
    use log::debug;
    use serde::Deserialize;
    use std::path::{Path, PathBuf};

    #[derive(Debug, Default, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct FileSettings {
        store_path: Option<PathBuf>,
        pages_url: Option<String>,
        pages_dir: Option<PathBuf>,
        color: Option<bool>,
        heading_toggle: Option<bool>,
    }

    pub(super) fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tldr-pack").join("config.toml"))
    }

    pub(super) fn load_from(path: &Path, base: Settings) -> Result<Settings> {
        let contents = std::fs::read_to_string(path).map_err(|e| PageError::ConfigError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        debug!("loading settings from {}", path.display());
        merge(&contents, base).map_err(|message| PageError::ConfigError {
            path: path.to_path_buf(),
            message,
        })
    }

    pub(super) fn merge(
        contents: &str,
        mut base: Settings,
    ) -> std::result::Result<Settings, String> {
        let file: FileSettings = toml::from_str(contents).map_err(|e| e.to_string())?;
        if let Some(store_path) = file.store_path {
            base.store_path = store_path;
        }
        if let Some(pages_url) = file.pages_url {
            base.pages_url = pages_url;
        }
        if file.pages_dir.is_some() {
            base.pages_dir = file.pages_dir;
        }
        if let Some(color) = file.color {
            base.color = color;
        }
        if let Some(heading_toggle) = file.heading_toggle {
            base.title_mode = if heading_toggle {
                TitleMode::HeadingToggle
            } else {
                TitleMode::FirstLine
            };
        }
        Ok(base)
    }

}
