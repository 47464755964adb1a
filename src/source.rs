//! Page corpus sources.
//!
//! A [`PageSource`] produces the full list of [`PageRecord`]s a store is built
//! from. Both implementations understand the upstream layout
//! `pages/<platform>/<name>.md`; pages outside the four known platforms
//! (and translated `pages.<lang>` trees) are ignored.

pub mod directory;
pub mod tarball;

pub use directory::DirectorySource;
pub use tarball::TarballSource;

use crate::error::Result;
use crate::store::{PageRecord, Platform};
use async_trait::async_trait;
use std::path::{Component, Path};

/// Upstream release archive the default store is built from
pub const DEFAULT_PAGES_URL: &str =
    "https://github.com/tldr-pages/tldr/archive/refs/tags/v2.0.tar.gz";

/// Producer of page records for a store build
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Collect every page this source offers
    async fn fetch(&self) -> Result<Vec<PageRecord>>;

    /// Human-readable origin, used in log and progress messages
    fn describe(&self) -> String;
}

/// Classify a corpus path ending in `pages/<platform>/<name>.md`.
pub(crate) fn classify_page_path(path: &Path) -> Option<(Platform, String)> {
    let names: Vec<&str> = path
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect();

    let [.., pages, platform, file] = names.as_slice() else {
        return None;
    };
    if *pages != "pages" {
        return None;
    }
    let platform = Platform::parse(platform).ok()?;
    let name = file.strip_suffix(".md")?;
    if name.is_empty() {
        return None;
    }
    Some((platform, name.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_page_paths() {
        assert_eq!(
            classify_page_path(Path::new("tldr-2.0/pages/common/tar.md")),
            Some((Platform::Common, "tar".to_string()))
        );
        assert_eq!(
            classify_page_path(Path::new("pages/osx/Brew.md")),
            Some((Platform::Osx, "brew".to_string()))
        );
        assert_eq!(
            classify_page_path(Path::new("tldr-2.0/pages.de/common/tar.md")),
            None
        );
        assert_eq!(
            classify_page_path(Path::new("tldr-2.0/pages/android/am.md")),
            None
        );
        assert_eq!(
            classify_page_path(Path::new("tldr-2.0/pages/common/README")),
            None
        );
        assert_eq!(classify_page_path(Path::new("common/tar.md")), None);
    }
}
