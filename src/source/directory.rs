//! Page source backed by an unpacked corpus on disk.

use crate::error::{PageError, Result};
use crate::source::PageSource;
use crate::store::{PageRecord, Platform};
use async_trait::async_trait;
use log::debug;
use std::path::{Path, PathBuf};

/// Reads `<root>/pages/<platform>/*.md`, or `<root>/<platform>/*.md` when `root`
/// is itself the `pages` directory.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    async fn pages_dir(&self) -> Result<PathBuf> {
        let nested = self.root.join("pages");
        if tokio::fs::metadata(&nested)
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false)
        {
            return Ok(nested);
        }
        match tokio::fs::metadata(&self.root).await {
            Ok(meta) if meta.is_dir() => Ok(self.root.clone()),
            Ok(_) => Err(PageError::fetch(format!(
                "{} is not a directory",
                self.root.display()
            ))),
            Err(e) => Err(PageError::fetch(format!(
                "cannot read {}: {e}",
                self.root.display()
            ))),
        }
    }
}

async fn read_platform_dir(dir: &Path, platform: Platform) -> Result<Vec<PageRecord>> {
    let mut files = Vec::new();
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| PageError::fetch(format!("cannot list {}: {e}", dir.display())))?;
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| PageError::fetch(format!("cannot list {}: {e}", dir.display())))?
    {
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) == Some("md") {
            files.push(path);
        }
    }
    // read_dir order is filesystem dependent
    files.sort();

    let mut records = Vec::with_capacity(files.len());
    for path in files {
        let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        let body = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| PageError::fetch(format!("cannot read {}: {e}", path.display())))?;
        records.push(PageRecord::new(name, platform, body));
    }
    Ok(records)
}

#[async_trait]
impl PageSource for DirectorySource {
    async fn fetch(&self) -> Result<Vec<PageRecord>> {
        let pages_dir = self.pages_dir().await?;
        let mut records = Vec::new();
        for platform in Platform::ALL {
            let dir = pages_dir.join(platform.as_str());
            if !tokio::fs::try_exists(&dir).await.unwrap_or(false) {
                debug!("no {} pages under {}", platform, pages_dir.display());
                continue;
            }
            records.extend(read_platform_dir(&dir, platform).await?);
        }
        Ok(records)
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}
