//! Page source that downloads the upstream `.tar.gz` release.
//!
//! The archive is fetched into memory, gunzipped, and walked entry by entry;
//! nothing is extracted to disk.

use crate::error::{PageError, Result};
use crate::source::{classify_page_path, PageSource};
use crate::store::PageRecord;
use async_compression::tokio::bufread::GzipDecoder;
use async_trait::async_trait;
use log::{debug, info};
use std::io::Read;
use std::time::Duration;
use tokio::io::AsyncReadExt;

/// Give up on a download that has not finished after this long
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(300);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Downloads pages from a tarball URL
#[derive(Debug, Clone)]
pub struct TarballSource {
    url: String,
    client: reqwest::Client,
}

impl TarballSource {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(DOWNLOAD_TIMEOUT)
            .user_agent(concat!("tldr-pack/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PageError::fetch(format!("cannot create HTTP client: {e}")))?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

#[async_trait]
impl PageSource for TarballSource {
    async fn fetch(&self) -> Result<Vec<PageRecord>> {
        info!("downloading {}", self.url);
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| PageError::fetch(format!("{}: {e}", self.url)))?;
        let compressed = response
            .bytes()
            .await
            .map_err(|e| PageError::fetch(format!("{}: {e}", self.url)))?;
        debug!("downloaded {} bytes", compressed.len());

        records_from_tar_gz(&compressed).await
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Decode a gzip-compressed tar archive into page records
pub async fn records_from_tar_gz(compressed: &[u8]) -> Result<Vec<PageRecord>> {
    let mut tarball = Vec::new();
    GzipDecoder::new(compressed)
        .read_to_end(&mut tarball)
        .await
        .map_err(|e| PageError::fetch(format!("cannot decompress archive: {e}")))?;
    records_from_tar(&tarball)
}

fn records_from_tar(tarball: &[u8]) -> Result<Vec<PageRecord>> {
    let archive_error = |e: std::io::Error| PageError::fetch(format!("cannot read archive: {e}"));

    let mut archive = tar::Archive::new(tarball);
    let mut records = Vec::new();
    for entry in archive.entries().map_err(archive_error)? {
        let mut entry = entry.map_err(archive_error)?;
        if !entry.header().entry_type().is_file() {
            continue;
        }
        let path = entry.path().map_err(archive_error)?.into_owned();
        let Some((platform, name)) = classify_page_path(&path) else {
            continue;
        };

        let mut body = String::new();
        entry.read_to_string(&mut body).map_err(archive_error)?;
        records.push(PageRecord::new(name, platform, body));
    }

    if records.is_empty() {
        return Err(PageError::fetch("archive contains no pages"));
    }
    info!("unpacked {} pages", records.len());
    Ok(records)
}
