//! Store Writer: orders page records, writes the index header and bodies, and
//! publishes the Brotli-compressed result atomically.
//!
//! The file is never modified once it exists. A build writes into a temporary
//! file in the destination directory and links it into place without clobbering,
//! so concurrent builders race harmlessly and a failed build leaves nothing behind.

use crate::error::{PageError, Result};
use crate::source::PageSource;
use crate::store::codec::write_string;
use crate::store::header::encode_header;
use crate::store::record::{IndexEntry, PageRecord, Platform};
use async_compression::tokio::write::BrotliEncoder;
use async_compression::Level;
use log::{debug, info, warn};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::io::{AsyncWriteExt, BufWriter};

/// What a call to [`StoreWriter::build`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    /// A new store was published with this many pages
    Created { pages: usize },
    /// The store file already existed and was left untouched
    AlreadyPresent,
}

/// Records in final write order together with their index
#[derive(Debug, Clone)]
pub struct StorePlan {
    pub entries: Vec<IndexEntry>,
    pub records: Vec<PageRecord>,
}

impl StorePlan {
    /// Decide write order and assign skip counts.
    ///
    /// Records are grouped by [`Platform::priority_order`] for `host`, keeping input
    /// order within a platform. Repeated `(name, platform)` pairs keep the first record.
    pub fn new(records: Vec<PageRecord>, host: Platform) -> Result<Self> {
        for record in &records {
            record.validate()?;
        }

        let mut seen = HashSet::new();
        let mut unique = Vec::with_capacity(records.len());
        for record in records {
            if seen.insert((record.name.clone(), record.platform)) {
                unique.push(record);
            } else {
                warn!(
                    "dropping duplicate page {} ({})",
                    record.name, record.platform
                );
            }
        }

        // Stable sort keeps input order inside each platform
        let order = Platform::priority_order(host);
        unique.sort_by_key(|record| order.iter().position(|p| *p == record.platform));

        let entries = unique
            .iter()
            .enumerate()
            .map(|(skip, record)| {
                let skip = u32::try_from(skip)
                    .map_err(|_| PageError::invalid_record("too many pages for one store"))?;
                Ok(IndexEntry {
                    name: record.name.clone(),
                    platform: record.platform,
                    skip,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            entries,
            records: unique,
        })
    }

    /// Uncompressed store layout: header string, then every body in skip order
    pub fn serialize(&self) -> Result<Vec<u8>> {
        let header = encode_header(&self.entries);
        let capacity = header.len()
            + self
                .records
                .iter()
                .map(|record| record.body.len() + 5)
                .sum::<usize>();

        let mut buf = Vec::with_capacity(capacity + 5);
        write_string(&header, &mut buf)?;
        for record in &self.records {
            write_string(&record.body, &mut buf)?;
        }
        Ok(buf)
    }
}

/// Builds the page store file at a fixed path
#[derive(Debug, Clone)]
pub struct StoreWriter {
    path: PathBuf,
    host: Platform,
}

impl StoreWriter {
    pub fn new(path: impl Into<PathBuf>, host: Platform) -> Self {
        Self {
            path: path.into(),
            host,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Fetch pages from `source` and build, unless the store already exists.
    ///
    /// The existence check happens before fetching so a warm start never touches
    /// the network.
    pub async fn build_from(&self, source: &dyn PageSource) -> Result<BuildOutcome> {
        if self.store_exists().await {
            debug!("store {} already present", self.path.display());
            return Ok(BuildOutcome::AlreadyPresent);
        }

        info!("building page store from {}", source.describe());
        let records = source.fetch().await?;
        self.build(records).await
    }

    /// Serialize, compress, and publish `records`.
    pub async fn build(&self, records: Vec<PageRecord>) -> Result<BuildOutcome> {
        if self.store_exists().await {
            return Ok(BuildOutcome::AlreadyPresent);
        }

        let plan = StorePlan::new(records, self.host)?;
        let payload = plan.serialize()?;
        debug!(
            "serialized {} pages into {} bytes",
            plan.records.len(),
            payload.len()
        );

        let temp = self.write_temp(&payload).await?;
        match temp.persist_noclobber(&self.path) {
            Ok(_) => {
                info!(
                    "wrote page store {} ({} pages)",
                    self.path.display(),
                    plan.records.len()
                );
                Ok(BuildOutcome::Created {
                    pages: plan.records.len(),
                })
            }
            // Another builder published first; our temp file is removed on drop
            Err(err) if err.error.kind() == std::io::ErrorKind::AlreadyExists => {
                debug!("store {} was published concurrently", self.path.display());
                Ok(BuildOutcome::AlreadyPresent)
            }
            Err(err) => Err(PageError::file_error(
                format!("Failed to publish store {}", self.path.display()),
                err.error,
            )),
        }
    }

    async fn store_exists(&self) -> bool {
        tokio::fs::try_exists(&self.path).await.unwrap_or(false)
    }

    async fn write_temp(&self, payload: &[u8]) -> Result<NamedTempFile> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| PageError::file_error("Failed to create store directory", e))?;

        let temp = NamedTempFile::new_in(&dir)
            .map_err(|e| PageError::file_error("Failed to create temp file", e))?;
        let handle = temp
            .reopen()
            .map_err(|e| PageError::file_error("Failed to open temp file for writing", e))?;

        let writer = BufWriter::new(tokio::fs::File::from_std(handle));
        let mut encoder = BrotliEncoder::with_quality(writer, Level::Default);
        encoder
            .write_all(payload)
            .await
            .map_err(|e| PageError::file_error("Failed to compress store", e))?;
        encoder
            .shutdown()
            .await
            .map_err(|e| PageError::file_error("Failed to flush store", e))?;

        temp.as_file()
            .sync_all()
            .map_err(|e| PageError::file_error("Failed to sync store", e))?;
        Ok(temp)
    }
}
