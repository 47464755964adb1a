//! Store Reader: decompresses the store as a stream and resolves pages by
//! forward scanning over length-prefixed bodies.
//!
//! Every operation reopens the file and re-reads the header. The decompressed
//! stream cannot seek, so a body at skip `n` costs reading `n` earlier bodies, and
//! a single stream never moves backwards.

use crate::error::{PageError, Result};
use crate::store::codec::{read_string, skip_string};
use crate::store::header::parse_header;
use crate::store::record::{IndexEntry, Platform};
use async_compression::tokio::bufread::BrotliDecoder;
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncRead, BufReader};

/// A page resolved from the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundPage {
    pub name: String,
    pub platform: Platform,
    pub body: String,
    /// Other platforms that also carry a page with this name (bodies not read)
    pub alternates: Vec<Platform>,
}

/// Outcome of a lookup or random pick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupResult {
    Found(FoundPage),
    NotFound,
}

/// Any failure reading the decompressed stream means the store does not decode
fn undecodable(err: PageError) -> PageError {
    match err {
        PageError::FileError { source, .. } => {
            PageError::corrupt(format!("stream does not decode ({source})"))
        }
        other => other,
    }
}

/// Header plus the decompressed body stream positioned right after it
pub(crate) struct StoreStream<R> {
    reader: R,
    entries: Vec<IndexEntry>,
    /// Bodies consumed so far, read or skipped
    position: u32,
}

impl<R> StoreStream<R>
where
    R: AsyncRead + Unpin,
{
    /// Read the header from a decompressed stream
    pub(crate) async fn from_reader(mut reader: R) -> Result<Self> {
        let header = read_string(&mut reader).await.map_err(undecodable)?;
        let entries = parse_header(&header)?;
        Ok(Self {
            reader,
            entries,
            position: 0,
        })
    }

    pub(crate) fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    #[cfg(test)]
    pub(crate) fn position(&self) -> u32 {
        self.position
    }

    /// Skip forward to body `skip` and read it.
    pub(crate) async fn body_at(&mut self, skip: u32) -> Result<String> {
        if skip < self.position {
            return Err(PageError::corrupt(format!(
                "body {skip} lies behind stream position {}",
                self.position
            )));
        }
        while self.position < skip {
            skip_string(&mut self.reader).await.map_err(undecodable)?;
            self.position += 1;
        }
        let body = read_string(&mut self.reader).await.map_err(undecodable)?;
        self.position += 1;
        Ok(body)
    }
}

/// Read-only access to a page store file
#[derive(Debug, Clone)]
pub struct StoreReader {
    path: PathBuf,
}

impl StoreReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn open(&self) -> Result<StoreStream<BufReader<BrotliDecoder<BufReader<File>>>>> {
        let file = File::open(&self.path).await.map_err(|e| {
            PageError::file_error(format!("Failed to open store {}", self.path.display()), e)
        })?;
        let decoder = BrotliDecoder::new(BufReader::new(file));
        StoreStream::from_reader(BufReader::new(decoder)).await
    }

    /// Sorted, de-duplicated page names visible under `filter`
    pub async fn list(&self, filter: Option<Platform>) -> Result<Vec<String>> {
        let stream = self.open().await?;
        let names: BTreeSet<&str> = stream
            .entries()
            .iter()
            .filter(|entry| entry.visible_under(filter))
            .map(|entry| entry.name.as_str())
            .collect();
        Ok(names.into_iter().map(str::to_string).collect())
    }

    /// Resolve `name`, preferring `filter`'s platform and falling back to `common`.
    ///
    /// Without a filter the first entry in header order wins.
    pub async fn lookup(&self, name: &str, filter: Option<Platform>) -> Result<LookupResult> {
        let name = name.trim().to_lowercase();
        let mut stream = self.open().await?;

        let matches: Vec<&IndexEntry> = stream
            .entries()
            .iter()
            .filter(|entry| entry.name == name && entry.visible_under(filter))
            .collect();

        let primary = match filter {
            None => matches.first().copied(),
            Some(platform) => matches
                .iter()
                .find(|entry| entry.platform == platform)
                .or_else(|| {
                    matches
                        .iter()
                        .find(|entry| entry.platform == Platform::Common)
                })
                .copied(),
        };
        let Some(primary) = primary.cloned() else {
            debug!("no page named {name} under {filter:?}");
            return Ok(LookupResult::NotFound);
        };

        let alternates: Vec<Platform> = stream
            .entries()
            .iter()
            .filter(|entry| entry.name == name && entry.platform != primary.platform)
            .map(|entry| entry.platform)
            .collect();

        let body = stream.body_at(primary.skip).await?;
        Ok(LookupResult::Found(FoundPage {
            name: primary.name,
            platform: primary.platform,
            body,
            alternates,
        }))
    }

    /// Pick a uniformly random page visible under `filter`
    pub async fn random(&self, filter: Option<Platform>) -> Result<LookupResult> {
        let mut rng = StdRng::from_entropy();
        self.random_with(filter, &mut rng).await
    }

    /// [`StoreReader::random`] with a caller-supplied generator
    pub async fn random_with<G>(
        &self,
        filter: Option<Platform>,
        rng: &mut G,
    ) -> Result<LookupResult>
    where
        G: Rng + ?Sized,
    {
        let mut stream = self.open().await?;
        let candidates: Vec<&IndexEntry> = stream
            .entries()
            .iter()
            .filter(|entry| entry.visible_under(filter))
            .collect();
        if candidates.is_empty() {
            return Ok(LookupResult::NotFound);
        }

        let chosen = candidates[rng.gen_range(0..candidates.len())].clone();
        let body = stream.body_at(chosen.skip).await?;
        Ok(LookupResult::Found(FoundPage {
            name: chosen.name,
            platform: chosen.platform,
            body,
            alternates: Vec::new(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::record::PageRecord;
    use crate::store::writer::{StorePlan, StoreWriter};
    use rand_chacha::ChaCha8Rng;

    fn sample_records() -> Vec<PageRecord> {
        vec![
            PageRecord::new("grep", Platform::Linux, "# grep\n> linux grep"),
            PageRecord::new("grep", Platform::Common, "# grep\n> common grep"),
            PageRecord::new("tar", Platform::Common, "# tar\n> archives"),
            PageRecord::new("apt", Platform::Linux, "# apt\n> packages"),
            PageRecord::new("brew", Platform::Osx, "# brew\n> homebrew"),
        ]
    }

    async fn build_store(dir: &tempfile::TempDir) -> StoreReader {
        let path = dir.path().join("pages.dat");
        StoreWriter::new(&path, Platform::Linux)
            .build(sample_records())
            .await
            .unwrap();
        StoreReader::new(path)
    }

    #[tokio::test]
    async fn test_lookup_prefers_first_in_header_order() {
        let dir = tempfile::tempdir().unwrap();
        let reader = build_store(&dir).await;

        match reader.lookup("grep", None).await.unwrap() {
            LookupResult::Found(page) => {
                assert_eq!(page.platform, Platform::Common);
                assert_eq!(page.body, "# grep\n> common grep");
                assert_eq!(page.alternates, vec![Platform::Linux]);
            }
            LookupResult::NotFound => panic!("grep should be found"),
        }
    }

    #[tokio::test]
    async fn test_lookup_with_filter_prefers_platform_page() {
        let dir = tempfile::tempdir().unwrap();
        let reader = build_store(&dir).await;

        let LookupResult::Found(page) = reader.lookup("GREP", Some(Platform::Linux)).await.unwrap()
        else {
            panic!("grep should be found");
        };
        assert_eq!(page.platform, Platform::Linux);
        assert_eq!(page.body, "# grep\n> linux grep");
        assert_eq!(page.alternates, vec![Platform::Common]);

        let LookupResult::Found(page) = reader.lookup("tar", Some(Platform::Osx)).await.unwrap()
        else {
            panic!("common tar should be visible from osx");
        };
        assert_eq!(page.platform, Platform::Common);
    }

    #[tokio::test]
    async fn test_lookup_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let reader = build_store(&dir).await;

        assert_eq!(
            reader.lookup("doesnotexist", None).await.unwrap(),
            LookupResult::NotFound
        );
        assert_eq!(
            reader.lookup("apt", Some(Platform::Osx)).await.unwrap(),
            LookupResult::NotFound
        );
    }

    #[tokio::test]
    async fn test_list_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        let reader = build_store(&dir).await;

        assert_eq!(
            reader.list(None).await.unwrap(),
            vec!["apt", "brew", "grep", "tar"]
        );
        assert_eq!(
            reader.list(Some(Platform::Linux)).await.unwrap(),
            vec!["apt", "grep", "tar"]
        );
        assert_eq!(
            reader.list(Some(Platform::Common)).await.unwrap(),
            vec!["grep", "tar"]
        );
    }

    #[tokio::test]
    async fn test_random_respects_filter() {
        let dir = tempfile::tempdir().unwrap();
        let reader = build_store(&dir).await;
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        for _ in 0..20 {
            let LookupResult::Found(page) = reader
                .random_with(Some(Platform::Osx), &mut rng)
                .await
                .unwrap()
            else {
                panic!("random pick should find a page");
            };
            assert!(matches!(page.platform, Platform::Osx | Platform::Common));
            assert!(page.body.starts_with(&format!("# {}", page.name)));
        }
    }

    #[tokio::test]
    async fn test_random_on_empty_selection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pages.dat");
        StoreWriter::new(&path, Platform::Linux)
            .build(vec![PageRecord::new("apt", Platform::Linux, "# apt")])
            .await
            .unwrap();
        let reader = StoreReader::new(path);

        let result = reader.random(Some(Platform::Windows)).await.unwrap();
        assert_eq!(result, LookupResult::NotFound);
    }

    #[tokio::test]
    async fn test_body_scan_reads_at_most_skip_plus_one() {
        let records: Vec<_> = (0..10)
            .map(|i| PageRecord::new(format!("cmd{i}"), Platform::Common, format!("body {i}")))
            .collect();
        let plan = StorePlan::new(records, Platform::Linux).unwrap();
        let payload = plan.serialize().unwrap();

        let mut stream = StoreStream::from_reader(payload.as_slice()).await.unwrap();
        let entry = stream.entries()[6].clone();
        assert_eq!(entry.skip, 6);
        assert_eq!(stream.body_at(entry.skip).await.unwrap(), "body 6");
        assert_eq!(stream.position(), entry.skip + 1);

        // The stream only moves forward
        assert!(stream.body_at(2).await.unwrap_err().is_corrupt_store());
    }

    #[tokio::test]
    async fn test_truncated_store_is_corrupt() {
        let records = vec![
            PageRecord::new("tar", Platform::Common, "tar body"),
            PageRecord::new("ls", Platform::Common, "ls body"),
        ];
        let mut payload = StorePlan::new(records, Platform::Linux)
            .unwrap()
            .serialize()
            .unwrap();
        payload.truncate(payload.len() - 3);

        let mut stream = StoreStream::from_reader(payload.as_slice()).await.unwrap();
        let last = stream.entries()[1].skip;
        assert!(stream.body_at(last).await.unwrap_err().is_corrupt_store());
    }

    #[tokio::test]
    async fn test_garbage_file_is_reported_not_panicking() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pages.dat");
        std::fs::write(&path, b"definitely not brotli").unwrap();

        let reader = StoreReader::new(path);
        let err = reader.lookup("tar", None).await.unwrap_err();
        assert!(err.is_corrupt_store(), "unexpected error: {err}");
        assert!(reader.list(None).await.unwrap_err().is_corrupt_store());
        assert!(reader.random(None).await.unwrap_err().is_corrupt_store());
    }

    #[tokio::test]
    async fn test_missing_store_is_a_file_error() {
        let dir = tempfile::tempdir().unwrap();
        let reader = StoreReader::new(dir.path().join("absent.dat"));
        let err = reader.list(None).await.unwrap_err();
        assert!(matches!(err, PageError::FileError { .. }));
    }
}
