//! Application orchestration layer
//!
//! One invocation is handled end to end: build the store if it is missing, run
//! a single lookup, listing, or random pick, and render the result. Library
//! errors are turned into terminal messages here; only failures to write the
//! output itself are returned to the caller.

use crate::config::Settings;
use crate::error::{PageError, Result};
use crate::render::{AnsiSink, PageRenderer, PageTheme, StyledSink};
use crate::source::{DirectorySource, PageSource, TarballSource};
use crate::store::{BuildOutcome, FoundPage, LookupResult, Platform, StoreReader, StoreWriter};
use log::{error, info, warn};
use std::io::Write;

/// What the user asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show the page for a command name
    Lookup { name: String },
    /// List page names, for the active platform or for all of them
    List { all: bool },
    /// Show a random page
    Random,
}

/// How a command ended, for callers that care beyond the printed output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Rendered,
    Listed(usize),
    NotFound,
    /// The store could not be built or read; a message was printed
    StoreUnavailable,
}

/// Application orchestrator - owns settings and the renderer for one invocation
pub struct Application {
    settings: Settings,
    /// Platform from the command line, if any
    platform: Option<Platform>,
    host: Platform,
    renderer: PageRenderer,
}

impl Application {
    /// `platform` restricts lookups, listings, and random picks; without it
    /// lookups fall back from `common` to the host platform to any other
    /// platform, and listings use the host platform.
    pub fn new(settings: Settings, platform: Option<Platform>) -> Self {
        let theme = if settings.color {
            PageTheme::default()
        } else {
            PageTheme::monochrome()
        };
        let renderer = PageRenderer::new(theme).with_mode(settings.title_mode);
        Self {
            settings,
            platform,
            host: Platform::host(),
            renderer,
        }
    }

    /// Host platform used for write order and default filtering
    pub fn with_host(mut self, host: Platform) -> Self {
        self.host = host;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn page_source(&self) -> Result<Box<dyn PageSource>> {
        match &self.settings.pages_dir {
            Some(dir) => Ok(Box::new(DirectorySource::new(dir))),
            None => Ok(Box::new(TarballSource::new(&self.settings.pages_url)?)),
        }
    }

    /// Build the store from the configured source unless it already exists
    pub async fn ensure_store(&self) -> Result<BuildOutcome> {
        let writer = StoreWriter::new(&self.settings.store_path, self.host);
        if tokio::fs::try_exists(writer.path()).await.unwrap_or(false) {
            return Ok(BuildOutcome::AlreadyPresent);
        }

        let source = self.page_source()?;
        eprintln!("Building page store from {}", source.describe());
        let outcome = writer.build_from(&*source).await?;
        if let BuildOutcome::Created { pages } = outcome {
            info!("page store ready with {pages} pages");
        }
        Ok(outcome)
    }

    /// Run one command, writing user-facing output to `out`
    pub async fn run<W: Write>(&self, command: Command, out: &mut W) -> Result<Completion> {
        if let Err(err) = self.ensure_store().await {
            error!("store build failed: {err}");
            eprintln!("{err}");
            return Ok(Completion::StoreUnavailable);
        }

        let reader = StoreReader::new(&self.settings.store_path);
        let mut sink = AnsiSink::new(&mut *out);
        let theme = self.renderer.theme().clone();

        let scope = Some(self.platform.unwrap_or(self.host));

        let result = match &command {
            Command::Lookup { name } => reader.lookup(name, self.platform).await,
            Command::Random => reader.random(scope).await,
            Command::List { all } => {
                let filter = if *all { None } else { scope };
                match reader.list(filter).await {
                    Ok(names) => {
                        sink.put_str(&names.join(", "), theme.notice)?;
                        sink.put('\n', theme.normal)?;
                        sink.finish()?;
                        return Ok(Completion::Listed(names.len()));
                    }
                    Err(err) => Err(err),
                }
            }
        };

        match result {
            Ok(LookupResult::Found(page)) => {
                self.write_page(&page, &mut sink)?;
                Ok(Completion::Rendered)
            }
            Ok(LookupResult::NotFound) => {
                match &command {
                    Command::Lookup { name } => {
                        sink.put_str(name, theme.notice)?;
                        sink.put_str(" not found\n", theme.normal)?;
                    }
                    _ => sink.put_str("No pages available\n", theme.normal)?,
                }
                sink.finish()?;
                Ok(Completion::NotFound)
            }
            Err(err) => {
                report_store_error(&err, &self.settings);
                Ok(Completion::StoreUnavailable)
            }
        }
    }

    fn write_page<S: StyledSink>(&self, page: &FoundPage, sink: &mut S) -> Result<()> {
        self.renderer.render(&page.body, sink)?;
        let theme = self.renderer.theme();
        if self.platform.is_none()
            && page.platform != Platform::Common
            && page.platform != self.host
        {
            sink.put_str("This page is for ", theme.normal)?;
            sink.put_str(page.platform.as_str(), theme.notice)?;
            sink.put_str(&format!(", not {}\n", self.host), theme.normal)?;
        }
        if !page.alternates.is_empty() {
            let platforms: Vec<&str> = page.alternates.iter().map(Platform::as_str).collect();
            sink.put_str("Also available on: ", theme.normal)?;
            sink.put_str(&platforms.join(", "), theme.notice)?;
            sink.put('\n', theme.normal)?;
        }
        sink.finish()?;
        Ok(())
    }
}

fn report_store_error(err: &PageError, settings: &Settings) {
    if err.is_corrupt_store() {
        warn!("{err}");
        eprintln!(
            "{err}\nDelete {} to rebuild it.",
            settings.store_path.display()
        );
    } else {
        error!("{err}");
        eprintln!("{err}");
    }
}
