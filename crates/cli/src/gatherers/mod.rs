//! Source gatherers and their registry.
//!
//! Each source turns a list of stories into artifacts in its own namespace
//! under the data root. Pages are read through a [`PageSource`], normally the
//! URL resource cache, so repeated runs do not refetch.

pub mod lovecraft;
pub mod sherlock;

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::PathBuf;

use lcats_core::cache::{Acquirer, Canonicalizer, ResourceCache};
use lcats_core::text::title_to_filename;
use lcats_core::{Artifact, DataGatherer, Download, Error};
use serde_json::{Map, Value, json};

/// Anything that can hand back the HTML of a page by URL.
pub trait PageSource {
    fn page(&self, url: &str) -> Result<String, Error>;
}

impl<C: Canonicalizer, A: Acquirer> PageSource for ResourceCache<C, A> {
    fn page(&self, url: &str) -> Result<String, Error> {
        self.get(url)
    }
}

/// Everything a gathering run needs.
pub struct GatherContext<'a> {
    pub data_root: PathBuf,
    pub pages: &'a dyn PageSource,
    pub force: bool,
    pub dry_run: bool,
}

/// One story to gather.
#[derive(Debug, Clone, Copy)]
pub struct Story {
    pub title: &'static str,
    pub url: &'static str,
    pub author: &'static str,
    pub year: u16,
    /// Artifact name; derived from the title when absent.
    pub file: Option<&'static str>,
    /// Display name; "<title> by <author>" when absent.
    pub display: Option<&'static str>,
}

impl Story {
    pub const fn new(title: &'static str, url: &'static str, author: &'static str, year: u16) -> Self {
        Self { title, url, author, year, file: None, display: None }
    }

    pub fn file_name(&self) -> String {
        self.file.map(str::to_string).unwrap_or_else(|| title_to_filename(self.title))
    }

    pub fn description(&self) -> String {
        match self.display {
            Some(display) => display.to_string(),
            None => format!("{} by {}", self.title, self.author),
        }
    }

    fn metadata(&self) -> Map<String, Value> {
        let mut metadata = Map::new();
        metadata.insert("author".into(), json!(self.author));
        metadata.insert("year".into(), json!(self.year));
        metadata.insert("url".into(), json!(self.url));
        metadata.insert("name".into(), json!(self.title));
        metadata
    }
}

/// What happened during one source's run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GatherReport {
    pub source: String,
    pub saved: Vec<String>,
    pub skipped: Vec<String>,
    pub planned: Vec<String>,
    pub failed: Vec<(String, String)>,
}

impl GatherReport {
    pub fn new(source: impl Into<String>) -> Self {
        Self { source: source.into(), ..Default::default() }
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn render(&self) -> String {
        let mut out = format!(
            "{}: {} saved, {} already present, {} failed",
            self.source,
            self.saved.len(),
            self.skipped.len(),
            self.failed.len()
        );
        for name in &self.planned {
            let _ = write!(out, "\n  would gather {name}");
        }
        for (name, error) in &self.failed {
            let _ = write!(out, "\n  failed {name}: {error}");
        }
        out
    }
}

/// Gather `stories` into `gatherer`, locating each story's text with `locate`.
///
/// A failing story is recorded in the report and does not stop the others.
pub fn gather_stories<F>(
    ctx: &GatherContext<'_>,
    mut gatherer: DataGatherer,
    stories: &[Story],
    locate: F,
) -> GatherReport
where
    F: Fn(&Story, &str) -> Option<String>,
{
    let mut report = GatherReport::new(gatherer.name());
    tracing::info!(source = %report.source, "gathering {}", gatherer.description().unwrap_or("stories"));

    for story in stories {
        let name = story.file_name();

        if ctx.dry_run {
            if ctx.force || !gatherer.artifact_path(&name).is_file() {
                report.planned.push(name);
            } else {
                report.skipped.push(name);
            }
            continue;
        }

        let callback = || {
            let html = ctx.pages.page(story.url)?;
            let body = locate(story, &html).ok_or_else(|| {
                Error::acquisition(story.url, format!("story text for '{}' not found in page", story.title))
            })?;
            Ok(Artifact::new(story.description(), body, story.metadata()))
        };

        match gatherer.download(&name, callback, ctx.force) {
            Ok(Download::Saved(_)) => report.saved.push(name),
            Ok(Download::Skipped(_)) => report.skipped.push(name),
            Err(e) => {
                tracing::warn!(source = %report.source, artifact = %name, "failed to gather: {}", e);
                report.failed.push((name, e.to_string()));
            }
        }
    }

    report
}

/// A registered source.
#[derive(Debug, Clone, Copy)]
pub struct Source {
    pub name: &'static str,
    pub description: &'static str,
    pub gather: fn(&GatherContext<'_>) -> GatherReport,
}

/// Source names mapped to their gatherers.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    sources: BTreeMap<&'static str, Source>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, source: Source) -> Self {
        self.sources.insert(source.name, source);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Source> {
        self.sources.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.sources.keys().copied()
    }
}

/// Registry of every built-in source.
pub fn registry() -> Registry {
    Registry::new().register(lovecraft::source()).register(sherlock::source())
}
