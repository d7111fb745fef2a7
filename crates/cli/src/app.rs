//! Command dispatch.
//!
//! Every command produces an [`Outcome`]: the text to print on stdout and the
//! process exit status. Errors that escape a command are reported by `main`.

use std::fmt::Write as _;

use anyhow::{Context, Result};
use clap::CommandFactory;
use lcats_client::chunking::{ChunkOptions, Tokenizer, chunk_story, summarize_chunks};
use lcats_client::completion::{CompletionClient, OpenAiClient, OpenAiConfig};
use lcats_client::extraction::{ExtractionResult, ExtractionTemplate, extract_from_story};
use lcats_client::fetch::url_resource_cache_from_config;
use lcats_core::cache::write_atomic;
use lcats_core::config::AppConfig;
use lcats_core::{Artifact, Corpora};
use serde_json::json;

use crate::cli::{Cli, Command, ExtractArgs, GatherArgs};
use crate::gatherers::{GatherContext, GatherReport, PageSource, Registry};

pub const INFO_MESSAGE: &str = "LCATS is a literary case based reasoning system.";
pub const INDEX_MESSAGE: &str = "Indexing data files is not yet implemented.";
pub const ADVISE_MESSAGE: &str = "Getting advice from LCATS is not yet implemented.";
pub const EVAL_MESSAGE: &str = "Evaluating LCATS is not yet implemented.";

/// Body characters shown when describing the story being extracted.
const EXCERPT_CHARS: usize = 160;

/// Text for stdout and the exit status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub message: String,
    pub status: u8,
}

impl Outcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self { message: message.into(), status: 0 }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self { message: message.into(), status: 1 }
    }
}

/// Composition root: configuration plus the source registry.
pub struct App {
    config: AppConfig,
    registry: Registry,
    pages: Option<Box<dyn PageSource>>,
}

impl App {
    pub fn new(config: AppConfig, registry: Registry) -> Self {
        Self { config, registry, pages: None }
    }

    /// Read pages from `pages` instead of the URL cache under `cache_root`.
    pub fn with_pages(mut self, pages: Box<dyn PageSource>) -> Self {
        self.pages = Some(pages);
        self
    }

    pub fn run(&self, command: Option<Command>) -> Result<Outcome> {
        let Some(command) = command else {
            return Ok(Outcome::failed(Cli::command().render_help().to_string()));
        };

        match command {
            Command::Info(_) => Ok(self.info()),
            Command::Gather(args) => self.gather(&args),
            Command::Index(_) => Ok(Outcome::failed(INDEX_MESSAGE)),
            Command::Advise(_) => Ok(Outcome::failed(ADVISE_MESSAGE)),
            Command::Eval(_) => Ok(Outcome::failed(EVAL_MESSAGE)),
            Command::Extract(args) => {
                let config = OpenAiConfig::from_app_config(&self.config)?;
                let client = OpenAiClient::new(config)?;
                self.extract(&args, &client)
            }
            Command::External(args) => {
                let name = args.first().map(String::as_str).unwrap_or_default();
                Ok(Outcome::failed(format!("Unknown command: {name}")))
            }
        }
    }

    fn info(&self) -> Outcome {
        let mut message = INFO_MESSAGE.to_string();

        match Corpora::load(&self.config.corpora_root) {
            Ok(corpora) if !corpora.corpora().is_empty() => {
                let _ = write!(message, "\nCorpora in {}:", corpora.root().display());
                for (name, stories) in corpora.corpora() {
                    let _ = write!(message, "\n - {name}: {} stories", stories.len());
                }
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("could not load corpora: {}", e),
        }

        Outcome::ok(message)
    }

    fn gather(&self, args: &GatherArgs) -> Result<Outcome> {
        let unknown: Vec<&str> =
            args.sources.iter().map(String::as_str).filter(|name| self.registry.get(name).is_none()).collect();
        if !unknown.is_empty() {
            let known = self.registry.names().collect::<Vec<_>>().join(", ");
            return Ok(Outcome::failed(format!("Unknown source: {}. Known sources: {known}", unknown.join(", "))));
        }

        let selected: Vec<&str> = if args.sources.is_empty() {
            self.registry.names().collect()
        } else {
            args.sources.iter().map(String::as_str).collect()
        };

        let url_cache;
        let pages: &dyn PageSource = match &self.pages {
            Some(pages) => pages.as_ref(),
            None => {
                url_cache = url_resource_cache_from_config(&self.config).context("building URL cache")?;
                &url_cache
            }
        };

        let ctx = GatherContext {
            data_root: self.config.data_root.clone(),
            pages,
            force: args.force,
            dry_run: args.dry_run,
        };

        let reports: Vec<GatherReport> =
            selected.iter().filter_map(|name| self.registry.get(name)).map(|source| (source.gather)(&ctx)).collect();

        let mut message = String::from("Gathering data from the corpus.");
        for report in &reports {
            let _ = write!(message, "\n{}", report.render());
        }

        let failures: usize = reports.iter().map(|r| r.failed.len()).sum();
        if failures == 0 {
            message.push_str("\nGathering complete.");
            Ok(Outcome::ok(message))
        } else {
            let _ = write!(message, "\nGathering finished with {failures} failed artifact(s).");
            Ok(Outcome::failed(message))
        }
    }

    /// Run event extraction for one artifact against `client`.
    ///
    /// With `--max-tokens` the story is chunked first and each chunk is
    /// extracted on its own; the run succeeds only if every chunk does.
    pub fn extract(&self, args: &ExtractArgs, client: &dyn CompletionClient) -> Result<Outcome> {
        let artifact = Artifact::from_json_file(&args.artifact)
            .with_context(|| format!("reading artifact {}", args.artifact.display()))?;
        let template = ExtractionTemplate::events();

        tracing::info!(artifact = %artifact.name, template = %template.name, "extracting events");

        let mut message = artifact.excerpt(EXCERPT_CHARS)?;

        let Some(max_tokens) = args.max_tokens else {
            let result = extract_from_story(&artifact.body, &template, client);
            if let Some(output) = &args.output {
                write_atomic(output, serde_json::to_string_pretty(&result)?.as_bytes())?;
            }
            write_result(&mut message, &result);
            return Ok(if result.is_success() { Outcome::ok(message) } else { Outcome::failed(message) });
        };

        let mut options = ChunkOptions::new(max_tokens).with_overlap(args.overlap_tokens);
        options.max_chunks = args.max_chunks;
        let tokenizer = Tokenizer::for_model(&self.config.completion.model)?;
        let chunks = chunk_story(&artifact.body, &options, &tokenizer)?;
        tracing::debug!("story chunks:\n{}", summarize_chunks(&chunks));

        let results: Vec<ExtractionResult> =
            chunks.iter().map(|chunk| extract_from_story(&chunk.text, &template, client)).collect();

        if let Some(output) = &args.output {
            let entries: Vec<_> =
                chunks.iter().zip(&results).map(|(chunk, result)| json!({"chunk": chunk, "result": result})).collect();
            write_atomic(output, serde_json::to_string_pretty(&entries)?.as_bytes())?;
        }

        let _ = write!(message, "\nChunks: {}", chunks.len());
        for (chunk, result) in chunks.iter().zip(&results) {
            let _ = write!(message, "\n\nChunk {} (starts at char {}):", chunk.index, chunk.start_char);
            write_result(&mut message, result);
        }

        let failed = results.iter().filter(|r| !r.is_success()).count();
        if failed == 0 {
            Ok(Outcome::ok(message))
        } else {
            let _ = write!(message, "\n\n{failed} of {} chunk(s) failed.", results.len());
            Ok(Outcome::failed(message))
        }
    }
}

fn write_result(message: &mut String, result: &ExtractionResult) {
    let _ = write!(message, "\n{}", result.summary());
    for complaint in result.validate_events() {
        let _ = write!(message, "\nInvalid event: {complaint}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gatherers::registry;

    fn app() -> App {
        App::new(AppConfig { corpora_root: "/nonexistent/corpora".into(), ..Default::default() }, registry())
    }

    #[test]
    fn test_info() {
        let outcome = app().run(Some(Command::Info(crate::cli::IgnoredArgs { args: vec![] }))).unwrap();
        assert_eq!(outcome, Outcome::ok(INFO_MESSAGE));
    }

    #[test]
    fn test_unimplemented_commands() {
        let ignored = || crate::cli::IgnoredArgs { args: vec![] };
        assert_eq!(app().run(Some(Command::Index(ignored()))).unwrap(), Outcome::failed(INDEX_MESSAGE));
        assert_eq!(app().run(Some(Command::Advise(ignored()))).unwrap(), Outcome::failed(ADVISE_MESSAGE));
        assert_eq!(app().run(Some(Command::Eval(ignored()))).unwrap(), Outcome::failed(EVAL_MESSAGE));
    }

    #[test]
    fn test_unknown_command() {
        let outcome = app().run(Some(Command::External(vec!["frobnicate".into()]))).unwrap();
        assert_eq!(outcome, Outcome::failed("Unknown command: frobnicate"));
    }

    #[test]
    fn test_no_command_prints_usage() {
        let outcome = app().run(None).unwrap();
        assert_eq!(outcome.status, 1);
        assert!(outcome.message.contains("Usage"));
        assert!(outcome.message.contains("gather"));
    }

    #[test]
    fn test_gather_unknown_source() {
        let args = GatherArgs { sources: vec!["poe".into()], force: false, dry_run: true };
        let outcome = app().gather(&args).unwrap();
        assert_eq!(outcome.status, 1);
        assert!(outcome.message.starts_with("Unknown source: poe"));
        assert!(outcome.message.contains("lovecraft, sherlock"));
    }

    #[test]
    fn test_extract_requires_api_key() {
        let args = ExtractArgs { artifact: "story.json".into(), ..ExtractArgs::default() };
        let err = app().run(Some(Command::Extract(args))).unwrap_err();
        assert!(err.to_string().contains("API key"));
    }
}
