//! Command-line surface.

use std::path::PathBuf;

use clap::builder::RangedU64ValueParser;
use clap::{Args, Parser, Subcommand};

/// LCATS - gather story corpora and extract narrative events.
#[derive(Debug, Parser)]
#[command(name = "lcats")]
#[command(version, about, long_about = None)]
#[command(allow_external_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Describe LCATS and the corpora on disk
    Info(IgnoredArgs),

    /// Gather corpus data into the data directory
    Gather(GatherArgs),

    /// Preprocess a corpus to answer questions
    Index(IgnoredArgs),

    /// Command-line advising tool
    Advise(IgnoredArgs),

    /// Evaluate LCATS on a benchmark suite
    Eval(IgnoredArgs),

    /// Extract narrative events from a gathered story
    Extract(ExtractArgs),

    #[command(external_subcommand)]
    External(Vec<String>),
}

/// Extra arguments accepted and ignored.
#[derive(Debug, Args)]
pub struct IgnoredArgs {
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
    pub args: Vec<String>,
}

/// Arguments for the gather command.
#[derive(Debug, Args)]
pub struct GatherArgs {
    /// Sources to gather (default: all registered sources)
    pub sources: Vec<String>,

    /// Re-download artifacts that already exist
    #[arg(long)]
    pub force: bool,

    /// List what would be gathered without fetching anything
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the extract command.
#[derive(Debug, Default, Args)]
pub struct ExtractArgs {
    /// Gathered artifact JSON file
    pub artifact: PathBuf,

    /// Write the full extraction result as JSON to this path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Split the story into chunks of at most this many tokens
    #[arg(long, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    pub max_tokens: Option<usize>,

    /// Tokens shared by consecutive chunks
    #[arg(long, default_value_t = 0, requires = "max_tokens")]
    pub overlap_tokens: usize,

    /// Extract from at most this many chunks
    #[arg(long, requires = "max_tokens")]
    pub max_chunks: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_gather() {
        let cli = Cli::try_parse_from(["lcats", "gather", "sherlock", "--force"]).unwrap();
        let Some(Command::Gather(args)) = cli.command else { panic!("expected gather") };
        assert_eq!(args.sources, vec!["sherlock"]);
        assert!(args.force);
        assert!(!args.dry_run);
    }

    #[test]
    fn test_parse_info_ignores_extra_args() {
        let cli = Cli::try_parse_from(["lcats", "info", "extra", "--verbose"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Info(_))));
    }

    #[test]
    fn test_parse_unknown_command() {
        let cli = Cli::try_parse_from(["lcats", "frobnicate", "x"]).unwrap();
        let Some(Command::External(args)) = cli.command else { panic!("expected external") };
        assert_eq!(args, vec!["frobnicate", "x"]);
    }

    #[test]
    fn test_parse_no_command() {
        let cli = Cli::try_parse_from(["lcats"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_extract() {
        let cli = Cli::try_parse_from(["lcats", "extract", "story.json", "-o", "events.json"]).unwrap();
        let Some(Command::Extract(args)) = cli.command else { panic!("expected extract") };
        assert_eq!(args.artifact, PathBuf::from("story.json"));
        assert_eq!(args.output, Some(PathBuf::from("events.json")));
        assert_eq!(args.max_tokens, None);
    }

    #[test]
    fn test_parse_extract_chunking() {
        let args = ["lcats", "extract", "story.json", "--max-tokens", "4000", "--max-chunks", "3"];
        let cli = Cli::try_parse_from(args).unwrap();
        let Some(Command::Extract(args)) = cli.command else { panic!("expected extract") };
        assert_eq!(args.max_tokens, Some(4000));
        assert_eq!(args.max_chunks, Some(3));
        assert_eq!(args.overlap_tokens, 0);

        assert!(Cli::try_parse_from(["lcats", "extract", "story.json", "--max-chunks", "3"]).is_err());
        assert!(Cli::try_parse_from(["lcats", "extract", "story.json", "--max-tokens", "0"]).is_err());
    }
}
