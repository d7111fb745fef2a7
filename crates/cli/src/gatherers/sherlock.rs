//! Sherlock Holmes stories from Project Gutenberg.
//!
//! All stories share one page of *The Adventures of Sherlock Holmes*; each is
//! located by its chapter heading.

use lcats_client::extract::{SectionTags, section_after_heading};
use lcats_core::DataGatherer;

use super::{GatherContext, GatherReport, Source, Story, gather_stories};

const ADVENTURES_URL: &str = "https://www.gutenberg.org/files/1661/1661-h/1661-h.htm";

/// Stories paired with the heading text that opens each one.
const STORIES: [(Story, &str); 1] = [(
    Story {
        file: Some("scandal_in_bohemia"),
        display: Some("Sherlock Holmes - A Scandal in Bohemia"),
        ..Story::new("A Scandal in Bohemia", ADVENTURES_URL, "Arthur Conan Doyle", 1891)
    },
    "A SCANDAL IN BOHEMIA",
)];

pub fn source() -> Source {
    Source { name: "sherlock", description: "Sherlock Holmes stories from the Gutenberg Project.", gather }
}

fn heading_for(story: &Story) -> Option<&'static str> {
    STORIES.iter().find(|(s, _)| s.title == story.title).map(|(_, heading)| *heading)
}

fn locate(story: &Story, html: &str) -> Option<String> {
    section_after_heading(html, heading_for(story)?, &SectionTags::default())
}

fn gather(ctx: &GatherContext<'_>) -> GatherReport {
    let source = source();
    let gatherer = DataGatherer::new(source.name, &ctx.data_root).with_description(source.description);
    let stories: Vec<Story> = STORIES.iter().map(|(story, _)| *story).collect();
    gather_stories(ctx, gatherer, &stories, locate)
}
