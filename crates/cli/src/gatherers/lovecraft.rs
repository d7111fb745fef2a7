//! H. P. Lovecraft stories from Project Gutenberg.
//!
//! Each story has its own page; the text sits between Gutenberg's start and
//! end separators.

use lcats_client::extract::{BetweenIds, text_between_ids};
use lcats_core::DataGatherer;

use super::{GatherContext, GatherReport, Source, Story, gather_stories};

const AUTHOR: &str = "H. P. Lovecraft";

const LICENSE: &str = "Public domain, from Project Gutenberg.";

const fn story(title: &'static str, url: &'static str) -> Story {
    Story::new(title, url, AUTHOR, 1925)
}

const STORIES: [Story; 17] = [
    story("The Call of Cthulhu", "https://www.gutenberg.org/cache/epub/68283/pg68283-images.html"),
    story("The Dunwich Horror", "https://www.gutenberg.org/cache/epub/50133/pg50133-images.html"),
    story("At the Mountains of Madness", "https://www.gutenberg.org/cache/epub/70652/pg70652-images.html"),
    story("The Shadow over Innsmouth", "https://www.gutenberg.org/cache/epub/73181/pg73181-images.html"),
    story("The Colour out of Space", "https://www.gutenberg.org/cache/epub/68236/pg68236-images.html"),
    story("The Shunned House", "https://www.gutenberg.org/cache/epub/31469/pg31469-images.html"),
    story("The Case of Charles Dexter Ward", "https://www.gutenberg.org/cache/epub/73547/pg73547-images.html"),
    story("The Horror at Red Hook", "https://www.gutenberg.org/cache/epub/72966/pg72966-images.html"),
    story("The Thing on the Door-Step", "https://www.gutenberg.org/cache/epub/73230/pg73230-images.html"),
    story("The Festival", "https://www.gutenberg.org/cache/epub/68553/pg68553-images.html"),
    story("The Haunter of the Dark", "https://www.gutenberg.org/cache/epub/73233/pg73233-images.html"),
    story("The Lurking Fear", "https://www.gutenberg.org/cache/epub/70486/pg70486-images.html"),
    story("Through the Gates of the Silver Key", "https://www.gutenberg.org/cache/epub/71167/pg71167-images.html"),
    story("The Silver Key", "https://www.gutenberg.org/cache/epub/70478/pg70478-images.html"),
    story("Cool Air", "https://www.gutenberg.org/cache/epub/73177/pg73177-images.html"),
    story("The Quest of Iranon", "https://www.gutenberg.org/cache/epub/73182/pg73182-images.html"),
    story("He", "https://www.gutenberg.org/cache/epub/68547/pg68547-images.html"),
];

pub fn source() -> Source {
    Source { name: "lovecraft", description: "Lovecraft stories from the Gutenberg Project.", gather }
}

fn locate(_: &Story, html: &str) -> Option<String> {
    text_between_ids(html, &BetweenIds::default())
}

fn gather(ctx: &GatherContext<'_>) -> GatherReport {
    let source = source();
    let gatherer = DataGatherer::new(source.name, &ctx.data_root)
        .with_description(source.description)
        .with_license(LICENSE);
    gather_stories(ctx, gatherer, &STORIES, locate)
}
