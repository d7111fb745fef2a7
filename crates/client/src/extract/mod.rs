//! Text location in fetched HTML pages.
//!
//! Source acquirers use these to cut story text out of a full page:
//!
//! ### Marker ranges
//! - [`text_between_ids`] collects content elements strictly between two
//!   elements identified by `id`, in document order (nested elements included).
//!
//! ### Heading sections
//! - [`section_after_heading`] finds a heading by its text and walks the
//!   heading's following siblings until an end tag.
//!
//! Both return `None` when their anchors are missing, never an error.

use scraper::{ElementRef, Html};

/// Default id of the element opening a marked range.
pub const DEFAULT_START_ID: &str = "pg-start-separator";

/// Default id of the element closing a marked range.
pub const DEFAULT_END_ID: &str = "pg-end-separator";

/// Default tags collected inside a marked range.
pub const DEFAULT_CONTENT_TAGS: &[&str] = &["p", "h1", "h2", "h3", "h4", "h5", "h6"];

/// Default separator between collected elements of a marked range.
pub const DEFAULT_SEPARATOR: &str = "\n\n";

/// Default tags that can open a heading section.
pub const DEFAULT_HEADING_TAGS: &[&str] = &["h2", "h3"];

/// Default tags that close a heading section.
pub const DEFAULT_END_TAGS: &[&str] = &["h2", "div"];

/// Default tags collected inside a heading section.
pub const DEFAULT_BODY_TAGS: &[&str] = &["p"];

/// Options for [`text_between_ids`].
#[derive(Debug, Clone)]
pub struct BetweenIds {
    pub start_id: String,
    pub end_id: String,
    pub content_tags: Vec<String>,
    pub separator: String,
}

impl Default for BetweenIds {
    fn default() -> Self {
        Self {
            start_id: DEFAULT_START_ID.to_string(),
            end_id: DEFAULT_END_ID.to_string(),
            content_tags: to_owned(DEFAULT_CONTENT_TAGS),
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }
}

impl BetweenIds {
    /// Replace the collected tags.
    pub fn with_content_tags(mut self, tags: &[&str]) -> Self {
        self.content_tags = to_owned(tags);
        self
    }

    /// Replace the separator placed between collected elements.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }
}

/// Options for [`section_after_heading`].
#[derive(Debug, Clone)]
pub struct SectionTags {
    pub heading_tags: Vec<String>,
    pub end_tags: Vec<String>,
    pub body_tags: Vec<String>,
}

impl Default for SectionTags {
    fn default() -> Self {
        Self {
            heading_tags: to_owned(DEFAULT_HEADING_TAGS),
            end_tags: to_owned(DEFAULT_END_TAGS),
            body_tags: to_owned(DEFAULT_BODY_TAGS),
        }
    }
}

impl SectionTags {
    pub fn with_heading_tags(mut self, tags: &[&str]) -> Self {
        self.heading_tags = to_owned(tags);
        self
    }

    pub fn with_end_tags(mut self, tags: &[&str]) -> Self {
        self.end_tags = to_owned(tags);
        self
    }

    pub fn with_body_tags(mut self, tags: &[&str]) -> Self {
        self.body_tags = to_owned(tags);
        self
    }
}

fn to_owned(tags: &[&str]) -> Vec<String> {
    tags.iter().map(|t| t.to_string()).collect()
}

fn has_tag(element: &ElementRef<'_>, tags: &[String]) -> bool {
    let name = element.value().name();
    tags.iter().any(|t| t.eq_ignore_ascii_case(name))
}

/// All text of an element with whitespace runs collapsed to single spaces.
fn collapsed_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().split_whitespace().collect::<Vec<_>>().join(" ")
}

/// All text of an element, one trimmed line per non-blank source line.
fn trimmed_lines(element: &ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Text of the content elements between the elements with ids `start_id` and `end_id`.
///
/// Elements are visited in document order starting just after the start
/// marker, so content nested inside the marker or in later containers is
/// included. Each element contributes its whitespace-collapsed text; empty
/// texts are skipped. If the end marker does not follow the start marker,
/// collection runs to the end of the document.
///
/// Returns `None` if either marker is missing.
pub fn text_between_ids(html: &str, options: &BetweenIds) -> Option<String> {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let find = |id: &str| root.descendants().filter_map(ElementRef::wrap).find(|el| el.value().id() == Some(id));
    let start = find(&options.start_id)?;
    let end = find(&options.end_id)?;

    let collected: Vec<String> = root
        .descendants()
        .skip_while(|node| *node != *start)
        .skip(1)
        .take_while(|node| *node != *end)
        .filter_map(ElementRef::wrap)
        .filter(|el| has_tag(el, &options.content_tags))
        .map(|el| collapsed_text(&el))
        .filter(|text| !text.is_empty())
        .collect();

    Some(collected.join(&options.separator))
}

/// Text of the section following the first heading containing `heading_text`.
///
/// The heading is the first element (document order) whose tag is one of
/// `heading_tags` and whose text contains `heading_text`. Its following
/// siblings are walked until one whose tag is in `end_tags`; siblings whose
/// tag is in `body_tags` contribute their trimmed text, joined by newlines.
///
/// Returns `None` if no heading matches.
pub fn section_after_heading(html: &str, heading_text: &str, tags: &SectionTags) -> Option<String> {
    let document = Html::parse_document(html);

    let heading = document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|el| has_tag(el, &tags.heading_tags) && collapsed_text(el).contains(heading_text))?;

    let paragraphs: Vec<String> = heading
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .take_while(|el| !has_tag(el, &tags.end_tags))
        .filter(|el| has_tag(el, &tags.body_tags))
        .map(|el| trimmed_lines(&el))
        .collect();

    tracing::trace!(heading = heading_text, paragraphs = paragraphs.len(), "located heading section");

    Some(paragraphs.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECTIONS: &str = r#"
        <div>
            <h2>Introduction</h2>
            <p>Welcome to the introduction.</p>
            <h2>Body</h2>
            <p>This is the body section paragraph one.</p>
            <p>This is the body section paragraph two.</p>
            <div>
                <h3>Subsection</h3>
                <p>This is a subsection within the body.</p>
            </div>
            <h2>Conclusion</h2>
            <p>Final thoughts.</p>
        </div>
    "#;

    const MARKED: &str = r#"
        <html><body>
            <p>Project Gutenberg header.</p>
            <div id="pg-start-separator"></div>
            <h2>THE CALL OF CTHULHU</h2>
            <p>The most   merciful thing
               in the world.</p>
            <div class="chapter">
                <p>I think, is the inability.</p>
                <p>   </p>
            </div>
            <span>not collected</span>
            <div id="pg-end-separator"></div>
            <p>License boilerplate.</p>
        </body></html>
    "#;

    #[test]
    fn test_section_basic() {
        let result = section_after_heading(SECTIONS, "Body", &SectionTags::default());
        assert_eq!(
            result.as_deref(),
            Some("This is the body section paragraph one.\nThis is the body section paragraph two.")
        );
    }

    #[test]
    fn test_section_with_subsection() {
        let tags = SectionTags::default().with_body_tags(&["p", "div"]).with_end_tags(&["h2", "h3"]);
        let result = section_after_heading(SECTIONS, "Body", &tags);
        assert_eq!(
            result.as_deref(),
            Some(
                "This is the body section paragraph one.\n\
                 This is the body section paragraph two.\n\
                 Subsection\n\
                 This is a subsection within the body."
            )
        );
    }

    #[test]
    fn test_section_missing_heading() {
        assert_eq!(section_after_heading(SECTIONS, "Nonexistent", &SectionTags::default()), None);
    }

    #[test]
    fn test_section_different_heading_tags() {
        let tags = SectionTags::default().with_heading_tags(&["h3"]).with_end_tags(&["h2"]);
        let result = section_after_heading(SECTIONS, "Subsection", &tags);
        assert_eq!(result.as_deref(), Some("This is a subsection within the body."));
    }

    #[test]
    fn test_section_runs_to_last_sibling() {
        let tags = SectionTags::default().with_end_tags(&[]);
        let result = section_after_heading(SECTIONS, "Body", &tags);
        assert_eq!(
            result.as_deref(),
            Some(
                "This is the body section paragraph one.\n\
                 This is the body section paragraph two.\n\
                 Final thoughts."
            )
        );
    }

    #[test]
    fn test_section_heading_text_is_substring() {
        let html = "<h2>I. A SCANDAL IN BOHEMIA</h2><p>To Sherlock Holmes she is always the woman.</p><h2>II.</h2>";
        let result = section_after_heading(html, "A SCANDAL IN BOHEMIA", &SectionTags::default());
        assert_eq!(result.as_deref(), Some("To Sherlock Holmes she is always the woman."));
    }

    #[test]
    fn test_between_ids_defaults() {
        let result = text_between_ids(MARKED, &BetweenIds::default());
        assert_eq!(
            result.as_deref(),
            Some("THE CALL OF CTHULHU\n\nThe most merciful thing in the world.\n\nI think, is the inability.")
        );
    }

    #[test]
    fn test_between_ids_custom_tags_and_separator() {
        let options = BetweenIds::default().with_content_tags(&["p"]).with_separator(" | ");
        let result = text_between_ids(MARKED, &options);
        assert_eq!(result.as_deref(), Some("The most merciful thing in the world. | I think, is the inability."));
    }

    #[test]
    fn test_between_ids_on_headings() {
        let html = SECTIONS
            .replace("<h2>Body</h2>", r#"<h2 id="pg-start-separator">Body</h2>"#)
            .replace("<h2>Conclusion</h2>", r#"<h2 id="pg-end-separator">Conclusion</h2>"#);
        let options = BetweenIds::default().with_content_tags(&["p", "h3"]).with_separator("\n");
        let result = text_between_ids(&html, &options);
        assert_eq!(
            result.as_deref(),
            Some(
                "This is the body section paragraph one.\n\
                 This is the body section paragraph two.\n\
                 Subsection\n\
                 This is a subsection within the body."
            )
        );
    }

    #[test]
    fn test_between_ids_missing_marker() {
        assert_eq!(text_between_ids(SECTIONS, &BetweenIds::default()), None);

        let only_start = r#"<div id="pg-start-separator"></div><p>text</p>"#;
        assert_eq!(text_between_ids(only_start, &BetweenIds::default()), None);
    }

    #[test]
    fn test_between_ids_empty_range() {
        let html = r#"<div id="pg-start-separator"></div><div id="pg-end-separator"></div>"#;
        assert_eq!(text_between_ids(html, &BetweenIds::default()).as_deref(), Some(""));
    }
}
