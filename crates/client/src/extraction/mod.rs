//! Structured event extraction from story text.
//!
//! ### Pipeline
//!
//! 1. Render the template into a system message and a user message.
//! 2. Ask the [`CompletionClient`] for a completion.
//! 3. Parse the text as JSON, falling back to a single fenced `json` block.
//! 4. Take the `events` array from the parsed object.
//!
//! Each stage that fails stops the pipeline and is recorded on the
//! [`ExtractionResult`]; [`extract_from_story`] itself never fails. There are
//! no retries.

pub mod error;
pub mod parse;
mod result;

pub use error::{ParseError, SchemaError};
pub use parse::{FencedBlock, extract_fenced_code_blocks, extract_json};
pub use result::{ExtractionOutcome, ExtractionResult};

use serde::{Deserialize, Serialize};

use crate::completion::{CompletionClient, Message};

/// Placeholder in a user template replaced by the story text.
pub const STORY_PLACEHOLDER: &str = "{story_text}";

const EVENTS_SYSTEM_PROMPT: &str = "You are a literary analyst. You segment stories into narrative events. \
Respond only with a JSON object of the form {\"events\": [{\"type\": ..., \"text\": ...}]}. \
Each event's \"type\" is one of \"scene\", \"sequel\" or \"none\"; its \"text\" is the exact span \
of the story the event covers. Do not add commentary.";

const EVENTS_USER_TEMPLATE: &str =
    "Segment the following story into events.\n\nStory to process:\n\"\"\"{story_text}\"\"\"";

/// A named pair of system prompt and user template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionTemplate {
    pub name: String,
    pub system_template: String,
    pub user_template: String,
}

impl ExtractionTemplate {
    pub fn new(name: impl Into<String>, system_template: impl Into<String>, user_template: impl Into<String>) -> Self {
        Self { name: name.into(), system_template: system_template.into(), user_template: user_template.into() }
    }

    /// Template asking for scene/sequel event segmentation.
    pub fn events() -> Self {
        Self::new("scene-sequel-events", EVENTS_SYSTEM_PROMPT, EVENTS_USER_TEMPLATE)
    }

    /// Prompt for `story_text`: the system message, then the user message.
    pub fn build_prompt(&self, story_text: &str) -> [Message; 2] {
        [
            Message::system(self.system_template.clone()),
            Message::user(self.user_template.replace(STORY_PLACEHOLDER, story_text)),
        ]
    }
}

/// Run one extraction of `story_text` with `template` against `client`.
pub fn extract_from_story<C>(story_text: &str, template: &ExtractionTemplate, client: &C) -> ExtractionResult
where
    C: CompletionClient + ?Sized,
{
    let messages = template.build_prompt(story_text);
    let result = ExtractionResult::new(story_text, &template.name, messages.to_vec());

    let completion = match client.respond(&messages) {
        Ok(completion) => completion,
        Err(e) => {
            tracing::warn!("completion request failed for template {}: {}", template.name, e);
            return result.request_failed(e);
        }
    };

    let result = result.responded(completion.model, completion.text);
    let raw = result.raw_output().unwrap_or_default();

    let result = match extract_json(raw) {
        Ok(value) => result.parsed(value),
        Err(e) => result.parse_failed(e),
    };

    tracing::debug!(
        template = %template.name,
        outcome = ?result.outcome(),
        events = result.events().len(),
        "extraction finished"
    );

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::{Completion, CompletionError, Role};
    use std::cell::RefCell;

    const STORY: &str = "Alice opened the door and stepped into a world of wonder.";

    const TWO_EVENTS: &str = concat!(
        r#"{"events": [{"type": "scene", "text": "Alice opened the door."}, "#,
        r#"{"type": "none", "text": "She stepped into a world of wonder."}]}"#
    );

    /// Replies with fixed text and records the prompts it was sent.
    struct StubClient {
        reply: Result<String, CompletionError>,
        seen: RefCell<Vec<Vec<Message>>>,
    }

    impl StubClient {
        fn replying(text: &str) -> Self {
            Self { reply: Ok(text.to_string()), seen: RefCell::new(Vec::new()) }
        }

        fn failing(error: CompletionError) -> Self {
            Self { reply: Err(error), seen: RefCell::new(Vec::new()) }
        }
    }

    impl CompletionClient for StubClient {
        fn respond(&self, messages: &[Message]) -> Result<Completion, CompletionError> {
            self.seen.borrow_mut().push(messages.to_vec());
            self.reply.clone().map(|text| Completion { model: "gpt-3.5-turbo".to_string(), text })
        }
    }

    fn template() -> ExtractionTemplate {
        ExtractionTemplate::new("test-template", "System prompt here.", "Story to process:\n\"\"\"{story_text}\"\"\"")
    }

    #[test]
    fn test_prompt_template_renders_correctly() {
        let messages = template().build_prompt(STORY);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[0].content, "System prompt here.");
        assert_eq!(messages[1].role, Role::User);
        assert!(messages[1].content.contains("Story to process"));
        assert!(messages[1].content.contains(STORY));
    }

    #[test]
    fn test_events_template_has_placeholder() {
        let template = ExtractionTemplate::events();
        assert!(template.user_template.contains(STORY_PLACEHOLDER));
        let messages = template.build_prompt(STORY);
        assert!(!messages[1].content.contains(STORY_PLACEHOLDER));
        assert!(messages[1].content.contains(STORY));
    }

    #[test]
    fn test_extract_successful() {
        let client = StubClient::replying(TWO_EVENTS);
        let result = extract_from_story(STORY, &template(), &client);

        assert_eq!(result.model_name(), "gpt-3.5-turbo");
        assert_eq!(result.events().len(), 2);
        assert!(result.parsing_error().is_none());
        assert!(result.extraction_error().is_none());
        assert_eq!(result.events()[0]["type"], "scene");
        assert_eq!(result.outcome(), ExtractionOutcome::Extracted);

        let seen = client.seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0][0].role, Role::System);
        assert_eq!(seen[0][1].role, Role::User);
    }

    #[test]
    fn test_extract_fails_on_invalid_json() {
        let client = StubClient::replying("this is not JSON");
        let result = extract_from_story(STORY, &template(), &client);

        assert!(result.parsed_output().is_none());
        assert!(result.parsing_error().is_some());
        assert!(result.extraction_error().unwrap().contains("Failed to parse JSON"));
        assert!(result.events().is_empty());
        assert_eq!(result.outcome(), ExtractionOutcome::ParseFailed);
    }

    #[test]
    fn test_extract_fails_on_missing_events_key() {
        let client = StubClient::replying(r#"{"not_events": []}"#);
        let result = extract_from_story(STORY, &template(), &client);

        assert!(result.parsed_output().is_some());
        assert!(result.events().is_empty());
        assert!(result.extraction_error().unwrap().contains("missing 'events' key"));
        assert!(result.parsing_error().is_none());
        assert_eq!(result.outcome(), ExtractionOutcome::SchemaFailed);
    }

    #[test]
    fn test_extract_recovers_fenced_json() {
        let reply = format!("Sure! Here you go:\n```json\n{TWO_EVENTS}\n```");
        let client = StubClient::replying(&reply);
        let result = extract_from_story(STORY, &template(), &client);

        assert_eq!(result.events().len(), 2);
        assert!(result.extraction_error().is_none());
    }

    #[test]
    fn test_extract_captures_client_failure() {
        let client = StubClient::failing(CompletionError::HttpError { status: 503 });
        let result = extract_from_story(STORY, &template(), &client);

        assert_eq!(result.outcome(), ExtractionOutcome::RequestFailed);
        assert_eq!(result.model_name(), "unknown");
        assert!(result.extraction_error().unwrap().contains("HTTP error: 503"));
        assert_eq!(result.messages().len(), 2);
    }

    #[test]
    fn test_summary_and_validation() {
        let client = StubClient::replying(TWO_EVENTS);
        let result = extract_from_story(STORY, &template(), &client);

        let summary = result.summary();
        assert!(summary.contains("Model: gpt-3.5-turbo"));
        assert!(summary.contains("Events extracted: 2"));
        assert!(result.validate_events().is_empty());
    }

    #[test]
    fn test_extract_through_trait_object() {
        let client = StubClient::replying(TWO_EVENTS);
        let dyn_client: &dyn CompletionClient = &client;
        let result = extract_from_story(STORY, &template(), dyn_client);
        assert!(result.is_success());
    }
}
