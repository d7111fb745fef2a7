//! Outcome record of a single extraction call.
//!
//! An [`ExtractionResult`] is built up stage by stage: prompt, completion,
//! parsed JSON, events. Whichever stage stops the pipeline leaves its error
//! on the record, and [`ExtractionResult::outcome`] names that stage.

use serde::Serialize;
use serde_json::Value;

use super::error::{ParseError, SchemaError, kind_of};
use crate::completion::Message;

/// Terminal state of one extraction call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionOutcome {
    /// Events were found under the expected key.
    Extracted,
    /// The completion service call itself failed.
    RequestFailed,
    /// The completion text was not recoverable as JSON.
    ParseFailed,
    /// JSON was recovered but lacks a usable `events` array.
    SchemaFailed,
}

/// Everything known about one extraction call.
///
/// Failures are recorded here rather than returned; a result is always
/// produced and can be inspected on its own.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    story_text: String,
    model_name: String,
    template_name: String,
    messages: Vec<Message>,
    raw_output: Option<String>,
    parsed_output: Option<Value>,
    parsing_error: Option<String>,
    extraction_error: Option<String>,
    events: Vec<Value>,
}

impl ExtractionResult {
    pub(crate) fn new(story_text: &str, template_name: &str, messages: Vec<Message>) -> Self {
        Self {
            story_text: story_text.to_string(),
            model_name: "unknown".to_string(),
            template_name: template_name.to_string(),
            messages,
            raw_output: None,
            parsed_output: None,
            parsing_error: None,
            extraction_error: None,
            events: Vec::new(),
        }
    }

    pub(crate) fn request_failed(mut self, error: impl std::fmt::Display) -> Self {
        self.extraction_error = Some(format!("completion request failed: {error}"));
        self
    }

    pub(crate) fn responded(mut self, model: String, text: String) -> Self {
        self.model_name = model;
        self.raw_output = Some(text);
        self
    }

    pub(crate) fn parse_failed(mut self, error: ParseError) -> Self {
        let length = self.raw_output.as_deref().map(|t| t.chars().count()).unwrap_or(0);
        self.parsing_error = Some(error.to_string());
        self.extraction_error = Some(format!("Failed to parse JSON from completion output (length: {length} chars)"));
        self
    }

    /// Record parsed JSON and pull `events` out of it.
    pub(crate) fn parsed(mut self, value: Value) -> Self {
        match events_of(&value) {
            Ok(events) => self.events = events,
            Err(e) => self.extraction_error = Some(e.to_string()),
        }
        self.parsed_output = Some(value);
        self
    }

    /// Model reported by the completion service, or `unknown` if it never answered.
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// The prompt sent: system message, then user message.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn raw_output(&self) -> Option<&str> {
        self.raw_output.as_deref()
    }

    pub fn parsed_output(&self) -> Option<&Value> {
        self.parsed_output.as_ref()
    }

    pub fn parsing_error(&self) -> Option<&str> {
        self.parsing_error.as_deref()
    }

    pub fn extraction_error(&self) -> Option<&str> {
        self.extraction_error.as_deref()
    }

    pub fn events(&self) -> &[Value] {
        &self.events
    }

    pub fn outcome(&self) -> ExtractionOutcome {
        if self.raw_output.is_none() {
            ExtractionOutcome::RequestFailed
        } else if self.parsed_output.is_none() {
            ExtractionOutcome::ParseFailed
        } else if self.extraction_error.is_some() {
            ExtractionOutcome::SchemaFailed
        } else {
            ExtractionOutcome::Extracted
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome() == ExtractionOutcome::Extracted
    }

    /// Human-readable multi-line summary.
    pub fn summary(&self) -> String {
        let mut lines = vec![
            format!("Model: {}", self.model_name),
            format!("Template: {}", self.template_name),
            format!("Events extracted: {}", self.events.len()),
        ];
        if let Some(error) = &self.parsing_error {
            lines.push(format!("Parsing error: {error}"));
        }
        if let Some(error) = &self.extraction_error {
            lines.push(format!("Extraction error: {error}"));
        }
        lines.join("\n")
    }

    /// Structural complaints about the extracted events.
    ///
    /// Every event must be an object with string `type` and `text` fields.
    /// An empty list means the events are well-formed, not that they are right.
    pub fn validate_events(&self) -> Vec<String> {
        let mut complaints = Vec::new();
        for (index, event) in self.events.iter().enumerate() {
            let Some(fields) = event.as_object() else {
                complaints.push(format!("event {index}: expected an object, found {}", kind_of(event)));
                continue;
            };
            for field in ["type", "text"] {
                match fields.get(field) {
                    Some(Value::String(_)) => {}
                    Some(other) => {
                        let kind = kind_of(other);
                        complaints.push(format!("event {index}: field '{field}' must be a string, found {kind}"));
                    }
                    None => complaints.push(format!("event {index}: missing field '{field}'")),
                }
            }
        }
        complaints
    }
}

fn events_of(value: &Value) -> Result<Vec<Value>, SchemaError> {
    let object = value.as_object().ok_or(SchemaError::NotAnObject(kind_of(value)))?;
    match object.get("events") {
        Some(Value::Array(events)) => Ok(events.clone()),
        Some(other) => Err(SchemaError::EventsNotArray(kind_of(other))),
        None => Err(SchemaError::MissingEvents(object.keys().cloned().collect())),
    }
}
