//! Extraction failure classes.
//!
//! Neither error is ever returned from the pipeline; both are rendered into
//! [`ExtractionResult`](super::ExtractionResult) fields.

/// Completion text could not be read as JSON.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Not JSON and no fenced block to fall back on.
    #[error("No JSON found in the string: {0}")]
    NoJson(String),

    /// More than one fenced block; none is chosen.
    #[error("Multiple fenced blocks found ({0}); expected exactly one")]
    MultipleBlocks(usize),

    /// The single fenced block is not tagged `json`.
    #[error("Expected JSON format, but got: {0}")]
    WrongFormat(String),

    /// The fenced `json` block itself is malformed.
    #[error("Malformed JSON in fenced block: {0}")]
    MalformedBlock(String),
}

/// JSON was parsed but does not have the expected shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("Parsed output is not a JSON object (found {0})")]
    NotAnObject(&'static str),

    #[error("Parsed output missing 'events' key. Found keys: [{}]", quoted(.0))]
    MissingEvents(Vec<String>),

    #[error("Parsed output 'events' is not an array (found {0})")]
    EventsNotArray(&'static str),
}

fn quoted(keys: &[String]) -> String {
    keys.iter().map(|k| format!("'{k}'")).collect::<Vec<_>>().join(", ")
}

/// JSON type name for error messages.
pub(crate) fn kind_of(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_events_lists_keys() {
        let err = SchemaError::MissingEvents(vec!["not_events".into(), "story".into()]);
        assert_eq!(err.to_string(), "Parsed output missing 'events' key. Found keys: ['not_events', 'story']");

        let err = SchemaError::MissingEvents(vec![]);
        assert_eq!(err.to_string(), "Parsed output missing 'events' key. Found keys: []");
    }

    #[test]
    fn test_kind_of() {
        assert_eq!(kind_of(&serde_json::json!([])), "array");
        assert_eq!(kind_of(&serde_json::json!("x")), "string");
        assert_eq!(kind_of(&serde_json::json!(null)), "null");
    }
}
