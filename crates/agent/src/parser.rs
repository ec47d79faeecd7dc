//! Output parser — turns a raw model completion into a structured
//! `ParsedResponse`.
//!
//! The ReAct protocol is plain text with three labeled forms:
//!
//! ```text
//! Thought: <reasoning>
//! Action: <JSON object naming a tool and its parameters>
//! Final Answer: <terminal response>
//! ```
//!
//! Parsing is an explicit scanner with ordered alternatives — first
//! match wins:
//!
//! 1. `Final Answer:` beats everything, including a co-present Action.
//! 2. An `Action:` whose payload decodes as `{"tool": ..., "parameters": {...}}`
//!    becomes an Action, carrying the Thought that preceded it.
//! 3. An announced Action whose payload does NOT decode is fatal for the
//!    step, even when a Thought is present.
//! 4. A lone `Thought:` is a Thought.
//! 5. Anything else is unparseable.
//!
//! A label's content runs from just after the label to the first
//! newline followed by an ASCII uppercase letter (the start of the next
//! labeled line), or to the end of the input.

use cogito_core::error::ParseError;
use cogito_core::tool::{ToolOutput, ToolParams};
use serde_json::Value;

const FINAL_ANSWER_LABEL: &str = "Final Answer: ";
const THOUGHT_LABEL: &str = "Thought: ";
const ACTION_LABEL: &str = "Action: ";

/// One structured interpretation of a model completion.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedResponse {
    /// Intermediate reasoning, no action yet
    Thought { content: String },
    /// A request to invoke a tool, with the reasoning that produced it
    Action {
        thought: Option<String>,
        tool: String,
        parameters: ToolParams,
    },
    /// Terminal output of the loop
    FinalAnswer { content: String },
}

/// The output grammar parser. Stateless; `parse` is a pure function.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputParser;

impl OutputParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a model completion into exactly one `ParsedResponse`.
    pub fn parse(&self, text: &str) -> Result<ParsedResponse, ParseError> {
        let text = text.trim();

        if let Some(content) = capture(text, FINAL_ANSWER_LABEL) {
            return Ok(ParsedResponse::FinalAnswer { content });
        }

        let thought = capture(text, THOUGHT_LABEL);

        if let Some(payload) = capture(text, ACTION_LABEL) {
            let (tool, parameters) = decode_action(&payload)?;
            return Ok(ParsedResponse::Action {
                thought,
                tool,
                parameters,
            });
        }

        if let Some(content) = thought {
            return Ok(ParsedResponse::Thought { content });
        }

        Err(ParseError::Unrecognized {
            snippet: snippet(text),
        })
    }

    /// Render a tool call as the JSON text the model is asked to emit.
    pub fn format_tool_response(&self, name: &str, parameters: &ToolParams) -> String {
        let call = serde_json::json!({
            "tool": name,
            "parameters": parameters,
        });
        serde_json::to_string_pretty(&call).unwrap_or_default()
    }

    /// Render a tool result as observation text: structured values are
    /// serialized as JSON, scalars are stringified.
    pub fn format_observation(&self, output: &ToolOutput) -> String {
        match output {
            ToolOutput::Structured(value) => {
                serde_json::to_string_pretty(value).unwrap_or_default()
            }
            ToolOutput::Scalar(scalar) => scalar.to_string(),
        }
    }
}

/// Capture the content following `label`, up to the next labeled line
/// or end of input. The label may occur anywhere in the text.
fn capture(text: &str, label: &str) -> Option<String> {
    let start = text.find(label)? + label.len();
    let rest = &text[start..];

    let bytes = rest.as_bytes();
    let mut end = rest.len();
    for i in 0..bytes.len() {
        if bytes[i] == b'\n' && bytes.get(i + 1).is_some_and(|c| c.is_ascii_uppercase()) {
            end = i;
            break;
        }
    }

    Some(rest[..end].trim().to_string())
}

/// Decode an Action payload: a JSON object with a string `tool` key and
/// an optional `parameters` object.
fn decode_action(payload: &str) -> Result<(String, ToolParams), ParseError> {
    let value: Value =
        serde_json::from_str(payload).map_err(|e| ParseError::InvalidActionPayload {
            reason: e.to_string(),
        })?;

    let object = value
        .as_object()
        .ok_or_else(|| ParseError::InvalidActionPayload {
            reason: "Action payload is not a JSON object".into(),
        })?;

    let tool = object
        .get("tool")
        .and_then(Value::as_str)
        .ok_or_else(|| ParseError::InvalidActionPayload {
            reason: "Action payload is missing a string 'tool' key".into(),
        })?
        .to_string();

    let parameters = match object.get("parameters") {
        None => ToolParams::new(),
        Some(Value::Object(map)) => map.clone(),
        Some(_) => {
            return Err(ParseError::InvalidActionPayload {
                reason: "Action 'parameters' is not a JSON object".into(),
            });
        }
    };

    Ok((tool, parameters))
}

fn snippet(text: &str) -> String {
    text.chars().take(100).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cogito_core::tool::Scalar;

    fn parser() -> OutputParser {
        OutputParser::new()
    }

    #[test]
    fn parses_final_answer() {
        let result = parser().parse("Final Answer: The result is 4.").unwrap();
        assert_eq!(
            result,
            ParsedResponse::FinalAnswer {
                content: "The result is 4.".into()
            }
        );
    }

    #[test]
    fn final_answer_beats_action() {
        let text = "Thought: I am done.\n\
                    Action: {\"tool\": \"calculator\", \"parameters\": {\"expression\": \"2+2\"}}\n\
                    Final Answer: 4";
        let result = parser().parse(text).unwrap();
        assert_eq!(result, ParsedResponse::FinalAnswer { content: "4".into() });
    }

    #[test]
    fn parses_thought_alone() {
        let result = parser()
            .parse("Thought: I should figure out what the user wants.")
            .unwrap();
        assert_eq!(
            result,
            ParsedResponse::Thought {
                content: "I should figure out what the user wants.".into()
            }
        );
    }

    #[test]
    fn thought_content_spans_lowercase_continuation_lines() {
        let text = "Thought: this is step one\nand this is still the same thought";
        let result = parser().parse(text).unwrap();
        assert_eq!(
            result,
            ParsedResponse::Thought {
                content: "this is step one\nand this is still the same thought".into()
            }
        );
    }

    #[test]
    fn thought_stops_at_next_labeled_line() {
        let text = "Final Answer: done\nThought: leftover";
        // Final Answer content must not swallow the Thought label line
        let result = parser().parse(text).unwrap();
        assert_eq!(
            result,
            ParsedResponse::FinalAnswer {
                content: "done".into()
            }
        );
    }

    #[test]
    fn parses_action_with_parameters_and_thought() {
        let text = "Thought: I need to compute something.\n\
                    Action: {\"tool\": \"calculator\", \"parameters\": {\"expression\": \"2+2\"}}";
        let result = parser().parse(text).unwrap();
        match result {
            ParsedResponse::Action {
                thought,
                tool,
                parameters,
            } => {
                assert_eq!(thought.as_deref(), Some("I need to compute something."));
                assert_eq!(tool, "calculator");
                assert_eq!(parameters.get("expression").unwrap(), "2+2");
            }
            other => panic!("Expected Action, got: {other:?}"),
        }
    }

    #[test]
    fn action_parameters_default_to_empty() {
        let result = parser()
            .parse("Action: {\"tool\": \"current_time\"}")
            .unwrap();
        match result {
            ParsedResponse::Action {
                tool, parameters, ..
            } => {
                assert_eq!(tool, "current_time");
                assert!(parameters.is_empty());
            }
            other => panic!("Expected Action, got: {other:?}"),
        }
    }

    #[test]
    fn undecodable_action_is_fatal_even_with_thought() {
        let text = "Thought: let me use a tool.\nAction: {not valid json";
        let err = parser().parse(text).unwrap_err();
        assert!(matches!(err, ParseError::InvalidActionPayload { .. }));
    }

    #[test]
    fn action_payload_must_be_an_object() {
        let err = parser().parse("Action: [1, 2, 3]").unwrap_err();
        assert!(matches!(err, ParseError::InvalidActionPayload { .. }));
    }

    #[test]
    fn action_requires_string_tool_key() {
        let err = parser()
            .parse("Action: {\"parameters\": {\"x\": 1}}")
            .unwrap_err();
        assert!(matches!(err, ParseError::InvalidActionPayload { .. }));

        let err = parser().parse("Action: {\"tool\": 42}").unwrap_err();
        assert!(matches!(err, ParseError::InvalidActionPayload { .. }));
    }

    #[test]
    fn non_object_parameters_are_rejected() {
        let err = parser()
            .parse("Action: {\"tool\": \"search\", \"parameters\": [\"a\"]}")
            .unwrap_err();
        assert!(matches!(err, ParseError::InvalidActionPayload { .. }));
    }

    #[test]
    fn unlabeled_text_is_unrecognized() {
        let err = parser().parse("I'm just chatting with no labels").unwrap_err();
        assert!(matches!(err, ParseError::Unrecognized { .. }));
    }

    #[test]
    fn format_tool_response_emits_tool_and_parameters() {
        let mut params = ToolParams::new();
        params.insert("expression".into(), serde_json::json!("2+2"));

        let rendered = parser().format_tool_response("calculator", &params);
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["tool"], "calculator");
        assert_eq!(value["parameters"]["expression"], "2+2");
    }

    #[test]
    fn format_observation_stringifies_scalars() {
        let p = parser();
        assert_eq!(p.format_observation(&ToolOutput::number(4.0)), "4");
        assert_eq!(p.format_observation(&ToolOutput::number(2.5)), "2.5");
        assert_eq!(p.format_observation(&ToolOutput::text("hi")), "hi");
        assert_eq!(
            p.format_observation(&ToolOutput::Scalar(Scalar::Bool(true))),
            "true"
        );
    }

    #[test]
    fn structured_observation_roundtrips() {
        let original = serde_json::json!({
            "location": "Tokyo",
            "temperature_c": 21.5,
            "conditions": "Clear skies"
        });
        let rendered = parser().format_observation(&ToolOutput::structured(original.clone()));
        let back: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(back, original);
    }
}
