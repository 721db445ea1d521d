//! Line-oriented document parser
//!
//! A single pass over the input driven by [`State`]. Each state has its own
//! transition function; a transition either consumes the line or hands it to
//! the next state unchanged.

use crate::document::{Document, Metadata};
use crate::error::ParseError;
use crate::{
    BOLD_MARKER, BULLET_PREFIX, CATEGORY_TAG_CLOSE, CATEGORY_TAG_OPEN, METADATA_DELIMITER,
    SUMMARY_HEADER,
};
use serde_yaml::Value;
use story_model::{Story, DEFAULT_CATEGORY};

/// Parser position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Before any content; blank lines are skipped
    Start,
    /// Inside front matter opened at the given line
    InMetadata { opened_at: usize },
    /// Collecting summary lines
    InSummary,
    /// Collecting story lines
    InRecords,
}

/// Outcome of feeding one line to the current state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    /// Line consumed, continue with the next line in this state
    Consume(State),
    /// Line not consumed, feed it again to this state
    Requeue(State),
}

#[derive(Debug, Default)]
struct Parser {
    metadata: Option<Metadata>,
    metadata_buf: String,
    summary_lines: Vec<String>,
    records: Vec<Story>,
}

/// Parse a story document
///
/// Every story receives a freshly generated identifier.
///
/// # Errors
/// - [`ParseError::MetadataSyntax`] if the front matter is not a YAML mapping
/// - [`ParseError::UnclosedMetadata`] if the front matter is never closed
pub fn parse(text: &str) -> Result<Document, ParseError> {
    let mut parser = Parser::default();
    let mut state = State::Start;

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        loop {
            match parser.step(state, line_no, line)? {
                Transition::Consume(next) => {
                    state = next;
                    break;
                }
                Transition::Requeue(next) => state = next,
            }
        }
    }

    if let State::InMetadata { opened_at } = state {
        return Err(ParseError::UnclosedMetadata { line: opened_at });
    }

    Ok(parser.finish())
}

impl Parser {
    fn step(&mut self, state: State, line_no: usize, line: &str) -> Result<Transition, ParseError> {
        match state {
            State::Start => Ok(self.on_start(line_no, line)),
            State::InMetadata { opened_at } => self.on_metadata(opened_at, line),
            State::InSummary => Ok(self.on_summary(line)),
            State::InRecords => Ok(self.on_records(line)),
        }
    }

    fn on_start(&mut self, line_no: usize, line: &str) -> Transition {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            Transition::Consume(State::Start)
        } else if trimmed == METADATA_DELIMITER && self.metadata.is_none() {
            Transition::Consume(State::InMetadata { opened_at: line_no })
        } else if trimmed == SUMMARY_HEADER {
            Transition::Consume(State::InSummary)
        } else {
            Transition::Requeue(State::InRecords)
        }
    }

    /// The closing delimiter must start at column 0; indented `---` lines
    /// belong to block scalars.
    fn on_metadata(&mut self, opened_at: usize, line: &str) -> Result<Transition, ParseError> {
        if line.trim_end() == METADATA_DELIMITER {
            let buf = std::mem::take(&mut self.metadata_buf);
            self.metadata = Some(decode_metadata(&buf, opened_at)?);
            return Ok(Transition::Consume(State::Start));
        }
        self.metadata_buf.push_str(line);
        self.metadata_buf.push('\n');
        Ok(Transition::Consume(State::InMetadata { opened_at }))
    }

    fn on_summary(&mut self, line: &str) -> Transition {
        let trimmed = line.trim();
        if trimmed.starts_with(BULLET_PREFIX) || trimmed.starts_with(BOLD_MARKER) {
            return Transition::Requeue(State::InRecords);
        }
        self.summary_lines.push(line.to_string());
        Transition::Consume(State::InSummary)
    }

    fn on_records(&mut self, line: &str) -> Transition {
        if line.trim() == SUMMARY_HEADER {
            return Transition::Consume(State::InSummary);
        }
        if let Some(story) = parse_record_line(line) {
            self.records.push(story);
        }
        Transition::Consume(State::InRecords)
    }

    fn finish(self) -> Document {
        Document {
            metadata: self.metadata.unwrap_or_default(),
            summary: self.summary_lines.join("\n").trim().to_string(),
            records: self.records,
        }
    }
}

fn decode_metadata(buf: &str, opened_at: usize) -> Result<Metadata, ParseError> {
    if buf.trim().is_empty() {
        return Ok(Metadata::new());
    }

    let value: Value = serde_yaml::from_str(buf)
        .map_err(|e| ParseError::metadata_syntax(opened_at, e.to_string()))?;

    match value {
        Value::Null => Ok(Metadata::new()),
        Value::Mapping(map) => map
            .into_iter()
            .map(|(key, value)| Ok((metadata_key(key, opened_at)?, value)))
            .collect(),
        other => Err(ParseError::metadata_syntax(
            opened_at,
            format!("expected a mapping, found {}", value_kind(&other)),
        )),
    }
}

/// Scalar keys are kept as their textual form
fn metadata_key(key: Value, opened_at: usize) -> Result<String, ParseError> {
    match key {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(ParseError::metadata_syntax(
            opened_at,
            format!("unsupported metadata key: {}", value_kind(&other)),
        )),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

/// Parse one candidate story line
///
/// Returns `None` for anything that is not a bullet line.
fn parse_record_line(line: &str) -> Option<Story> {
    let payload = line.trim().strip_prefix(BULLET_PREFIX)?;
    let (description, category) = split_category_tag(payload);
    Some(Story::new(description, category))
}

/// Split a trailing `[Category: <label>]` tag off a payload
///
/// The tag counts only when it closes the payload; otherwise the whole payload
/// is the description.
fn split_category_tag(payload: &str) -> (&str, &str) {
    if payload.ends_with(CATEGORY_TAG_CLOSE) {
        if let Some(start) = payload.rfind(CATEGORY_TAG_OPEN) {
            let label = &payload[start + CATEGORY_TAG_OPEN.len()..payload.len() - 1];
            return (payload[..start].trim(), label);
        }
    }
    (payload.trim(), DEFAULT_CATEGORY)
}
