//! Template Parser: line-oriented state machine over the fixed section vocabulary.
//!
//! The parser never fails. Anything it cannot place is reported back in
//! `ParsedTemplate::unrecognized_sections` / `unmatched_lines` instead of being
//! dropped, so callers can show the user what was ignored.

use serde::Serialize;
use tracing::debug;

use crate::models::resume::ResumeData;
use crate::template::placeholder::is_unfilled;
use crate::template::section::{Field, Section};

/// A `## ` header whose text matched nothing in the vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnrecognizedSection {
    pub heading: String,
    pub body: String,
}

/// Parser output: the structured record plus everything that did not fit it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedTemplate {
    pub data: ResumeData,
    pub unrecognized_sections: Vec<UnrecognizedSection>,
    /// Lines outside any section, and key/value lines with an unknown key.
    pub unmatched_lines: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
enum State {
    Preamble,
    Known(Section),
    /// Index into `unrecognized_sections`.
    Unknown(usize),
}

struct Parser<'a> {
    state: State,
    body: Vec<&'a str>,
    out: ParsedTemplate,
}

/// Parses template text into a `ResumeData` plus a report of leftovers.
pub fn parse_template(text: &str) -> ParsedTemplate {
    let mut parser = Parser {
        state: State::Preamble,
        body: Vec::new(),
        out: ParsedTemplate::default(),
    };

    for line in text.lines() {
        parser.feed(line);
    }
    parser.finish_section();

    debug!(
        unrecognized = parser.out.unrecognized_sections.len(),
        unmatched = parser.out.unmatched_lines.len(),
        "template parsed"
    );
    parser.out
}

impl<'a> Parser<'a> {
    fn feed(&mut self, line: &'a str) {
        if let Some(heading) = header_text(line) {
            self.finish_section();
            self.state = match Section::from_heading(heading) {
                Some(section) => State::Known(section),
                None => {
                    self.out.unrecognized_sections.push(UnrecognizedSection {
                        heading: heading.to_string(),
                        body: String::new(),
                    });
                    State::Unknown(self.out.unrecognized_sections.len() - 1)
                }
            };
            return;
        }

        match self.state {
            State::Preamble => {
                if !line.trim().is_empty() && !is_rule(line) {
                    self.out.unmatched_lines.push(line.trim().to_string());
                }
            }
            State::Known(section) if section.is_key_value() => self.key_value_line(section, line),
            State::Known(_) | State::Unknown(_) => self.body.push(line),
        }
    }

    fn key_value_line(&mut self, section: Section, line: &str) {
        let trimmed = line.trim();
        if trimmed.is_empty() || is_rule(trimmed) {
            return;
        }

        let field = split_key_value(trimmed)
            .and_then(|(key, value)| Field::lookup(section, key).map(|field| (field, value)));

        match field {
            Some((field, value)) => *field.slot(&mut self.out.data) = normalize_value(value),
            None => self.out.unmatched_lines.push(trimmed.to_string()),
        }
    }

    /// Flushes the collected body into the section that owns it.
    fn finish_section(&mut self) {
        let body = block_text(&self.body);
        self.body.clear();

        match self.state {
            State::Preamble => {}
            State::Known(section) => {
                let Some(slot) = section.block_slot(&mut self.out.data) else {
                    return;
                };
                let Some(body) = body.filter(|b| !is_unfilled(b)) else {
                    return;
                };
                // A repeated section appends to what the first occurrence wrote.
                *slot = Some(match slot.take() {
                    Some(existing) => format!("{existing}\n\n{body}"),
                    None => body,
                });
            }
            State::Unknown(index) => {
                if let Some(body) = body {
                    self.out.unrecognized_sections[index].body = body;
                }
            }
        }
    }
}

/// `## Heading` → `Heading`. Deeper headers (`###`), a bare `##` and
/// `##Heading` without the space belong to the section body.
fn header_text(line: &str) -> Option<&str> {
    let heading = line.strip_prefix("## ")?.trim();
    if heading.is_empty() {
        return None;
    }
    Some(heading)
}

/// Markdown horizontal rules the model likes to put between sections. Inside a
/// block they are content; only the ones at a block's edges are separators.
fn is_rule(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= 3 && (trimmed.chars().all(|c| c == '-') || trimmed.chars().all(|c| c == '*'))
}

/// Splits `Key：Value`. The full-width colon wins when both are present, so
/// `LinkedIn：https://…` keeps its URL intact.
fn split_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line
        .split_once('：')
        .or_else(|| line.split_once(':'))?;
    let key = key
        .trim()
        .trim_start_matches(|c: char| matches!(c, '-' | '*' | '•'))
        .trim_matches('*')
        .trim();
    if key.is_empty() {
        return None;
    }
    Some((key, value))
}

fn normalize_value(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() || is_unfilled(value) {
        None
    } else {
        Some(value.to_string())
    }
}

/// Joins body lines with blank and rule edges removed. `None` when nothing is
/// left.
fn block_text(lines: &[&str]) -> Option<String> {
    let is_edge = |l: &&str| l.trim().is_empty() || is_rule(l);
    let start = lines.iter().position(|l| !is_edge(l))?;
    let end = lines.iter().rposition(|l| !is_edge(l))?;
    Some(
        lines[start..=end]
            .iter()
            .map(|l| l.trim_end())
            .collect::<Vec<_>>()
            .join("\n"),
    )
}
