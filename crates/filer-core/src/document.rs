//! Front-matter documents.
//!
//! A document may open with a YAML block between `---` lines (the closing
//! line may also be `...`). Everything after the closing line is the body.

use crate::error::{FilerError, Result};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// An attribute that may be written as a single string or a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    One(String),
    Many(Vec<String>),
}

/// A milestone may be written as a number or as a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Milestone {
    Number(f64),
    Text(String),
}

impl Milestone {
    pub fn as_input(&self) -> String {
        match self {
            Milestone::Number(n) => n.to_string(),
            Milestone::Text(s) => s.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignees: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub milestone: Option<Milestone>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub attributes: Attributes,
    pub body: String,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Split `raw` into the next line (without its `\n`) and the remainder.
fn next_line(raw: &str) -> Option<(&str, &str)> {
    if raw.is_empty() {
        return None;
    }
    Some(match raw.find('\n') {
        Some(pos) => (&raw[..pos], &raw[pos + 1..]),
        None => (raw, ""),
    })
}

/// Return the YAML between the delimiters and the body after the closing line.
fn split_front_matter(raw: &str) -> Option<(&str, &str)> {
    let content = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let (opening, block) = next_line(content)?;
    if opening.trim_end() != "---" {
        return None;
    }

    let mut rest = block;
    let mut consumed = 0;
    loop {
        let (line, remainder) = next_line(rest)?;
        if matches!(line.trim_end(), "---" | "...") {
            return Some((&block[..consumed], remainder));
        }
        consumed += rest.len() - remainder.len();
        rest = remainder;
    }
}

/// Parse a raw document into attributes and body.
///
/// Without a front-matter block the attributes are empty and the body is the
/// whole input. A block that is present but is not a YAML mapping is an error.
pub fn parse(raw: &str) -> Result<Document> {
    let Some((yaml, body)) = split_front_matter(raw) else {
        return Ok(Document {
            attributes: Attributes::default(),
            body: raw.to_string(),
        });
    };

    let attributes = if yaml.trim().is_empty() {
        Attributes::default()
    } else {
        let value: serde_yaml::Value =
            serde_yaml::from_str(yaml).map_err(FilerError::MalformedInput)?;
        if value.is_null() {
            Attributes::default()
        } else {
            serde_yaml::from_value(value).map_err(FilerError::MalformedInput)?
        }
    };

    Ok(Document {
        attributes,
        body: body.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_front_matter_returns_whole_body() {
        for raw in [
            "",
            "Just a body.",
            "# Heading\n\nText with --- inside\n",
            "---",
            "----\ntitle: nope\n----\n",
        ] {
            let doc = parse(raw).unwrap();
            assert_eq!(doc.attributes, Attributes::default(), "input: {raw:?}");
            assert_eq!(doc.body, raw);
        }
    }

    #[test]
    fn parses_title_and_body() {
        let raw = "---\ntitle: Hello!\n---\nGoodbye!\n";
        let doc = parse(raw).unwrap();
        assert_eq!(doc.attributes.title.as_deref(), Some("Hello!"));
        assert_eq!(doc.body, "Goodbye!\n");
    }

    #[test]
    fn keeps_blank_lines_after_closing_delimiter() {
        let doc = parse("---\ntitle: x\n---\n\nBody").unwrap();
        assert_eq!(doc.body, "\nBody");
    }

    #[test]
    fn closing_delimiter_at_eof() {
        let doc = parse("---\ntitle: x\n---").unwrap();
        assert_eq!(doc.attributes.title.as_deref(), Some("x"));
        assert_eq!(doc.body, "");
    }

    #[test]
    fn dots_close_the_block() {
        let doc = parse("---\ntitle: x\n...\nbody").unwrap();
        assert_eq!(doc.attributes.title.as_deref(), Some("x"));
        assert_eq!(doc.body, "body");
    }

    #[test]
    fn crlf_line_endings() {
        let doc = parse("---\r\ntitle: x\r\n---\r\nbody\r\n").unwrap();
        assert_eq!(doc.attributes.title.as_deref(), Some("x"));
        assert_eq!(doc.body, "body\r\n");
    }

    #[test]
    fn unterminated_block_is_plain_body() {
        let raw = "---\ntitle: x\nno closing line";
        let doc = parse(raw).unwrap();
        assert!(doc.attributes.title.is_none());
        assert_eq!(doc.body, raw);
    }

    #[test]
    fn empty_block_gives_empty_attributes() {
        let doc = parse("---\n---\nbody").unwrap();
        assert_eq!(doc.attributes, Attributes::default());
        assert_eq!(doc.body, "body");
    }

    #[test]
    fn kitchen_sink_attributes() {
        let raw = "---\ntitle: Kitchen\nassignees: [JasonEtco, octocat]\nlabels:\n  - bug\n  - help wanted\nmilestone: 2\n---\nbody";
        let attrs = parse(raw).unwrap().attributes;
        assert_eq!(
            attrs.assignees,
            Some(FieldValue::Many(vec!["JasonEtco".into(), "octocat".into()]))
        );
        assert_eq!(
            attrs.labels,
            Some(FieldValue::Many(vec!["bug".into(), "help wanted".into()]))
        );
        assert_eq!(attrs.milestone.map(|m| m.as_input()), Some("2".to_string()));
    }

    #[test]
    fn single_string_fields() {
        let raw = "---\ntitle: x\nassignees: JasonEtco, octocat\nlabels: bug\nmilestone: \"3\"\n---\n";
        let attrs = parse(raw).unwrap().attributes;
        assert_eq!(
            attrs.assignees,
            Some(FieldValue::One("JasonEtco, octocat".into()))
        );
        assert_eq!(attrs.labels, Some(FieldValue::One("bug".into())));
        assert_eq!(attrs.milestone, Some(Milestone::Text("3".into())));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let doc = parse("---\ntitle: x\nabout: something\n---\n").unwrap();
        assert_eq!(doc.attributes.title.as_deref(), Some("x"));
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        let err = parse("---\ntitle: [unclosed\n---\nbody").unwrap_err();
        assert!(matches!(err, FilerError::MalformedInput(_)));
    }

    #[test]
    fn non_mapping_block_is_an_error() {
        let err = parse("---\njust a sentence\n---\nbody").unwrap_err();
        assert!(matches!(err, FilerError::MalformedInput(_)));
    }
}
