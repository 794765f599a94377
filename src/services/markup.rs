//! Caption text helpers
//!
//! Captions arrive as raw strings that may wrap sections in tags such as
//! `<action>...</action>` and may pack several steps onto one line. These
//! helpers pull out the tagged parts and split steps into display lines.

use regex::Regex;
use std::sync::LazyLock;

/// Start of a numbered step: `1.` or `2)` at the start or after whitespace
static STEP_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)(\d+[.)])\s+").unwrap());

/// Text between `<tag>` and `</tag>`, trimmed; empty when absent
pub fn extract_tag(raw: &str, tag: &str) -> String {
    if raw.is_empty() || tag.is_empty() {
        return String::new();
    }

    let tag = regex::escape(tag);
    let pattern = format!(r"(?is)<\s*{tag}\s*>(.*?)<\s*/\s*{tag}\s*>");
    let Ok(re) = Regex::new(&pattern) else {
        return String::new();
    };

    re.captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

/// Split a caption into one line per step.
///
/// `a | b | c` splits on the pipes; `1. a 2. b` splits before each number.
/// Anything else is split on its own line breaks.
pub fn format_steps(text: &str) -> Vec<String> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    if text.contains('|') {
        return text
            .split('|')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
    }

    let starts: Vec<usize> = STEP_MARKER
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.start())
        .collect();

    if starts.is_empty() {
        return text
            .lines()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
    }

    let mut lines = Vec::new();
    let preface = text[..starts[0]].trim();
    if !preface.is_empty() {
        lines.push(preface.to_string());
    }
    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(text.len());
        let step = collapse_whitespace(&text[start..end]);
        if !step.is_empty() {
            lines.push(step);
        }
    }
    lines
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// One titled block of a caption ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionSection {
    /// Tag the block came from; `None` when the whole caption is shown
    pub tag: Option<String>,
    pub lines: Vec<String>,
}

/// Break a raw caption into display sections for the given tags.
///
/// Falls back to the whole caption when none of the tags are present.
pub fn caption_sections(raw: &str, tags: &[String]) -> Vec<CaptionSection> {
    let sections: Vec<CaptionSection> = tags
        .iter()
        .filter_map(|tag| {
            let body = extract_tag(raw, tag);
            (!body.is_empty()).then(|| CaptionSection {
                tag: Some(tag.clone()),
                lines: format_steps(&body),
            })
        })
        .collect();

    if sections.is_empty() {
        vec![CaptionSection {
            tag: None,
            lines: format_steps(raw),
        }]
    } else {
        sections
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_tag_basic() {
        assert_eq!(extract_tag("<action>go left</action>", "action"), "go left");
    }

    #[test]
    fn test_extract_tag_is_case_insensitive_and_trims() {
        let raw = "intro <  Action >\n   go left \n</ACTION > tail";
        assert_eq!(extract_tag(raw, "action"), "go left");
    }

    #[test]
    fn test_extract_tag_spans_lines() {
        let raw = "<caption>line one\nline two</caption>";
        assert_eq!(extract_tag(raw, "caption"), "line one\nline two");
    }

    #[test]
    fn test_extract_tag_absent_or_empty() {
        assert_eq!(extract_tag("no tags here", "action"), "");
        assert_eq!(extract_tag("", "action"), "");
        assert_eq!(extract_tag("<action>unclosed", "action"), "");
    }

    #[test]
    fn test_format_steps_numbered() {
        let lines = format_steps("1. reach the cup 2. grasp it 3) lift");
        assert_eq!(lines, vec!["1. reach the cup", "2. grasp it", "3) lift"]);
    }

    #[test]
    fn test_format_steps_keeps_preface() {
        let lines = format_steps("Plan: 1. open 2. close");
        assert_eq!(lines, vec!["Plan:", "1. open", "2. close"]);
    }

    #[test]
    fn test_format_steps_pipes() {
        let lines = format_steps("move arm | open gripper |  | close gripper");
        assert_eq!(lines, vec!["move arm", "open gripper", "close gripper"]);
    }

    #[test]
    fn test_format_steps_plain_text() {
        assert_eq!(format_steps("just a caption"), vec!["just a caption"]);
        assert!(format_steps("   ").is_empty());
    }

    #[test]
    fn test_format_steps_ignores_embedded_numbers() {
        assert_eq!(format_steps("rotate 90.5 degrees"), vec!["rotate 90.5 degrees"]);
    }

    #[test]
    fn test_caption_sections_by_tag() {
        let raw = "<caption>a red cup</caption><action>1. reach 2. grasp</action>";
        let tags = vec!["caption".to_string(), "action".to_string()];

        let sections = caption_sections(raw, &tags);

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].tag.as_deref(), Some("caption"));
        assert_eq!(sections[0].lines, vec!["a red cup"]);
        assert_eq!(sections[1].lines, vec!["1. reach", "2. grasp"]);
    }

    #[test]
    fn test_caption_sections_fallback() {
        let sections = caption_sections("push | pull", &["action".to_string()]);
        assert_eq!(
            sections,
            vec![CaptionSection {
                tag: None,
                lines: vec!["push".to_string(), "pull".to_string()],
            }]
        );
    }
}
