//! Splits the coach's free-text reply into titled sections.
//!
//! The reply loosely follows a `### TITLE: inline data` header convention.
//! Nothing here fails: malformed input produces fewer sections and missing
//! pieces fall back to placeholder text.

use regex::Regex;
use std::sync::LazyLock;

static HEADER_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"###\s+").expect("header marker pattern is valid"));

const SCORE_SEPARATOR: &str = " - ";
const DEFAULT_SCORE: &str = "0/10";
const DEFAULT_SCORE_LABEL: &str = "EVALUATING";
const DEFAULT_VERDICT: &str = "CALCULATING...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackSection {
    /// Header text before the first colon, upper-cased
    pub title: String,
    /// Header text after the first colon, or empty
    pub inline_data: String,
    /// Everything below the header line
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Verdict,
    VitalScore,
    Forecast,
    Generic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VitalScore {
    /// Score expression as written, e.g. "7/10"
    pub score: String,
    /// Text before the first '/', not validated as a number
    pub numerator: String,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyLine<'a> {
    Bullet(&'a str),
    Paragraph(&'a str),
}

/// Parse a coach reply into sections in source order.
///
/// Text before the first header is dropped, so input without any header
/// yields no sections.
pub fn parse_feedback_sections(text: &str) -> Vec<FeedbackSection> {
    HEADER_MARKER
        .split(text)
        .skip(1)
        .filter(|fragment| !fragment.trim().is_empty())
        .map(parse_fragment)
        .collect()
}

fn parse_fragment(fragment: &str) -> FeedbackSection {
    let fragment = fragment.trim();
    let (header, body) = fragment.split_once('\n').unwrap_or((fragment, ""));
    let header = header.trim();

    let (title, inline_data) = match header.split_once(':') {
        Some((title, rest)) => (title.trim(), rest.trim()),
        None => (header, ""),
    };

    FeedbackSection {
        title: title.to_uppercase(),
        inline_data: inline_data.to_string(),
        content: body.trim().to_string(),
    }
}

impl FeedbackSection {
    pub fn kind(&self) -> SectionKind {
        if self.title.contains("VERDICT") {
            SectionKind::Verdict
        } else if self.title.contains("VITAL SCORE") {
            SectionKind::VitalScore
        } else if self.title.contains("FORECAST") {
            SectionKind::Forecast
        } else {
            SectionKind::Generic
        }
    }

    /// Score and label from a "N/10 - LABEL" expression in the header or body
    pub fn vital_score(&self) -> VitalScore {
        let data = if self.inline_data.is_empty() {
            self.content.as_str()
        } else {
            self.inline_data.as_str()
        };

        let mut parts = data.split(SCORE_SEPARATOR);
        let score = parts
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SCORE);
        let label = parts
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SCORE_LABEL);
        let numerator = score.split('/').next().unwrap_or(score);

        VitalScore {
            score: score.to_string(),
            numerator: numerator.to_string(),
            label: label.to_string(),
        }
    }

    /// Status line shown for a verdict section
    pub fn verdict_headline(&self) -> &str {
        if self.inline_data.is_empty() {
            DEFAULT_VERDICT
        } else {
            &self.inline_data
        }
    }

    /// Inline data worth showing above a generic section's body
    pub fn headline(&self) -> Option<&str> {
        if self.inline_data.is_empty() || self.content.contains(&self.inline_data) {
            None
        } else {
            Some(&self.inline_data)
        }
    }

    /// Body split into bullets (lines starting with '-') and paragraphs.
    /// Only a leading "- " marker is removed from a bullet.
    pub fn body_lines(&self) -> Vec<BodyLine<'_>> {
        self.content
            .split('\n')
            .map(|line| {
                if line.starts_with('-') {
                    let item = line.strip_prefix("- ").unwrap_or(line);
                    BodyLine::Bullet(item.trim())
                } else {
                    BodyLine::Paragraph(line.trim())
                }
            })
            .collect()
    }
}
