use anyhow::{Context, Result};
use regex::{Captures, Regex};

/// Shared text helpers for the heuristic parser. All regexes are compiled once
/// here and borrowed by the section parsers, following the same
/// build-the-matcher-up-front shape as the rest of the pipeline.
pub struct TextTools {
    bold_underscore: Regex,
    bold_asterisk: Regex,
    italic_underscore: Regex,
    italic_asterisk: Regex,
    code_span: Regex,
    link: Regex,
    control_chars: Regex,
    invisible_chars: Regex,
    backslashes: Regex,
    whitespace: Regex,
    bullet_prefix: Regex,
    emphasis_span: Regex,
    contact_hint: Regex,
    phone_like: Regex,
}

impl TextTools {
    pub fn new() -> Result<Self> {
        Ok(Self {
            bold_underscore: compile(r"__([^_]+?)__")?,
            bold_asterisk: compile(r"\*\*([^*]+?)\*\*")?,
            italic_underscore: compile(r"_([^_]+?)_")?,
            italic_asterisk: compile(r"\*([^*]+?)\*")?,
            code_span: compile(r"`([^`]+?)`")?,
            link: compile(r"\[(.*?)\]\((.*?)\)")?,
            control_chars: compile(r"[\x00-\x1f]")?,
            invisible_chars: compile(r"[\u{00A0}\u{200B}\u{200C}\u{200D}\u{FEFF}]")?,
            backslashes: compile(r"\\+")?,
            whitespace: compile(r"\s+")?,
            bullet_prefix: compile(r"^[•\-·]+\s*")?,
            // Bold and underline spans double as section/entry boundaries in
            // documents that style headings via emphasis instead of real
            // heading markup.
            emphasis_span: compile(r"__([^*_]+?)__|\*\*([^*_]+?)\*\*")?,
            contact_hint: compile(r"(?i)@|linkedin|github|gitlab|portfolio|https?://")?,
            phone_like: compile(r"\+?\d[\d\s().-]{6,}\d")?,
        })
    }

    /// Removes emphasis/code/link markup, control and zero-width characters,
    /// and collapses whitespace. Link text is kept, link targets dropped.
    pub fn strip_markdown(&self, value: &str) -> String {
        let stripped = self.bold_underscore.replace_all(value, "$1");
        let stripped = self.bold_asterisk.replace_all(&stripped, "$1");
        let stripped = self.italic_underscore.replace_all(&stripped, "$1");
        let stripped = self.italic_asterisk.replace_all(&stripped, "$1");
        let stripped = self.code_span.replace_all(&stripped, "$1");
        let stripped = self.link.replace_all(&stripped, "$1");
        let stripped = self.control_chars.replace_all(&stripped, " ");
        let stripped = self.invisible_chars.replace_all(&stripped, " ");
        let stripped = self.backslashes.replace_all(&stripped, " ");
        let stripped = self.whitespace.replace_all(&stripped, " ");
        stripped.trim().to_string()
    }

    /// Strips a leading bullet marker, then markdown.
    pub fn sanitize_line(&self, line: &str) -> String {
        let without_bullet = self.bullet_prefix.replace(line, "");
        self.strip_markdown(&without_bullet)
    }

    /// Email/URL/platform keywords or a phone-shaped digit run.
    pub fn looks_like_contact(&self, line: &str) -> bool {
        self.contact_hint.is_match(line) || self.phone_like.is_match(line)
    }

    /// Hoists every inline bold/underline span onto its own line so emphasis
    /// styled headings survive line splitting.
    pub fn hoist_emphasis(&self, raw: &str) -> String {
        self.emphasis_span
            .replace_all(raw, |caps: &Captures| {
                let inner = caps
                    .get(1)
                    .or_else(|| caps.get(2))
                    .map(|m| m.as_str())
                    .unwrap_or("");
                format!("\n{inner}\n")
            })
            .into_owned()
    }

    /// Splits a single line around inline emphasis spans so an inline heading
    /// is separated from trailing prose. A leading bullet marker stays
    /// attached to the first segment.
    pub fn split_emphasis_segments(&self, line: &str) -> Vec<String> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Vec::new();
        }

        let bullet = self
            .bullet_prefix
            .find(trimmed)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        let content = &trimmed[bullet.len()..];

        let mut segments = Vec::new();
        let mut last_index = 0;
        for caps in self.emphasis_span.captures_iter(content) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            let before = content[last_index..whole.start()].trim();
            if !before.is_empty() {
                segments.push(before.to_string());
            }
            let heading = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map(|m| m.as_str().trim())
                .unwrap_or("");
            if !heading.is_empty() {
                segments.push(heading.to_string());
            }
            last_index = whole.end();
        }

        let after = content[last_index..].trim();
        if !after.is_empty() {
            segments.push(after.to_string());
        }
        if segments.is_empty() {
            segments.push(content.trim().to_string());
        }
        if !bullet.is_empty() {
            segments[0] = format!("{bullet}{}", segments[0]);
        }

        segments
    }

    pub fn collapse_whitespace(&self, value: &str) -> String {
        self.whitespace.replace_all(value, " ").trim().to_string()
    }
}

/// Groups lines into blank-line-delimited paragraphs, dropping empties.
pub fn to_paragraphs(lines: &[String]) -> Vec<Vec<String>> {
    let mut groups = Vec::new();
    let mut current = Vec::new();

    for line in lines {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if !current.is_empty() {
                groups.push(std::mem::take(&mut current));
            }
        } else {
            current.push(trimmed.to_string());
        }
    }
    if !current.is_empty() {
        groups.push(current);
    }

    groups
}

pub fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).with_context(|| format!("failed to compile regex: {pattern}"))
}
