use std::collections::HashSet;

use anyhow::Result;
use regex::Regex;

use crate::commands::extract::text::{TextTools, compile};

/// Category labels tried by the summary-tail fallback when no explicit skills
/// section exists. Overridable per run via `--skill-category`; the defaults
/// match the vocabulary of the resume this tool grew up on.
pub const DEFAULT_SKILL_CATEGORIES: [&str; 6] = [
    "Languages & Libraries",
    "MLOps & Cloud",
    "Data & Storage",
    "LLM/RAG",
    "Methods",
    "Practices",
];

pub struct SkillParser {
    token_splitter: Regex,
    category_label: Regex,
    item_splitter: Regex,
    paren_list: Regex,
    paren_splitter: Regex,
}

impl SkillParser {
    pub fn new(categories: &[String]) -> Result<Self> {
        let label_pattern = categories
            .iter()
            .map(|label| regex::escape(label))
            .collect::<Vec<String>>()
            .join("|");

        Ok(Self {
            token_splitter: compile(r"[,|•·\-]")?,
            category_label: compile(&format!(r"(?i)({label_pattern}):"))?,
            item_splitter: compile(r"(?i)[,;•]| and ")?,
            paren_list: compile(r"\((.*?)\)")?,
            paren_splitter: compile(r"[,/]")?,
        })
    }

    /// Tokenizes an explicit skills section: split on commas, pipes, bullets,
    /// and hyphens, keep tokens longer than one character, dedup in order.
    pub fn parse_section(&self, text: &TextTools, lines: &[String]) -> Vec<String> {
        if lines.is_empty() {
            return Vec::new();
        }

        let joined = lines.join(", ");
        let tokens = self
            .token_splitter
            .split(&joined)
            .map(|token| text.sanitize_line(token))
            .filter(|token| token.chars().count() > 1)
            .collect();

        dedupe(tokens)
    }

    /// Fallback extraction from the tail of the summary: for every
    /// `Label: value, value (a/b), ...` run, collect the values, expanding
    /// parenthesized sub-lists into their own tokens.
    pub fn from_summary_tail(&self, text: &TextTools, tail: &str) -> Vec<String> {
        if tail.trim().is_empty() {
            return Vec::new();
        }

        // The value of each category runs until the next category label.
        let label_matches: Vec<(usize, usize)> = self
            .category_label
            .find_iter(tail)
            .map(|m| (m.start(), m.end()))
            .collect();

        let mut collected = Vec::new();
        for (index, (_, value_start)) in label_matches.iter().enumerate() {
            let value_end = label_matches
                .get(index + 1)
                .map(|(next_start, _)| *next_start)
                .unwrap_or(tail.len());
            let base = text.sanitize_line(&tail[*value_start..value_end]);

            for item in self.item_splitter.split(&base) {
                let cleaned = text.sanitize_line(item);
                if cleaned.is_empty() {
                    continue;
                }

                let inner: Vec<String> = self
                    .paren_list
                    .captures_iter(&cleaned)
                    .flat_map(|caps| {
                        let list = caps.get(1).map(|m| m.as_str()).unwrap_or("");
                        self.paren_splitter
                            .split(list)
                            .map(|token| text.sanitize_line(token))
                            .filter(|token| !token.is_empty())
                            .collect::<Vec<String>>()
                    })
                    .collect();
                let without_parens = self.paren_list.replace_all(&cleaned, "").trim().to_string();

                if !without_parens.is_empty() {
                    collected.push(without_parens);
                }
                collected.extend(inner);
            }
        }

        dedupe(collected)
    }
}

/// Order-preserving dedup.
pub fn dedupe(values: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect()
}
