use anyhow::Result;
use regex::Regex;

use crate::commands::extract::text::{TextTools, compile, to_paragraphs};
use crate::model::Education;

pub struct EducationParser {
    degree_hint: Regex,
    year: Regex,
}

impl EducationParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            degree_hint: compile(
                r"(?i)(bachelor|master|b\.sc|m\.sc|bachelors|masters|diploma|associate)",
            )?,
            year: compile(r"(?i)\d{4}(\s*[–-]\s*(\d{4}|present))?")?,
        })
    }

    /// Paragraph per school: first line is the school, the degree is the
    /// first line matching a degree keyword (else the second line), and the
    /// year is the first 4-digit year or year range anywhere in the group.
    pub fn parse(&self, text: &TextTools, lines: &[String]) -> Vec<Education> {
        let mut entries = Vec::new();

        for group in to_paragraphs(lines) {
            let Some(first) = group.first() else {
                continue;
            };
            let school = text.sanitize_line(first);
            let rest: Vec<String> = group[1..]
                .iter()
                .map(|line| text.sanitize_line(line))
                .collect();

            let degree = rest
                .iter()
                .find(|line| self.degree_hint.is_match(line))
                .or_else(|| rest.first())
                .cloned()
                .unwrap_or_default();
            let year = self
                .year
                .find(&group.join(" "))
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();

            entries.push(Education {
                school,
                degree,
                year,
            });
        }

        entries
    }
}
