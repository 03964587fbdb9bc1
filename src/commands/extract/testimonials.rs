use anyhow::Result;
use regex::Regex;

use crate::commands::extract::text::{TextTools, compile, to_paragraphs};
use crate::model::Testimonial;

pub struct TestimonialParser {
    dash: Regex,
}

impl TestimonialParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            dash: compile(r"\s*[–-]\s*")?,
        })
    }

    /// Groups need at least two lines: everything but the last is the quote,
    /// the last line splits on a dash into name and role.
    pub fn parse(&self, text: &TextTools, lines: &[String]) -> Vec<Testimonial> {
        let mut entries = Vec::new();

        for group in to_paragraphs(lines) {
            if group.len() < 2 {
                continue;
            }

            let quote = group[..group.len() - 1]
                .iter()
                .map(|line| text.sanitize_line(line))
                .collect::<Vec<String>>()
                .join(" ");
            let attribution = text.sanitize_line(&group[group.len() - 1]);
            let parts: Vec<&str> = self.dash.split(&attribution).collect();

            entries.push(Testimonial {
                name: parts.first().map(|part| part.trim().to_string()).unwrap_or_default(),
                role: parts.get(1).map(|part| part.trim().to_string()).unwrap_or_default(),
                quote,
            });
        }

        entries
    }
}
