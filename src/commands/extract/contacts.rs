use anyhow::Result;
use regex::Regex;

use crate::commands::extract::text::{TextTools, compile};
use crate::model::Social;

/// Contact details pulled from the preamble block between the title line and
/// the first section heading.
#[derive(Debug, Default)]
pub struct ContactInfo {
    pub email: String,
    pub phone: String,
    pub website: String,
    pub location: String,
    pub socials: Vec<Social>,
}

pub struct ContactParser {
    email: Regex,
    phone: Regex,
    url: Regex,
    label_hint: Regex,
    location_shape: Regex,
    label_separators: Regex,
    scheme: Regex,
    www: Regex,
}

impl ContactParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            email: compile(r"(?i)[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}")?,
            phone: compile(r"\+?\d[\d\s().-]{6,}\d")?,
            url: compile(r"(?i)https?://[^\s]+")?,
            label_hint: compile(
                r"(?i)(linkedin|github|gitlab|behance|dribbble|twitter|x\.com|medium|substack)",
            )?,
            location_shape: compile(r"[A-Za-z]+,\s*[A-Za-z]+")?,
            label_separators: compile(r"[_.-]")?,
            scheme: compile(r"(?i)https?://")?,
            www: compile(r"(?i)www\.")?,
        })
    }

    pub fn extract(&self, text: &TextTools, lines: &[String]) -> ContactInfo {
        let joined = lines.join(" • ");

        let email = self
            .email
            .find(&joined)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        let phone = self
            .phone
            .find(&joined)
            .map(|m| text.collapse_whitespace(m.as_str()))
            .unwrap_or_default();
        let website = self
            .url
            .find(&joined)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();

        // A "City, Country" shaped line that is not itself a contact line.
        let location = lines
            .iter()
            .find(|line| {
                self.location_shape.is_match(&text.strip_markdown(line))
                    && !text.looks_like_contact(line)
            })
            .map(|line| text.strip_markdown(line))
            .unwrap_or_default();

        let mut socials = self.parse_socials(&joined);
        socials.retain(|social| social.url != website);

        ContactInfo {
            email,
            phone,
            website,
            location,
            socials,
        }
    }

    /// Every URL in the block becomes a social link; known platforms get their
    /// name as the label, everything else is labelled "Website".
    fn parse_socials(&self, text: &str) -> Vec<Social> {
        let mut socials = Vec::new();
        for m in self.url.find_iter(text) {
            let url = m.as_str();
            let label = self
                .label_hint
                .find(url)
                .map(|hint| hint.as_str())
                .unwrap_or("Website");
            socials.push(Social {
                label: self.format_label(label),
                url: url.to_string(),
            });
        }
        socials
    }

    fn format_label(&self, label: &str) -> String {
        let spaced = self.label_separators.replace_all(label, " ");
        let spaced = self.scheme.replace(&spaced, "");
        let spaced = self.www.replace(&spaced, "");

        spaced
            .split_whitespace()
            .map(capitalize)
            .collect::<Vec<String>>()
            .join(" ")
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
