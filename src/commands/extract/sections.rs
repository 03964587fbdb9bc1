use anyhow::Result;
use regex::Regex;

use crate::commands::extract::text::{TextTools, compile};

/// Logical resume sections. The extra variants (certifications onward) are
/// recognized so their headings never leak into a neighbouring section's
/// content, even though only the first six feed the normalized record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Summary,
    Experience,
    Projects,
    Skills,
    Education,
    Testimonials,
    Certifications,
    Publications,
    Awards,
    Volunteering,
    Blog,
}

impl Section {
    /// Match order matters: earlier entries win, mirroring the fixed keyword
    /// table the heuristics were tuned against.
    pub const ALL: [Section; 11] = [
        Section::Summary,
        Section::Experience,
        Section::Projects,
        Section::Skills,
        Section::Education,
        Section::Testimonials,
        Section::Certifications,
        Section::Publications,
        Section::Awards,
        Section::Volunteering,
        Section::Blog,
    ];

    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Section::Summary => &["summary", "profile", "professional summary", "objective"],
            Section::Experience => &[
                "experience",
                "professional experience",
                "work experience",
                "employment history",
            ],
            Section::Projects => &["projects", "case studies", "selected projects"],
            Section::Skills => &[
                "skills",
                "technical skills",
                "skills & tools",
                "skills & technologies",
                "stack",
            ],
            Section::Education => &["education", "academic background"],
            Section::Testimonials => &["testimonials", "recommendations", "references"],
            Section::Certifications => &["certifications", "licenses"],
            Section::Publications => &["publications", "articles"],
            Section::Awards => &["awards", "honors"],
            Section::Volunteering => &["volunteering", "community"],
            Section::Blog => &["blog", "articles", "writing"],
        }
    }
}

pub struct SectionMatcher {
    non_keyword_chars: Regex,
    whitespace: Regex,
}

impl SectionMatcher {
    pub fn new() -> Result<Self> {
        Ok(Self {
            // `&` survives normalization so "skills & tools" stays matchable.
            non_keyword_chars: compile(r"[^a-z&\s]")?,
            whitespace: compile(r"\s+")?,
        })
    }

    /// Returns the section a heading line switches to, if the lowercased,
    /// punctuation-stripped line equals or starts with a known keyword.
    pub fn detect(&self, text: &TextTools, line: &str) -> Option<Section> {
        if line.trim().is_empty() {
            return None;
        }

        let normalized = text.strip_markdown(line).to_lowercase();
        let normalized = self.non_keyword_chars.replace_all(&normalized, " ");
        let normalized = self.whitespace.replace_all(&normalized, " ");
        let normalized = normalized.trim();
        if normalized.is_empty() {
            return None;
        }

        for section in Section::ALL {
            for keyword in section.keywords() {
                if normalized == *keyword || normalized.starts_with(keyword) {
                    return Some(section);
                }
            }
        }

        None
    }
}
