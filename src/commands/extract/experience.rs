use anyhow::Result;
use regex::Regex;

use crate::commands::extract::dates::DateMatcher;
use crate::commands::extract::text::{TextTools, compile, to_paragraphs};
use crate::model::Experience;

pub struct ExperienceParser {
    bullet: Regex,
    header_date: Regex,
    divider: Regex,
    at_splitter: Regex,
    region_hint: Regex,
}

impl ExperienceParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            bullet: compile(r"^[-•·]")?,
            header_date: compile(
                r"(?i)(?:jan|feb|mar|apr|may|jun|jul|aug|sep|sept|oct|nov|dec)[^|]+(?:present|\d{4})",
            )?,
            divider: compile(r"\s*[–\-|@]\s*")?,
            at_splitter: compile(r"(?i)\s+at\s+")?,
            region_hint: compile(
                r"(?i)(remote|usa|united|india|europe|asia|africa|america|australia|canada|uk|united kingdom)",
            )?,
        })
    }

    /// One entry per blank-line-delimited paragraph: the first line carries
    /// company/role, bulleted lines become `bullets`, remaining prose (minus
    /// date lines) becomes the entry summary.
    pub fn parse(&self, text: &TextTools, dates: &DateMatcher, lines: &[String]) -> Vec<Experience> {
        let mut entries = Vec::new();

        for group in to_paragraphs(lines) {
            let Some(header) = group.first() else {
                continue;
            };
            let rest = &group[1..];
            let (company, role, location) = self.role_company(text, header, rest);
            let (start, end) = dates.parse_range(&group.join(" "));

            let mut bullets = Vec::new();
            let mut summary_parts = Vec::new();
            for line in rest {
                if self.bullet.is_match(line) {
                    bullets.push(text.sanitize_line(line));
                } else if !dates.mentions_month(line) {
                    summary_parts.push(text.sanitize_line(line));
                }
            }

            entries.push(Experience {
                company: text.sanitize_line(&company),
                role: text.sanitize_line(&role),
                start,
                end,
                location: text.sanitize_line(&location),
                summary: text.strip_markdown(&summary_parts.join(" ")),
                bullets,
            });
        }

        entries
    }

    /// Header parsing: strip the trailing date range, then try divider
    /// characters (`–`, `-`, `|`, `@`) for a company/role split, then the
    /// literal " at " for role/company, else the whole line is the role.
    fn role_company(
        &self,
        text: &TextTools,
        header: &str,
        rest: &[String],
    ) -> (String, String, String) {
        let cleaned = text.strip_markdown(&header.replace('•', ""));
        let date_less = self.header_date.replace_all(&cleaned, "").trim().to_string();

        let parts: Vec<&str> = self.divider.split(&date_less).collect();
        let (company, role) = if parts.len() >= 2 {
            (parts[0].to_string(), parts[1..].join(" - "))
        } else if self.at_splitter.is_match(&date_less) {
            let mut at_parts = self.at_splitter.split(&date_less);
            let role = at_parts.next().unwrap_or("").to_string();
            let company = at_parts.next().unwrap_or("").to_string();
            (company, role)
        } else {
            (String::new(), date_less.clone())
        };

        let location = rest
            .iter()
            .find(|line| self.region_hint.is_match(line))
            .map(|line| text.strip_markdown(line))
            .unwrap_or_default();

        (company, role, location)
    }
}
