use anyhow::Result;
use regex::Regex;

use crate::commands::extract::text::compile;

const MONTHS: [(&str, &str); 24] = [
    ("jan", "01"),
    ("january", "01"),
    ("feb", "02"),
    ("february", "02"),
    ("mar", "03"),
    ("march", "03"),
    ("apr", "04"),
    ("april", "04"),
    ("may", "05"),
    ("jun", "06"),
    ("june", "06"),
    ("jul", "07"),
    ("july", "07"),
    ("aug", "08"),
    ("august", "08"),
    ("sep", "09"),
    ("sept", "09"),
    ("september", "09"),
    ("oct", "10"),
    ("october", "10"),
    ("nov", "11"),
    ("november", "11"),
    ("dec", "12"),
    ("december", "12"),
];

fn month_number(token: &str) -> Option<&'static str> {
    MONTHS
        .iter()
        .find(|(name, _)| *name == token)
        .map(|(_, number)| *number)
}

/// Normalizes a single date token to `YYYY-MM`, `Present`, or `""`.
///
/// Bare years default to January (`"2020"` → `"2020-01"`); anything that is
/// neither a month-year pair, a year, nor present/current degrades to empty.
pub fn normalize_date_token(token: &str) -> String {
    let lower = token.trim().to_lowercase();
    if lower.is_empty() {
        return String::new();
    }
    if lower == "present" || lower == "current" {
        return "Present".to_string();
    }
    if lower.len() == 4 && lower.chars().all(|c| c.is_ascii_digit()) {
        return format!("{lower}-01");
    }

    let mut parts = lower.split_whitespace();
    let maybe_month = parts.next().unwrap_or("");
    let maybe_year = parts.next().unwrap_or("");
    let Some(month) = month_number(maybe_month) else {
        return String::new();
    };
    if maybe_year.len() != 4 || !maybe_year.chars().all(|c| c.is_ascii_digit()) {
        return String::new();
    }

    format!("{maybe_year}-{month}")
}

pub struct DateMatcher {
    range: Regex,
    month_mention: Regex,
}

impl DateMatcher {
    pub fn new() -> Result<Self> {
        Ok(Self {
            range: compile(
                r"(?i)((?:jan|feb|mar|apr|may|jun|jul|aug|sep|sept|oct|nov|dec)[a-z]*\s+\d{4}|\d{4})\s*[–-]\s*(present|current|(?:jan|feb|mar|apr|may|jun|jul|aug|sep|sept|oct|nov|dec)[a-z]*\s+\d{4}|\d{4})",
            )?,
            month_mention: compile(r"(?i)(jan|feb|mar|apr|may|jun|jul|aug|sep|sept|oct|nov|dec)")?,
        })
    }

    /// Finds the first `start – end` range in free text and normalizes both
    /// tokens. No range means both sides come back empty.
    pub fn parse_range(&self, text: &str) -> (String, String) {
        let Some(caps) = self.range.captures(text) else {
            return (String::new(), String::new());
        };

        let start = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        let end = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        (normalize_date_token(start), normalize_date_token(end))
    }

    pub fn mentions_month(&self, line: &str) -> bool {
        self.month_mention.is_match(line)
    }
}
