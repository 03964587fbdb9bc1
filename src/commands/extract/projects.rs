use anyhow::Result;
use regex::Regex;

use crate::commands::extract::skills::dedupe;
use crate::commands::extract::text::{TextTools, compile};
use crate::model::{Project, ProjectLinks};

pub struct ProjectParser {
    bullet: Regex,
    url: Regex,
    demo_hint: Regex,
    code_hint: Regex,
    tag_list: Regex,
    tag_splitter: Regex,
    year_suffix: Regex,
    paren_open: Regex,
}

impl ProjectParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            bullet: compile(r"^[-•·]")?,
            url: compile(r"(?i)https?://[^\s]+")?,
            demo_hint: compile(r"(?i)demo|live|app|case|preview")?,
            code_hint: compile(r"(?i)code|repo|github|gitlab")?,
            tag_list: compile(r"\(([^)]+)\)")?,
            tag_splitter: compile(r"[\\/|,]")?,
            year_suffix: compile(r"[—–-]\s*\d{4}")?,
            paren_open: compile(r"\s*\(")?,
        })
    }

    /// Forward scan: a non-bulleted line opens a new project; bulleted lines
    /// fill the summary first, then highlights; any line with a URL tries to
    /// claim the demo/code links, first hit per field wins.
    pub fn parse(&self, text: &TextTools, lines: &[String]) -> Vec<Project> {
        let mut entries = Vec::new();
        let mut current: Option<Project> = None;

        for line in lines {
            let raw = line.trim();
            if raw.is_empty() {
                continue;
            }

            if !self.bullet.is_match(raw) {
                self.finalize(&mut current, &mut entries);
                current = Some(self.from_heading(text, raw));
                continue;
            }

            let Some(project) = current.as_mut() else {
                continue;
            };
            let cleaned = text.sanitize_line(raw);
            if cleaned.is_empty() {
                continue;
            }

            if project.summary.is_empty() {
                project.summary = cleaned;
            } else {
                project.highlights.push(cleaned);
            }

            if self.url.is_match(raw) {
                let demo = self.first_url(raw, &self.demo_hint);
                let code = self.first_url(raw, &self.code_hint);
                if !demo.is_empty() && project.links.demo.is_empty() {
                    project.links.demo = demo;
                }
                if !code.is_empty() && project.links.code.is_empty() {
                    project.links.code = code;
                }
            }
        }

        self.finalize(&mut current, &mut entries);
        entries
    }

    /// Heading shape: `Name — 2023 (tag | tag / tag)` with both the year and
    /// the parenthesized tag list optional.
    fn from_heading(&self, text: &TextTools, raw: &str) -> Project {
        let cleaned = text.sanitize_line(raw);

        let tags = self
            .tag_list
            .captures(&cleaned)
            .and_then(|caps| caps.get(1))
            .map(|list| {
                self.tag_splitter
                    .split(list.as_str())
                    .map(|tag| text.sanitize_line(tag))
                    .filter(|tag| !tag.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let name = self
            .year_suffix
            .splitn(&cleaned, 2)
            .next()
            .unwrap_or("")
            .to_string();
        let name = self
            .paren_open
            .splitn(&name, 2)
            .next()
            .unwrap_or("")
            .trim()
            .to_string();

        Project {
            name: if name.is_empty() { cleaned.clone() } else { name },
            summary: String::new(),
            tags,
            highlights: Vec::new(),
            links: ProjectLinks {
                demo: self.first_url(raw, &self.demo_hint),
                code: self.first_url(raw, &self.code_hint),
            },
        }
    }

    /// A URL on a line matching the hint wins; otherwise any URL on the line.
    fn first_url(&self, line: &str, hint: &Regex) -> String {
        if hint.is_match(line) {
            if let Some(m) = self.url.find(line) {
                return m.as_str().to_string();
            }
        }
        self.url
            .find(line)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default()
    }

    fn finalize(&self, current: &mut Option<Project>, entries: &mut Vec<Project>) {
        let Some(mut project) = current.take() else {
            return;
        };
        if project.summary.is_empty() && !project.highlights.is_empty() {
            project.summary = project.highlights.remove(0);
        }
        project.tags = dedupe(std::mem::take(&mut project.tags));
        entries.push(project);
    }
}
