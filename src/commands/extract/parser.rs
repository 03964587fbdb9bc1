use std::collections::HashMap;

use anyhow::{Result, bail};
use regex::Regex;

use crate::commands::extract::contacts::ContactParser;
use crate::commands::extract::dates::DateMatcher;
use crate::commands::extract::education::EducationParser;
use crate::commands::extract::experience::ExperienceParser;
use crate::commands::extract::projects::ProjectParser;
use crate::commands::extract::sections::{Section, SectionMatcher};
use crate::commands::extract::skills::SkillParser;
use crate::commands::extract::testimonials::TestimonialParser;
use crate::commands::extract::text::{TextTools, compile};
use crate::model::Resume;

/// Heuristic engine that segments a markdown-flavored text blob into resume
/// sections and extracts structured fields from each. The output is a draft:
/// schema normalization still runs on it afterwards, same as for raw JSON
/// sources.
pub struct ResumeParser {
    text: TextTools,
    sections: SectionMatcher,
    dates: DateMatcher,
    contacts: ContactParser,
    skills: SkillParser,
    experience: ExperienceParser,
    projects: ProjectParser,
    education: EducationParser,
    testimonials: TestimonialParser,
    core_skills_marker: Regex,
    space_before_punct: Regex,
    open_paren_space: Regex,
    space_close_paren: Regex,
    space_plus: Regex,
    plus_space: Regex,
}

impl ResumeParser {
    pub fn new(skill_categories: &[String]) -> Result<Self> {
        Ok(Self {
            text: TextTools::new()?,
            sections: SectionMatcher::new()?,
            dates: DateMatcher::new()?,
            contacts: ContactParser::new()?,
            skills: SkillParser::new(skill_categories)?,
            experience: ExperienceParser::new()?,
            projects: ProjectParser::new()?,
            education: EducationParser::new()?,
            testimonials: TestimonialParser::new()?,
            core_skills_marker: compile(r"(?i)CORE SKILLS")?,
            space_before_punct: compile(r"\s+([,.;])")?,
            open_paren_space: compile(r"\(\s+")?,
            space_close_paren: compile(r"\s+\)")?,
            space_plus: compile(r"\s+\+")?,
            plus_space: compile(r"\+\s+")?,
        })
    }

    pub fn parse(&self, raw: &str) -> Result<Resume> {
        // Emphasis spans become their own lines before splitting, so headings
        // styled via bold/underline survive as section boundaries.
        let hoisted = self.text.hoist_emphasis(raw);
        let cleaned = hoisted.replace('\r', "\n");

        let raw_lines: Vec<&str> = cleaned
            .split('\n')
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if raw_lines.is_empty() {
            bail!("resume text is empty");
        }

        let lines: Vec<String> = raw_lines
            .iter()
            .flat_map(|line| self.text.split_emphasis_segments(line))
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect();

        // First line is the candidate's name; the first non-contact line after
        // it becomes the title; the contact preamble follows until the first
        // section heading or the size cap.
        let name = self.text.strip_markdown(&lines[0]);
        let mut index = 1;
        let mut title = String::new();
        let mut preamble: Vec<String> = Vec::new();

        while index < lines.len() {
            let peek = &lines[index];
            if self.sections.detect(&self.text, peek).is_some() {
                break;
            }
            if title.is_empty() && !self.text.looks_like_contact(peek) {
                title = self.text.strip_markdown(peek);
                index += 1;
                continue;
            }
            preamble.push(peek.clone());
            index += 1;
            if preamble.len() > 6 {
                break;
            }
        }

        let contacts = self.contacts.extract(&self.text, &preamble);

        // Heading lines switch the current section and are consumed; all other
        // lines accumulate under it. Content before any heading is summary.
        let mut sections: HashMap<Section, Vec<String>> = HashMap::new();
        sections.insert(Section::Summary, Vec::new());
        let mut current = Section::Summary;
        for line in &lines[index..] {
            if let Some(section) = self.sections.detect(&self.text, line) {
                current = section;
                sections.entry(current).or_default();
                continue;
            }
            sections.entry(current).or_default().push(line.clone());
        }

        let empty = Vec::new();
        let summary_lines = sections.get(&Section::Summary).unwrap_or(&empty);
        let mut summary = if summary_lines.is_empty() {
            self.text.strip_markdown(&preamble.join(" "))
        } else {
            summary_lines
                .iter()
                .map(|line| self.text.sanitize_line(line))
                .collect::<Vec<String>>()
                .join(" ")
        };

        // Everything after a literal "CORE SKILLS" marker is a skills tail,
        // not prose.
        let mut summary_tail = String::new();
        let parts: Vec<&str> = self.core_skills_marker.split(&summary).collect();
        if parts.len() > 1 {
            summary_tail = parts[1..].join(" CORE SKILLS ");
            summary = parts[0].trim().to_string();
        }
        summary = self.tidy_summary(&summary);

        let mut skills = self
            .skills
            .parse_section(&self.text, sections.get(&Section::Skills).unwrap_or(&empty));
        if skills.is_empty() {
            skills = self.skills.from_summary_tail(&self.text, &summary_tail);
        }

        let experience = self.experience.parse(
            &self.text,
            &self.dates,
            sections.get(&Section::Experience).unwrap_or(&empty),
        );
        let projects = self
            .projects
            .parse(&self.text, sections.get(&Section::Projects).unwrap_or(&empty));
        let education = self
            .education
            .parse(&self.text, sections.get(&Section::Education).unwrap_or(&empty));
        let testimonials = self.testimonials.parse(
            &self.text,
            sections.get(&Section::Testimonials).unwrap_or(&empty),
        );

        Ok(Resume {
            name,
            title,
            summary,
            location: contacts.location,
            email: contacts.email,
            phone: contacts.phone,
            website: contacts.website,
            socials: contacts.socials,
            skills,
            projects,
            experience,
            education,
            testimonials,
        })
    }

    /// Whitespace-around-punctuation cleanup for the composed summary prose.
    fn tidy_summary(&self, value: &str) -> String {
        let tidy = self.space_before_punct.replace_all(value, "$1");
        let tidy = self.open_paren_space.replace_all(&tidy, "(");
        let tidy = self.space_close_paren.replace_all(&tidy, ")");
        let tidy = self.space_plus.replace_all(&tidy, "+");
        let tidy = self.plus_space.replace_all(&tidy, "+");
        self.text.collapse_whitespace(&tidy)
    }
}
