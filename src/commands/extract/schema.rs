use anyhow::{Result, bail};
use regex::Regex;
use serde_json::{Map, Value};

use crate::commands::extract::skills::dedupe;
use crate::commands::extract::text::compile;
use crate::model::{
    Education, Experience, Project, ProjectLinks, Resume, Social, Testimonial,
};

/// Coerces a loosely typed candidate object (parser draft or raw JSON source)
/// into the canonical record.
///
/// Every field is run through the same try-coerce-or-default rule: a type or
/// format mismatch silently yields the field's default instead of failing the
/// run. The only fatal conditions are a non-object top level and a missing or
/// too-short `name`.
pub fn normalize_resume(value: &Value) -> Result<Resume> {
    let rules = FieldRules::new()?;

    let Some(obj) = value.as_object() else {
        bail!("resume data failed validation: top-level value is not an object");
    };

    let name = obj
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or("");
    if name.chars().count() < 2 {
        bail!("resume data failed validation: name is required (at least 2 characters)");
    }

    Ok(Resume {
        name: name.to_string(),
        title: string_field(obj, "title"),
        summary: string_field(obj, "summary"),
        location: string_field(obj, "location"),
        email: rules.email_field(obj, "email"),
        phone: string_field(obj, "phone"),
        website: rules.url_field(obj, "website"),
        socials: rules.socials_field(obj),
        skills: skills_field(obj),
        projects: projects_field(obj),
        experience: experience_field(obj),
        education: education_field(obj),
        testimonials: testimonials_field(obj),
    })
}

struct FieldRules {
    email: Regex,
    url: Regex,
}

impl FieldRules {
    fn new() -> Result<Self> {
        Ok(Self {
            email: compile(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$")?,
            url: compile(r"(?i)^https?://[^\s]+$")?,
        })
    }

    fn email_field(&self, obj: &Map<String, Value>, key: &str) -> String {
        let value = string_field(obj, key);
        if self.email.is_match(&value) {
            value
        } else {
            String::new()
        }
    }

    fn url_field(&self, obj: &Map<String, Value>, key: &str) -> String {
        let value = string_field(obj, key);
        if self.url.is_match(&value) {
            value
        } else {
            String::new()
        }
    }

    /// Socials are the one sequence validated per entry: entries without a
    /// string label or a well-formed URL are dropped, never fatal.
    fn socials_field(&self, obj: &Map<String, Value>) -> Vec<Social> {
        let Some(items) = obj.get("socials").and_then(Value::as_array) else {
            return Vec::new();
        };

        let mut socials = Vec::new();
        for item in items {
            let Some(entry) = item.as_object() else {
                continue;
            };
            let Some(label) = entry.get("label").and_then(Value::as_str) else {
                continue;
            };
            let Some(url) = entry.get("url").and_then(Value::as_str) else {
                continue;
            };
            if !self.url.is_match(url) {
                continue;
            }
            socials.push(Social {
                label: label.to_string(),
                url: url.to_string(),
            });
        }
        socials
    }
}

fn string_field(obj: &Map<String, Value>, key: &str) -> String {
    obj.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_default()
}

fn string_list_field(obj: &Map<String, Value>, key: &str) -> Vec<String> {
    obj.get(key)
        .and_then(|value| {
            let items = value.as_array()?;
            items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<String>>>()
        })
        .unwrap_or_default()
}

/// Non-empty strings, deduplicated in order. One malformed element resets the
/// whole field to its default.
fn skills_field(obj: &Map<String, Value>) -> Vec<String> {
    obj.get("skills")
        .and_then(|value| {
            let items = value.as_array()?;
            let mut skills = Vec::new();
            for item in items {
                let skill = item.as_str()?;
                if skill.is_empty() {
                    return None;
                }
                skills.push(skill.to_string());
            }
            Some(skills)
        })
        .map(dedupe)
        .unwrap_or_default()
}

/// A project entry that is not an object, or that lacks a string `name`,
/// invalidates the whole list.
fn projects_field(obj: &Map<String, Value>) -> Vec<Project> {
    let Some(items) = obj.get("projects").and_then(Value::as_array) else {
        return Vec::new();
    };

    let mut projects = Vec::new();
    for item in items {
        let Some(entry) = item.as_object() else {
            return Vec::new();
        };
        let Some(name) = entry.get("name").and_then(Value::as_str) else {
            return Vec::new();
        };
        projects.push(Project {
            name: name.to_string(),
            summary: string_field(entry, "summary"),
            tags: string_list_field(entry, "tags"),
            highlights: string_list_field(entry, "highlights"),
            links: links_field(entry),
        });
    }
    projects
}

fn links_field(obj: &Map<String, Value>) -> ProjectLinks {
    let Some(links) = obj.get("links").and_then(Value::as_object) else {
        return ProjectLinks::default();
    };
    ProjectLinks {
        demo: string_field(links, "demo"),
        code: string_field(links, "code"),
    }
}

fn experience_field(obj: &Map<String, Value>) -> Vec<Experience> {
    let Some(items) = obj.get("experience").and_then(Value::as_array) else {
        return Vec::new();
    };

    let mut entries = Vec::new();
    for item in items {
        let Some(entry) = item.as_object() else {
            return Vec::new();
        };
        entries.push(Experience {
            company: string_field(entry, "company"),
            role: string_field(entry, "role"),
            start: string_field(entry, "start"),
            end: string_field(entry, "end"),
            location: string_field(entry, "location"),
            summary: string_field(entry, "summary"),
            bullets: string_list_field(entry, "bullets"),
        });
    }
    entries
}

fn education_field(obj: &Map<String, Value>) -> Vec<Education> {
    let Some(items) = obj.get("education").and_then(Value::as_array) else {
        return Vec::new();
    };

    let mut entries = Vec::new();
    for item in items {
        let Some(entry) = item.as_object() else {
            return Vec::new();
        };
        entries.push(Education {
            school: string_field(entry, "school"),
            degree: string_field(entry, "degree"),
            year: string_field(entry, "year"),
        });
    }
    entries
}

fn testimonials_field(obj: &Map<String, Value>) -> Vec<Testimonial> {
    let Some(items) = obj.get("testimonials").and_then(Value::as_array) else {
        return Vec::new();
    };

    let mut entries = Vec::new();
    for item in items {
        let Some(entry) = item.as_object() else {
            return Vec::new();
        };
        entries.push(Testimonial {
            name: string_field(entry, "name"),
            role: string_field(entry, "role"),
            quote: string_field(entry, "quote"),
        });
    }
    entries
}
