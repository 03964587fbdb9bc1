use std::fs;
use std::path::PathBuf;

use serde_json::json;

use super::contacts::ContactParser;
use super::dates::{DateMatcher, normalize_date_token};
use super::education::EducationParser;
use super::parser::ResumeParser;
use super::projects::ProjectParser;
use super::schema::normalize_resume;
use super::sections::{Section, SectionMatcher};
use super::skills::{DEFAULT_SKILL_CATEGORIES, SkillParser, dedupe};
use super::testimonials::TestimonialParser;
use super::text::TextTools;
use crate::cli::ExtractArgs;
use crate::model::{Resume, Social};

fn categories() -> Vec<String> {
    DEFAULT_SKILL_CATEGORIES.map(String::from).to_vec()
}

fn sample_resume_text() -> &'static str {
    "Jane Doe\n\
     Senior Software Engineer\n\
     jane@doe.dev • +1 (555) 123-4567 • https://janedoe.dev\n\
     Berlin, Germany\n\
     \n\
     **Summary**\n\
     Engineer who ships useful things.\n\
     \n\
     **Experience**\n\
     **Acme Corp – Lead Engineer**\n\
     Mar 2020 – Present\n\
     - Built the data platform\n\
     - Cut costs by 30%\n\
     \n\
     **Skills**\n\
     React, TypeScript, Rust\n"
}

#[test]
fn date_tokens_normalize_to_year_month() {
    assert_eq!(normalize_date_token("Jan 2020"), "2020-01");
    assert_eq!(normalize_date_token("march 2021"), "2021-03");
    assert_eq!(normalize_date_token("2020"), "2020-01");
    assert_eq!(normalize_date_token("Present"), "Present");
    assert_eq!(normalize_date_token("current"), "Present");
    assert_eq!(normalize_date_token("sometime soon"), "");
    assert_eq!(normalize_date_token(""), "");
}

#[test]
fn date_ranges_parse_from_free_text() {
    let dates = DateMatcher::new().expect("matcher");

    assert_eq!(
        dates.parse_range("Acme Corp Mar 2021 – Present"),
        ("2021-03".to_string(), "Present".to_string())
    );
    assert_eq!(
        dates.parse_range("2018 - 2020"),
        ("2018-01".to_string(), "2020-01".to_string())
    );
    assert_eq!(
        dates.parse_range("no dates in sight"),
        (String::new(), String::new())
    );
}

#[test]
fn section_headings_match_exact_and_prefixed_keywords() {
    let text = TextTools::new().expect("tools");
    let sections = SectionMatcher::new().expect("matcher");

    assert_eq!(
        sections.detect(&text, "Professional Experience"),
        Some(Section::Experience)
    );
    assert_eq!(sections.detect(&text, "Skills & Tools:"), Some(Section::Skills));
    assert_eq!(sections.detect(&text, "Projects — 2023"), Some(Section::Projects));
    assert_eq!(sections.detect(&text, "**EDUCATION**"), Some(Section::Education));
    assert_eq!(sections.detect(&text, "Led a team of five"), None);
    assert_eq!(sections.detect(&text, "   "), None);
}

#[test]
fn markdown_markup_is_stripped_keeping_link_text() {
    let text = TextTools::new().expect("tools");

    assert_eq!(
        text.strip_markdown("**Senior Engineer** at [Acme](https://acme.test)"),
        "Senior Engineer at Acme"
    );
    assert_eq!(text.sanitize_line("• Built the `data` pipeline"), "Built the data pipeline");
}

#[test]
fn inline_emphasis_splits_into_separate_segments() {
    let text = TextTools::new().expect("tools");

    assert_eq!(
        text.split_emphasis_segments("- **Acme** Lead Engineer"),
        vec!["- Acme".to_string(), "Lead Engineer".to_string()]
    );
    assert_eq!(
        text.split_emphasis_segments("Just prose"),
        vec!["Just prose".to_string()]
    );
}

#[test]
fn skill_dedup_preserves_first_occurrence_order() {
    let values = vec![
        "React".to_string(),
        "React".to_string(),
        "Node.js".to_string(),
    ];
    assert_eq!(dedupe(values), vec!["React".to_string(), "Node.js".to_string()]);
}

#[test]
fn skills_section_tokenizes_and_dedups() {
    let text = TextTools::new().expect("tools");
    let skills = SkillParser::new(&categories()).expect("parser");

    let lines = vec![
        "React, TypeScript | Node.js".to_string(),
        "React".to_string(),
    ];
    assert_eq!(
        skills.parse_section(&text, &lines),
        vec!["React".to_string(), "TypeScript".to_string(), "Node.js".to_string()]
    );
    assert!(skills.parse_section(&text, &[]).is_empty());
}

#[test]
fn summary_tail_skills_expand_parenthesized_lists() {
    let text = TextTools::new().expect("tools");
    let skills = SkillParser::new(&categories()).expect("parser");

    let tail = "Languages & Libraries: Python, TypeScript (React/Node) Methods: TDD and evals";
    assert_eq!(
        skills.from_summary_tail(&text, tail),
        vec![
            "Python".to_string(),
            "TypeScript".to_string(),
            "React".to_string(),
            "Node".to_string(),
            "TDD".to_string(),
            "evals".to_string(),
        ]
    );
    assert!(skills.from_summary_tail(&text, "   ").is_empty());
}

#[test]
fn project_headings_split_tags_and_claim_link_urls() {
    let text = TextTools::new().expect("tools");
    let projects = ProjectParser::new().expect("parser");

    let lines = vec![
        "Weather App — 2023 (React | Rust)".to_string(),
        "- Realtime forecasts for cyclists".to_string(),
        "- Demo: https://weather.example.dev".to_string(),
        "- Code: https://github.com/janedoe/weather".to_string(),
    ];
    let entries = projects.parse(&text, &lines);

    assert_eq!(entries.len(), 1);
    let project = &entries[0];
    assert_eq!(project.name, "Weather App");
    assert_eq!(project.tags, vec!["React".to_string(), "Rust".to_string()]);
    assert_eq!(project.summary, "Realtime forecasts for cyclists");
    assert_eq!(
        project.highlights,
        vec![
            "Demo: https://weather.example.dev".to_string(),
            "Code: https://github.com/janedoe/weather".to_string(),
        ]
    );
    // First URL-bearing line claims both links; later lines cannot overwrite
    // an already-claimed field.
    assert_eq!(project.links.demo, "https://weather.example.dev");
    assert_eq!(project.links.code, "https://weather.example.dev");
}

#[test]
fn education_groups_pick_degree_keywords_and_year_ranges() {
    let text = TextTools::new().expect("tools");
    let education = EducationParser::new().expect("parser");

    let lines = vec![
        "TU Berlin".to_string(),
        "Graduated with honors".to_string(),
        "B.Sc. Computer Science".to_string(),
        "2012 – 2016".to_string(),
        String::new(),
        "Community College".to_string(),
        "Continuing studies".to_string(),
    ];
    let entries = education.parse(&text, &lines);

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].school, "TU Berlin");
    assert_eq!(entries[0].degree, "B.Sc. Computer Science");
    assert_eq!(entries[0].year, "2012 – 2016");
    assert_eq!(entries[1].school, "Community College");
    assert_eq!(entries[1].degree, "Continuing studies");
    assert_eq!(entries[1].year, "");
}

#[test]
fn testimonial_groups_need_attribution_lines() {
    let text = TextTools::new().expect("tools");
    let testimonials = TestimonialParser::new().expect("parser");

    let lines = vec![
        "Jane rebuilt our pipeline in a quarter.".to_string(),
        "Alex Smith – CTO, Acme".to_string(),
        String::new(),
        "A quote with nobody to credit".to_string(),
    ];
    let entries = testimonials.parse(&text, &lines);

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].quote, "Jane rebuilt our pipeline in a quarter.");
    assert_eq!(entries[0].name, "Alex Smith");
    assert_eq!(entries[0].role, "CTO, Acme");
}

#[test]
fn social_links_get_platform_labels_and_exclude_the_website() {
    let text = TextTools::new().expect("tools");
    let contacts = ContactParser::new().expect("parser");

    let lines = vec![
        "jane@doe.dev • https://janedoe.dev".to_string(),
        "https://github.com/janedoe • https://www.linkedin.com/in/janedoe".to_string(),
    ];
    let info = contacts.extract(&text, &lines);

    assert_eq!(info.website, "https://janedoe.dev");
    assert_eq!(
        info.socials,
        vec![
            Social {
                label: "Github".to_string(),
                url: "https://github.com/janedoe".to_string(),
            },
            Social {
                label: "Linkedin".to_string(),
                url: "https://www.linkedin.com/in/janedoe".to_string(),
            },
        ]
    );
}

#[test]
fn full_text_resume_parses_into_a_draft_record() {
    let parser = ResumeParser::new(&categories()).expect("parser");
    let resume = parser.parse(sample_resume_text()).expect("parse");

    assert_eq!(resume.name, "Jane Doe");
    assert_eq!(resume.title, "Senior Software Engineer");
    assert_eq!(resume.email, "jane@doe.dev");
    assert_eq!(resume.phone, "+1 (555) 123-4567");
    assert_eq!(resume.website, "https://janedoe.dev");
    assert_eq!(resume.location, "Berlin, Germany");
    assert_eq!(resume.summary, "Engineer who ships useful things.");
    assert_eq!(
        resume.skills,
        vec!["React".to_string(), "TypeScript".to_string(), "Rust".to_string()]
    );

    assert_eq!(resume.experience.len(), 1);
    let entry = &resume.experience[0];
    assert_eq!(entry.company, "Acme Corp");
    assert_eq!(entry.role, "Lead Engineer");
    assert_eq!(entry.start, "2020-03");
    assert_eq!(entry.end, "Present");
    assert_eq!(
        entry.bullets,
        vec!["Built the data platform".to_string(), "Cut costs by 30%".to_string()]
    );
}

#[test]
fn empty_resume_text_is_fatal() {
    let parser = ResumeParser::new(&categories()).expect("parser");
    let err = parser.parse("  \n\n   \n").expect_err("should fail");
    assert!(err.to_string().contains("empty"));
}

#[test]
fn schema_rejects_non_object_input() {
    let err = normalize_resume(&json!("just a string")).expect_err("should fail");
    assert!(err.to_string().contains("not an object"));
}

#[test]
fn schema_requires_a_usable_name() {
    let err = normalize_resume(&json!({ "name": "J" })).expect_err("should fail");
    assert!(err.to_string().contains("name"));

    let err = normalize_resume(&json!({ "title": "Engineer" })).expect_err("should fail");
    assert!(err.to_string().contains("name"));
}

#[test]
fn schema_coerces_bad_fields_to_defaults() {
    let resume = normalize_resume(&json!({
        "name": "Jane Doe",
        "email": "not-an-email",
        "website": "ftp://janedoe.dev",
        "phone": 5551234567_u64,
        "skills": ["React", "React", "Node.js"],
    }))
    .expect("normalize");

    assert_eq!(resume.email, "");
    assert_eq!(resume.website, "");
    assert_eq!(resume.phone, "");
    assert_eq!(resume.skills, vec!["React".to_string(), "Node.js".to_string()]);
    assert_eq!(resume.title, "");
    assert!(resume.projects.is_empty());
}

#[test]
fn schema_drops_invalid_social_entries_individually() {
    let resume = normalize_resume(&json!({
        "name": "Jane Doe",
        "socials": [
            { "label": "GitHub", "url": "https://github.com/janedoe" },
            { "label": "Broken", "url": "not a url" },
            { "url": "https://missing-label.dev" },
            "junk",
        ],
    }))
    .expect("normalize");

    assert_eq!(resume.socials.len(), 1);
    assert_eq!(resume.socials[0].label, "GitHub");
    assert_eq!(resume.socials[0].url, "https://github.com/janedoe");
}

#[test]
fn schema_resets_whole_collections_on_malformed_elements() {
    let resume = normalize_resume(&json!({
        "name": "Jane Doe",
        "skills": ["React", ""],
        "experience": [{ "company": "Acme" }, 7],
    }))
    .expect("normalize");

    assert!(resume.skills.is_empty());
    assert!(resume.experience.is_empty());
}

#[test]
fn project_entries_without_a_name_reset_the_whole_list() {
    let resume = normalize_resume(&json!({
        "name": "Jane Doe",
        "projects": [
            { "name": "Weather App" },
            { "summary": "missing its name" },
        ],
    }))
    .expect("normalize");

    assert!(resume.projects.is_empty());
}

#[test]
fn normalized_output_round_trips_through_the_schema() {
    let first = normalize_resume(&json!({
        "name": "Jane Doe",
        "title": "Senior Software Engineer",
        "summary": "Engineer who ships useful things.",
        "email": "jane@doe.dev",
        "website": "https://janedoe.dev",
        "socials": [{ "label": "GitHub", "url": "https://github.com/janedoe" }],
        "skills": ["React", "Rust"],
        "experience": [{
            "company": "Acme Corp",
            "role": "Lead Engineer",
            "start": "2020-03",
            "end": "Present",
            "bullets": ["Built the data platform"],
        }],
        "education": [{ "school": "TU Berlin", "degree": "B.Sc. CS", "year": "2016" }],
    }))
    .expect("first pass");

    let value = serde_json::to_value(&first).expect("to value");
    let second = normalize_resume(&value).expect("second pass");
    assert_eq!(first, second);
}

fn extract_args(root: PathBuf) -> ExtractArgs {
    ExtractArgs {
        root,
        source: None,
        cache_root: PathBuf::from(".cache/resume-extract"),
        manifest_path: None,
        skill_categories: Vec::new(),
        dry_run: false,
    }
}

#[test]
fn extract_writes_both_outputs_and_a_manifest() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::create_dir_all(dir.path().join("assets/docs")).expect("mkdir");
    fs::write(dir.path().join("assets/docs/resume.txt"), sample_resume_text()).expect("write");

    super::run::run(extract_args(dir.path().to_path_buf())).expect("run");

    for relative in ["data/resume.normalized.json", "public/data/resume.normalized.json"] {
        let raw = fs::read(dir.path().join(relative)).expect("read output");
        let resume: Resume = serde_json::from_slice(&raw).expect("parse output");
        assert_eq!(resume.name, "Jane Doe");
        assert_eq!(resume.experience.len(), 1);
    }

    let manifest_dir = dir.path().join(".cache/resume-extract/manifests");
    let manifests: Vec<_> = fs::read_dir(&manifest_dir)
        .expect("read manifests")
        .flatten()
        .collect();
    assert_eq!(manifests.len(), 1);
}

#[test]
fn json_sources_bypass_the_text_parser() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::create_dir_all(dir.path().join("data")).expect("mkdir");
    fs::create_dir_all(dir.path().join("assets/docs")).expect("mkdir");
    fs::write(
        dir.path().join("data/resume.json"),
        serde_json::to_string(&json!({ "name": "From Json" })).expect("serialize"),
    )
    .expect("write json");
    fs::write(dir.path().join("assets/docs/resume.txt"), sample_resume_text()).expect("write txt");

    super::run::run(extract_args(dir.path().to_path_buf())).expect("run");

    let raw = fs::read(dir.path().join("data/resume.normalized.json")).expect("read output");
    let resume: Resume = serde_json::from_slice(&raw).expect("parse output");
    assert_eq!(resume.name, "From Json");
}

#[test]
fn manifest_command_records_cache_and_manifest_flags() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::create_dir_all(dir.path().join("assets/docs")).expect("mkdir");
    fs::write(dir.path().join("assets/docs/resume.txt"), sample_resume_text()).expect("write");

    let manifest_path = dir.path().join("run.json");
    let mut args = extract_args(dir.path().to_path_buf());
    args.manifest_path = Some(manifest_path.clone());
    super::run::run(args).expect("run");

    let raw = fs::read(&manifest_path).expect("read manifest");
    let manifest: serde_json::Value = serde_json::from_slice(&raw).expect("parse manifest");
    let command = manifest["command"].as_str().expect("command string");
    assert!(command.contains("--cache-root .cache/resume-extract"));
    assert!(command.contains(&format!("--manifest-path {}", manifest_path.display())));
}

#[test]
fn extract_fails_without_writing_when_validation_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::create_dir_all(dir.path().join("data")).expect("mkdir");
    fs::write(dir.path().join("data/resume.json"), r#"{ "name": "X" }"#).expect("write");

    let err = super::run::run(extract_args(dir.path().to_path_buf())).expect_err("should fail");
    assert!(err.to_string().contains("name"));
    assert!(!dir.path().join("data/resume.normalized.json").exists());
    assert!(!dir.path().join("public/data/resume.normalized.json").exists());
}

#[test]
fn dry_run_skips_outputs_and_manifest() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::create_dir_all(dir.path().join("assets/docs")).expect("mkdir");
    fs::write(dir.path().join("assets/docs/resume.md"), sample_resume_text()).expect("write");

    let mut args = extract_args(dir.path().to_path_buf());
    args.dry_run = true;
    super::run::run(args).expect("run");

    assert!(!dir.path().join("data/resume.normalized.json").exists());
    assert!(!dir.path().join(".cache/resume-extract/manifests").exists());
}
