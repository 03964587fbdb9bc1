use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::info;

use crate::cli::ExtractArgs;
use crate::commands::extract::locate;
use crate::commands::extract::parser::ResumeParser;
use crate::commands::extract::raw::{self, RawSource};
use crate::commands::extract::schema;
use crate::commands::extract::skills::DEFAULT_SKILL_CATEGORIES;
use crate::model::{ExtractCounts, ExtractPaths, ExtractRunManifest, Resume, SourceInfo};
use crate::util::{now_utc_string, sha256_file, utc_compact_string, write_json_pretty};

const MANIFEST_VERSION: u32 = 1;

/// Relative output paths the front end consumes, under the project root.
pub const OUTPUT_PATHS: [&str; 2] = [
    "data/resume.normalized.json",
    "public/data/resume.normalized.json",
];

pub fn run(args: ExtractArgs) -> Result<()> {
    let started_ts = Utc::now();
    let started_at = now_utc_string();
    let run_id = format!("run-{}", utc_compact_string(started_ts));

    let cache_root = if args.cache_root.is_absolute() {
        args.cache_root.clone()
    } else {
        args.root.join(&args.cache_root)
    };
    let manifest_dir = cache_root.join("manifests");
    let manifest_path = args.manifest_path.clone().unwrap_or_else(|| {
        manifest_dir.join(format!("extract_run_{}.json", utc_compact_string(started_ts)))
    });

    info!(root = %args.root.display(), run_id = %run_id, "starting extract");

    let located = locate::locate_source(&args.root, args.source.as_deref())?;
    info!(
        path = %located.path.display(),
        format = located.format.as_str(),
        "resolved resume source"
    );

    let categories: Vec<String> = if args.skill_categories.is_empty() {
        DEFAULT_SKILL_CATEGORIES.map(String::from).to_vec()
    } else {
        args.skill_categories.clone()
    };

    let mut line_count = 0;
    let candidate = match raw::read_source(&located)? {
        RawSource::Structured(value) => value,
        RawSource::Text(text) => {
            line_count = text.lines().filter(|line| !line.trim().is_empty()).count();
            info!(lines = line_count, "extracted raw resume text");

            let parser = ResumeParser::new(&categories)?;
            let draft = parser.parse(&text)?;
            serde_json::to_value(&draft).context("failed to serialize parsed resume draft")?
        }
    };

    let resume = schema::normalize_resume(&candidate)?;
    let counts = collect_counts(&resume, line_count);
    info!(
        name = %resume.name,
        skills = counts.skill_count,
        experience = counts.experience_entries,
        projects = counts.project_entries,
        "normalized resume record"
    );

    if args.dry_run {
        info!("dry-run complete; skipping output and manifest writes");
        return Ok(());
    }

    let mut output_paths: Vec<PathBuf> = Vec::new();
    for relative in OUTPUT_PATHS {
        let path = args.root.join(relative);
        write_json_pretty(&path, &resume)?;
        info!(path = %path.display(), "wrote normalized resume");
        output_paths.push(path);
    }

    let manifest = ExtractRunManifest {
        manifest_version: MANIFEST_VERSION,
        run_id,
        status: "completed".to_string(),
        started_at,
        updated_at: now_utc_string(),
        command: render_extract_command(&args),
        source: SourceInfo {
            path: located.path.display().to_string(),
            format: located.format.as_str().to_string(),
            sha256: sha256_file(&located.path)?,
        },
        paths: ExtractPaths {
            root: args.root.display().to_string(),
            cache_root: cache_root.display().to_string(),
            manifest_dir: manifest_dir.display().to_string(),
            output_paths: output_paths
                .iter()
                .map(|path| path.display().to_string())
                .collect(),
        },
        counts,
        warnings: Vec::new(),
        notes: vec![
            "Extract command completed using local sources only.".to_string(),
            "Section segmentation uses keyword headings from the markdown-flavored text layer."
                .to_string(),
        ],
    };
    write_json_pretty(&manifest_path, &manifest)?;
    info!(path = %manifest_path.display(), "wrote extract run manifest");

    info!(
        source = %located.path.display(),
        output = %output_paths[0].display(),
        "resume normalized successfully"
    );

    Ok(())
}

fn collect_counts(resume: &Resume, line_count: usize) -> ExtractCounts {
    ExtractCounts {
        line_count,
        skill_count: resume.skills.len(),
        social_count: resume.socials.len(),
        experience_entries: resume.experience.len(),
        project_entries: resume.projects.len(),
        education_entries: resume.education.len(),
        testimonial_entries: resume.testimonials.len(),
    }
}

fn render_extract_command(args: &ExtractArgs) -> String {
    let mut command = format!("resume-extract extract --root {}", args.root.display());
    if let Some(source) = &args.source {
        command.push_str(&format!(" --source {}", source.display()));
    }
    command.push_str(&format!(" --cache-root {}", args.cache_root.display()));
    if let Some(path) = &args.manifest_path {
        command.push_str(&format!(" --manifest-path {}", path.display()));
    }
    for category in &args.skill_categories {
        command.push_str(&format!(" --skill-category \"{category}\""));
    }
    if args.dry_run {
        command.push_str(" --dry-run");
    }
    command
}

/// Re-exported so `status` can reuse the same locations.
pub fn output_paths(root: &std::path::Path) -> Vec<PathBuf> {
    OUTPUT_PATHS.iter().map(|relative| root.join(relative)).collect()
}
