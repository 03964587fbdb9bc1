use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::StatusArgs;
use crate::commands::extract;
use crate::model::{ExtractRunManifest, Resume};

pub fn run(args: StatusArgs) -> Result<()> {
    let cache_root = if args.cache_root.is_absolute() {
        args.cache_root.clone()
    } else {
        args.root.join(&args.cache_root)
    };
    let manifest_dir = cache_root.join("manifests");

    info!(root = %args.root.display(), cache_root = %cache_root.display(), "status requested");

    match latest_manifest(&manifest_dir)? {
        Some(path) => {
            let raw = fs::read(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let manifest: ExtractRunManifest = serde_json::from_slice(&raw)
                .with_context(|| format!("failed to parse {}", path.display()))?;

            info!(
                run_id = %manifest.run_id,
                status = %manifest.status,
                started_at = %manifest.started_at,
                updated_at = %manifest.updated_at,
                source = %manifest.source.path,
                format = %manifest.source.format,
                sha256 = %manifest.source.sha256,
                skills = manifest.counts.skill_count,
                experience = manifest.counts.experience_entries,
                projects = manifest.counts.project_entries,
                warnings = manifest.warnings.len(),
                "loaded latest extract run manifest"
            );
        }
        None => warn!(path = %manifest_dir.display(), "no extract run manifests found"),
    }

    for path in extract::output_paths(&args.root) {
        if !path.exists() {
            warn!(path = %path.display(), "normalized resume output missing");
            continue;
        }
        let raw = fs::read(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        match serde_json::from_slice::<Resume>(&raw) {
            Ok(resume) => info!(
                path = %path.display(),
                name = %resume.name,
                skills = resume.skills.len(),
                experience = resume.experience.len(),
                "normalized resume output ok"
            ),
            Err(err) => warn!(
                path = %path.display(),
                error = %err,
                "normalized resume output is not valid"
            ),
        }
    }

    Ok(())
}

/// Newest manifest by file name; run ids embed a UTC timestamp so
/// lexicographic order matches chronological order.
fn latest_manifest(manifest_dir: &std::path::Path) -> Result<Option<PathBuf>> {
    if !manifest_dir.exists() {
        return Ok(None);
    }

    let mut manifests: Vec<PathBuf> = Vec::new();
    let entries = fs::read_dir(manifest_dir)
        .with_context(|| format!("failed to read {}", manifest_dir.display()))?;
    for entry in entries {
        let entry = entry
            .with_context(|| format!("failed to read entry in {}", manifest_dir.display()))?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with("extract_run_") && name.ends_with(".json") {
            manifests.push(path);
        }
    }

    manifests.sort();
    Ok(manifests.pop())
}
