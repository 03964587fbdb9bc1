use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

/// Candidate source files relative to the project root, in priority order.
/// The first one that exists wins.
pub const CANDIDATE_PATHS: [&str; 7] = [
    "data/resume.json",
    "assets/docs/resume.json",
    "assets/docs/resume.normalized.json",
    "assets/docs/resume.pdf",
    "assets/docs/resume.txt",
    "assets/docs/resume.md",
    "assets/docs/resume.docx",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Json,
    Pdf,
    Text,
    Docx,
}

impl SourceFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Pdf => "pdf",
            Self::Text => "text",
            Self::Docx => "docx",
        }
    }

    pub fn from_extension(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_lowercase();
        match extension.as_str() {
            "json" => Some(Self::Json),
            "pdf" => Some(Self::Pdf),
            "txt" | "md" => Some(Self::Text),
            "docx" => Some(Self::Docx),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LocatedSource {
    pub path: PathBuf,
    pub format: SourceFormat,
}

/// Probes the candidate list under `root`, or validates an explicit override.
pub fn locate_source(root: &Path, override_path: Option<&Path>) -> Result<LocatedSource> {
    if let Some(source) = override_path {
        let path = if source.is_absolute() {
            source.to_path_buf()
        } else {
            root.join(source)
        };
        if !path.exists() {
            bail!("resume source not found: {}", path.display());
        }
        let format = SourceFormat::from_extension(&path)
            .with_context(|| format!("unsupported resume source extension: {}", path.display()))?;
        return Ok(LocatedSource { path, format });
    }

    for candidate in CANDIDATE_PATHS {
        let path = root.join(candidate);
        if !path.exists() {
            continue;
        }
        let format = SourceFormat::from_extension(&path)
            .with_context(|| format!("unsupported resume source extension: {}", path.display()))?;
        return Ok(LocatedSource { path, format });
    }

    bail!(
        "no supported resume source found; place resume.json/pdf/txt/md/docx under data/ or assets/docs/ in {}",
        root.display()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_the_first_existing_candidate_in_priority_order() {
        let root = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(root.path().join("assets/docs")).expect("mkdir");
        std::fs::write(root.path().join("assets/docs/resume.pdf"), b"%PDF-").expect("write pdf");
        std::fs::write(root.path().join("assets/docs/resume.md"), "# md").expect("write md");

        let located = locate_source(root.path(), None).expect("locate");
        assert_eq!(located.format, SourceFormat::Pdf);
        assert!(located.path.ends_with("assets/docs/resume.pdf"));
    }

    #[test]
    fn json_beats_every_other_format() {
        let root = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(root.path().join("data")).expect("mkdir");
        std::fs::create_dir_all(root.path().join("assets/docs")).expect("mkdir");
        std::fs::write(root.path().join("data/resume.json"), "{}").expect("write json");
        std::fs::write(root.path().join("assets/docs/resume.docx"), b"PK").expect("write docx");

        let located = locate_source(root.path(), None).expect("locate");
        assert_eq!(located.format, SourceFormat::Json);
    }

    #[test]
    fn fails_when_no_candidate_exists() {
        let root = tempfile::tempdir().expect("tempdir");
        let err = locate_source(root.path(), None).expect_err("should fail");
        assert!(err.to_string().contains("no supported resume source"));
    }

    #[test]
    fn override_with_unknown_extension_is_rejected() {
        let root = tempfile::tempdir().expect("tempdir");
        std::fs::write(root.path().join("resume.odt"), b"odt").expect("write");
        let err = locate_source(root.path(), Some(Path::new("resume.odt"))).expect_err("reject");
        assert!(err.to_string().contains("unsupported resume source extension"));
    }
}
