use std::fs;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::commands::extract::docx;
use crate::commands::extract::locate::{LocatedSource, SourceFormat};

/// Raw extraction result: JSON sources skip the text parser and go straight
/// to schema normalization, everything else becomes a UTF-8 text blob.
pub enum RawSource {
    Structured(Value),
    Text(String),
}

pub fn read_source(located: &LocatedSource) -> Result<RawSource> {
    let path = &located.path;

    match located.format {
        SourceFormat::Json => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let value: Value = serde_json::from_str(&raw)
                .with_context(|| format!("failed to parse {}", path.display()))?;
            Ok(RawSource::Structured(value))
        }
        SourceFormat::Pdf => {
            // Embedded text layer only; no layout or column reconstruction.
            let text = pdf_extract::extract_text(path)
                .with_context(|| format!("failed to extract text from {}", path.display()))?;
            Ok(RawSource::Text(text))
        }
        SourceFormat::Text => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            Ok(RawSource::Text(text))
        }
        SourceFormat::Docx => {
            let markdown = docx::convert_to_markdown(path)
                .with_context(|| format!("failed to convert {}", path.display()))?;
            Ok(RawSource::Text(markdown))
        }
    }
}
