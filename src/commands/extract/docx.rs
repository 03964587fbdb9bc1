use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use anyhow::{Context, Result, bail};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use zip::ZipArchive;

/// Converts a DOCX package into Markdown-flavored text.
///
/// Only the features the resume parser relies on are rendered: bold and
/// underlined runs come out as `**text**`, hyperlinks as `[text](url)`,
/// numbered/bulleted paragraphs as `- ` lines, and paragraphs are separated
/// by blank lines.
pub fn convert_to_markdown(path: &Path) -> Result<String> {
    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    convert_reader(file)
}

pub fn convert_reader<R: Read + Seek>(reader: R) -> Result<String> {
    let mut archive = ZipArchive::new(reader).context("failed to open docx package")?;

    let hyperlinks = match read_entry(&mut archive, "word/_rels/document.xml.rels")? {
        Some(xml) => parse_relationships(&xml)?,
        None => HashMap::new(),
    };
    let Some(document) = read_entry(&mut archive, "word/document.xml")? else {
        bail!("docx package is missing word/document.xml");
    };

    render_markdown(&document, &hyperlinks)
}

fn read_entry<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<Option<String>> {
    match archive.by_name(name) {
        Ok(mut entry) => {
            let mut content = String::new();
            entry
                .read_to_string(&mut content)
                .with_context(|| format!("failed to read {name} from docx package"))?;
            Ok(Some(content))
        }
        Err(zip::result::ZipError::FileNotFound) => Ok(None),
        Err(err) => Err(err).with_context(|| format!("failed to open {name} in docx package")),
    }
}

/// Relationship id → target map used to resolve `w:hyperlink` elements.
fn parse_relationships(xml: &str) -> Result<HashMap<String, String>> {
    let mut reader = Reader::from_str(xml);
    let mut targets = HashMap::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref element)) | Ok(Event::Empty(ref element))
                if element.local_name().as_ref() == b"Relationship" =>
            {
                let mut id = None;
                let mut target = None;
                for attr in element.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"Id" => id = Some(String::from_utf8_lossy(&attr.value).to_string()),
                        b"Target" => {
                            target = Some(String::from_utf8_lossy(&attr.value).to_string());
                        }
                        _ => {}
                    }
                }
                if let (Some(id), Some(target)) = (id, target) {
                    targets.insert(id, target);
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => return Err(err).context("failed to parse docx relationships"),
        }
    }

    Ok(targets)
}

fn render_markdown(xml: &str, hyperlinks: &HashMap<String, String>) -> Result<String> {
    let mut reader = Reader::from_str(xml);

    let mut output = String::new();
    let mut paragraph = String::new();
    let mut paragraph_is_list = false;

    let mut in_run = false;
    let mut in_run_props = false;
    let mut in_text = false;
    let mut run_emphasized = false;
    let mut run_text = String::new();

    // While inside w:hyperlink, finished runs accumulate here instead of in
    // the paragraph, so the whole span can be emitted as one markdown link.
    let mut link: Option<(String, String)> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref element)) => match element.local_name().as_ref() {
                b"p" => {
                    paragraph.clear();
                    paragraph_is_list = false;
                    link = None;
                }
                b"r" => {
                    in_run = true;
                    run_emphasized = false;
                    run_text.clear();
                }
                b"rPr" => in_run_props = true,
                b"b" | b"u" if in_run && in_run_props => {
                    if emphasis_enabled(element) {
                        run_emphasized = true;
                    }
                }
                b"t" => in_text = true,
                b"hyperlink" => {
                    let target = element
                        .attributes()
                        .flatten()
                        .find(|attr| attr.key.as_ref() == b"r:id")
                        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
                        .and_then(|id| hyperlinks.get(&id).cloned())
                        .unwrap_or_default();
                    link = Some((target, String::new()));
                }
                b"numPr" => paragraph_is_list = true,
                _ => {}
            },
            Ok(Event::Empty(ref element)) => match element.local_name().as_ref() {
                b"b" | b"u" if in_run && in_run_props => {
                    if emphasis_enabled(element) {
                        run_emphasized = true;
                    }
                }
                b"br" => run_text.push('\n'),
                b"tab" => run_text.push(' '),
                b"numPr" => paragraph_is_list = true,
                _ => {}
            },
            Ok(Event::Text(ref content)) if in_text => {
                let unescaped = content
                    .unescape()
                    .context("failed to decode docx text run")?;
                run_text.push_str(&unescaped);
            }
            Ok(Event::End(ref element)) => match element.local_name().as_ref() {
                b"rPr" => in_run_props = false,
                b"t" => in_text = false,
                b"r" => {
                    let rendered = if run_emphasized && !run_text.trim().is_empty() {
                        format!("**{}**", run_text.trim())
                    } else {
                        run_text.clone()
                    };
                    match link.as_mut() {
                        Some((_, text)) => text.push_str(&rendered),
                        None => paragraph.push_str(&rendered),
                    }
                    in_run = false;
                }
                b"hyperlink" => {
                    if let Some((target, text)) = link.take() {
                        if target.is_empty() {
                            paragraph.push_str(&text);
                        } else {
                            paragraph.push_str(&format!("[{text}]({target})"));
                        }
                    }
                }
                b"p" => {
                    let line = paragraph.trim();
                    if !line.is_empty() {
                        if paragraph_is_list {
                            output.push_str("- ");
                        }
                        output.push_str(line);
                        output.push_str("\n\n");
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => return Err(err).context("failed to parse docx document"),
        }
    }

    Ok(output)
}

/// `<w:b/>` means on; `<w:b w:val="false"/>` (or 0/none) means off.
fn emphasis_enabled(element: &BytesStart) -> bool {
    for attr in element.attributes().flatten() {
        if attr.key.as_ref() == b"w:val" {
            let value = String::from_utf8_lossy(&attr.value).to_lowercase();
            return !matches!(value.as_str(), "false" | "0" | "none");
        }
    }
    true
}
