//! Text and font-size extraction from docx-rs paragraphs

use super::super::models::SourceParagraph;

/// Full-width colon used by Chinese input methods
pub(crate) const FULLWIDTH_COLON: char = '：';

/// Replace the full-width colon with an ASCII one
pub(crate) fn normalize_colon(text: &str) -> String {
    text.replace(FULLWIDTH_COLON, ":")
}

/// Convert a docx-rs paragraph into the text and size the walker works on.
///
/// Returns `None` for paragraphs without any run, which carry neither text nor
/// a picture.
pub(crate) fn read_paragraph(para: &docx_rs::Paragraph) -> Option<SourceParagraph> {
    let first_run = para.children.iter().find_map(|child| match child {
        docx_rs::ParagraphChild::Run(run) => Some(&**run),
        _ => None,
    })?;

    Some(SourceParagraph {
        font_size: extract_run_font_size(first_run),
        text: extract_paragraph_text(para),
    })
}

/// Extract plain text from a paragraph, including hyperlinks and insertions
pub(crate) fn extract_paragraph_text(para: &docx_rs::Paragraph) -> String {
    let mut text = String::new();
    push_children_text(&para.children, &mut text);
    text
}

fn push_children_text(children: &[docx_rs::ParagraphChild], text: &mut String) {
    for child in children {
        match child {
            docx_rs::ParagraphChild::Run(run) => {
                text.push_str(&extract_run_text(run));
            }
            docx_rs::ParagraphChild::Insert(insert) => {
                for child in &insert.children {
                    if let docx_rs::InsertChild::Run(run) = child {
                        text.push_str(&extract_run_text(run));
                    }
                }
            }
            docx_rs::ParagraphChild::Hyperlink(link) => {
                push_children_text(&link.children, text);
            }
            docx_rs::ParagraphChild::Delete(_) => {
                // Skip deletions (track changes)
            }
            _ => {}
        }
    }
}

/// Extract text from a run; drawings contribute nothing
pub(crate) fn extract_run_text(run: &docx_rs::Run) -> String {
    let mut text = String::new();

    for child in &run.children {
        match child {
            docx_rs::RunChild::Text(text_elem) => {
                text.push_str(&text_elem.text);
            }
            docx_rs::RunChild::Tab(_) => {
                text.push('\t');
            }
            docx_rs::RunChild::Break(_) => {
                text.push('\n');
            }
            _ => {}
        }
    }

    text
}

/// Explicit `w:sz` of a run in half-points.
///
/// `Sz` keeps its value private but serializes as a bare number, so it is read
/// back through serde.
pub(crate) fn extract_run_font_size(run: &docx_rs::Run) -> Option<u32> {
    let sz = run.run_property.sz.as_ref()?;
    let value = serde_json::to_value(sz).ok()?;
    value
        .as_u64()
        .or_else(|| value.get("val")?.as_u64())
        .and_then(|v| u32::try_from(v).ok())
}
