//! Document loading and orchestration
//!
//! This module contains [`Extractor`], which ties the parsing pieces together
//! for one `.docx` file:
//! 1. Opens the file as a Word container
//! 2. Reads the paragraphs through docx-rs
//! 3. Reads the embedded pictures in relationship order
//! 4. Walks the paragraphs, saving pictures as questions are parsed
//! 5. Writes `<title>.json` next to the picture folder

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::images::{read_images, ImagePersister};
use super::io::open_docx;
use super::models::*;
use super::parsing::font_level::FontLevelClassifier;
use super::parsing::formatting::read_paragraph;
use super::parsing::question::QuestionUnitParser;
use super::walker::DocumentWalker;
use crate::config::Config;
use crate::error::ExtractError;

const JSON_INDENT: &[u8] = b"    ";

/// Paragraphs of the document body in order; tables and run-less paragraphs are skipped
pub fn load_paragraphs(docx: &docx_rs::Docx) -> Vec<SourceParagraph> {
    docx.document
        .children
        .iter()
        .filter_map(|child| match child {
            docx_rs::DocumentChild::Paragraph(para) => read_paragraph(para),
            _ => None,
        })
        .collect()
}

/// Converts documents one after another with a shared, immutable setup
#[derive(Debug, Clone)]
pub struct Extractor {
    config: Config,
    classifier: FontLevelClassifier,
    parser: QuestionUnitParser,
}

impl Extractor {
    pub fn new(config: Config) -> Self {
        let parser = QuestionUnitParser::new(config.answer_keyword.clone());
        Self {
            config,
            classifier: FontLevelClassifier::new(),
            parser,
        }
    }

    /// Extract the questions and pictures of one document.
    ///
    /// Pictures are written while the walk runs; if a later question fails
    /// they stay on disk, but no JSON is written.
    pub fn extract(&self, file_path: &Path) -> Result<ExtractionSummary> {
        let file_data = fs::read(file_path)
            .with_context(|| format!("failed to read {}", file_path.display()))?;
        let mut archive = open_docx(file_path, &file_data)?;
        let docx = docx_rs::read_docx(&file_data)
            .map_err(ExtractError::from)
            .with_context(|| format!("failed to parse {}", file_path.display()))?;
        let paragraphs = load_paragraphs(&docx);

        let mut images = read_images(&mut archive)
            .with_context(|| format!("failed to read pictures of {}", file_path.display()))?;
        info!(
            file = %file_path.display(),
            paragraphs = paragraphs.len(),
            pictures = images.remaining(),
            "document loaded"
        );

        let mut persister =
            ImagePersister::new(&self.config.output_dir, self.config.temp_image_name.clone());
        let outcome = DocumentWalker::new(&self.classifier, &self.parser, &self.config.end_marker)
            .walk(&paragraphs, &mut images, &mut persister)
            .with_context(|| format!("failed to extract questions from {}", file_path.display()))?;

        if images.remaining() > 0 {
            warn!(
                unused = images.remaining(),
                used = images.consumed(),
                "document embeds more pictures than picture paragraphs"
            );
        }

        let title = outcome.title().ok_or(ExtractError::MissingTitle)?.to_string();
        let json_path = self.write_json(&title, &outcome.questions)?;
        info!(json = %json_path.display(), questions = outcome.question_count, "question bank written");

        Ok(ExtractionSummary {
            image_dir: persister.image_dir(&title),
            title,
            json_path,
            question_count: outcome.question_count,
            images_written: persister.written(),
        })
    }

    fn write_json(&self, title: &str, questions: &QuestionBank) -> Result<PathBuf> {
        let output_dir = &self.config.output_dir;
        if !output_dir.as_os_str().is_empty() && !output_dir.exists() {
            fs::create_dir_all(output_dir)?;
        }

        let json_path = output_dir.join(format!("{title}.json"));
        let file = File::create(&json_path)
            .with_context(|| format!("failed to create {}", json_path.display()))?;
        let mut writer = BufWriter::new(file);
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(JSON_INDENT));
        questions.serialize(&mut serializer)?;
        writer.flush()?;

        Ok(json_path)
    }
}

/// Convenience wrapper for a single document
pub fn extract_document(file_path: &Path, config: &Config) -> Result<ExtractionSummary> {
    Extractor::new(config.clone()).extract(file_path)
}
