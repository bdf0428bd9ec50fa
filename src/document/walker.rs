//! Heading state machine over the paragraphs of one document
//!
//! The walker keeps the current heading path, buffers the lines of the
//! question being read and hands the buffer to [`QuestionUnitParser`] once the
//! answer line arrives.

use tracing::{debug, info};

use super::images::{ImagePersister, ImageQueue};
use super::models::{slot, HeadingPath, QuestionBank, SourceParagraph};
use super::parsing::font_level::{FontLevel, FontLevelClassifier};
use super::parsing::formatting::normalize_colon;
use super::parsing::question::{QuestionUnitParser, QUESTION_NUMBER_END, QUESTION_OPENER};
use crate::error::{ExtractError, Result};

/// Default text that ends the relevant part of a document
pub const END_MARKER: &str = "计算机视觉";

/// Result of walking one document
#[derive(Debug, Clone, Default)]
pub struct WalkOutcome {
    pub heading_path: HeadingPath,
    pub questions: QuestionBank,
    pub question_count: usize,
}

impl WalkOutcome {
    pub fn title(&self) -> Option<&str> {
        self.heading_path.title()
    }
}

pub struct DocumentWalker<'a> {
    classifier: &'a FontLevelClassifier,
    parser: &'a QuestionUnitParser,
    end_marker: &'a str,
    path: HeadingPath,
    questions: QuestionBank,
    buffer: Vec<String>,
    question_count: usize,
}

impl<'a> DocumentWalker<'a> {
    pub fn new(
        classifier: &'a FontLevelClassifier,
        parser: &'a QuestionUnitParser,
        end_marker: &'a str,
    ) -> Self {
        Self {
            classifier,
            parser,
            end_marker,
            path: HeadingPath::new(),
            questions: QuestionBank::new(),
            buffer: Vec::new(),
            question_count: 0,
        }
    }

    /// Walk `paragraphs` in order, consuming pictures from `images` as image
    /// lines are parsed.
    pub fn walk<'p>(
        mut self,
        paragraphs: impl IntoIterator<Item = &'p SourceParagraph>,
        images: &mut ImageQueue,
        persister: &mut ImagePersister,
    ) -> Result<WalkOutcome> {
        for (index, paragraph) in paragraphs.into_iter().enumerate() {
            let content = normalize_colon(&paragraph.text).trim().to_string();

            if !self.end_marker.is_empty() && content.contains(self.end_marker) {
                info!(paragraph = index, "end marker reached");
                break;
            }

            let Some(level) = self.classifier.classify(paragraph.font_size) else {
                if content.is_empty() {
                    self.buffer.push(self.path.image_placeholder());
                    continue;
                }
                return Err(ExtractError::UnclassifiedFont {
                    index,
                    size: describe_size(paragraph.font_size),
                    text: content,
                });
            };

            debug!(paragraph = index, ?level, text = %content, "classified paragraph");
            self.step(level, content, images, persister)?;
        }

        if !self.buffer.is_empty() {
            debug!(lines = self.buffer.len(), "discarding unterminated question lines");
        }

        Ok(WalkOutcome {
            heading_path: self.path,
            questions: self.questions,
            question_count: self.question_count,
        })
    }

    fn step(
        &mut self,
        level: FontLevel,
        content: String,
        images: &mut ImageQueue,
        persister: &mut ImagePersister,
    ) -> Result<()> {
        match level {
            FontLevel::DocumentTitle => {
                self.path.set(slot::TITLE, content);
            }
            FontLevel::Section => {
                self.questions.entry(content.clone()).or_default();
                self.path.set(slot::SECTION, content);
            }
            FontLevel::Subsection => {
                self.questions
                    .entry(self.path.section().to_string())
                    .or_default()
                    .entry(content.clone())
                    .or_default();
                self.path.set(slot::SUBSECTION, content);
            }
            FontLevel::Subsubsection => {
                self.questions
                    .entry(self.path.section().to_string())
                    .or_default()
                    .entry(self.path.subsection().to_string())
                    .or_default()
                    .entry(content.clone())
                    .or_default();
                self.path.set(slot::SUBSUBSECTION, content);
            }
            FontLevel::ItemHeading => {
                if content.contains(QUESTION_OPENER) {
                    self.path.set(slot::ITEM, question_number(&content));
                    self.buffer.push(content);
                }
            }
            FontLevel::BodyText => {
                let closes = content.contains(self.parser.answer_keyword());
                self.buffer.push(content);
                if closes {
                    self.close_question(images, persister)?;
                }
            }
        }
        Ok(())
    }

    fn close_question(
        &mut self,
        images: &mut ImageQueue,
        persister: &mut ImagePersister,
    ) -> Result<()> {
        let lines = std::mem::take(&mut self.buffer);
        let record = self.parser.parse(&lines, &self.path, images, persister)?;

        self.questions
            .entry(self.path.section().to_string())
            .or_default()
            .entry(self.path.subsection().to_string())
            .or_default()
            .entry(self.path.subsubsection().to_string())
            .or_default()
            .push(record);
        self.question_count += 1;

        debug!(
            section = self.path.section(),
            subsection = self.path.subsection(),
            subsubsection = self.path.subsubsection(),
            item = self.path.item(),
            "question parsed"
        );
        Ok(())
    }
}

/// `（12）求和` -> `（12）`; empty when the number is not closed
fn question_number(content: &str) -> &str {
    content
        .find(QUESTION_NUMBER_END)
        .map(|end| &content[..end + QUESTION_NUMBER_END.len_utf8()])
        .unwrap_or("")
}

fn describe_size(half_points: Option<u32>) -> String {
    match half_points {
        Some(size) => format!("{}pt", size as f32 / 2.0),
        None => "<unset>".to_string(),
    }
}
