//! Parsing of one buffered question unit
//!
//! A unit is every line from the question opener `（n）…` up to the line that
//! carries the answer. Lines are classified by their text alone:
//!
//! - `（…` opens the question and becomes its title
//! - a synthesized `….png` line stands for a picture; the line before it
//!   decides whether it belongs to an option or to the title
//! - `A:`..`D:` followed by text is a text option
//! - the last line, when it contains the answer keyword, is the answer
//!
//! Anything else is ignored.

use indexmap::IndexMap;
use tracing::{debug, warn};

use super::super::images::{ImagePersister, ImageQueue};
use super::super::models::{
    HeadingPath, IMAGE_EXTENSION, QuestionRecord, QuestionTitle, QuestionType,
};
use super::formatting::normalize_colon;
use crate::error::{ExtractError, Result};

/// Full-width open parenthesis starting a question
pub const QUESTION_OPENER: char = '（';

/// Full-width close parenthesis ending the question number
pub const QUESTION_NUMBER_END: char = '）';

/// Default keyword marking the answer line
pub const ANSWER_KEYWORD: &str = "答案";

/// Characters stripped from the answer line, e.g. `答案:`
const ANSWER_PREFIX_CHARS: usize = 3;

/// Option markers, `A:` being the first
pub const OPTION_MARKERS: [&str; 4] = ["A:", "B:", "C:", "D:"];

const FIRST_OPTION: &str = "A:";

fn is_opener(line: &str) -> bool {
    line.starts_with(QUESTION_OPENER)
}

fn is_image_line(line: &str) -> bool {
    line.ends_with(IMAGE_EXTENSION)
}

fn as_option_marker(line: &str) -> Option<&'static str> {
    OPTION_MARKERS.iter().copied().find(|marker| *marker == line)
}

/// Split `A:text` into (`A:`, `text`); a bare marker is not a text option
fn split_text_option(line: &str) -> Option<(&'static str, &str)> {
    OPTION_MARKERS
        .iter()
        .copied()
        .find_map(|marker| {
            line.strip_prefix(marker)
                .filter(|rest| !rest.is_empty())
                .map(|rest| (marker, rest))
        })
}

/// Record under construction while a unit is scanned
#[derive(Debug, Default)]
struct QuestionBuilder {
    record: QuestionRecord,
}

impl QuestionBuilder {
    fn open(&mut self, title: &str) {
        self.record.question_title = Some(QuestionTitle {
            title: title.to_string(),
            img_name: Vec::new(),
        });
    }

    /// `A:` starts a fresh option map and makes the question multiple-choice
    fn set_option(&mut self, marker: &str, value: String) {
        if marker == FIRST_OPTION {
            self.record.question_type = QuestionType::MultipleChoice;
            self.record.option = Some(IndexMap::new());
        }
        self.record
            .option
            .get_or_insert_with(IndexMap::new)
            .insert(marker.to_string(), value);
    }

    fn push_title_image(&mut self, name: String, context: &str) -> Result<()> {
        let title = self
            .record
            .question_title
            .as_mut()
            .ok_or_else(|| ExtractError::ImagePlacement {
                question: context.to_string(),
                detail: format!("{name} precedes the question opener"),
            })?;
        title.img_name.push(name);
        Ok(())
    }

    fn finish(self) -> QuestionRecord {
        self.record
    }
}

/// Turns question units into records, persisting their pictures on the way
#[derive(Debug, Clone)]
pub struct QuestionUnitParser {
    answer_keyword: String,
}

impl Default for QuestionUnitParser {
    fn default() -> Self {
        Self::new(ANSWER_KEYWORD)
    }
}

impl QuestionUnitParser {
    pub fn new(answer_keyword: impl Into<String>) -> Self {
        Self {
            answer_keyword: answer_keyword.into(),
        }
    }

    pub fn answer_keyword(&self) -> &str {
        &self.answer_keyword
    }

    /// Parse `lines` into a record. Every picture line pops the next image from
    /// `images` and saves it through `persister` before the scan continues.
    pub fn parse(
        &self,
        lines: &[String],
        path: &HeadingPath,
        images: &mut ImageQueue,
        persister: &mut ImagePersister,
    ) -> Result<QuestionRecord> {
        let lines: Vec<String> = lines.iter().map(|line| normalize_colon(line)).collect();
        let context = lines.first().map(String::as_str).unwrap_or_default();

        let mut question = QuestionBuilder::default();
        let mut image_index = 0;

        for (index, line) in lines.iter().enumerate() {
            if is_opener(line) {
                question.open(line);
            } else if is_image_line(line) {
                let name = path.image_name(image_index);
                image_index += 1;

                self.attach_image(&mut question, &lines, index, name.clone(), context)?;
                persister.save(images, path.title(), &name)?;
            } else if let Some((marker, text)) = split_text_option(line) {
                question.set_option(marker, text.to_string());
            } else if index == lines.len() - 1 && line.contains(self.answer_keyword.as_str()) {
                question.record.answer = Some(line.chars().skip(ANSWER_PREFIX_CHARS).collect());
            } else {
                debug!(line = %line, question = %context, "ignoring unclassified line");
            }
        }

        Ok(question.finish())
    }

    /// Decide who owns the picture at `index` by looking at the line before it
    fn attach_image(
        &self,
        question: &mut QuestionBuilder,
        lines: &[String],
        index: usize,
        name: String,
        context: &str,
    ) -> Result<()> {
        let placement_error = |detail: String| ExtractError::ImagePlacement {
            question: context.to_string(),
            detail,
        };

        let Some(previous) = index.checked_sub(1).map(|i| lines[i].as_str()) else {
            warn!(image = %name, question = %context, "picture opens the question; saved but not referenced");
            return Ok(());
        };

        if let Some(marker) = as_option_marker(previous) {
            question.set_option(marker, name);
        } else if is_opener(previous) {
            question.push_title_image(name, context)?;
        } else if is_image_line(previous) {
            // Later picture of a run after the title: an opener must come before it
            if !lines[..index - 1].iter().rev().any(|line| is_opener(line)) {
                return Err(placement_error(format!(
                    "{name} follows another picture but no question opener precedes it"
                )));
            }
            question.push_title_image(name, context)?;
        } else {
            warn!(
                image = %name,
                previous = %previous,
                question = %context,
                "picture follows plain text; saved but not referenced"
            );
        }

        Ok(())
    }
}
