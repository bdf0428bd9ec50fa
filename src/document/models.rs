//! Core data structures for the question bank
//!
//! This module defines the heading path tracked during a walk, the raw
//! paragraphs read from a document, and the question records written to JSON.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Extension of synthesized image lines and of the written image files.
pub const IMAGE_EXTENSION: &str = ".png";

/// Separator between heading texts in image names.
pub const NAME_SEPARATOR: &str = "+";

/// Question list under a level-3 heading.
pub type QuestionList = Vec<QuestionRecord>;

/// `{ level1: { level2: { level3: [QuestionRecord, ..] } } }` in document order.
pub type QuestionBank = IndexMap<String, IndexMap<String, IndexMap<String, QuestionList>>>;

/// One paragraph as read from the source document
#[derive(Debug, Clone, PartialEq)]
pub struct SourceParagraph {
    /// Explicit size of the first run, in half-points
    pub font_size: Option<u32>,
    pub text: String,
}

impl SourceParagraph {
    pub fn new(font_size: Option<u32>, text: impl Into<String>) -> Self {
        Self {
            font_size,
            text: text.into(),
        }
    }
}

/// Slot indices of the heading path
pub mod slot {
    pub const TITLE: usize = 0;
    pub const SECTION: usize = 1;
    pub const SUBSECTION: usize = 2;
    pub const SUBSUBSECTION: usize = 3;
    pub const ITEM: usize = 4;
}

/// Ancestor headings active at the current position of the walk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadingPath {
    slots: [String; 5],
}

impl HeadingPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, index: usize) -> &str {
        &self.slots[index]
    }

    pub fn set(&mut self, index: usize, text: impl Into<String>) {
        self.slots[index] = text.into();
    }

    pub fn title(&self) -> Option<&str> {
        let title = self.get(slot::TITLE);
        (!title.is_empty()).then_some(title)
    }

    pub fn section(&self) -> &str {
        self.get(slot::SECTION)
    }

    pub fn subsection(&self) -> &str {
        self.get(slot::SUBSECTION)
    }

    pub fn subsubsection(&self) -> &str {
        self.get(slot::SUBSUBSECTION)
    }

    pub fn item(&self) -> &str {
        self.get(slot::ITEM)
    }

    /// Heading texts below the document title joined by `+`, skipping empty slots.
    ///
    /// The document title is not part of the stem because images already live
    /// in a folder named after it.
    pub fn image_stem(&self) -> String {
        self.slots[slot::SECTION..]
            .iter()
            .filter(|s| !s.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(NAME_SEPARATOR)
    }

    /// Canonical filename for the `index`-th image of the current question
    pub fn image_name(&self, index: usize) -> String {
        let stem = self.image_stem();
        if stem.is_empty() {
            format!("{index}{IMAGE_EXTENSION}")
        } else {
            format!("{stem}{NAME_SEPARATOR}{index}{IMAGE_EXTENSION}")
        }
    }

    /// Placeholder pushed into a question buffer where a picture paragraph sits
    pub fn image_placeholder(&self) -> String {
        format!("{}{IMAGE_EXTENSION}", self.image_stem())
    }
}

impl From<[&str; 5]> for HeadingPath {
    fn from(slots: [&str; 5]) -> Self {
        Self {
            slots: slots.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum QuestionType {
    #[default]
    #[serde(rename = "填空题")]
    FillInTheBlank,
    #[serde(rename = "选择题")]
    MultipleChoice,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuestionTitle {
    pub title: String,
    #[serde(rename = "imgName")]
    pub img_name: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuestionRecord {
    #[serde(rename = "questionTitle", skip_serializing_if = "Option::is_none")]
    pub question_title: Option<QuestionTitle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub option: Option<IndexMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(rename = "questionType")]
    pub question_type: QuestionType,
}

/// What one call to `extract_document` produced
#[derive(Debug, Clone)]
pub struct ExtractionSummary {
    pub title: String,
    pub json_path: PathBuf,
    pub image_dir: PathBuf,
    pub question_count: usize,
    pub images_written: usize,
}
