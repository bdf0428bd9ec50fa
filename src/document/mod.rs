//! Document parsing and question extraction
//!
//! This module reads convention-formatted Word (.docx) documents and turns
//! them into a nested question bank plus a folder of extracted pictures.

pub mod images;
pub(crate) mod io;
pub mod loader;
pub mod models;
pub mod parsing;
pub mod walker;

pub use images::{EmbeddedPicture, ImagePersister, ImageQueue};
pub use io::has_docx_extension;
pub use loader::{extract_document, load_paragraphs, Extractor};
pub use models::*;
pub use parsing::font_level::{FontLevel, FontLevelClassifier};
pub use parsing::question::QuestionUnitParser;
pub use walker::{DocumentWalker, WalkOutcome};
