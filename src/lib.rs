//! docx-quiz: question bank extraction from .docx files
//!
//! This library reads Word documents written under a fixed authoring
//! convention (heading levels by font size, questions opened by `（n）`,
//! options as `A:`..`D:`, answers after `答案`) and produces a nested JSON
//! question bank together with the pictures the questions reference.

pub mod config;
pub mod document;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use config::Config;
pub use document::{extract_document, Extractor, QuestionBank, QuestionRecord};
pub use error::ExtractError;
