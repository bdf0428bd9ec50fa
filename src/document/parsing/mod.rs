//! Paragraph level parsing: text extraction, font classification and
//! question units

pub mod font_level;
pub(crate) mod formatting;
pub mod question;
