use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::document::parsing::question::ANSWER_KEYWORD;
use crate::document::walker::END_MARKER;

/// Runtime settings for docx-quiz
///
/// The font-size table is part of the authoring convention and deliberately
/// not configurable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Where `<title>.json` and the `<title>/` picture folder are written
    pub output_dir: PathBuf,
    /// Paragraph text that ends the relevant part of a document
    pub end_marker: String,
    /// Keyword on the line closing a question
    pub answer_keyword: String,
    /// Intermediate file a picture is encoded to before being renamed
    pub temp_image_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            end_marker: END_MARKER.to_string(),
            answer_keyword: ANSWER_KEYWORD.to_string(),
            temp_image_name: "temp.png".to_string(),
        }
    }
}

impl Config {
    /// Load from the config directory, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = match Self::get_config_path() {
            Some(path) if path.exists() => {
                let content = fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                Self::from_toml(&content)
                    .with_context(|| format!("invalid config file {}", path.display()))?
            }
            _ => Config::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings extraction cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.answer_keyword.trim().is_empty() {
            bail!("answer_keyword must not be empty: every body line would close a question");
        }
        if self.temp_image_name.is_empty() {
            bail!("temp_image_name must not be empty");
        }
        Ok(())
    }

    /// Get the path to the config file
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("docx-quiz").join("config.toml"))
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = var("DOCX_QUIZ_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(marker) = var("DOCX_QUIZ_END_MARKER") {
            self.end_marker = marker;
        }
    }
}
