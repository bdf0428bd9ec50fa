//! Font-size based heading classification
//!
//! The authoring convention encodes every structural level as a fixed point
//! size. `.docx` stores sizes in half-points, so the table is kept in that unit
//! and lookups are exact.

/// Structural level a paragraph belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontLevel {
    DocumentTitle,
    Section,
    Subsection,
    Subsubsection,
    ItemHeading,
    BodyText,
}

impl FontLevel {
    /// Point size the convention assigns to this level
    pub const fn points(self) -> u32 {
        match self {
            FontLevel::DocumentTitle => 26,
            FontLevel::Section => 18,
            FontLevel::Subsection => 16,
            FontLevel::Subsubsection => 15,
            FontLevel::ItemHeading => 14,
            FontLevel::BodyText => 11,
        }
    }

    pub const ALL: [FontLevel; 6] = [
        FontLevel::DocumentTitle,
        FontLevel::Section,
        FontLevel::Subsection,
        FontLevel::Subsubsection,
        FontLevel::ItemHeading,
        FontLevel::BodyText,
    ];
}

/// Immutable size-to-level table, built once per run and handed to the walker
#[derive(Debug, Clone)]
pub struct FontLevelClassifier {
    table: Vec<(u32, FontLevel)>,
}

impl Default for FontLevelClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl FontLevelClassifier {
    pub fn new() -> Self {
        let table = FontLevel::ALL
            .iter()
            .map(|&level| (level.points() * 2, level))
            .collect();
        Self { table }
    }

    /// Level for a size given in half-points, `None` when the size is not in the table
    pub fn classify(&self, half_points: Option<u32>) -> Option<FontLevel> {
        let size = half_points?;
        self.table
            .iter()
            .find(|(known, _)| *known == size)
            .map(|&(_, level)| level)
    }
}
