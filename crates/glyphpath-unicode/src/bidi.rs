//! Display order through the Unicode Bidirectional Algorithm

use glyphpath_core::{traits::BidiReorderer, types::TextDirection, Result};
use unicode_bidi::{BidiInfo, Level};

/// Reorders one line with `unicode-bidi`
#[derive(Debug, Default, Clone, Copy)]
pub struct UnicodeBidiReorderer;

impl UnicodeBidiReorderer {
    pub fn new() -> Self {
        Self
    }
}

fn base_level(direction: TextDirection) -> Option<Level> {
    match direction {
        TextDirection::Auto => None,
        TextDirection::Ltr => Some(Level::ltr()),
        TextDirection::Rtl => Some(Level::rtl()),
    }
}

impl BidiReorderer for UnicodeBidiReorderer {
    fn name(&self) -> &'static str {
        "unicode-bidi"
    }

    fn reorder(&self, line: &[char], direction: TextDirection) -> Result<Vec<char>> {
        let text: String = line.iter().collect();
        let bidi = BidiInfo::new(&text, base_level(direction));

        let mut visual = Vec::with_capacity(line.len());
        for paragraph in &bidi.paragraphs {
            let reordered = bidi.reorder_line(paragraph, paragraph.range.clone());
            visual.extend(reordered.chars());
        }
        Ok(visual)
    }
}
