//! Cmap Shaper - one glyph per codepoint
//!
//! The fallback when no shaping engine is configured: every codepoint goes
//! through the face's character map on its own. No ligatures, no contextual
//! forms, and a codepoint the face lacks becomes the missing glyph instead of
//! failing the line.

use glyphpath_core::{
    error::Result,
    traits::{Face, Shaper},
    types::{GlyphId, TextSpan, MISSING_GLYPH},
};

/// A minimal shaper that maps codepoints through the character map
pub struct CmapShaper;

impl CmapShaper {
    /// Create a new CmapShaper
    pub fn new() -> Self {
        Self
    }
}

impl Default for CmapShaper {
    fn default() -> Self {
        Self::new()
    }
}

impl Shaper for CmapShaper {
    fn name(&self) -> &'static str {
        "none"
    }

    fn shape(&self, span: &TextSpan, face: &dyn Face) -> Result<Vec<GlyphId>> {
        log::debug!("CmapShaper: mapping {} chars", span.codepoints.len());

        Ok(span
            .codepoints
            .iter()
            .map(|&ch| face.glyph_index(ch).unwrap_or(MISSING_GLYPH))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphpath_core::RawGlyph;

    // Mock face for testing
    struct MockFace;

    impl Face for MockFace {
        fn data(&self) -> &[u8] {
            &[]
        }

        fn units_per_em(&self) -> u16 {
            1000
        }

        fn line_height(&self) -> f64 {
            1200.0
        }

        fn glyph_index(&self, ch: char) -> Option<GlyphId> {
            // Simple mapping: ASCII characters to their values
            if ch.is_ascii() {
                Some(ch as u32)
            } else {
                None
            }
        }

        fn load_glyph(&self, _glyph_id: GlyphId, _grid_fit: bool) -> Option<RawGlyph> {
            None
        }
    }

    #[test]
    fn test_basic_mapping() {
        let span = TextSpan::new("Hello".chars().collect(), None);
        let glyphs = CmapShaper::new().shape(&span, &MockFace).unwrap();

        assert_eq!(glyphs, vec![72, 101, 108, 108, 111]);
    }

    #[test]
    fn test_unmapped_becomes_missing_glyph() {
        let span = TextSpan::new(vec!['a', 'é', 'b'], None);
        let glyphs = CmapShaper::new().shape(&span, &MockFace).unwrap();

        assert_eq!(glyphs, vec![97, MISSING_GLYPH, 98]);
    }

    #[test]
    fn test_empty_span() {
        let glyphs = CmapShaper::new()
            .shape(&TextSpan::default(), &MockFace)
            .unwrap();
        assert!(glyphs.is_empty());
    }
}
