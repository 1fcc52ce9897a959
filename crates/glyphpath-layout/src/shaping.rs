//! Shaping driver: spans in, one flat glyph run per line out

use std::sync::Arc;

use glyphpath_core::{
    error::Result,
    traits::{Face, Shaper},
    types::{GlyphId, TextLine},
};

/// Runs a [`Shaper`] over every span of every line
#[derive(Clone)]
pub struct GlyphShaper {
    shaper: Arc<dyn Shaper>,
}

impl GlyphShaper {
    pub fn new(shaper: Arc<dyn Shaper>) -> Self {
        Self { shaper }
    }

    /// Name of the backend doing the work
    pub fn name(&self) -> &'static str {
        self.shaper.name()
    }

    /// Shape all lines, stopping at the first backend failure
    ///
    /// Glyphs from the spans of a line are concatenated in span order. An
    /// empty line yields an empty run so line indices stay aligned.
    pub fn try_shape_lines(&self, lines: &[TextLine], face: &dyn Face) -> Result<Vec<Vec<GlyphId>>> {
        lines
            .iter()
            .map(|line| -> Result<Vec<GlyphId>> {
                let mut glyphs = Vec::with_capacity(line.codepoints().count());
                for span in line.spans.iter().filter(|span| !span.codepoints.is_empty()) {
                    glyphs.extend(self.shaper.shape(span, face)?);
                }
                Ok(glyphs)
            })
            .collect()
    }

    /// Like [`try_shape_lines`](Self::try_shape_lines), but a failure logs and
    /// yields no lines
    pub fn shape_lines(&self, lines: &[TextLine], face: &dyn Face) -> Vec<Vec<GlyphId>> {
        match self.try_shape_lines(lines, face) {
            Ok(runs) => runs,
            Err(err) => {
                log::error!("GlyphShaper: {} failed, text dropped: {err}", self.shaper.name());
                Vec::new()
            },
        }
    }
}

impl std::fmt::Debug for GlyphShaper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlyphShaper")
            .field("shaper", &self.shaper.name())
            .finish()
    }
}
