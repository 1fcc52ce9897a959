//! Line layout: pen positions, kerning, line widths and block height

use kurbo::{Point, Vec2};

use glyphpath_core::{
    outline::ContourCommand,
    traits::Face,
    types::{GlyphId, KerningMode, MISSING_GLYPH},
};

use crate::outline::OutlineCache;

/// Spacing knobs applied while placing glyphs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    /// Horizontal spacing multiplier, applied to advances and kerning
    pub compress: f64,
    /// Vertical spacing multiplier, applied to the face line height
    pub vcompress: f64,
    pub use_kerning: bool,
    /// Selects the kerning mode the face is asked for
    pub grid_fit: bool,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            compress: 1.0,
            vcompress: 1.0,
            use_kerning: true,
            grid_fit: false,
        }
    }
}

/// One line of placed glyph contours, in font units
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlacedLine {
    pub contours: Vec<ContourCommand>,
    /// Final pen x-offset after the last glyph
    pub width: f64,
    /// Pen y-offset the line was laid out on
    pub baseline: f64,
}

/// Every line of a text, before anchoring
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextBlock {
    pub lines: Vec<PlacedLine>,
    /// Tallest `yMax` among glyphs placed on the first line
    pub ascent: f64,
    pub height: f64,
    /// Distance between consecutive baselines
    pub line_step: f64,
}

impl TextBlock {
    /// No line placed a single contour command
    pub fn is_blank(&self) -> bool {
        self.lines.iter().all(|line| line.contours.is_empty())
    }

    pub fn max_width(&self) -> f64 {
        self.lines.iter().map(|line| line.width).fold(0.0, f64::max)
    }
}

/// Places shaped glyph runs line by line
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutEngine {
    params: LayoutParams,
}

impl LayoutEngine {
    pub fn new(params: LayoutParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &LayoutParams {
        &self.params
    }

    /// Lay out `lines` with glyphs taken from `outlines`
    ///
    /// A glyph missing from `outlines` places nothing and does not advance
    /// the pen. It also resets the kerning reference, so the glyph after it
    /// is not kerned.
    pub fn layout(&self, face: &dyn Face, lines: &[Vec<GlyphId>], outlines: &OutlineCache) -> TextBlock {
        let params = &self.params;
        let kern = params.use_kerning && face.has_kerning();
        let mode = KerningMode::for_grid_fit(params.grid_fit);
        let line_step = face.line_height() * params.vcompress;

        let mut block = TextBlock {
            line_step,
            ..TextBlock::default()
        };
        let mut ascent: Option<f64> = None;
        let mut y = 0.0;

        for (line_index, run) in lines.iter().enumerate() {
            let mut pen = Point::new(0.0, y);
            let mut previous = MISSING_GLYPH;
            let mut line = PlacedLine {
                baseline: y,
                ..PlacedLine::default()
            };

            for &glyph_id in run {
                let Some(glyph) = outlines.get(glyph_id) else {
                    log::debug!("LayoutEngine: glyph {glyph_id} has no outline, skipped");
                    previous = MISSING_GLYPH;
                    continue;
                };

                if kern && previous != MISSING_GLYPH && glyph_id != MISSING_GLYPH {
                    pen.x += face.kerning(previous, glyph_id, mode) * params.compress;
                }

                let offset = pen.to_vec2();
                line.contours
                    .extend(glyph.outline.iter().map(|command| command.translated(offset)));

                if line_index == 0 {
                    let top = glyph.bounds.y1;
                    ascent = Some(ascent.map_or(top, |current| current.max(top)));
                }

                pen += Vec2::new(glyph.advance.x * params.compress, glyph.advance.y);
                previous = glyph_id;
            }

            line.width = pen.x;
            block.lines.push(line);
            y -= line_step;
        }

        block.ascent = ascent.unwrap_or(0.0);
        block.height = block.ascent + lines.len().saturating_sub(1) as f64 * line_step;
        block
    }
}
