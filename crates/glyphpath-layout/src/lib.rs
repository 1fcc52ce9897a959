//! Glyphpath Layout: from segmented lines to anchored contours
//!
//! Four steps run back to back for every sync pass of a text layer:
//!
//! 1. [`GlyphShaper`] turns each line's spans into one flat glyph run
//! 2. [`OutlineCache`] converts every distinct glyph once via [`OutlineConverter`]
//! 3. [`LayoutEngine`] walks the pen across each line, applying kerning and spacing
//! 4. [`ContourComposer`] anchors the block on its orientation point
//!
//! All coordinates stay in font units; scaling to world space belongs to the
//! caller.
//!
//! ```rust
//! use std::sync::Arc;
//! use glyphpath_core::types::{TextLine, TextSpan};
//! use glyphpath_layout::{compose_text, GlyphShaper, LayoutParams};
//! use glyphpath_shape_none::CmapShaper;
//! # use glyphpath_core::{Face, RawGlyph, types::GlyphId};
//! # struct Blank;
//! # impl Face for Blank {
//! #     fn data(&self) -> &[u8] { &[] }
//! #     fn units_per_em(&self) -> u16 { 1000 }
//! #     fn line_height(&self) -> f64 { 1200.0 }
//! #     fn glyph_index(&self, _: char) -> Option<GlyphId> { None }
//! #     fn load_glyph(&self, _: GlyphId, _: bool) -> Option<RawGlyph> { None }
//! # }
//!
//! let lines = vec![TextLine::new(vec![TextSpan::new(vec!['H', 'i'], None)])];
//! let shaper = GlyphShaper::new(Arc::new(CmapShaper::new()));
//! let composed = compose_text(&Blank, &lines, &shaper, LayoutParams::default(), (0.5, 0.5).into());
//! assert!(composed.contours.is_empty());
//! ```

pub mod compose;
pub mod layout;
pub mod outline;
pub mod shaping;

pub use compose::ContourComposer;
pub use layout::{LayoutEngine, LayoutParams, PlacedLine, TextBlock};
pub use outline::{convert_outline, ConvertedOutline, OutlineCache, OutlineConverter, OutlineDefect};
pub use shaping::GlyphShaper;

use glyphpath_core::{outline::ContourCommand, traits::Face, types::TextLine};
use kurbo::Vec2;

/// Result of one full pass over a text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComposedText {
    /// Anchored commands, top line first
    pub contours: Vec<ContourCommand>,
    pub block: TextBlock,
}

/// Shape, convert, lay out and anchor `lines` in one go
pub fn compose_text(
    face: &dyn Face,
    lines: &[TextLine],
    shaper: &GlyphShaper,
    params: LayoutParams,
    orient: Vec2,
) -> ComposedText {
    let runs = shaper.shape_lines(lines, face);
    let outlines = OutlineCache::build(face, &runs, params.grid_fit);
    let block = LayoutEngine::new(params).layout(face, &runs, &outlines);
    let contours = ContourComposer::new(orient).compose(&block);

    log::debug!(
        "compose_text: {} lines, {} glyphs cached, {} commands",
        block.lines.len(),
        outlines.len(),
        contours.len()
    );

    ComposedText { contours, block }
}
