//! Where fonts come to life: loading, matching and fallback for glyphpath
//!
//! The first stage of the pipeline. A family name, a slant and a weight go in;
//! a loaded face comes out, or a logged "nothing found" and invisible text.
//!
//! ## Memory Management
//!
//! Faces store their raw bytes and create skrifa/read-fonts views on demand.
//! Nothing borrows from a memory map or leaks a `'static` slice, so a face is
//! released as soon as the cache and the last layer drop their `Arc`.

use std::fs;
use std::path::Path;

use kurbo::{Point, Vec2};
use skrifa::{
    instance::{LocationRef, Size},
    outline::{DrawSettings, HintingInstance, HintingOptions, OutlinePen},
    MetadataProvider,
};

use glyphpath_core::{
    error::FontLoadError,
    traits::Face,
    types::{GlyphId, KerningMode},
    PointTag, RawGlyph, RawOutline,
};

pub mod aliases;
pub mod kern;
pub mod loader;
pub mod resolver;
pub mod search;
pub mod system;

pub use kern::KernPairs;
pub use loader::FileFaceLoader;
pub use resolver::{FontResolver, ResolveSource, ResolvedFace};
pub use search::{FontSearchConfig, SearchDir};
pub use system::FontdbMatcher;

/// A font file brought into memory, ready to hand out outlines
pub struct SkrifaFace {
    data: Vec<u8>,
    face_index: u32,
    units_per_em: u16,
    line_height: f64,
    has_kerning: bool,
}

impl SkrifaFace {
    /// Opens a font file from disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FontLoadError> {
        Self::from_file_index(path, 0)
    }

    /// Opens a specific face from a font file (for TTC collections)
    pub fn from_file_index(path: impl AsRef<Path>, face_index: u32) -> Result<Self, FontLoadError> {
        let data = fs::read(path.as_ref())
            .map_err(|_| FontLoadError::FileNotFound(path.as_ref().display().to_string()))?;

        Self::from_data_index(data, face_index)
    }

    pub fn from_data(data: Vec<u8>) -> Result<Self, FontLoadError> {
        Self::from_data_index(data, 0)
    }

    /// Turns raw font bytes into a specific face
    pub fn from_data_index(data: Vec<u8>, face_index: u32) -> Result<Self, FontLoadError> {
        let font = skrifa::FontRef::from_index(&data, face_index)
            .map_err(|_| FontLoadError::InvalidData)?;

        let metrics = font.metrics(Size::unscaled(), LocationRef::default());
        let units_per_em = if metrics.units_per_em == 0 {
            1000
        } else {
            metrics.units_per_em
        };

        // Same definition as the classic face height: ascender to descender plus gap
        let mut line_height = (metrics.ascent - metrics.descent + metrics.leading) as f64;
        if line_height <= 0.0 {
            line_height = units_per_em as f64 * 1.2;
        }

        let has_kerning = KernPairs::from_font(&font).is_some_and(|pairs| !pairs.is_empty());

        Ok(Self {
            data,
            face_index,
            units_per_em,
            line_height,
            has_kerning,
        })
    }

    fn font_ref(&self) -> Option<skrifa::FontRef<'_>> {
        skrifa::FontRef::from_index(&self.data, self.face_index).ok()
    }

    fn draw_outline(
        &self,
        font: &skrifa::FontRef<'_>,
        glyph_id: GlyphId,
        grid_fit: bool,
    ) -> Option<RawOutline> {
        let outlines = font.outline_glyphs();
        let glyph = outlines.get(skrifa::GlyphId::new(glyph_id))?;
        let mut pen = TaggedPointPen::default();
        let unhinted = DrawSettings::unhinted(Size::unscaled(), LocationRef::default());

        let drawn = if grid_fit {
            // Hinting at one pixel per unit keeps coordinates in font units
            match HintingInstance::new(
                &outlines,
                Size::new(self.units_per_em as f32),
                LocationRef::default(),
                HintingOptions::default(),
            ) {
                Ok(instance) => glyph.draw(DrawSettings::hinted(&instance, false), &mut pen),
                Err(err) => {
                    log::debug!("SkrifaFace: hinting unavailable ({err}), drawing unhinted");
                    glyph.draw(unhinted, &mut pen)
                },
            }
        } else {
            glyph.draw(unhinted, &mut pen)
        };

        match drawn {
            Ok(_) => Some(pen.finish()),
            Err(err) => {
                log::warn!("SkrifaFace: glyph {glyph_id} failed to draw: {err}");
                None
            },
        }
    }
}

impl Face for SkrifaFace {
    fn data(&self) -> &[u8] {
        &self.data
    }

    fn face_index(&self) -> u32 {
        self.face_index
    }

    fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    fn line_height(&self) -> f64 {
        self.line_height
    }

    fn glyph_index(&self, ch: char) -> Option<GlyphId> {
        self.font_ref()
            .and_then(|font| font.charmap().map(ch))
            .map(|gid| gid.to_u32())
    }

    fn load_glyph(&self, glyph_id: GlyphId, grid_fit: bool) -> Option<RawGlyph> {
        let font = self.font_ref()?;
        let outline = self.draw_outline(&font, glyph_id, grid_fit)?;
        let advance = font
            .glyph_metrics(Size::unscaled(), LocationRef::default())
            .advance_width(skrifa::GlyphId::new(glyph_id))
            .unwrap_or(0.0);

        Some(RawGlyph {
            outline,
            advance: Vec2::new(advance as f64, 0.0),
        })
    }

    fn has_kerning(&self) -> bool {
        self.has_kerning
    }

    fn kerning(&self, left: GlyphId, right: GlyphId, mode: KerningMode) -> f64 {
        if !self.has_kerning {
            return 0.0;
        }
        let Some(pairs) = self.font_ref().and_then(|font| KernPairs::from_font(&font)) else {
            return 0.0;
        };
        let value = pairs.pair(left, right) as f64;
        match mode {
            KerningMode::Default => value.round(),
            KerningMode::Unfitted => value,
        }
    }
}

/// Records skrifa's drawing calls back into tagged points
///
/// Quadratic segments come back as conic controls, cubic segments as pairs
/// of cubic controls, so the engine's converter sees one representation for
/// both TrueType and CFF faces.
#[derive(Default)]
struct TaggedPointPen {
    outline: RawOutline,
    open: bool,
}

impl TaggedPointPen {
    fn finish(mut self) -> RawOutline {
        if self.open {
            self.outline.end_contour();
        }
        self.outline
    }
}

impl OutlinePen for TaggedPointPen {
    fn move_to(&mut self, x: f32, y: f32) {
        if self.open {
            self.outline.end_contour();
        }
        self.outline.push(point(x, y), PointTag::OnCurve);
        self.open = true;
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.outline.push(point(x, y), PointTag::OnCurve);
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.outline.push(point(cx0, cy0), PointTag::Conic);
        self.outline.push(point(x, y), PointTag::OnCurve);
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.outline.push(point(cx0, cy0), PointTag::Cubic);
        self.outline.push(point(cx1, cy1), PointTag::Cubic);
        self.outline.push(point(x, y), PointTag::OnCurve);
    }

    fn close(&mut self) {
        self.outline.end_contour();
        self.open = false;
    }
}

fn point(x: f32, y: f32) -> Point {
    Point::new(x as f64, y as f64)
}
