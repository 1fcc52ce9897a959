//! The contracts that bind every backend together
//!
//! The engine is written once against these traits. Which font library,
//! shaper, bidi implementation or platform matcher sits behind them is
//! decided when the rendering context is built.
//!
//! ## The Players
//!
//! - [`Face`] - Glyph outlines, metrics and kerning for one font file
//! - [`FaceLoader`] - Opens a face from a resolved path
//! - [`FontMatcher`] - Native family matching (fontconfig-style services)
//! - [`Shaper`] - Turns a span of codepoints into glyph indices
//! - [`BidiReorderer`] - Puts a logical line into display order
//! - [`ScriptDetector`] - Classifies codepoints by script

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::{
    error::{FontLoadError, Result},
    outline::RawGlyph,
    types::{GlyphId, KerningMode, ScriptTag, TextDirection, TextSpan, TextStyle, TextWeight},
};

/// A face shared between the cache and every layer using it
pub type LoadedFace = Arc<dyn Face>;

/// Your key to a loaded font file
///
/// All measurements are in font units: the engine never asks a face to
/// scale anything.
///
/// ```ignore
/// struct MyFace;
///
/// impl Face for MyFace {
///     fn data(&self) -> &[u8] { &[] }
///     fn units_per_em(&self) -> u16 { 1000 }
///     fn line_height(&self) -> f64 { 1200.0 }
///     fn glyph_index(&self, ch: char) -> Option<GlyphId> { Some(ch as u32) }
///     fn load_glyph(&self, _: GlyphId, _: bool) -> Option<RawGlyph> { None }
/// }
/// ```
pub trait Face: Send + Sync {
    /// Raw font bytes as they live in the file
    fn data(&self) -> &[u8];

    /// Face index inside a collection file
    fn face_index(&self) -> u32 {
        0
    }

    /// The font's internal coordinate system scale
    fn units_per_em(&self) -> u16;

    /// Baseline-to-baseline distance in font units
    fn line_height(&self) -> f64;

    /// Character map lookup; `None` when the face lacks the character
    fn glyph_index(&self, ch: char) -> Option<GlyphId>;

    /// Unscaled outline and advance for one glyph
    ///
    /// `grid_fit` asks for hinted points where the face supports hinting.
    /// Returns `None` when the glyph cannot be loaded at all.
    fn load_glyph(&self, glyph_id: GlyphId, grid_fit: bool) -> Option<RawGlyph>;

    /// Does the face carry a kerning table?
    fn has_kerning(&self) -> bool {
        false
    }

    /// Horizontal kerning adjustment between two glyphs, in font units
    fn kerning(&self, _left: GlyphId, _right: GlyphId, _mode: KerningMode) -> f64 {
        0.0
    }
}

/// Opens faces from disk (or wherever paths point)
pub trait FaceLoader: Send + Sync {
    /// Load the face stored at `path`
    ///
    /// Failing here is routine: the resolver probes many candidate paths
    /// and expects most of them not to exist.
    fn load(&self, path: &Path) -> std::result::Result<LoadedFace, FontLoadError>;

    /// Load face `face_index` of a collection file
    ///
    /// Loaders that only know single-face files refuse any index but 0.
    fn load_index(&self, path: &Path, face_index: u32) -> std::result::Result<LoadedFace, FontLoadError> {
        if face_index == 0 {
            self.load(path)
        } else {
            Err(FontLoadError::NotSupported(format!(
                "{}: face {face_index} of a collection",
                path.display()
            )))
        }
    }
}

/// A face found by a [`FontMatcher`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontMatch {
    pub path: PathBuf,
    /// Face within a collection file, 0 otherwise
    pub face_index: u32,
}

impl FontMatch {
    pub fn new(path: impl Into<PathBuf>, face_index: u32) -> Self {
        Self {
            path: path.into(),
            face_index,
        }
    }
}

/// Platform font matching service
pub trait FontMatcher: Send + Sync {
    fn name(&self) -> &'static str;

    /// File and face that best serve the family at this slant and weight
    fn match_font(&self, family: &str, style: TextStyle, weight: TextWeight) -> Option<FontMatch>;
}

/// Where codepoints become glyph indices
pub trait Shaper: Send + Sync {
    /// Identify yourself in logs
    fn name(&self) -> &'static str;

    /// Map one span to glyph indices
    ///
    /// Spans arrive in display order, so shapers always run left to right.
    /// The result may hold more or fewer glyphs than the span has codepoints.
    fn shape(&self, span: &TextSpan, face: &dyn Face) -> Result<Vec<GlyphId>>;
}

/// Logical order in, display order out
pub trait BidiReorderer: Send + Sync {
    fn name(&self) -> &'static str;

    /// Reorder one line for display
    ///
    /// `Auto` resolves the base level from the line content, `Ltr`/`Rtl`
    /// force it.
    fn reorder(&self, line: &[char], direction: TextDirection) -> Result<Vec<char>>;
}

/// Which writing system a codepoint belongs to
pub trait ScriptDetector: Send + Sync {
    /// Script of `ch`; combining marks report [`ScriptTag::INHERITED`]
    fn script(&self, ch: char) -> ScriptTag;
}
