//! Glyphpath Core: the shared vocabulary of the text-to-outline engine
//!
//! Text enters as a string plus a handful of style parameters and leaves as
//! a list of vector contours. Every crate in the workspace speaks through the
//! types and traits defined here.
//!
//! ## The Pipeline
//!
//! 1. **Font Resolution** - A family/style/weight request becomes a loaded face
//! 2. **Segmentation** - Text splits into lines, reorders for display, splits into script spans
//! 3. **Shaping** - Spans become glyph indices
//! 4. **Outline Conversion** - Glyph point lists become move/line/conic/cubic commands
//! 5. **Layout** - Kerning and spacing place each glyph on its line
//! 6. **Composition** - Lines shift into place around the orientation anchor
//!
//! ## The Traits That Power Everything
//!
//! Backends plug in through capability traits:
//!
//! - [`Face`] - Your window into glyph outlines, metrics and kerning
//! - [`FaceLoader`] - Turns a resolved file path into a face
//! - [`FontMatcher`] - Asks the platform which file serves a family
//! - [`Shaper`] - Where codepoints become glyph indices
//! - [`BidiReorderer`] - Logical order in, display order out
//! - [`ScriptDetector`] - Which writing system a codepoint belongs to
//!
//! The [`FaceCache`] keeps loaded faces alive and shared between every text
//! layer that asks for the same identity.

pub mod cache;
pub mod error;
pub mod outline;
pub mod sync;
pub mod traits;

pub use cache::FaceCache;
pub use error::{FontLoadError, GlyphpathError, ParamError, Result, SegmentError, ShapingError};
pub use outline::{ContourCommand, Glyph, PointTag, RawGlyph, RawOutline};
pub use sync::SyncFlags;
pub use traits::{
    BidiReorderer, Face, FaceLoader, FontMatch, FontMatcher, LoadedFace, ScriptDetector, Shaper,
};

/// The data structures that flow between stages
pub mod types {
    use std::fmt;

    /// Unique identifier for a glyph within a face
    pub type GlyphId = u32;

    /// The `.notdef` slot every face reserves for unmapped characters
    pub const MISSING_GLYPH: GlyphId = 0;

    /// Slant of the requested face
    ///
    /// The discriminants are persisted in documents as plain integers, so
    /// they must never change.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
    pub enum TextStyle {
        #[default]
        Normal = 0,
        Oblique = 1,
        Italic = 2,
    }

    impl TextStyle {
        /// Decode the integer stored in a document
        pub fn from_persisted(value: i32) -> Option<Self> {
            match value {
                0 => Some(Self::Normal),
                1 => Some(Self::Oblique),
                2 => Some(Self::Italic),
                _ => None,
            }
        }

        pub fn as_persisted(self) -> i32 {
            self as i32
        }

        /// Italic and oblique share file naming conventions
        pub fn is_slanted(self) -> bool {
            !matches!(self, Self::Normal)
        }
    }

    /// Stroke weight of the requested face, as a persisted integer
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct TextWeight(pub i32);

    impl TextWeight {
        pub const THIN: Self = Self(100);
        pub const ULTRALIGHT: Self = Self(200);
        pub const LIGHT: Self = Self(300);
        pub const SEMILIGHT: Self = Self(350);
        pub const BOOK: Self = Self(380);
        pub const NORMAL: Self = Self(400);
        pub const MEDIUM: Self = Self(500);
        pub const SEMIBOLD: Self = Self(600);
        pub const BOLD: Self = Self(700);
        pub const ULTRABOLD: Self = Self(800);
        pub const HEAVY: Self = Self(900);
        pub const ULTRAHEAVY: Self = Self(1000);

        /// Anything heavier than normal picks the bold file variants
        pub fn is_bold(self) -> bool {
            self.0 > Self::NORMAL.0
        }
    }

    impl Default for TextWeight {
        fn default() -> Self {
            Self::NORMAL
        }
    }

    /// Base paragraph direction requested for a text layer
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub enum TextDirection {
        /// Resolve per paragraph from the first strong character
        #[default]
        Auto = 0,
        Ltr = 1,
        Rtl = 2,
    }

    impl TextDirection {
        pub fn from_persisted(value: i32) -> Option<Self> {
            match value {
                0 => Some(Self::Auto),
                1 => Some(Self::Ltr),
                2 => Some(Self::Rtl),
                _ => None,
            }
        }

        pub fn as_persisted(self) -> i32 {
            self as i32
        }
    }

    /// Everything that distinguishes one cached face from another
    ///
    /// Ordering is lexicographic over `(family, style, weight, document_scope)`
    /// which is exactly the field order below.
    #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct FontIdentity {
        pub family: String,
        pub style: TextStyle,
        pub weight: TextWeight,
        /// Set when the face file was found next to a specific document
        pub document_scope: Option<String>,
    }

    impl FontIdentity {
        pub fn new(family: impl Into<String>, style: TextStyle, weight: TextWeight) -> Self {
            Self {
                family: family.into(),
                style,
                weight,
                document_scope: None,
            }
        }

        pub fn with_scope(mut self, scope: Option<String>) -> Self {
            self.document_scope = scope;
            self
        }

        /// The same identity, shared across every document
        pub fn unscoped(&self) -> Self {
            Self {
                document_scope: None,
                ..self.clone()
            }
        }
    }

    /// ISO 15924 script code, e.g. `Latn` or `Arab`
    #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct ScriptTag([u8; 4]);

    impl ScriptTag {
        pub const COMMON: Self = Self(*b"Zyyy");
        pub const INHERITED: Self = Self(*b"Zinh");
        pub const UNKNOWN: Self = Self(*b"Zzzz");

        pub const fn new(tag: &[u8; 4]) -> Self {
            Self(*tag)
        }

        pub fn to_bytes(self) -> [u8; 4] {
            self.0
        }

        pub fn as_str(&self) -> &str {
            std::str::from_utf8(&self.0).unwrap_or("Zzzz")
        }
    }

    impl fmt::Display for ScriptTag {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.as_str())
        }
    }

    impl fmt::Debug for ScriptTag {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "ScriptTag({})", self.as_str())
        }
    }

    /// A maximal run of codepoints that share one script
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct TextSpan {
        pub codepoints: Vec<char>,
        pub script: Option<ScriptTag>,
    }

    impl TextSpan {
        pub fn new(codepoints: Vec<char>, script: Option<ScriptTag>) -> Self {
            Self { codepoints, script }
        }

        pub fn text(&self) -> String {
            self.codepoints.iter().collect()
        }
    }

    /// One visual line: spans in display order
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct TextLine {
        pub spans: Vec<TextSpan>,
    }

    impl TextLine {
        pub fn new(spans: Vec<TextSpan>) -> Self {
            Self { spans }
        }

        pub fn codepoints(&self) -> impl Iterator<Item = char> + '_ {
            self.spans.iter().flat_map(|span| span.codepoints.iter().copied())
        }

        pub fn text(&self) -> String {
            self.codepoints().collect()
        }

        pub fn is_empty(&self) -> bool {
            self.spans.iter().all(|span| span.codepoints.is_empty())
        }
    }

    /// How the face should answer kerning queries
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum KerningMode {
        /// Grid-fitted: values rounded to whole units
        Default,
        /// Raw table values
        Unfitted,
    }

    impl KerningMode {
        pub fn for_grid_fit(grid_fit: bool) -> Self {
            if grid_fit {
                Self::Default
            } else {
                Self::Unfitted
            }
        }
    }
}
