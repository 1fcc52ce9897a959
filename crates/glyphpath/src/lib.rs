//! Glyphpath - text to vector outlines
//!
//! A [`TextLayer`] holds the parameters of one piece of text: the string,
//! a font request, spacing, anchoring and placement. Each [`TextLayer::sync`]
//! runs whatever part of the pipeline the pending edits require and hands
//! back a [`TextGeometry`]: move/line/conic/cubic commands plus the affine
//! mapping into layer space.
//!
//! Layers borrow their machinery from a [`TextContext`], which owns the face
//! cache. Layers built on one context share every loaded face.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use glyphpath::{TextContext, TextLayer};
//!
//! let context = Arc::new(TextContext::builder().build());
//! let layer = TextLayer::new(context);
//! layer.set_param("text", "Hello")?;
//! layer.set_param("family", "DejaVu Sans")?;
//!
//! let geometry = layer.sync();
//! println!("{} commands inside {:?}", geometry.contours().len(), geometry.bounds());
//! # Ok::<(), glyphpath::error::GlyphpathError>(())
//! ```
//!
//! # Feature Flags
//!
//! - `shaping-hr`: shape through harfrust instead of the 1:1 character map

pub mod context;
pub mod geometry;
pub mod layer;
pub mod params;

pub use context::{TextContext, TextContextBuilder};
pub use geometry::TextGeometry;
pub use layer::TextLayer;
pub use params::{LayerParams, ParamValue, FILENAME_SENTINEL};

pub use glyphpath_core::{error, types, SyncFlags};
pub use glyphpath_fontdb as fontdb;
pub use glyphpath_layout as layout;
pub use glyphpath_unicode as unicode;

#[cfg(feature = "shaping-hr")]
pub use glyphpath_shape_hr as shape_hr;

pub use glyphpath_shape_none as shape_none;

/// Common imports for typical usage
pub mod prelude {
    pub use glyphpath_core::{
        error::{GlyphpathError, Result},
        traits::{Face, FaceLoader, FontMatcher, Shaper},
        types::{TextDirection, TextStyle, TextWeight},
        ContourCommand, SyncFlags,
    };

    pub use crate::{LayerParams, ParamValue, TextContext, TextGeometry, TextLayer};
}
