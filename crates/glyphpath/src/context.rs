//! The rendering context every text layer borrows its machinery from

use std::sync::Arc;

use glyphpath_core::{
    traits::{BidiReorderer, FaceLoader, FontMatcher, ScriptDetector, Shaper},
    FaceCache,
};
use glyphpath_fontdb::{FileFaceLoader, FontResolver, FontSearchConfig, FontdbMatcher};
use glyphpath_layout::GlyphShaper;
use glyphpath_shape_none::CmapShaper;
use glyphpath_unicode::{IcuScriptDetector, TextSegmenter, UnicodeBidiReorderer};

/// Shared state for a family of text layers
///
/// Owns the face cache, so every layer built on the same context shares
/// loaded faces. Cheap to share behind an `Arc`.
pub struct TextContext {
    resolver: FontResolver,
    shaper: GlyphShaper,
    segmenter: TextSegmenter,
}

impl TextContext {
    pub fn builder() -> TextContextBuilder {
        TextContextBuilder::new()
    }

    pub fn cache(&self) -> &Arc<FaceCache> {
        self.resolver.cache()
    }

    pub fn resolver(&self) -> &FontResolver {
        &self.resolver
    }

    pub fn shaper(&self) -> &GlyphShaper {
        &self.shaper
    }

    pub fn segmenter(&self) -> &TextSegmenter {
        &self.segmenter
    }
}

impl Default for TextContext {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl std::fmt::Debug for TextContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextContext")
            .field("cached_faces", &self.cache().len())
            .field("shaper", &self.shaper)
            .field("bidi", &self.segmenter.has_bidi())
            .field("scripts", &self.segmenter.has_scripts())
            .finish()
    }
}

/// Picks the capabilities a [`TextContext`] runs with
pub struct TextContextBuilder {
    cache: Option<Arc<FaceCache>>,
    loader: Option<Arc<dyn FaceLoader>>,
    matcher: Option<Arc<dyn FontMatcher>>,
    shaper: Option<Arc<dyn Shaper>>,
    bidi: Option<Arc<dyn BidiReorderer>>,
    scripts: Option<Arc<dyn ScriptDetector>>,
    config: FontSearchConfig,
}

impl TextContextBuilder {
    /// Defaults: file loader, character map shaping, bidi and script
    /// detection on, search configuration from the environment
    pub fn new() -> Self {
        Self {
            cache: None,
            loader: None,
            matcher: None,
            shaper: None,
            bidi: Some(Arc::new(UnicodeBidiReorderer::new())),
            scripts: Some(Arc::new(IcuScriptDetector::new())),
            config: FontSearchConfig::from_env(),
        }
    }

    /// Share a cache with another context
    pub fn cache(mut self, cache: Arc<FaceCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn loader(mut self, loader: Arc<dyn FaceLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Overrides the system matcher `search_config` would enable
    pub fn matcher(mut self, matcher: Arc<dyn FontMatcher>) -> Self {
        self.matcher = Some(matcher);
        self
    }

    pub fn shaper(mut self, shaper: Arc<dyn Shaper>) -> Self {
        self.shaper = Some(shaper);
        self
    }

    /// Shape with harfrust
    #[cfg(feature = "shaping-hr")]
    pub fn harfrust(self) -> Self {
        self.shaper(Arc::new(glyphpath_shape_hr::HarfrustShaper::new()))
    }

    /// `None` leaves lines in logical order
    pub fn bidi(mut self, bidi: Option<Arc<dyn BidiReorderer>>) -> Self {
        self.bidi = bidi;
        self
    }

    /// `None` keeps each line in one untagged span
    pub fn scripts(mut self, scripts: Option<Arc<dyn ScriptDetector>>) -> Self {
        self.scripts = scripts;
        self
    }

    pub fn search_config(mut self, config: FontSearchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> TextContext {
        let cache = self.cache.unwrap_or_else(|| Arc::new(FaceCache::new()));
        let loader = self.loader.unwrap_or_else(|| Arc::new(FileFaceLoader::new()));
        let matcher = match self.matcher {
            Some(matcher) => Some(matcher),
            None if self.config.use_system_matcher => {
                let matcher = FontdbMatcher::new();
                log::debug!("TextContext: system font database holds {} faces", matcher.face_count());
                Some(Arc::new(matcher) as Arc<dyn FontMatcher>)
            },
            None => None,
        };

        let mut resolver = FontResolver::new(cache, loader).with_config(self.config);
        if let Some(matcher) = matcher {
            resolver = resolver.with_matcher(matcher);
        }

        let shaper = self.shaper.unwrap_or_else(|| Arc::new(CmapShaper::new()));
        let segmenter = TextSegmenter::plain()
            .with_bidi(self.bidi)
            .with_scripts(self.scripts);

        TextContext {
            resolver,
            shaper: GlyphShaper::new(shaper),
            segmenter,
        }
    }
}

impl Default for TextContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
