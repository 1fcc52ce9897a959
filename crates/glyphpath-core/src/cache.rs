//! Loaded faces, kept once and shared
//!
//! Parsing a font file is the only slow thing the engine does, so every face
//! that resolves is remembered here under the identity that asked for it.
//! The cache is an ordinary value: whoever builds the rendering context owns
//! it and hands out `Arc` references.
//!
//! One coarse mutex guards the map. Lookups are rare next to per-pixel
//! rendering work, and no lock is held while a face loads from disk: callers
//! load outside the lock and `put` the result afterwards. Two threads racing
//! on a first use may both load the same face; the last `put` wins and the
//! other copy is dropped with its last reference.

use std::collections::BTreeMap;

use parking_lot::Mutex;

use crate::{traits::LoadedFace, types::FontIdentity};

/// Thread-safe map from font identity to loaded face
#[derive(Default)]
pub struct FaceCache {
    faces: Mutex<BTreeMap<FontIdentity, LoadedFace>>,
}

impl FaceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached face for `key`, never touching the disk
    pub fn get(&self, key: &FontIdentity) -> Option<LoadedFace> {
        self.faces.lock().get(key).cloned()
    }

    /// Insert or overwrite
    pub fn put(&self, key: FontIdentity, face: LoadedFace) {
        self.faces.lock().insert(key, face);
    }

    pub fn has(&self, key: &FontIdentity) -> bool {
        self.faces.lock().contains_key(key)
    }

    /// Release every cached face
    ///
    /// Safe to call repeatedly. Faces still referenced by a layer stay alive
    /// until that layer drops them; the cache just stops handing them out.
    pub fn clear(&self) {
        let released = std::mem::take(&mut *self.faces.lock());
        log::debug!("FaceCache: released {} faces", released.len());
    }

    pub fn len(&self) -> usize {
        self.faces.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.lock().is_empty()
    }

    /// Snapshot of the cached identities, in key order
    pub fn keys(&self) -> Vec<FontIdentity> {
        self.faces.lock().keys().cloned().collect()
    }
}

impl std::fmt::Debug for FaceCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaceCache")
            .field("faces", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        outline::RawGlyph,
        traits::Face,
        types::{GlyphId, TextStyle, TextWeight},
    };

    struct StubFace;

    impl Face for StubFace {
        fn data(&self) -> &[u8] {
            &[]
        }

        fn units_per_em(&self) -> u16 {
            1000
        }

        fn line_height(&self) -> f64 {
            1200.0
        }

        fn glyph_index(&self, _ch: char) -> Option<GlyphId> {
            None
        }

        fn load_glyph(&self, _glyph_id: GlyphId, _grid_fit: bool) -> Option<RawGlyph> {
            None
        }
    }

    fn key(family: &str) -> FontIdentity {
        FontIdentity::new(family, TextStyle::Normal, TextWeight::NORMAL)
    }

    #[test]
    fn test_get_returns_same_face() {
        let cache = FaceCache::new();
        let face: LoadedFace = Arc::new(StubFace);
        cache.put(key("a"), face.clone());

        let cached = cache.get(&key("a")).expect("cached face");
        assert!(Arc::ptr_eq(&cached, &face));
        assert!(cache.has(&key("a")));
        assert!(cache.get(&key("b")).is_none());
    }

    #[test]
    fn test_put_overwrites_existing_key() {
        let cache = FaceCache::new();
        let first: LoadedFace = Arc::new(StubFace);
        let second: LoadedFace = Arc::new(StubFace);
        cache.put(key("a"), first);
        cache.put(key("a"), second.clone());

        assert_eq!(cache.len(), 1);
        let cached = cache.get(&key("a")).expect("cached face");
        assert!(Arc::ptr_eq(&cached, &second));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let cache = FaceCache::new();
        let face: LoadedFace = Arc::new(StubFace);
        cache.put(key("a"), face.clone());
        cache.clear();
        cache.clear();

        assert!(cache.is_empty());
        // Outstanding references survive the clear
        assert_eq!(Arc::strong_count(&face), 1);
    }

    #[test]
    fn test_scope_distinguishes_entries() {
        let cache = FaceCache::new();
        cache.put(key("a"), Arc::new(StubFace));
        cache.put(
            key("a").with_scope(Some("/doc/".to_string())),
            Arc::new(StubFace),
        );
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.keys()[0], key("a"));
    }
}
