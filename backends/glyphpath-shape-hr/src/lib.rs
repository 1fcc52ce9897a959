//! Pure Rust shaping backend using harfrust
//!
//! Harfrust is a pure Rust port of HarfBuzz. Spans arrive already in display
//! order, so the buffer is always shaped left to right; only the script tag
//! travels with it. Positions are discarded: glyphpath places glyphs from
//! their own advances and the face's kerning table.
//!
//! Table lookups for a face are prepared once and reused for every span
//! shaped with it.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use harfrust::{
    Direction as HrDirection, FontRef as HrFontRef, Script, ShaperData, Tag, UnicodeBuffer,
};
use parking_lot::Mutex;

use glyphpath_core::{
    error::{Result, ShapingError},
    traits::{Face, Shaper},
    types::{GlyphId, ScriptTag, TextSpan},
};

/// Faces whose table data is kept before the map starts over
const MAX_CACHED_FACES: usize = 32;

/// Bytes of the font header that go into a face key
const FINGERPRINT_BYTES: usize = 1024;

/// Identifies a face's bytes for as long as they are alive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct FaceKey {
    address: usize,
    len: usize,
    face_index: u32,
    /// Hash of the header and table records, guards against a reused address
    fingerprint: u64,
}

impl FaceKey {
    fn of(data: &[u8], face_index: u32) -> Self {
        let mut hasher = DefaultHasher::new();
        data[..data.len().min(FINGERPRINT_BYTES)].hash(&mut hasher);
        Self {
            address: data.as_ptr() as usize,
            len: data.len(),
            face_index,
            fingerprint: hasher.finish(),
        }
    }
}

/// Text shaping powered by harfrust
#[derive(Default)]
pub struct HarfrustShaper {
    shaper_data: Mutex<HashMap<FaceKey, Arc<ShaperData>>>,
}

impl HarfrustShaper {
    /// Creates a new harfrust shaper ready to handle any script
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of faces with prepared table data
    pub fn cached_faces(&self) -> usize {
        self.shaper_data.lock().len()
    }

    fn shaper_data(&self, font: &HrFontRef<'_>, key: FaceKey) -> Arc<ShaperData> {
        let mut cached = self.shaper_data.lock();
        if let Some(data) = cached.get(&key) {
            return data.clone();
        }
        if cached.len() >= MAX_CACHED_FACES {
            log::debug!("HarfrustShaper: dropping table data for {} faces", cached.len());
            cached.clear();
        }
        let data = Arc::new(ShaperData::new(font));
        cached.insert(key, data.clone());
        data
    }

    fn hr_script(tag: ScriptTag) -> Option<Script> {
        if matches!(tag, ScriptTag::COMMON | ScriptTag::INHERITED | ScriptTag::UNKNOWN) {
            return None;
        }
        Script::from_iso15924_tag(Tag::new(&tag.to_bytes()))
    }
}

impl std::fmt::Debug for HarfrustShaper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HarfrustShaper")
            .field("cached_faces", &self.cached_faces())
            .finish()
    }
}

impl Shaper for HarfrustShaper {
    fn name(&self) -> &'static str {
        "harfrust"
    }

    fn shape(&self, span: &TextSpan, face: &dyn Face) -> Result<Vec<GlyphId>> {
        if span.codepoints.is_empty() {
            return Ok(Vec::new());
        }

        let font_data = face.data();
        if font_data.is_empty() {
            return Err(ShapingError::BackendError("face exposes no font data".to_string()).into());
        }

        let hr_font = HrFontRef::from_index(font_data, face.face_index())
            .map_err(|err| ShapingError::BackendError(format!("harfrust rejected the face: {err}")))?;

        let shaper_data = self.shaper_data(&hr_font, FaceKey::of(font_data, face.face_index()));
        let shaper = shaper_data.shaper(&hr_font).build();

        let mut buffer = UnicodeBuffer::new();
        buffer.push_str(&span.text());
        buffer.set_direction(HrDirection::LeftToRight);
        if let Some(script) = span.script.and_then(Self::hr_script) {
            buffer.set_script(script);
        }

        let output = shaper.shape(buffer, &[]);
        let glyphs: Vec<GlyphId> = output.glyph_infos().iter().map(|info| info.glyph_id).collect();

        log::debug!(
            "HarfrustShaper: {} codepoints ({}) -> {} glyphs",
            span.codepoints.len(),
            span.script.map_or_else(|| "no script".to_string(), |s| s.to_string()),
            glyphs.len()
        );
        Ok(glyphs)
    }
}
