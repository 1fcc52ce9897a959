//! A text layer: parameters in, geometry out
//!
//! Setters only record what changed. [`TextLayer::sync`] takes the pending
//! flags in one go and redoes the least work they allow: a moved origin
//! rebuilds only the transform, a spacing change skips font resolution and
//! segmentation, and an unchanged font request never reaches the resolver.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use glyphpath_core::{
    error::Result,
    outline::ContourCommand,
    types::{FontIdentity, TextLine},
    SyncFlags,
};
use glyphpath_fontdb::{resolver::FontRequest, search::has_font_extension, ResolvedFace};
use glyphpath_layout::{compose_text, TextBlock};

use crate::{
    context::TextContext,
    geometry::TextGeometry,
    params::{LayerParams, ParamValue, FILENAME_SENTINEL},
};

/// Units per em assumed while no face is loaded
const FALLBACK_UNITS_PER_EM: u16 = 1000;

/// What the last resolution was asked for
#[derive(Debug, Clone, PartialEq, Eq)]
struct FaceRequestKey {
    identity: FontIdentity,
    document_dir: Option<PathBuf>,
    font: String,
}

struct LayerState {
    params: LayerParams,
    pending: SyncFlags,
    /// Path of the owning document file
    document: Option<PathBuf>,
    face: Option<ResolvedFace>,
    requested: Option<FaceRequestKey>,
    lines: Vec<TextLine>,
    block: TextBlock,
    contours: Arc<[ContourCommand]>,
    geometry: Option<TextGeometry>,
}

impl LayerState {
    fn document_dir(&self) -> Option<PathBuf> {
        self.document.as_deref().and_then(Path::parent).map(Path::to_path_buf)
    }

    fn document_stem(&self) -> Option<String> {
        self.document
            .as_deref()
            .and_then(Path::file_stem)
            .map(|stem| stem.to_string_lossy().into_owned())
    }

    fn request_key(&self) -> FaceRequestKey {
        FaceRequestKey {
            identity: self.params.identity(),
            document_dir: self.document_dir(),
            font: self.params.font.clone(),
        }
    }

    /// The family names a font file relative to the document
    fn family_is_relative_file(&self) -> bool {
        has_font_extension(&self.params.family) && Path::new(&self.params.family).is_relative()
    }
}

/// One piece of text rendered as outlines
///
/// Safe to share between threads; parameter edits and sync passes are
/// serialized by an internal lock.
pub struct TextLayer {
    context: Arc<TextContext>,
    state: Mutex<LayerState>,
}

impl TextLayer {
    /// A layer with default parameters; the first sync does everything
    pub fn new(context: Arc<TextContext>) -> Self {
        Self::with_params(context, LayerParams::default())
    }

    pub fn with_params(context: Arc<TextContext>, params: LayerParams) -> Self {
        Self {
            context,
            state: Mutex::new(LayerState {
                params,
                pending: SyncFlags::all(),
                document: None,
                face: None,
                requested: None,
                lines: Vec::new(),
                block: TextBlock::default(),
                contours: Arc::from(Vec::new()),
                geometry: None,
            }),
        }
    }

    pub fn context(&self) -> &Arc<TextContext> {
        &self.context
    }

    /// Set one parameter by its persisted name
    ///
    /// Returns the flags this edit dirtied; they are also queued for the
    /// next [`sync`](Self::sync).
    pub fn set_param(&self, name: &str, value: impl Into<ParamValue>) -> Result<SyncFlags> {
        let mut state = self.state.lock();
        let flags = state.params.set(name, value.into())?;
        state.pending |= flags;
        Ok(flags)
    }

    pub fn get_param(&self, name: &str) -> Result<ParamValue> {
        Ok(self.state.lock().params.get(name)?)
    }

    pub fn params(&self) -> LayerParams {
        self.state.lock().params.clone()
    }

    /// Flags queued since the last sync
    pub fn pending(&self) -> SyncFlags {
        self.state.lock().pending
    }

    /// Attach the layer to the document file at `path`
    ///
    /// A family given as a relative font file is looked up again next to
    /// the new document, and text using the file name sentinel is rebuilt.
    pub fn set_document(&self, path: Option<&Path>) -> SyncFlags {
        let mut state = self.state.lock();
        if state.document.as_deref() == path {
            return SyncFlags::empty();
        }
        state.document = path.map(Path::to_path_buf);

        let mut flags = SyncFlags::empty();
        if state.family_is_relative_file() {
            state.params.font.clear();
            flags |= SyncFlags::FONT;
        }
        if state.params.text == FILENAME_SENTINEL {
            flags |= SyncFlags::TEXT;
        }
        state.pending |= flags;
        flags
    }

    pub fn document(&self) -> Option<PathBuf> {
        self.state.lock().document.clone()
    }

    /// The face in use, if resolution succeeded
    pub fn face(&self) -> Option<ResolvedFace> {
        self.state.lock().face.clone()
    }

    /// Lines produced by the last segmentation
    pub fn lines(&self) -> Vec<TextLine> {
        self.state.lock().lines.clone()
    }

    /// Unanchored layout from the last pass
    pub fn block(&self) -> TextBlock {
        self.state.lock().block.clone()
    }

    /// Bring the geometry up to date with every pending edit
    ///
    /// Never fails: a missing font or a shaping error yields empty geometry
    /// at the layer origin, and the cause is logged.
    pub fn sync(&self) -> TextGeometry {
        let mut guard = self.state.lock();
        let flags = std::mem::take(&mut guard.pending);
        if flags.is_empty() {
            if let Some(geometry) = &guard.geometry {
                return geometry.clone();
            }
        }
        log::debug!("TextLayer: sync {flags:?}");

        let state = &mut *guard;
        let mut relayout = flags.needs_layout() || state.geometry.is_none();

        if flags.needs_face() {
            relayout |= self.resolve_face(state);
        }

        if flags.needs_segmentation() {
            let text = state.params.expanded_text(state.document_stem().as_deref());
            state.lines = self.context.segmenter().segment(&text, state.params.direction);
        }

        if relayout {
            match &state.face {
                Some(resolved) => {
                    let composed = compose_text(
                        resolved.face.as_ref(),
                        &state.lines,
                        self.context.shaper(),
                        state.params.layout(),
                        state.params.orient,
                    );
                    state.contours = Arc::from(composed.contours);
                    state.block = composed.block;
                },
                None => {
                    state.contours = Arc::from(Vec::new());
                    state.block = TextBlock::default();
                },
            }
        }

        let units_per_em = state
            .face
            .as_ref()
            .map_or(FALLBACK_UNITS_PER_EM, |resolved| resolved.face.units_per_em());
        let geometry = TextGeometry::new(
            state.contours.clone(),
            state.params.origin,
            state.params.size,
            units_per_em,
        );
        state.geometry = Some(geometry.clone());
        geometry
    }

    /// Resolve the face unless the request is the one already served;
    /// returns whether the face changed
    fn resolve_face(&self, state: &mut LayerState) -> bool {
        let key = state.request_key();
        if state.requested.as_ref() == Some(&key) {
            log::debug!("TextLayer: font request unchanged, keeping {:?}", key.identity);
            return false;
        }

        let document_dir = state.document_dir();
        let params = &state.params;
        let request = FontRequest::new(&params.family, params.style, params.weight)
            .in_document(document_dir.as_deref())
            .with_font_file(Some(params.font.as_str()));
        let resolved = self.context.resolver().resolve(&request).ok();

        if let Some(path) = resolved.as_ref().and_then(ResolvedFace::path) {
            state.params.font = path.to_string_lossy().into_owned();
        }
        state.face = resolved;
        state.requested = Some(state.request_key());
        true
    }
}

impl std::fmt::Debug for TextLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("TextLayer")
            .field("params", &state.params)
            .field("pending", &state.pending)
            .field("document", &state.document)
            .field("face", &state.face.as_ref().map(|resolved| &resolved.identity))
            .finish()
    }
}
