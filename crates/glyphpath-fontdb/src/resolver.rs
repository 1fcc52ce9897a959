//! Family, slant and weight in; a loaded face out
//!
//! Resolution runs a fixed cascade per attempt (explicit file, native
//! matcher, alias file names, the family as a file name) and retries the
//! cascade over eight attempts, relaxing weight, then slant, then both, then
//! switching to the default family. The first face that loads wins, so the
//! same filesystem always yields the same face.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use glyphpath_core::{
    error::FontLoadError,
    traits::{FaceLoader, FontMatcher},
    types::{FontIdentity, TextStyle, TextWeight},
    FaceCache, LoadedFace,
};

use crate::aliases::candidate_filenames;
use crate::search::{has_font_extension, DirOrigin, FontSearchConfig, SearchDir, KNOWN_FONT_EXTENSIONS};

/// Number of (family, style, weight) combinations tried before giving up
pub const FALLBACK_ATTEMPTS: usize = 8;

/// Which part of the cascade produced the face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CascadeStep {
    /// The family (or the `font` hint) named a file directly
    FontFile,
    /// The platform matcher answered
    Matcher,
    /// A file name derived from the alias table
    Alias,
    /// The family itself used as a file name
    Literal,
}

/// How a resolution was satisfied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveSource {
    Cache,
    Probe {
        /// Index into the fallback order, 0 for the request as given
        attempt: usize,
        step: CascadeStep,
        path: PathBuf,
        from_document: bool,
    },
}

/// A successful resolution
#[derive(Clone)]
pub struct ResolvedFace {
    pub face: LoadedFace,
    /// Key the face is cached under
    pub identity: FontIdentity,
    pub source: ResolveSource,
}

impl ResolvedFace {
    /// File the face was loaded from, unknown for cache hits
    pub fn path(&self) -> Option<&Path> {
        match &self.source {
            ResolveSource::Probe { path, .. } => Some(path),
            ResolveSource::Cache => None,
        }
    }
}

impl std::fmt::Debug for ResolvedFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedFace")
            .field("identity", &self.identity)
            .field("source", &self.source)
            .finish()
    }
}

/// What a text layer asks for
#[derive(Debug, Clone, Copy)]
pub struct FontRequest<'a> {
    pub family: &'a str,
    pub style: TextStyle,
    pub weight: TextWeight,
    /// Directory of the owning document, probed right after the working directory
    pub document_dir: Option<&'a Path>,
    /// Previously resolved file, tried first when the family names a file
    pub font_file: Option<&'a str>,
}

impl<'a> FontRequest<'a> {
    pub fn new(family: &'a str, style: TextStyle, weight: TextWeight) -> Self {
        Self {
            family,
            style,
            weight,
            document_dir: None,
            font_file: None,
        }
    }

    pub fn in_document(mut self, dir: Option<&'a Path>) -> Self {
        self.document_dir = dir;
        self
    }

    pub fn with_font_file(mut self, font_file: Option<&'a str>) -> Self {
        self.font_file = font_file.filter(|file| !file.is_empty());
        self
    }

    fn identity(&self) -> FontIdentity {
        FontIdentity::new(self.family, self.style, self.weight)
    }

    fn document_scope(&self) -> Option<String> {
        self.document_dir
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(|dir| dir.to_string_lossy().into_owned())
    }
}

struct Found {
    face: LoadedFace,
    path: PathBuf,
    step: CascadeStep,
    origin: DirOrigin,
}

/// Turns font requests into faces, through the shared cache
pub struct FontResolver {
    cache: Arc<FaceCache>,
    loader: Arc<dyn FaceLoader>,
    matcher: Option<Arc<dyn FontMatcher>>,
    config: FontSearchConfig,
}

impl FontResolver {
    pub fn new(cache: Arc<FaceCache>, loader: Arc<dyn FaceLoader>) -> Self {
        Self {
            cache,
            loader,
            matcher: None,
            config: FontSearchConfig::default(),
        }
    }

    pub fn with_matcher(mut self, matcher: Arc<dyn FontMatcher>) -> Self {
        self.matcher = Some(matcher);
        self
    }

    pub fn with_config(mut self, config: FontSearchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn cache(&self) -> &Arc<FaceCache> {
        &self.cache
    }

    pub fn config(&self) -> &FontSearchConfig {
        &self.config
    }

    /// Resolve `request`, falling back through the eight fixed attempts
    ///
    /// The face is cached under the identity that was asked for, scoped to
    /// the document only when the file came from the document's directory.
    /// Only that identity is looked up in the cache: entries under other
    /// identities may hold a later fallback, so every attempt probes the disk.
    pub fn resolve(&self, request: &FontRequest<'_>) -> Result<ResolvedFace, FontLoadError> {
        let requested = request.identity();
        let scope = request.document_scope();

        if let Some((face, identity)) = self.lookup(&requested, scope.as_deref()) {
            log::debug!("FontResolver: cache hit for {:?}", identity);
            return Ok(ResolvedFace {
                face,
                identity,
                source: ResolveSource::Cache,
            });
        }

        let dirs = self.config.search_dirs(request.document_dir);

        for (attempt, (family, style, weight)) in self.attempts(request).into_iter().enumerate() {
            let Some(found) = self.cascade(family, style, weight, request.font_file, &dirs) else {
                continue;
            };

            let from_document = found.origin == DirOrigin::Document;
            let identity = if from_document {
                requested.with_scope(scope)
            } else {
                requested
            };

            log::debug!(
                "FontResolver: '{}' resolved at attempt {} via {:?}: {}",
                request.family,
                attempt,
                found.step,
                found.path.display()
            );

            self.cache.put(identity.clone(), found.face.clone());
            return Ok(ResolvedFace {
                face: found.face,
                identity,
                source: ResolveSource::Probe {
                    attempt,
                    step: found.step,
                    path: found.path,
                    from_document,
                },
            });
        }

        log::error!(
            "FontResolver: no face available for '{}' ({:?}, {}), text will be empty",
            request.family,
            request.style,
            request.weight.0
        );
        Err(FontLoadError::NoFaceAvailable(request.family.to_string()))
    }

    /// Scoped key first, then the key shared by every document
    fn lookup(&self, key: &FontIdentity, scope: Option<&str>) -> Option<(LoadedFace, FontIdentity)> {
        if let Some(scope) = scope {
            let scoped = key.clone().with_scope(Some(scope.to_string()));
            if let Some(face) = self.cache.get(&scoped) {
                return Some((face, scoped));
            }
        }
        let unscoped = key.unscoped();
        self.cache.get(&unscoped).map(|face| (face, unscoped))
    }

    fn attempts<'a>(&'a self, request: &FontRequest<'a>) -> [(&'a str, TextStyle, TextWeight); FALLBACK_ATTEMPTS] {
        let family = request.family;
        let fallback = self.config.default_family.as_str();
        let (style, weight) = (request.style, request.weight);
        let (normal_style, normal_weight) = (TextStyle::Normal, TextWeight::NORMAL);

        [
            (family, style, weight),
            (family, style, normal_weight),
            (family, normal_style, weight),
            (family, normal_style, normal_weight),
            (fallback, style, weight),
            (fallback, style, normal_weight),
            (fallback, normal_style, weight),
            (fallback, normal_style, normal_weight),
        ]
    }

    /// One pass over the four lookup steps
    fn cascade(
        &self,
        family: &str,
        style: TextStyle,
        weight: TextWeight,
        font_file: Option<&str>,
        dirs: &[SearchDir],
    ) -> Option<Found> {
        let family = family.trim();
        if family.is_empty() {
            return None;
        }

        let names_file = has_font_extension(family) || Path::new(family).is_absolute();

        // 1. The family already is a file
        if names_file {
            if let Some(hint) = font_file {
                if let Some(found) = self.probe_path(Path::new(hint), CascadeStep::FontFile) {
                    return Some(found);
                }
            }
            if let Some(found) = self.probe_name(family, dirs, CascadeStep::FontFile) {
                return Some(found);
            }
        }

        // 2. Native matching
        if !names_file && self.config.use_system_matcher {
            if let Some(matcher) = &self.matcher {
                if let Some(found) = matcher.match_font(family, style, weight) {
                    let path = found.path;
                    match self.loader.load_index(&path, found.face_index) {
                        Ok(face) => {
                            return Some(Found {
                                face,
                                path,
                                step: CascadeStep::Matcher,
                                origin: DirOrigin::System,
                            })
                        },
                        Err(err) => log::debug!(
                            "FontResolver: {} matched '{family}' to {} (face {}) but it failed to load: {err}",
                            matcher.name(),
                            path.display(),
                            found.face_index
                        ),
                    }
                }
            }
        }

        // 3. Alias table
        for name in candidate_filenames(family, style, weight) {
            if let Some(found) = self.probe_name(&name, dirs, CascadeStep::Alias) {
                return Some(found);
            }
        }

        // 4. The family as a file name
        self.probe_name(family, dirs, CascadeStep::Literal)
    }

    /// Try `name` in every directory, bare and then with each known extension
    fn probe_name(&self, name: &str, dirs: &[SearchDir], step: CascadeStep) -> Option<Found> {
        if Path::new(name).is_absolute() {
            return self.probe_extensions(&SearchDir::new(PathBuf::new(), DirOrigin::Relative), name, step);
        }
        dirs.iter()
            .find_map(|dir| self.probe_extensions(dir, name, step))
    }

    fn probe_extensions(&self, dir: &SearchDir, name: &str, step: CascadeStep) -> Option<Found> {
        let extensions: &[&str] = if has_font_extension(name) {
            &[]
        } else {
            KNOWN_FONT_EXTENSIONS
        };

        std::iter::once("")
            .chain(extensions.iter().copied())
            .find_map(|ext| {
                let path = dir.candidate(&format!("{name}{ext}"));
                self.loader.load(&path).ok().map(|face| Found {
                    face,
                    path,
                    step,
                    origin: dir.origin,
                })
            })
    }

    fn probe_path(&self, path: &Path, step: CascadeStep) -> Option<Found> {
        self.loader.load(path).ok().map(|face| Found {
            face,
            path: path.to_path_buf(),
            step,
            origin: DirOrigin::Relative,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use parking_lot::Mutex;

    use glyphpath_core::{
        outline::RawGlyph,
        traits::{Face, FontMatch},
        types::GlyphId,
    };

    use super::*;

    struct MockFace;

    impl Face for MockFace {
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

    /// Pretends a fixed set of paths exist and remembers every probe
    #[derive(Default)]
    struct RecordingLoader {
        present: HashSet<PathBuf>,
        probes: Mutex<Vec<PathBuf>>,
        indices: Mutex<Vec<u32>>,
    }

    impl RecordingLoader {
        fn with_files(files: &[&str]) -> Self {
            Self {
                present: files.iter().map(PathBuf::from).collect(),
                probes: Mutex::new(Vec::new()),
                indices: Mutex::new(Vec::new()),
            }
        }

        fn probes(&self) -> Vec<PathBuf> {
            self.probes.lock().clone()
        }
    }

    impl FaceLoader for RecordingLoader {
        fn load(&self, path: &Path) -> Result<LoadedFace, FontLoadError> {
            self.probes.lock().push(path.to_path_buf());
            if self.present.contains(path) {
                Ok(Arc::new(MockFace))
            } else {
                Err(FontLoadError::FileNotFound(path.display().to_string()))
            }
        }

        fn load_index(&self, path: &Path, face_index: u32) -> Result<LoadedFace, FontLoadError> {
            self.indices.lock().push(face_index);
            self.load(path)
        }
    }

    struct FixedMatcher {
        family: &'static str,
        path: &'static str,
        face_index: u32,
    }

    impl FontMatcher for FixedMatcher {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn match_font(&self, family: &str, _style: TextStyle, _weight: TextWeight) -> Option<FontMatch> {
            (family == self.family).then(|| FontMatch::new(self.path, self.face_index))
        }
    }

    fn resolver(loader: Arc<RecordingLoader>) -> FontResolver {
        FontResolver::new(Arc::new(FaceCache::new()), loader)
            .with_config(FontSearchConfig::new().with_system_dirs(false))
    }

    #[test]
    fn test_resolve_when_only_normal_file_exists_then_fourth_attempt_wins() {
        let loader = Arc::new(RecordingLoader::with_files(&["arial.ttf"]));
        let resolver = resolver(loader.clone());

        let request = FontRequest::new("Arial", TextStyle::Italic, TextWeight::BOLD);
        let resolved = resolver.resolve(&request).expect("face");

        match &resolved.source {
            ResolveSource::Probe { attempt, step, path, from_document } => {
                assert_eq!(*attempt, 3);
                assert_eq!(*step, CascadeStep::Alias);
                assert_eq!(path, &PathBuf::from("arial.ttf"));
                assert!(!from_document);
            },
            other => panic!("expected a probe, got {other:?}"),
        }

        let probes = loader.probes();
        let position = |name: &str| probes.iter().position(|p| p == Path::new(name));
        // Each earlier attempt was exhausted first
        assert!(position("arialbi.ttf") < position("ariali.ttf"));
        assert!(position("ariali.ttf") < position("arialbd.ttf"));
        assert!(position("arialbd.ttf") < position("arial.ttf"));
        assert_eq!(probes.last(), Some(&PathBuf::from("arial.ttf")));

        // Cached under what was asked for, not under the fallback
        assert_eq!(
            resolved.identity,
            FontIdentity::new("Arial", TextStyle::Italic, TextWeight::BOLD)
        );
        assert!(resolver.cache().has(&resolved.identity));
    }

    #[test]
    fn test_resolve_twice_then_same_face_object() {
        let loader = Arc::new(RecordingLoader::with_files(&["arial.ttf"]));
        let resolver = resolver(loader.clone());
        let request = FontRequest::new("Arial", TextStyle::Normal, TextWeight::NORMAL);

        let first = resolver.resolve(&request).expect("face");
        let probes_after_first = loader.probes().len();
        let second = resolver.resolve(&request).expect("face");

        assert!(Arc::ptr_eq(&first.face, &second.face));
        assert_eq!(first.identity, second.identity);
        assert_eq!(second.source, ResolveSource::Cache);
        assert_eq!(loader.probes().len(), probes_after_first);
    }

    #[test]
    fn test_resolve_when_file_in_document_dir_then_scoped() {
        let loader = Arc::new(RecordingLoader::with_files(&["/doc/Custom.ttf"]));
        let resolver = resolver(loader);

        let in_doc = FontRequest::new("Custom", TextStyle::Normal, TextWeight::NORMAL)
            .in_document(Some(Path::new("/doc")));
        let resolved = resolver.resolve(&in_doc).expect("face");
        assert_eq!(resolved.identity.document_scope.as_deref(), Some("/doc"));
        assert!(matches!(
            resolved.source,
            ResolveSource::Probe {
                step: CascadeStep::Literal,
                from_document: true,
                ..
            }
        ));

        // Another document does not see it
        let elsewhere = FontRequest::new("Custom", TextStyle::Normal, TextWeight::NORMAL)
            .in_document(Some(Path::new("/other")));
        assert!(matches!(
            resolver.resolve(&elsewhere),
            Err(FontLoadError::NoFaceAvailable(_))
        ));
    }

    #[test]
    fn test_resolve_after_unrelated_warm_up_then_same_as_fresh() {
        let files = ["arialbd.ttf", "luxisr.ttf"];
        let bold = FontRequest::new("Arial", TextStyle::Italic, TextWeight::BOLD);

        let fresh = resolver(Arc::new(RecordingLoader::with_files(&files)))
            .resolve(&bold)
            .expect("face");

        let warmed = resolver(Arc::new(RecordingLoader::with_files(&files)));
        let regular = warmed
            .resolve(&FontRequest::new("Arial", TextStyle::Italic, TextWeight::NORMAL))
            .expect("face");
        assert_eq!(regular.path(), Some(Path::new("luxisr.ttf")));

        let after = warmed.resolve(&bold).expect("face");
        assert_eq!(after.source, fresh.source);
        assert!(matches!(
            after.source,
            ResolveSource::Probe { attempt: 2, .. }
        ));
        assert_eq!(after.path(), Some(Path::new("arialbd.ttf")));
    }

    #[test]
    fn test_resolve_when_global_file_then_shared_across_documents() {
        let loader = Arc::new(RecordingLoader::with_files(&["arial.ttf"]));
        let resolver = resolver(loader);

        let a = FontRequest::new("Arial", TextStyle::Normal, TextWeight::NORMAL)
            .in_document(Some(Path::new("/a")));
        let b = FontRequest::new("Arial", TextStyle::Normal, TextWeight::NORMAL)
            .in_document(Some(Path::new("/b")));

        let first = resolver.resolve(&a).expect("face");
        assert_eq!(first.identity.document_scope, None);
        let second = resolver.resolve(&b).expect("face");
        assert!(Arc::ptr_eq(&first.face, &second.face));
        assert_eq!(second.source, ResolveSource::Cache);
    }

    #[test]
    fn test_resolve_when_matcher_answers_then_matcher_step() {
        let loader = Arc::new(RecordingLoader::with_files(&["/sys/Fancy-Regular.otf"]));
        let resolver = resolver(loader.clone()).with_matcher(Arc::new(FixedMatcher {
            family: "Fancy",
            path: "/sys/Fancy-Regular.otf",
            face_index: 0,
        }));

        let resolved = resolver
            .resolve(&FontRequest::new("Fancy", TextStyle::Normal, TextWeight::NORMAL))
            .expect("face");
        assert!(matches!(
            resolved.source,
            ResolveSource::Probe {
                attempt: 0,
                step: CascadeStep::Matcher,
                ..
            }
        ));
        assert_eq!(loader.probes(), vec![PathBuf::from("/sys/Fancy-Regular.otf")]);
    }

    #[test]
    fn test_resolve_when_matcher_picks_collection_face_then_index_reaches_loader() {
        let loader = Arc::new(RecordingLoader::with_files(&["/sys/Family.ttc"]));
        let resolver = resolver(loader.clone()).with_matcher(Arc::new(FixedMatcher {
            family: "Family",
            path: "/sys/Family.ttc",
            face_index: 2,
        }));

        let resolved = resolver
            .resolve(&FontRequest::new("Family", TextStyle::Normal, TextWeight::BOLD))
            .expect("face");
        assert_eq!(resolved.path(), Some(Path::new("/sys/Family.ttc")));
        assert_eq!(*loader.indices.lock(), vec![2]);
    }

    #[test]
    fn test_resolve_when_family_is_file_then_font_hint_first() {
        let loader = Arc::new(RecordingLoader::with_files(&[
            "/fonts/resolved/My.ttf",
            "My.ttf",
        ]));
        let resolver = resolver(loader.clone());

        let request = FontRequest::new("My.ttf", TextStyle::Normal, TextWeight::NORMAL)
            .with_font_file(Some("/fonts/resolved/My.ttf"));
        let resolved = resolver.resolve(&request).expect("face");

        assert_eq!(resolved.path(), Some(Path::new("/fonts/resolved/My.ttf")));
        assert_eq!(loader.probes().len(), 1);
    }

    #[test]
    fn test_resolve_when_family_has_extension_then_not_extended_again() {
        let loader = Arc::new(RecordingLoader::with_files(&["Other.otf"]));
        let resolver = resolver(loader.clone());

        let resolved = resolver
            .resolve(&FontRequest::new("Other.otf", TextStyle::Normal, TextWeight::NORMAL))
            .expect("face");
        assert!(matches!(
            resolved.source,
            ResolveSource::Probe {
                step: CascadeStep::FontFile,
                ..
            }
        ));
        assert!(loader
            .probes()
            .iter()
            .all(|p| !p.to_string_lossy().ends_with(".otf.ttf")));
    }

    #[test]
    fn test_resolve_when_only_default_family_exists_then_fallback_family() {
        let loader = Arc::new(RecordingLoader::with_files(&["luxisr.ttf"]));
        let resolver = resolver(loader);

        let resolved = resolver
            .resolve(&FontRequest::new("Nothing Here", TextStyle::Oblique, TextWeight::LIGHT))
            .expect("face");
        assert!(matches!(
            resolved.source,
            ResolveSource::Probe {
                attempt: 6,
                ..
            }
        ));
        assert_eq!(resolved.identity.family, "Nothing Here");
    }

    #[test]
    fn test_resolve_when_nothing_exists_then_no_face() {
        let loader = Arc::new(RecordingLoader::default());
        let resolver = resolver(loader.clone());

        let result = resolver.resolve(&FontRequest::new("Arial", TextStyle::Normal, TextWeight::NORMAL));
        assert!(matches!(result, Err(FontLoadError::NoFaceAvailable(f)) if f == "Arial"));
        assert!(resolver.cache().is_empty());
        assert!(!loader.probes().is_empty());
    }
}
