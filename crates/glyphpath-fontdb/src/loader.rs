// this_file: crates/glyphpath-fontdb/src/loader.rs

//! Opening font files from disk.

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;
use std::sync::Arc;

use glyphpath_core::{error::FontLoadError, traits::FaceLoader, LoadedFace};

use crate::SkrifaFace;

/// Maximum font file size (50MB) to prevent resource exhaustion.
pub const MAX_FONT_SIZE: u64 = 50 * 1024 * 1024;

/// Loads faces from font files through skrifa
///
/// [`FaceLoader::load`] opens face 0; collection files (`.ttc`) open at any
/// index through [`FaceLoader::load_index`].
#[derive(Debug, Default, Clone, Copy)]
pub struct FileFaceLoader;

impl FileFaceLoader {
    pub fn new() -> Self {
        Self
    }
}

impl FaceLoader for FileFaceLoader {
    fn load(&self, path: &Path) -> Result<LoadedFace, FontLoadError> {
        self.load_index(path, 0)
    }

    fn load_index(&self, path: &Path, face_index: u32) -> Result<LoadedFace, FontLoadError> {
        let mut file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => FontLoadError::FileNotFound(path.display().to_string()),
            _ => FontLoadError::NotSupported(format!("{}: {e}", path.display())),
        })?;

        let meta = file
            .metadata()
            .map_err(|e| FontLoadError::NotSupported(format!("{}: {e}", path.display())))?;
        if !meta.is_file() {
            return Err(FontLoadError::FileNotFound(path.display().to_string()));
        }
        if meta.len() > MAX_FONT_SIZE {
            return Err(FontLoadError::NotSupported(format!(
                "{} is {} bytes, limit is {MAX_FONT_SIZE}",
                path.display(),
                meta.len()
            )));
        }

        let mut data = Vec::with_capacity(meta.len() as usize);
        file.read_to_end(&mut data)
            .map_err(|e| FontLoadError::NotSupported(format!("{}: {e}", path.display())))?;

        let face = SkrifaFace::from_data_index(data, face_index)?;
        log::debug!("FileFaceLoader: opened {} (face {face_index})", path.display());
        Ok(Arc::new(face))
    }
}
