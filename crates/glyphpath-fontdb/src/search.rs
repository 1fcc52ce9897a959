//! Where to look for font files
//!
//! Candidates are probed across an ordered directory list: the process
//! working directory, the owning document's directory, any configured extra
//! directories, then the platform's system font roots.
//!
//! # Environment Variable
//!
//! `GLYPHPATH_FONT_PATH` adds extra directories, separated the way `PATH` is
//! on the current platform. A leading `~` expands to the home directory:
//!
//! ```bash
//! GLYPHPATH_FONT_PATH=~/fonts:/opt/fonts ./my_app
//! ```

use std::env;
use std::path::{Path, PathBuf};

/// Environment variable holding extra font directories
pub const FONT_PATH_ENV: &str = "GLYPHPATH_FONT_PATH";

/// Family used when nothing else resolves
pub const DEFAULT_FAMILY: &str = "sans serif";

/// Font file extensions the resolver recognizes and appends
#[cfg(target_os = "macos")]
pub const KNOWN_FONT_EXTENSIONS: &[&str] = &[".ttf", ".otf", ".dfont", ".ttc"];
#[cfg(not(target_os = "macos"))]
pub const KNOWN_FONT_EXTENSIONS: &[&str] = &[".ttf", ".otf", ".ttc"];

/// Does `name` end in a recognized font extension? Case-insensitive.
pub fn has_font_extension(name: &str) -> bool {
    let Some(ext) = Path::new(name).extension().and_then(|ext| ext.to_str()) else {
        return false;
    };
    KNOWN_FONT_EXTENSIONS
        .iter()
        .any(|known| known[1..].eq_ignore_ascii_case(ext))
}

/// Which kind of directory a probe came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirOrigin {
    /// Relative to the working directory (or an absolute candidate)
    Relative,
    Document,
    Extra,
    System,
}

/// One entry of the probe order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchDir {
    pub path: PathBuf,
    pub origin: DirOrigin,
}

impl SearchDir {
    pub fn new(path: impl Into<PathBuf>, origin: DirOrigin) -> Self {
        Self {
            path: path.into(),
            origin,
        }
    }

    /// Where `file_name` would live inside this directory
    pub fn candidate(&self, file_name: &str) -> PathBuf {
        if self.path.as_os_str().is_empty() {
            PathBuf::from(file_name)
        } else {
            self.path.join(file_name)
        }
    }
}

/// Platform font roots, in probe order
pub fn system_font_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    #[cfg(windows)]
    {
        match env::var("windir") {
            Ok(windir) if !windir.is_empty() => dirs.push(PathBuf::from(windir).join("Fonts")),
            _ => dirs.push(PathBuf::from("C:\\WINDOWS\\FONTS\\")),
        }
        // Per-user installs since Windows 10 1809
        if let Ok(local) = env::var("LOCALAPPDATA") {
            if !local.is_empty() {
                dirs.push(PathBuf::from(local).join("Microsoft\\Windows\\Fonts"));
            }
        }
    }

    #[cfg(not(windows))]
    {
        #[cfg(target_os = "macos")]
        {
            dirs.push(PathBuf::from(shellexpand::tilde("~/Library/Fonts/").as_ref()));
            dirs.push(PathBuf::from("/Library/Fonts/"));
        }
        dirs.push(PathBuf::from("/usr/share/fonts/truetype/"));
        dirs.push(PathBuf::from("/usr/share/fonts/opentype/"));
    }

    dirs
}

/// Knobs for font lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontSearchConfig {
    /// Probed after the document directory, before system roots
    pub extra_dirs: Vec<PathBuf>,
    /// Last resort family of the fallback cascade
    pub default_family: String,
    /// Ask the native matcher (when one is installed) before probing files
    pub use_system_matcher: bool,
    /// Include the platform font roots in the probe order
    pub use_system_dirs: bool,
}

impl Default for FontSearchConfig {
    fn default() -> Self {
        Self {
            extra_dirs: Vec::new(),
            default_family: DEFAULT_FAMILY.to_string(),
            use_system_matcher: true,
            use_system_dirs: true,
        }
    }
}

impl FontSearchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults plus the directories listed in `GLYPHPATH_FONT_PATH`
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(value) = env::var_os(FONT_PATH_ENV) {
            for dir in env::split_paths(&value) {
                let Some(raw) = dir.to_str() else {
                    log::warn!("{FONT_PATH_ENV}: skipping non UTF-8 entry {}", dir.display());
                    continue;
                };
                if raw.is_empty() {
                    continue;
                }
                config
                    .extra_dirs
                    .push(PathBuf::from(shellexpand::tilde(raw).as_ref()));
            }
            log::debug!(
                "{FONT_PATH_ENV}: {} extra font directories",
                config.extra_dirs.len()
            );
        }
        config
    }

    pub fn with_extra_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.extra_dirs.push(dir.into());
        self
    }

    pub fn with_default_family(mut self, family: impl Into<String>) -> Self {
        self.default_family = family.into();
        self
    }

    pub fn with_system_matcher(mut self, enabled: bool) -> Self {
        self.use_system_matcher = enabled;
        self
    }

    pub fn with_system_dirs(mut self, enabled: bool) -> Self {
        self.use_system_dirs = enabled;
        self
    }

    /// Full probe order for a document living in `document_dir`
    pub fn search_dirs(&self, document_dir: Option<&Path>) -> Vec<SearchDir> {
        let mut dirs = vec![SearchDir::new(PathBuf::new(), DirOrigin::Relative)];

        if let Some(doc) = document_dir.filter(|doc| !doc.as_os_str().is_empty()) {
            dirs.push(SearchDir::new(doc, DirOrigin::Document));
        }

        dirs.extend(
            self.extra_dirs
                .iter()
                .map(|dir| SearchDir::new(dir.clone(), DirOrigin::Extra)),
        );

        if self.use_system_dirs {
            dirs.extend(
                system_font_dirs()
                    .into_iter()
                    .map(|dir| SearchDir::new(dir, DirOrigin::System)),
            );
        }

        dirs
    }
}
