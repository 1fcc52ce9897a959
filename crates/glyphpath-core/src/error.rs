//! Error types for glyphpath

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GlyphpathError>;

/// Main error type for glyphpath
#[derive(Debug, Error)]
pub enum GlyphpathError {
    #[error("Font loading failed: {0}")]
    FontLoad(#[from] FontLoadError),

    #[error("Shaping failed: {0}")]
    ShapingFailed(#[from] ShapingError),

    #[error("Segmentation failed: {0}")]
    Segmentation(#[from] SegmentError),

    #[error("Parameter error: {0}")]
    Param(#[from] ParamError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(String),
}

/// Font loading errors
#[derive(Debug, Error)]
pub enum FontLoadError {
    #[error("Font file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid font data")]
    InvalidData,

    #[error("Font not supported: {0}")]
    NotSupported(String),

    #[error("No face available for family: {0}")]
    NoFaceAvailable(String),
}

/// Shaping errors
#[derive(Debug, Error)]
pub enum ShapingError {
    #[error("Invalid text input")]
    InvalidText,

    #[error("Script not supported: {0}")]
    ScriptNotSupported(String),

    #[error("Backend error: {0}")]
    BackendError(String),
}

/// Segmentation errors
#[derive(Debug, Error)]
pub enum SegmentError {
    #[error("Bidi reordering failed: {0}")]
    Bidi(String),

    #[error("Invalid UTF-8 sequence at byte {offset}")]
    InvalidUtf8 { offset: usize },
}

/// Errors raised by the layer parameter surface
#[derive(Debug, Error)]
pub enum ParamError {
    #[error("Unknown parameter: {0}")]
    Unknown(String),

    #[error("Parameter '{name}' expects a {expected} value")]
    TypeMismatch { name: String, expected: &'static str },

    #[error("Parameter '{name}' does not accept {value}")]
    OutOfRange { name: String, value: i64 },
}
