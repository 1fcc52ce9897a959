// this_file: crates/glyphpath-unicode/src/lib.rs

//! Where raw text becomes lines of script spans.
//!
//! The segmenter normalizes line endings and tabs, splits on every Unicode
//! line separator, puts each line in display order and cuts it into runs of
//! one script. Bidi reordering and script detection are capabilities: leave
//! either out and the segmenter degrades instead of failing.

use std::sync::Arc;

use glyphpath_core::{
    error::SegmentError,
    traits::{BidiReorderer, ScriptDetector},
    types::{ScriptTag, TextDirection, TextLine, TextSpan},
    Result,
};

pub mod bidi;
pub mod script;

pub use bidi::UnicodeBidiReorderer;
pub use script::IcuScriptDetector;

/// Spaces a horizontal tab expands to
pub const TAB_WIDTH: usize = 8;

/// Line feed, vertical tab, form feed, carriage return, NEL, LS, PS
pub fn is_line_break(ch: char) -> bool {
    matches!(
        ch,
        '\n' | '\u{000B}' | '\u{000C}' | '\r' | '\u{0085}' | '\u{2028}' | '\u{2029}'
    )
}

/// Splits text into display-ordered lines of script spans
#[derive(Clone)]
pub struct TextSegmenter {
    bidi: Option<Arc<dyn BidiReorderer>>,
    scripts: Option<Arc<dyn ScriptDetector>>,
}

impl TextSegmenter {
    /// Bidi reordering through unicode-bidi, script spans through ICU
    pub fn new() -> Self {
        Self {
            bidi: Some(Arc::new(UnicodeBidiReorderer::new())),
            scripts: Some(Arc::new(IcuScriptDetector::new())),
        }
    }

    /// Logical order, one untagged span per line
    pub fn plain() -> Self {
        Self {
            bidi: None,
            scripts: None,
        }
    }

    pub fn with_bidi(mut self, bidi: Option<Arc<dyn BidiReorderer>>) -> Self {
        self.bidi = bidi;
        self
    }

    pub fn with_scripts(mut self, scripts: Option<Arc<dyn ScriptDetector>>) -> Self {
        self.scripts = scripts;
        self
    }

    pub fn has_bidi(&self) -> bool {
        self.bidi.is_some()
    }

    pub fn has_scripts(&self) -> bool {
        self.scripts.is_some()
    }

    /// Segment `text`, logging failures and yielding no lines for them
    pub fn segment(&self, text: &str, direction: TextDirection) -> Vec<TextLine> {
        match self.try_segment(text, direction) {
            Ok(lines) => lines,
            Err(err) => {
                log::error!("TextSegmenter: {err}, text dropped");
                Vec::new()
            },
        }
    }

    /// Segment `text`, surfacing a reorderer failure
    pub fn try_segment(&self, text: &str, direction: TextDirection) -> Result<Vec<TextLine>> {
        let normalized = normalize(text);

        normalized
            .split(is_line_break)
            .map(|line| -> Result<TextLine> {
                let codepoints: Vec<char> = line.chars().collect();
                let ordered = match &self.bidi {
                    Some(bidi) if !codepoints.is_empty() => bidi.reorder(&codepoints, direction)?,
                    _ => codepoints,
                };
                Ok(self.split_spans(ordered))
            })
            .collect()
    }

    fn split_spans(&self, codepoints: Vec<char>) -> TextLine {
        if codepoints.is_empty() {
            return TextLine::default();
        }

        let Some(scripts) = &self.scripts else {
            return TextLine::new(vec![TextSpan::new(codepoints, None)]);
        };

        let mut spans: Vec<TextSpan> = Vec::new();
        for ch in codepoints {
            let script = scripts.script(ch);
            match spans.last_mut() {
                Some(span) if script == ScriptTag::INHERITED || span.script == Some(script) => {
                    span.codepoints.push(ch);
                },
                _ => spans.push(TextSpan::new(vec![ch], Some(script))),
            }
        }
        TextLine::new(spans)
    }
}

impl Default for TextSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TextSegmenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextSegmenter")
            .field("bidi", &self.bidi.as_ref().map(|bidi| bidi.name()))
            .field("scripts", &self.scripts.is_some())
            .finish()
    }
}

/// CRLF to LF, each tab to [`TAB_WIDTH`] spaces
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\r' if chars.peek() == Some(&'\n') => {},
            '\t' => out.extend(std::iter::repeat(' ').take(TAB_WIDTH)),
            _ => out.push(ch),
        }
    }
    out
}

/// Strict UTF-8 decoding
pub fn decode_utf8(bytes: &[u8]) -> std::result::Result<String, SegmentError> {
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|err| SegmentError::InvalidUtf8 {
            offset: err.valid_up_to(),
        })
}

/// Decode UTF-8, dropping each invalid sequence with a warning
pub fn decode_utf8_lossy_skip(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    let mut rest = bytes;
    let mut consumed = 0usize;

    loop {
        match std::str::from_utf8(rest) {
            Ok(valid) => {
                out.push_str(valid);
                return out;
            },
            Err(err) => {
                let valid_len = err.valid_up_to();
                // valid_up_to is always a char boundary
                if let Ok(valid) = std::str::from_utf8(&rest[..valid_len]) {
                    out.push_str(valid);
                }
                let skip = err.error_len().unwrap_or(rest.len() - valid_len);
                log::warn!(
                    "{}",
                    SegmentError::InvalidUtf8 {
                        offset: consumed + valid_len
                    }
                );
                consumed += valid_len + skip;
                rest = &rest[valid_len + skip..];
            },
        }
    }
}


#[cfg(test)]
mod proptests;
