//! The parameter surface of a text layer
//!
//! Keys match the identifiers documents persist, so a host can forward its
//! stored values untouched. Every setter reports the [`SyncFlags`] it dirtied;
//! writing the value a parameter already holds dirties nothing.

use kurbo::{Point, Vec2};

use glyphpath_core::{
    error::ParamError,
    types::{FontIdentity, TextDirection, TextStyle, TextWeight},
    SyncFlags,
};
use glyphpath_layout::LayoutParams;

/// Replaced by the owning document's base file name
pub const FILENAME_SENTINEL: &str = "@_FILENAME_@";

/// A dynamically typed parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    String(String),
    Integer(i32),
    Real(f64),
    Bool(bool),
    Vector(Vec2),
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Vec2> for ParamValue {
    fn from(value: Vec2) -> Self {
        Self::Vector(value)
    }
}

impl From<Point> for ParamValue {
    fn from(value: Point) -> Self {
        Self::Vector(value.to_vec2())
    }
}

impl From<TextStyle> for ParamValue {
    fn from(value: TextStyle) -> Self {
        Self::Integer(value.as_persisted())
    }
}

impl From<TextWeight> for ParamValue {
    fn from(value: TextWeight) -> Self {
        Self::Integer(value.0)
    }
}

impl From<TextDirection> for ParamValue {
    fn from(value: TextDirection) -> Self {
        Self::Integer(value.as_persisted())
    }
}

/// Every parameter a text layer holds
#[derive(Debug, Clone, PartialEq)]
pub struct LayerParams {
    pub text: String,
    pub family: String,
    pub style: TextStyle,
    pub weight: TextWeight,
    pub direction: TextDirection,
    /// Glyph scale relative to the face's em square
    pub size: Vec2,
    /// Anchor fraction of line width and block height
    pub orient: Vec2,
    pub origin: Point,
    pub compress: f64,
    pub vcompress: f64,
    /// Resolved font file; tried first when `family` names a file
    pub font: String,
    pub use_kerning: bool,
    pub grid_fit: bool,
}

impl Default for LayerParams {
    fn default() -> Self {
        Self {
            text: "Text Layer".to_string(),
            family: "Sans Serif".to_string(),
            style: TextStyle::Normal,
            weight: TextWeight::NORMAL,
            direction: TextDirection::Auto,
            size: Vec2::new(0.25, 0.25),
            orient: Vec2::new(0.5, 0.5),
            origin: Point::ORIGIN,
            compress: 1.0,
            vcompress: 1.0,
            font: String::new(),
            use_kerning: true,
            grid_fit: false,
        }
    }
}

impl LayerParams {
    /// Names accepted by [`set`](Self::set) and [`get`](Self::get)
    pub const NAMES: &'static [&'static str] = &[
        "text",
        "family",
        "style",
        "weight",
        "direction",
        "size",
        "orient",
        "origin",
        "pos",
        "compress",
        "vcompress",
        "font",
        "use_kerning",
        "grid_fit",
    ];

    /// Store `value` under `name` and report what needs recomputing
    pub fn set(&mut self, name: &str, value: ParamValue) -> Result<SyncFlags, ParamError> {
        let flags = match name {
            "text" => update(&mut self.text, expect_string(name, value)?, SyncFlags::TEXT),
            "family" => {
                let flags = update(&mut self.family, expect_string(name, value)?, SyncFlags::FONT);
                // a file resolved for the old family must not answer for the new one
                if !flags.is_empty() {
                    self.font.clear();
                }
                flags
            },
            "font" => update(&mut self.font, expect_string(name, value)?, SyncFlags::FONT),
            "style" => {
                let raw = expect_integer(name, value)?;
                let style = TextStyle::from_persisted(raw).ok_or_else(|| out_of_range(name, raw))?;
                update(&mut self.style, style, SyncFlags::FONT)
            },
            "weight" => {
                let raw = expect_integer(name, value)?;
                if raw <= 0 {
                    return Err(out_of_range(name, raw));
                }
                update(&mut self.weight, TextWeight(raw), SyncFlags::FONT)
            },
            "direction" => {
                let raw = expect_integer(name, value)?;
                let direction = TextDirection::from_persisted(raw).ok_or_else(|| out_of_range(name, raw))?;
                update(&mut self.direction, direction, SyncFlags::DIRECTION)
            },
            "size" => update(&mut self.size, expect_vector(name, value)?, SyncFlags::TRANSFORM),
            "orient" => update(&mut self.orient, expect_vector(name, value)?, SyncFlags::ORIENTATION),
            "origin" | "pos" => {
                let origin = expect_vector(name, value)?.to_point();
                update(&mut self.origin, origin, SyncFlags::TRANSFORM)
            },
            "compress" => update(&mut self.compress, expect_real(name, value)?, SyncFlags::SPACING),
            "vcompress" => update(&mut self.vcompress, expect_real(name, value)?, SyncFlags::SPACING),
            "use_kerning" => update(&mut self.use_kerning, expect_bool(name, value)?, SyncFlags::KERNING),
            "grid_fit" => update(&mut self.grid_fit, expect_bool(name, value)?, SyncFlags::GRID_FIT),
            _ => return Err(ParamError::Unknown(name.to_string())),
        };
        Ok(flags)
    }

    pub fn get(&self, name: &str) -> Result<ParamValue, ParamError> {
        Ok(match name {
            "text" => self.text.clone().into(),
            "family" => self.family.clone().into(),
            "font" => self.font.clone().into(),
            "style" => self.style.into(),
            "weight" => self.weight.into(),
            "direction" => self.direction.into(),
            "size" => self.size.into(),
            "orient" => self.orient.into(),
            "origin" | "pos" => self.origin.into(),
            "compress" => self.compress.into(),
            "vcompress" => self.vcompress.into(),
            "use_kerning" => self.use_kerning.into(),
            "grid_fit" => self.grid_fit.into(),
            _ => return Err(ParamError::Unknown(name.to_string())),
        })
    }

    /// The face identity these parameters ask for, before document scoping
    pub fn identity(&self) -> FontIdentity {
        FontIdentity::new(self.family.clone(), self.style, self.weight)
    }

    pub fn layout(&self) -> LayoutParams {
        LayoutParams {
            compress: self.compress,
            vcompress: self.vcompress,
            use_kerning: self.use_kerning,
            grid_fit: self.grid_fit,
        }
    }

    /// `text`, or the document's file stem when `text` is exactly the sentinel
    ///
    /// The sentinel stays literal when there is no document to name, and text
    /// that merely contains it is never rewritten.
    pub fn expanded_text(&self, document_stem: Option<&str>) -> String {
        match document_stem {
            Some(stem) if self.text == FILENAME_SENTINEL => stem.to_string(),
            _ => self.text.clone(),
        }
    }
}

fn update<T: PartialEq>(slot: &mut T, value: T, flags: SyncFlags) -> SyncFlags {
    if *slot == value {
        return SyncFlags::empty();
    }
    *slot = value;
    flags
}

fn out_of_range(name: &str, value: i32) -> ParamError {
    ParamError::OutOfRange {
        name: name.to_string(),
        value: i64::from(value),
    }
}

fn mismatch(name: &str, expected: &'static str) -> ParamError {
    ParamError::TypeMismatch {
        name: name.to_string(),
        expected,
    }
}

fn expect_string(name: &str, value: ParamValue) -> Result<String, ParamError> {
    match value {
        ParamValue::String(s) => Ok(s),
        _ => Err(mismatch(name, "string")),
    }
}

fn expect_integer(name: &str, value: ParamValue) -> Result<i32, ParamError> {
    match value {
        ParamValue::Integer(i) => Ok(i),
        _ => Err(mismatch(name, "integer")),
    }
}

// Integers widen, hosts often store whole-number spacing as ints
fn expect_real(name: &str, value: ParamValue) -> Result<f64, ParamError> {
    match value {
        ParamValue::Real(r) => Ok(r),
        ParamValue::Integer(i) => Ok(f64::from(i)),
        _ => Err(mismatch(name, "real")),
    }
}

fn expect_bool(name: &str, value: ParamValue) -> Result<bool, ParamError> {
    match value {
        ParamValue::Bool(b) => Ok(b),
        _ => Err(mismatch(name, "bool")),
    }
}

fn expect_vector(name: &str, value: ParamValue) -> Result<Vec2, ParamError> {
    match value {
        ParamValue::Vector(v) => Ok(v),
        _ => Err(mismatch(name, "vector")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = LayerParams::default();
        assert_eq!(params.text, "Text Layer");
        assert_eq!(params.family, "Sans Serif");
        assert_eq!(params.size, Vec2::new(0.25, 0.25));
        assert_eq!(params.orient, Vec2::new(0.5, 0.5));
        assert!(params.use_kerning);
        assert!(!params.grid_fit);
        assert_eq!(params.layout(), LayoutParams::default());
    }

    #[test]
    fn test_set_reports_the_flag_it_dirties() {
        let mut params = LayerParams::default();
        assert_eq!(params.set("text", "Hi".into()).unwrap(), SyncFlags::TEXT);
        assert_eq!(params.set("weight", 700.into()).unwrap(), SyncFlags::FONT);
        assert_eq!(params.set("direction", 2.into()).unwrap(), SyncFlags::DIRECTION);
        assert_eq!(params.set("compress", 0.8.into()).unwrap(), SyncFlags::SPACING);
        assert_eq!(params.set("orient", Vec2::ZERO.into()).unwrap(), SyncFlags::ORIENTATION);
        assert_eq!(params.set("grid_fit", true.into()).unwrap(), SyncFlags::GRID_FIT);
        assert_eq!(params.set("use_kerning", false.into()).unwrap(), SyncFlags::KERNING);
        assert_eq!(params.set("size", Vec2::new(1.0, 1.0).into()).unwrap(), SyncFlags::TRANSFORM);

        assert_eq!(params.weight, TextWeight::BOLD);
        assert_eq!(params.direction, TextDirection::Rtl);
    }

    #[test]
    fn test_set_same_value_dirties_nothing() {
        let mut params = LayerParams::default();
        assert!(params.set("family", "Sans Serif".into()).unwrap().is_empty());
        assert!(params.set("compress", 1.into()).unwrap().is_empty());
    }

    #[test]
    fn test_new_family_forgets_resolved_file() {
        let mut params = LayerParams::default();
        params.font = "/fonts/a.ttf".to_string();
        params.set("family", "Sans Serif".into()).unwrap();
        assert_eq!(params.font, "/fonts/a.ttf");

        params.set("family", "b.ttf".into()).unwrap();
        assert!(params.font.is_empty());
    }

    #[test]
    fn test_pos_aliases_origin() {
        let mut params = LayerParams::default();
        params.set("pos", Point::new(3.0, 4.0).into()).unwrap();
        assert_eq!(params.origin, Point::new(3.0, 4.0));
        assert_eq!(params.get("origin").unwrap(), ParamValue::Vector(Vec2::new(3.0, 4.0)));
    }

    #[test]
    fn test_bad_values_are_rejected_without_change() {
        let mut params = LayerParams::default();
        assert!(matches!(
            params.set("nope", 1.into()),
            Err(ParamError::Unknown(name)) if name == "nope"
        ));
        assert!(matches!(
            params.set("text", 3.into()),
            Err(ParamError::TypeMismatch { expected: "string", .. })
        ));
        assert!(matches!(
            params.set("style", 9.into()),
            Err(ParamError::OutOfRange { value: 9, .. })
        ));
        assert!(matches!(
            params.set("weight", 0.into()),
            Err(ParamError::OutOfRange { value: 0, .. })
        ));
        assert_eq!(params, LayerParams::default());
    }

    #[test]
    fn test_every_name_reads_back() {
        let params = LayerParams::default();
        for name in LayerParams::NAMES {
            assert!(params.get(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn test_sentinel_expansion() {
        let mut params = LayerParams::default();
        params.text = FILENAME_SENTINEL.to_string();
        assert_eq!(params.expanded_text(Some("clip")), "clip");
        assert_eq!(params.expanded_text(None), FILENAME_SENTINEL);

        params.text = format!("{FILENAME_SENTINEL} v2");
        assert_eq!(params.expanded_text(Some("clip")), "@_FILENAME_@ v2");
    }
}
