//! Script property lookup through ICU data

use glyphpath_core::{traits::ScriptDetector, types::ScriptTag};
use icu_properties::{
    props::Script, CodePointMapData, CodePointMapDataBorrowed, PropertyNamesShort,
    PropertyNamesShortBorrowed,
};

/// Classifies codepoints with ICU's compiled Script property
pub struct IcuScriptDetector {
    script_map: CodePointMapDataBorrowed<'static, Script>,
    short_names: PropertyNamesShortBorrowed<'static, Script>,
}

impl IcuScriptDetector {
    /// Create a detector with ICU data baked in.
    pub fn new() -> Self {
        Self {
            script_map: CodePointMapData::<Script>::new(),
            short_names: PropertyNamesShort::<Script>::new(),
        }
    }

    /// ISO 15924 code of an ICU script value, `Zzzz` when ICU has no short name
    pub fn iso_tag(&self, script: Script) -> ScriptTag {
        self.short_names
            .get(script)
            .and_then(|name| <[u8; 4]>::try_from(name.as_bytes()).ok())
            .map(|tag| ScriptTag::new(&tag))
            .unwrap_or(ScriptTag::UNKNOWN)
    }
}

impl Default for IcuScriptDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptDetector for IcuScriptDetector {
    fn script(&self, ch: char) -> ScriptTag {
        self.iso_tag(self.script_map.get(ch))
    }
}
