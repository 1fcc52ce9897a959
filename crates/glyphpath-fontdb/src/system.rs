//! Platform family matching through fontdb
//!
//! Stands in for fontconfig-style services: given a family name, a slant and
//! a weight, fontdb answers with the file and face that serve it best. Only
//! file backed faces are reported; the resolver loads the path itself, at the
//! collection index fontdb recorded.

use std::path::Path;

use fontdb::{Database, Family, Query, Source, Stretch, Style, Weight};

use glyphpath_core::{
    traits::{FontMatch, FontMatcher},
    types::{TextStyle, TextWeight},
};

/// Family matcher backed by a `fontdb::Database`
pub struct FontdbMatcher {
    db: Database,
}

impl FontdbMatcher {
    /// Scan the system font directories
    pub fn new() -> Self {
        let mut db = Database::new();
        db.load_system_fonts();
        log::debug!("FontdbMatcher: indexed {} system faces", db.len());
        Self { db }
    }

    /// Match against an already populated database
    pub fn with_database(db: Database) -> Self {
        Self { db }
    }

    /// Add every font below `dir` to the index
    pub fn load_fonts_dir(&mut self, dir: impl AsRef<Path>) {
        self.db.load_fonts_dir(dir);
    }

    pub fn face_count(&self) -> usize {
        self.db.len()
    }
}

impl Default for FontdbMatcher {
    fn default() -> Self {
        Self::new()
    }
}

fn family_for(name: &str) -> Family<'_> {
    let trimmed = name.trim();
    if trimmed.eq_ignore_ascii_case("sans serif")
        || trimmed.eq_ignore_ascii_case("sans-serif")
        || trimmed.eq_ignore_ascii_case("sans")
    {
        Family::SansSerif
    } else if trimmed.eq_ignore_ascii_case("serif") {
        Family::Serif
    } else if trimmed.eq_ignore_ascii_case("monospace") || trimmed.eq_ignore_ascii_case("mono") {
        Family::Monospace
    } else {
        Family::Name(trimmed)
    }
}

fn fontdb_style(style: TextStyle) -> Style {
    match style {
        TextStyle::Normal => Style::Normal,
        TextStyle::Oblique => Style::Oblique,
        TextStyle::Italic => Style::Italic,
    }
}

impl FontMatcher for FontdbMatcher {
    fn name(&self) -> &'static str {
        "fontdb"
    }

    fn match_font(&self, family: &str, style: TextStyle, weight: TextWeight) -> Option<FontMatch> {
        if family.trim().is_empty() {
            return None;
        }

        let families = [family_for(family)];
        let query = Query {
            families: &families,
            weight: Weight(weight.0.clamp(1, 1000) as u16),
            stretch: Stretch::Normal,
            style: fontdb_style(style),
        };

        let id = self.db.query(&query)?;
        let face = self.db.face(id)?;
        match &face.source {
            Source::File(path) => Some(FontMatch::new(path.clone(), face.index)),
            _ => {
                log::debug!("FontdbMatcher: '{family}' matched a face with no file behind it");
                None
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_database_matches_nothing() {
        let matcher = FontdbMatcher::with_database(Database::new());
        assert_eq!(matcher.face_count(), 0);
        assert!(matcher
            .match_font("Sans Serif", TextStyle::Normal, TextWeight::NORMAL)
            .is_none());
    }

    #[test]
    fn test_generic_family_names_map_to_generics() {
        assert!(matches!(family_for("Sans Serif"), Family::SansSerif));
        assert!(matches!(family_for("sans-serif"), Family::SansSerif));
        assert!(matches!(family_for("SERIF"), Family::Serif));
        assert!(matches!(family_for("mono"), Family::Monospace));
        assert!(matches!(family_for(" Arial "), Family::Name("Arial")));
    }

    #[test]
    fn test_blank_family_is_rejected() {
        let matcher = FontdbMatcher::with_database(Database::new());
        assert!(matcher
            .match_font("   ", TextStyle::Italic, TextWeight::BOLD)
            .is_none());
    }
}
