//! Classic `kern` table pairs
//!
//! The table itself is read by read-fonts; this module only decides which
//! subtables count. Horizontal subtables in formats 0, 2 and 3 are used.
//! Vertical, cross-stream and variation subtables are skipped, and values of
//! several usable subtables add up.

use read_fonts::{
    tables::kern::{Kern, SubtableKind},
    types::GlyphId as FontGlyphId,
    TableProvider,
};

use glyphpath_core::types::GlyphId;

/// The horizontal pair subtables of one face's `kern` table
#[derive(Clone, Default)]
pub struct KernPairs<'a> {
    subtables: Vec<SubtableKind<'a>>,
}

impl<'a> KernPairs<'a> {
    /// Collects usable subtables; unreadable ones are dropped with a debug log
    pub fn new(kern: &Kern<'a>) -> Self {
        let subtables = kern
            .subtables()
            .filter_map(|subtable| match subtable {
                Ok(subtable) => Some(subtable),
                Err(err) => {
                    log::debug!("kern: unreadable subtable ({err})");
                    None
                },
            })
            .filter(|subtable| {
                subtable.is_horizontal() && !subtable.is_cross_stream() && !subtable.is_variable()
            })
            .filter_map(|subtable| match subtable.kind() {
                Ok(kind @ (SubtableKind::Format0(_) | SubtableKind::Format2(_) | SubtableKind::Format3(_))) => {
                    Some(kind)
                },
                Ok(SubtableKind::Format1(_)) => None,
                Err(err) => {
                    log::debug!("kern: unreadable subtable body ({err})");
                    None
                },
            })
            .collect();

        Self { subtables }
    }

    /// `None` when the font has no `kern` table or its header is unreadable
    pub fn from_font(font: &impl TableProvider<'a>) -> Option<Self> {
        font.kern().ok().map(|kern| Self::new(&kern))
    }

    /// Adjustment between `left` and `right` in font units, 0 when absent
    pub fn pair(&self, left: GlyphId, right: GlyphId) -> i32 {
        let (left, right) = (FontGlyphId::new(left), FontGlyphId::new(right));
        self.subtables
            .iter()
            .filter_map(|subtable| match subtable {
                SubtableKind::Format0(table) => table.kerning(left, right),
                SubtableKind::Format2(table) => table.kerning(left, right),
                SubtableKind::Format3(table) => table.kerning(left, right),
                SubtableKind::Format1(_) => None,
            })
            .fold(0i32, i32::saturating_add)
    }

    /// True when no subtable can contribute a value
    pub fn is_empty(&self) -> bool {
        self.subtables.iter().all(|subtable| match subtable {
            SubtableKind::Format0(table) => table.pairs().is_empty(),
            _ => false,
        })
    }
}

#[cfg(test)]
mod tests {
    use read_fonts::{FontData, FontRead};

    use super::*;

    fn format0(pairs: &[(u16, u16, i16)]) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(&(pairs.len() as u16).to_be_bytes());
        body.extend_from_slice(&[0; 6]);
        for (l, r, v) in pairs {
            body.extend_from_slice(&l.to_be_bytes());
            body.extend_from_slice(&r.to_be_bytes());
            body.extend_from_slice(&v.to_be_bytes());
        }
        body
    }

    fn ms_table(subtables: &[(u16, Vec<u8>)]) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&0u16.to_be_bytes());
        data.extend_from_slice(&(subtables.len() as u16).to_be_bytes());
        for (coverage, body) in subtables {
            data.extend_from_slice(&0u16.to_be_bytes());
            data.extend_from_slice(&((body.len() + 6) as u16).to_be_bytes());
            data.extend_from_slice(&coverage.to_be_bytes());
            data.extend_from_slice(body);
        }
        data
    }

    fn pairs_of(data: &[u8]) -> KernPairs<'_> {
        let kern = Kern::read(FontData::new(data)).unwrap();
        KernPairs::new(&kern)
    }

    #[test]
    fn test_microsoft_format0() {
        let data = ms_table(&[(0x0001, format0(&[(36, 57, -80), (57, 36, -60)]))]);
        let pairs = pairs_of(&data);

        assert!(!pairs.is_empty());
        assert_eq!(pairs.pair(36, 57), -80);
        assert_eq!(pairs.pair(57, 36), -60);
        assert_eq!(pairs.pair(1, 2), 0);
    }

    #[test]
    fn test_horizontal_subtables_add_up() {
        let data = ms_table(&[
            (0x0001, format0(&[(1, 2, -10)])),
            (0x0001, format0(&[(1, 2, -5)])),
        ]);
        assert_eq!(pairs_of(&data).pair(1, 2), -15);
    }

    #[test]
    fn test_cross_stream_and_vertical_are_skipped() {
        let data = ms_table(&[
            (0x0005, format0(&[(1, 2, -10)])),
            (0x0000, format0(&[(3, 4, -10)])),
        ]);
        let pairs = pairs_of(&data);
        assert!(pairs.is_empty());
        assert_eq!(pairs.pair(1, 2), 0);
        assert_eq!(pairs.pair(3, 4), 0);
    }

    #[test]
    fn test_apple_format0() {
        let body = format0(&[(5, 6, 12)]);
        let mut data = Vec::new();
        data.extend_from_slice(&0x0001_0000u32.to_be_bytes());
        data.extend_from_slice(&1u32.to_be_bytes());
        data.extend_from_slice(&((body.len() + 8) as u32).to_be_bytes());
        data.extend_from_slice(&0x0000u16.to_be_bytes());
        data.extend_from_slice(&0u16.to_be_bytes());
        data.extend_from_slice(&body);

        assert_eq!(pairs_of(&data).pair(5, 6), 12);
    }

    #[test]
    fn test_truncated_table_contributes_nothing() {
        assert!(Kern::read(FontData::new(&[0])).is_err());

        let data = ms_table(&[(0x0001, format0(&[(1, 2, -10)]))]);
        let pairs = pairs_of(&data[..data.len() - 3]);
        assert!(pairs.is_empty());
        assert_eq!(pairs.pair(1, 2), 0);
    }
}
