//! Reasons a text layer needs recomputing
//!
//! Parameter setters return the flags they dirty; the layer ORs them into
//! its pending set and the next sync pass takes the whole set at once. Many
//! edits between two renders cost one recomputation.

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SyncFlags: u16 {
        const FONT = 1 << 0;
        const TEXT = 1 << 1;
        const DIRECTION = 1 << 2;
        const SPACING = 1 << 3;
        const ORIENTATION = 1 << 4;
        const KERNING = 1 << 5;
        const GRID_FIT = 1 << 6;
        /// Size or origin: only the final transform moves
        const TRANSFORM = 1 << 7;
    }
}

impl SyncFlags {
    /// The face must be resolved again
    pub fn needs_face(self) -> bool {
        self.contains(Self::FONT)
    }

    /// Lines and glyph indices must be rebuilt
    pub fn needs_segmentation(self) -> bool {
        self.intersects(Self::FONT | Self::TEXT | Self::DIRECTION)
    }

    /// Outlines, pen positions or anchoring changed
    pub fn needs_layout(self) -> bool {
        self.intersects(
            Self::FONT
                | Self::TEXT
                | Self::DIRECTION
                | Self::SPACING
                | Self::ORIENTATION
                | Self::KERNING
                | Self::GRID_FIT,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_coalesce() {
        let mut pending = SyncFlags::empty();
        pending |= SyncFlags::SPACING;
        pending |= SyncFlags::SPACING;
        pending |= SyncFlags::KERNING;

        assert_eq!(pending, SyncFlags::SPACING | SyncFlags::KERNING);
        assert!(pending.needs_layout());
        assert!(!pending.needs_segmentation());
        assert!(!pending.needs_face());
    }

    #[test]
    fn test_transform_only_skips_layout() {
        let flags = SyncFlags::TRANSFORM;
        assert!(!flags.needs_layout());
        assert!(!flags.is_empty());
    }

    #[test]
    fn test_font_change_implies_everything() {
        let flags = SyncFlags::FONT;
        assert!(flags.needs_face());
        assert!(flags.needs_segmentation());
        assert!(flags.needs_layout());
    }
}
