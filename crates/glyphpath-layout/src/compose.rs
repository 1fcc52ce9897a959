//! Anchoring placed lines around the orientation point

use kurbo::Vec2;

use glyphpath_core::outline::ContourCommand;

use crate::layout::TextBlock;

/// Shifts every line by the orientation fraction and flattens the block
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContourComposer {
    orient: Vec2,
}

impl Default for ContourComposer {
    fn default() -> Self {
        Self::new(Vec2::new(0.5, 0.5))
    }
}

impl ContourComposer {
    /// `orient` is the anchor as a fraction of line width and block height
    pub fn new(orient: Vec2) -> Self {
        Self { orient }
    }

    pub fn orient(&self) -> Vec2 {
        self.orient
    }

    /// Top line first; each line is justified on its own width
    pub fn compose(&self, block: &TextBlock) -> Vec<ContourCommand> {
        let dy = self.orient.y * block.height - block.ascent;
        let mut out = Vec::with_capacity(block.lines.iter().map(|line| line.contours.len()).sum());

        for line in &block.lines {
            let shift = Vec2::new(-self.orient.x * line.width, dy);
            out.extend(line.contours.iter().map(|command| command.translated(shift)));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::PlacedLine;
    use glyphpath_core::outline::control_bounds;
    use kurbo::Point;

    fn square(x: f64, y: f64, size: f64) -> Vec<ContourCommand> {
        vec![
            ContourCommand::MoveTo(Point::new(x, y)),
            ContourCommand::LineTo(Point::new(x + size, y)),
            ContourCommand::LineTo(Point::new(x + size, y + size)),
            ContourCommand::LineTo(Point::new(x, y + size)),
            ContourCommand::Close,
        ]
    }

    fn block() -> TextBlock {
        TextBlock {
            lines: vec![
                PlacedLine {
                    contours: square(0.0, 0.0, 1000.0),
                    width: 1000.0,
                    baseline: 0.0,
                },
                PlacedLine {
                    contours: square(0.0, -1000.0, 400.0),
                    width: 400.0,
                    baseline: -1000.0,
                },
            ],
            ascent: 1000.0,
            height: 2000.0,
            line_step: 1000.0,
        }
    }

    #[test]
    fn test_center_anchor_centers_each_line() {
        let out = ContourComposer::default().compose(&block());
        assert_eq!(out.len(), 10);

        let top = control_bounds(&out[..5]).unwrap();
        let bottom = control_bounds(&out[5..]).unwrap();
        assert_eq!((top.x0 + top.x1) / 2.0, 0.0);
        assert_eq!((bottom.x0 + bottom.x1) / 2.0, 0.0);
        assert_eq!(top.y1, block().height / 2.0);
    }

    #[test]
    fn test_origin_anchor_leaves_x_alone() {
        let out = ContourComposer::new(Vec2::ZERO).compose(&block());
        assert_eq!(out[0], ContourCommand::MoveTo(Point::new(0.0, -1000.0)));
        assert_eq!(out[5], ContourCommand::MoveTo(Point::new(0.0, -2000.0)));
    }

    #[test]
    fn test_right_anchor_ends_lines_at_zero() {
        let out = ContourComposer::new(Vec2::new(1.0, 1.0)).compose(&block());
        let bottom = control_bounds(&out[5..]).unwrap();
        assert_eq!(bottom.x1, 0.0);
        assert_eq!(out[5], ContourCommand::MoveTo(Point::new(-400.0, 0.0)));
    }

    #[test]
    fn test_empty_block_composes_nothing() {
        assert!(ContourComposer::default().compose(&TextBlock::default()).is_empty());
    }
}
