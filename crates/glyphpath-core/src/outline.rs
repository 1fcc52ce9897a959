// this_file: crates/glyphpath-core/src/outline.rs

//! Glyph geometry in its two forms.
//!
//! [`RawOutline`] is what a face hands out: contours as point lists where each
//! point is tagged on-curve, conic control or cubic control. [`ContourCommand`]
//! is what the engine hands out: explicit move/line/conic/cubic/close steps.

use std::sync::Arc;

use kurbo::{BezPath, Point, Rect, Vec2};

/// Role of a point inside a native outline contour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointTag {
    OnCurve,
    /// Quadratic (TrueType) control point
    Conic,
    /// Cubic (PostScript) control point
    Cubic,
}

/// A glyph outline as tagged points grouped into contours
///
/// `contour_ends` holds the index of the last point of each contour, so
/// contour `n` spans `contour_ends[n - 1] + 1 ..= contour_ends[n]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawOutline {
    pub points: Vec<Point>,
    pub tags: Vec<PointTag>,
    pub contour_ends: Vec<usize>,
}

impl RawOutline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a point to the contour currently being built
    pub fn push(&mut self, point: Point, tag: PointTag) {
        self.points.push(point);
        self.tags.push(tag);
    }

    /// Finish the current contour; empty contours are dropped
    pub fn end_contour(&mut self) {
        let start = self.contour_ends.last().map_or(0, |end| end + 1);
        if self.points.len() > start {
            self.contour_ends.push(self.points.len() - 1);
        }
    }

    pub fn contour_count(&self) -> usize {
        self.contour_ends.len()
    }

    /// Inclusive `(first, last)` point indices of every contour
    pub fn contours(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let mut start = 0usize;
        self.contour_ends.iter().map(move |&end| {
            let range = (start, end);
            start = end + 1;
            range
        })
    }

    /// Control box over every point, the empty rect at the origin when there are none
    pub fn control_box(&self) -> Rect {
        let mut points = self.points.iter();
        let Some(first) = points.next() else {
            return Rect::ZERO;
        };
        points.fold(Rect::from_points(*first, *first), |rect, p| rect.union_pt(*p))
    }
}

/// What a face returns for one glyph index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawGlyph {
    pub outline: RawOutline,
    /// Pen advance in font units
    pub advance: Vec2,
}

/// One normalized outline step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContourCommand {
    MoveTo(Point),
    LineTo(Point),
    ConicTo { to: Point, control: Point },
    CubicTo { to: Point, control1: Point, control2: Point },
    Close,
}

impl ContourCommand {
    /// The same command moved by `offset`
    pub fn translated(self, offset: Vec2) -> Self {
        self.map_points(|p| p + offset)
    }

    /// Apply `f` to every coordinate the command carries
    pub fn map_points(self, mut f: impl FnMut(Point) -> Point) -> Self {
        match self {
            Self::MoveTo(p) => Self::MoveTo(f(p)),
            Self::LineTo(p) => Self::LineTo(f(p)),
            Self::ConicTo { to, control } => Self::ConicTo {
                to: f(to),
                control: f(control),
            },
            Self::CubicTo {
                to,
                control1,
                control2,
            } => Self::CubicTo {
                to: f(to),
                control1: f(control1),
                control2: f(control2),
            },
            Self::Close => Self::Close,
        }
    }

    /// Every coordinate in the command, controls included
    pub fn points(&self) -> impl Iterator<Item = Point> {
        let (buf, len): ([Point; 3], usize) = match *self {
            Self::MoveTo(p) | Self::LineTo(p) => ([p, Point::ZERO, Point::ZERO], 1),
            Self::ConicTo { to, control } => ([to, control, Point::ZERO], 2),
            Self::CubicTo {
                to,
                control1,
                control2,
            } => ([to, control1, control2], 3),
            Self::Close => ([Point::ZERO; 3], 0),
        };
        buf.into_iter().take(len)
    }
}

/// Control box of a command list, `None` when it carries no coordinates
pub fn control_bounds(commands: &[ContourCommand]) -> Option<Rect> {
    commands
        .iter()
        .flat_map(ContourCommand::points)
        .fold(None, |acc: Option<Rect>, p| match acc {
            Some(rect) => Some(rect.union_pt(p)),
            None => Some(Rect::from_points(p, p)),
        })
}

/// Build a `kurbo::BezPath`; conic segments become quadratic segments
pub fn to_bez_path(commands: &[ContourCommand]) -> BezPath {
    let mut path = BezPath::new();
    for command in commands {
        match *command {
            ContourCommand::MoveTo(p) => path.move_to(p),
            ContourCommand::LineTo(p) => path.line_to(p),
            ContourCommand::ConicTo { to, control } => path.quad_to(control, to),
            ContourCommand::CubicTo {
                to,
                control1,
                control2,
            } => path.curve_to(control1, control2, to),
            ContourCommand::Close => path.close_path(),
        }
    }
    path
}

/// A converted glyph, cached for one sync pass
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub advance: Vec2,
    /// Control box in font units
    pub bounds: Rect,
    pub outline: Arc<[ContourCommand]>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contours_split_on_ends() {
        let mut outline = RawOutline::new();
        outline.push(Point::new(0.0, 0.0), PointTag::OnCurve);
        outline.push(Point::new(1.0, 0.0), PointTag::OnCurve);
        outline.end_contour();
        outline.end_contour();
        outline.push(Point::new(5.0, 5.0), PointTag::OnCurve);
        outline.push(Point::new(6.0, -2.0), PointTag::Conic);
        outline.push(Point::new(7.0, 5.0), PointTag::OnCurve);
        outline.end_contour();

        let contours: Vec<_> = outline.contours().collect();
        assert_eq!(contours, vec![(0, 1), (2, 4)]);
        assert_eq!(outline.control_box(), Rect::new(0.0, -2.0, 7.0, 5.0));
    }

    #[test]
    fn test_empty_outline_has_zero_box() {
        assert_eq!(RawOutline::new().control_box(), Rect::ZERO);
        assert_eq!(control_bounds(&[ContourCommand::Close]), None);
    }

    #[test]
    fn test_translate_moves_controls_too() {
        let cmd = ContourCommand::CubicTo {
            to: Point::new(1.0, 1.0),
            control1: Point::new(0.0, 1.0),
            control2: Point::new(1.0, 0.0),
        };
        let moved = cmd.translated(Vec2::new(10.0, -1.0));
        let points: Vec<_> = moved.points().collect();
        assert_eq!(
            points,
            vec![
                Point::new(11.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(11.0, -1.0)
            ]
        );
    }

    #[test]
    fn test_bez_path_keeps_segment_count() {
        let commands = [
            ContourCommand::MoveTo(Point::ZERO),
            ContourCommand::ConicTo {
                to: Point::new(2.0, 0.0),
                control: Point::new(1.0, 1.0),
            },
            ContourCommand::LineTo(Point::new(2.0, -1.0)),
            ContourCommand::Close,
        ];
        assert_eq!(to_bez_path(&commands).elements().len(), 4);
    }
}
