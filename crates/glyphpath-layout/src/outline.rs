// this_file: crates/glyphpath-layout/src/outline.rs

//! Tagged outline points to contour commands.
//!
//! A face hands out contours as point lists where every point is on-curve, a
//! quadratic control or a cubic control. Consecutive quadratic controls imply
//! an on-curve point halfway between them, and a contour may start on a
//! control point. The converter makes all of that explicit.

use std::collections::HashMap;
use std::sync::Arc;

use kurbo::Point;

use glyphpath_core::{
    outline::{ContourCommand, Glyph, PointTag, RawOutline},
    traits::Face,
    types::GlyphId,
};

/// Why conversion stopped early
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutlineDefect {
    /// Contour starts on a cubic control; the contour was skipped
    CubicStart { contour: usize },
    /// Contour ends on a cubic control with no partner; the contour was skipped
    CubicEnd { contour: usize },
    /// A tag sequence no pattern covers; conversion stopped at `point`
    UnexpectedTag { contour: usize, point: usize },
}

/// Commands for a whole outline plus what went wrong on the way
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConvertedOutline {
    pub commands: Vec<ContourCommand>,
    pub defects: Vec<OutlineDefect>,
}

/// Convert every contour of `raw`
///
/// A contour that starts or ends on an isolated cubic control is skipped and
/// conversion goes on. Any other unexpected tag sequence stops the whole glyph: the open
/// contour is closed and the commands gathered so far are returned.
pub fn convert_outline(raw: &RawOutline) -> ConvertedOutline {
    let mut out = ConvertedOutline::default();

    for (contour, (first, last)) in raw.contours().enumerate() {
        if last >= raw.points.len() || first > last {
            break;
        }
        match convert_contour(raw, contour, first, last, &mut out.commands) {
            Ok(()) => {},
            Err(defect @ (OutlineDefect::CubicStart { .. } | OutlineDefect::CubicEnd { .. })) => {
                log::warn!("OutlineConverter: skipping contour {contour} ({defect:?})");
                out.defects.push(defect);
            },
            Err(defect) => {
                log::warn!("OutlineConverter: malformed outline ({defect:?}), glyph truncated");
                out.commands.push(ContourCommand::Close);
                out.defects.push(defect);
                break;
            },
        }
    }

    out
}

fn convert_contour(
    raw: &RawOutline,
    contour: usize,
    first: usize,
    last: usize,
    commands: &mut Vec<ContourCommand>,
) -> Result<(), OutlineDefect> {
    let points = &raw.points;
    let tags = &raw.tags;

    let isolated_cubic_end =
        tags[last] == PointTag::Cubic && (last == first || tags[last - 1] != PointTag::Cubic);

    let (start, mut index, end) = match (tags[first], tags[last]) {
        (PointTag::Cubic, _) => return Err(OutlineDefect::CubicStart { contour }),
        (PointTag::Conic, PointTag::Cubic) => return Err(OutlineDefect::CubicEnd { contour }),
        _ if isolated_cubic_end => return Err(OutlineDefect::CubicEnd { contour }),
        (PointTag::OnCurve, _) => (points[first], first + 1, last),
        // Start on the trailing on-curve point; it is not visited again
        (PointTag::Conic, PointTag::OnCurve) => (points[last], first, last - 1),
        (PointTag::Conic, _) => (points[first].midpoint(points[last]), first, last),
    };

    commands.push(ContourCommand::MoveTo(start));

    while index <= end {
        match tags[index] {
            PointTag::OnCurve => {
                commands.push(ContourCommand::LineTo(points[index]));
                index += 1;
            },
            PointTag::Conic => {
                let mut control = points[index];
                index += 1;
                loop {
                    if index > end {
                        commands.push(ContourCommand::ConicTo { to: start, control });
                        break;
                    }
                    match tags[index] {
                        PointTag::OnCurve => {
                            commands.push(ContourCommand::ConicTo {
                                to: points[index],
                                control,
                            });
                            index += 1;
                            break;
                        },
                        PointTag::Conic => {
                            let implied = control.midpoint(points[index]);
                            commands.push(ContourCommand::ConicTo { to: implied, control });
                            control = points[index];
                            index += 1;
                        },
                        PointTag::Cubic => {
                            return Err(OutlineDefect::UnexpectedTag {
                                contour,
                                point: index,
                            })
                        },
                    }
                }
            },
            PointTag::Cubic => {
                if index + 1 > end || tags[index + 1] != PointTag::Cubic {
                    return Err(OutlineDefect::UnexpectedTag {
                        contour,
                        point: index,
                    });
                }
                let (control1, control2) = (points[index], points[index + 1]);
                index += 2;

                if index > end {
                    commands.push(ContourCommand::CubicTo {
                        to: start,
                        control1,
                        control2,
                    });
                    break;
                }
                if tags[index] != PointTag::OnCurve {
                    return Err(OutlineDefect::UnexpectedTag {
                        contour,
                        point: index,
                    });
                }
                commands.push(ContourCommand::CubicTo {
                    to: points[index],
                    control1,
                    control2,
                });
                index += 1;
            },
        }
    }

    commands.push(ContourCommand::Close);
    Ok(())
}

/// Builds glyphs from one face at one grid-fit setting
#[derive(Debug, Clone, Copy, Default)]
pub struct OutlineConverter {
    grid_fit: bool,
}

impl OutlineConverter {
    pub fn new(grid_fit: bool) -> Self {
        Self { grid_fit }
    }

    pub fn grid_fit(&self) -> bool {
        self.grid_fit
    }

    /// Load and convert one glyph; `None` when the face cannot load it
    pub fn build_glyph(&self, face: &dyn Face, glyph_id: GlyphId) -> Option<Glyph> {
        let Some(raw) = face.load_glyph(glyph_id, self.grid_fit) else {
            log::debug!("OutlineConverter: glyph {glyph_id} could not be loaded");
            return None;
        };

        let converted = convert_outline(&raw.outline);
        Some(Glyph {
            advance: raw.advance,
            bounds: raw.outline.control_box(),
            outline: Arc::from(converted.commands),
        })
    }
}

/// Converted glyphs for one sync pass, keyed by glyph index
#[derive(Debug, Clone, Default)]
pub struct OutlineCache {
    glyphs: HashMap<GlyphId, Glyph>,
    grid_fit: bool,
}

impl OutlineCache {
    /// Convert every distinct glyph referenced by `lines`, each exactly once
    pub fn build(face: &dyn Face, lines: &[Vec<GlyphId>], grid_fit: bool) -> Self {
        let converter = OutlineConverter::new(grid_fit);
        let mut glyphs = HashMap::new();
        let mut failed = Vec::new();

        for &glyph_id in lines.iter().flatten() {
            if glyphs.contains_key(&glyph_id) || failed.contains(&glyph_id) {
                continue;
            }
            match converter.build_glyph(face, glyph_id) {
                Some(glyph) => {
                    glyphs.insert(glyph_id, glyph);
                },
                None => failed.push(glyph_id),
            }
        }

        Self { glyphs, grid_fit }
    }

    pub fn get(&self, glyph_id: GlyphId) -> Option<&Glyph> {
        self.glyphs.get(&glyph_id)
    }

    pub fn contains(&self, glyph_id: GlyphId) -> bool {
        self.glyphs.contains_key(&glyph_id)
    }

    pub fn grid_fit(&self) -> bool {
        self.grid_fit
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}
