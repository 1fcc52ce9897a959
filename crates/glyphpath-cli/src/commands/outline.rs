//! The `outline` command: text in, contours out as JSON or SVG

use std::fs;
use std::io::Write;
use std::sync::Arc;

use anyhow::{bail, Context};
use kurbo::{Point, Rect, Vec2};
use serde::Serialize;

use glyphpath::{
    fontdb::FontSearchConfig,
    layout::TextBlock,
    prelude::*,
    unicode::decode_utf8_lossy_skip,
    ParamValue,
};

use crate::cli::{OutlineArgs, OutputFormat, ShaperArg};

/// One contour command, in layer space
#[derive(Debug, Serialize, PartialEq)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum CommandRecord {
    Move { to: [f64; 2] },
    Line { to: [f64; 2] },
    Conic { to: [f64; 2], control: [f64; 2] },
    Cubic { to: [f64; 2], control1: [f64; 2], control2: [f64; 2] },
    Close,
}

impl From<ContourCommand> for CommandRecord {
    fn from(command: ContourCommand) -> Self {
        let xy = |p: Point| [p.x, p.y];
        match command {
            ContourCommand::MoveTo(p) => Self::Move { to: xy(p) },
            ContourCommand::LineTo(p) => Self::Line { to: xy(p) },
            ContourCommand::ConicTo { to, control } => Self::Conic {
                to: xy(to),
                control: xy(control),
            },
            ContourCommand::CubicTo {
                to,
                control1,
                control2,
            } => Self::Cubic {
                to: xy(to),
                control1: xy(control1),
                control2: xy(control2),
            },
            ContourCommand::Close => Self::Close,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LineRecord {
    pub width: f64,
    pub baseline: f64,
}

/// Everything the `json` format prints
#[derive(Debug, Serialize)]
pub struct OutlineReport {
    pub text: String,
    pub family: String,
    pub font: Option<String>,
    pub shaper: &'static str,
    pub units_per_em: Option<u16>,
    /// `[x0, y0, x1, y1]` in layer space
    pub bounds: [f64; 4],
    /// Line metrics in font units
    pub lines: Vec<LineRecord>,
    pub ascent: f64,
    pub height: f64,
    pub commands: Vec<CommandRecord>,
}

pub fn run(args: &OutlineArgs) -> anyhow::Result<()> {
    let text = read_text(args)?;
    let context = Arc::new(build_context(args)?);
    let layer = TextLayer::new(context.clone());

    layer.set_param("text", text.as_str())?;
    layer.set_param("family", args.family.as_str())?;
    layer.set_param("style", ParamValue::from(TextStyle::from(args.style)))?;
    layer.set_param("weight", args.weight)?;
    layer.set_param("direction", ParamValue::from(TextDirection::from(args.direction)))?;
    layer.set_param("size", Vec2::new(args.size, args.size))?;
    layer.set_param("orient", Vec2::new(args.orient.0, args.orient.1))?;
    layer.set_param("compress", args.compress)?;
    layer.set_param("vcompress", args.vcompress)?;
    layer.set_param("use_kerning", !args.no_kerning)?;
    layer.set_param("grid_fit", args.grid_fit)?;
    layer.set_document(args.document.as_deref());

    let geometry = layer.sync();
    let face = layer.face();
    if face.is_none() {
        log::warn!("no font found for '{}', output is empty", args.family);
    }

    let rendered = match args.format {
        OutputFormat::Json => {
            let block = layer.block();
            let report = OutlineReport {
                text,
                family: args.family.clone(),
                font: match layer.get_param("font")? {
                    ParamValue::String(font) if !font.is_empty() => Some(font),
                    _ => None,
                },
                shaper: context.shaper().name(),
                units_per_em: face.as_ref().map(|resolved| resolved.face.units_per_em()),
                bounds: rect_array(geometry.bounds()),
                lines: line_records(&block),
                ascent: block.ascent,
                height: block.height,
                commands: geometry
                    .world_contours()
                    .into_iter()
                    .map(CommandRecord::from)
                    .collect(),
            };
            serde_json::to_string_pretty(&report)?
        },
        OutputFormat::Svg => svg_document(&geometry),
    };

    match &args.output {
        Some(path) => fs::write(path, rendered).with_context(|| format!("writing {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{rendered}")?;
        },
    }
    Ok(())
}

fn read_text(args: &OutlineArgs) -> anyhow::Result<String> {
    if let Some(path) = &args.text_file {
        let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        return Ok(decode_utf8_lossy_skip(&bytes));
    }
    match &args.text {
        Some(text) => Ok(text.clone()),
        None => bail!("no text given"),
    }
}

fn build_context(args: &OutlineArgs) -> anyhow::Result<TextContext> {
    let mut config = FontSearchConfig::from_env();
    config.extra_dirs.extend(args.font_dirs.iter().cloned());

    let builder = TextContext::builder().search_config(config);
    let builder = match args.shaper {
        ShaperArg::None => builder,
        #[cfg(feature = "shaping-hr")]
        ShaperArg::Hr => builder.harfrust(),
        #[cfg(not(feature = "shaping-hr"))]
        ShaperArg::Hr => bail!("harfrust shaping not compiled in (enable the shaping-hr feature)"),
    };
    Ok(builder.build())
}

fn rect_array(rect: Rect) -> [f64; 4] {
    [rect.x0, rect.y0, rect.x1, rect.y1]
}

fn line_records(block: &TextBlock) -> Vec<LineRecord> {
    block
        .lines
        .iter()
        .map(|line| LineRecord {
            width: line.width,
            baseline: line.baseline,
        })
        .collect()
}

/// Standalone SVG; y is flipped so the text reads upright
pub fn svg_document(geometry: &TextGeometry) -> String {
    let bounds = geometry.bounds();
    let path = geometry.to_bez_path().to_svg();
    format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}">"#,
            "\n",
            r#"  <path transform="scale(1,-1)" d="{}"/>"#,
            "\n</svg>"
        ),
        bounds.x0,
        -bounds.y1,
        bounds.width().max(1.0),
        bounds.height().max(1.0),
        path
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_records_tag_their_op() {
        let record = CommandRecord::from(ContourCommand::ConicTo {
            to: Point::new(1.0, 2.0),
            control: Point::new(3.0, 4.0),
        });
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["op"], "conic");
        assert_eq!(json["control"][1], 4.0);

        let close = serde_json::to_value(CommandRecord::from(ContourCommand::Close)).unwrap();
        assert_eq!(close, serde_json::json!({"op": "close"}));
    }

    #[test]
    fn test_svg_of_empty_geometry_has_empty_path() {
        let svg = svg_document(&TextGeometry::empty(Point::ORIGIN));
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"d="""#));
    }
}
