//! Command-line definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use glyphpath::types::{TextDirection, TextStyle};

/// Glyphpath - turn text into vector outlines
#[derive(Parser, Debug)]
#[command(name = "glyphpath")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show shapers, font search directories and system fonts
    #[command(alias = "i")]
    Info(InfoArgs),

    /// Lay out text and print its contours
    #[command(alias = "o")]
    Outline(Box<OutlineArgs>),
}

#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Also count the faces in the system font database
    #[arg(long)]
    pub fonts: bool,
}

#[derive(Parser, Debug)]
pub struct OutlineArgs {
    /// Text to lay out
    #[arg(required_unless_present = "text_file")]
    pub text: Option<String>,

    /// Read the text from a file; invalid UTF-8 sequences are skipped
    #[arg(short = 'T', long = "text-file", conflicts_with = "text")]
    pub text_file: Option<PathBuf>,

    /// Font family, or a font file name
    #[arg(short = 'f', long, default_value = "Sans Serif")]
    pub family: String,

    #[arg(long, value_enum, default_value_t = StyleArg::Normal)]
    pub style: StyleArg,

    /// Weight, 100 (thin) to 1000 (ultra heavy)
    #[arg(short = 'w', long, default_value_t = 400, value_parser = clap::value_parser!(i32).range(1..=1000))]
    pub weight: i32,

    #[arg(short = 'd', long, value_enum, default_value_t = DirectionArg::Auto)]
    pub direction: DirectionArg,

    /// Document the text belongs to; its directory is searched for fonts
    #[arg(long)]
    pub document: Option<PathBuf>,

    /// Output size of one em
    #[arg(short = 's', long, default_value_t = 1000.0)]
    pub size: f64,

    /// Horizontal spacing multiplier
    #[arg(long, default_value_t = 1.0)]
    pub compress: f64,

    /// Vertical spacing multiplier
    #[arg(long, default_value_t = 1.0)]
    pub vcompress: f64,

    /// Anchor as a fraction of line width and block height, e.g. 0.5,0.5
    #[arg(long, default_value = "0.5,0.5", value_parser = parse_pair)]
    pub orient: (f64, f64),

    #[arg(long = "no-kerning")]
    pub no_kerning: bool,

    #[arg(long = "grid-fit")]
    pub grid_fit: bool,

    #[arg(long, value_enum, default_value_t = ShaperArg::None)]
    pub shaper: ShaperArg,

    /// Extra font directory, probed before the system directories
    #[arg(long = "font-dir")]
    pub font_dirs: Vec<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Write to a file instead of stdout
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StyleArg {
    Normal,
    Oblique,
    Italic,
}

impl From<StyleArg> for TextStyle {
    fn from(value: StyleArg) -> Self {
        match value {
            StyleArg::Normal => TextStyle::Normal,
            StyleArg::Oblique => TextStyle::Oblique,
            StyleArg::Italic => TextStyle::Italic,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DirectionArg {
    Auto,
    Ltr,
    Rtl,
}

impl From<DirectionArg> for TextDirection {
    fn from(value: DirectionArg) -> Self {
        match value {
            DirectionArg::Auto => TextDirection::Auto,
            DirectionArg::Ltr => TextDirection::Ltr,
            DirectionArg::Rtl => TextDirection::Rtl,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ShaperArg {
    /// One glyph per character
    None,
    /// Harfrust
    Hr,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Svg,
}

fn parse_pair(value: &str) -> Result<(f64, f64), String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got '{value}'"))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<f64>()
            .map_err(|err| format!("'{part}': {err}"))
    };
    Ok((parse(x)?, parse(y)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_outline_defaults() {
        let cli = Cli::try_parse_from(["glyphpath", "outline", "Hi"]).unwrap();
        let Commands::Outline(args) = cli.command else {
            panic!("expected the outline command");
        };
        assert_eq!(args.text.as_deref(), Some("Hi"));
        assert_eq!(args.family, "Sans Serif");
        assert_eq!(args.orient, (0.5, 0.5));
        assert_eq!(args.format, OutputFormat::Json);
        assert!(!args.no_kerning);
    }

    #[test]
    fn test_outline_needs_text() {
        assert!(Cli::try_parse_from(["glyphpath", "outline"]).is_err());
        assert!(Cli::try_parse_from(["glyphpath", "outline", "--text-file", "a.txt"]).is_ok());
    }

    #[test]
    fn test_parse_pair() {
        assert_eq!(parse_pair("0, 1").unwrap(), (0.0, 1.0));
        assert!(parse_pair("0.5").is_err());
        assert!(parse_pair("a,b").is_err());
    }
}
