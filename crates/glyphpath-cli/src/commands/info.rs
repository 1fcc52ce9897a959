//! The `info` command

use glyphpath::fontdb::{search::FONT_PATH_ENV, FontSearchConfig, FontdbMatcher};

use crate::cli::InfoArgs;

pub fn run(args: &InfoArgs) -> anyhow::Result<()> {
    println!("glyphpath v{}", env!("CARGO_PKG_VERSION"));
    println!();

    println!("Shapers:");
    println!("  none              - One glyph per character through the cmap");
    #[cfg(feature = "shaping-hr")]
    println!("  hr                - Harfrust (ligatures, contextual forms)");
    println!();

    let config = FontSearchConfig::from_env();
    println!("Font search order (extend with {FONT_PATH_ENV}):");
    for dir in config.search_dirs(None) {
        let shown = if dir.path.as_os_str().is_empty() {
            "<working directory>".to_string()
        } else {
            dir.path.display().to_string()
        };
        println!("  {shown:<40} {:?}", dir.origin);
    }
    println!("  default family: {}", config.default_family);

    if args.fonts {
        println!();
        let matcher = FontdbMatcher::new();
        println!("System font database: {} faces", matcher.face_count());
    }

    Ok(())
}
