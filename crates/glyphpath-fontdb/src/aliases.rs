//! Family names to probable file names
//!
//! Common families ship under short, vendor-specific file stems (`arialbd`,
//! `timesbi`, `luxisri`). The tables below turn a requested family, slant and
//! weight into the stems worth probing on disk, without extension or
//! directory.

use glyphpath_core::types::{TextStyle, TextWeight};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SuffixStyle {
    None,
    /// `b` when bold, then `i` when slanted, else `d` when bold
    BiBd,
    /// Like `BiBd` with a trailing `t` on non-bold slanted faces
    BiBdIt,
    /// `b` or `r`, then `i` when slanted
    BiRi,
}

impl SuffixStyle {
    fn suffix(self, style: TextStyle, weight: TextWeight) -> String {
        let bold = weight.is_bold();
        let slanted = style.is_slanted();
        let mut suffix = String::new();

        match self {
            Self::None => {},
            Self::BiBd => {
                if bold {
                    suffix.push('b');
                }
                if slanted {
                    suffix.push('i');
                } else if bold {
                    suffix.push('d');
                }
            },
            Self::BiBdIt => {
                if bold {
                    suffix.push('b');
                }
                if slanted {
                    suffix.push('i');
                    if !bold {
                        suffix.push('t');
                    }
                } else if bold {
                    suffix.push('d');
                }
            },
            Self::BiRi => {
                suffix.push(if bold { 'b' } else { 'r' });
                if slanted {
                    suffix.push('i');
                }
            },
        }
        suffix
    }
}

/// Long-form suffix used by vendors that spell the variant out
fn alternative_suffix(style: TextStyle, weight: TextWeight) -> &'static str {
    match (weight.is_bold(), style) {
        (true, TextStyle::Italic) => " Bold Italic",
        (true, TextStyle::Oblique) => " Bold Oblique",
        (true, TextStyle::Normal) => " Bold",
        (false, TextStyle::Italic) => " Italic",
        (false, TextStyle::Oblique) => " Oblique",
        (false, TextStyle::Normal) => "",
    }
}

struct FileNameEntry {
    alias: &'static str,
    stem: &'static str,
    alternative_stem: Option<&'static str>,
    suffix_style: SuffixStyle,
}

const SPECIAL_FAMILIES: &[(&str, &[&str])] = &[
    ("sans serif", &["arial", "luxi sans", "helvetica"]),
    ("serif", &["times new roman", "luxi serif"]),
    ("comic", &["comic sans"]),
    ("courier", &["courier new"]),
    ("times", &["times new roman"]),
];

const FILE_NAMES: &[FileNameEntry] = &[
    FileNameEntry {
        alias: "arial black",
        stem: "ariblk",
        alternative_stem: None,
        suffix_style: SuffixStyle::None,
    },
    FileNameEntry {
        alias: "arial",
        stem: "arial",
        alternative_stem: Some("Arial"),
        suffix_style: SuffixStyle::BiBd,
    },
    FileNameEntry {
        alias: "comic sans",
        stem: "comic",
        alternative_stem: None,
        suffix_style: SuffixStyle::BiBd,
    },
    FileNameEntry {
        alias: "courier new",
        stem: "cour",
        alternative_stem: Some("Courier New"),
        suffix_style: SuffixStyle::BiBd,
    },
    FileNameEntry {
        alias: "times new roman",
        stem: "times",
        alternative_stem: Some("Times New Roman"),
        suffix_style: SuffixStyle::BiBd,
    },
    FileNameEntry {
        alias: "trebuchet",
        stem: "trebuc",
        alternative_stem: Some("Trebuchet MS"),
        suffix_style: SuffixStyle::BiBdIt,
    },
    FileNameEntry {
        alias: "luxi sans",
        stem: "luxis",
        alternative_stem: None,
        suffix_style: SuffixStyle::BiRi,
    },
    FileNameEntry {
        alias: "luxi serif",
        stem: "luxir",
        alternative_stem: None,
        suffix_style: SuffixStyle::BiRi,
    },
    FileNameEntry {
        alias: "luxi mono",
        stem: "luxim",
        alternative_stem: None,
        suffix_style: SuffixStyle::BiRi,
    },
    FileNameEntry {
        alias: "luxi",
        stem: "luxim",
        alternative_stem: None,
        suffix_style: SuffixStyle::BiRi,
    },
];

/// Bare file names that may hold `family` at this slant and weight
///
/// Matching is case-insensitive. Unknown families yield an empty list; the
/// resolver then falls back to the family name itself.
pub fn candidate_filenames(family: &str, style: TextStyle, weight: TextWeight) -> Vec<String> {
    let family = family.trim().to_lowercase();

    let families: Vec<&str> = SPECIAL_FAMILIES
        .iter()
        .find(|(alias, _)| *alias == family)
        .map(|(_, options)| options.to_vec())
        .unwrap_or_else(|| vec![family.as_str()]);

    let mut names = Vec::new();
    for candidate in families {
        for entry in FILE_NAMES.iter().filter(|entry| entry.alias == candidate) {
            push_unique(
                &mut names,
                format!("{}{}", entry.stem, entry.suffix_style.suffix(style, weight)),
            );
            let alternative = entry.alternative_stem.unwrap_or(entry.stem);
            push_unique(
                &mut names,
                format!("{alternative}{}", alternative_suffix(style, weight)),
            );
        }
    }
    names
}

fn push_unique(names: &mut Vec<String>, name: String) {
    if !names.contains(&name) {
        names.push(name);
    }
}
