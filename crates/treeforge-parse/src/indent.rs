//! Indentation and guide classification.
//!
//! Decides how one depth level is spelled in the input (spaces, tabs, guide
//! glyphs or a dash prefix) and turns every content-bearing line into a
//! `(depth, content)` pair.

use treeforge_core::{DEFAULT_INDENT_WIDTH, ParseConfig, UNICODE_GUIDES};

use crate::comments::StrippedLine;

/// How one depth level is written in a particular input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndentProfile {
    /// Literal prefix of the first indented line.
    pub unit: String,
    /// Column width of one depth level.
    pub width: usize,
    /// Whether that prefix contained guide glyphs.
    pub uses_guides: bool,
}

impl Default for IndentProfile {
    fn default() -> Self {
        Self {
            unit: " ".repeat(DEFAULT_INDENT_WIDTH),
            width: DEFAULT_INDENT_WIDTH,
            uses_guides: false,
        }
    }
}

/// A content-bearing line with its computed depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLine {
    /// 1-based line number.
    pub number: usize,
    /// Original text.
    pub raw: String,
    /// Zero-based nesting level.
    pub depth: usize,
    /// Column width of the stripped prefix.
    pub indent: usize,
    /// Whether the prefix contained guide glyphs or dash markers.
    pub guided: bool,
    /// Text after the prefix.
    pub content: String,
    /// Trailing comment kept for display.
    pub hint: Option<String>,
}

/// Leading part of a line before its name.
struct Prefix<'a> {
    text: &'a str,
    width: usize,
    guided: bool,
    /// Depth given directly by a dash/pipe run.
    marks: Option<usize>,
    rest: &'a str,
}

/// Measure the indentation and guide prefix of `content`.
///
/// Box-drawing glyphs always belong to the prefix. A run of ASCII glyphs
/// (`| + \` - \\`) only does when whitespace follows it, so names such as
/// `+page.svelte` or `-config` keep their first character.
fn measure<'a>(content: &'a str, config: &ParseConfig) -> Prefix<'a> {
    let mut width = 0;
    let mut guided = false;
    let mut end = content.len();
    let mut pending = 0;
    let mut pending_start = None;

    for (i, c) in content.char_indices() {
        if c.is_whitespace() {
            guided |= pending > 0;
            width += pending + if c == '\t' { config.tab_size } else { 1 };
            pending = 0;
            pending_start = None;
        } else if config.detect_guides && config.style.is_guide(c) {
            if UNICODE_GUIDES.contains(&c) {
                guided = true;
                width += pending + 1;
                pending = 0;
                pending_start = None;
            } else {
                pending += 1;
                pending_start.get_or_insert(i);
            }
        } else {
            end = pending_start.unwrap_or(i);
            pending = 0;
            break;
        }
    }
    if pending > 0 {
        guided = true;
        width += pending;
    }

    let text = &content[..end];
    let rest = &content[end..];

    if !config.detect_guides {
        let count = rest.chars().take_while(|c| matches!(c, '-' | '|')).count();
        if count > 0 {
            return Prefix {
                text: &rest[..count],
                width,
                guided: true,
                marks: Some(count),
                rest: rest[count..].trim_start(),
            };
        }
    }

    Prefix {
        text,
        width,
        guided,
        marks: None,
        rest,
    }
}

/// Compute the indent profile and per-line depths.
///
/// Lines left empty by comment or guide stripping are dropped.
pub fn classify(
    lines: &[StrippedLine],
    config: &ParseConfig,
) -> (IndentProfile, Vec<ClassifiedLine>) {
    let mut profile: Option<IndentProfile> = None;
    let mut measured = Vec::new();

    for line in lines {
        let prefix = measure(&line.content, config);
        if prefix.rest.trim().is_empty() {
            continue;
        }
        if profile.is_none() && (prefix.width > 0 || prefix.marks.is_some()) {
            profile = Some(match prefix.marks {
                Some(_) => IndentProfile {
                    unit: prefix.text.chars().take(1).collect(),
                    width: 1,
                    uses_guides: false,
                },
                None => IndentProfile {
                    unit: prefix.text.to_string(),
                    width: prefix.width,
                    uses_guides: prefix.guided,
                },
            });
        }
        measured.push((
            line,
            prefix.width,
            prefix.guided,
            prefix.marks,
            prefix.rest.trim().to_string(),
        ));
    }

    let mut profile = profile.unwrap_or_default();
    if let Some(size) = config.indent_size {
        profile.width = size;
    }
    let unit = profile.width.max(1);

    let classified = measured
        .into_iter()
        .map(|(line, width, guided, marks, content)| ClassifiedLine {
            number: line.number,
            raw: line.raw.clone(),
            depth: marks.unwrap_or(width / unit),
            indent: width,
            guided,
            content,
            hint: if config.preserve_hints {
                line.comment.clone()
            } else {
                None
            },
        })
        .collect();

    (profile, classified)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comments::strip_comments;
    use treeforge_core::TreeStyle;

    fn depths(text: &str, config: &ParseConfig) -> Vec<(usize, String)> {
        let lines = strip_comments(text).unwrap();
        classify(&lines, config)
            .1
            .into_iter()
            .map(|line| (line.depth, line.content))
            .collect()
    }

    fn pairs(items: &[(usize, &str)]) -> Vec<(usize, String)> {
        items.iter().map(|(d, s)| (*d, s.to_string())).collect()
    }

    #[test]
    fn test_space_indentation() {
        let config = ParseConfig::default();
        assert_eq!(
            depths("root/\n  apps/\n    web/\n      package.json", &config),
            pairs(&[(0, "root/"), (1, "apps/"), (2, "web/"), (3, "package.json")])
        );
    }

    #[test]
    fn test_inferred_unit_from_first_indent() {
        let lines = strip_comments("root/\n    src/\n        main.rs").unwrap();
        let (profile, classified) = classify(&lines, &ParseConfig::default());
        assert_eq!(profile.width, 4);
        assert_eq!(profile.unit, "    ");
        assert!(!profile.uses_guides);
        assert_eq!(classified[2].depth, 2);
    }

    #[test]
    fn test_fixed_indent_size() {
        let config = ParseConfig::builder().indent_size(Some(2)).build().unwrap();
        assert_eq!(
            depths("root/\n    src/", &config),
            pairs(&[(0, "root/"), (2, "src/")])
        );
    }

    #[test]
    fn test_unicode_guides() {
        let text = "project/\n├─ src/\n│  └─ index.ts";
        let lines = strip_comments(text).unwrap();
        let (profile, classified) = classify(&lines, &ParseConfig::default());
        assert!(profile.uses_guides);
        assert_eq!(profile.width, 3);
        let got: Vec<_> = classified.iter().map(|l| (l.depth, l.content.as_str())).collect();
        assert_eq!(got, vec![(0, "project/"), (1, "src/"), (2, "index.ts")]);
    }

    #[test]
    fn test_ascii_guides() {
        let text = "app\n|-- src\n|   `-- main.c\n`-- Makefile";
        assert_eq!(
            depths(text, &ParseConfig::default()),
            pairs(&[(0, "app"), (1, "src"), (2, "main.c"), (1, "Makefile")])
        );
    }

    #[test]
    fn test_glyph_led_names_are_kept() {
        let text = "routes/\n  +page.svelte\n  -config\n|-- +layout.svelte\n├─-flag";
        let lines = strip_comments(text).unwrap();
        let (profile, classified) = classify(&lines, &ParseConfig::default());
        assert!(!profile.uses_guides);
        let got: Vec<_> = classified
            .iter()
            .map(|l| (l.depth, l.content.as_str(), l.guided))
            .collect();
        assert_eq!(
            got,
            vec![
                (0, "routes/", false),
                (1, "+page.svelte", false),
                (1, "-config", false),
                (2, "+layout.svelte", true),
                (1, "-flag", true),
            ]
        );
    }

    #[test]
    fn test_guide_only_lines_dropped() {
        let text = "root/\n├── a/\n│\n│   └── b.txt\n│";
        assert_eq!(
            depths(text, &ParseConfig::default()),
            pairs(&[(0, "root/"), (1, "a/"), (2, "b.txt")])
        );
    }

    #[test]
    fn test_tabs_use_tab_size() {
        let config = ParseConfig::builder().indent_size(Some(4)).build().unwrap();
        assert_eq!(
            depths("root\n\tsrc\n\t\tlib.rs", &config),
            pairs(&[(0, "root"), (1, "src"), (2, "lib.rs")])
        );
    }

    #[test]
    fn test_dash_dialect_without_guides() {
        let config = ParseConfig::builder()
            .detect_guides(false)
            .style(TreeStyle::Plain)
            .build()
            .unwrap();
        assert_eq!(
            depths("root\n- src\n-- main.rs\n- docs", &config),
            pairs(&[(0, "root"), (1, "src"), (2, "main.rs"), (1, "docs")])
        );
    }

    #[test]
    fn test_hints_follow_config() {
        let lines = strip_comments("root/\n  a.txt # first file").unwrap();
        let (_, kept) = classify(&lines, &ParseConfig::default());
        assert_eq!(kept[1].hint.as_deref(), Some("first file"));

        let config = ParseConfig::builder().preserve_hints(false).build().unwrap();
        let (_, dropped) = classify(&lines, &config);
        assert_eq!(dropped[1].hint, None);
    }

    #[test]
    fn test_indented_root_is_measured() {
        let lines = strip_comments("  root/\n    a").unwrap();
        let (_, classified) = classify(&lines, &ParseConfig::default());
        assert_eq!(classified[0].indent, 2);
        assert_eq!(classified[0].depth, 1);
    }
}
