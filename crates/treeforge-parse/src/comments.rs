//! Comment stripping.
//!
//! Removes block and line comments while keeping one output line per input
//! line, so that later stages can report errors against original line
//! numbers and indentation survives untouched.

use treeforge_core::{IssueKind, StructuralError, StructuralIssue};

/// A source line with its comments removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrippedLine {
    /// 1-based line number.
    pub number: usize,
    /// Original text.
    pub raw: String,
    /// Text with comments removed and trailing whitespace trimmed.
    pub content: String,
    /// Trailing inline comment, if the line had one.
    pub comment: Option<String>,
}

impl StrippedLine {
    /// Check if nothing but whitespace is left.
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }
}

/// Open multi-line comment block.
#[derive(Debug, Clone, Copy)]
enum Block {
    Triple { quote: &'static str, opened: usize },
    C { opened: usize },
    Hash { opened: usize },
}

impl Block {
    fn opened(&self) -> usize {
        match self {
            Self::Triple { opened, .. } | Self::C { opened } | Self::Hash { opened } => *opened,
        }
    }

    fn delimiter(&self) -> &'static str {
        match self {
            Self::Triple { quote, .. } => quote,
            Self::C { .. } => "/*",
            Self::Hash { .. } => "#",
        }
    }
}

/// Comment opener found inside a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Line(usize),
    Block,
    Triple(&'static str),
}

/// Stripped lines plus the block comment left open at end of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentScan {
    /// One entry per input line.
    pub lines: Vec<StrippedLine>,
    /// Issue for a block comment that is never closed, reported at the
    /// line that opened it.
    pub unterminated: Option<StructuralIssue>,
}

/// Strip comments from `text`.
///
/// Fails with the opening line when a block comment is never closed.
pub fn strip_comments(text: &str) -> Result<Vec<StrippedLine>, StructuralError> {
    let scan = scan_comments(text);
    match scan.unterminated {
        Some(issue) => Err(StructuralError::single(issue)),
        None => Ok(scan.lines),
    }
}

/// Strip comments from `text`, keeping an unclosed block as an issue so it
/// can be reported together with other structural problems.
pub fn scan_comments(text: &str) -> CommentScan {
    let mut block: Option<Block> = None;
    let mut out = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let number = index + 1;
        let mut rest = raw;
        let mut content = String::new();
        let mut comment: Option<String> = None;

        loop {
            match block {
                Some(Block::Hash { .. }) => {
                    if is_hash_toggle(raw) {
                        block = None;
                    }
                    break;
                }
                Some(Block::C { .. }) => match rest.find("*/") {
                    Some(end) => {
                        rest = &rest[end + 2..];
                        block = None;
                    }
                    None => break,
                },
                Some(Block::Triple { quote, .. }) => match rest.find(quote) {
                    Some(end) => {
                        rest = &rest[end + quote.len()..];
                        block = None;
                    }
                    None => break,
                },
                None => {
                    if rest.len() == raw.len() && is_hash_toggle(raw) {
                        block = Some(Block::Hash { opened: number });
                        break;
                    }
                    let Some((start, marker)) = find_comment_start(rest) else {
                        content.push_str(rest);
                        break;
                    };
                    content.push_str(&rest[..start]);
                    match marker {
                        Marker::Line(len) => {
                            set_comment(&mut comment, &rest[start + len..]);
                            break;
                        }
                        Marker::Block => {
                            let after = &rest[start + 2..];
                            match after.find("*/") {
                                Some(end) => {
                                    set_comment(&mut comment, &after[..end]);
                                    rest = &after[end + 2..];
                                }
                                None => {
                                    block = Some(Block::C { opened: number });
                                    break;
                                }
                            }
                        }
                        Marker::Triple(quote) => {
                            let after = &rest[start + quote.len()..];
                            match after.find(quote) {
                                Some(end) => rest = &after[end + quote.len()..],
                                None => {
                                    block = Some(Block::Triple {
                                        quote,
                                        opened: number,
                                    });
                                    break;
                                }
                            }
                        }
                    }
                }
            }
        }

        out.push(StrippedLine {
            number,
            raw: raw.to_string(),
            content: content.trim_end().to_string(),
            comment,
        });
    }

    let unterminated = block.map(|open| {
        let opened = open.opened();
        let text = out
            .get(opened - 1)
            .map(|line| line.raw.clone())
            .unwrap_or_default();
        StructuralIssue::new(
            opened,
            text,
            IssueKind::UnterminatedComment {
                delimiter: open.delimiter().to_string(),
            },
        )
    });

    CommentScan {
        lines: out,
        unterminated,
    }
}

/// A line made only of `#` characters, or `#` followed by dashes, toggles a
/// hash-delimited block.
fn is_hash_toggle(line: &str) -> bool {
    let trimmed = line.trim();
    let Some(tail) = trimmed.strip_prefix('#') else {
        return false;
    };
    tail.chars().all(|c| c == '#') || (tail.starts_with("---") && tail.chars().all(|c| c == '-'))
}

fn set_comment(slot: &mut Option<String>, text: &str) {
    let text = text.trim();
    if slot.is_none() && !text.is_empty() {
        *slot = Some(text.to_string());
    }
}

/// Find the first comment opener in `line`.
fn find_comment_start(line: &str) -> Option<(usize, Marker)> {
    for (i, c) in line.char_indices() {
        let tail = &line[i..];
        if tail.starts_with("\"\"\"") {
            return Some((i, Marker::Triple("\"\"\"")));
        }
        if tail.starts_with("'''") {
            return Some((i, Marker::Triple("'''")));
        }
        if tail.starts_with("/*") {
            return Some((i, Marker::Block));
        }
        if tail.starts_with("//") && !is_url_context(line, i) {
            return Some((i, Marker::Line(2)));
        }
        if c == '#' && !is_url_context(line, i) {
            return Some((i, Marker::Line(1)));
        }
    }
    None
}

/// A marker directly after `:` or inside a `scheme://` token is part of a
/// URL-like string, not a comment.
fn is_url_context(line: &str, at: usize) -> bool {
    let before = &line[..at];
    if before.ends_with(':') {
        return true;
    }
    let token_start = before
        .rfind(char::is_whitespace)
        .map(|i| i + 1)
        .unwrap_or(0);
    before[token_start..].contains("://")
}
