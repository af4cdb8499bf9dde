//! Conflict resolution strategies.
//!
//! Every function here is pure: candidates are checked through an
//! `is_taken` callback and nothing is written back. The validator decides
//! which resolved paths get recorded into the session.

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use regex::Regex;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use treeforge_core::{
    ConflictStrategy, HASH_PREFIX_LEN, HashAlgorithm, PATH_SEPARATOR, ResolutionMode,
    ResolveRequest, ValidationRules, ViolationCode, split_path,
};

/// Directory segments are cut down to this many characters by `shorten`.
const SHORTENED_SEGMENT_LEN: usize = 3;

/// Split a name into base name and extension.
///
/// The extension is the text after the last `.`, unless that dot starts the
/// name (`.gitignore` has no extension).
pub fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(0) | None => (name, None),
        Some(idx) => (&name[..idx], Some(&name[idx + 1..])),
    }
}

/// Break a path into directory prefix (with trailing `/`), base name and
/// extension (with leading `.`).
fn decompose(path: &str, preserve_extension: bool) -> (String, &str, String) {
    let (dir, name) = split_path(path);
    let prefix = dir.map(|d| format!("{d}{PATH_SEPARATOR}")).unwrap_or_default();
    if !preserve_extension {
        return (prefix, name, String::new());
    }
    match split_extension(name) {
        (base, Some(ext)) => (prefix, base, format!(".{ext}")),
        (base, None) => (prefix, base, String::new()),
    }
}

fn map_segments(path: &str, f: impl Fn(&str) -> String) -> String {
    path.split(PATH_SEPARATOR)
        .map(f)
        .collect::<Vec<_>>()
        .join("/")
}

/// A character is allowed when it alone fully matches the name pattern.
///
/// `allowed` is the anchored whole-name pattern, so character-class
/// patterns such as `[a-z0-9_-]+` behave as expected. Patterns that
/// constrain position (`[a-z][a-z0-9]*`) judge each character as if it
/// were a one-character name.
fn is_allowed_char(allowed: &Regex, c: char) -> bool {
    let mut buf = [0u8; 4];
    allowed.is_match(c.encode_utf8(&mut buf))
}

/// Rename with a counter: `root/folder` becomes `root/folder-001`.
///
/// Tries `max_attempts` counter values starting at `counter_start` and
/// returns the first candidate `is_taken` rejects. Returns the original
/// path when every candidate collides.
pub fn numbered(path: &str, strategy: &ConflictStrategy, is_taken: &dyn Fn(&str) -> bool) -> String {
    let (prefix, base, ext) = decompose(path, strategy.preserve_extension);
    let end = strategy.counter_start.saturating_add(strategy.max_attempts);

    for n in strategy.counter_start..end {
        let counter = format!("{n:0width$}", width = strategy.counter_padding);
        let name = fill_pattern(&strategy.rename_pattern, base, &counter);
        let candidate = format!("{prefix}{name}{ext}");
        if !is_taken(&candidate) {
            return candidate;
        }
    }
    path.to_string()
}

/// Substitute `{name}` and `{n}` in one pass, so placeholder text inside
/// the base name is left alone.
fn fill_pattern(pattern: &str, name: &str, counter: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + name.len() + counter.len());
    let mut rest = pattern;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        if let Some(after) = tail.strip_prefix("{name}") {
            out.push_str(name);
            rest = after;
        } else if let Some(after) = tail.strip_prefix("{n}") {
            out.push_str(counter);
            rest = after;
        } else {
            out.push('{');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    out
}

/// Append the current UTC time to the base name.
pub fn timestamp(path: &str, preserve_extension: bool) -> String {
    timestamp_at(path, preserve_extension, Utc::now())
}

/// Append `at` to the base name, with `:` and `.` replaced by `-`.
pub fn timestamp_at(path: &str, preserve_extension: bool, at: DateTime<Utc>) -> String {
    let (prefix, base, ext) = decompose(path, preserve_extension);
    let stamp = at
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    format!("{prefix}{base}-{stamp}{ext}")
}

/// Substitute every character outside the allowed pattern.
pub fn replace_chars(path: &str, allowed: &Regex, replacement: char) -> String {
    map_segments(path, |segment| {
        segment
            .chars()
            .map(|c| if is_allowed_char(allowed, c) { c } else { replacement })
            .collect()
    })
}

/// Delete every character outside the allowed pattern.
pub fn strip_chars(path: &str, allowed: &Regex) -> String {
    map_segments(path, |segment| {
        segment
            .chars()
            .filter(|c| is_allowed_char(allowed, *c))
            .collect()
    })
}

/// Percent-encode each segment, keeping `/` as the separator.
pub fn encode(path: &str) -> String {
    map_segments(path, |segment| urlencoding::encode(segment).into_owned())
}

/// Substitute map keys with their values until nothing changes.
///
/// Longer keys win over shorter ones at the same position. For acyclic
/// maps the result is a fixpoint, so a second application is a no-op.
pub fn transliterate(path: &str, map: &IndexMap<String, String>) -> String {
    let mut keys: Vec<(&str, &str)> = map
        .iter()
        .filter(|(from, _)| !from.is_empty())
        .map(|(from, to)| (from.as_str(), to.as_str()))
        .collect();
    keys.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

    let mut current = path.to_string();
    for _ in 0..=keys.len() {
        let next = transliterate_once(&current, &keys);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

fn transliterate_once(text: &str, keys: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    'outer: while !rest.is_empty() {
        for (from, to) in keys {
            if let Some(tail) = rest.strip_prefix(from) {
                out.push_str(to);
                rest = tail;
                continue 'outer;
            }
        }
        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            out.push(c);
        }
        rest = chars.as_str();
    }
    out
}

/// Cut the base name so the path fits in `max_length` characters.
///
/// Returns the original path if it already fits, or if the directory
/// prefix and extension leave no room for even one character.
pub fn truncate(path: &str, max_length: usize, preserve_extension: bool) -> String {
    if path.chars().count() <= max_length {
        return path.to_string();
    }
    let (prefix, base, ext) = decompose(path, preserve_extension);
    let used = prefix.chars().count() + ext.chars().count();
    let available = max_length.saturating_sub(used);
    if available < 1 {
        return path.to_string();
    }
    let cut: String = base.chars().take(available).collect();
    format!("{prefix}{cut}{ext}")
}

/// Replace the base name with the first eight hex characters of its digest.
pub fn hash(path: &str, algorithm: HashAlgorithm, preserve_extension: bool) -> String {
    let (prefix, base, ext) = decompose(path, preserve_extension);
    let digest = match algorithm {
        HashAlgorithm::Sha256 => hex::encode(Sha256::digest(base.as_bytes())),
        HashAlgorithm::Sha1 => hex::encode(Sha1::digest(base.as_bytes())),
        HashAlgorithm::Blake3 => blake3::hash(base.as_bytes()).to_hex().to_string(),
    };
    format!("{prefix}{}{ext}", &digest[..HASH_PREFIX_LEN])
}

/// Abbreviate directory segments to three characters, left to right, until
/// the path fits; then fall back to [`truncate`] on the final segment.
pub fn shorten(path: &str, max_length: usize, preserve_extension: bool) -> String {
    let fits = |segments: &[String]| segments.join("/").chars().count() <= max_length;

    let mut segments: Vec<String> = path.split(PATH_SEPARATOR).map(str::to_string).collect();
    let last = segments.len().saturating_sub(1);
    for i in 0..last {
        if fits(&segments) {
            break;
        }
        if segments[i].chars().count() > SHORTENED_SEGMENT_LEN {
            segments[i] = segments[i].chars().take(SHORTENED_SEGMENT_LEN).collect();
        }
    }

    let shortened = segments.join("/");
    if shortened.chars().count() <= max_length {
        return shortened;
    }
    let truncated = truncate(&shortened, max_length, preserve_extension);
    if truncated == shortened {
        path.to_string()
    } else {
        truncated
    }
}

/// Applies the configured strategy for a violation category.
#[derive(Debug, Clone, Copy)]
pub struct ConflictResolver<'a> {
    strategy: &'a ConflictStrategy,
    rules: &'a ValidationRules,
    allowed: &'a Regex,
}

impl<'a> ConflictResolver<'a> {
    /// Create a resolver over a strategy, rule set and compiled pattern.
    pub fn new(strategy: &'a ConflictStrategy, rules: &'a ValidationRules, allowed: &'a Regex) -> Self {
        Self {
            strategy,
            rules,
            allowed,
        }
    }

    /// Compute the suggested path for a violation of `code` on `path`.
    ///
    /// Returns `None` when the mode produces no suggestion (`error`, `warn`,
    /// `skip`). `merge` and `overwrite` keep the path as is. A returned path
    /// equal to the input means the repair failed.
    pub fn resolve(
        &self,
        code: ViolationCode,
        path: &str,
        name: &str,
        is_taken: &dyn Fn(&str) -> bool,
    ) -> Option<String> {
        let strategy = self.strategy;
        let max = self.rules.max_path_length;
        let keep_ext = strategy.preserve_extension;

        let resolved = match strategy.mode_for(code) {
            ResolutionMode::Error | ResolutionMode::Warn | ResolutionMode::Skip => return None,
            ResolutionMode::Merge | ResolutionMode::Overwrite => path.to_string(),
            ResolutionMode::Numbered => numbered(path, strategy, is_taken),
            ResolutionMode::Timestamp => timestamp(path, keep_ext),
            ResolutionMode::Replace => replace_chars(path, self.allowed, strategy.replacement_char),
            ResolutionMode::Strip => strip_chars(path, self.allowed),
            ResolutionMode::Encode => encode(path),
            ResolutionMode::Transliterate => transliterate(path, &strategy.transliteration_map),
            ResolutionMode::Truncate => truncate(path, max, keep_ext),
            ResolutionMode::Hash => hash(path, strategy.hash_algorithm, keep_ext),
            ResolutionMode::Shorten => shorten(path, max, keep_ext),
            ResolutionMode::Custom(resolver) => {
                let request = ResolveRequest {
                    code,
                    path,
                    name,
                    is_taken,
                };
                return resolver.resolve(&request);
            }
        };
        Some(resolved)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use treeforge_core::DEFAULT_ALLOWED_CHARS;

    use super::*;

    fn allowed() -> Regex {
        Regex::new(&format!("^(?:{DEFAULT_ALLOWED_CHARS})$")).unwrap()
    }

    #[test]
    fn test_split_extension() {
        assert_eq!(split_extension("main.rs"), ("main", Some("rs")));
        assert_eq!(split_extension("archive.tar.gz"), ("archive.tar", Some("gz")));
        assert_eq!(split_extension(".gitignore"), (".gitignore", None));
        assert_eq!(split_extension("Makefile"), ("Makefile", None));
    }

    #[test]
    fn test_numbered_skips_taken_candidates() {
        let strategy = ConflictStrategy::default();
        let taken: HashSet<&str> = ["root/folder", "root/folder-001"].into_iter().collect();
        let result = numbered("root/folder", &strategy, &|p| taken.contains(p));
        assert_eq!(result, "root/folder-002");
    }

    #[test]
    fn test_numbered_keeps_extension() {
        let strategy = ConflictStrategy::default();
        assert_eq!(numbered("a/b.txt", &strategy, &|_| false), "a/b-001.txt");

        let strategy = ConflictStrategy::builder()
            .preserve_extension(false)
            .rename_pattern("{name}_{n}")
            .counter_padding(0usize)
            .counter_start(5u32)
            .build()
            .unwrap();
        assert_eq!(numbered("a/b.txt", &strategy, &|_| false), "a/b.txt_5");
    }

    #[test]
    fn test_numbered_leaves_placeholders_in_name() {
        let strategy = ConflictStrategy::default();
        assert_eq!(numbered("tpl/{n}.txt", &strategy, &|_| false), "tpl/{n}-001.txt");
        assert_eq!(fill_pattern("{x}{name}_{n}", "a", "7"), "{x}a_7");
    }

    #[test]
    fn test_numbered_exhausted_returns_original() {
        let strategy = ConflictStrategy::builder().max_attempts(3u32).build().unwrap();
        assert_eq!(numbered("root/x", &strategy, &|_| true), "root/x");
    }

    #[test]
    fn test_timestamp_at() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(
            timestamp_at("logs/app.log", true, at),
            "logs/app-2024-03-09T14-05-07-000Z.log"
        );
    }

    #[test]
    fn test_character_repairs() {
        let re = allowed();
        assert_eq!(replace_chars("docs/a#b.md", &re, '_'), "docs/a_b.md");
        assert_eq!(strip_chars("docs/a#b.md", &re), "docs/ab.md");
        assert_eq!(encode("my docs/a b.md"), "my%20docs/a%20b.md");
    }

    #[test]
    fn test_transliterate() {
        let map: IndexMap<String, String> = [("é", "e"), ("@", "at")]
            .into_iter()
            .map(|(a, b)| (a.to_string(), b.to_string()))
            .collect();
        assert_eq!(transliterate("résumé@.txt", &map), "resumeat.txt");
        assert_eq!(transliterate("plain.txt", &map), "plain.txt");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("ab/short.txt", 20, true), "ab/short.txt");
        assert_eq!(truncate("ab/abcdefghij.txt", 10, true), "ab/abc.txt");
        assert_eq!(truncate("abcdefgh/x.txt", 10, true), "abcdefgh/x.txt");
    }

    #[test]
    fn test_hash_prefix() {
        let expected = &hex::encode(Sha256::digest(b"report"))[..8];
        assert_eq!(hash("out/report.pdf", HashAlgorithm::Sha256, true), format!("out/{expected}.pdf"));

        let blake = hash("report", HashAlgorithm::Blake3, true);
        assert_eq!(blake.len(), 8);
        assert!(blake.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_shorten() {
        assert_eq!(
            shorten("components/widgets/button.tsx", 20, true),
            "com/wid/button.tsx"
        );
        assert_eq!(
            shorten("components/widgets/button.tsx", 26, true),
            "com/widgets/button.tsx"
        );
        assert_eq!(shorten("components/widgets/button.tsx", 16, true), "com/wid/butt.tsx");
    }

    #[test]
    fn test_resolver_dispatch() {
        let rules = ValidationRules::default();
        let re = allowed();
        let strategy = ConflictStrategy::builder()
            .on_reserved_name(ResolutionMode::Skip)
            .on_dots_in_dir(ResolutionMode::Merge)
            .build()
            .unwrap();
        let resolver = ConflictResolver::new(&strategy, &rules, &re);
        let free = |_: &str| false;

        assert_eq!(resolver.resolve(ViolationCode::ReservedName, "a/con", "con", &free), None);
        assert_eq!(
            resolver.resolve(ViolationCode::DotsInDir, "a/b.c", "b.c", &free).as_deref(),
            Some("a/b.c")
        );
        assert_eq!(
            resolver.resolve(ViolationCode::InvalidChars, "a/b#c", "b#c", &free).as_deref(),
            Some("a/b_c")
        );
        assert_eq!(resolver.resolve(ViolationCode::LongName, "a/b", "b", &free), None);
    }
}
