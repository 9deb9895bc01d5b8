//! Text and path primitives shared by the renumber and propagate passes.
//!
//! Everything here is line-oriented and byte-preserving: splitting keeps the
//! original line terminators so that joining the pieces back together
//! reproduces the input exactly.

use regex::{Captures, Regex};
use std::collections::HashSet;
use std::hash::Hash;
use std::path::{Path, PathBuf};

/// Split content into lines, each keeping its own terminator (`\n` or `\r\n`).
/// A final line without a terminator is yielded as-is.
pub fn lines_inclusive(content: &str) -> impl Iterator<Item = &str> {
    content.split_inclusive('\n')
}

/// Replace capture group 1 of every match in `line` with `replacement`.
/// Returns `None` when the pattern does not occur.
pub fn replace_capture_all(line: &str, re: &Regex, replacement: &str) -> Option<String> {
    if !re.is_match(line) {
        return None;
    }

    let replaced = re.replace_all(line, |caps: &Captures| splice_capture(caps, replacement));
    Some(replaced.into_owned())
}

/// Replace capture group 1 of the first match in `line` with `replacement`.
/// Returns the rewritten line and the text the capture held before.
pub fn replace_capture_first(line: &str, re: &Regex, replacement: &str) -> Option<(String, String)> {
    let caps = re.captures(line)?;
    let previous = caps.get(1).map(|m| m.as_str().to_string()).unwrap_or_default();
    let replaced = re.replacen(line, 1, |caps: &Captures| splice_capture(caps, replacement));
    Some((replaced.into_owned(), previous))
}

/// Rebuild a match with its first capture group swapped out, keeping the
/// literal text on both sides.
fn splice_capture(caps: &Captures, replacement: &str) -> String {
    let Some(whole) = caps.get(0) else {
        return String::new();
    };
    let Some(group) = caps.get(1) else {
        return whole.as_str().to_string();
    };

    let start = group.start() - whole.start();
    let end = group.end() - whole.start();
    let text = whole.as_str();
    format!("{}{}{}", &text[..start], replacement, &text[end..])
}

/// Resolve a configured path: expand `~`, then join relative paths onto `base`.
pub fn resolve_path(base: &Path, file: &str) -> PathBuf {
    let expanded = shellexpand::tilde(file).to_string();
    let path = PathBuf::from(expanded);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

/// Items that appear more than once, in order of their second appearance.
pub fn duplicates<T>(items: &[T]) -> Vec<T>
where
    T: Clone + Eq + Hash,
{
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    items
        .iter()
        .filter(|item| !seen.insert((*item).clone()) && reported.insert((*item).clone()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id_pattern() -> Regex {
        Regex::new(r#"_id">(\d*)<"#).unwrap()
    }

    #[test]
    fn lines_inclusive_round_trips_mixed_endings() {
        let content = "a\r\nb\n\nc";
        let lines: Vec<&str> = lines_inclusive(content).collect();
        assert_eq!(lines, vec!["a\r\n", "b\n", "\n", "c"]);
        assert_eq!(lines.concat(), content);
    }

    #[test]
    fn lines_inclusive_yields_nothing_for_empty_content() {
        assert_eq!(lines_inclusive("").count(), 0);
    }

    #[test]
    fn replace_capture_all_keeps_surrounding_text() {
        let line = "    <column name=\"_id\">0</column>\n";
        let replaced = replace_capture_all(line, &id_pattern(), "10000").unwrap();
        assert_eq!(replaced, "    <column name=\"_id\">10000</column>\n");
    }

    #[test]
    fn replace_capture_all_handles_empty_digits() {
        let replaced = replace_capture_all("_id\"><", &id_pattern(), "7").unwrap();
        assert_eq!(replaced, "_id\">7<");
    }

    #[test]
    fn replace_capture_all_returns_none_without_match() {
        assert!(replace_capture_all("<column name=\"entry_name\">", &id_pattern(), "1").is_none());
    }

    #[test]
    fn replace_capture_first_reports_previous_value() {
        let re = Regex::new(r"ID_OF_FIRST_EXTRA_ENTRY = (\d*);").unwrap();
        let line = "  static final int ID_OF_FIRST_EXTRA_ENTRY = 14123; // x = 1;\n";
        let (replaced, previous) = replace_capture_first(line, &re, "15000").unwrap();
        assert_eq!(previous, "14123");
        assert_eq!(
            replaced,
            "  static final int ID_OF_FIRST_EXTRA_ENTRY = 15000; // x = 1;\n"
        );
    }

    #[test]
    fn resolve_path_joins_relative_onto_base() {
        let resolved = resolve_path(Path::new("/data"), "../app/Db.java");
        assert_eq!(resolved, PathBuf::from("/data/../app/Db.java"));
    }

    #[test]
    fn resolve_path_keeps_absolute() {
        let resolved = resolve_path(Path::new("/data"), "/abs/mem-01-b.xml");
        assert_eq!(resolved, PathBuf::from("/abs/mem-01-b.xml"));
    }

    #[test]
    fn duplicates_reports_each_repeat_once() {
        let items = vec!["a", "b", "a", "c", "a", "b"];
        assert_eq!(duplicates(&items), vec!["a", "b"]);
    }
}
