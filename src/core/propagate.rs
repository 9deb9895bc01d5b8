//! Constant propagation: write one integer into `NAME = DIGITS;` in a
//! source file.
//!
//! Only the first line carrying the anchor is rewritten. A missing anchor is
//! not an error; the outcome reports `replaced: false` and the file is left
//! alone.

use crate::config::validate_constant_name;
use crate::error::{Error, Result};
use crate::utils::{io, parser};
use regex::Regex;
use serde::Serialize;
use std::path::Path;

/// Anchor for `constant`, with the digits in capture group 1.
pub fn anchor_pattern(constant: &str) -> Result<Regex> {
    validate_constant_name(constant)?;
    let pattern = format!(r"{} = (\d*);", regex::escape(constant));
    Regex::new(&pattern).map_err(|e| Error::internal_unexpected(e.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropagateStats {
    pub replaced: bool,
    /// 1-based line number of the rewritten line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_value: Option<String>,
    /// Lines carrying the anchor. Only the first is rewritten.
    pub anchor_occurrences: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropagateOutcome {
    pub target: String,
    pub constant: String,
    pub new_value: u64,
    #[serde(flatten)]
    pub stats: PropagateStats,
    pub changed: bool,
    pub written: bool,
}

/// Rewrite the first anchor line in `content` to carry `value`.
pub fn propagate_content(content: &str, re: &Regex, value: u64) -> (String, PropagateStats) {
    let replacement = value.to_string();
    let mut output = String::with_capacity(content.len());
    let mut stats = PropagateStats {
        replaced: false,
        line: None,
        previous_value: None,
        anchor_occurrences: 0,
    };

    for (index, line) in parser::lines_inclusive(content).enumerate() {
        if !re.is_match(line) {
            output.push_str(line);
            continue;
        }

        stats.anchor_occurrences += 1;
        if stats.replaced {
            output.push_str(line);
            continue;
        }

        match parser::replace_capture_first(line, re, &replacement) {
            Some((rewritten, previous)) => {
                output.push_str(&rewritten);
                stats.replaced = true;
                stats.line = Some(index + 1);
                stats.previous_value = Some(previous);
            }
            None => output.push_str(line),
        }
    }

    (output, stats)
}

/// Write `value` into the `constant` anchor of the file at `path`.
pub fn propagate_file(
    path: &Path,
    constant: &str,
    value: u64,
    dry_run: bool,
) -> Result<PropagateOutcome> {
    let re = anchor_pattern(constant)?;
    let original = io::read_file(path, "read propagation target")?;
    let (output, stats) = propagate_content(&original, &re, value);

    let changed = output != original;
    let written = changed && !dry_run;
    if written {
        io::write_file_atomic(path, &output, "write propagation target")?;
    }

    if !stats.replaced {
        log_status!(
            "propagate",
            "Anchor '{} = N;' not found in {}, nothing changed",
            constant,
            path.display()
        );
    } else if stats.anchor_occurrences > 1 {
        log_status!(
            "propagate",
            "{} lines carry '{}', only line {} was updated",
            stats.anchor_occurrences,
            constant,
            stats.line.unwrap_or_default()
        );
    } else {
        log_status!("propagate", "{} = {} in {}", constant, value, path.display());
    }

    Ok(PropagateOutcome {
        target: path.display().to_string(),
        constant: constant.to_string(),
        new_value: value,
        stats,
        changed,
        written,
    })
}
