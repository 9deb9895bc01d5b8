//! Renumber engine: sequential `_id` assignment across an ordered file list.
//!
//! Each line containing `_id">DIGITS<` gets the current counter value; every
//! other line passes through byte-for-byte. The counter is threaded through
//! the pass as a value, and each file is computed in full before it is
//! committed with an atomic rename.

use crate::config::LoadedConfig;
use crate::counter::{Counter, CounterPolicy};
use crate::error::{Error, Result};
use crate::propagate::{self, PropagateOutcome};
use crate::utils::{io, parser};
use regex::Regex;
use serde::Serialize;
use std::borrow::Cow;
use std::path::Path;

/// Entry identifier field. Capture group 1 holds the digits being replaced.
pub const ID_PATTERN: &str = r#"_id">(\d*)<"#;

pub fn id_pattern() -> Result<Regex> {
    Regex::new(ID_PATTERN).map_err(|e| Error::internal_unexpected(e.to_string()))
}

// ============================================================================
// Types
// ============================================================================

/// Result of feeding one line through the counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineOutcome<'a> {
    pub counter: Counter,
    pub line: Cow<'a, str>,
    /// ID written into the line, if it matched.
    pub assigned: Option<u64>,
}

/// Per-file numbers gathered while renumbering content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileStats {
    /// Counter value when the file was entered, if any ID was left.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_id: Option<u64>,
    pub substitutions: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentOutcome {
    pub output: String,
    pub counter: Counter,
    pub stats: FileStats,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileOutcome {
    pub file: String,
    pub path: String,
    #[serde(flatten)]
    pub stats: FileStats,
    pub changed: bool,
    pub written: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkpoint {
    pub file: String,
    pub value: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenumberReport {
    pub policy: &'static str,
    pub dry_run: bool,
    pub files: Vec<FileOutcome>,
    pub total_substitutions: usize,
    /// Counter value after the last file. Absent once `u64::MAX` was used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkpoint: Option<Checkpoint>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RenumberOptions {
    pub dry_run: bool,
    pub skip_propagate: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    #[serde(flatten)]
    pub renumber: RenumberReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub propagation: Option<PropagateOutcome>,
}

// ============================================================================
// Pure steps
// ============================================================================

/// Renumber a single line. All occurrences on a matching line receive the
/// same ID and the counter advances once. The counter is only read when the
/// line matches, so an exhausted counter fails on the next ID, not before.
pub fn renumber_line<'a>(
    re: &Regex,
    policy: &CounterPolicy,
    counter: Counter,
    line: &'a str,
) -> Result<LineOutcome<'a>> {
    if !re.is_match(line) {
        return Ok(LineOutcome {
            counter,
            line: Cow::Borrowed(line),
            assigned: None,
        });
    }

    let id = counter.current(policy)?;
    let replaced =
        parser::replace_capture_all(line, re, &id.to_string()).unwrap_or_else(|| line.to_string());
    Ok(LineOutcome {
        counter: counter.advance(policy),
        line: Cow::Owned(replaced),
        assigned: Some(id),
    })
}

/// Renumber the whole content of the file at `file_index`. `carried` is the
/// counter left by the previous file.
pub fn renumber_content(
    re: &Regex,
    policy: &CounterPolicy,
    file_index: usize,
    carried: Counter,
    content: &str,
) -> Result<ContentOutcome> {
    let mut counter = policy.enter_file(file_index, carried);
    let mut stats = FileStats {
        start_id: counter.next,
        first_id: None,
        last_id: None,
        substitutions: 0,
    };
    let mut output = String::with_capacity(content.len());

    for line in parser::lines_inclusive(content) {
        let step = renumber_line(re, policy, counter, line)?;
        if let Some(id) = step.assigned {
            stats.first_id.get_or_insert(id);
            stats.last_id = Some(id);
            stats.substitutions += 1;
        }
        output.push_str(&step.line);
        counter = step.counter;
    }

    Ok(ContentOutcome {
        output,
        counter,
        stats,
    })
}

// ============================================================================
// File operations
// ============================================================================

/// Fail before touching anything if any configured data file is missing.
fn ensure_data_files_exist(loaded: &LoadedConfig) -> Result<()> {
    let missing: Vec<String> = loaded
        .data_paths()
        .iter()
        .filter(|path| !path.is_file())
        .map(|path| path.display().to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::data_file_not_found(missing))
    }
}

fn commit(path: &Path, original: &str, output: &str, dry_run: bool) -> Result<(bool, bool)> {
    let changed = original != output;
    if !changed || dry_run {
        return Ok((changed, false));
    }
    io::write_file_atomic(path, output, "write data file")?;
    Ok((changed, true))
}

/// Renumber every configured data file in order.
pub fn renumber_files(loaded: &LoadedConfig, options: &RenumberOptions) -> Result<RenumberReport> {
    let config = &loaded.config;
    config.validate()?;
    ensure_data_files_exist(loaded)?;

    let re = id_pattern()?;
    let policy = config.policy;
    let checkpoint_index = loaded.checkpoint_index();

    let mut counter = policy.initial();
    let mut files = Vec::with_capacity(config.files.len());
    let mut checkpoint = None;

    for (index, (file, path)) in config.files.iter().zip(loaded.data_paths()).enumerate() {
        if checkpoint_index == Some(index) {
            let value = match policy {
                CounterPolicy::Block { .. } => policy.block_start(index)?,
                CounterPolicy::Sequential { .. } => counter.current(&policy)?,
            };
            checkpoint = Some(Checkpoint {
                file: file.clone(),
                value,
            });
        }

        let original = io::read_file(&path, "read data file")?;
        let outcome = renumber_content(&re, &policy, index, counter, &original)?;

        let (changed, written) = commit(&path, &original, &outcome.output, options.dry_run)?;

        log_status!(
            "renumber",
            "{}: {} IDs from {}{}",
            file,
            outcome.stats.substitutions,
            outcome
                .stats
                .start_id
                .map_or_else(|| "(exhausted)".to_string(), |id| id.to_string()),
            if written { "" } else { " (not written)" }
        );

        files.push(FileOutcome {
            file: file.clone(),
            path: path.display().to_string(),
            stats: outcome.stats,
            changed,
            written,
        });
        counter = outcome.counter;
    }

    let total_substitutions = files.iter().map(|f| f.stats.substitutions).sum();

    Ok(RenumberReport {
        policy: policy.name(),
        dry_run: options.dry_run,
        files,
        total_substitutions,
        next_id: counter.next,
        checkpoint,
    })
}

/// Renumber all files, then write the checkpoint into its target source file
/// when one is configured.
pub fn run(loaded: &LoadedConfig, options: &RenumberOptions) -> Result<RunReport> {
    let renumber = renumber_files(loaded, options)?;

    let propagation = match (&renumber.checkpoint, &loaded.config.checkpoint) {
        (Some(value), Some(settings)) if !options.skip_propagate => {
            let target = loaded.checkpoint_target().ok_or_else(|| {
                Error::config_missing_key(
                    "checkpoint.target",
                    Some(loaded.path.display().to_string()),
                )
            })?;
            Some(propagate::propagate_file(
                &target,
                &settings.constant,
                value.value,
                options.dry_run,
            )?)
        }
        _ => None,
    };

    Ok(RunReport {
        renumber,
        propagation,
    })
}
