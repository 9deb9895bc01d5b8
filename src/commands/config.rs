use clap::{Args, Subcommand};
use serde::Serialize;

use renumber::config::{self, CheckpointConfig};
use renumber::counter::CounterPolicy;

use super::CmdResult;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Display the resolved configuration (paths, block starts)
    Show,
    /// Show the path to renumber.json
    Path,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedFile {
    index: usize,
    file: String,
    path: String,
    exists: bool,
    /// Fixed first ID under the block policy.
    #[serde(skip_serializing_if = "Option::is_none")]
    block_start: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOutput {
    command: &'static str,
    path: String,
    exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    policy: Option<CounterPolicy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    files: Option<Vec<ResolvedFile>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    checkpoint: Option<CheckpointConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    checkpoint_target: Option<String>,
}

pub fn run(args: ConfigArgs, global: &crate::commands::GlobalArgs) -> CmdResult<ConfigOutput> {
    let path = config::resolve_config_path(global.config.as_deref())?;

    match args.command {
        ConfigCommand::Path => Ok((
            ConfigOutput {
                command: "config.path",
                exists: path.is_file(),
                path: path.display().to_string(),
                policy: None,
                files: None,
                checkpoint: None,
                checkpoint_target: None,
            },
            0,
        )),
        ConfigCommand::Show => {
            let loaded = config::load(&path)?;
            let policy = loaded.config.policy;

            let mut files = Vec::with_capacity(loaded.config.files.len());
            for (index, (file, resolved)) in loaded
                .config
                .files
                .iter()
                .zip(loaded.data_paths())
                .enumerate()
            {
                let block_start = match policy {
                    CounterPolicy::Block { .. } => Some(policy.block_start(index)?),
                    CounterPolicy::Sequential { .. } => None,
                };
                files.push(ResolvedFile {
                    index,
                    file: file.clone(),
                    exists: resolved.is_file(),
                    path: resolved.display().to_string(),
                    block_start,
                });
            }

            Ok((
                ConfigOutput {
                    command: "config.show",
                    path: loaded.path.display().to_string(),
                    exists: true,
                    policy: Some(policy),
                    files: Some(files),
                    checkpoint_target: loaded
                        .checkpoint_target()
                        .map(|p| p.display().to_string()),
                    checkpoint: loaded.config.checkpoint,
                },
                0,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::GlobalArgs;
    use renumber::config::{RenumberConfig, CONFIG_FILE_NAME};
    use std::fs;
    use tempfile::tempdir;

    fn global_for(path: &std::path::Path) -> GlobalArgs {
        GlobalArgs {
            config: Some(path.display().to_string()),
        }
    }

    #[test]
    fn show_lists_block_starts_under_block_policy() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(dir.path().join("mem-01-b.xml"), "").unwrap();
        config::save(
            &path,
            &RenumberConfig {
                files: vec![
                    "mem-01-b.xml".to_string(),
                    "mem-02-ch.xml".to_string(),
                    "mem-03-D.xml".to_string(),
                ],
                policy: CounterPolicy::Block {
                    base: 10_000,
                    block_size: 10_000,
                    step: 10,
                },
                checkpoint: None,
            },
        )
        .unwrap();

        let (output, exit_code) = run(
            ConfigArgs {
                command: ConfigCommand::Show,
            },
            &global_for(&path),
        )
        .unwrap();

        assert_eq!(exit_code, 0);
        let files = output.files.unwrap();
        let starts: Vec<Option<u64>> = files.iter().map(|f| f.block_start).collect();
        assert_eq!(starts, vec![Some(10_000), Some(20_000), Some(30_000)]);
        assert!(files[0].exists);
        assert!(!files[1].exists);
        assert!(output.checkpoint_target.is_none());
    }

    #[test]
    fn show_omits_block_starts_under_sequential_policy() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        config::save(
            &path,
            &RenumberConfig {
                files: vec!["mem-01-b.xml".to_string()],
                policy: CounterPolicy::Sequential { base: 10_000 },
                checkpoint: None,
            },
        )
        .unwrap();

        let (output, _) = run(
            ConfigArgs {
                command: ConfigCommand::Show,
            },
            &global_for(&path),
        )
        .unwrap();

        let json = serde_json::to_value(&output).unwrap();
        assert!(json["files"][0].get("blockStart").is_none());
        assert_eq!(json["policy"]["type"], "sequential");
    }

    #[test]
    fn path_reports_missing_file_without_failing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        let (output, exit_code) = run(
            ConfigArgs {
                command: ConfigCommand::Path,
            },
            &global_for(&path),
        )
        .unwrap();

        assert_eq!(exit_code, 0);
        assert!(!output.exists);
        assert_eq!(output.path, path.display().to_string());
    }
}
