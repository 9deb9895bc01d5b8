use clap::Args;
use serde::Serialize;

use renumber::config;
use renumber::renumber::{self as engine, RenumberOptions, RunReport};

use super::CmdResult;

#[derive(Args)]
pub struct RunArgs {
    /// Compute new IDs and report them without writing any file
    #[arg(long)]
    pub dry_run: bool,

    /// Renumber data files only; leave the checkpoint constant untouched
    #[arg(long)]
    pub skip_propagate: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunOutput {
    command: &'static str,
    config_path: String,
    #[serde(flatten)]
    report: RunReport,
}

pub fn run(args: RunArgs, global: &crate::commands::GlobalArgs) -> CmdResult<RunOutput> {
    let path = config::resolve_config_path(global.config.as_deref())?;
    let loaded = config::load(&path)?;

    let options = RenumberOptions {
        dry_run: args.dry_run,
        skip_propagate: args.skip_propagate,
    };
    let report = engine::run(&loaded, &options)?;

    Ok((
        RunOutput {
            command: "run",
            config_path: loaded.path.display().to_string(),
            report,
        },
        0,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::GlobalArgs;
    use renumber::config::CONFIG_FILE_NAME;
    use tempfile::tempdir;

    #[test]
    fn missing_config_exits_with_code_2() {
        let dir = tempdir().unwrap();
        let global = GlobalArgs {
            config: Some(dir.path().join(CONFIG_FILE_NAME).display().to_string()),
        };
        let args = RunArgs {
            dry_run: false,
            skip_propagate: false,
        };

        let (result, exit_code) = crate::output::map_cmd_result_to_json(run(args, &global));

        assert_eq!(exit_code, 2);
        let err = result.unwrap_err();
        assert_eq!(err.code.as_str(), "config.not_found");
        assert!(!err.hints.is_empty());
    }

    #[test]
    fn dry_run_reports_without_writing() {
        let dir = tempdir().unwrap();
        let data = dir.path().join("mem-01-b.xml");
        std::fs::write(&data, "<column name=\"_id\">7</column>\n").unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "{\"files\":[\"mem-01-b.xml\"]}").unwrap();
        let global = GlobalArgs {
            config: Some(path.display().to_string()),
        };
        let args = RunArgs {
            dry_run: true,
            skip_propagate: false,
        };

        let (result, exit_code) = crate::output::map_cmd_result_to_json(run(args, &global));

        assert_eq!(exit_code, 0);
        let value = result.unwrap();
        assert_eq!(value["command"], "run");
        assert_eq!(value["files"][0]["firstId"], 10_000);
        assert_eq!(value["files"][0]["written"], false);
        assert_eq!(
            std::fs::read_to_string(&data).unwrap(),
            "<column name=\"_id\">7</column>\n"
        );
    }
}
