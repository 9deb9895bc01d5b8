use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use renumber::config::{self, RenumberConfig, CONFIG_FILE_NAME};
use renumber::{defaults, Error};

use super::CmdResult;

#[derive(Args)]
pub struct InitArgs {
    /// Directory to write renumber.json into (defaults to the current directory)
    #[arg(long)]
    pub dir: Option<String>,

    /// Overwrite an existing renumber.json
    #[arg(long)]
    pub force: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitOutput {
    command: &'static str,
    path: String,
    overwritten: bool,
    config: RenumberConfig,
}

pub fn run_json(args: InitArgs) -> CmdResult<InitOutput> {
    let dir = match args.dir.as_deref() {
        Some(dir) => PathBuf::from(shellexpand::tilde(dir).to_string()),
        None => std::env::current_dir()
            .map_err(|e| Error::internal_io(e.to_string(), Some("get current dir".to_string())))?,
    };
    let path = dir.join(CONFIG_FILE_NAME);

    let exists = path.exists();
    if exists && !args.force {
        return Err(Error::config_already_exists(path.display().to_string()));
    }

    let preset = defaults::preset();
    config::save(&path, &preset)?;
    renumber::log_status!("init", "Wrote {}", path.display());

    Ok((
        InitOutput {
            command: "init",
            path: path.display().to_string(),
            overwritten: exists,
            config: preset,
        },
        0,
    ))
}
