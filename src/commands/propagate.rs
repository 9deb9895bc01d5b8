use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use renumber::config::validate_constant_name;
use renumber::defaults::CHECKPOINT_CONSTANT;
use renumber::propagate::{self, PropagateOutcome};
use renumber::Error;

use super::CmdResult;

#[derive(Args)]
pub struct PropagateArgs {
    /// Source file holding the constant
    #[arg(long)]
    pub target: String,

    /// Integer to write into the constant
    #[arg(long)]
    pub value: u64,

    /// Constant name used as the anchor (`NAME = DIGITS;`)
    #[arg(long, default_value = CHECKPOINT_CONSTANT)]
    pub constant: String,

    /// Report the change without writing the file
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropagateOutput {
    command: &'static str,
    dry_run: bool,
    #[serde(flatten)]
    outcome: PropagateOutcome,
}

pub fn run_json(args: PropagateArgs) -> CmdResult<PropagateOutput> {
    if validate_constant_name(&args.constant).is_err() {
        return Err(Error::validation_invalid_argument(
            "constant",
            format!(
                "'{}' is not an identifier (letters, digits, underscores)",
                args.constant
            ),
        )
        .with_hint("Pass the bare constant name, e.g. --constant ID_OF_FIRST_EXTRA_ENTRY"));
    }

    let target = PathBuf::from(shellexpand::tilde(&args.target).to_string());
    let outcome = propagate::propagate_file(&target, &args.constant, args.value, args.dry_run)?;

    Ok((
        PropagateOutput {
            command: "propagate",
            dry_run: args.dry_run,
            outcome,
        },
        0,
    ))
}
