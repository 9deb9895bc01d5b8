pub type CmdResult<T> = renumber::Result<(T, i32)>;

pub(crate) struct GlobalArgs {
    /// Explicit config path (defaults to ./renumber.json).
    pub config: Option<String>,
}

pub mod config;
pub mod init;
pub mod propagate;
pub mod run;

/// Dispatch a command to its handler and map result to JSON.
macro_rules! dispatch {
    ($args:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run_json($args))
    };
    ($args:expr, $global:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args, $global))
    };
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (renumber::Result<serde_json::Value>, i32) {
    match command {
        // Commands without config context
        crate::Commands::Init(args) => dispatch!(args, init),
        crate::Commands::Propagate(args) => dispatch!(args, propagate),

        // Commands reading renumber.json
        crate::Commands::Run(args) => dispatch!(args, global, run),
        crate::Commands::Config(args) => dispatch!(args, global, config),
    }
}
