use clap::{Parser, Subcommand};

use commands::GlobalArgs;

mod commands;
mod output;

use commands::{config, init, propagate, run};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "renumber")]
#[command(version = VERSION)]
#[command(about = "Renumber dictionary entry IDs and propagate the extra-section checkpoint")]
struct Cli {
    /// Path to renumber.json (defaults to ./renumber.json)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Renumber all configured data files, then propagate the checkpoint
    Run(run::RunArgs),
    /// Write an integer into a `NAME = DIGITS;` constant in a source file
    Propagate(propagate::PropagateArgs),
    /// Write the default renumber.json for the dictionary data layout
    Init(init::InitArgs),
    /// Inspect the resolved configuration
    Config(config::ConfigArgs),
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let global = GlobalArgs { config: cli.config };

    let (json_result, exit_code) = commands::run_json(cli.command, &global);
    let _ = output::print_json_result(json_result);

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
