use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{CommandFactory as _, Parser};

use ghlink::commands;
use ghlink::mode::{self, LinkMode};

#[derive(Parser)]
#[command(
    name = "ghlink",
    version,
    about = "Print a GitHub permanent link to a file, a line range, or matching text",
    override_usage = "ghlink [-l1 line1 [-l2 line2] | -s text] file"
)]
struct Cli {
    /// File in a git checkout whose `origin` is a `git@github.com:` remote
    file: PathBuf,
    /// Link to this start line
    #[arg(long = "l1", value_name = "line1")]
    line1: Option<usize>,
    /// Link through this end line (requires -l1)
    #[arg(long = "l2", value_name = "line2")]
    line2: Option<usize>,
    /// Link to the lines matching text; `-` reads the text from stdin
    #[arg(short = 's', long = "search", value_name = "text", allow_hyphen_values = true)]
    search: Option<String>,
}

fn main() -> ExitCode {
    commands::init_logging();
    let cli = Cli::parse_from(mode::normalize_go_flags(std::env::args_os()));

    let mode = match LinkMode::resolve(cli.line1, cli.line2, cli.search) {
        Ok(mode) => mode,
        Err(e) => return usage_error(&e),
    };

    return match commands::run(mode, cli.file) {
        Ok(url) => {
            println!("{url}");
            ExitCode::SUCCESS
        },
        Err(e) if e.is_usage() => usage_error(&e),
        Err(e) => commands::report(&e),
    };
}

/// Render a usage error the way clap renders its own, with the usage line.
fn usage_error(e: &ghlink::Error) -> ExitCode {
    let err = Cli::command().error(ErrorKind::ArgumentConflict, e);
    err.print().ok();
    return e.exit_code();
}
