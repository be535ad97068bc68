//! Positional form of ghlink: `ghlink-lines FILE [START [END]]`.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use ghlink::commands;
use ghlink::{Error, LinkMode};

#[derive(Parser)]
#[command(
    name = "ghlink-lines",
    version,
    about = "Print a GitHub permanent link to a file or to lines START through END"
)]
struct Cli {
    /// File in a git checkout whose `origin` is a `git@github.com:` remote
    file: PathBuf,
    /// First line to link to
    #[arg(allow_hyphen_values = true)]
    start: Option<String>,
    /// Last line to link to
    #[arg(allow_hyphen_values = true)]
    end: Option<String>,
}

fn main() -> ExitCode {
    commands::init_logging();
    let cli = Cli::parse();

    return match link(cli) {
        Ok(url) => {
            println!("{url}");
            ExitCode::SUCCESS
        },
        Err(e) => commands::report(&e),
    };
}

/// Parse the positional line numbers and build the link.
///
/// # Errors
///
/// Returns `Error::MalformedNumber` for a non-numeric line, or any error from the link pipeline.
fn link(cli: Cli) -> Result<String, Error> {
    let start = cli.start.as_deref().map(parse_line).transpose()?;
    let end = cli.end.as_deref().map(parse_line).transpose()?;
    let mode = LinkMode::resolve(start, end, None)?;
    return commands::run(mode, cli.file);
}

/// Parse one line argument as a non-negative integer.
///
/// # Errors
///
/// Returns `Error::MalformedNumber` if `value` is not a non-negative integer.
fn parse_line(value: &str) -> Result<usize, Error> {
    return value.parse::<usize>().map_err(|source| {
        return Error::MalformedNumber {
            source,
            value: value.to_string(),
        };
    });
}
