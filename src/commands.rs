//! Sequencing for both binaries: config, stdin, repository lookups, search, formatting.

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::error::Error;
use crate::link;
use crate::matcher;
use crate::mode::{LineSpec, LinkMode, LinkRequest};
use crate::repo::{self, GitCli, Vcs};

/// Environment variable holding the log filter, e.g. `GHLINK_LOG=debug`.
pub const LOG_ENV: &str = "GHLINK_LOG";

/// Prefix on every operational error line.
const TOOL_PREFIX: &str = "ghlink";

/// Resolve the repository location and line anchor for `request` and format the link.
/// Nothing is printed; on error there is no partial URL.
///
/// # Errors
///
/// Returns lookup errors from `vcs`, `Error::UnexpectedRemote` for an
/// unrecognized remote, or read and match errors from the search.
pub fn blob_url(request: &LinkRequest, vcs: &dyn Vcs, config: &Config) -> Result<String, Error> {
    let location = repo::locate(vcs, &request.file, &config.recognized_prefix())?;

    let anchor = match &request.lines {
        LineSpec::Anchor(anchor) => *anchor,
        LineSpec::Search(pattern) => matcher::search_file(&request.file, pattern)?.anchor(),
    };

    return Ok(link::format_link(&config.host, &location, anchor));
}

/// Install the stderr log subscriber. Quiet unless `GHLINK_LOG` asks otherwise.
pub fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_err| return EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .with_target(false)
        .without_time()
        .try_init();
}

/// Print an operational error as `ghlink: <message>` and pick the exit status.
pub fn report(e: &Error) -> ExitCode {
    eprintln!("{TOOL_PREFIX}: {e}");
    return e.exit_code();
}

/// Load `.ghlink.toml`, consume stdin if the mode needs it, and build the
/// link with git from `PATH`.
///
/// # Errors
///
/// Returns config errors, `Error::Usage` for an empty search pattern, or any
/// error from [`blob_url`].
pub fn run(mode: LinkMode, file: PathBuf) -> Result<String, Error> {
    let config = Config::load(Path::new("."))?;
    let lines = mode.into_lines(&mut io::stdin().lock())?;
    let request = LinkRequest { file, lines };
    debug!(?request, "resolved request");

    let vcs = GitCli::new(&config.remote);
    return blob_url(&request, &vcs, &config);
}
