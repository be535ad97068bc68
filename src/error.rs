/// Crate-level error types for ghlink.
use std::fmt;
use std::num::ParseIntError;
use std::path::PathBuf;
use std::process::ExitCode;

/// Every error names the file, lookup, or value it concerns so the single
/// `ghlink: ...` line on stderr is enough to diagnose the failure.
#[allow(clippy::error_impl_error, reason = "crate-level error type re-exported as ghlink::Error")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A git query succeeded but printed nothing.
    #[error("cannot get {lookup}: git printed nothing")]
    EmptyOutput {
        /// The repository query that came back empty.
        lookup: Lookup,
    },

    /// `.ghlink.toml` parsed but holds a value that cannot be used.
    #[error("invalid config {}: {reason}", path.display())]
    InvalidConfig {
        /// Path to the offending config file.
        path: PathBuf,
        /// What is wrong with it.
        reason: String,
    },

    /// The file argument has no usable base name.
    #[error("invalid file path: {}", path.display())]
    InvalidPath {
        /// Path as supplied by the caller.
        path: PathBuf,
    },

    /// Underlying I/O error outside of the searched file.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// A git query could not be run or exited unsuccessfully.
    #[error("cannot get {lookup}: {reason}")]
    LookupFailed {
        /// The repository query that failed.
        lookup: Lookup,
        /// git's stderr, exit status, or the spawn error.
        reason: String,
    },

    /// A positional line argument is not a non-negative integer.
    #[error("malformed line number `{value}`: {source}")]
    MalformedNumber {
        /// The integer parse error.
        source: ParseIntError,
        /// Argument text as supplied.
        value: String,
    },

    /// Not every search line matched, in order, before the file ended.
    #[error("cannot search lines: file {} does not contain string `{text}`", path.display())]
    NoMatch {
        /// File that was searched.
        path: PathBuf,
        /// Search text with its trailing newline removed.
        text: String,
    },

    /// The searched file could not be opened or read.
    #[error("cannot search lines: {}: {source}", path.display())]
    ReadFailed {
        /// File that was being searched.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// TOML deserialization of `.ghlink.toml` failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),

    /// The remote URL does not use the recognized `git@<host>:` form.
    #[error("cannot get repo: unexpected prefix for remote `{url}` (want `{want}`)")]
    UnexpectedRemote {
        /// Remote URL as reported by git.
        url: String,
        /// The prefix that was expected.
        want: String,
    },

    /// The invocation itself is malformed.
    #[error("{reason}")]
    Usage {
        /// Which rule the arguments broke.
        reason: String,
    },
}

impl Error {
    /// Process exit status for this error: 2 for bad usage, 1 otherwise.
    pub fn exit_code(&self) -> ExitCode {
        return match self {
            Self::Usage { .. } => ExitCode::from(2),
            _ => ExitCode::FAILURE,
        };
    }

    /// Whether the error is a usage error rather than an operational failure.
    pub const fn is_usage(&self) -> bool {
        return matches!(self, Self::Usage { .. });
    }
}

/// The three repository queries, named the way error messages refer to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// Current revision (`git rev-parse HEAD`).
    Commit,
    /// Repository-root-relative prefix (`git rev-parse --show-prefix`).
    RelativePath,
    /// Remote URL (`git remote get-url`).
    Repo,
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Commit => "commit",
            Self::RelativePath => "relative path",
            Self::Repo => "repo",
        };
        return f.write_str(name);
    }
}
