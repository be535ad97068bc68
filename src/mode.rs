//! Addressing modes: whole file, explicit line or range, or search text.
//!
//! Both command-line surfaces funnel their optional inputs through
//! [`LinkMode::resolve`], so the exclusivity rules live in one place and are
//! checked before any file, stdin, or git access.

use std::ffi::OsString;
use std::io::Read;
use std::path::PathBuf;

use crate::error::Error;
use crate::matcher;
use crate::types::{LineAnchor, SearchPattern};

/// Search text argument that means "read the pattern from stdin".
pub const STDIN_SENTINEL: &str = "-";

/// Go flag spellings and the long options clap knows them by.
const GO_FLAGS: [(&str, &str); 3] = [("--s", "--search"), ("-l1", "--l1"), ("-l2", "--l2")];

/// Options that take a separate value on the flagged surface.
const VALUE_FLAGS: [&str; 4] = ["--l1", "--l2", "--search", "-s"];

/// How the file should be addressed, as decided from the arguments alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkMode {
    /// One explicit line.
    Line(usize),
    /// Two explicit lines, kept in the order given.
    Range {
        /// Second line argument.
        end: usize,
        /// First line argument.
        start: usize,
    },
    /// Lines located by matching text.
    Search(SearchSource),
    /// No line anchor.
    WholeFile,
}

impl LinkMode {
    /// Turn the mode into a line specification, reading stdin if the
    /// pattern comes from there.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if stdin cannot be read, or `Error::Usage` if the
    /// search text is empty.
    pub fn into_lines(self, stdin: &mut dyn Read) -> Result<LineSpec, Error> {
        return match self {
            Self::Line(line) => Ok(LineSpec::Anchor(LineAnchor::Line(line))),
            Self::Range { end, start } => Ok(LineSpec::Anchor(LineAnchor::Range { end, start })),
            Self::Search(SearchSource::Inline(text)) => Ok(LineSpec::Search(matcher::parse_pattern(&text)?)),
            Self::Search(SearchSource::Stdin) => {
                let mut bytes = Vec::new();
                stdin.read_to_end(&mut bytes)?;
                Ok(LineSpec::Search(matcher::parse_pattern(&String::from_utf8_lossy(&bytes))?))
            },
            Self::WholeFile => Ok(LineSpec::Anchor(LineAnchor::WholeFile)),
        };
    }

    /// Decide the mode from which optional inputs were supplied.
    ///
    /// # Errors
    ///
    /// Returns `Error::Usage` for an end line without a start line, explicit
    /// lines combined with search text, or empty search text.
    pub fn resolve(line1: Option<usize>, line2: Option<usize>, search: Option<String>) -> Result<Self, Error> {
        return match (line1, line2, search) {
            (None, Some(_), _) => Err(usage("end line requires a start line")),
            (Some(_), _, Some(_)) => Err(usage("line numbers and search text are mutually exclusive")),
            (None, None, Some(text)) if text.is_empty() => Err(usage("search text is empty")),
            (None, None, Some(text)) if text == STDIN_SENTINEL => Ok(Self::Search(SearchSource::Stdin)),
            (None, None, Some(text)) => Ok(Self::Search(SearchSource::Inline(text))),
            (Some(start), Some(end), None) => Ok(Self::Range { end, start }),
            (Some(line), None, None) => Ok(Self::Line(line)),
            (None, None, None) => Ok(Self::WholeFile),
        };
    }
}

/// A complete invocation: the file and how to address it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRequest {
    /// Target file as given on the command line.
    pub file: PathBuf,
    /// Anchor to emit, or text to locate first.
    pub lines: LineSpec,
}

/// Line addressing after stdin has been consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineSpec {
    /// Emit this anchor as-is.
    Anchor(LineAnchor),
    /// Search the file and anchor the matched lines.
    Search(SearchPattern),
}

/// Where search text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchSource {
    /// Given directly on the command line.
    Inline(String),
    /// Read from standard input.
    Stdin,
}

/// Rewrite Go-style `-l1 N`, `-l1=N`, `-l2` and `--s TEXT` into the long spellings clap parses.
/// Values following a value-taking option and everything after `--` are left alone.
pub fn normalize_go_flags<I: IntoIterator<Item = OsString>>(args: I) -> Vec<OsString> {
    let mut out = Vec::new();
    let mut passthrough = false;
    let mut value_next = false;

    for arg in args {
        if passthrough || value_next {
            value_next = false;
            out.push(arg);
            continue;
        }
        let Some(text) = arg.to_str() else {
            out.push(arg);
            continue;
        };
        if text == "--" {
            passthrough = true;
            out.push(arg);
            continue;
        }

        let rewritten = rewrite_go_flag(text).unwrap_or_else(|| return text.to_string());
        value_next = VALUE_FLAGS.contains(&rewritten.as_str());
        out.push(OsString::from(rewritten));
    }
    return out;
}

/// `-l1` → `--l1`, `-l2=7` → `--l2=7`, `--s` → `--search`; `None` for anything else.
fn rewrite_go_flag(arg: &str) -> Option<String> {
    for (go, long) in GO_FLAGS {
        let Some(rest) = arg.strip_prefix(go) else {
            continue;
        };
        if rest.is_empty() || rest.starts_with('=') {
            return Some(format!("{long}{rest}"));
        }
    }
    return None;
}

/// Build a usage error.
fn usage(reason: &str) -> Error {
    return Error::Usage {
        reason: reason.to_string(),
    };
}
