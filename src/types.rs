/// Core domain types for ghlink: repository coordinates, anchors, and matches.
use std::fmt;

/// Line fragment appended to a blob URL.
/// Range bounds are kept in the order they were given, never swapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineAnchor {
    /// A single line, rendered as `#L{n}`.
    Line(usize),
    /// A line range, rendered as `#L{start}-L{end}`.
    Range {
        /// Last line of the range.
        end: usize,
        /// First line of the range.
        start: usize,
    },
    /// No fragment at all.
    WholeFile,
}

impl fmt::Display for LineAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return match self {
            Self::Line(line) => write!(f, "#L{line}"),
            Self::Range { end, start } => write!(f, "#L{start}-L{end}"),
            Self::WholeFile => Ok(()),
        };
    }
}

/// Output of a successful search. One 1-based line number per search line,
/// strictly increasing, never empty by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMatch {
    /// First matched line.
    first: usize,
    /// Last matched line, when more than one line matched.
    last: Option<usize>,
    /// Matched line numbers in search order.
    lines: Vec<usize>,
}

impl LineMatch {
    /// Wrap matched line numbers. Returns `None` for an empty list.
    pub(crate) fn new(lines: Vec<usize>) -> Option<Self> {
        let (&first, rest) = lines.split_first()?;
        let last = rest.last().copied();
        return Some(Self { first, last, lines });
    }

    /// Anchor spanning the first and last matched lines.
    /// A single matched line gives a single-line anchor.
    pub fn anchor(&self) -> LineAnchor {
        return match self.last {
            Some(end) => LineAnchor::Range { end, start: self.first },
            None => LineAnchor::Line(self.first),
        };
    }

    /// Matched line numbers in search order.
    pub fn lines(&self) -> &[usize] {
        return &self.lines;
    }
}

/// Path of the file relative to the repository root, `/`-separated,
/// without a leading separator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelativePath(
    /// The joined path text.
    pub String,
);

/// The `owner/name` pair of a hosted repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryIdentity(
    /// Owner and repository name joined by `/`.
    pub String,
);

/// Opaque identifier of the checked-out commit. Only ever non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision(
    /// The identifier as printed by git.
    pub String,
);

/// Search text split into the lines to be matched in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPattern {
    /// Lines to match, in order. Never empty.
    lines: Vec<String>,
    /// The text with one trailing newline removed, used in diagnostics.
    text: String,
}

impl SearchPattern {
    /// Build a pattern from already-split lines and the text they came from.
    pub(crate) const fn from_parts(lines: Vec<String>, text: String) -> Self {
        return Self { lines, text };
    }

    /// Lines to match, in order.
    pub fn lines(&self) -> &[String] {
        return &self.lines;
    }

    /// The search text as given, minus its trailing newline.
    pub fn text(&self) -> &str {
        return &self.text;
    }
}
