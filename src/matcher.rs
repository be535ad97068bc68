//! In-order substring matching of multi-line search text against a file.
//!
//! Each search line must be contained in some file line, and the file lines
//! that satisfy them must appear in the same order as the search lines. They
//! need not be adjacent, so blank or unrelated lines in the file between the
//! searched-for lines are skipped. Containment rather than equality means
//! indentation lost when copying text out of a rendered view still matches.

use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::error::Error;
use crate::types::{LineMatch, SearchPattern};

/// Scan `reader` line by line, advancing through the pattern on each hit.
///
/// Returns `Ok(None)` when the input ends before every pattern line matched.
/// Reading stops as soon as the last pattern line matches.
///
/// # Errors
///
/// Returns the reader's I/O error, if any, encountered before the match completed.
pub fn find_in_order<R: BufRead>(reader: R, pattern: &SearchPattern) -> io::Result<Option<LineMatch>> {
    let wanted = pattern.lines();
    let mut matched: Vec<usize> = Vec::with_capacity(wanted.len());
    let mut line_number = 0_usize;

    for raw in reader.split(b'\n') {
        let raw = raw?;
        line_number = line_number.saturating_add(1);

        let Some(next) = wanted.get(matched.len()) else {
            break;
        };
        if file_line_text(&raw).contains(next.as_str()) {
            matched.push(line_number);
            if matched.len() == wanted.len() {
                break;
            }
        }
    }

    if matched.len() < wanted.len() {
        return Ok(None);
    }
    return Ok(LineMatch::new(matched));
}

/// Decode one raw file line, dropping a trailing carriage return.
/// Invalid UTF-8 is replaced rather than rejected.
fn file_line_text(raw: &[u8]) -> Cow<'_, str> {
    let trimmed = raw.strip_suffix(b"\r").unwrap_or(raw);
    return String::from_utf8_lossy(trimmed);
}

/// Split search text into pattern lines.
///
/// One trailing newline is removed first so `"foo\nbar\n"` is two lines, not three.
///
/// # Errors
///
/// Returns `Error::Usage` if nothing remains after removing the trailing newline.
pub fn parse_pattern(text: &str) -> Result<SearchPattern, Error> {
    let body = text
        .strip_suffix("\r\n")
        .or_else(|| return text.strip_suffix('\n'))
        .unwrap_or(text);

    if body.is_empty() {
        return Err(Error::Usage {
            reason: "search text is empty".to_string(),
        });
    }

    let lines = body
        .split('\n')
        .map(|line| return line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect();
    return Ok(SearchPattern::from_parts(lines, body.to_string()));
}

/// Search the file at `path` for `pattern`.
/// The file is closed when this returns, on success and on every error.
///
/// # Errors
///
/// Returns `Error::ReadFailed` if the file cannot be opened or read,
/// or `Error::NoMatch` if not every pattern line matched in order.
pub fn search_file(path: &Path, pattern: &SearchPattern) -> Result<LineMatch, Error> {
    let file = File::open(path).map_err(|source| {
        return Error::ReadFailed {
            path: path.to_path_buf(),
            source,
        };
    })?;

    let found = find_in_order(BufReader::new(file), pattern).map_err(|source| {
        return Error::ReadFailed {
            path: path.to_path_buf(),
            source,
        };
    })?;

    let Some(found) = found else {
        return Err(Error::NoMatch {
            path: path.to_path_buf(),
            text: pattern.text().to_string(),
        });
    };

    debug!(path = %path.display(), lines = ?found.lines(), "search matched");
    return Ok(found);
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::unwrap_used, clippy::indexing_slicing, reason = "tests")]
mod tests {
    use std::io::{Cursor, Read};

    use super::*;
    use crate::types::LineAnchor;

    /// Reader that fails every read, to prove the scan never reached it.
    struct Exploding;

    impl Read for Exploding {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            return Err(io::Error::other("read past the match"));
        }
    }

    fn find(file: &str, text: &str) -> Option<Vec<usize>> {
        let pattern = parse_pattern(text).unwrap();
        let found = find_in_order(Cursor::new(file.as_bytes()), &pattern).unwrap();
        return found.map(|m| return m.lines().to_vec());
    }

    #[test]
    fn single_line_yields_single_anchor() {
        let file = "a\nb\nc\nd\nneedle here\nf\n";
        let pattern = parse_pattern("needle").unwrap();
        let found = find_in_order(Cursor::new(file), &pattern).unwrap().unwrap();
        assert_eq!(found.lines(), &[5]);
        assert_eq!(found.anchor(), LineAnchor::Line(5));
    }

    #[test]
    fn trailing_newline_is_not_a_pattern_line() {
        let file = "zero\nfoo\nx\nbar\n";
        assert_eq!(find(file, "foo\nbar\n"), Some(vec![2, 4]));
        assert_eq!(parse_pattern("foo\nbar\n").unwrap().lines().len(), 2);
    }

    #[test]
    fn matches_need_not_be_adjacent() {
        let file = "1\n2\n3\n4\nfn main() {\n6\n\n8\n}\n";
        let pattern = parse_pattern("fn main() {\n}").unwrap();
        let found = find_in_order(Cursor::new(file), &pattern).unwrap().unwrap();
        assert_eq!(found.lines(), &[5, 9]);
        assert_eq!(found.anchor(), LineAnchor::Range { end: 9, start: 5 });
    }

    #[test]
    fn containment_tolerates_indentation() {
        let file = "Usage:\n\n    ghlink file\n";
        assert_eq!(find(file, "Usage:\n\nghlink file"), Some(vec![1, 2, 3]));
    }

    #[test]
    fn earliest_in_order_lines_win() {
        let file = "foo\nfoo\nbar\nfoo\nbar\n";
        assert_eq!(find(file, "foo\nbar"), Some(vec![1, 3]));
    }

    #[test]
    fn out_of_order_text_does_not_match() {
        let file = "bar\nfoo\n";
        assert_eq!(find(file, "foo\nbar"), None);
    }

    #[test]
    fn partial_match_is_a_failure() {
        let file = "foo\nbar\n";
        assert_eq!(find(file, "foo\nbar\nbaz"), None);
    }

    #[test]
    fn one_file_line_satisfies_one_pattern_line() {
        assert_eq!(find("foo\n", "foo\nfoo"), None);
        assert_eq!(find("foo\nfoo\n", "foo\nfoo"), Some(vec![1, 2]));
    }

    #[test]
    fn crlf_lines_are_trimmed_on_both_sides() {
        let file = "alpha\r\nbeta\r\n";
        assert_eq!(find(file, "alpha\r\nbeta\r\n"), Some(vec![1, 2]));
        assert_eq!(find(file, "alpha$"), None);
    }

    #[test]
    fn invalid_utf8_lines_are_still_searched() {
        let file: &[u8] = b"\xff\xfe junk\nneedle \xff\n";
        let pattern = parse_pattern("needle").unwrap();
        let found = find_in_order(Cursor::new(file), &pattern).unwrap().unwrap();
        assert_eq!(found.lines(), &[2]);
    }

    #[test]
    fn stops_reading_once_every_line_matched() {
        let reader = BufReader::new(Cursor::new(b"needle\n".to_vec()).chain(Exploding));
        let pattern = parse_pattern("needle").unwrap();
        let found = find_in_order(reader, &pattern).unwrap().unwrap();
        assert_eq!(found.lines(), &[1]);
    }

    #[test]
    fn read_errors_before_completion_propagate() {
        let reader = BufReader::new(Cursor::new(b"nothing\n".to_vec()).chain(Exploding));
        let pattern = parse_pattern("needle").unwrap();
        assert!(find_in_order(reader, &pattern).is_err());
    }

    #[test]
    fn empty_text_is_a_usage_error() {
        assert!(parse_pattern("").unwrap_err().is_usage());
        assert!(parse_pattern("\n").unwrap_err().is_usage());
    }

    #[test]
    fn interior_blank_line_matches_any_line() {
        let pattern = parse_pattern("a\n\nb").unwrap();
        assert_eq!(pattern.lines(), &["a".to_string(), String::new(), "b".to_string()]);
        assert_eq!(find("a\nxyz\nb\n", "a\n\nb"), Some(vec![1, 2, 3]));
    }

    #[test]
    fn no_match_reports_path_and_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "foo\n").unwrap();

        let pattern = parse_pattern("foo\nbar\n").unwrap();
        let err = search_file(&path, &pattern).unwrap_err();
        let msg = err.to_string();
        assert!(matches!(err, Error::NoMatch { .. }));
        assert!(msg.contains("foo\nbar"), "{msg}");
        assert!(msg.contains("notes.txt"), "{msg}");
    }

    #[test]
    fn missing_file_is_a_read_failure() {
        let dir = tempfile::tempdir().unwrap();
        let pattern = parse_pattern("foo").unwrap();
        let err = search_file(&dir.path().join("absent.rs"), &pattern).unwrap_err();
        assert!(matches!(err, Error::ReadFailed { .. }));
    }
}
