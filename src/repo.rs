//! Repository metadata: remote identity, checked-out revision, and the
//! file's path relative to the repository root.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::{Error, Lookup};
use crate::types::{RelativePath, RepositoryIdentity, Revision};

/// Suffix stripped from remote URLs.
const GIT_SUFFIX: &str = ".git";

/// Runs the `git` executable found on `PATH`.
#[derive(Debug, Clone)]
pub struct GitCli {
    /// Name of the remote whose URL identifies the repository.
    remote: String,
}

impl GitCli {
    /// Query git through the named remote (usually `origin`).
    pub fn new(remote: &str) -> Self {
        return Self {
            remote: remote.to_string(),
        };
    }

    /// Run one git query in `dir` and return its trimmed stdout.
    ///
    /// # Errors
    ///
    /// Returns `Error::LookupFailed` if git cannot be spawned, exits
    /// unsuccessfully, or prints non-UTF-8 output.
    fn query(dir: &Path, lookup: Lookup, args: &[&str]) -> Result<String, Error> {
        let output = Command::new("git")
            .args(args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                return Error::LookupFailed {
                    lookup,
                    reason: format!("cannot run git: {e}"),
                };
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr = stderr.trim();
            let reason = if stderr.is_empty() {
                format!("git {} failed: {}", args.join(" "), output.status)
            } else {
                stderr.to_string()
            };
            return Err(Error::LookupFailed { lookup, reason });
        }

        let stdout = String::from_utf8(output.stdout).map_err(|_err| {
            return Error::LookupFailed {
                lookup,
                reason: "git printed non-UTF-8 output".to_string(),
            };
        })?;
        let trimmed = stdout.trim().to_string();
        debug!(dir = %dir.display(), args = ?args, output = %trimmed, "git");
        return Ok(trimmed);
    }
}

impl Vcs for GitCli {
    fn head_revision(&self, dir: &Path) -> Result<String, Error> {
        return Self::query(dir, Lookup::Commit, &["rev-parse", "HEAD"]);
    }

    fn path_prefix(&self, dir: &Path) -> Result<String, Error> {
        return Self::query(dir, Lookup::RelativePath, &["rev-parse", "--show-prefix"]);
    }

    fn remote_url(&self, dir: &Path) -> Result<String, Error> {
        return Self::query(dir, Lookup::Repo, &["remote", "get-url", self.remote.as_str()]);
    }
}

/// Everything a blob URL needs from the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// `owner/name` of the hosted repository.
    pub identity: RepositoryIdentity,
    /// Path of the file from the repository root.
    pub path: RelativePath,
    /// Checked-out commit.
    pub revision: Revision,
}

/// The three repository queries. Each runs against the directory that
/// contains the target file and returns trimmed text.
pub trait Vcs {
    /// Identifier of the checked-out commit.
    ///
    /// # Errors
    ///
    /// Returns `Error::LookupFailed` if the revision cannot be read.
    fn head_revision(&self, dir: &Path) -> Result<String, Error>;

    /// Path of `dir` relative to the repository root, empty at the root.
    ///
    /// # Errors
    ///
    /// Returns `Error::LookupFailed` if `dir` is not inside a repository.
    fn path_prefix(&self, dir: &Path) -> Result<String, Error>;

    /// URL configured for the remote.
    ///
    /// # Errors
    ///
    /// Returns `Error::LookupFailed` if no such remote is configured.
    fn remote_url(&self, dir: &Path) -> Result<String, Error>;
}

/// Base name of the target file.
///
/// # Errors
///
/// Returns `Error::InvalidPath` if the path has no file name or it is not UTF-8.
fn base_name(file: &Path) -> Result<&str, Error> {
    return file
        .file_name()
        .and_then(|name| return name.to_str())
        .ok_or_else(|| {
            return Error::InvalidPath {
                path: file.to_path_buf(),
            };
        });
}

/// Directory git should run in for `file`. A bare file name lives in `.`.
pub fn enclosing_dir(file: &Path) -> PathBuf {
    return match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
}

/// Join git's `--show-prefix` output with the file's base name using `/`.
pub fn join_relative(prefix: &str, base: &str) -> RelativePath {
    let prefix = prefix.trim().trim_matches('/');
    if prefix.is_empty() {
        return RelativePath(base.to_string());
    }
    return RelativePath(format!("{prefix}/{base}"));
}

/// Run all three lookups for `file`, stopping at the first failure.
///
/// # Errors
///
/// Returns the failing lookup's error, `Error::UnexpectedRemote` if the remote
/// URL lacks `remote_prefix`, `Error::EmptyOutput` if git printed nothing for
/// the remote or revision, or `Error::InvalidPath` for a path without a base name.
pub fn locate(vcs: &dyn Vcs, file: &Path, remote_prefix: &str) -> Result<Location, Error> {
    let dir = enclosing_dir(file);
    let base = base_name(file)?;

    let url = vcs.remote_url(&dir)?;
    let identity = parse_remote_identity(&url, remote_prefix)?;

    let revision = vcs.head_revision(&dir)?;
    if revision.is_empty() {
        return Err(Error::EmptyOutput { lookup: Lookup::Commit });
    }

    let prefix = vcs.path_prefix(&dir)?;
    let path = join_relative(&prefix, base);

    return Ok(Location {
        identity,
        path,
        revision: Revision(revision),
    });
}

/// Extract `owner/name` from a remote URL of the form `<prefix>owner/name[.git]`.
///
/// # Errors
///
/// Returns `Error::EmptyOutput` for an empty URL, or `Error::UnexpectedRemote`
/// if the URL does not start with `prefix` or names no repository after it.
pub fn parse_remote_identity(url: &str, prefix: &str) -> Result<RepositoryIdentity, Error> {
    let url = url.trim();
    if url.is_empty() {
        return Err(Error::EmptyOutput { lookup: Lookup::Repo });
    }

    let unexpected = || {
        return Error::UnexpectedRemote {
            url: url.to_string(),
            want: prefix.to_string(),
        };
    };

    let rest = url.strip_prefix(prefix).ok_or_else(unexpected)?;
    let rest = rest.strip_suffix(GIT_SUFFIX).unwrap_or(rest);
    if rest.is_empty() {
        return Err(unexpected());
    }
    return Ok(RepositoryIdentity(rest.to_string()));
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::unwrap_used, reason = "tests")]
mod tests {
    use std::cell::RefCell;

    use super::*;

    /// Canned answers plus a record of the directories queried.
    struct FakeVcs {
        prefix: Result<&'static str, Lookup>,
        remote: Result<&'static str, Lookup>,
        revision: Result<&'static str, Lookup>,
        seen: RefCell<Vec<PathBuf>>,
    }

    impl FakeVcs {
        fn ok(remote: &'static str, revision: &'static str, prefix: &'static str) -> Self {
            return Self {
                prefix: Ok(prefix),
                remote: Ok(remote),
                revision: Ok(revision),
                seen: RefCell::new(Vec::new()),
            };
        }

        fn answer(&self, dir: &Path, canned: Result<&'static str, Lookup>) -> Result<String, Error> {
            self.seen.borrow_mut().push(dir.to_path_buf());
            return canned.map(str::to_string).map_err(|lookup| {
                return Error::LookupFailed {
                    lookup,
                    reason: "fatal: not a git repository".to_string(),
                };
            });
        }
    }

    impl Vcs for FakeVcs {
        fn head_revision(&self, dir: &Path) -> Result<String, Error> {
            return self.answer(dir, self.revision);
        }

        fn path_prefix(&self, dir: &Path) -> Result<String, Error> {
            return self.answer(dir, self.prefix);
        }

        fn remote_url(&self, dir: &Path) -> Result<String, Error> {
            return self.answer(dir, self.remote);
        }
    }

    #[test]
    fn identity_strips_prefix_and_suffix() {
        let prefix = "git@github.com:";
        for url in ["git@github.com:alice/proj.git", "git@github.com:alice/proj", "  git@github.com:alice/proj.git\n"] {
            assert_eq!(
                parse_remote_identity(url, prefix).unwrap(),
                RepositoryIdentity("alice/proj".to_string())
            );
        }
    }

    #[test]
    fn https_remote_is_rejected() {
        let err = parse_remote_identity("https://github.com/alice/proj.git", "git@github.com:").unwrap_err();
        let msg = err.to_string();
        assert!(matches!(err, Error::UnexpectedRemote { .. }));
        assert!(msg.contains("cannot get repo"), "{msg}");
        assert!(msg.contains("git@github.com:"), "{msg}");
    }

    #[test]
    fn bare_prefix_names_no_repository() {
        let err = parse_remote_identity("git@github.com:.git", "git@github.com:").unwrap_err();
        assert!(matches!(err, Error::UnexpectedRemote { .. }));
    }

    #[test]
    fn relative_path_joins_with_slash() {
        assert_eq!(join_relative("", "README.md").0, "README.md");
        assert_eq!(join_relative("src/\n", "main.rs").0, "src/main.rs");
        assert_eq!(join_relative("src/bin/", "ghlink.rs").0, "src/bin/ghlink.rs");
    }

    #[test]
    fn bare_file_name_runs_in_current_dir() {
        assert_eq!(enclosing_dir(Path::new("README.md")), PathBuf::from("."));
        assert_eq!(enclosing_dir(Path::new("src/lib.rs")), PathBuf::from("src"));
    }

    #[test]
    fn locate_queries_the_enclosing_directory() {
        let vcs = FakeVcs::ok("git@github.com:alice/proj.git", "abc123", "docs/");
        let location = locate(&vcs, Path::new("docs/guide.md"), "git@github.com:").unwrap();

        assert_eq!(location.identity.0, "alice/proj");
        assert_eq!(location.revision.0, "abc123");
        assert_eq!(location.path.0, "docs/guide.md");
        assert!(vcs.seen.borrow().iter().all(|d| return d == Path::new("docs")));
        assert_eq!(vcs.seen.borrow().len(), 3);
    }

    #[test]
    fn failing_lookup_is_named() {
        let mut vcs = FakeVcs::ok("git@github.com:alice/proj.git", "abc123", "");
        vcs.revision = Err(Lookup::Commit);
        let err = locate(&vcs, Path::new("README.md"), "git@github.com:").unwrap_err();
        assert!(err.to_string().starts_with("cannot get commit"), "{err}");

        let mut vcs = FakeVcs::ok("git@github.com:alice/proj.git", "abc123", "");
        vcs.remote = Err(Lookup::Repo);
        let err = locate(&vcs, Path::new("README.md"), "git@github.com:").unwrap_err();
        assert!(err.to_string().starts_with("cannot get repo"), "{err}");
        assert_eq!(vcs.seen.borrow().len(), 1);

        let mut vcs = FakeVcs::ok("git@github.com:alice/proj.git", "abc123", "");
        vcs.prefix = Err(Lookup::RelativePath);
        let err = locate(&vcs, Path::new("README.md"), "git@github.com:").unwrap_err();
        assert!(err.to_string().starts_with("cannot get relative path"), "{err}");
    }

    #[test]
    fn empty_revision_is_rejected() {
        let vcs = FakeVcs::ok("git@github.com:alice/proj.git", "", "");
        let err = locate(&vcs, Path::new("README.md"), "git@github.com:").unwrap_err();
        assert!(matches!(err, Error::EmptyOutput { lookup: Lookup::Commit }));
    }

    #[test]
    fn path_without_base_name_is_rejected_before_git() {
        let vcs = FakeVcs::ok("git@github.com:alice/proj.git", "abc123", "");
        let err = locate(&vcs, Path::new(".."), "git@github.com:").unwrap_err();
        assert!(matches!(err, Error::InvalidPath { .. }));
        assert!(vcs.seen.borrow().is_empty());
    }
}
