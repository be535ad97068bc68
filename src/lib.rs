//! Permanent GitHub links to files, line ranges, and matched text.
//!
//! A link is built from three git lookups against the file's directory (the
//! `origin` remote, `HEAD`, and the path prefix within the repository) plus an
//! optional `#L{n}` or `#L{start}-L{end}` anchor. The anchor is either given
//! directly or found by matching search text line by line against the file,
//! see [`matcher`].

pub mod commands;
pub mod config;
pub mod error;
pub mod link;
pub mod matcher;
pub mod mode;
pub mod repo;
pub mod types;

pub use commands::blob_url;
pub use config::Config;
pub use error::Error;
pub use mode::{LineSpec, LinkMode, LinkRequest};
pub use repo::{GitCli, Vcs};
pub use types::LineAnchor;
