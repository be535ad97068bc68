use std::path::Path;

use tracing::debug;

use crate::error::Error;

/// File name looked up in the working directory.
pub const CONFIG_FILE: &str = ".ghlink.toml";

/// Remote queried when none is configured.
const DEFAULT_REMOTE: &str = "origin";

/// Host used when none is configured.
const DEFAULT_HOST: &str = "github.com";

/// Settings loaded from `.ghlink.toml`.
/// `host` names both the SSH remote prefix and the web host links point at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Hosting service, e.g. `github.com` or a GitHub Enterprise host.
    pub host: String,
    /// Remote whose URL identifies the repository.
    pub remote: String,
}

/// Raw TOML structure for `.ghlink.toml`.
#[derive(serde::Deserialize)]
struct GhlinkTomlConfig {
    host: Option<String>,
    remote: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        return Self {
            host: DEFAULT_HOST.to_string(),
            remote: DEFAULT_REMOTE.to_string(),
        };
    }
}

impl Config {
    /// Load config from `.ghlink.toml` in the given directory.
    /// Returns defaults if the file doesn't exist, but an error if it exists
    /// and is unreadable or malformed.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// `Error::TomlDe` if the TOML is malformed,
    /// or `Error::InvalidConfig` if a value is empty.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join(CONFIG_FILE);
        let content = match std::fs::read_to_string(&path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(Error::Io(e)),
            Ok(c) => c,
        };

        let raw: GhlinkTomlConfig = toml::from_str(&content)?;
        let defaults = Self::default();
        let config = Self {
            host: raw.host.unwrap_or(defaults.host),
            remote: raw.remote.unwrap_or(defaults.remote),
        };

        for (key, value) in [("host", &config.host), ("remote", &config.remote)] {
            if value.trim().is_empty() {
                return Err(Error::InvalidConfig {
                    path,
                    reason: format!("`{key}` must not be empty"),
                });
            }
        }

        debug!(host = %config.host, remote = %config.remote, "loaded {CONFIG_FILE}");
        return Ok(config);
    }

    /// The only remote URL form accepted: `git@<host>:`.
    pub fn recognized_prefix(&self) -> String {
        return format!("git@{}:", self.host);
    }
}
