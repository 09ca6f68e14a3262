use serde::Deserialize;
use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use wbp_core::wayback::DEFAULT_ROOT;

const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("I/O error")]
    Io(#[from] std::io::Error),
    #[error("TOML decoding error")]
    Toml(#[from] toml::de::Error),
    #[error("Unknown discovery mode: {0}")]
    UnknownDiscovery(String),
}

/// How capture boundaries are read from the archive's lookup responses.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Discovery {
    /// Memento `Link` header from a single probe.
    Link,
    /// `Location` redirects from an earliest and a latest probe.
    Location,
    /// `Link` where available, falling back to a `Location` probe.
    #[default]
    Auto,
}

impl Display for Discovery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Link => "link",
            Self::Location => "location",
            Self::Auto => "auto",
        })
    }
}

impl FromStr for Discovery {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "link" => Ok(Self::Link),
            "location" => Ok(Self::Location),
            "auto" => Ok(Self::Auto),
            other => Err(Error::UnknownDiscovery(other.to_string())),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    pub root: String,
    pub user_agent: Option<String>,
    /// Request timeout in seconds.
    pub timeout: u64,
    pub discovery: Discovery,
}

impl ClientConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path)?;

        Ok(toml::from_str(&contents)?)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(wbp_core::VERSION)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            root: DEFAULT_ROOT.to_string(),
            user_agent: None,
            timeout: DEFAULT_TIMEOUT_SECS,
            discovery: Discovery::default(),
        }
    }
}
