//! Loading a [`Command`] from a TOML or YAML file.
//!
//! ```toml
//! src = "alice@h1:/home/alice"
//! dest = { path = "/backup" }
//!
//! [options]
//! flags = ["archive", "v"]
//! excludes = ["tmp/"]
//! info = ["all", "symsafe"]
//! ```
//!
//! Endpoints may be written as a `[user@]host:path` string or as a table with `path`, `user`,
//! and `host`.

use std::path::{Path, PathBuf};
use std::{fs, io};

use serde::Deserialize;
use tap::TapFallible;
use thiserror::Error;

use crate::command::{self, Command, Side};
use crate::endpoint::{self, Endpoint};
use crate::options::Options;

/// Errors that can happen while loading a command configuration.
#[derive(Debug, Error)]
pub enum Error {
    /// Error while reading the configuration file.
    #[error("failed to read command configuration: {0}")]
    ReadConfig(#[from] io::Error),
    /// Error while parsing a TOML configuration.
    #[error("failed to parse TOML command configuration: {0}")]
    DeserializeTOML(#[from] toml::de::Error),
    /// Error while parsing a YAML configuration.
    #[cfg(feature = "yaml")]
    #[error("failed to parse YAML command configuration: {0}")]
    DeserializeYAML(#[from] serde_yaml::Error),
    /// The file has no or an unsupported extension.
    #[error("command configuration must have file extension \".toml\", \".yaml\", or \".yml\": {0}")]
    InvalidExtension(PathBuf),
    /// An endpoint string could not be parsed.
    #[error("invalid {side} endpoint: {error}")]
    Endpoint {
        /// The side the endpoint is on.
        side: Side,
        /// Why parsing failed.
        #[source]
        error: endpoint::Error,
    },
    /// The parsed configuration does not make a valid command.
    #[error(transparent)]
    Command(#[from] command::Error),
}

/// An endpoint as written in a configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum EndpointConfig {
    /// `[user@]host:path` or a local path.
    Spec(String),
    /// Explicit `path`, `user`, and `host`.
    Table(Endpoint),
}

impl EndpointConfig {
    fn into_endpoint(self, side: Side) -> Result<Endpoint, Error> {
        match self {
            Self::Spec(spec) => spec
                .parse()
                .map_err(|error| Error::Endpoint { side, error }),
            Self::Table(endpoint) => Ok(endpoint),
        }
    }
}

/// The contents of a command configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandConfig {
    /// Where files are copied from.
    pub src: EndpointConfig,
    /// Where files are copied to.
    pub dest: EndpointConfig,
    /// Transfer options.
    #[serde(default)]
    pub options: Option<Options>,
}

impl CommandConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// [`Error::DeserializeTOML`] if the text is not a valid configuration.
    pub fn from_toml_str(s: &str) -> Result<Self, Error> {
        toml::from_str(s).map_err(Error::from)
    }

    /// Parses a configuration from YAML text.
    ///
    /// # Errors
    ///
    /// [`Error::DeserializeYAML`] if the text is not a valid configuration.
    #[cfg(feature = "yaml")]
    pub fn from_yaml_str(s: &str) -> Result<Self, Error> {
        serde_yaml::from_str(s).map_err(Error::from)
    }

    /// Reads a configuration file, choosing the format by file extension.
    ///
    /// # Errors
    ///
    /// Variants of [`enum@Error`] related to reading and parsing the file.
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        tracing::debug!("reading command configuration from \"{}\"", path.display());
        let s = fs::read_to_string(path).tap_err(|error| {
            tracing::error!(%error, "failed to read {}", path.display());
        })?;

        match path.extension().and_then(std::ffi::OsStr::to_str) {
            Some("toml" | "TOML") => Self::from_toml_str(&s),
            #[cfg(feature = "yaml")]
            Some("yaml" | "yml" | "YAML" | "YML") => Self::from_yaml_str(&s),
            _ => Err(Error::InvalidExtension(path.to_owned())),
        }
    }
}

impl TryFrom<CommandConfig> for Command {
    type Error = Error;

    fn try_from(config: CommandConfig) -> Result<Self, Self::Error> {
        let src = config.src.into_endpoint(Side::Src)?;
        let dest = config.dest.into_endpoint(Side::Dest)?;
        Command::new(src, dest, config.options).map_err(Error::from)
    }
}

impl Command {
    /// Reads a [`CommandConfig`] from `path` and builds a `Command` from it.
    ///
    /// # Errors
    ///
    /// Any error from [`CommandConfig::from_file`] or [`Command::new`].
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        CommandConfig::from_file(path).and_then(Self::try_from)
    }
}
