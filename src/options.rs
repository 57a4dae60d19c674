//! Transfer options: flags, filter patterns, `--info` topics, and key-value switches.
//!
//! Constructing [`Options`] never fails. Validation happens when the options are embedded in a
//! [`Command`](crate::Command), or earlier if the caller asks with [`Options::validate`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog;
use crate::info::InfoOptions;

/// The backup suffix rsync uses when none is given.
pub const DEFAULT_SUFFIX: &str = "~";

const SUFFIX_KEY: &str = "suffix";

/// Flags of [`Options::recommended`]: an archive copy that reports what it changed.
pub const RECOMMENDED_FLAGS: &[&str] = &[
    "archive",
    "verbose",
    "human-readable",
    "stats",
    "itemize-changes",
];

/// Errors that may occur while normalizing or validating [`Options`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The flag is neither the long name nor the short alias of a supported flag.
    #[error("flag \"{0}\" not recognized or supported")]
    UnrecognizedFlag(String),
    /// `--info` was given without any topics.
    #[error("info options must contain at least one topic")]
    EmptyInfo,
    /// The topic is not accepted by `--info`.
    #[error("info topic \"{0}\" not recognized or supported")]
    UnrecognizedInfoTopic(String),
    /// The key is not a supported key-value option.
    #[error("option \"{0}\" not recognized or supported")]
    UnrecognizedOption(String),
}

fn default_suffix() -> String {
    DEFAULT_SUFFIX.to_owned()
}

/// The full set of options for one transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Options {
    /// Boolean flags, by long name or short alias.
    #[serde(default)]
    pub flags: Vec<String>,
    /// Patterns passed to `--include`, in order.
    #[serde(default)]
    pub includes: Vec<String>,
    /// Patterns passed to `--exclude`, in order.
    #[serde(default)]
    pub excludes: Vec<String>,
    /// Topics passed to `--info`.
    #[serde(default)]
    pub info: Option<InfoOptions>,
    /// Options that take a value, keyed by long name.
    #[serde(default)]
    pub kv: Option<BTreeMap<String, String>>,
    /// The backup suffix.
    #[serde(default = "default_suffix")]
    pub suffix: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            flags: Vec::new(),
            includes: Vec::new(),
            excludes: Vec::new(),
            info: None,
            kv: None,
            suffix: default_suffix(),
        }
    }
}

impl Options {
    /// Options for a typical archive copy that reports every change it makes.
    ///
    /// Uses [`RECOMMENDED_FLAGS`]; everything else is left at its default.
    #[must_use]
    pub fn recommended() -> Self {
        Self::default().with_flags(RECOMMENDED_FLAGS.iter().copied())
    }

    /// Replaces each flag with the canonical long name of the first catalog entry whose long
    /// name or short alias matches it. Order is preserved.
    ///
    /// # Errors
    ///
    /// [`Error::UnrecognizedFlag`] for the first flag that matches nothing.
    pub fn normalize_flags<I, S>(flags: I) -> Result<Vec<String>, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        flags
            .into_iter()
            .map(|flag| {
                let flag = flag.as_ref();
                match catalog::find_flag(flag) {
                    Some(spec) => {
                        tracing::trace!(flag, canonical = spec.long, "normalized flag");
                        Ok(spec.long.to_owned())
                    }
                    None => Err(Error::UnrecognizedFlag(flag.to_owned())),
                }
            })
            .collect()
    }

    /// Returns whether every flag is a canonical flag name. No flags at all is valid.
    ///
    /// Short aliases are not canonical; use [`Options::normalize_flags`] first.
    #[must_use]
    pub fn is_flags_valid<S: AsRef<str>>(flags: &[S]) -> bool {
        flags.iter().all(|flag| catalog::is_flag(flag.as_ref()))
    }

    /// Returns whether the flags, the `--info` topics, and the key-value options are all valid.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Like [`Options::is_valid`], but reports the first problem found.
    ///
    /// # Errors
    ///
    /// - [`Error::UnrecognizedFlag`] if a flag is not a canonical flag name.
    /// - [`Error::EmptyInfo`] or [`Error::UnrecognizedInfoTopic`] from [`InfoOptions::validate`].
    /// - [`Error::UnrecognizedOption`] if a key-value option is not supported.
    pub fn validate(&self) -> Result<(), Error> {
        if let Some(flag) = self.flags.iter().find(|flag| !catalog::is_flag(flag)) {
            return Err(Error::UnrecognizedFlag(flag.clone()));
        }

        if let Some(info) = &self.info {
            info.validate()?;
        }

        let unknown_key = self
            .kv
            .iter()
            .flat_map(BTreeMap::keys)
            .find(|key| !catalog::is_kv_option(key));
        match unknown_key {
            Some(key) => Err(Error::UnrecognizedOption(key.clone())),
            None => Ok(()),
        }
    }

    /// Returns these options with every flag alias replaced by its canonical name.
    ///
    /// # Errors
    ///
    /// See [`Options::normalize_flags`].
    pub fn normalized(self) -> Result<Self, Error> {
        let flags = Self::normalize_flags(&self.flags)?;
        Ok(Self { flags, ..self })
    }

    /// The key-value switches to pass to rsync.
    ///
    /// This is `kv` plus `suffix` when [`Options::suffix`] is not the default and `kv` does not
    /// already set it.
    #[must_use]
    pub fn key_values(&self) -> BTreeMap<String, String> {
        let mut kv = self.kv.clone().unwrap_or_default();
        if self.suffix != DEFAULT_SUFFIX {
            kv.entry(SUFFIX_KEY.to_owned())
                .or_insert_with(|| self.suffix.clone());
        }
        kv
    }

    /// Returns these options with the given flags.
    #[must_use]
    pub fn with_flags<I, S>(self, flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            flags: flags.into_iter().map(Into::into).collect(),
            ..self
        }
    }

    /// Returns these options with the given include patterns.
    #[must_use]
    pub fn with_includes<I, S>(self, includes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            includes: includes.into_iter().map(Into::into).collect(),
            ..self
        }
    }

    /// Returns these options with the given exclude patterns.
    #[must_use]
    pub fn with_excludes<I, S>(self, excludes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            excludes: excludes.into_iter().map(Into::into).collect(),
            ..self
        }
    }

    /// Returns these options with the given `--info` topics.
    #[must_use]
    pub fn with_info(self, info: InfoOptions) -> Self {
        Self {
            info: Some(info),
            ..self
        }
    }

    /// Returns these options with the given key-value options.
    #[must_use]
    pub fn with_kv(self, kv: BTreeMap<String, String>) -> Self {
        Self { kv: Some(kv), ..self }
    }

    /// Returns these options with the given backup suffix.
    #[must_use]
    pub fn with_suffix(self, suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
            ..self
        }
    }
}
