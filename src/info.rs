//! The topics passed to rsync's `--info` option.

use serde::{Deserialize, Serialize};

use crate::catalog;
use crate::options::Error;

/// An ordered, non-empty list of `--info` topics.
///
/// Order is kept as given because it decides the rendered argument order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct InfoOptions {
    flags: Vec<String>,
}

impl InfoOptions {
    /// Creates a new `InfoOptions` without validating it.
    pub fn new<I, S>(flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            flags: flags.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns whether there is at least one topic and every topic is known to rsync.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Like [`InfoOptions::is_valid`], but reports why the topics are invalid.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyInfo`] if there are no topics.
    /// - [`Error::UnrecognizedInfoTopic`] for the first topic not in
    ///   [`RSYNC_INFO_TOPICS`](catalog::RSYNC_INFO_TOPICS).
    pub fn validate(&self) -> Result<(), Error> {
        if self.flags.is_empty() {
            return Err(Error::EmptyInfo);
        }

        match self.iter().find(|topic| !catalog::is_info_topic(topic)) {
            Some(topic) => Err(Error::UnrecognizedInfoTopic(topic.to_owned())),
            None => Ok(()),
        }
    }

    /// Iterates over the topics in their original order.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.flags.iter().map(String::as_str)
    }

    /// The number of topics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// Whether there are no topics. An empty `InfoOptions` is never valid.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

impl<'a> IntoIterator for &'a InfoOptions {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.flags.iter()
    }
}

impl<S: Into<String>> FromIterator<S> for InfoOptions {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self::new(iter)
    }
}
