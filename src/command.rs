//! A complete rsync invocation: source, destination, and options.

use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::endpoint::Endpoint;
use crate::options::{self, Options};
use crate::render::{self, RenderContext, Renderer, Template};

/// Which side of a transfer an [`Endpoint`] is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// The source.
    Src,
    /// The destination.
    Dest,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Src => write!(f, "src"),
            Self::Dest => write!(f, "dest"),
        }
    }
}

/// Errors that may occur while creating or rendering a [`Command`].
#[derive(Debug, Error)]
pub enum Error {
    /// The endpoint on the given side failed [`Endpoint::is_valid`].
    #[error("invalid {0} endpoint")]
    InvalidEndpoint(Side),
    /// The options could not be normalized or validated.
    #[error("invalid options: {0}")]
    InvalidOptions(#[from] options::Error),
    /// The command could not be rendered.
    #[error(transparent)]
    Render(#[from] render::Error),
}

/// Specification of one rsync invocation.
///
/// A `Command` can only be created from valid parts, so every `Command` can be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    src: Endpoint,
    dest: Endpoint,
    options: Option<Options>,
}

impl Command {
    /// Creates a new `Command`.
    ///
    /// Option flags given as short aliases are replaced with their canonical names.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidEndpoint`] if either endpoint is invalid, `src` checked first.
    /// - [`Error::InvalidOptions`] if a flag, `--info` topic, or key-value option is not
    ///   supported.
    pub fn new(src: Endpoint, dest: Endpoint, options: Option<Options>) -> Result<Self, Error> {
        let _span = tracing::debug_span!("new_command", %src, %dest).entered();

        if !src.is_valid() {
            return Err(Error::InvalidEndpoint(Side::Src));
        }

        if !dest.is_valid() {
            return Err(Error::InvalidEndpoint(Side::Dest));
        }

        let options = options.map(Options::normalized).transpose()?;
        if let Some(options) = &options {
            options.validate()?;
        }

        tracing::debug!("created command");
        Ok(Self { src, dest, options })
    }

    /// Where files are copied from.
    #[must_use]
    pub fn src(&self) -> &Endpoint {
        &self.src
    }

    /// Where files are copied to.
    #[must_use]
    pub fn dest(&self) -> &Endpoint {
        &self.dest
    }

    /// The transfer options, if any.
    #[must_use]
    pub fn options(&self) -> Option<&Options> {
        self.options.as_ref()
    }

    /// The values a template sees when rendering this command.
    #[must_use]
    pub fn context(&self) -> RenderContext {
        let mut context = RenderContext::new(self.src.clone(), self.dest.clone());

        if let Some(options) = &self.options {
            context.flags = options.flags.iter().unique().cloned().collect();
            context.includes = options.includes.clone();
            context.excludes = options.excludes.clone();
            context.info = options
                .info
                .iter()
                .flat_map(|info| info.iter().map(str::to_owned))
                .collect();
            context.kv = options.key_values();
        }

        context
    }

    /// Renders this command with the packaged template.
    ///
    /// The output is the same every time for the same command.
    ///
    /// # Errors
    ///
    /// [`Error::Render`] if the template engine fails.
    pub fn render(&self) -> Result<String, Error> {
        self.render_with(render::default_renderer(), &Template::packaged())
    }

    /// Renders this command with a custom renderer and template.
    ///
    /// # Errors
    ///
    /// [`Error::Render`] with any error returned by `renderer`.
    pub fn render_with<R>(&self, renderer: &R, template: &str) -> Result<String, Error>
    where
        R: Renderer + ?Sized,
    {
        let output = renderer.render(template, &self.context())?;
        tracing::debug!(%output, "rendered command");
        Ok(output)
    }
}
