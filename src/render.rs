//! Turning a validated command into rsync argument text.
//!
//! The text comes from a template (by default the one packaged with this crate, see
//! [`TEMPLATE`]) rendered against a [`RenderContext`]. Any engine can do the rendering by
//! implementing [`Renderer`]; [`JinjaRenderer`] is the one used by
//! [`Command::render`](crate::Command::render).

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::ops::Deref;
use std::{fs, io, path::Path};

use minijinja::Environment;
use once_cell::sync::Lazy;
use serde::Serialize;
use tap::TapFallible;
use thiserror::Error;

use crate::endpoint::Endpoint;

/// The packaged template for an rsync invocation.
pub const TEMPLATE: &str = include_str!("../templates/rsync_command.txt.j2");

static DEFAULT_RENDERER: Lazy<JinjaRenderer> = Lazy::new(JinjaRenderer::new);

/// Errors that may occur while loading or rendering a template.
#[derive(Debug, Error)]
pub enum Error {
    /// The template engine failed.
    #[error("failed to render command template: {0}")]
    Template(#[from] minijinja::Error),
    /// A template file could not be read.
    #[error("failed to read command template: {0}")]
    ReadTemplate(#[from] io::Error),
}

/// Template text for an rsync invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template(Cow<'static, str>);

impl Template {
    /// The template packaged with this crate.
    #[must_use]
    pub fn packaged() -> Self {
        Self(Cow::Borrowed(TEMPLATE))
    }

    /// Reads a custom template from `path`.
    ///
    /// # Errors
    ///
    /// Any I/O error while reading the file.
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        tracing::debug!(path = %path.display(), "reading command template");
        fs::read_to_string(path)
            .map(|text| Self(Cow::Owned(text)))
            .tap_err(|error| {
                tracing::error!(%error, path = %path.display(), "failed to read command template");
            })
            .map_err(Error::from)
    }
}

impl Default for Template {
    fn default() -> Self {
        Self::packaged()
    }
}

impl Deref for Template {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for Template {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Everything a template can refer to.
///
/// Every field is always present. Sections a command does not use are empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderContext {
    /// Where files are copied from.
    pub src: Endpoint,
    /// Where files are copied to.
    pub dest: Endpoint,
    /// Canonical flag names, without duplicates.
    pub flags: Vec<String>,
    /// `--include` patterns.
    pub includes: Vec<String>,
    /// `--exclude` patterns.
    pub excludes: Vec<String>,
    /// `--info` topics.
    pub info: Vec<String>,
    /// Key-value switches.
    pub kv: BTreeMap<String, String>,
}

impl RenderContext {
    /// A context with the two endpoints and every other section empty.
    #[must_use]
    pub fn new(src: Endpoint, dest: Endpoint) -> Self {
        Self {
            src,
            dest,
            flags: Vec::new(),
            includes: Vec::new(),
            excludes: Vec::new(),
            info: Vec::new(),
            kv: BTreeMap::new(),
        }
    }
}

/// A template engine that can render a [`RenderContext`].
pub trait Renderer {
    /// Renders `template` with the values in `context`.
    ///
    /// # Errors
    ///
    /// Any error from the underlying engine.
    fn render(&self, template: &str, context: &RenderContext) -> Result<String, Error>;
}

/// A [`Renderer`] backed by [`minijinja`].
///
/// Block tags drop the newline that follows them and the indentation that precedes them, so
/// the template can be indented for readability while the output stays one argument per line.
/// Templates can use the `shquote` filter to quote a value for a POSIX shell.
#[derive(Debug)]
pub struct JinjaRenderer {
    env: Environment<'static>,
}

impl JinjaRenderer {
    /// Creates a new `JinjaRenderer`.
    #[must_use]
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.add_filter("shquote", shquote);
        Self { env }
    }
}

impl Default for JinjaRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for JinjaRenderer {
    fn render(&self, template: &str, context: &RenderContext) -> Result<String, Error> {
        let _span = tracing::trace_span!("render_template").entered();
        tracing::trace!(?context, "rendering command template");
        self.env.render_str(template, context).map_err(Error::from)
    }
}

/// The process-wide [`JinjaRenderer`], created on first use.
#[must_use]
pub fn default_renderer() -> &'static JinjaRenderer {
    &DEFAULT_RENDERER
}

fn is_shell_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || "@%+=:,./-_".contains(c)
}

/// Quotes `value` for a POSIX shell, leaving it untouched if nothing needs quoting.
fn shquote(value: &str) -> String {
    if !value.is_empty() && value.chars().all(is_shell_safe) {
        return value.to_owned();
    }

    format!("'{}'", value.replace('\'', r"'\''"))
}
