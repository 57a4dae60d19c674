//! One side (source or destination) of a transfer.
//!
//! An [`Endpoint`] is a path with an optional remote host and user. Validity is checked on
//! demand with [`Endpoint::is_valid`]; [`Command::new`](crate::Command::new) does so for both
//! sides before a command can be rendered.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// The scheme used for the URL-shaped identifier of an endpoint.
pub const SCHEME: &str = "rsync";

/// Errors that may occur while constructing an [`Endpoint`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// A remote host was given with a relative path.
    #[error("path \"{path}\" on host \"{host}\" must be absolute")]
    NotRooted {
        /// The remote host.
        host: String,
        /// The offending path.
        path: String,
    },
    /// The URL library rejected the endpoint's parts.
    #[error("failed to build endpoint identifier: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The endpoint identifier cannot hold the given part.
    #[error("endpoint identifier cannot hold {0}")]
    Unsupported(&'static str),
    /// The string is not of the form `[user@]host:path` or `path`.
    #[error("invalid endpoint \"{0}\": expected [user@]host:path or a local path")]
    Parse(String),
}

/// A path plus an optional remote user and host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Endpoint {
    path: Option<String>,
    #[serde(default)]
    user: Option<String>,
    #[serde(default)]
    host: Option<String>,
    #[serde(skip)]
    url: Option<Url>,
}

impl Endpoint {
    /// Creates a new `Endpoint` without validating it.
    #[must_use]
    pub fn new(path: Option<String>, user: Option<String>, host: Option<String>) -> Self {
        Self {
            path,
            user,
            host,
            url: None,
        }
    }

    /// An endpoint on the local filesystem.
    #[must_use]
    pub fn local(path: impl Into<String>) -> Self {
        Self::new(Some(path.into()), None, None)
    }

    /// An endpoint on `host`, accessed as the default remote user.
    #[must_use]
    pub fn remote(path: impl Into<String>, host: impl Into<String>) -> Self {
        Self::new(Some(path.into()), None, Some(host.into()))
    }

    /// Returns this endpoint accessed as `user`.
    #[must_use]
    pub fn with_user(self, user: impl Into<String>) -> Self {
        Self {
            user: Some(user.into()),
            ..self
        }
    }

    /// Creates an `Endpoint` backed by a URL-shaped identifier.
    ///
    /// The identifier uses the [`SCHEME`] scheme, the given host and user, and the path split
    /// into segments. An omitted user becomes empty userinfo on the identifier but stays
    /// unset on the endpoint.
    ///
    /// # Errors
    ///
    /// - [`Error::NotRooted`] if `host` is set but `path` does not start with `/`.
    /// - [`Error::InvalidUrl`] if the URL library rejects the host.
    #[tracing::instrument(level = "trace", name = "endpoint_from_parts")]
    pub fn from_parts(host: Option<&str>, user: Option<&str>, path: &str) -> Result<Self, Error> {
        let is_rooted = path.starts_with('/');
        if let Some(host) = host {
            if !is_rooted {
                return Err(Error::NotRooted {
                    host: host.to_owned(),
                    path: path.to_owned(),
                });
            }
        }

        let url = build_url(host, user.unwrap_or_default(), is_rooted, path)?;
        tracing::trace!(%url, "built endpoint identifier");

        Ok(Self {
            path: Some(path.to_owned()),
            user: user.map(str::to_owned),
            host: host.map(str::to_owned),
            url: Some(url),
        })
    }

    /// Returns whether this endpoint can be used in a command.
    ///
    /// - The path must be set.
    /// - A user requires a host.
    /// - A URL-shaped identifier, if any, must use the [`SCHEME`] scheme.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        if self.path.is_none() {
            tracing::debug!("endpoint has no path");
            return false;
        }

        if self.user.is_some() && self.host.is_none() {
            tracing::debug!(user = ?self.user, "endpoint has a user but no host");
            return false;
        }

        match &self.url {
            Some(url) if url.scheme() != SCHEME => {
                tracing::debug!(scheme = url.scheme(), "endpoint identifier has wrong scheme");
                false
            }
            _ => true,
        }
    }

    /// The path on the (local or remote) filesystem.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// The remote user, if any.
    #[must_use]
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// The remote host, if any.
    #[must_use]
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// The URL-shaped identifier, if this endpoint was created with [`Endpoint::from_parts`].
    #[must_use]
    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    /// Whether this endpoint lives on another host.
    #[must_use]
    pub fn is_remote(&self) -> bool {
        self.host.is_some()
    }
}

fn build_url(host: Option<&str>, user: &str, is_rooted: bool, path: &str) -> Result<Url, Error> {
    let trimmed = path.trim_matches('/');
    let segments = trimmed.split('/').filter(|_| !trimmed.is_empty());

    match host {
        Some(host) => {
            let mut url = if host.contains(':') {
                Url::parse(&format!("{SCHEME}://[{host}]/"))?
            } else {
                Url::parse(&format!("{SCHEME}://{host}/"))?
            };
            url.set_username(user)
                .map_err(|()| Error::Unsupported("a user"))?;
            url.path_segments_mut()
                .map_err(|()| Error::Unsupported("path segments"))?
                .clear()
                .extend(segments);
            Ok(url)
        }
        None if is_rooted => {
            let mut url = Url::parse(&format!("{SCHEME}:/"))?;
            url.path_segments_mut()
                .map_err(|()| Error::Unsupported("path segments"))?
                .clear()
                .extend(segments);
            Ok(url)
        }
        None => {
            let mut url = Url::parse(&format!("{SCHEME}:"))?;
            url.set_path(trimmed);
            Ok(url)
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = self.path().unwrap_or_default();
        match self.host() {
            None => write!(f, "{path}"),
            Some(host) => {
                if let Some(user) = self.user().filter(|user| !user.is_empty()) {
                    write!(f, "{user}@")?;
                }
                if host.contains(':') {
                    write!(f, "[{host}]:{path}")
                } else {
                    write!(f, "{host}:{path}")
                }
            }
        }
    }
}

impl FromStr for Endpoint {
    type Err = Error;

    /// Parses `[user@]host:path`, `[user@][ipv6]:path`, or a local path.
    #[tracing::instrument(level = "trace", name = "parse_endpoint")]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(Error::Parse(String::new()));
        }

        let Some((user, host, path)) = split_remote(s)? else {
            return Self::from_parts(None, None, s);
        };

        if host.is_empty() || user.is_some_and(str::is_empty) {
            return Err(Error::Parse(s.to_owned()));
        }

        Self::from_parts(Some(host), user, path)
    }
}

/// Splits `[user@]host:path` into user, host, and path, or returns `None` for a local path.
///
/// A `:` before the first `/` marks a remote endpoint, as rsync itself decides. Only the text
/// before that `:` can hold the user and a bracketed IPv6 host; the path is taken verbatim.
fn split_remote(text: &str) -> Result<Option<(Option<&str>, &str, &str)>, Error> {
    let Some(colon) = text.find(':') else {
        return Ok(None);
    };
    let head = &text[..colon];

    let open = if text.starts_with('[') {
        Some(0)
    } else {
        head.find("@[").map(|at| at + 1)
    };

    if let Some(open) = open {
        if text[..open].contains('/') {
            return Ok(None);
        }
        let malformed = || Error::Parse(text.to_owned());
        let close = text[open..].find(']').map(|close| open + close).ok_or_else(malformed)?;
        let path = text[close + 1..].strip_prefix(':').ok_or_else(malformed)?;
        return Ok(Some((text[..open].strip_suffix('@'), &text[open + 1..close], path)));
    }

    if head.contains('/') {
        return Ok(None);
    }

    let path = &text[colon + 1..];
    Ok(Some(match head.rfind('@') {
        Some(at) => (Some(&head[..at]), &head[at + 1..], path),
        None => (None, head, path),
    }))
}

#[cfg(test)]
mod tests {
    use serde_test::{assert_tokens, Token};

    use super::*;

    #[test]
    fn test_missing_path_is_invalid() {
        let endpoint = Endpoint::new(None, None, None);
        assert!(!endpoint.is_valid());
        let endpoint = Endpoint::new(None, Some("alice".into()), Some("h1".into()));
        assert!(!endpoint.is_valid());
    }

    #[test]
    fn test_user_requires_host() {
        let endpoint = Endpoint::local("/home/alice").with_user("alice");
        assert!(!endpoint.is_valid());
        let endpoint = Endpoint::remote("/home/alice", "h1").with_user("alice");
        assert!(endpoint.is_valid());
        assert!(Endpoint::remote("/srv", "h1").is_valid());
        assert!(Endpoint::local("relative/dir").is_valid());
    }

    #[test]
    fn test_from_parts_requires_rooted_path_with_host() {
        let err = Endpoint::from_parts(Some("h1"), None, "relative/dir")
            .expect_err("relative path on a host should fail");
        assert_eq!(
            err,
            Error::NotRooted {
                host: String::from("h1"),
                path: String::from("relative/dir"),
            }
        );
    }

    #[test]
    fn test_from_parts_builds_identifier() {
        let endpoint = Endpoint::from_parts(Some("h1"), Some("alice"), "/home/alice/")
            .expect("rooted remote endpoint should build");
        let url = endpoint.url().expect("identifier should be set");
        assert_eq!(url.scheme(), SCHEME);
        assert_eq!(url.host_str(), Some("h1"));
        assert_eq!(url.username(), "alice");
        assert_eq!(url.path(), "/home/alice");
        assert_eq!(endpoint.path(), Some("/home/alice/"));
        assert_eq!(endpoint.user(), Some("alice"));
        assert!(endpoint.is_valid());
    }

    #[test]
    fn test_from_parts_without_user_or_host() {
        let endpoint = Endpoint::from_parts(Some("h1"), None, "/").expect("root should build");
        assert_eq!(endpoint.user(), None);
        assert_eq!(endpoint.url().map(Url::username), Some(""));
        assert!(endpoint.is_valid());

        let endpoint = Endpoint::from_parts(None, None, "/var/backups").expect("local should build");
        assert_eq!(endpoint.url().map(Url::path), Some("/var/backups"));
        assert!(!endpoint.is_remote());
        assert!(endpoint.is_valid());

        let endpoint = Endpoint::from_parts(None, None, "scratch").expect("relative should build");
        assert_eq!(endpoint.path(), Some("scratch"));
        assert!(endpoint.is_valid());
    }

    #[test]
    fn test_from_parts_user_without_host_is_invalid() {
        let endpoint = Endpoint::from_parts(None, Some("alice"), "/home/alice")
            .expect("construction does not check the user");
        assert!(!endpoint.is_valid());
    }

    #[test]
    fn test_from_parts_rejects_bad_host() {
        let err = Endpoint::from_parts(Some("bad host"), None, "/srv")
            .expect_err("host with a space should be rejected");
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    #[test]
    fn test_parse() {
        let inputs = [
            ("alice@h1:/home/alice", Some("alice"), Some("h1"), "/home/alice"),
            ("h1:/srv/data", None, Some("h1"), "/srv/data"),
            ("[::1]:/srv", None, Some("::1"), "/srv"),
            ("bob@[2001:db8::1]:/srv", Some("bob"), Some("2001:db8::1"), "/srv"),
            ("/backup", None, None, "/backup"),
            ("relative/dir:with-colon", None, None, "relative/dir:with-colon"),
            ("alice@h1:/p@[x]", Some("alice"), Some("h1"), "/p@[x]"),
            ("h1:/a@b[1]", None, Some("h1"), "/a@b[1]"),
            ("h1:/srv/a@b", None, Some("h1"), "/srv/a@b"),
            ("[::1]:/a@[b]", None, Some("::1"), "/a@[b]"),
        ];

        for (s, user, host, path) in inputs {
            let endpoint: Endpoint = s.parse().unwrap_or_else(|err| panic!("{s}: {err}"));
            assert_eq!(endpoint.user(), user, "user of {s}");
            assert_eq!(endpoint.host(), host, "host of {s}");
            assert_eq!(endpoint.path(), Some(path), "path of {s}");
            assert!(endpoint.is_valid(), "{s} should be valid");
        }
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Endpoint>(), Err(Error::Parse(String::new())));
        assert_eq!(
            ":/srv".parse::<Endpoint>(),
            Err(Error::Parse(String::from(":/srv")))
        );
        assert_eq!(
            "@h1:/srv".parse::<Endpoint>(),
            Err(Error::Parse(String::from("@h1:/srv")))
        );
        assert_eq!(
            "[::1/srv".parse::<Endpoint>(),
            Err(Error::Parse(String::from("[::1/srv")))
        );
        assert_eq!(
            "[::1]/srv".parse::<Endpoint>(),
            Err(Error::Parse(String::from("[::1]/srv")))
        );
        assert!(matches!(
            "h1:docs".parse::<Endpoint>(),
            Err(Error::NotRooted { .. })
        ));
    }

    #[test]
    fn test_display() {
        let endpoint = Endpoint::remote("/home/alice", "h1").with_user("alice");
        assert_eq!(endpoint.to_string(), "alice@h1:/home/alice");
        assert_eq!(Endpoint::remote("/srv", "h1").to_string(), "h1:/srv");
        assert_eq!(Endpoint::remote("/srv", "::1").to_string(), "[::1]:/srv");
        assert_eq!(Endpoint::local("/backup").to_string(), "/backup");
    }

    #[test]
    fn test_serde() {
        let endpoint = Endpoint::remote("/srv", "h1");
        assert_tokens(
            &endpoint,
            &[
                Token::Struct {
                    name: "Endpoint",
                    len: 3,
                },
                Token::Str("path"),
                Token::Some,
                Token::Str("/srv"),
                Token::Str("user"),
                Token::None,
                Token::Str("host"),
                Token::Some,
                Token::Str("h1"),
                Token::StructEnd,
            ],
        );
    }
}
