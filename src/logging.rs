//! Helpers for consumers that want to see this library's [`tracing`] output.
//!
//! Verbosity is read from the `RSYNC_COMMAND_LOG` environment variable using
//! [`EnvFilter`] syntax. Without it, debug builds log at `DEBUG` and release builds at `INFO`.

use std::io;
use std::str::FromStr;

use tracing::{Level, Subscriber};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// The environment variable that controls log verbosity.
pub const LOG_ENV: &str = "RSYNC_COMMAND_LOG";

fn default_level() -> Level {
    if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    }
}

/// The last bare level in the [`LOG_ENV`] directives, or the default level.
fn max_level() -> Level {
    std::env::var(LOG_ENV)
        .ok()
        .and_then(|directives| {
            directives
                .split(',')
                .map(str::trim)
                .rev()
                .find_map(|directive| Level::from_str(directive).ok())
        })
        .unwrap_or_else(default_level)
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::default().add_directive(max_level().into()))
}

/// Returns a subscriber that writes to stderr.
pub fn get_subscriber() -> impl Subscriber + Send + Sync {
    get_subscriber_with_writer(io::stderr)
}

/// Returns a subscriber that writes plain (non-ANSI) text to `writer`.
pub fn get_subscriber_with_writer<W>(writer: W) -> impl Subscriber + Send + Sync
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let max_level = max_level();
    FmtSubscriber::builder()
        .with_env_filter(env_filter())
        .with_writer(writer)
        .with_ansi(false)
        .with_target(max_level >= Level::DEBUG)
        .without_time()
        .finish()
}
