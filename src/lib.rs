//! Build validated [rsync](https://rsync.samba.org/) command invocations.
//!
//! Describe the two [`Endpoint`]s of a transfer and its [`Options`], combine them into a
//! [`Command`], and render the command into the argument text for `rsync`. This crate never
//! runs `rsync` itself.
//!
//! ```
//! use rsync_command::{Command, Endpoint, InfoOptions, Options};
//!
//! let src = Endpoint::remote("/home/salotz", "superior").with_user("salotz");
//! let dest = Endpoint::remote("/home/salotz/scratch", "superior").with_user("salotz");
//!
//! let options = Options::default()
//!     .with_flags(["dry-run", "z", "archive", "verbose"])
//!     .with_info(InfoOptions::new(["all", "symsafe"]))
//!     .with_includes(["help"])
//!     .with_excludes(["your/path/to/excellence"]);
//!
//! let command = Command::new(src, dest, Some(options)).expect("command should be valid");
//! let rendered = command.render().expect("command should render");
//! assert!(rendered.contains("--compress"));
//! assert!(rendered.contains("--info=all,symsafe"));
//! assert!(rendered.ends_with("salotz@superior:/home/salotz/scratch"));
//! ```

pub mod catalog;
pub mod command;
pub mod config;
pub mod endpoint;
pub mod info;
pub mod logging;
pub mod options;
pub mod render;

pub use catalog::{FlagSpec, RSYNC_FLAGS, RSYNC_INFO_TOPICS, RSYNC_KV_OPTIONS};
pub use command::{Command, Side};
pub use config::CommandConfig;
pub use endpoint::Endpoint;
pub use info::InfoOptions;
pub use options::Options;
pub use render::{JinjaRenderer, RenderContext, Renderer, Template};
