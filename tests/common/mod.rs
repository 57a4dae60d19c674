#![allow(dead_code)]

use rsync_command::{Endpoint, InfoOptions, Options};

pub mod test_subscriber;

/// The source endpoint used throughout the integration tests.
pub fn alice_src() -> Endpoint {
    Endpoint::remote("/home/alice", "h1").with_user("alice")
}

/// The destination endpoint used throughout the integration tests.
pub fn backup_dest() -> Endpoint {
    Endpoint::local("/backup")
}

pub fn backup_options() -> Options {
    Options::default()
        .with_flags(["archive", "verbose"])
        .with_includes(["*.txt"])
        .with_excludes(["tmp/"])
        .with_info(InfoOptions::new(["all", "symsafe"]))
}

pub const BACKUP_COMMAND: &str = "rsync \\
  --archive \\
  --verbose \\
  --include='*.txt' \\
  --exclude=tmp/ \\
  --info=all,symsafe \\
  alice@h1:/home/alice \\
  /backup";

pub const TOML_CONFIG: &str = r#"
src = "alice@h1:/home/alice"
dest = { path = "/backup" }

[options]
flags = ["a", "v"]
includes = ["*.txt"]
excludes = ["tmp/"]
info = ["all", "symsafe"]
"#;

pub const YAML_CONFIG: &str = r#"
src:
  path: /home/alice
  user: alice
  host: h1
dest: /backup
options:
  flags: [archive, verbose]
  includes: ["*.txt"]
  excludes: [tmp/]
  info: [all, symsafe]
"#;
