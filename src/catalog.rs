//! The fixed registry of rsync options this library knows how to emit.
//!
//! - [`RSYNC_FLAGS`]: boolean switches, identified by their long name.
//! - [`RSYNC_INFO_TOPICS`]: the values accepted by `--info`.
//! - [`RSYNC_KV_OPTIONS`]: switches that take an explicit value.

/// Description of a single boolean rsync flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlagSpec {
    /// The canonical long name, without leading dashes.
    pub long: &'static str,
    /// The single-character alias, if rsync has one.
    pub short: Option<char>,
    /// Human-readable description, as shown by `rsync --help`.
    pub description: &'static str,
}

impl FlagSpec {
    const fn new(long: &'static str, short: Option<char>, description: &'static str) -> Self {
        Self {
            long,
            short,
            description,
        }
    }

    /// Returns whether `name` is this flag's long name or short alias.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        if self.long == name {
            return true;
        }

        let mut chars = name.chars();
        match (self.short, chars.next(), chars.next()) {
            (Some(short), Some(c), None) => short == c,
            _ => false,
        }
    }
}

/// The supported boolean flags.
///
/// The long name is canonical and is what gets rendered. Order only documents grouping.
pub const RSYNC_FLAGS: &[FlagSpec] = &[
    // archival and reporting
    FlagSpec::new("archive", Some('a'), "archive mode; equals -rlptgoD (no -H,-A,-X)"),
    FlagSpec::new("verbose", Some('v'), "increase verbosity"),
    FlagSpec::new("quiet", Some('q'), "suppress non-error messages"),
    FlagSpec::new("human-readable", Some('h'), "output numbers in a human-readable format"),
    FlagSpec::new("itemize-changes", Some('i'), "output a change-summary for all updates"),
    FlagSpec::new("stats", None, "give some file-transfer stats"),
    FlagSpec::new("progress", None, "show progress during transfer"),
    // transport
    FlagSpec::new("compress", Some('z'), "compress file data during the transfer"),
    FlagSpec::new("partial", None, "keep partially transferred files"),
    FlagSpec::new("dry-run", Some('n'), "perform a trial run with no changes made"),
    // sync behavior
    FlagSpec::new("recursive", Some('r'), "recurse into directories"),
    FlagSpec::new("checksum", Some('c'), "skip based on checksum, not mod-time & size"),
    FlagSpec::new("update", Some('u'), "skip files that are newer on the receiver"),
    FlagSpec::new("delete", None, "delete extraneous files from dest dirs"),
    FlagSpec::new("delete-excluded", None, "also delete excluded files from dest dirs"),
    // misc
    FlagSpec::new("backup", Some('b'), "make backups (see --suffix & --backup-dir)"),
];

/// The topics accepted by `--info`.
///
/// The last four are verbosity aggregates that rsync expands itself.
pub const RSYNC_INFO_TOPICS: &[&str] = &[
    "backup",         // files backed up
    "copy",           // files copied locally on the receiving side
    "del",            // deletions on the receiving side
    "flist1",         // file-list receiving/sending
    "flist2",         // file-list debugging detail
    "misc1",          // miscellaneous information
    "misc2",          // more miscellaneous information
    "mount",          // mounts that were found or skipped
    "updates",        // updated file/dir names
    "unchanged",      // unchanged names
    "progress-file",  // per-file progress
    "progress-total", // total transfer progress
    "removed",        // files removed on the sending side
    "skipped",        // files skipped due to options used
    "stats1",         // total data sent and speeds
    "stats2",         // files created, deleted, size, and number sent
    "stats3",         // heap statistics on hosts
    "symsafe",        // symlinks that are unsafe
    // verbosity aggregates
    "all",
    "vv",
    "v",
    "none",
];

/// The supported options that take an explicit value.
pub const RSYNC_KV_OPTIONS: &[&str] = &["suffix"];

/// Finds the flag whose long name or short alias is `name`.
///
/// The first match in [`RSYNC_FLAGS`] wins.
#[must_use]
pub fn find_flag(name: &str) -> Option<&'static FlagSpec> {
    RSYNC_FLAGS.iter().find(|spec| spec.matches(name))
}

/// Returns whether `name` is the canonical (long) name of a supported flag.
#[must_use]
pub fn is_flag(name: &str) -> bool {
    RSYNC_FLAGS.iter().any(|spec| spec.long == name)
}

/// Returns whether `name` is a supported `--info` topic.
#[must_use]
pub fn is_info_topic(name: &str) -> bool {
    RSYNC_INFO_TOPICS.contains(&name)
}

/// Returns whether `name` is a supported key-value option.
#[must_use]
pub fn is_kv_option(name: &str) -> bool {
    RSYNC_KV_OPTIONS.contains(&name)
}
