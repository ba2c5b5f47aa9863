//! Records materialized from server replies.
//!
//! Filesystem-derived records share the [`FilesystemEntry`] capability, so
//! consumers that only care about paths and timestamps do not need to know
//! which concrete record they hold:
//! * [`Directory`] - A database directory (`directory` key)
//! * [`Music`] - A playable song (`file` key)
//! * [`PlaylistFile`] - A stored playlist (`playlist` key)
//! * [`Entry`] - Any of the above, chosen by leading key
//!
//! # Malformed Data
//!
//! Records never fail to build. Fields that are absent or do not parse fall
//! back to a documented default so that one bad record does not stop the
//! rest of a reply from being read:
//! * [`LAST_MODIFIED_UNKNOWN`] for a missing or unparsable `Last-Modified`
//! * [`SIZE_UNKNOWN`] when the reply carries no `size`
//! * `None` for optional tags and numbers

pub mod directory;
pub mod entry;
pub mod music;
pub mod playlist_file;

pub use directory::Directory;
pub use entry::Entry;
pub use music::Music;
pub use playlist_file::PlaylistFile;

use std::str::FromStr;

use crate::{protocol::split_line, util::parse_unix_time};

/// Returned by [`FilesystemEntry::last_modified`] when the reply has no
/// parsable `Last-Modified` field.
pub const LAST_MODIFIED_UNKNOWN: i64 = i64::MIN;

/// Returned by [`FilesystemEntry::size`] when the reply has no `size` field.
///
/// Only some commands (such as `listfiles`) report sizes. The value is the
/// smallest 32-bit integer, widened.
pub const SIZE_UNKNOWN: i64 = i32::MIN as i64;

/// Key of the modification time field.
pub const LAST_MODIFIED: &str = "Last-Modified";

/// Key of the file size field.
pub const SIZE: &str = "size";

/// Capability shared by every record that names a filesystem entry.
pub trait FilesystemEntry {
    /// The full path as given by the server.
    fn full_path(&self) -> &str;

    /// Last modification time in seconds since the Unix epoch.
    ///
    /// Parsed from the ISO 8601 `Last-Modified` field, or
    /// [`LAST_MODIFIED_UNKNOWN`].
    fn last_modified(&self) -> i64;

    /// Size of the entry in bytes, or [`SIZE_UNKNOWN`].
    fn size(&self) -> i64;

    /// The last path segment.
    fn name(&self) -> &str {
        let path = self.full_path();
        path.rsplit_once('/').map_or(path, |(_, name)| name)
    }

    /// Everything before the last `/`, empty for top-level entries.
    fn parent_directory(&self) -> &str {
        self.full_path()
            .rsplit_once('/')
            .map_or("", |(parent, _)| parent)
    }
}

/// Read-only view over the lines of one record.
///
/// The first line carries the leading key and, for filesystem records, the
/// path. Lines that are not `key: value` pairs are skipped.
#[derive(Clone, Copy, Debug)]
pub struct Fields<'a> {
    lines: &'a [String],
}

impl<'a> Fields<'a> {
    #[must_use]
    pub fn new(lines: &'a [String]) -> Self {
        Self { lines }
    }

    /// The leading key and its value.
    #[must_use]
    pub fn leading(&self) -> Option<(&'a str, &'a str)> {
        self.lines.first().and_then(|line| split_line(line))
    }

    /// The value of the leading key, empty if there is none.
    #[must_use]
    pub fn path(&self) -> &'a str {
        self.leading().map_or("", |(_, value)| value)
    }

    /// All `key: value` pairs in order, leading pair included.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        let lines = self.lines;
        lines.iter().filter_map(|line| split_line(line))
    }

    /// The first value of `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&'a str> {
        self.iter().find(|(k, _)| *k == key).map(|(_, value)| value)
    }

    /// Every value of `key`, for tags the server may repeat.
    pub fn get_all<'k>(&self, key: &'k str) -> impl Iterator<Item = &'a str> + 'k
    where
        'a: 'k,
    {
        self.iter()
            .filter(move |(k, _)| *k == key)
            .map(|(_, value)| value)
    }

    /// Owned copy of the first value of `key`.
    #[must_use]
    pub fn string(&self, key: &str) -> Option<String> {
        self.get(key).map(str::to_owned)
    }

    /// Parses the first value of `key`, absorbing parse failures.
    #[must_use]
    pub fn parse<T>(&self, key: &str) -> Option<T>
    where
        T: FromStr,
    {
        let value = self.get(key)?;
        let parsed = value.trim().parse().ok();
        if parsed.is_none() {
            debug!("{}: ignoring unparsable {key} \"{value}\"", self.path());
        }
        parsed
    }

    /// The `Last-Modified` time, or [`LAST_MODIFIED_UNKNOWN`].
    #[must_use]
    pub fn last_modified(&self) -> i64 {
        let Some(value) = self.get(LAST_MODIFIED) else {
            return LAST_MODIFIED_UNKNOWN;
        };

        parse_unix_time(value).unwrap_or_else(|| {
            debug!(
                "{}: ignoring unparsable {LAST_MODIFIED} \"{value}\"",
                self.path()
            );
            LAST_MODIFIED_UNKNOWN
        })
    }

    /// The `size` field, or [`SIZE_UNKNOWN`].
    #[must_use]
    pub fn size(&self) -> i64 {
        self.parse(SIZE).unwrap_or(SIZE_UNKNOWN)
    }
}
