//! Protocol types and parsing for the Music Player Daemon.
//!
//! The server answers every command with a run of `key: value` lines,
//! terminated by `OK` on success or by an `ACK` line on failure. This module
//! turns such replies into typed records:
//!
//! # Submodules
//!
//! * [`outcome`] - Framing of raw replies into a [`CommandOutcome`]
//! * [`ack`] - Failure acknowledgements and their error codes
//! * [`response`] - Lazy, bidirectional record views over reply lines
//! * [`item`] - Record types and the [`FilesystemEntry`] capability
//!
//! # Data Flow
//!
//! ```text
//! executor -> CommandOutcome -> Response<T> -> Cursor<T> -> T
//! ```
//!
//! Sending commands is left to the caller; everything here works on
//! replies that were already read.

pub mod ack;
pub mod item;
pub mod outcome;
pub mod response;

pub use ack::{Ack, AckCode};
pub use item::{Directory, Entry, FilesystemEntry, Music, PlaylistFile};
pub use outcome::{CommandOutcome, Lines};
pub use response::{
    Cursor, DirectoryResponse, EntryResponse, MusicResponse, PlaylistFileResponse, Record,
    Response,
};

/// Separator between a key and its value.
pub const SEPARATOR: &str = ": ";

/// Splits a `key: value` line at the first separator.
///
/// Returns `None` for lines that are not fields. Values may themselves
/// contain the separator.
///
/// # Examples
///
/// ```rust
/// assert_eq!(split_line("Title: Part 1: Intro"), Some(("Title", "Part 1: Intro")));
/// assert_eq!(split_line("OK"), None);
/// ```
#[must_use]
pub fn split_line(line: &str) -> Option<(&str, &str)> {
    line.split_once(SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_at_first_separator() {
        assert_eq!(split_line("file: a.mp3"), Some(("file", "a.mp3")));
        assert_eq!(
            split_line("Title: Part 1: Intro"),
            Some(("Title", "Part 1: Intro"))
        );
        assert_eq!(split_line("Comment: "), Some(("Comment", "")));
    }

    #[test]
    fn non_fields_do_not_split() {
        assert_eq!(split_line("OK"), None);
        assert_eq!(split_line("file:a.mp3"), None);
        assert_eq!(split_line(""), None);
    }
}
