//! Lazy record views over command replies.
//!
//! Replies carry repeated records as a flat run of `key: value` lines with
//! neither delimiters nor a record count. A record starts at every line
//! whose key is one of the record type's *leading keys* and extends up to
//! the next such line:
//!
//! ```text
//! directory: Music              <- record 0 (Directory)
//! Last-Modified: ...
//! file: Music/song.mp3          <- record 1 (Music)
//! Time: 120
//! playlist: mix.m3u             <- record 2 (PlaylistFile)
//! ```
//!
//! A [`Response`] wraps the immutable reply lines and hands out
//! [`Cursor`]s that parse one record per step, forwards or backwards.
//! Nothing is parsed up front and nothing is cached but the record count,
//! so the same response can be traversed repeatedly and from several
//! threads at once.
//!
//! # Typed Responses
//!
//! The record type decides which keys start a record and what is built
//! from them, through [`Record::PARSERS`]:
//! * [`EntryResponse`] - `directory`, `file` and `playlist`
//! * [`MusicResponse`] - `file`
//! * [`DirectoryResponse`] - `directory`
//! * [`PlaylistFileResponse`] - `playlist`
//!
//! Lines before the first leading key belong to no record and are skipped.
//!
//! # Example
//!
//! ```rust
//! use tonearm::protocol::{CommandOutcome, EntryResponse, FilesystemEntry};
//!
//! let outcome = CommandOutcome::from_reply("directory: Music\nfile: Music/a.mp3\nOK\n");
//! let response = EntryResponse::new(&outcome)?;
//!
//! assert_eq!(response.size(), 2);
//! for entry in &response {
//!     println!("{} {}", entry.typ(), entry.full_path());
//! }
//! ```

pub mod cursor;

pub use cursor::{Backward, Cursor};

use std::{fmt, marker::PhantomData, sync::OnceLock};

use crate::{
    error::{Error, Result},
    protocol::{
        item::{Directory, Entry, Fields, Music, PlaylistFile},
        outcome::{CommandOutcome, Lines},
        split_line,
    },
};

/// Builds a record from the lines of one record.
pub type Parser<T> = fn(Fields<'_>) -> T;

/// A record type that can be read from reply lines.
///
/// # Examples
///
/// ```rust
/// use tonearm::protocol::{item::Fields, response::{Parser, Record}};
///
/// struct Output(String);
///
/// impl Output {
///     fn from_fields(fields: Fields<'_>) -> Self {
///         Output(fields.path().to_owned())
///     }
/// }
///
/// impl Record for Output {
///     const PARSERS: &'static [(&'static str, Parser<Self>)] = &[("outputid", Self::from_fields)];
/// }
/// ```
pub trait Record: Sized + 'static {
    /// Leading keys, each paired with the parser of the variant it starts.
    const PARSERS: &'static [(&'static str, Parser<Self>)];

    /// The parser for records starting with `key`, if it is a leading key.
    #[must_use]
    fn parser(key: &str) -> Option<Parser<Self>> {
        Self::PARSERS
            .iter()
            .find(|(leading, _)| *leading == key)
            .map(|(_, parser)| *parser)
    }

    #[must_use]
    fn is_leading_key(key: &str) -> bool {
        Self::parser(key).is_some()
    }
}

/// Returns the parser for the record starting at `line`, if it starts one.
pub(crate) fn boundary<T: Record>(line: &str) -> Option<Parser<T>> {
    split_line(line).and_then(|(key, _)| T::parser(key))
}

/// Whether `line` starts a record of type `T`.
#[must_use]
pub fn is_boundary<T: Record>(line: &str) -> bool {
    boundary::<T>(line).is_some()
}

/// Counts the records of type `T` in `lines`.
///
/// Single pass over the lines without building any record.
#[must_use]
pub fn count_records<T: Record>(lines: &[String]) -> usize {
    lines.iter().filter(|line| is_boundary::<T>(line)).count()
}

/// An ordered, immutable collection of `T` records over reply lines.
///
/// Records are parsed on demand by [`Cursor`]s; only the record count is
/// memoized once known.
pub struct Response<T> {
    lines: Lines,
    size: OnceLock<usize>,
    marker: PhantomData<fn() -> T>,
}

/// Mixed filesystem listing, as returned by `lsinfo` or `listfiles`.
pub type EntryResponse = Response<Entry>;

/// Songs, as returned by `find`, `search`, `playlistinfo` and friends.
pub type MusicResponse = Response<Music>;

/// Directories only.
pub type DirectoryResponse = Response<Directory>;

/// Stored playlists, as returned by `listplaylists`.
pub type PlaylistFileResponse = Response<PlaylistFile>;

impl<T: Record> Response<T> {
    /// Creates a response over the lines of a successful command.
    ///
    /// # Errors
    ///
    /// Returns `FailedPrecondition` if the command failed. Check the
    /// outcome before reading records from it; a failed command is not an
    /// empty response.
    pub fn new(outcome: &CommandOutcome) -> Result<Self> {
        match outcome {
            CommandOutcome::Success(lines) => Ok(Self::from_lines(lines.clone())),
            CommandOutcome::Failure(e) => Err(Error::failed_precondition(format!(
                "cannot read records from a failed command ({e})"
            ))),
        }
    }

    #[must_use]
    pub fn from_lines(lines: Lines) -> Self {
        Self {
            lines,
            size: OnceLock::new(),
            marker: PhantomData,
        }
    }

    /// Reads the lines of another response as records of type `T`.
    ///
    /// The lines are shared, not copied; only the leading keys change.
    #[must_use]
    pub fn from_response<U>(response: &Response<U>) -> Self {
        Self::from_lines(response.lines.clone())
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::from_lines(Lines::from(Vec::new()))
    }

    /// The underlying reply lines.
    #[must_use]
    pub fn lines(&self) -> &Lines {
        &self.lines
    }

    /// The number of records.
    ///
    /// Counted on first use with a single scan of the lines and remembered.
    #[must_use]
    pub fn size(&self) -> usize {
        *self.size.get_or_init(|| {
            let size = count_records::<T>(&self.lines);
            trace!("{size} records in {} lines", self.lines.len());
            size
        })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// A cursor before the first record.
    #[must_use]
    pub fn cursor(&self) -> Cursor<T> {
        Cursor::new(self.lines.clone(), self.size(), 0)
    }

    /// A cursor after the last record, for backward traversal.
    #[must_use]
    pub fn cursor_at_end(&self) -> Cursor<T> {
        let size = self.size();
        Cursor::new(self.lines.clone(), size, size)
    }

    /// A cursor whose [`next`](Iterator::next) returns record `position`
    /// and whose [`previous`](Cursor::previous) returns record
    /// `position - 1`.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` if `position` is greater than [`size`](Self::size).
    pub fn cursor_at(&self, position: usize) -> Result<Cursor<T>> {
        let size = self.size();
        if position > size {
            return Err(Error::out_of_range(format!(
                "cursor position {position} out of range for {size} records"
            )));
        }

        Ok(Cursor::new(self.lines.clone(), size, position))
    }

    /// The record at `index`.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` if `index` is not less than [`size`](Self::size).
    pub fn get(&self, index: usize) -> Result<T> {
        let size = self.size();
        if index >= size {
            return Err(Error::out_of_range(format!(
                "record index {index} out of range for {size} records"
            )));
        }

        self.cursor_at(index)?
            .next()
            .ok_or_else(|| Error::internal(format!("record {index} vanished while reading")))
    }

    #[must_use]
    pub fn first(&self) -> Option<T> {
        self.cursor().next()
    }

    #[must_use]
    pub fn last(&self) -> Option<T> {
        self.cursor_at_end().previous()
    }

    /// Iterates from the first record to the last.
    #[must_use]
    pub fn iter(&self) -> Cursor<T> {
        self.cursor()
    }

    /// Iterates from the last record to the first.
    #[must_use]
    pub fn iter_rev(&self) -> Backward<T> {
        self.cursor_at_end().backward()
    }

    /// Parses every record.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }
}

impl<T> Clone for Response<T> {
    fn clone(&self) -> Self {
        Self {
            lines: self.lines.clone(),
            size: self.size.clone(),
            marker: PhantomData,
        }
    }
}

impl<T: Record> Default for Response<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> fmt::Debug for Response<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Response")
            .field("lines", &self.lines.len())
            .field("size", &self.size.get())
            .finish()
    }
}

impl<T: Record> TryFrom<&CommandOutcome> for Response<T> {
    type Error = Error;

    fn try_from(outcome: &CommandOutcome) -> Result<Self> {
        Self::new(outcome)
    }
}

impl<T: Record> From<Lines> for Response<T> {
    fn from(lines: Lines) -> Self {
        Self::from_lines(lines)
    }
}

impl<T: Record> IntoIterator for &Response<T> {
    type Item = T;
    type IntoIter = Cursor<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::ErrorKind,
        protocol::item::{FilesystemEntry, LAST_MODIFIED_UNKNOWN},
    };

    fn response<T: Record>(raw: &[&str]) -> Response<T> {
        Response::new(&CommandOutcome::success(raw.iter().copied())).expect("success")
    }

    fn paths<T: Record + FilesystemEntry>(records: impl Iterator<Item = T>) -> Vec<String> {
        records.map(|record| record.full_path().to_owned()).collect()
    }

    #[test]
    fn songs_split_on_file_key() {
        let songs = response::<Music>(&["file: a.mp3", "Time: 120", "file: b.mp3", "Time: 90"]);

        assert_eq!(songs.size(), 2);
        assert_eq!(songs.get(0).expect("record 0").full_path(), "a.mp3");
        assert_eq!(songs.get(1).expect("record 1").full_path(), "b.mp3");
        assert_eq!(
            songs.get(1).expect("record 1").duration(),
            Some(std::time::Duration::from_secs(90))
        );
    }

    #[test]
    fn entries_dispatch_by_leading_key() {
        let entries = response::<Entry>(&[
            "directory: Music",
            "directory: Music/Rock",
            "file: Music/song.mp3",
        ]);

        assert_eq!(entries.size(), 3);
        let types: Vec<_> = entries.iter().map(|entry| entry.typ()).collect();
        assert_eq!(types, ["directory", "directory", "file"]);
        assert_eq!(
            paths(entries.iter()),
            ["Music", "Music/Rock", "Music/song.mp3"]
        );
    }

    #[test]
    fn malformed_timestamp_does_not_stop_traversal() {
        let entries = response::<Entry>(&[
            "file: a.mp3",
            "Last-Modified: notadate",
            "file: b.mp3",
            "Last-Modified: 2014-05-23T21:14:01Z",
        ]);

        let records = entries.to_vec();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].last_modified(), LAST_MODIFIED_UNKNOWN);
        assert_eq!(records[1].last_modified(), 1_400_879_641);
    }

    #[test]
    fn get_out_of_range() {
        let songs = response::<Music>(&["file: a.mp3", "file: b.mp3"]);

        let err = songs.get(songs.size()).expect_err("one past the end");
        assert_eq!(err.kind, ErrorKind::OutOfRange);
        assert_eq!(
            songs.cursor_at(3).expect_err("beyond the end").kind,
            ErrorKind::OutOfRange
        );
        assert!(songs.cursor_at(2).is_ok());
    }

    #[test]
    fn failed_outcome_is_a_precondition_error() {
        let outcome = CommandOutcome::from_reply("ACK [50@0] {lsinfo} No such directory\n");
        let err = EntryResponse::new(&outcome).expect_err("failed outcome");
        assert_eq!(err.kind, ErrorKind::FailedPrecondition);
    }

    #[test]
    fn empty_response() {
        let empty = EntryResponse::empty();
        assert_eq!(empty.size(), 0);
        assert!(empty.is_empty());
        assert!(empty.first().is_none());
        assert!(empty.last().is_none());

        let cursor = empty.cursor();
        assert!(!cursor.has_next());
        assert!(!cursor.has_previous());
    }

    #[test]
    fn no_matching_keys_is_empty() {
        let playlists = response::<PlaylistFile>(&["file: a.mp3", "Time: 1"]);
        assert_eq!(playlists.size(), 0);
        assert!(playlists.to_vec().is_empty());
    }

    #[test]
    fn preamble_lines_are_skipped() {
        let songs = response::<Music>(&["directory: Music", "file: Music/a.mp3", "Time: 3"]);

        assert_eq!(songs.size(), 1);
        assert_eq!(paths(songs.iter()), ["Music/a.mp3"]);
        assert_eq!(paths(songs.iter_rev()), ["Music/a.mp3"]);
    }

    #[test]
    fn reinterpretation_shares_lines() {
        let entries = response::<Entry>(&[
            "directory: Music",
            "file: Music/a.mp3",
            "playlist: mix.m3u",
            "file: Music/b.mp3",
        ]);
        let songs = MusicResponse::from_response(&entries);
        let directories = DirectoryResponse::from_response(&entries);

        assert!(std::sync::Arc::ptr_eq(entries.lines(), songs.lines()));
        assert_eq!(entries.size(), 4);
        assert_eq!(songs.size(), 2);
        assert_eq!(directories.size(), 1);
        assert_eq!(paths(songs.iter()), ["Music/a.mp3", "Music/b.mp3"]);
    }

    #[test]
    fn first_and_last() {
        let songs = response::<Music>(&["file: a.mp3", "file: b.mp3", "file: c.mp3"]);
        assert_eq!(songs.first().map(|s| s.full_path().to_owned()).as_deref(), Some("a.mp3"));
        assert_eq!(songs.last().map(|s| s.full_path().to_owned()).as_deref(), Some("c.mp3"));
    }

    #[test]
    fn clones_share_memoized_size() {
        let songs = response::<Music>(&["file: a.mp3", "file: b.mp3"]);
        assert_eq!(songs.size(), 2);

        let copy = songs.clone();
        assert_eq!(copy.size(), 2);
        assert_eq!(copy.to_vec(), songs.to_vec());
    }

    #[test]
    fn concurrent_traversals_agree() {
        let entries = response::<Entry>(&[
            "directory: Music",
            "file: Music/a.mp3",
            "Time: 1",
            "file: Music/b.mp3",
            "playlist: mix.m3u",
        ]);
        let expected = entries.to_vec();

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|n| {
                    let entries = &entries;
                    scope.spawn(move || {
                        if n % 2 == 0 {
                            entries.to_vec()
                        } else {
                            let mut records: Vec<_> = entries.iter_rev().collect();
                            records.reverse();
                            records
                        }
                    })
                })
                .collect();

            for handle in handles {
                assert_eq!(handle.join().expect("no panic"), expected);
            }
        });
    }

    #[derive(Debug, PartialEq)]
    struct Output {
        id: String,
        name: Option<String>,
    }

    impl Output {
        fn from_fields(fields: Fields<'_>) -> Self {
            Self {
                id: fields.path().to_owned(),
                name: fields.string("outputname"),
            }
        }
    }

    impl Record for Output {
        const PARSERS: &'static [(&'static str, Parser<Self>)] = &[("outputid", Self::from_fields)];
    }

    #[test]
    fn custom_record_types_are_supported() {
        let outputs: Response<Output> = response(&[
            "outputid: 0",
            "outputname: ALSA",
            "outputenabled: 1",
            "outputid: 1",
            "outputname: HTTP stream",
        ]);

        assert_eq!(outputs.size(), 2);
        assert_eq!(
            outputs.last(),
            Some(Output {
                id: "1".to_owned(),
                name: Some("HTTP stream".to_owned()),
            })
        );

        let cursor = std::thread::spawn({
            let cursor = outputs.cursor_at_end();
            move || cursor
        })
        .join()
        .expect("no panic");
        assert_eq!(cursor.backward().count(), 2);
    }

    #[test]
    fn lines_without_separator_are_not_boundaries() {
        let songs: MusicResponse = response(&[
            "file: a.mp3",
            "file:b.mp3",
            "OK",
            "file",
            "file: c.mp3",
        ]);

        assert_eq!(songs.size(), 2);
        assert_eq!(paths(songs.iter()), ["a.mp3", "c.mp3"]);
        assert_eq!(paths(songs.iter_rev()), ["c.mp3", "a.mp3"]);
    }
}
