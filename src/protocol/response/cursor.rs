//! Bidirectional traversal of a [`Response`](super::Response).
//!
//! A [`Cursor`] sits *between* records, like a text cursor between
//! characters. Stepping forward parses the record after it; stepping
//! backward parses the record before it. Positions run from `0` (before the
//! first record) to `size` (after the last one).
//!
//! The reply has no markers to find a record's start from its end, so a
//! backward step scans back from the cursor to the nearest leading key and
//! parses forward from there. That scan only crosses the lines of the record
//! being read, which keeps a full backward traversal linear in the number of
//! lines.

use std::{fmt, iter::FusedIterator, marker::PhantomData};

use crate::protocol::{item::Fields, outcome::Lines};

use super::{boundary, is_boundary, Record};

/// A position between two records of a response.
///
/// Owns a shared handle on the reply lines, so cursors outlive the response
/// that created them and can move to other threads. Each cursor's position
/// is private to it; any number of cursors may traverse the same lines.
pub struct Cursor<T> {
    lines: Lines,

    /// Line of the record [`next`](Iterator::next) returns: a leading-key
    /// line while `position < size`, `lines.len()` at the end.
    offset: usize,

    position: usize,
    size: usize,
    marker: PhantomData<fn() -> T>,
}

impl<T: Record> Cursor<T> {
    /// Creates a cursor at `position`, which must not exceed `size`.
    pub(super) fn new(lines: Lines, size: usize, position: usize) -> Self {
        debug_assert!(position <= size, "position {position} beyond {size}");
        let offset = Self::seek(&lines, size, position);

        Self {
            lines,
            offset,
            position,
            size,
            marker: PhantomData,
        }
    }

    /// Finds the line starting record `position`.
    ///
    /// Scans from whichever end of the lines is closer to the record.
    fn seek(lines: &[String], size: usize, position: usize) -> usize {
        if position >= size {
            return lines.len();
        }

        let mut boundaries = lines
            .iter()
            .enumerate()
            .filter(|(_, line)| is_boundary::<T>(line))
            .map(|(offset, _)| offset);

        let found = if position <= size / 2 {
            boundaries.nth(position)
        } else {
            boundaries.nth_back(size - 1 - position)
        };

        found.unwrap_or(lines.len())
    }

    /// Whether [`next`](Iterator::next) would return a record.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.position < self.size
    }

    /// Whether [`previous`](Self::previous) would return a record.
    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.position > 0
    }

    /// Index of the record [`next`](Iterator::next) would return, equal to
    /// the number of records before the cursor.
    #[must_use]
    pub fn next_index(&self) -> usize {
        self.position
    }

    /// Index of the record [`previous`](Self::previous) would return, or
    /// `None` before the first record.
    #[must_use]
    pub fn previous_index(&self) -> Option<usize> {
        self.position.checked_sub(1)
    }

    /// Number of records in the response.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Steps back over one record and returns it.
    ///
    /// Returns `None` before the first record.
    pub fn previous(&mut self) -> Option<T> {
        if !self.has_previous() {
            return None;
        }

        let end = self.offset;
        let start = self.lines[..end]
            .iter()
            .rposition(|line| is_boundary::<T>(line))?;
        let parser = boundary::<T>(&self.lines[start])?;
        let record = parser(Fields::new(&self.lines[start..end]));

        self.offset = start;
        self.position -= 1;
        Some(record)
    }

    /// Turns this cursor into an iterator stepping backwards.
    #[must_use]
    pub fn backward(self) -> Backward<T> {
        Backward { cursor: self }
    }
}

impl<T: Record> Iterator for Cursor<T> {
    type Item = T;

    /// Steps forward over one record and returns it.
    ///
    /// Returns `None` after the last record.
    fn next(&mut self) -> Option<T> {
        if !self.has_next() {
            return None;
        }

        let start = self.offset;
        let parser = boundary::<T>(&self.lines[start])?;
        let end = self.lines[start + 1..]
            .iter()
            .position(|line| is_boundary::<T>(line))
            .map_or(self.lines.len(), |len| start + 1 + len);
        let record = parser(Fields::new(&self.lines[start..end]));

        self.offset = end;
        self.position += 1;
        Some(record)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.size - self.position;
        (remaining, Some(remaining))
    }
}

impl<T: Record> ExactSizeIterator for Cursor<T> {}

impl<T: Record> FusedIterator for Cursor<T> {}

impl<T> Clone for Cursor<T> {
    fn clone(&self) -> Self {
        Self {
            lines: self.lines.clone(),
            offset: self.offset,
            position: self.position,
            size: self.size,
            marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Cursor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("position", &self.position)
            .field("size", &self.size)
            .field("offset", &self.offset)
            .finish_non_exhaustive()
    }
}

/// Iterator over records from a cursor towards the first record.
///
/// Created by [`Cursor::backward`] and
/// [`Response::iter_rev`](super::Response::iter_rev).
#[derive(Clone, Debug)]
pub struct Backward<T> {
    cursor: Cursor<T>,
}

impl<T> Backward<T> {
    /// The underlying cursor, for index queries.
    #[must_use]
    pub fn cursor(&self) -> &Cursor<T> {
        &self.cursor
    }

    #[must_use]
    pub fn into_cursor(self) -> Cursor<T> {
        self.cursor
    }
}

impl<T: Record> Iterator for Backward<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.cursor.previous()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.cursor.position;
        (remaining, Some(remaining))
    }
}

impl<T: Record> ExactSizeIterator for Backward<T> {}

impl<T: Record> FusedIterator for Backward<T> {}

#[cfg(test)]
mod tests {
    use super::Record;
    use crate::protocol::{
        item::{Entry, FilesystemEntry, Music},
        outcome::CommandOutcome,
        response::{EntryResponse, MusicResponse, Response},
    };

    fn response<T: Record>(raw: &[&str]) -> Response<T> {
        Response::new(&CommandOutcome::success(raw.iter().copied())).expect("success")
    }

    fn listing() -> EntryResponse {
        response(&[
            "directory: Music",
            "Last-Modified: 2014-05-23T21:14:01Z",
            "directory: Music/Rock",
            "file: Music/a.mp3",
            "Time: 120",
            "Artist: A",
            "playlist: mix.m3u",
            "file: Music/b.mp3",
            "Time: 90",
        ])
    }

    #[test]
    fn forward_then_backward_returns_same_record() {
        let entries = listing();

        for position in 0..entries.size() {
            let mut cursor = entries.cursor_at(position).expect("in range");
            let forward = cursor.next().expect("record");
            assert_eq!(cursor.next_index(), position + 1);

            let backward = cursor.previous().expect("record");
            assert_eq!(forward, backward);
            assert_eq!(cursor.next_index(), position);
        }
    }

    #[test]
    fn backward_then_forward_returns_same_record() {
        let entries = listing();

        for position in 1..=entries.size() {
            let mut cursor = entries.cursor_at(position).expect("in range");
            let backward = cursor.previous().expect("record");
            assert_eq!(cursor.previous_index(), position.checked_sub(2));

            let forward = cursor.next().expect("record");
            assert_eq!(backward, forward);
            assert_eq!(cursor.next_index(), position);
        }
    }

    #[test]
    fn previous_matches_next_of_preceding_position() {
        let entries = listing();

        for position in 1..=entries.size() {
            let before = entries.cursor_at(position).expect("in range").previous();
            let after = entries.cursor_at(position - 1).expect("in range").next();
            assert_eq!(before, after);
        }
    }

    #[test]
    fn reverse_traversal_mirrors_forward() {
        let entries = listing();

        let forward: Vec<Entry> = entries.iter().collect();
        let mut backward: Vec<Entry> = entries.iter_rev().collect();
        backward.reverse();

        assert_eq!(forward.len(), 5);
        assert_eq!(forward, backward);
    }

    #[test]
    fn ends_are_signalled_not_wrapped() {
        let entries = listing();

        let mut cursor = entries.cursor();
        assert!(!cursor.has_previous());
        assert_eq!(cursor.previous_index(), None);
        assert!(cursor.previous().is_none());
        assert_eq!(cursor.next_index(), 0);

        let mut cursor = entries.cursor_at_end();
        assert!(!cursor.has_next());
        assert!(cursor.next().is_none());
        assert!(cursor.next().is_none());
        assert_eq!(cursor.next_index(), entries.size());
        assert_eq!(cursor.previous_index(), Some(entries.size() - 1));
    }

    #[test]
    fn records_keep_their_fields() {
        let entries = listing();

        let song = entries.get(2).expect("record 2");
        let song = song.as_music().expect("file record");
        assert_eq!(song.full_path(), "Music/a.mp3");
        assert_eq!(song.artist(), Some("A"));

        let last = entries.cursor_at_end().previous().expect("last record");
        assert_eq!(last.full_path(), "Music/b.mp3");
        assert_eq!(
            last.as_music().and_then(Music::duration),
            Some(std::time::Duration::from_secs(90))
        );
    }

    #[test]
    fn seeking_from_either_end_agrees() {
        let songs: MusicResponse = response(&[
            "file: 0.mp3",
            "file: 1.mp3",
            "Time: 1",
            "file: 2.mp3",
            "file: 3.mp3",
            "Time: 3",
            "file: 4.mp3",
            "file: 5.mp3",
        ]);

        for (index, song) in songs.iter().enumerate() {
            assert_eq!(song.full_path(), format!("{index}.mp3"));
            assert_eq!(songs.get(index).expect("in range"), song);
        }
    }

    #[test]
    fn size_hint_is_exact() {
        let entries = listing();
        let mut cursor = entries.cursor();
        assert_eq!(cursor.len(), 5);
        cursor.next();
        assert_eq!(cursor.len(), 4);

        let backward = entries.cursor_at(3).expect("in range").backward();
        assert_eq!(backward.len(), 3);
    }

    #[test]
    fn cloned_cursors_move_independently() {
        let entries = listing();
        let mut first = entries.cursor();
        first.next();

        let mut second = first.clone();
        second.next();
        second.next();

        assert_eq!(first.next_index(), 1);
        assert_eq!(second.next_index(), 3);
        assert_eq!(first.next(), entries.get(1).ok());
    }

    #[test]
    fn cursors_outlive_their_response() {
        let mut cursor = {
            let entries = listing();
            entries.cursor_at_end()
        };

        assert_eq!(
            cursor.previous().map(|entry| entry.full_path().to_owned()),
            Some("Music/b.mp3".to_owned())
        );
    }

    #[test]
    fn cursors_cross_threads() {
        let entries = listing();
        let expected = entries.to_vec();
        let cursor = entries.cursor();

        let records = std::thread::spawn(move || cursor.collect::<Vec<_>>())
            .join()
            .expect("no panic");
        assert_eq!(records, expected);
    }
}
