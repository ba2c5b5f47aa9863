//! Playable songs.
//!
//! # Wire Format
//!
//! ```text
//! file: Music/Artist/Album/01 Opening.flac
//! Last-Modified: 2014-05-23T21:14:01Z
//! Time: 215
//! duration: 214.733
//! Artist: Artist
//! AlbumArtist: Artist
//! Title: Opening
//! Album: Album
//! Track: 1/12
//! Disc: 1
//! Date: 1999
//! Genre: Rock
//! ```
//!
//! Queue listings add `Pos` and `Id`; radio streams may carry `Name`
//! instead of tags.

use std::time::Duration;

use serde::Serialize;
use serde_with::{serde_as, DurationSecondsWithFrac};

use crate::protocol::response::{Parser, Record};

use super::{Fields, FilesystemEntry};

/// Leading key of a song record.
pub const KEY: &str = "file";

/// A song in the database or the queue.
///
/// Every tag is optional: the server only sends the tags a file has.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Music {
    path: String,
    last_modified: i64,
    size: i64,

    title: Option<String>,
    artist: Option<String>,
    album: Option<String>,
    album_artist: Option<String>,
    genre: Option<String>,
    date: Option<String>,

    /// Stream name, for radio stations.
    name: Option<String>,

    /// Track number; the `N` of a `N/M` value.
    track: Option<u32>,

    /// Disc number; the `N` of a `N/M` value.
    disc: Option<u32>,

    /// Playing time, from `duration` with a fallback to the integral `Time`.
    #[serde_as(as = "Option<DurationSecondsWithFrac<f64>>")]
    duration: Option<Duration>,

    /// Position in the queue, for queue listings.
    position: Option<u32>,

    /// Song id in the queue, for queue listings.
    song_id: Option<u32>,
}

impl Music {
    #[must_use]
    pub fn from_fields(fields: Fields<'_>) -> Self {
        trace!("parsing song {}", fields.path());

        Self {
            path: fields.path().to_owned(),
            last_modified: fields.last_modified(),
            size: fields.size(),

            title: fields.string("Title"),
            artist: fields.string("Artist"),
            album: fields.string("Album"),
            album_artist: fields.string("AlbumArtist"),
            genre: fields.string("Genre"),
            date: fields.string("Date"),
            name: fields.string("Name"),

            track: fields.get("Track").and_then(ordinal),
            disc: fields.get("Disc").and_then(ordinal),
            duration: duration(fields),

            position: fields.parse("Pos"),
            song_id: fields.parse("Id"),
        }
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    #[must_use]
    pub fn artist(&self) -> Option<&str> {
        self.artist.as_deref()
    }

    #[must_use]
    pub fn album(&self) -> Option<&str> {
        self.album.as_deref()
    }

    #[must_use]
    pub fn album_artist(&self) -> Option<&str> {
        self.album_artist.as_deref()
    }

    /// The album artist, or the track artist when there is none.
    ///
    /// Albums are grouped by this name.
    #[must_use]
    pub fn album_artist_or_artist(&self) -> Option<&str> {
        self.album_artist().or_else(|| self.artist())
    }

    #[must_use]
    pub fn genre(&self) -> Option<&str> {
        self.genre.as_deref()
    }

    #[must_use]
    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    #[must_use]
    pub fn stream_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn track(&self) -> Option<u32> {
        self.track
    }

    #[must_use]
    pub fn disc(&self) -> Option<u32> {
        self.disc
    }

    #[must_use]
    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    #[must_use]
    pub fn position(&self) -> Option<u32> {
        self.position
    }

    #[must_use]
    pub fn song_id(&self) -> Option<u32> {
        self.song_id
    }

    /// Whether the path is a URL rather than a database file.
    #[must_use]
    pub fn is_stream(&self) -> bool {
        self.path.contains("://")
    }

    /// The duration as `m:ss`, or `h:mm:ss` from one hour on.
    ///
    /// Returns `None` when the duration is unknown.
    #[must_use]
    pub fn formatted_time(&self) -> Option<String> {
        let seconds = self.duration?.as_secs();
        let (hours, minutes, seconds) = (seconds / 3600, seconds / 60 % 60, seconds % 60);

        Some(if hours > 0 {
            format!("{hours}:{minutes:02}:{seconds:02}")
        } else {
            format!("{minutes}:{seconds:02}")
        })
    }
}

/// Parses `N` or `N/M`, keeping `N`.
fn ordinal(value: &str) -> Option<u32> {
    value.split('/').next()?.trim().parse().ok()
}

fn duration(fields: Fields<'_>) -> Option<Duration> {
    fields
        .parse::<f64>("duration")
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        .or_else(|| fields.parse::<u64>("Time").map(Duration::from_secs))
}

impl Record for Music {
    const PARSERS: &'static [(&'static str, Parser<Self>)] = &[(KEY, Self::from_fields)];
}

impl FilesystemEntry for Music {
    fn full_path(&self) -> &str {
        &self.path
    }

    fn last_modified(&self) -> i64 {
        self.last_modified
    }

    fn size(&self) -> i64 {
        self.size
    }
}
