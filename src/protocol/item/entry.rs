use serde::Serialize;

use crate::protocol::response::{Parser, Record};

use super::{directory, music, playlist_file, Directory, Fields, FilesystemEntry, Music, PlaylistFile};

/// Any filesystem record of a mixed listing such as `lsinfo`.
///
/// The variant is chosen by the record's leading key:
/// * `directory` - [`Entry::Directory`]
/// * `file` - [`Entry::Music`]
/// * `playlist` - [`Entry::Playlist`]
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type")]
pub enum Entry {
    #[serde(rename = "directory")]
    Directory(Directory),

    #[serde(rename = "file")]
    Music(Box<Music>),

    #[serde(rename = "playlist")]
    Playlist(PlaylistFile),
}

impl Entry {
    /// Returns the leading key this entry was built from.
    #[must_use]
    #[inline]
    pub const fn typ(&self) -> &'static str {
        match self {
            Entry::Directory(_) => directory::KEY,
            Entry::Music(_) => music::KEY,
            Entry::Playlist(_) => playlist_file::KEY,
        }
    }

    #[must_use]
    pub fn as_directory(&self) -> Option<&Directory> {
        match self {
            Entry::Directory(directory) => Some(directory),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_music(&self) -> Option<&Music> {
        match self {
            Entry::Music(music) => Some(music.as_ref()),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_playlist(&self) -> Option<&PlaylistFile> {
        match self {
            Entry::Playlist(playlist) => Some(playlist),
            _ => None,
        }
    }

    fn directory(fields: Fields<'_>) -> Self {
        Entry::Directory(Directory::from_fields(fields))
    }

    fn music(fields: Fields<'_>) -> Self {
        Entry::Music(Box::new(Music::from_fields(fields)))
    }

    fn playlist(fields: Fields<'_>) -> Self {
        Entry::Playlist(PlaylistFile::from_fields(fields))
    }
}

impl Record for Entry {
    const PARSERS: &'static [(&'static str, Parser<Self>)] = &[
        (directory::KEY, Self::directory),
        (music::KEY, Self::music),
        (playlist_file::KEY, Self::playlist),
    ];
}

impl FilesystemEntry for Entry {
    fn full_path(&self) -> &str {
        match self {
            Entry::Directory(directory) => directory.full_path(),
            Entry::Music(music) => music.full_path(),
            Entry::Playlist(playlist) => playlist.full_path(),
        }
    }

    fn last_modified(&self) -> i64 {
        match self {
            Entry::Directory(directory) => directory.last_modified(),
            Entry::Music(music) => music.last_modified(),
            Entry::Playlist(playlist) => playlist.last_modified(),
        }
    }

    fn size(&self) -> i64 {
        match self {
            Entry::Directory(directory) => directory.size(),
            Entry::Music(music) => music.size(),
            Entry::Playlist(playlist) => playlist.size(),
        }
    }
}

impl From<Directory> for Entry {
    fn from(directory: Directory) -> Self {
        Entry::Directory(directory)
    }
}

impl From<Music> for Entry {
    fn from(music: Music) -> Self {
        Entry::Music(Box::new(music))
    }
}

impl From<PlaylistFile> for Entry {
    fn from(playlist: PlaylistFile) -> Self {
        Entry::Playlist(playlist)
    }
}
