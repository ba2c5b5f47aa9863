use serde::Serialize;

use crate::protocol::response::{Parser, Record};

use super::{Fields, FilesystemEntry};

/// Leading key of a stored playlist record.
pub const KEY: &str = "playlist";

/// A stored playlist, as listed by `lsinfo` or `listplaylists`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct PlaylistFile {
    path: String,
    last_modified: i64,
    size: i64,
}

impl PlaylistFile {
    #[must_use]
    pub fn from_fields(fields: Fields<'_>) -> Self {
        Self {
            path: fields.path().to_owned(),
            last_modified: fields.last_modified(),
            size: fields.size(),
        }
    }

    /// The playlist name without a trailing `.m3u` extension.
    #[must_use]
    pub fn title(&self) -> &str {
        let name = self.name();
        name.strip_suffix(".m3u").unwrap_or(name)
    }
}

impl Record for PlaylistFile {
    const PARSERS: &'static [(&'static str, Parser<Self>)] = &[(KEY, Self::from_fields)];
}

impl FilesystemEntry for PlaylistFile {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::item::LAST_MODIFIED_UNKNOWN;

    #[test]
    fn strips_extension_from_title() {
        let lines = vec!["playlist: Lists/road trip.m3u".to_owned()];
        let playlist = PlaylistFile::from_fields(Fields::new(&lines));

        assert_eq!(playlist.name(), "road trip.m3u");
        assert_eq!(playlist.title(), "road trip");
        assert_eq!(playlist.last_modified(), LAST_MODIFIED_UNKNOWN);
    }

    #[test]
    fn plain_names_are_kept() {
        let lines = vec!["playlist: favourites".to_owned()];
        let playlist = PlaylistFile::from_fields(Fields::new(&lines));

        assert_eq!(playlist.title(), "favourites");
        assert_eq!(playlist.parent_directory(), "");
    }
}
