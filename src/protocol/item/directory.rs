use serde::Serialize;

use crate::protocol::response::{Parser, Record};

use super::{Fields, FilesystemEntry, SIZE_UNKNOWN};

/// Leading key of a directory record.
pub const KEY: &str = "directory";

/// A directory in the server's music database.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Directory {
    path: String,
    last_modified: i64,
}

impl Directory {
    #[must_use]
    pub fn from_fields(fields: Fields<'_>) -> Self {
        Self {
            path: fields.path().to_owned(),
            last_modified: fields.last_modified(),
        }
    }
}

impl Record for Directory {
    const PARSERS: &'static [(&'static str, Parser<Self>)] = &[(KEY, Self::from_fields)];
}

impl FilesystemEntry for Directory {
    fn full_path(&self) -> &str {
        &self.path
    }

    fn last_modified(&self) -> i64 {
        self.last_modified
    }

    /// Directories never carry a size.
    fn size(&self) -> i64 {
        SIZE_UNKNOWN
    }
}
