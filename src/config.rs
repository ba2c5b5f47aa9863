//! Settings for reading captured replies.
//!
//! Settings are read from a TOML file and may be overridden on the command
//! line:
//!
//! ```toml
//! # Which records to read: "entries", "music", "directories" or "playlists"
//! kind = "entries"
//!
//! # Print records from last to first
//! reverse = false
//!
//! # Pretty-print JSON output
//! pretty = false
//! ```

use std::{fmt, fs, path::Path, str::FromStr};

use serde::Deserialize;

use crate::error::{Error, ErrorKind, Result};

/// Default name of the configuration file.
pub const DEFAULT_FILE: &str = "tonearm.toml";

/// Configuration files larger than this are refused.
const MAX_FILE_SIZE: u64 = 64 * 1024;

/// Which typed response to read a reply as.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// Directories, songs and playlists, as listed by `lsinfo`.
    #[default]
    Entries,
    /// Songs only.
    Music,
    /// Directories only.
    Directories,
    /// Stored playlists only.
    Playlists,
}

impl Kind {
    pub const ALL: [Kind; 4] = [Kind::Entries, Kind::Music, Kind::Directories, Kind::Playlists];
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Entries => write!(f, "entries"),
            Kind::Music => write!(f, "music"),
            Kind::Directories => write!(f, "directories"),
            Kind::Playlists => write!(f, "playlists"),
        }
    }
}

impl FromStr for Kind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Kind::ALL
            .into_iter()
            .find(|kind| kind.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                Error::invalid_argument(format!(
                    "unknown kind \"{s}\", expected one of: entries, music, directories, playlists"
                ))
            })
    }
}

#[derive(Clone, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub kind: Kind,
    pub reverse: bool,
    pub pretty: bool,
}

impl Config {
    /// Reads the configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Will return `Err` if:
    /// - the file cannot be read
    /// - the file is larger than 64 KiB
    /// - the contents are not valid TOML or contain unknown settings
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Prevent out-of-memory condition: configuration should be small.
        let file_size = fs::metadata(path)?.len();
        if file_size > MAX_FILE_SIZE {
            return Err(Error::invalid_argument(format!(
                "{} is too large ({file_size} bytes)",
                path.display()
            )));
        }

        let contents = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        trace!("{}: {config:?}", path.display());

        Ok(config)
    }

    /// Reads the configuration, or falls back to defaults if the file does
    /// not exist.
    ///
    /// # Errors
    ///
    /// Same as [`from_file`](Self::from_file), except that a missing file
    /// is not an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        match Self::from_file(&path) {
            Err(e) if e.kind == ErrorKind::NotFound => {
                debug!(
                    "{} not found, using default settings",
                    path.as_ref().display()
                );
                Ok(Self::default())
            }
            result => result,
        }
    }
}
