//! Server acknowledgements of failed commands.
//!
//! A command that fails ends its reply with a single line of the form:
//!
//! ```text
//! ACK [<code>@<command_list_num>] {<current_command>} <message_text>
//! ```
//!
//! For example, listing a directory that does not exist:
//!
//! ```text
//! ACK [50@0] {lsinfo} No such directory
//! ```
//!
//! The numeric code is mapped onto an [`ErrorKind`] so that failures travel
//! through the crate's regular [`Error`] type, while the parsed [`Ack`] stays
//! available through [`Error::downcast`].

use std::{fmt, sync::LazyLock};

use regex_lite::Regex;

use crate::error::{Error, ErrorKind};

/// Prefix of every acknowledgement line.
pub const PREFIX: &str = "ACK ";

static ACK_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ACK \[(\d+)@(\d+)\] \{([^}]*)\} ?(.*)$").expect("invalid ACK pattern")
});

/// Error codes the server reports in acknowledgements.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum AckCode {
    /// Command is not allowed outside of a command list.
    NotList,
    /// Bad or missing argument.
    Arg,
    /// Wrong password.
    Password,
    /// Insufficient permission for the command.
    Permission,
    /// Unknown command.
    Unknown,
    /// Song, directory or playlist does not exist.
    NoExist,
    /// Playlist is at its maximum length.
    PlaylistMax,
    /// System error on the server side.
    System,
    /// Playlist could not be loaded.
    PlaylistLoad,
    /// Database update already in progress.
    UpdateAlready,
    /// Player is not in sync.
    PlayerSync,
    /// Object already exists.
    Exist,
    /// Code not known to this client.
    Other(u32),
}

impl AckCode {
    /// The kind of [`Error`] this code is reported as.
    #[must_use]
    pub fn kind(self) -> ErrorKind {
        match self {
            AckCode::NotList | AckCode::Arg => ErrorKind::InvalidArgument,
            AckCode::Password | AckCode::Permission => ErrorKind::PermissionDenied,
            AckCode::Unknown => ErrorKind::Unimplemented,
            AckCode::NoExist => ErrorKind::NotFound,
            AckCode::PlaylistMax => ErrorKind::ResourceExhausted,
            AckCode::System | AckCode::PlaylistLoad => ErrorKind::Internal,
            AckCode::UpdateAlready => ErrorKind::Aborted,
            AckCode::PlayerSync => ErrorKind::FailedPrecondition,
            AckCode::Exist => ErrorKind::AlreadyExists,
            AckCode::Other(_) => ErrorKind::Unknown,
        }
    }
}

impl From<u32> for AckCode {
    fn from(code: u32) -> Self {
        match code {
            1 => AckCode::NotList,
            2 => AckCode::Arg,
            3 => AckCode::Password,
            4 => AckCode::Permission,
            5 => AckCode::Unknown,
            50 => AckCode::NoExist,
            51 => AckCode::PlaylistMax,
            52 => AckCode::System,
            53 => AckCode::PlaylistLoad,
            54 => AckCode::UpdateAlready,
            55 => AckCode::PlayerSync,
            56 => AckCode::Exist,
            other => AckCode::Other(other),
        }
    }
}

impl From<AckCode> for u32 {
    fn from(code: AckCode) -> Self {
        match code {
            AckCode::NotList => 1,
            AckCode::Arg => 2,
            AckCode::Password => 3,
            AckCode::Permission => 4,
            AckCode::Unknown => 5,
            AckCode::NoExist => 50,
            AckCode::PlaylistMax => 51,
            AckCode::System => 52,
            AckCode::PlaylistLoad => 53,
            AckCode::UpdateAlready => 54,
            AckCode::PlayerSync => 55,
            AckCode::Exist => 56,
            AckCode::Other(other) => other,
        }
    }
}

/// A parsed acknowledgement line.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Ack {
    pub code: AckCode,
    /// Offset of the failing command within a command list, zero otherwise.
    pub command_list_num: u32,
    /// Name of the command that failed, possibly empty.
    pub command: String,
    pub message: String,
}

impl Ack {
    /// Parses an acknowledgement line.
    ///
    /// Returns `None` if `line` does not follow the acknowledgement grammar.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let captures = ACK_LINE.captures(line.trim_end())?;
        let code = captures[1].parse::<u32>().ok()?;
        let command_list_num = captures[2].parse::<u32>().ok()?;

        Some(Self {
            code: AckCode::from(code),
            command_list_num,
            command: captures[3].to_owned(),
            message: captures[4].to_owned(),
        })
    }
}

impl fmt::Display for Ack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (code {} in {{{}}})",
            self.message,
            u32::from(self.code),
            self.command
        )
    }
}

impl std::error::Error for Ack {}

impl From<Ack> for Error {
    fn from(ack: Ack) -> Self {
        Self::new(ack.code.kind(), ack)
    }
}

/// Converts an acknowledgement line into an [`Error`].
///
/// Lines that do not parse are still failures; they are reported as
/// `Unknown` with the raw text.
#[must_use]
pub fn to_error(line: &str) -> Error {
    let Some(ack) = Ack::parse(line) else {
        warn!("malformed acknowledgement: {line}");
        return Error::unknown(line.to_owned());
    };

    debug!("server acknowledged failure: {ack}");
    ack.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_no_such_directory() {
        let ack = Ack::parse("ACK [50@0] {lsinfo} No such directory").expect("valid ACK");
        assert_eq!(ack.code, AckCode::NoExist);
        assert_eq!(ack.command_list_num, 0);
        assert_eq!(ack.command, "lsinfo");
        assert_eq!(ack.message, "No such directory");
    }

    #[test]
    fn parses_empty_command_name() {
        let ack = Ack::parse("ACK [5@0] {} unknown command \"foo\"").expect("valid ACK");
        assert_eq!(ack.code, AckCode::Unknown);
        assert!(ack.command.is_empty());
        assert_eq!(ack.message, "unknown command \"foo\"");
    }

    #[test]
    fn unknown_codes_are_preserved() {
        let ack = Ack::parse("ACK [99@3] {status} odd").expect("valid ACK");
        assert_eq!(ack.code, AckCode::Other(99));
        assert_eq!(u32::from(ack.code), 99);
        assert_eq!(ack.command_list_num, 3);
    }

    #[test]
    fn codes_map_to_error_kinds() {
        let err = to_error("ACK [50@0] {lsinfo} No such directory");
        assert_eq!(err.kind, ErrorKind::NotFound);
        let ack = err.downcast::<Ack>().expect("ack payload");
        assert_eq!(ack.code, AckCode::NoExist);

        assert_eq!(
            to_error("ACK [4@0] {update} you don't have permission").kind,
            ErrorKind::PermissionDenied
        );
    }

    #[test]
    fn malformed_lines_are_unknown_failures() {
        let err = to_error("ACK garbage");
        assert_eq!(err.kind, ErrorKind::Unknown);
        assert!(err.downcast::<Ack>().is_none());
    }
}
