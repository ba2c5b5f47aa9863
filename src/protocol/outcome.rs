//! Results of single command executions.
//!
//! A [`CommandOutcome`] is produced once by whatever executes commands
//! against the server and is read-only from then on. Successful outcomes
//! carry the reply's lines as shared, immutable [`Lines`] that any number of
//! response views and cursors may hold at the same time.
//!
//! # Wire Format
//!
//! A raw reply is a run of `key: value` lines terminated by `OK`:
//!
//! ```text
//! directory: Music
//! Last-Modified: 2014-05-23T21:14:01Z
//! file: Music/song.mp3
//! Time: 120
//! OK
//! ```
//!
//! or cut short by an acknowledgement line on failure:
//!
//! ```text
//! ACK [50@0] {lsinfo} No such directory
//! ```

use std::sync::Arc;

use crate::error::{Error, Result};

use super::ack;

/// Terminator of a successful reply.
pub const OK: &str = "OK";

/// Separator between the replies of a command list started with
/// `command_list_ok_begin`.
pub const LIST_OK: &str = "list_OK";

/// Immutable reply lines, shared by reference count.
///
/// Cloning bumps the count and never copies the lines.
pub type Lines = Arc<[String]>;

/// The outcome of one command: its reply lines or the reason it failed.
///
/// There are no setters; the outcome is fixed when it is constructed.
#[derive(Debug)]
pub enum CommandOutcome {
    /// The command succeeded; possibly with zero lines.
    Success(Lines),
    /// The command failed at the connection or protocol level.
    Failure(Error),
}

impl CommandOutcome {
    /// Creates a successful outcome over `lines`.
    ///
    /// An empty `lines` yields an empty success, not a failure.
    pub fn success<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Success(lines.into_iter().map(Into::into).collect())
    }

    /// Creates a failed outcome.
    pub fn failed<E>(error: E) -> Self
    where
        E: Into<Error>,
    {
        Self::Failure(error.into())
    }

    /// Frames a raw server reply into an outcome.
    ///
    /// Lines are collected up to the `OK` terminator; an `ACK` line turns the
    /// reply into a failure. `list_OK` separators are dropped. Anything after
    /// the terminator is ignored. A reply without any terminator becomes a
    /// [`CommandOutcome::Failure`] of kind `DataLoss`.
    #[must_use]
    pub fn from_reply(reply: &str) -> Self {
        let mut lines = Vec::new();

        for line in reply.lines() {
            if line == OK {
                trace!("reply framed with {} lines", lines.len());
                return Self::Success(lines.into());
            }

            if line.starts_with(ack::PREFIX) {
                return Self::Failure(ack::to_error(line));
            }

            if line == LIST_OK {
                continue;
            }

            lines.push(line.to_owned());
        }

        Self::Failure(Error::data_loss(format!(
            "reply ended after {} lines without {OK} or ACK",
            lines.len()
        )))
    }

    /// The reply lines, if the command succeeded.
    #[must_use]
    pub fn lines(&self) -> Option<&Lines> {
        match self {
            Self::Success(lines) => Some(lines),
            Self::Failure(_) => None,
        }
    }

    /// The failure, if the command failed.
    #[must_use]
    pub fn failure(&self) -> Option<&Error> {
        match self {
            Self::Success(_) => None,
            Self::Failure(e) => Some(e),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Converts into a `Result` for `?` propagation.
    pub fn into_result(self) -> Result<Lines> {
        match self {
            Self::Success(lines) => Ok(lines),
            Self::Failure(e) => Err(e),
        }
    }
}

impl From<Result<Lines>> for CommandOutcome {
    fn from(result: Result<Lines>) -> Self {
        match result {
            Ok(lines) => Self::Success(lines),
            Err(e) => Self::Failure(e),
        }
    }
}
