//! Lazy, bidirectional record views over Music Player Daemon replies.
//!
//! See [`protocol`] for the reply model and [`protocol::response`] for the
//! record views.
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

#[macro_use]
extern crate log;

pub mod config;
pub mod error;
pub mod protocol;
pub mod util;
