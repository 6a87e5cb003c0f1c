/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! This library exposes methods for interacting with YAML
//! byte streams.
//!
//! It is currently still in development, and will likely
//! have multiple breaking changes to the exposed API before
//! stabilizing. Use at your own risk.
//!
//! The exposed APIs are grouped by module, and no high
//! level "load into a document tree" API exists for this
//! library -- it exposes a lazy, pull based stream of
//! [`Event`][event::types::Event]s and stops there.
//!
//! ## Pulling events from a byte stream
//!
//! The three pieces below are always wired together the
//! same way: a [`Read`][reader::Read] implementor (from
//! [`reader::from_utf8`], [`reader::from_read`] or
//! [`reader::try_from_bytes`]), a [`reader::Reader`] that
//! tokenizes it, wrapped in a [`reader::PeekReader`] for
//! one-token lookahead, and an [`event::Parser`] that turns
//! the token stream into events.
//!
//! ```rust,ignore
//! use yevent::{
//!     event::Parser,
//!     reader::{from_utf8, PeekReader, Reader, O_ZEROED},
//! };
//!
//! let input = from_utf8("a: b\n");
//! let reader = Reader::new(&input, O_ZEROED);
//! let mut tokens = PeekReader::new(reader);
//! let mut parser = Parser::new();
//!
//! for event in parser.into_iter(&mut tokens) {
//!     let event = event?;
//!     // ...
//! }
//! # Ok::<(), yevent::error::Error>(())
//! ```

#![allow(dead_code)]
#![allow(clippy::suspicious_else_formatting)]

pub mod error;
pub mod event;
pub mod reader;
pub mod tags;

mod queue;
mod scanner;
mod token;
