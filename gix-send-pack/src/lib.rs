//! Client-side send-pack: ref discovery, update commands, and pack upload.
//!
//! The [`session`] module drives the remote's receive-pack: it reads the ref
//! advertisement, transmits ref commands (announcing the negotiated
//! capability subset on the first line), and streams the encoded pack. The
//! [`diff`] module computes the minimal object set the remote is missing,
//! and [`push`](push()) composes the two with the repository collaborator.
//!
//! Only the update command is driven end-to-end by `push`; creations and
//! deletions are part of the command vocabulary
//! (`gix_sync_core::Command`) and of the session surface, as the extension
//! seam for richer callers.

#![deny(rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod diff;
mod error;
pub mod push;
pub mod session;

pub use diff::objects_to_send;
pub use error::{Error, Result};
pub use push::{push, Options};
