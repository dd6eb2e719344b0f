//! gix-sync-core: Shared client-side primitives for Git smart-transport
//! synchronization.
//!
//! This crate provides the minimal, reusable building blocks used by both
//! `gix-fetch-pack` and `gix-send-pack`: the cooperative duplex channel that
//! connects a protocol session to its transport, the frame vocabulary
//! exchanged over it, capability and ref-advertisement parsing, the
//! ref-command vocabulary sent during a push, a slim object model, and the
//! contracts behind which the repository collaborator lives.
//!
//! Everything here is single-threaded and cooperative: suspension points are
//! exactly the channel `take`s, and channel handles are deliberately not
//! `Send`.
//!
//! # Example
//!
//! ```
//! use futures_lite::future::block_on;
//! use gix_sync_core::channel::channel;
//!
//! let (tx, mut rx) = channel();
//! tx.put("0000000000000000000000000000000000000000 capabilities^{}");
//! tx.close();
//! assert_eq!(
//!     block_on(rx.take()),
//!     Some("0000000000000000000000000000000000000000 capabilities^{}")
//! );
//! assert_eq!(block_on(rx.take()), None);
//! ```
#![deny(missing_docs, rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod capabilities;
pub mod channel;
pub mod command;
mod error;
pub mod objects;
pub mod protocol;
pub mod refs;
pub mod store;

pub use capabilities::{Capability, CapabilitySet};
pub use command::Command;
pub use error::{Error, Kind, Result};
pub use protocol::{ClientFrame, Connect, ServerFrame, ServiceKind, SidebandChannels, Socket};
pub use refs::{read_advertisement, RefMap};
