//! Client-side fetch-pack: ref discovery, want negotiation, and clone.
//!
//! The [`session`] module drives the remote's upload-pack through ref
//! discovery and want/depth negotiation, then hands over the demultiplexed
//! pack and progress channels. The [`clone`](clone()) orchestrator composes
//! a session with the repository collaborator: it delegates pack decoding,
//! forwards progress, and finally writes the refs it asked for.
//!
//! Transports are anything implementing `gix_sync_core::Connect`; the
//! packfile codec and ref storage stay behind the `gix_sync_core::store`
//! contracts.

#![deny(rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod clone;
mod error;
pub mod session;

pub use clone::clone;
pub use error::{Error, Result};

use bstr::{BStr, BString};
use gix_sync_core::RefMap;

/// How the want set is chosen once the remote's refs are known.
///
/// This replaces a dynamically-typed options field with an explicit tagged
/// union: an invalid selection cannot be constructed.
#[derive(Default)]
pub enum WantSelection {
    /// Want every advertised ref.
    #[default]
    AllRefs,
    /// Want exactly these ref names.
    Explicit(Vec<BString>),
    /// Derive the want list from the advertised refs.
    Select(Box<dyn FnMut(&RefMap) -> Vec<BString>>),
}

/// Options controlling a fetch-pack session.
#[derive(Default)]
pub struct Options {
    /// Which refs to ask for.
    pub wants: WantSelection,
    /// Ask the remote to truncate history at this depth (`deepen`).
    pub depth: Option<u32>,
    /// Observer invoked with the advertised refs before negotiation; it
    /// cannot alter control flow.
    pub on_refs: Option<Box<dyn FnMut(&RefMap)>>,
    /// Consumer of progress lines from the remote's side channel.
    pub on_progress: Option<Box<dyn FnMut(&BStr)>>,
}
