//! The ref-command vocabulary transmitted to a remote's receive-pack.

use bstr::{BStr, BString, ByteSlice};
use gix_hash::ObjectId;

/// A single ref command.
///
/// Exactly one variant applies per command. The hash side a variant does not
/// carry encodes as the all-zero id, which the protocol reads as "ref does
/// not exist".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create `name` pointing at `new`.
    Create {
        /// Full ref path, e.g. `refs/heads/main`.
        name: BString,
        /// The object the new ref will point at.
        new: ObjectId,
    },
    /// Move `name` from `old` to `new`.
    Update {
        /// Full ref path.
        name: BString,
        /// The hash the remote currently holds.
        old: ObjectId,
        /// The hash to move the ref to.
        new: ObjectId,
    },
    /// Delete `name`, which pointed at `old`.
    Delete {
        /// Full ref path.
        name: BString,
        /// The hash the remote currently holds.
        old: ObjectId,
    },
}

impl Command {
    /// The full ref path this command targets.
    pub fn name(&self) -> &BStr {
        match self {
            Command::Create { name, .. } | Command::Update { name, .. } | Command::Delete { name, .. } => {
                name.as_bstr()
            }
        }
    }

    /// The pre-image hash; all-zero for creations.
    pub fn old_oid(&self) -> ObjectId {
        match self {
            Command::Create { .. } => ObjectId::null(gix_hash::Kind::Sha1),
            Command::Update { old, .. } | Command::Delete { old, .. } => *old,
        }
    }

    /// The post-image hash; all-zero for deletions.
    pub fn new_oid(&self) -> ObjectId {
        match self {
            Command::Delete { .. } => ObjectId::null(gix_hash::Kind::Sha1),
            Command::Create { new, .. } | Command::Update { new, .. } => *new,
        }
    }
}
