//! The slim object model exchanged with the repository collaborator.
//!
//! Only the fields the protocol and the differ need are modeled: a commit is
//! its graph structure, a tree is its ordered entries. Everything else about
//! an object stays behind the [`store`](crate::store) contracts.

use bstr::{BStr, BString, ByteSlice};
use gix_hash::ObjectId;
use gix_object::tree::EntryKind;
use smallvec::SmallVec;

/// A commit, reduced to its graph structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// The root tree of this commit's snapshot.
    pub tree: ObjectId,
    /// Parent commits, in commit order.
    pub parents: SmallVec<[ObjectId; 1]>,
}

/// A tree: an ordered list of named entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    /// Entries in storage order.
    pub entries: Vec<TreeEntry>,
}

impl Tree {
    /// Find the entry with the given name, if present.
    pub fn entry(&self, name: &BStr) -> Option<&TreeEntry> {
        self.entries.iter().find(|entry| entry.name.as_bstr() == name)
    }
}

/// One entry of a [`Tree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    /// The entry mode, distinguishing blobs from subtrees (and the other
    /// git modes, which the differ does not descend into).
    pub kind: EntryKind,
    /// The entry's name within its tree.
    pub name: BString,
    /// Hash of the referenced object.
    pub oid: ObjectId,
}

impl TreeEntry {
    /// `true` for modes whose object payload is a blob.
    pub fn is_blob(&self) -> bool {
        matches!(
            self.kind,
            EntryKind::Blob | EntryKind::BlobExecutable | EntryKind::Link
        )
    }

    /// `true` for subtree entries.
    pub fn is_tree(&self) -> bool {
        matches!(self.kind, EntryKind::Tree)
    }
}
