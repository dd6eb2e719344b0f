//! Contracts for the repository collaborator.
//!
//! The content-addressed object store, ref storage, and the packfile codec
//! are external to this system; sessions consume them exclusively through
//! these traits. Implementations take their own configuration at
//! construction rather than receiving an options bag per call.
//!
//! All operations are async with `?Send` futures, matching the
//! single-threaded cooperative model of the channel layer.

use async_trait::async_trait;
use bstr::BStr;
use gix_hash::ObjectId;

use crate::{
    channel::Receiver,
    objects::{Commit, Tree},
    Result,
};

/// Typed object reads from the content-addressed store.
#[async_trait(?Send)]
pub trait ObjectDatabase {
    /// Load the commit at `oid`.
    ///
    /// Fails with [`Error::ObjectNotFound`](crate::Error::ObjectNotFound) if
    /// absent, or [`Error::TypeMismatch`](crate::Error::TypeMismatch) if the
    /// stored object is not a commit.
    async fn load_commit(&self, oid: &ObjectId) -> Result<Commit>;

    /// Load the tree at `oid`, with the same failure contract.
    async fn load_tree(&self, oid: &ObjectId) -> Result<Tree>;
}

/// Reference reads and writes.
#[async_trait(?Send)]
pub trait RefDatabase {
    /// Resolve a ref to its target hash.
    ///
    /// Fails with [`Error::RefNotFound`](crate::Error::RefNotFound) if the
    /// ref does not exist.
    async fn read_ref(&self, name: &BStr) -> Result<ObjectId>;

    /// Persist a ref, creating or moving it.
    async fn update_ref(&self, name: &BStr, target: ObjectId) -> Result<()>;
}

/// Packfile encode/decode at the object-store boundary.
#[async_trait(?Send)]
pub trait PackTransfer {
    /// Decode a pack byte stream into the store, resolving to the hashes of
    /// the objects received.
    async fn unpack(&self, pack: Receiver<Vec<u8>>) -> Result<Vec<ObjectId>>;

    /// Encode the given objects into a pack byte stream, delivered as a
    /// lazy, finite, non-restartable item sequence.
    async fn pack(&self, objects: Vec<ObjectId>) -> Result<Receiver<Vec<u8>>>;
}
