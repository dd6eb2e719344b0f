//! Shared doubles for integration tests: a scripted transport and an
//! in-memory repository collaborator.
#![allow(dead_code)]

use std::{cell::RefCell, collections::HashMap};

use async_trait::async_trait;
use bstr::{BStr, BString};
use gix_hash::ObjectId;
use gix_object::tree::EntryKind;
use gix_sync_core::{
    channel::{channel, duplex, Duplex, Receiver},
    objects::{Commit, Tree, TreeEntry},
    store::{ObjectDatabase, PackTransfer, RefDatabase},
    ClientFrame, Error, Result, ServerFrame, ServiceKind, Socket,
};

/// The far side of a scripted connection.
pub type Remote = Duplex<ClientFrame, ServerFrame>;

/// A transport handing out one pre-wired socket for the expected service.
pub fn scripted_transport(
    expected: ServiceKind,
) -> (impl FnMut(ServiceKind) -> Result<Socket>, Remote) {
    let (socket, remote) = duplex::<ServerFrame, ClientFrame>();
    let mut socket = Some(socket);
    let connect = move |service: ServiceKind| {
        assert_eq!(service, expected, "session asked for the wrong service");
        Ok(socket.take().expect("a single connection per transport"))
    };
    (connect, remote)
}

pub fn oid(hex40: &str) -> ObjectId {
    ObjectId::from_hex(hex40.as_bytes()).expect("valid hex")
}

/// Deterministic fixture ids: `o(0xab)` is `abab…ab`.
pub fn o(byte: u8) -> ObjectId {
    oid(&format!("{byte:02x}").repeat(20))
}

/// Feed a complete ref advertisement, flush included.
pub fn advertise(remote: &Remote, lines: &[&str]) {
    for line in lines {
        remote.outgoing.put(ServerFrame::Line(BString::from(*line)));
    }
    remote.outgoing.put(ServerFrame::Flush);
}

/// Collect everything the session emitted, until it closed its half.
pub async fn collect_frames(remote: &mut Remote) -> Vec<ClientFrame> {
    let mut frames = Vec::new();
    while let Some(frame) = remote.incoming.take().await {
        frames.push(frame);
    }
    frames
}

/// In-memory commits, trees, and refs, plus a pack encoder that emits one
/// item per object and records what it was asked to encode.
#[derive(Default)]
pub struct MemoryRepo {
    pub commits: HashMap<ObjectId, Commit>,
    pub trees: HashMap<ObjectId, Tree>,
    pub refs: HashMap<BString, ObjectId>,
    pub packed: RefCell<Vec<Vec<ObjectId>>>,
}

impl MemoryRepo {
    pub fn insert_commit(&mut self, id: ObjectId, tree: ObjectId, parents: &[ObjectId]) {
        self.commits.insert(
            id,
            Commit {
                tree,
                parents: parents.iter().copied().collect(),
            },
        );
    }

    pub fn insert_tree(&mut self, id: ObjectId, entries: &[(EntryKind, &str, ObjectId)]) {
        self.trees.insert(
            id,
            Tree {
                entries: entries
                    .iter()
                    .map(|(kind, name, target)| TreeEntry {
                        kind: *kind,
                        name: (*name).into(),
                        oid: *target,
                    })
                    .collect(),
            },
        );
    }

    pub fn insert_ref(&mut self, name: &str, target: ObjectId) {
        self.refs.insert(name.into(), target);
    }
}

#[async_trait(?Send)]
impl ObjectDatabase for MemoryRepo {
    async fn load_commit(&self, oid: &ObjectId) -> Result<Commit> {
        if let Some(commit) = self.commits.get(oid) {
            return Ok(commit.clone());
        }
        if self.trees.contains_key(oid) {
            return Err(Error::TypeMismatch {
                oid: *oid,
                expected: gix_object::Kind::Commit,
                actual: gix_object::Kind::Tree,
            });
        }
        Err(Error::ObjectNotFound { oid: *oid })
    }

    async fn load_tree(&self, oid: &ObjectId) -> Result<Tree> {
        if let Some(tree) = self.trees.get(oid) {
            return Ok(tree.clone());
        }
        if self.commits.contains_key(oid) {
            return Err(Error::TypeMismatch {
                oid: *oid,
                expected: gix_object::Kind::Tree,
                actual: gix_object::Kind::Commit,
            });
        }
        Err(Error::ObjectNotFound { oid: *oid })
    }
}

#[async_trait(?Send)]
impl RefDatabase for MemoryRepo {
    async fn read_ref(&self, name: &BStr) -> Result<ObjectId> {
        self.refs
            .get(name)
            .copied()
            .ok_or_else(|| Error::RefNotFound { name: name.into() })
    }

    async fn update_ref(&self, _name: &BStr, _target: ObjectId) -> Result<()> {
        Ok(())
    }
}

#[async_trait(?Send)]
impl PackTransfer for MemoryRepo {
    async fn unpack(&self, mut pack: Receiver<Vec<u8>>) -> Result<Vec<ObjectId>> {
        while pack.take().await.is_some() {}
        Ok(Vec::new())
    }

    async fn pack(&self, objects: Vec<ObjectId>) -> Result<Receiver<Vec<u8>>> {
        self.packed.borrow_mut().push(objects.clone());
        let (items, stream) = channel();
        for object in &objects {
            items.put(object.to_string().into_bytes());
        }
        items.close();
        Ok(stream)
    }
}
