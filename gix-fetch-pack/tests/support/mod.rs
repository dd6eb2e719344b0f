//! Shared doubles for integration tests: a scripted transport and an
//! in-memory repository collaborator.
#![allow(dead_code)]

use std::cell::RefCell;

use async_trait::async_trait;
use bstr::{BStr, BString};
use gix_hash::ObjectId;
use gix_sync_core::{
    channel::{channel, duplex, Duplex, Receiver},
    store::{PackTransfer, RefDatabase},
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

/// In-memory ref storage plus a pack decoder that records what it consumed.
#[derive(Default)]
pub struct MemoryRepo {
    pub updated: RefCell<Vec<(BString, ObjectId)>>,
    pub unpacked: RefCell<Vec<Vec<u8>>>,
}

#[async_trait(?Send)]
impl RefDatabase for MemoryRepo {
    async fn read_ref(&self, name: &BStr) -> Result<ObjectId> {
        Err(Error::RefNotFound { name: name.into() })
    }

    async fn update_ref(&self, name: &BStr, target: ObjectId) -> Result<()> {
        self.updated.borrow_mut().push((name.into(), target));
        Ok(())
    }
}

#[async_trait(?Send)]
impl PackTransfer for MemoryRepo {
    async fn unpack(&self, mut pack: Receiver<Vec<u8>>) -> Result<Vec<ObjectId>> {
        while let Some(chunk) = pack.take().await {
            self.unpacked.borrow_mut().push(chunk);
        }
        Ok(Vec::new())
    }

    async fn pack(&self, _objects: Vec<ObjectId>) -> Result<Receiver<Vec<u8>>> {
        let (items, stream) = channel();
        items.close();
        Ok(stream)
    }
}
