//! The frame vocabulary exchanged with a transport, and the connection seam.
//!
//! Wire-level byte framing (pkt-line prefixes, sideband demultiplexing) is
//! the transport's concern; sessions see discrete frames only. The
//! conventions mirror the channel layer: a closed incoming stream means the
//! transport disconnected, an explicit [`ClientFrame::Flush`] /
//! [`ServerFrame::Flush`] bounds a well-defined sub-sequence.

use bstr::BString;
use gix_hash::ObjectId;

use crate::{
    channel::{Duplex, Receiver},
    Error,
};

/// The kind of remote service a synchronization session talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind {
    /// Upload-pack: the remote side of fetch/clone.
    UploadPack,
    /// Receive-pack: the remote side of push.
    ReceivePack,
}

impl ServiceKind {
    /// The service name announced to the remote when connecting.
    pub fn name(&self) -> &'static str {
        match self {
            ServiceKind::UploadPack => "git-upload-pack",
            ServiceKind::ReceivePack => "git-receive-pack",
        }
    }
}

/// A frame sent by a session to the transport.
///
/// Negotiation commands stay structured because their wire encoding belongs
/// to the transport; receive-pack command lines are pre-formatted text
/// exactly as the remote expects them (trailing newline included), and pack
/// payloads are raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientFrame {
    /// Ask the remote to include the history reachable from this object.
    Want(ObjectId),
    /// Truncate the requested history at this depth.
    Deepen(u32),
    /// End of negotiation; the remote may start sending the pack.
    Done,
    /// A formatted text line.
    Line(BString),
    /// Raw pack bytes.
    Data(Vec<u8>),
    /// Boundary of a well-defined sub-sequence (a flush).
    Flush,
}

/// A frame delivered by the transport to a session.
#[derive(Debug)]
pub enum ServerFrame {
    /// A text line, wire framing stripped.
    Line(BString),
    /// Boundary of a well-defined sub-sequence (a flush).
    Flush,
    /// The demultiplexed data channels, handed up once fetch negotiation is
    /// over.
    Channels(SidebandChannels),
}

/// The `{pack, progress}` channel pair a fetch session hands to its caller.
#[derive(Debug)]
pub struct SidebandChannels {
    /// The pack byte stream (sideband channel 1).
    pub pack: Receiver<Vec<u8>>,
    /// Human-readable progress lines (sideband channel 2).
    pub progress: Receiver<BString>,
}

/// The session-side endpoint of a connected transport.
pub type Socket = Duplex<ServerFrame, ClientFrame>;

/// Connects a session to a remote service.
///
/// Implemented for closures so that tests and embedders can hand out
/// pre-wired duplex pairs.
pub trait Connect {
    /// Open a bidirectional frame socket to the given service.
    fn connect(&mut self, service: ServiceKind) -> Result<Socket, Error>;
}

impl<F> Connect for F
where
    F: FnMut(ServiceKind) -> Result<Socket, Error>,
{
    fn connect(&mut self, service: ServiceKind) -> Result<Socket, Error> {
        (self)(service)
    }
}
