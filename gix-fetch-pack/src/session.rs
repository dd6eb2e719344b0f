//! The fetch-pack negotiation state machine.

use bstr::{BString, ByteSlice};
use gix_sync_core::{
    read_advertisement, ClientFrame, Connect, RefMap, ServerFrame, ServiceKind, SidebandChannels,
    Socket,
};

use crate::{Error, Result, WantSelection};

/// A fetch-pack session over a connected transport.
///
/// The protocol runs strictly in order: ref discovery, want negotiation,
/// then the handoff of the demultiplexed data channels. Each method
/// consumes the phase it implements.
pub struct Session {
    socket: Socket,
}

impl Session {
    /// Connect to the remote's upload-pack service.
    pub fn connect(transport: &mut impl Connect) -> Result<Self> {
        let socket = transport.connect(ServiceKind::UploadPack)?;
        Ok(Session { socket })
    }

    /// Run ref discovery to completion.
    pub async fn discover(&mut self) -> Result<RefMap> {
        let refs = read_advertisement(&mut self.socket.incoming).await?;
        tracing::debug!(
            refs = refs.len(),
            capabilities = refs.capabilities.len(),
            "ref discovery complete"
        );
        Ok(refs)
    }

    /// Emit the want set and terminate negotiation.
    ///
    /// Returns the requested names in request order. Names carrying the
    /// peeled-tag suffix `^{}` stay on that list but are never emitted as
    /// wants; an explicit name the remote did not advertise fails with a
    /// not-found error before anything is sent for it.
    pub fn negotiate(
        &mut self,
        refs: &RefMap,
        wants: &mut WantSelection,
        depth: Option<u32>,
    ) -> Result<Vec<BString>> {
        let requested: Vec<BString> = match wants {
            WantSelection::AllRefs => refs.names().map(BString::from).collect(),
            WantSelection::Explicit(names) => names.clone(),
            WantSelection::Select(select) => select(refs),
        };
        for name in &requested {
            if name.ends_with(b"^{}") {
                continue;
            }
            let target = refs.get(name.as_bstr()).ok_or_else(|| {
                gix_sync_core::Error::RefNotFound { name: name.clone() }
            })?;
            self.socket.outgoing.put(ClientFrame::Want(target));
        }
        if let Some(depth) = depth {
            self.socket.outgoing.put(ClientFrame::Deepen(depth));
        }
        self.socket.outgoing.put(ClientFrame::Flush);
        self.socket.outgoing.put(ClientFrame::Done);
        self.socket.outgoing.close();
        Ok(requested)
    }

    /// Await the pack and progress channels the lower layer hands up once
    /// negotiation is done.
    pub async fn into_channels(mut self) -> Result<SidebandChannels> {
        match self.socket.incoming.take().await {
            Some(ServerFrame::Channels(channels)) => Ok(channels),
            None => Err(gix_sync_core::Error::Disconnected.into()),
            Some(other) => Err(Error::Handshake {
                got: format!("{other:?}"),
            }),
        }
    }
}
