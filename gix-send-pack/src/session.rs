//! The receive-pack negotiation state machine, seen from the pushing side.

use bstr::{BString, ByteSlice};
use gix_sync_core::{
    capabilities::CapabilitySet, channel::Receiver, read_advertisement, ClientFrame, Command,
    Connect, RefMap, ServerFrame, ServiceKind, Socket,
};

use crate::Result;

/// A send-pack session over a connected transport.
///
/// The protocol runs strictly in order: ref discovery, the command list,
/// the pack stream, then the remote's response.
pub struct Session {
    socket: Socket,
    refs: RefMap,
    capabilities_sent: bool,
}

impl Session {
    /// Connect to the remote's receive-pack service and run ref discovery.
    pub async fn handshake(transport: &mut impl Connect) -> Result<Self> {
        let mut socket = transport.connect(ServiceKind::ReceivePack)?;
        let refs = read_advertisement(&mut socket.incoming).await?;
        tracing::debug!(refs = refs.len(), "ref discovery complete");
        Ok(Session {
            socket,
            refs,
            capabilities_sent: false,
        })
    }

    /// The refs advertised during the handshake.
    pub fn refs(&self) -> &RefMap {
        &self.refs
    }

    /// Transmit one ref command.
    ///
    /// The first command line announces, after a NUL byte, the subset of
    /// peer capabilities this client responds to; subsequent lines carry the
    /// bare command. Hash sides the command does not carry encode as the
    /// all-zero id.
    pub fn send_command(&mut self, command: &Command) {
        let mut line = BString::from(format!(
            "{} {} {}",
            command.old_oid(),
            command.new_oid(),
            command.name()
        ));
        if !self.capabilities_sent {
            self.capabilities_sent = true;
            line.push(0);
            line.extend_from_slice(&capability_response(&self.refs.capabilities));
        }
        line.push(b'\n');
        self.socket.outgoing.put(ClientFrame::Line(line));
    }

    /// Announce the pack stream that follows the command list.
    pub fn begin_pack(&mut self) {
        self.socket.outgoing.put(ClientFrame::Flush);
        self.socket.outgoing.put(ClientFrame::Data(b"PACK".to_vec()));
    }

    /// Forward encoded pack items until the encoder's stream ends.
    pub async fn stream_pack(&mut self, mut items: Receiver<Vec<u8>>) {
        while let Some(item) = items.take().await {
            self.socket.outgoing.put(ClientFrame::Data(item));
        }
    }

    /// Signal end of transmission, then drain the remote's response.
    ///
    /// Response lines are logged, not interpreted: acting on
    /// `report-status` results is a known gap of this layer.
    pub async fn finish(mut self) {
        self.socket.outgoing.close();
        while let Some(frame) = self.socket.incoming.take().await {
            match frame {
                ServerFrame::Line(line) => tracing::info!(%line, "receive-pack response"),
                ServerFrame::Flush => {}
                other => tracing::debug!(?other, "ignoring unexpected response frame"),
            }
        }
        tracing::debug!("push complete");
    }
}

/// The capability tokens echoed on the first command line: `report-status`
/// if offered, the strongest offered side-band flavor, and the peer's agent.
fn capability_response(peer: &CapabilitySet) -> BString {
    let mut tokens = BString::default();
    if peer.contains("report-status") {
        tokens.extend_from_slice(b" report-status");
    }
    if peer.contains("side-band-64k") {
        tokens.extend_from_slice(b" side-band-64k");
    } else if peer.contains("side-band") {
        tokens.extend_from_slice(b" side-band");
    }
    if let Some(agent) = peer.value("agent") {
        tokens.extend_from_slice(b" agent=");
        tokens.extend_from_slice(agent.as_bytes());
    }
    tokens
}
