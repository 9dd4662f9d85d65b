//! A concrete UDP implementation of [`PeerTransport`] (§6).
//!
//! Deliberately minimal: one datagram per flood unit, a static peer list
//! resolved at startup. The overlay's peer-discovery mechanism is out of
//! scope (§1 Non-goals); this transport is handed its peers on construction.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use tokio::net::UdpSocket;
use tracing::trace;
use wavefront_core::PeerId;
use wavefront_flood::PeerTransport;

/// A UDP socket plus a static, bidirectional peer-id/address mapping.
pub struct UdpPeerTransport {
    socket: UdpSocket,
    addr_by_peer: HashMap<PeerId, SocketAddr>,
    peer_by_addr: HashMap<SocketAddr, PeerId>,
    max_message_size: usize,
}

impl UdpPeerTransport {
    /// Bind a UDP socket at `bind_addr` and register the given peers.
    pub async fn bind(
        bind_addr: SocketAddr,
        peers: HashMap<PeerId, SocketAddr>,
        max_message_size: usize,
    ) -> std::io::Result<Self> {
        let socket = UdpSocket::bind(bind_addr).await?;
        let peer_by_addr = peers.iter().map(|(&id, &addr)| (addr, id)).collect();
        Ok(Self { socket, addr_by_peer: peers, peer_by_addr, max_message_size })
    }

    /// Send a flood unit to `peer`. Silently drops if the peer is unknown
    /// (no routing table entry to fail against at this layer).
    pub async fn send(&self, peer: PeerId, unit: &[u8]) -> std::io::Result<()> {
        let Some(addr) = self.addr_by_peer.get(&peer) else {
            trace!(%peer, "send to unknown peer dropped");
            return Ok(());
        };
        self.socket.send_to(unit, addr).await?;
        Ok(())
    }

    /// Receive the next datagram, resolving its sender to a known peer.
    /// Datagrams from unrecognized addresses are dropped.
    pub async fn recv(&self) -> std::io::Result<Option<(PeerId, Bytes)>> {
        let mut buffer = vec![0u8; self.max_message_size];
        let (len, addr) = self.socket.recv_from(&mut buffer).await?;
        buffer.truncate(len);
        Ok(self.peer_by_addr.get(&addr).map(|&peer| (peer, Bytes::from(buffer))))
    }
}

impl PeerTransport for UdpPeerTransport {
    fn connected_peers(&self) -> Vec<PeerId> {
        self.addr_by_peer.keys().copied().collect()
    }

    fn max_message_size(&self) -> usize {
        self.max_message_size
    }
}

// The driver holds a `T: PeerTransport` purely to read connected-peer
// facts; actual sends and receives happen through a shared handle the
// runtime keeps alongside it, since those are async and the driver's own
// methods are not.
impl PeerTransport for Arc<UdpPeerTransport> {
    fn connected_peers(&self) -> Vec<PeerId> {
        (**self).connected_peers()
    }

    fn max_message_size(&self) -> usize {
        (**self).max_message_size()
    }
}
