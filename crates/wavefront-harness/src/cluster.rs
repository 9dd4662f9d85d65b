//! Wires several [`ServerDriver`]s together over [`InMemoryPeerTransport`],
//! so a test can drive a whole overlay from one thread without sockets.

use std::collections::VecDeque;

use wavefront_core::PeerId;
use wavefront_server::driver::{ServerAction, ServerDriver, ServerEvent};
use wavefront_server::ServerConfig;

use crate::mocks::{InMemoryPeerTransport, RecordingDht, StubCrawler};
use crate::sim_env::SimEnv;

/// One node's driver, fully wired for in-process simulation.
pub type SimDriver = ServerDriver<SimEnv, InMemoryPeerTransport, RecordingDht, StubCrawler>;

/// A fixed-size overlay of nodes, each identified by its index (and, by
/// construction, the identical [`PeerId`]).
pub struct Cluster {
    nodes: Vec<SimDriver>,
}

impl Cluster {
    /// Build a fully connected cluster of `node_count` nodes, seeded for
    /// reproducibility.
    #[must_use]
    pub fn new(node_count: usize, seed: u64, max_message_size: usize) -> Self {
        let nodes = (0..node_count)
            .map(|index| {
                let peers: Vec<PeerId> =
                    (0..node_count).filter(|&other| other != index).map(|other| PeerId(other as u64)).collect();
                let transport = InMemoryPeerTransport::new(peers, max_message_size);
                ServerDriver::new(
                    SimEnv::with_seed(seed.wrapping_add(index as u64)),
                    transport,
                    RecordingDht::default(),
                    StubCrawler::default(),
                    ServerConfig::default(),
                )
            })
            .collect();
        Self { nodes }
    }

    /// The node at `index`, for direct inspection (`storage()`, and so on).
    pub fn node(&mut self, index: usize) -> &mut SimDriver {
        &mut self.nodes[index]
    }

    /// Feed `event` to `origin` and keep relaying any `SendToPeer` actions
    /// it produces to their target nodes until the cluster is quiescent.
    /// Returns every `SendToClient` action produced along the way, tagged
    /// with the node that produced it.
    ///
    /// # Errors
    ///
    /// Propagates the first [`wavefront_server::ServerError`] any node's
    /// `process_event` returns.
    pub fn dispatch(
        &mut self,
        origin: usize,
        event: ServerEvent,
    ) -> Result<Vec<(usize, ServerAction)>, wavefront_server::ServerError> {
        let mut queue = VecDeque::new();
        queue.push_back((origin, event));
        let mut client_actions = Vec::new();

        while let Some((node_index, event)) = queue.pop_front() {
            let actions = self.nodes[node_index].process_event(event)?;
            for action in actions {
                match action {
                    ServerAction::SendToClient { .. } => client_actions.push((node_index, action)),
                    ServerAction::SendToPeer { peer, unit } => {
                        queue.push_back((
                            peer.0 as usize,
                            ServerEvent::PeerUnitReceived { peer: PeerId(node_index as u64), unit },
                        ));
                    }
                }
            }
        }
        Ok(client_actions)
    }
}
