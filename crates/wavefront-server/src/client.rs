//! The client-facing transport: one Unix-domain-socket connection per
//! client, each unit length-delimited on the wire since a stream socket has
//! no message boundaries of its own (unlike the UDP peer transport, where
//! the datagram itself is the boundary).
//!
//! Every accepted connection is handed a fresh [`ClientId`] and forwards
//! [`ServerEvent`]s into the shared event channel; the driver answers by
//! looking up the connection's sender in the [`ClientRegistry`].

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use futures_util::{SinkExt, StreamExt};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::{mpsc, Mutex};
use tokio_util::codec::{Framed, LengthDelimitedCodec};
use tracing::{debug, warn};

use crate::driver::{ClientId, ServerEvent};

/// Tracks the outbound half of every live client connection.
#[derive(Clone, Default)]
pub struct ClientRegistry {
    senders: Arc<Mutex<HashMap<ClientId, mpsc::UnboundedSender<Bytes>>>>,
}

impl ClientRegistry {
    /// Send a framed unit to `client`. Silently drops if the connection has
    /// already closed (the driver's `ClientDisconnected` handling races the
    /// socket's own close detection).
    pub async fn send(&self, client: ClientId, unit: Bytes) {
        let senders = self.senders.lock().await;
        if let Some(sender) = senders.get(&client) {
            if sender.send(unit).is_err() {
                warn!(%client, "client outbound channel closed, dropping unit");
            }
        }
    }

    async fn register(&self, client: ClientId, sender: mpsc::UnboundedSender<Bytes>) {
        self.senders.lock().await.insert(client, sender);
    }

    async fn unregister(&self, client: ClientId) {
        self.senders.lock().await.remove(&client);
    }
}

/// Accept connections on `socket_path` forever, forwarding events into
/// `events` and registering each connection's sender in `registry`.
pub async fn accept_loop(
    socket_path: &Path,
    registry: ClientRegistry,
    events: mpsc::UnboundedSender<ServerEvent>,
) -> std::io::Result<()> {
    let _ = std::fs::remove_file(socket_path);
    let listener = UnixListener::bind(socket_path)?;
    let next_id = AtomicU64::new(1);

    loop {
        let (stream, _) = listener.accept().await?;
        let client = ClientId(next_id.fetch_add(1, Ordering::Relaxed));
        let registry = registry.clone();
        let events = events.clone();
        tokio::spawn(async move {
            handle_connection(client, stream, registry, events).await;
        });
    }
}

async fn handle_connection(
    client: ClientId,
    stream: UnixStream,
    registry: ClientRegistry,
    events: mpsc::UnboundedSender<ServerEvent>,
) {
    let mut framed = Framed::new(stream, LengthDelimitedCodec::new());
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Bytes>();
    registry.register(client, outbound_tx).await;
    let _ = events.send(ServerEvent::ClientConnected { client });

    loop {
        tokio::select! {
            inbound = framed.next() => {
                match inbound {
                    Some(Ok(unit)) => {
                        debug!(%client, len = unit.len(), "client unit received");
                        let _ = events.send(ServerEvent::ClientUnitReceived { client, unit: unit.freeze() });
                    }
                    Some(Err(error)) => {
                        warn!(%client, %error, "client connection error");
                        break;
                    }
                    None => break,
                }
            }
            outbound = outbound_rx.recv() => {
                match outbound {
                    Some(unit) => {
                        if let Err(error) = framed.send(unit).await {
                            warn!(%client, %error, "failed to send to client");
                            break;
                        }
                    }
                    None => break,
                }
            }
        }
    }

    registry.unregister(client).await;
    let _ = events.send(ServerEvent::ClientDisconnected { client });
}
