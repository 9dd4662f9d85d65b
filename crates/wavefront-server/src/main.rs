//! Wavefront server binary.
//!
//! # Usage
//!
//! ```bash
//! wavefront-server --bind 0.0.0.0:2086 --client-socket /run/wavefront.sock \
//!     --peer 203.0.113.4:2086 --peer 203.0.113.9:2086
//! ```

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use wavefront_core::PeerId;
use wavefront_server::client::{accept_loop, ClientRegistry};
use wavefront_server::{
    LoggingDht, NullCrawler, ServerAction, ServerConfig, ServerDriver, ServerEvent, SystemEnv, UdpPeerTransport,
};

/// Wavefront search overlay service
#[derive(Parser, Debug)]
#[command(name = "wavefront-server")]
#[command(about = "Keyword search overlay service")]
#[command(version)]
struct Args {
    /// UDP address to bind the peer transport to
    #[arg(long, default_value = "0.0.0.0:2086")]
    bind: SocketAddr,

    /// Unix socket path clients connect to
    #[arg(long, default_value = "/tmp/wavefront.sock")]
    client_socket: PathBuf,

    /// Address of a peer to flood requests to (repeatable)
    #[arg(long = "peer")]
    peers: Vec<SocketAddr>,

    /// Largest datagram the UDP transport will send or receive
    #[arg(long, default_value = "1400")]
    max_message_size: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    tracing::info!("wavefront server starting");
    tracing::info!(bind = %args.bind, client_socket = %args.client_socket.display(), "binding transports");

    let peers: HashMap<PeerId, SocketAddr> =
        args.peers.iter().enumerate().map(|(index, &addr)| (PeerId(index as u64), addr)).collect();
    let transport = Arc::new(UdpPeerTransport::bind(args.bind, peers, args.max_message_size).await?);

    let mut driver = ServerDriver::new(
        SystemEnv::new(),
        Arc::clone(&transport),
        LoggingDht,
        NullCrawler,
        ServerConfig::default(),
    );

    let (events_tx, mut events_rx) = mpsc::unbounded_channel::<ServerEvent>();
    let registry = ClientRegistry::default();

    {
        let registry = registry.clone();
        let events_tx = events_tx.clone();
        let socket_path = args.client_socket.clone();
        tokio::spawn(async move {
            if let Err(error) = accept_loop(&socket_path, registry, events_tx).await {
                tracing::error!(%error, "client accept loop exited");
            }
        });
    }

    {
        let transport = Arc::clone(&transport);
        let events_tx = events_tx.clone();
        tokio::spawn(async move {
            loop {
                match transport.recv().await {
                    Ok(Some((peer, unit))) => {
                        let _ = events_tx.send(ServerEvent::PeerUnitReceived { peer, unit });
                    }
                    Ok(None) => {}
                    Err(error) => {
                        tracing::warn!(%error, "peer receive failed");
                    }
                }
            }
        });
    }

    while let Some(event) = events_rx.recv().await {
        match driver.process_event(event) {
            Ok(actions) => {
                for action in actions {
                    match action {
                        ServerAction::SendToClient { client, unit } => {
                            registry.send(client, unit).await;
                        }
                        ServerAction::SendToPeer { peer, unit } => {
                            if let Err(error) = transport.send(peer, &unit).await {
                                tracing::warn!(%error, %peer, "peer send failed");
                            }
                        }
                    }
                }
            }
            Err(error) => tracing::warn!(%error, "event processing failed"),
        }
    }

    Ok(())
}
