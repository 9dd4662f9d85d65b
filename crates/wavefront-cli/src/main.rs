//! Wavefront CLI client.
//!
//! # Usage
//!
//! ```bash
//! wavefront-search --socket /tmp/wavefront.sock search --keyword rust
//! wavefront-search --socket /tmp/wavefront.sock add --urls-file urls.txt
//! ```

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use bytes::Bytes;
use clap::{Parser, Subcommand};
use futures_util::{SinkExt, StreamExt};
use tokio::net::UnixStream;
use tokio_util::codec::{Framed, LengthDelimitedCodec};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use wavefront_bridge::Framer;
use wavefront_cli::error::{CliError, Result};
use wavefront_cli::{build_add, build_search};
use wavefront_proto::{FramingHeader, ProtocolError, ResponseType, SearchResponseHeader};

/// Correlation id the CLI stamps on its one outstanding command.
const REQUEST_ID: u16 = 1;

#[derive(Parser, Debug)]
#[command(name = "wavefront-search")]
#[command(about = "Command-line client for the Wavefront search overlay")]
struct Args {
    /// Unix socket the service is listening on
    #[arg(long, default_value = "/tmp/wavefront.sock")]
    socket: PathBuf,

    /// Largest payload to pack into one framed unit
    #[arg(long, default_value = "1400")]
    max_message_size: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    action: CliAction,
}

#[derive(Subcommand, Debug)]
enum CliAction {
    /// Search the overlay for a keyword
    Search {
        /// Keyword to search for
        #[arg(long)]
        keyword: String,
    },
    /// Announce every URL in a file (one per line) to the overlay
    Add {
        /// Path to a newline-separated list of URLs
        #[arg(long)]
        urls_file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "search failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let command = match &args.action {
        CliAction::Search { keyword } => build_search(keyword, REQUEST_ID),
        CliAction::Add { urls_file } => {
            let urls = read_urls(urls_file)?;
            build_add(&urls, REQUEST_ID)
        }
    };

    let stream = UnixStream::connect(&args.socket)
        .await
        .map_err(|source| CliError::Connect { path: args.socket.display().to_string(), source })?;
    let mut framed = Framed::new(stream, LengthDelimitedCodec::new());

    send_command(&mut framed, &command, args.max_message_size).await?;
    receive_responses(&mut framed).await
}

fn read_urls(path: &PathBuf) -> Result<Vec<String>> {
    let contents = fs::read_to_string(path)
        .map_err(|source| CliError::UrlFileRead { path: path.display().to_string(), source })?;
    Ok(contents.lines().map(str::trim).filter(|line| !line.is_empty()).map(str::to_string).collect())
}

async fn send_command(
    framed: &mut Framed<UnixStream, LengthDelimitedCodec>,
    command: &Bytes,
    max_message_size: usize,
) -> Result<()> {
    let max_payload_per_unit = max_message_size.saturating_sub(FramingHeader::SIZE).max(1);
    let fragments = wavefront_proto::fragment_payload(command, max_payload_per_unit)?;
    for fragment in fragments {
        let mut unit = Vec::with_capacity(FramingHeader::SIZE + fragment.payload.len());
        unit.extend_from_slice(&fragment.header.encode());
        unit.extend_from_slice(&fragment.payload);
        framed.send(Bytes::from(unit)).await?;
    }
    Ok(())
}

async fn receive_responses(framed: &mut Framed<UnixStream, LengthDelimitedCodec>) -> Result<()> {
    let mut reassembly: Framer<()> = Framer::new();
    loop {
        let Some(unit) = framed.next().await else { return Err(CliError::ConnectionClosed) };
        let unit = unit?;
        let header = FramingHeader::decode(&unit)?;
        let payload = Bytes::copy_from_slice(&unit[FramingHeader::SIZE..]);
        let Some(response_bytes) = reassembly.ingest((), header, payload) else { continue };

        let response_header = SearchResponseHeader::decode(&response_bytes)?;
        if response_header.size() != response_bytes.len() as u64 {
            return Err(ProtocolError::SizeMismatch {
                declared: response_header.size(),
                actual: response_bytes.len(),
            }
            .into());
        }
        let body = &response_bytes[SearchResponseHeader::SIZE..];
        match response_header.response_type()? {
            ResponseType::Done => {
                tracing::info!("done");
                return Ok(());
            }
            ResponseType::Result => {
                let urls = wavefront_proto::parse_all(body)?;
                for url in urls {
                    tracing::info!(url, "result");
                }
            }
        }
    }
}
