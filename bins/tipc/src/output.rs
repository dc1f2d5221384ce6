//! Text and JSON rendering of node query results.

use std::io::{self, Write};

use serde::Serialize;
use tipclink::netlink::genl::tipc::{NetworkId, NodeAddress, NodeIdentity, PeerRecord};

/// Output format for query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Output options.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    /// Pretty-print JSON.
    pub pretty: bool,
}

const PEER_HEADER: &str = "Node Identity                    Hash     State";
const IDENTITY_HEADER: &str = "Node Identity                    Hash";

#[derive(Serialize)]
struct PeerJson {
    identity: String,
    address: String,
    up: bool,
}

#[derive(Serialize)]
struct IdentityJson {
    identity: String,
    address: String,
}

/// Writes results in the selected format.
pub struct Printer<W> {
    out: W,
    format: OutputFormat,
    opts: OutputOptions,
}

impl<W: Write> Printer<W> {
    pub fn new(out: W, format: OutputFormat, opts: OutputOptions) -> Self {
        Self { out, format, opts }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Flush buffered output and hand back the writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }

    fn json<T: Serialize + ?Sized>(&mut self, value: &T) -> io::Result<()> {
        if self.opts.pretty {
            serde_json::to_writer_pretty(&mut self.out, value)?;
        } else {
            serde_json::to_writer(&mut self.out, value)?;
        }
        writeln!(self.out)
    }

    /// Column header of the peer table (text only).
    pub fn peer_header(&mut self) -> io::Result<()> {
        writeln!(self.out, "{}", PEER_HEADER)
    }

    /// One peer table row (text only). An unknown identity prints empty.
    pub fn peer_row(
        &mut self,
        identity: Option<&NodeIdentity>,
        peer: &PeerRecord,
    ) -> io::Result<()> {
        let identity = identity.map(ToString::to_string).unwrap_or_default();
        writeln!(
            self.out,
            "{:<32} {} {}",
            identity,
            peer.address,
            if peer.up { "up" } else { "down" }
        )
    }

    /// The whole peer list as one JSON array.
    pub fn peers_json(&mut self, peers: &[(Option<NodeIdentity>, PeerRecord)]) -> io::Result<()> {
        let rows: Vec<PeerJson> = peers
            .iter()
            .map(|(identity, peer)| PeerJson {
                identity: identity.map(|id| id.to_string()).unwrap_or_default(),
                address: peer.address.to_string(),
                up: peer.up,
            })
            .collect();
        self.json(&rows)
    }

    /// The local identity followed by its hash (the local address).
    pub fn identity(&mut self, identity: &NodeIdentity, address: NodeAddress) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => {
                writeln!(self.out, "{}", IDENTITY_HEADER)?;
                writeln!(self.out, "{:<33}{}", identity, address)
            }
            OutputFormat::Json => self.json(&IdentityJson {
                identity: identity.to_string(),
                address: address.to_string(),
            }),
        }
    }

    pub fn netid(&mut self, netid: NetworkId) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => writeln!(self.out, "{}", netid),
            OutputFormat::Json => self.json(&serde_json::json!({ "netid": netid.raw() })),
        }
    }

    pub fn address(&mut self, address: NodeAddress) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => writeln!(self.out, "{}", address),
            OutputFormat::Json => self.json(&serde_json::json!({ "address": address.to_string() })),
        }
    }
}
