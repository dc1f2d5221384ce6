//! TIPC node configuration via Generic Netlink.
//!
//! The kernel exposes TIPC configuration through the `TIPCv2` Generic
//! Netlink family. Every request and reply carries one outer attribute
//! group that selects the object (`TipcAttr::Node` for peers,
//! `TipcAttr::Net` for the local node), which in turn nests the fields.
//!
//! ```text
//! NODE_GET (dump)  ->  NODE { ADDR: u32, UP: flag }          one per peer
//! NET_GET  (dump)  ->  NET  { ID: u32, ADDR: u32,
//!                             NODEID: u64, NODEID_W1: u64 }
//! NET_SET          <-  NET  { ADDR | NODEID + NODEID_W1 | ID }
//! ```
//!
//! Requests are built by [`Request`], replies are decoded by
//! [`decode_peer`], [`decode_node_identity`] and [`decode_network_id`].
//! Exchanges go through the [`Transport`] trait, implemented for the kernel
//! by [`TipcConnection`]. Lookups that TIPC only answers on an AF_TIPC
//! socket go through [`LocalNode`], implemented by [`TipcSocket`].
//!
//! # Example
//!
//! ```rust,no_run
//! use tipclink::netlink::genl::tipc::{
//!     NetworkId, Request, TipcConnection, Transport, decode_peer,
//! };
//!
//! # async fn example() -> tipclink::Result<()> {
//! let conn = TipcConnection::new().await?;
//!
//! for payload in conn.dumpit(&Request::get_nodes()).await? {
//!     let peer = decode_peer(&payload)?;
//!     println!("{} {}", peer.address, if peer.up { "up" } else { "down" });
//! }
//!
//! conn.doit(&Request::set_netid(NetworkId::new(4711))).await?;
//! # Ok(())
//! # }
//! ```

mod connection;
mod request;
mod response;
mod sock;
mod types;

pub use connection::TipcConnection;
pub use request::Request;
pub use response::{decode_network_id, decode_node_identity, decode_peer};
pub use sock::{LocalNode, TipcSocket};
pub use types::{NODE_ID_LEN, NetworkId, NodeAddress, NodeIdentity, PeerRecord};

use crate::netlink::attr::AttrKey;
use crate::netlink::error::Result;

/// TIPC Generic Netlink family name.
pub const TIPC_GENL_NAME: &str = "TIPCv2";

/// TIPC Generic Netlink version.
pub const TIPC_GENL_VERSION: u8 = 1;

/// TIPC GENL commands used for node configuration.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TipcCmd {
    NodeGet = 13,
    NetGet = 14,
    NetSet = 15,
}

/// Top-level TIPC attributes (object selectors).
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TipcAttr {
    Node = 6,
    Net = 7,
}

impl AttrKey for TipcAttr {
    const GROUP: &'static str = "tipc";
    const MAX: u16 = 10;

    fn id(self) -> u16 {
        self as u16
    }

    fn name(self) -> &'static str {
        match self {
            TipcAttr::Node => "node",
            TipcAttr::Net => "net",
        }
    }
}

/// Attributes nested in [`TipcAttr::Node`].
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TipcNodeAttr {
    /// Peer address (u32).
    Addr = 1,
    /// Present when the peer is reachable.
    Up = 2,
}

impl AttrKey for TipcNodeAttr {
    const GROUP: &'static str = "node";
    const MAX: u16 = 2;

    fn id(self) -> u16 {
        self as u16
    }

    fn name(self) -> &'static str {
        match self {
            TipcNodeAttr::Addr => "addr",
            TipcNodeAttr::Up => "up",
        }
    }
}

/// Attributes nested in [`TipcAttr::Net`].
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TipcNetAttr {
    /// Network (cluster) id (u32).
    Id = 1,
    /// Local node address (u32).
    Addr = 2,
    /// Node identity, word 0 (u64).
    NodeId = 3,
    /// Node identity, word 1 (u64).
    NodeIdW1 = 4,
}

impl AttrKey for TipcNetAttr {
    const GROUP: &'static str = "net";
    const MAX: u16 = 4;

    fn id(self) -> u16 {
        self as u16
    }

    fn name(self) -> &'static str {
        match self {
            TipcNetAttr::Id => "id",
            TipcNetAttr::Addr => "addr",
            TipcNetAttr::NodeId => "nodeid",
            TipcNetAttr::NodeIdW1 => "nodeid_w1",
        }
    }
}

/// Request/response exchange with the TIPC family.
///
/// [`TipcConnection`] talks to the kernel; tests substitute an in-memory
/// implementation.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Send a request that is answered by an acknowledgement only.
    async fn doit(&self, request: &Request) -> Result<()>;

    /// Send a dump request and return every reply payload (GENL header
    /// included) in arrival order.
    async fn dumpit(&self, request: &Request) -> Result<Vec<Vec<u8>>>;
}
