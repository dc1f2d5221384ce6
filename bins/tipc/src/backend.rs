//! Kernel backend used by the command handlers.

use tipclink::Result;
use tipclink::netlink::genl::tipc::{
    LocalNode, NodeAddress, NodeIdentity, Request, TipcConnection, TipcSocket, Transport,
};
use tokio::sync::OnceCell;

/// Talks to the running kernel.
///
/// The Generic Netlink socket is opened and the TIPC family resolved on the
/// first request only.
#[derive(Default)]
pub struct Kernel {
    conn: OnceCell<TipcConnection>,
    sock: TipcSocket,
}

impl Kernel {
    pub fn new() -> Self {
        Self::default()
    }

    async fn connection(&self) -> Result<&TipcConnection> {
        self.conn.get_or_try_init(TipcConnection::new).await
    }
}

impl Transport for Kernel {
    async fn doit(&self, request: &Request) -> Result<()> {
        self.connection().await?.doit(request).await
    }

    async fn dumpit(&self, request: &Request) -> Result<Vec<Vec<u8>>> {
        self.connection().await?.dumpit(request).await
    }
}

impl LocalNode for Kernel {
    fn local_address(&self) -> Result<NodeAddress> {
        self.sock.local_address()
    }

    fn peer_identity(&self, peer: NodeAddress) -> Option<NodeIdentity> {
        self.sock.peer_identity(peer)
    }
}
