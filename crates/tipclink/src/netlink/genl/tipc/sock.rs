//! AF_TIPC socket queries.
//!
//! The local node address and the identity behind a peer address are not
//! part of the Generic Netlink API; TIPC answers them on a plain `SOCK_RDM`
//! socket through `getsockname(2)` and the `SIOCGETNODEID` ioctl.

use std::io;
use std::mem;
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd};

use super::types::{NODE_ID_LEN, NodeAddress, NodeIdentity};
use crate::netlink::error::{Error, Result};

/// `SIOCPROTOPRIVATE + 1`
const SIOCGETNODEID: u32 = 0x89e1;

/// Mirrors `struct sockaddr_tipc`; `addr[1]` is `addr.id.node`.
#[repr(C)]
#[derive(Default)]
struct SockaddrTipc {
    family: u16,
    addrtype: u8,
    scope: i8,
    addr: [u32; 3],
}

/// Mirrors `struct tipc_sioc_nodeid_req`.
#[repr(C)]
#[derive(Default)]
struct NodeIdReq {
    peer: u32,
    node_id: [u8; NODE_ID_LEN],
}

/// Local-node lookups answered on an AF_TIPC socket.
pub trait LocalNode {
    /// Address of the local node.
    fn local_address(&self) -> Result<NodeAddress>;

    /// Identity of the node owning `peer`, if the kernel knows it.
    fn peer_identity(&self, peer: NodeAddress) -> Option<NodeIdentity>;
}

/// Opens a fresh `AF_TIPC`/`SOCK_RDM` socket for each query.
#[derive(Debug, Clone, Copy, Default)]
pub struct TipcSocket;

impl TipcSocket {
    pub fn new() -> Self {
        Self
    }

    fn open() -> Result<OwnedFd> {
        // SAFETY: socket(2) has no memory preconditions; the result is checked.
        let fd = unsafe { libc::socket(libc::AF_TIPC, libc::SOCK_RDM, 0) };
        if fd < 0 {
            return Err(Error::Socket {
                operation: "opening TIPC socket",
                source: io::Error::last_os_error(),
            });
        }
        // SAFETY: fd is a freshly created descriptor owned by nobody else.
        Ok(unsafe { OwnedFd::from_raw_fd(fd) })
    }
}

impl LocalNode for TipcSocket {
    fn local_address(&self) -> Result<NodeAddress> {
        let sock = Self::open()?;

        let mut addr = SockaddrTipc::default();
        let mut len = mem::size_of::<SockaddrTipc>() as libc::socklen_t;
        // SAFETY: addr is a writable buffer of `len` bytes laid out as sockaddr_tipc.
        let ret = unsafe {
            libc::getsockname(
                sock.as_raw_fd(),
                &mut addr as *mut SockaddrTipc as *mut libc::sockaddr,
                &mut len,
            )
        };
        if ret < 0 {
            return Err(Error::Socket {
                operation: "getting TIPC socket address",
                source: io::Error::last_os_error(),
            });
        }

        Ok(NodeAddress::new(addr.addr[1]))
    }

    fn peer_identity(&self, peer: NodeAddress) -> Option<NodeIdentity> {
        let sock = match Self::open() {
            Ok(sock) => sock,
            Err(e) => {
                tracing::debug!(error = %e, "node identity lookup skipped");
                return None;
            }
        };

        let mut req = NodeIdReq {
            peer: peer.raw(),
            ..Default::default()
        };
        // SAFETY: req matches the kernel's tipc_sioc_nodeid_req and outlives the call.
        let ret = unsafe {
            libc::ioctl(
                sock.as_raw_fd(),
                SIOCGETNODEID as _,
                &mut req as *mut NodeIdReq,
            )
        };
        if ret < 0 {
            tracing::debug!(
                peer = %peer,
                error = %io::Error::last_os_error(),
                "SIOCGETNODEID failed"
            );
            return None;
        }

        Some(NodeIdentity::from_bytes(req.node_id))
    }
}
