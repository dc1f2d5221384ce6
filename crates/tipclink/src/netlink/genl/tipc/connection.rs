//! TIPC connection implementation.

use super::request::Request;
use super::{TIPC_GENL_NAME, TIPC_GENL_VERSION, Transport};
use crate::netlink::error::Result;
use crate::netlink::genl::GenlConnection;

/// Kernel-backed TIPC connection.
///
/// Resolves the `TIPCv2` family ID once and reuses it for every request.
pub struct TipcConnection {
    genl: GenlConnection,
    family_id: u16,
}

impl TipcConnection {
    /// Open a Generic Netlink socket and resolve the TIPC family.
    ///
    /// Fails with [`Error::FamilyNotFound`](crate::Error::FamilyNotFound)
    /// if the TIPC module is not loaded.
    pub async fn new() -> Result<Self> {
        Self::from_genl(GenlConnection::new()?).await
    }

    /// Resolve the TIPC family on an existing GENL connection.
    pub async fn from_genl(genl: GenlConnection) -> Result<Self> {
        let family_id = genl.get_family_id(TIPC_GENL_NAME).await?;
        Ok(Self { genl, family_id })
    }
}

impl Transport for TipcConnection {
    async fn doit(&self, request: &Request) -> Result<()> {
        debug_assert!(!request.is_dump());
        self.genl
            .command(
                self.family_id,
                request.cmd() as u8,
                TIPC_GENL_VERSION,
                |b| b.append_attrs(request.attrs()),
            )
            .await
    }

    async fn dumpit(&self, request: &Request) -> Result<Vec<Vec<u8>>> {
        debug_assert!(request.is_dump());
        self.genl
            .dump_command(
                self.family_id,
                request.cmd() as u8,
                TIPC_GENL_VERSION,
                |b| b.append_attrs(request.attrs()),
            )
            .await
    }
}
