//! Decoders for TIPC dump replies.
//!
//! Each decoder takes one reply payload (GENL header followed by the
//! attribute section) and fails with [`Error::MissingAttribute`] if the
//! outer group or a required field is absent.

use super::types::{NetworkId, NodeAddress, NodeIdentity, PeerRecord};
use super::{TipcAttr, TipcNetAttr, TipcNodeAttr};
use crate::netlink::attr::{AttrKey, AttrTable};
use crate::netlink::error::Result;
use crate::netlink::genl::split_payload;

fn group<K: AttrKey>(payload: &[u8], outer: TipcAttr) -> Result<AttrTable<'_, K>> {
    let (_, attrs) = split_payload(payload)?;
    AttrTable::<TipcAttr>::parse(attrs).nested(outer)
}

/// Decode one `NODE_GET` reply into a peer record.
pub fn decode_peer(payload: &[u8]) -> Result<PeerRecord> {
    let node = group::<TipcNodeAttr>(payload, TipcAttr::Node)?;
    Ok(PeerRecord {
        address: NodeAddress::new(node.u32(TipcNodeAttr::Addr)?),
        up: node.has(TipcNodeAttr::Up),
    })
}

/// Decode the node identity from a `NET_GET` reply.
pub fn decode_node_identity(payload: &[u8]) -> Result<NodeIdentity> {
    let net = group::<TipcNetAttr>(payload, TipcAttr::Net)?;
    let w0 = net.u64(TipcNetAttr::NodeId)?;
    let w1 = net.u64(TipcNetAttr::NodeIdW1)?;
    Ok(NodeIdentity::from_words(w0, w1))
}

/// Decode the network id from a `NET_GET` reply.
pub fn decode_network_id(payload: &[u8]) -> Result<NetworkId> {
    let net = group::<TipcNetAttr>(payload, TipcAttr::Net)?;
    Ok(NetworkId::new(net.u32(TipcNetAttr::Id)?))
}
