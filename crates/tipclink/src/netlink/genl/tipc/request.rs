//! TIPC request builder.

use super::types::{NetworkId, NodeAddress, NodeIdentity};
use super::{TipcAttr, TipcCmd, TipcNetAttr};
use crate::netlink::builder::AttrBuilder;

/// A TIPC command together with its encoded attribute section.
///
/// Set requests carry exactly one `TipcAttr::Net` group holding the field
/// being changed. Get requests carry no attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    cmd: TipcCmd,
    attrs: AttrBuilder,
}

impl Request {
    fn new(cmd: TipcCmd) -> Self {
        Self {
            cmd,
            attrs: AttrBuilder::new(),
        }
    }

    /// Dump all known peers.
    pub fn get_nodes() -> Self {
        Self::new(TipcCmd::NodeGet)
    }

    /// Dump the local network settings (address, identity, network id).
    pub fn get_net() -> Self {
        Self::new(TipcCmd::NetGet)
    }

    /// Set the local node address.
    pub fn set_address(addr: NodeAddress) -> Self {
        Self::set_net(|net| {
            net.append_attr_u32(TipcNetAttr::Addr as u16, addr.raw());
        })
    }

    /// Set the local node identity. Word 0 is emitted before word 1.
    pub fn set_identity(id: &NodeIdentity) -> Self {
        let (w0, w1) = id.words();
        Self::set_net(|net| {
            net.append_attr_u64(TipcNetAttr::NodeId as u16, w0)
                .append_attr_u64(TipcNetAttr::NodeIdW1 as u16, w1);
        })
    }

    /// Set the network (cluster) id.
    pub fn set_netid(netid: NetworkId) -> Self {
        Self::set_net(|net| {
            net.append_attr_u32(TipcNetAttr::Id as u16, netid.raw());
        })
    }

    fn set_net(fill: impl FnOnce(&mut AttrBuilder)) -> Self {
        let mut req = Self::new(TipcCmd::NetSet);
        let nest = req.attrs.nest_start(TipcAttr::Net as u16);
        fill(&mut req.attrs);
        req.attrs.nest_end(nest);
        req
    }

    /// Command to send.
    pub fn cmd(&self) -> TipcCmd {
        self.cmd
    }

    /// Whether the command is answered by a dump rather than an ack.
    pub fn is_dump(&self) -> bool {
        matches!(self.cmd, TipcCmd::NodeGet | TipcCmd::NetGet)
    }

    /// Encoded attribute section.
    pub fn attrs(&self) -> &AttrBuilder {
        &self.attrs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netlink::attr::{AttrIter, AttrTable, NlAttr};

    fn net_group(req: &Request) -> AttrTable<'_, TipcNetAttr> {
        let outer = AttrTable::<TipcAttr>::parse(req.attrs().as_bytes());
        assert_eq!(outer.len(), 1);
        outer.nested(TipcAttr::Net).unwrap()
    }

    #[test]
    fn test_get_requests_are_empty() {
        let nodes = Request::get_nodes();
        assert_eq!(nodes.cmd(), TipcCmd::NodeGet);
        assert!(nodes.attrs().as_bytes().is_empty());

        let net = Request::get_net();
        assert_eq!(net.cmd(), TipcCmd::NetGet);
        assert!(net.attrs().as_bytes().is_empty());

        assert!(nodes.is_dump() && net.is_dump());
        assert!(!Request::set_netid(NetworkId::new(1)).is_dump());
    }

    #[test]
    fn test_set_address() {
        let req = Request::set_address("1.1.1".parse().unwrap());
        assert_eq!(req.cmd(), TipcCmd::NetSet);

        let outer = NlAttr::from_bytes(req.attrs().as_bytes()).unwrap();
        assert_eq!(outer.kind(), TipcAttr::Net as u16);
        assert!(outer.is_nested());

        let net = net_group(&req);
        assert_eq!(net.len(), 1);
        assert_eq!(net.u32(TipcNetAttr::Addr).unwrap(), 0x0100_1001);
    }

    #[test]
    fn test_set_identity_word_order() {
        let id = NodeIdentity::from_words(0x1111_2222_3333_4444, 0x5555_6666_7777_8888);
        let req = Request::set_identity(&id);

        let outer = AttrTable::<TipcAttr>::parse(req.attrs().as_bytes());
        let inner = outer.get(TipcAttr::Net).unwrap();
        let kinds: Vec<u16> = AttrIter::new(inner).map(|(kind, _)| kind).collect();
        assert_eq!(kinds, vec![TipcNetAttr::NodeId as u16, TipcNetAttr::NodeIdW1 as u16]);

        let net = net_group(&req);
        assert_eq!(net.u64(TipcNetAttr::NodeId).unwrap(), 0x1111_2222_3333_4444);
        assert_eq!(net.u64(TipcNetAttr::NodeIdW1).unwrap(), 0x5555_6666_7777_8888);
    }

    #[test]
    fn test_set_identity_loopback() {
        let id: NodeIdentity = "0123456789abcdef0123456789abcdef".parse().unwrap();
        let req = Request::set_identity(&id);

        let net = net_group(&req);
        let decoded = NodeIdentity::from_words(
            net.u64(TipcNetAttr::NodeId).unwrap(),
            net.u64(TipcNetAttr::NodeIdW1).unwrap(),
        );
        assert_eq!(decoded, id);
    }

    #[test]
    fn test_set_netid() {
        let req = Request::set_netid(NetworkId::new(4711));
        let net = net_group(&req);
        assert_eq!(net.len(), 1);
        assert_eq!(net.u32(TipcNetAttr::Id).unwrap(), 4711);
    }

    #[test]
    fn test_netid_requests_are_deterministic() {
        let a = Request::set_netid(NetworkId::parse_lenient("99"));
        let b = Request::set_netid(NetworkId::parse_lenient("99"));
        assert_eq!(a, b);
    }
}
