//! `tipc node` command implementation.

use std::io::Write;

use tipclink::netlink::genl::tipc::{
    LocalNode, NetworkId, NodeAddress, NodeIdentity, Request, Transport, decode_network_id,
    decode_node_identity, decode_peer,
};

use crate::cmd::{Action, Cmd, CmdLine};
use crate::error::CliError;
use crate::output::{OutputFormat, Printer};

/// Leaf commands under `node`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeOp {
    List,
    GetAddress,
    GetIdentity,
    GetNetid,
    SetAddress,
    SetIdentity,
    SetNetid,
}

pub const NODE_CMDS: &[Cmd<NodeOp>] = &[
    Cmd {
        name: "list",
        action: Action::Leaf(NodeOp::List),
        help: None,
    },
    Cmd {
        name: "get",
        action: Action::Group(GET_CMDS),
        help: Some(get_help),
    },
    Cmd {
        name: "set",
        action: Action::Group(SET_CMDS),
        help: Some(set_help),
    },
];

const GET_CMDS: &[Cmd<NodeOp>] = &[
    Cmd {
        name: "address",
        action: Action::Leaf(NodeOp::GetAddress),
        help: None,
    },
    Cmd {
        name: "identity",
        action: Action::Leaf(NodeOp::GetIdentity),
        help: None,
    },
    Cmd {
        name: "netid",
        action: Action::Leaf(NodeOp::GetNetid),
        help: None,
    },
    Cmd {
        name: "clusterid",
        action: Action::Leaf(NodeOp::GetNetid),
        help: None,
    },
];

const SET_CMDS: &[Cmd<NodeOp>] = &[
    Cmd {
        name: "address",
        action: Action::Leaf(NodeOp::SetAddress),
        help: None,
    },
    Cmd {
        name: "identity",
        action: Action::Leaf(NodeOp::SetIdentity),
        help: None,
    },
    Cmd {
        name: "netid",
        action: Action::Leaf(NodeOp::SetNetid),
        help: None,
    },
    Cmd {
        name: "clusterid",
        action: Action::Leaf(NodeOp::SetNetid),
        help: None,
    },
];

pub fn help(line: &CmdLine) -> String {
    format!(
        "Usage: {} node COMMAND [ARGS] ...\n\
         \n\
         COMMANDS\n \
         list                  - List remote nodes\n \
         get                   - Get local node parameters\n \
         set                   - Set local node parameters\n",
        line.prog()
    )
}

fn get_help(line: &CmdLine) -> String {
    format!(
        "Usage: {} node get PROPERTY\n\
         \n\
         PROPERTIES\n \
         address               - Get local node address\n \
         identity              - Get node identity\n \
         netid                 - Get local network id\n \
         clusterid             - Get local clusterid\n",
        line.prog()
    )
}

fn set_help(line: &CmdLine) -> String {
    format!(
        "Usage: {} node set PROPERTY\n\
         \n\
         PROPERTIES\n \
         address ADDRESS       - Set local node address (Z.C.N)\n \
         identity NODEID       - Set node identity\n \
         netid NETID           - Set local network id\n \
         clusterid CLUSTERID   - Set local cluster id\n",
        line.prog()
    )
}

impl NodeOp {
    /// Trailing arguments the command takes.
    fn arity(self) -> usize {
        match self {
            NodeOp::SetAddress | NodeOp::SetIdentity | NodeOp::SetNetid => 1,
            _ => 0,
        }
    }

    /// One-line usage, naming the property the way it was typed.
    fn usage(self, line: &CmdLine) -> String {
        let prop = line.last().unwrap_or_default();
        let prog = line.prog();
        match self {
            NodeOp::List => format!("Usage: {} node list\n", prog),
            NodeOp::GetAddress | NodeOp::GetIdentity | NodeOp::GetNetid => {
                format!("Usage: {} node get {}\n", prog, prop)
            }
            NodeOp::SetAddress => format!("Usage: {} node set {} ADDRESS\n", prog, prop),
            NodeOp::SetIdentity => format!("Usage: {} node set {} NODE_ID\n", prog, prop),
            NodeOp::SetNetid => {
                format!("Usage: {} node set {} {}\n", prog, prop, prop.to_uppercase())
            }
        }
    }
}

/// Run a resolved `node` command.
///
/// The cursor must sit just past the leaf's name. Nothing is sent when the
/// argument count is wrong, in help mode, or when the argument is invalid.
pub async fn execute<B, W>(
    op: NodeOp,
    line: &mut CmdLine,
    backend: &B,
    printer: &mut Printer<W>,
) -> Result<(), CliError>
where
    B: Transport + LocalNode,
    W: Write,
{
    if line.is_help() || line.remaining().len() != op.arity() {
        return Err(CliError::Usage(op.usage(line)));
    }

    match op {
        NodeOp::List => list(backend, printer).await,
        NodeOp::GetAddress => {
            let address = backend.local_address()?;
            printer.address(address)?;
            Ok(())
        }
        NodeOp::GetIdentity => get_identity(backend, printer).await,
        NodeOp::GetNetid => {
            let replies = dump(backend, &Request::get_net(), "getting network id").await?;
            if let Some(payload) = replies.first() {
                printer.netid(decode_network_id(payload)?)?;
            }
            Ok(())
        }
        NodeOp::SetAddress => {
            let address: NodeAddress = argument(line).parse()?;
            set(backend, &Request::set_address(address), "setting node address").await
        }
        NodeOp::SetIdentity => {
            let identity: NodeIdentity = argument(line).parse()?;
            set(backend, &Request::set_identity(&identity), "setting node identity").await
        }
        NodeOp::SetNetid => {
            let netid = NetworkId::parse_lenient(&argument(line));
            tracing::debug!(netid = netid.raw(), "setting network id");
            set(backend, &Request::set_netid(netid), "setting network id").await
        }
    }
}

fn argument(line: &mut CmdLine) -> String {
    line.shift().unwrap_or_default().to_string()
}

async fn dump<B: Transport>(
    backend: &B,
    request: &Request,
    operation: &str,
) -> tipclink::Result<Vec<Vec<u8>>> {
    backend
        .dumpit(request)
        .await
        .map_err(|e| e.with_context(operation))
}

async fn set<B: Transport>(
    backend: &B,
    request: &Request,
    operation: &str,
) -> Result<(), CliError> {
    backend
        .doit(request)
        .await
        .map_err(|e| e.with_context(operation))?;
    Ok(())
}

async fn list<B, W>(backend: &B, printer: &mut Printer<W>) -> Result<(), CliError>
where
    B: Transport + LocalNode,
    W: Write,
{
    let replies = dump(backend, &Request::get_nodes(), "listing nodes").await?;

    match printer.format() {
        OutputFormat::Text => {
            printer.peer_header()?;
            for payload in &replies {
                let peer = decode_peer(payload)?;
                let identity = backend.peer_identity(peer.address);
                printer.peer_row(identity.as_ref(), &peer)?;
            }
        }
        OutputFormat::Json => {
            let peers = replies
                .iter()
                .map(|payload| {
                    let peer = decode_peer(payload)?;
                    Ok((backend.peer_identity(peer.address), peer))
                })
                .collect::<tipclink::Result<Vec<_>>>()?;
            printer.peers_json(&peers)?;
        }
    }
    Ok(())
}

async fn get_identity<B, W>(backend: &B, printer: &mut Printer<W>) -> Result<(), CliError>
where
    B: Transport + LocalNode,
    W: Write,
{
    let replies = dump(backend, &Request::get_net(), "getting node identity").await?;
    let Some(payload) = replies.first() else {
        return Ok(());
    };

    let identity = decode_node_identity(payload)?;
    let address = backend.local_address()?;
    printer.identity(&identity, address)?;
    Ok(())
}
