//! Top-level command table.

pub mod node;

use std::io::Write;

use tipclink::netlink::genl::tipc::{LocalNode, Transport};

use crate::cmd::{self, Action, Cmd, CmdLine};
use crate::error::CliError;
use crate::output::Printer;

const ROOT_CMDS: &[Cmd<node::NodeOp>] = &[Cmd {
    name: "node",
    action: Action::Group(node::NODE_CMDS),
    help: Some(node::help),
}];

/// Usage text for the program itself.
pub fn help(line: &CmdLine) -> String {
    format!(
        "Usage: {} [OPTIONS] COMMAND [ARGS] ...\n\
         \n\
         Options:\n \
         -h, --help       Print help for last given command\n \
         -j, --json       Json format printouts\n \
         -p, --pretty     Pretty print JSON\n \
         -V, --version    Print version\n\
         \n\
         Commands:\n \
         node             - Node related\n",
        line.prog()
    )
}

/// Resolve the command line and run the selected command.
pub async fn run<B, W>(
    line: &mut CmdLine,
    backend: &B,
    printer: &mut Printer<W>,
) -> Result<(), CliError>
where
    B: Transport + LocalNode,
    W: Write,
{
    let op = cmd::resolve(line, ROOT_CMDS, Some(help))?;
    node::execute(op, line, backend, printer).await
}
