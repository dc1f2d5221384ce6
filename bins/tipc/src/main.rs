//! tipc - TIPC node configuration.
//!
//! Queries and sets the local node address, identity and network id, and
//! lists known peers, via the kernel's TIPCv2 Generic Netlink family.

mod backend;
mod cmd;
mod commands;
mod error;
mod output;

use std::io;
use std::process::ExitCode;

use clap::Parser;

use crate::cmd::{CmdLine, Mode};
use crate::error::CliError;
use crate::output::{OutputFormat, OutputOptions, Printer};

#[derive(Parser)]
#[command(name = "tipc", version, about = "TIPC configuration tool")]
#[command(disable_help_flag = true)]
struct Cli {
    /// Print help for the last given command.
    #[arg(short = 'h', long)]
    help: bool,

    /// Output JSON.
    #[arg(short = 'j', long)]
    json: bool,

    /// Pretty print JSON.
    #[arg(short = 'p', long)]
    pretty: bool,

    /// Command and its arguments.
    #[arg(value_name = "COMMAND", allow_negative_numbers = true)]
    args: Vec<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    let opts = OutputOptions { pretty: cli.pretty };
    let mode = if cli.help { Mode::Help } else { Mode::Execute };

    let mut line = CmdLine::new("tipc", cli.args, mode);
    let backend = backend::Kernel::new();
    let mut printer = Printer::new(io::stdout().lock(), format, opts);

    let result = commands::run(&mut line, &backend, &mut printer).await;
    let flushed = printer.finish().map(drop).map_err(CliError::Output);
    let result = result.and(flushed);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if e.is_usage() {
                eprint!("{}", e);
            } else {
                eprintln!("Error: {}", e);
            }
            ExitCode::from(e.exit_code())
        }
    }
}
