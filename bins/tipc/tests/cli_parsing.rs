//! CLI argument parsing tests for the tipc command.
//!
//! These tests exercise usage and validation paths, which are resolved
//! before any socket is opened, so they need neither TIPC nor root.

use assert_cmd::Command;
use predicates::prelude::*;

fn tipc_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_tipc"))
}

mod global_flags {
    use super::*;

    #[test]
    fn test_version() {
        tipc_cmd()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("tipc"));
    }

    #[test]
    fn test_help() {
        tipc_cmd()
            .arg("--help")
            .assert()
            .code(2)
            .stderr(predicate::str::contains("Usage: tipc [OPTIONS] COMMAND"))
            .stderr(predicate::str::contains("node"));
    }

    #[test]
    fn test_no_command() {
        tipc_cmd()
            .assert()
            .code(2)
            .stderr(predicate::str::contains("Usage: tipc"));
    }

    #[test]
    fn test_invalid_command() {
        tipc_cmd()
            .arg("bearer")
            .assert()
            .code(2)
            .stderr(predicate::str::contains("error, invalid command \"bearer\""))
            .stderr(predicate::str::contains("use --help for command help"));
    }

    #[test]
    fn test_unknown_flag() {
        tipc_cmd().arg("--bogus").assert().failure();
    }
}

mod node_command {
    use super::*;

    #[test]
    fn test_node_without_subcommand() {
        tipc_cmd()
            .arg("node")
            .assert()
            .code(2)
            .stderr(predicate::str::contains("Usage: tipc node COMMAND"));
    }

    #[test]
    fn test_node_help() {
        tipc_cmd()
            .args(["node", "--help"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("List remote nodes"));
    }

    #[test]
    fn test_node_get_help() {
        tipc_cmd()
            .args(["--help", "node", "get"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("Usage: tipc node get PROPERTY"))
            .stderr(predicate::str::contains("clusterid"));
    }

    #[test]
    fn test_node_set_without_property() {
        tipc_cmd()
            .args(["node", "set"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("Usage: tipc node set PROPERTY"));
    }

    #[test]
    fn test_prefix_is_not_a_match() {
        tipc_cmd()
            .args(["node", "li"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("invalid command \"li\""));
    }

    #[test]
    fn test_leaf_help_prints_usage() {
        tipc_cmd()
            .args(["node", "list", "-h"])
            .assert()
            .code(2)
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("Usage: tipc node list"));
    }

    #[test]
    fn test_list_extra_argument() {
        tipc_cmd()
            .args(["node", "list", "extra"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("Usage: tipc node list"));
    }

    #[test]
    fn test_get_extra_argument() {
        tipc_cmd()
            .args(["node", "get", "clusterid", "1"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("Usage: tipc node get clusterid"));
    }
}

mod node_set {
    use super::*;

    #[test]
    fn test_set_address_missing_value() {
        tipc_cmd()
            .args(["node", "set", "address"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("Usage: tipc node set address ADDRESS"));
    }

    #[test]
    fn test_set_address_zero() {
        tipc_cmd()
            .args(["node", "set", "address", "0.0.0"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains(
                "invalid network address \"0.0.0\", syntax: Z.C.N",
            ));
    }

    #[test]
    fn test_set_address_malformed() {
        tipc_cmd()
            .args(["node", "set", "address", "1.2"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("invalid network address"));
    }

    #[test]
    fn test_set_identity_invalid() {
        tipc_cmd()
            .args(["node", "set", "identity", "bad id!"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("Invalid node identity"));
    }

    #[test]
    fn test_set_identity_too_long() {
        let id = "f".repeat(33);
        tipc_cmd()
            .args(["node", "set", "identity", id.as_str()])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("Invalid node identity"));
    }

    #[test]
    fn test_set_netid_extra_argument() {
        tipc_cmd()
            .args(["node", "set", "netid", "1", "2"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("Usage: tipc node set netid NETID"));
    }

    #[test]
    fn test_set_clusterid_usage_names_alias() {
        tipc_cmd()
            .args(["node", "set", "clusterid"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("Usage: tipc node set clusterid CLUSTERID"));
    }
}
