//! Command tree dispatch.
//!
//! A command table is a static slice of [`Cmd`] entries. Each entry either
//! names a leaf (carrying a handler value) or a nested group with its own
//! table and help text. [`resolve`] walks the tree one token at a time and
//! returns the handler value of the leaf it lands on, leaving the cursor
//! just past the leaf's name so the handler can read its own arguments.

use crate::error::CliError;

/// Renders usage text for a group.
pub type HelpFn = fn(&CmdLine) -> String;

/// What a command name leads to.
pub enum Action<H: 'static> {
    /// A runnable command.
    Leaf(H),
    /// A nested command table.
    Group(&'static [Cmd<H>]),
}

/// One entry of a command table.
pub struct Cmd<H: 'static> {
    pub name: &'static str,
    pub action: Action<H>,
    /// Shown when the group is entered without a subcommand, or in help mode.
    pub help: Option<HelpFn>,
}

/// Whether the command line asked for help or for execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Execute,
    Help,
}

/// Cursor over the command tokens.
#[derive(Debug, Clone)]
pub struct CmdLine {
    prog: String,
    args: Vec<String>,
    optind: usize,
    mode: Mode,
}

impl CmdLine {
    pub fn new(prog: impl Into<String>, args: Vec<String>, mode: Mode) -> Self {
        Self {
            prog: prog.into(),
            args,
            optind: 0,
            mode,
        }
    }

    /// Program name for usage lines.
    pub fn prog(&self) -> &str {
        &self.prog
    }

    pub fn is_help(&self) -> bool {
        self.mode == Mode::Help
    }

    /// Tokens not consumed yet.
    pub fn remaining(&self) -> &[String] {
        &self.args[self.optind..]
    }

    /// The most recently consumed token.
    pub fn last(&self) -> Option<&str> {
        self.optind
            .checked_sub(1)
            .and_then(|i| self.args.get(i))
            .map(String::as_str)
    }

    fn peek(&self) -> Option<&str> {
        self.args.get(self.optind).map(String::as_str)
    }

    /// Consume and return the next token.
    pub fn shift(&mut self) -> Option<&str> {
        let token = self.args.get(self.optind)?;
        self.optind += 1;
        Some(token.as_str())
    }
}

/// Walk `table` along the command line and return the selected leaf.
///
/// `help` belongs to the group that owns `table`. Matching is exact and
/// case-sensitive.
pub fn resolve<H: Copy>(
    line: &mut CmdLine,
    table: &'static [Cmd<H>],
    help: Option<HelpFn>,
) -> Result<H, CliError> {
    let Some(token) = line.peek() else {
        return Err(CliError::Usage(match help {
            Some(help) => help(line),
            None => "error, missing command\nuse --help for command help\n".to_string(),
        }));
    };

    let Some(cmd) = table.iter().find(|cmd| cmd.name == token) else {
        return Err(CliError::Usage(match help {
            Some(help) if line.is_help() => help(line),
            _ => format!("error, invalid command \"{}\"\nuse --help for command help\n", token),
        }));
    };

    tracing::debug!(command = cmd.name, "matched");
    line.shift();

    match &cmd.action {
        Action::Leaf(handler) => Ok(*handler),
        Action::Group(sub) => resolve(line, sub, cmd.help),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Op {
        Show,
        GetA,
        GetB,
    }

    fn get_help(line: &CmdLine) -> String {
        format!("Usage: {} get PROPERTY\n", line.prog())
    }

    const GET: &[Cmd<Op>] = &[
        Cmd {
            name: "a",
            action: Action::Leaf(Op::GetA),
            help: None,
        },
        Cmd {
            name: "b",
            action: Action::Leaf(Op::GetB),
            help: None,
        },
        Cmd {
            name: "alias",
            action: Action::Leaf(Op::GetB),
            help: None,
        },
    ];

    const ROOT: &[Cmd<Op>] = &[
        Cmd {
            name: "show",
            action: Action::Leaf(Op::Show),
            help: None,
        },
        Cmd {
            name: "get",
            action: Action::Group(GET),
            help: Some(get_help),
        },
    ];

    fn line(args: &[&str], mode: Mode) -> CmdLine {
        CmdLine::new("prog", args.iter().map(|s| s.to_string()).collect(), mode)
    }

    fn usage(result: Result<Op, CliError>) -> String {
        match result {
            Err(CliError::Usage(text)) => text,
            other => panic!("expected usage error, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_leaf_leaves_arguments() {
        let mut l = line(&["show", "x", "y"], Mode::Execute);
        assert_eq!(resolve(&mut l, ROOT, None).unwrap(), Op::Show);
        assert_eq!(l.remaining(), ["x", "y"]);
        assert_eq!(l.last(), Some("show"));
    }

    #[test]
    fn test_resolve_nested() {
        let mut l = line(&["get", "b"], Mode::Execute);
        assert_eq!(resolve(&mut l, ROOT, None).unwrap(), Op::GetB);
        assert!(l.remaining().is_empty());
    }

    #[test]
    fn test_aliases_share_handler() {
        let mut a = line(&["get", "b"], Mode::Execute);
        let mut b = line(&["get", "alias"], Mode::Execute);
        assert_eq!(
            resolve(&mut a, ROOT, None).unwrap(),
            resolve(&mut b, ROOT, None).unwrap()
        );
        assert_eq!(b.last(), Some("alias"));
    }

    #[test]
    fn test_match_is_exact() {
        for token in ["sho", "Show", "shows"] {
            let mut l = line(&[token], Mode::Execute);
            assert_eq!(
                usage(resolve(&mut l, ROOT, None)),
                format!("error, invalid command \"{}\"\nuse --help for command help\n", token)
            );
        }
    }

    #[test]
    fn test_group_without_subcommand_shows_help() {
        let mut l = line(&["get"], Mode::Execute);
        assert_eq!(usage(resolve(&mut l, ROOT, None)), "Usage: prog get PROPERTY\n");
    }

    #[test]
    fn test_missing_command_without_help() {
        let mut l = line(&[], Mode::Execute);
        assert!(usage(resolve(&mut l, ROOT, None)).starts_with("error, missing command"));
    }

    #[test]
    fn test_unknown_subcommand_in_help_mode_shows_group_help() {
        let mut l = line(&["get", "zzz"], Mode::Help);
        assert_eq!(usage(resolve(&mut l, ROOT, None)), "Usage: prog get PROPERTY\n");

        let mut l = line(&["get", "zzz"], Mode::Execute);
        assert!(usage(resolve(&mut l, ROOT, None)).starts_with("error, invalid command \"zzz\""));
    }

    #[test]
    fn test_help_mode_still_resolves_leaves() {
        let mut l = line(&["get", "a"], Mode::Help);
        assert_eq!(resolve(&mut l, ROOT, None).unwrap(), Op::GetA);
        assert!(l.is_help());
    }
}
