use std::str::FromStr;

use snafu::prelude::*;

use crate::directory::{DirectoryError, Direction, ItemKind, SortMode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Pwd,
    List {
        kind: ItemKind,
        search_term: Option<String>,
    },
    ChangeDirectory(String),
    Step {
        direction: Direction,
        subdirectory: Option<String>,
    },
    Sort(SortMode),
    Reload,
    Help,
    Quit,
}

impl FromStr for ShellCommand {
    type Err = ShellError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (name, rest) = line
            .split_once(char::is_whitespace)
            .map(|(name, rest)| (name, rest.trim()))
            .unwrap_or((line, ""));
        let argument = (!rest.is_empty()).then(|| rest.to_string());

        let command = match name {
            "pwd" => ShellCommand::Pwd,
            "ls" => Self::parse_list(rest),
            "cd" => ShellCommand::ChangeDirectory(
                argument.context(MissingArgumentSnafu { command: "cd" })?,
            ),
            "in" => ShellCommand::Step {
                direction: Direction::In,
                subdirectory: argument,
            },
            "out" => ShellCommand::Step {
                direction: Direction::Out,
                subdirectory: None,
            },
            "step" => {
                let (direction, subdirectory) = rest
                    .split_once(char::is_whitespace)
                    .map(|(direction, name)| (direction, Some(name.trim().to_string())))
                    .unwrap_or((rest, None));
                ensure!(!direction.is_empty(), MissingArgumentSnafu { command: "step" });
                ShellCommand::Step {
                    direction: direction.parse()?,
                    subdirectory,
                }
            }
            "sort" => ShellCommand::Sort(
                argument
                    .context(MissingArgumentSnafu { command: "sort" })?
                    .parse()?,
            ),
            "reload" => ShellCommand::Reload,
            "help" => ShellCommand::Help,
            "quit" | "exit" => ShellCommand::Quit,
            _ => return UnknownCommandSnafu { name }.fail(),
        };
        Ok(command)
    }
}

impl ShellCommand {
    /// `ls [All|Files|Folders] [term]`; a leading word that is not a kind starts the term.
    fn parse_list(rest: &str) -> Self {
        let (first, remainder) = rest
            .split_once(char::is_whitespace)
            .map(|(first, remainder)| (first, remainder.trim()))
            .unwrap_or((rest, ""));
        let (kind, term) = match first.parse::<ItemKind>() {
            Ok(kind) => (kind, remainder),
            Err(_) => (ItemKind::All, rest),
        };
        ShellCommand::List {
            kind,
            search_term: (!term.is_empty()).then(|| term.to_string()),
        }
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ShellError {
    #[snafu(display("Unknown command '{}', try 'help'", name))]
    UnknownCommand { name: String },
    #[snafu(display("Command '{}' needs an argument", command))]
    MissingArgument { command: &'static str },
    #[snafu(transparent)]
    Directory { source: DirectoryError },
    #[snafu(display("Failed to read shell input"))]
    ReadInput { source: std::io::Error },
    #[snafu(display("Failed to write shell output"))]
    WriteOutput { source: std::io::Error },
}
