use std::collections::HashSet;
use std::io::{BufRead, Write};

use colored::Colorize;
use snafu::prelude::*;
use tracing::debug;

use crate::directory::{DirectoryState, ItemKind};
use crate::listing::ListingSource;
use crate::shell::command::{ReadInputSnafu, WriteOutputSnafu};
use crate::shell::{ShellCommand, ShellError};

const HELP: &str = "\
pwd                               print the current directory
ls [All|Files|Folders] [term]     list items, optionally filtered by term
cd <path>                         go to an absolute path
in <name>                         step into a subdirectory
out                               step out to the parent directory
step <In|Out> [name]              step in or out
sort <Alphanumeric|Date Modified> change the ordering
reload                            read the listing again
help                              show this help
quit                              leave the shell";

/// Whether the shell should keep reading commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// A [`DirectoryState`] driven by shell commands, printing to `out`.
pub struct Session<S, W> {
    state: DirectoryState<S>,
    out: W,
}

impl<S: ListingSource, W: Write> Session<S, W> {
    pub fn new(state: DirectoryState<S>, out: W) -> Self {
        Self { state, out }
    }

    pub fn state(&self) -> &DirectoryState<S> {
        &self.state
    }

    /// Runs `lines` in order, stopping at `quit` or at the first failing command.
    pub fn run_script<'a>(
        &mut self,
        lines: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), ShellError> {
        for line in lines {
            if self.run_line(line)? == Flow::Quit {
                break;
            }
        }
        Ok(())
    }

    /// Reads commands from `input` until it ends or `quit` is entered.
    ///
    /// A failing command is reported and the shell keeps going; only I/O failures
    /// of the shell itself end the loop with an error.
    pub fn run_interactive(&mut self, input: impl BufRead) -> Result<(), ShellError> {
        self.prompt()?;
        for line in input.lines() {
            let line = line.context(ReadInputSnafu)?;
            match self.run_line(&line) {
                Ok(Flow::Quit) => return Ok(()),
                Ok(Flow::Continue) => {}
                Err(e @ (ShellError::ReadInput { .. } | ShellError::WriteOutput { .. })) => {
                    return Err(e);
                }
                Err(e) => {
                    debug!("Command '{}' failed: {:?}", line.trim(), e);
                    writeln!(self.out, "{}", format!("error: {e}").red())
                        .context(WriteOutputSnafu)?;
                }
            }
            self.prompt()?;
        }
        writeln!(self.out).context(WriteOutputSnafu)
    }

    /// Parses and executes one line. Blank lines do nothing.
    pub fn run_line(&mut self, line: &str) -> Result<Flow, ShellError> {
        if line.trim().is_empty() {
            return Ok(Flow::Continue);
        }
        let command = line.parse::<ShellCommand>()?;
        self.execute(command)
    }

    pub fn execute(&mut self, command: ShellCommand) -> Result<Flow, ShellError> {
        debug!("Executing {:?}", command);
        match command {
            ShellCommand::Pwd => {
                writeln!(self.out, "{}", self.state.path()).context(WriteOutputSnafu)?;
            }
            ShellCommand::List { kind, search_term } => {
                self.list(kind, search_term.as_deref())?;
            }
            ShellCommand::ChangeDirectory(path) => self.state.set_path(&path)?,
            ShellCommand::Step {
                direction,
                subdirectory,
            } => self.state.step(direction, subdirectory.as_deref())?,
            ShellCommand::Sort(sort_mode) => self.state.set_sort_mode(sort_mode)?,
            ShellCommand::Reload => self.state.reload()?,
            ShellCommand::Help => writeln!(self.out, "{HELP}").context(WriteOutputSnafu)?,
            ShellCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn list(&mut self, kind: ItemKind, search_term: Option<&str>) -> Result<(), ShellError> {
        let items = self.state.get_items(kind, search_term)?;
        let folders = match kind {
            ItemKind::Files => HashSet::new(),
            ItemKind::All | ItemKind::Folders => self
                .state
                .get_items(ItemKind::Folders, None)?
                .into_iter()
                .collect::<HashSet<_>>(),
        };

        if items.is_empty() {
            return writeln!(self.out, "{}", "(no items)".dimmed()).context(WriteOutputSnafu);
        }
        for item in items {
            let written = if folders.contains(&item) {
                writeln!(self.out, "{}", format!("{item}/").blue().bold())
            } else {
                writeln!(self.out, "{item}")
            };
            written.context(WriteOutputSnafu)?;
        }
        Ok(())
    }

    fn prompt(&mut self) -> Result<(), ShellError> {
        write!(self.out, "{}> ", self.state.path()).context(WriteOutputSnafu)?;
        self.out.flush().context(WriteOutputSnafu)
    }
}
