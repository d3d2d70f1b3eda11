//! Command table for dispatching input lines by command name.
//!
//! A line is split on the first run of whitespace: the first token selects
//! the handler, the trimmed remainder is passed to it as the argument
//! string. `help` and `?` are answered by the table itself.
//!
//! # Example
//!
//! ```
//! use opwire_client::shell::{Action, CommandTable};
//!
//! let mut table: CommandTable<u8> = CommandTable::new();
//! table.register("ping", "Send a ping.", |_args| Ok(Action::Send(1)));
//!
//! assert_eq!(table.dispatch("ping").unwrap(), Some(Action::Send(1)));
//! assert_eq!(table.dispatch("   ").unwrap(), None);
//! assert!(table.dispatch("pong").is_err());
//! ```

use std::collections::HashMap;
use std::fmt::Write as _;

use crate::error::{OpwireError, Result};

/// What the shell should do after a command ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action<C> {
    /// Send a command and keep reading input.
    Send(C),
    /// Send a command, close the connection and stop.
    SendAndQuit(C),
    /// Write text back to the user.
    Print(String),
    /// Stop without sending anything.
    Quit,
}

/// Handler invoked with the argument string of a line.
pub type CommandHandler<C> = Box<dyn Fn(&str) -> Result<Action<C>> + Send + Sync>;

struct Entry<C> {
    help: String,
    handler: CommandHandler<C>,
}

/// Static mapping from command name to handler.
pub struct CommandTable<C> {
    entries: HashMap<String, Entry<C>>,
}

impl<C> CommandTable<C> {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Register a handler under `name`, replacing any previous one.
    pub fn register<F>(&mut self, name: &str, help: &str, handler: F) -> &mut Self
    where
        F: Fn(&str) -> Result<Action<C>> + Send + Sync + 'static,
    {
        self.entries.insert(
            name.to_string(),
            Entry {
                help: help.to_string(),
                handler: Box::new(handler),
            },
        );
        self
    }

    /// Run the handler for `line`.
    ///
    /// Returns `Ok(None)` for blank lines.
    ///
    /// # Errors
    ///
    /// [`OpwireError::UnknownCommand`] when no handler has that name; any
    /// error the handler returns.
    pub fn dispatch(&self, line: &str) -> Result<Option<Action<C>>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (name, args) = match line.split_once(char::is_whitespace) {
            Some((name, args)) => (name, args.trim()),
            None => (line, ""),
        };

        if name == "help" || name == "?" {
            return Ok(Some(Action::Print(self.help_text())));
        }

        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| OpwireError::UnknownCommand(name.to_string()))?;
        (entry.handler)(args).map(Some)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One line per command: name padded to a column, then its help.
    pub fn help_text(&self) -> String {
        let width = self.entries.keys().map(String::len).max().unwrap_or(0);
        let mut text = String::from("Commands:\n");
        for name in self.names() {
            let help = &self.entries[name].help;
            let _ = writeln!(text, "  {:<width$}  {}", name, help, width = width);
        }
        text
    }
}

impl<C> Default for CommandTable<C> {
    fn default() -> Self {
        Self::new()
    }
}
