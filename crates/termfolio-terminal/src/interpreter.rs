//! Command trait, registry, and tokenizer.
//!
//! Commands implement [`Command`] and are registered by name. Lookup is
//! case-insensitive; aliases resolve to the same command object at lookup
//! time. Registration order is preserved for `help` and completion.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use termfolio_types::config::TermConfig;
use termfolio_types::error::{Result, TermError};

use crate::monitor::SystemMonitor;
use crate::network_commands::DataService;
use crate::scrollback::{HistoryRecord, RecordOutput};
use crate::theme::ThemeHost;

/// Output produced by a command.
#[derive(Debug)]
pub enum CommandOutput {
    /// Plain text lines.
    Text(String),
    /// Tabular data (header row + data rows).
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    /// Command produced no visible output.
    None,
    /// Signal to truncate the scrollback. The invocation itself is not recorded.
    Clear,
    /// Result arrives later; the placeholder is shown until then.
    Deferred(Deferred),
}

/// Work a command hands back to the dispatcher to finish off the UI thread.
pub struct Deferred {
    /// Text shown in the record while the job runs.
    pub placeholder: String,
    job: Box<dyn FnOnce() -> RecordOutput + Send>,
}

impl Deferred {
    pub fn new<F>(placeholder: impl Into<String>, job: F) -> Self
    where
        F: FnOnce() -> RecordOutput + Send + 'static,
    {
        Self {
            placeholder: placeholder.into(),
            job: Box::new(job),
        }
    }

    /// Run the job to completion on the calling thread.
    pub fn run(self) -> RecordOutput {
        (self.job)()
    }
}

impl fmt::Debug for Deferred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred")
            .field("placeholder", &self.placeholder)
            .finish_non_exhaustive()
    }
}

/// Ambient state handed to every command invocation.
///
/// Handlers must not keep any of these references past the call.
pub struct Environment<'a> {
    /// The registry the command was dispatched from (for `help`).
    pub registry: &'a CommandRegistry,
    /// The submitted line being executed, trimmed.
    pub input: &'a str,
    /// Active theme and the catalog of valid names.
    pub theme: &'a mut dyn ThemeHost,
    /// Read-only view of the scrollback (for `history`).
    pub scrollback: &'a [HistoryRecord],
    /// Session configuration.
    pub config: &'a TermConfig,
    /// External data service for network-backed commands.
    pub network: Option<&'a Arc<dyn DataService>>,
    /// Host resource sampler for `system`.
    pub monitor: Option<&'a dyn SystemMonitor>,
    /// When the session started.
    pub started_at: Instant,
}

/// A single executable command.
pub trait Command {
    /// The command name (what the user types). Lowercase.
    fn name(&self) -> &str;

    /// One-line description for `help`.
    fn description(&self) -> &str;

    /// Usage string (e.g. "theme \[name\]").
    fn usage(&self) -> &str;

    /// Command category for grouping in `help` output.
    fn category(&self) -> &str {
        "General"
    }

    /// Execute the command with the given arguments and environment.
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput>;
}

/// Registry of available commands.
///
/// Built once at startup and read-only afterwards.
pub struct CommandRegistry {
    commands: Vec<Box<dyn Command>>,
    /// Every typable name (canonical and alias) -> index into `commands`.
    index: HashMap<String, usize>,
    /// Typable names in registration order.
    names: Vec<String>,
    aliases: HashMap<String, String>,
}

impl CommandRegistry {
    /// Create an empty command registry.
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            index: HashMap::new(),
            names: Vec::new(),
            aliases: HashMap::new(),
        }
    }

    /// Create a registry holding every built-in command.
    pub fn with_builtins() -> Result<Self> {
        let mut reg = Self::new();
        crate::register_builtins(&mut reg)?;
        Ok(reg)
    }

    /// Register a command. Fails if the name (or an alias) is already taken.
    pub fn register(&mut self, cmd: Box<dyn Command>) -> Result<()> {
        let name = cmd.name().to_lowercase();
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(TermError::Command(format!(
                "invalid command name: {:?}",
                cmd.name()
            )));
        }
        if self.index.contains_key(&name) {
            return Err(TermError::DuplicateCommand(name));
        }
        self.index.insert(name.clone(), self.commands.len());
        self.names.push(name);
        self.commands.push(cmd);
        Ok(())
    }

    /// Make `alias` resolve to the already registered command `target`.
    pub fn alias(&mut self, alias: &str, target: &str) -> Result<()> {
        let alias = alias.to_lowercase();
        let target = target.to_lowercase();
        let Some(&idx) = self.index.get(&target) else {
            return Err(TermError::CommandNotFound(target));
        };
        if self.index.contains_key(&alias) {
            return Err(TermError::DuplicateCommand(alias));
        }
        self.index.insert(alias.clone(), idx);
        self.names.push(alias.clone());
        self.aliases.insert(alias, self.commands[idx].name().to_string());
        Ok(())
    }

    /// Resolve a name (or alias) to its command, ignoring case.
    pub fn lookup(&self, name: &str) -> Result<&dyn Command> {
        let key = name.to_lowercase();
        match self.index.get(&key) {
            Some(&idx) => Ok(self.commands[idx].as_ref()),
            None => Err(TermError::CommandNotFound(key)),
        }
    }

    /// Whether `name` is an alias rather than a canonical command name.
    pub fn is_alias(&self, name: &str) -> bool {
        self.aliases.contains_key(&name.to_lowercase())
    }

    /// Aliases pointing at `target`, in registration order.
    pub fn aliases_of(&self, target: &str) -> Vec<&str> {
        self.names
            .iter()
            .filter(|n| self.aliases.get(n.as_str()).is_some_and(|t| t == target))
            .map(String::as_str)
            .collect()
    }

    /// Commands in `category`, in registration order.
    ///
    /// The iterator is lazy and can be cloned to restart it.
    pub fn list_by_category<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = &'a dyn Command> + Clone + 'a {
        self.commands
            .iter()
            .filter(move |c| c.category() == category)
            .map(|c| -> &'a dyn Command { c.as_ref() })
    }

    /// Distinct categories in order of first registration.
    pub fn categories(&self) -> Vec<&str> {
        let mut cats: Vec<&str> = Vec::new();
        for cmd in &self.commands {
            if !cats.contains(&cmd.category()) {
                cats.push(cmd.category());
            }
        }
        cats
    }

    /// Up to `limit` typable names starting with `partial`, in registration order.
    ///
    /// An empty `partial` yields no suggestions.
    pub fn completions(&self, partial: &str, limit: usize) -> Vec<String> {
        if partial.is_empty() {
            return Vec::new();
        }
        let lower = partial.to_lowercase();
        self.names
            .iter()
            .filter(|name| name.starts_with(&lower))
            .take(limit)
            .cloned()
            .collect()
    }

    /// Return a sorted list of (name, description) pairs of canonical commands.
    pub fn list_commands(&self) -> Vec<(&str, &str)> {
        let mut cmds: Vec<(&str, &str)> = self
            .commands
            .iter()
            .map(|c| (c.name(), c.description()))
            .collect();
        cmds.sort_by_key(|(name, _)| *name);
        cmds
    }

    /// Number of canonical commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tokenizer: whitespace only. No quoting, escaping, or comments.
// ---------------------------------------------------------------------------

/// Split a line into a lowercased command name and its arguments.
///
/// Whitespace-only input yields an empty command and no arguments.
/// Arguments keep their case.
pub fn tokenize(line: &str) -> (String, Vec<String>) {
    let mut words = line.split_whitespace();
    let command = words.next().map(str::to_lowercase).unwrap_or_default();
    let args = words.map(str::to_string).collect();
    (command, args)
}
