//! Command interpreter and REPL engine for termfolio.
//!
//! The terminal is a registry-based dispatch system. Commands implement the
//! `Command` trait and are registered by name. The dispatcher tokenizes a
//! submitted line, resolves the command name, runs `execute()` and appends
//! the result to the scrollback. The `Repl` owns the input line, history
//! recall and tab completion on top of that.

mod commands;
mod dispatch;
mod interpreter;
pub mod monitor;
pub mod network_commands;
mod profile_commands;
mod repl;
pub mod scrollback;
pub mod theme;


/// Usage text printed by `echo --help`.
pub use commands::ECHO_USAGE;
/// Register all built-in commands (general, profile, network) into a registry.
pub use commands::register_builtins;
/// What happened to a submitted line.
pub use dispatch::Dispatch;
/// Runs submitted lines and applies finished background jobs.
pub use dispatch::Dispatcher;
/// A single executable command trait.
pub use interpreter::Command;
/// Output produced by a command (text, table, signals, deferred jobs).
pub use interpreter::CommandOutput;
/// Registry of available commands with aliases and categories.
pub use interpreter::CommandRegistry;
/// Background work returned by a command.
pub use interpreter::Deferred;
/// Ambient state passed to every command.
pub use interpreter::Environment;
/// Whitespace tokenizer.
pub use interpreter::tokenize;
/// Host resource sampling for `system`.
pub use monitor::{ProcMonitor, SystemMonitor, SystemStats};
/// External data transport supplied by the host.
pub use network_commands::{DataService, FetchError, HttpResponse};
/// Greeting shown at session start.
pub use profile_commands::welcome_text;
/// The REPL state machine.
pub use repl::{MAX_SUGGESTIONS, Repl};
pub use scrollback::{HistoryRecord, RecordOutput, Scrollback};
pub use theme::{ThemeCatalog, ThemeHost};
