//! Dispatcher: runs submitted lines against the registry and records results.
//!
//! Deferred commands run on worker threads. Each finished job is posted back
//! over a channel tagged with the scrollback epoch and the record's sequence
//! index; [`Dispatcher::poll`] and [`Dispatcher::wait_pending`] apply them on
//! the caller's thread.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use termfolio_types::config::TermConfig;
use termfolio_types::error::TermError;

use crate::interpreter::{CommandOutput, CommandRegistry, Deferred, Environment, tokenize};
use crate::monitor::{ProcMonitor, SystemMonitor};
use crate::network_commands::DataService;
use crate::scrollback::{HistoryRecord, RecordOutput, Scrollback};
use crate::theme::{ThemeCatalog, ThemeHost};

/// What happened to a submitted line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Empty or whitespace-only line. Nothing was recorded.
    Ignored,
    /// `clear` ran. The scrollback is now empty.
    Cleared,
    /// A record was appended.
    Recorded {
        sequence_index: u64,
        /// The record shows a placeholder until its job reports back.
        pending: bool,
    },
}

/// A finished deferred job on its way back to the scrollback.
#[derive(Debug)]
struct Completion {
    epoch: u64,
    sequence_index: u64,
    output: RecordOutput,
}

/// Executes command lines and owns everything a command can touch.
pub struct Dispatcher {
    registry: CommandRegistry,
    theme: Box<dyn ThemeHost>,
    config: TermConfig,
    network: Option<Arc<dyn DataService>>,
    monitor: Option<Box<dyn SystemMonitor>>,
    started_at: Instant,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
    in_flight: usize,
}

impl Dispatcher {
    /// Dispatcher using the theme catalog described by `config`.
    pub fn new(registry: CommandRegistry, config: TermConfig) -> Self {
        let theme = Box::new(ThemeCatalog::from_config(&config));
        let (tx, rx) = mpsc::channel();
        Self {
            registry,
            theme,
            config,
            network: None,
            monitor: Some(Box::new(ProcMonitor)),
            started_at: Instant::now(),
            tx,
            rx,
            in_flight: 0,
        }
    }

    /// Replace the theme host.
    pub fn with_theme_host(mut self, host: Box<dyn ThemeHost>) -> Self {
        self.theme = host;
        self
    }

    /// Attach the service network commands fetch through.
    pub fn with_network(mut self, network: Arc<dyn DataService>) -> Self {
        self.network = Some(network);
        self
    }

    /// Replace the host resource sampler used by `system`.
    pub fn with_monitor(mut self, monitor: Box<dyn SystemMonitor>) -> Self {
        self.monitor = Some(monitor);
        self
    }

    /// Execute one submitted line.
    ///
    /// The record stores `line` trimmed. Handler errors and panics become the
    /// record's text and never escape.
    pub fn execute(&mut self, line: &str, scrollback: &mut Scrollback) -> Dispatch {
        let (name, args) = tokenize(line);
        if name.is_empty() {
            return Dispatch::Ignored;
        }
        let input = line.trim();
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        log::debug!("Dispatching '{name}' with {} arg(s)", args.len());

        match self.run_command(&name, &args, input, scrollback.records()) {
            CommandOutput::Clear => {
                scrollback.truncate();
                log::debug!("Scrollback cleared (epoch {})", scrollback.epoch());
                Dispatch::Cleared
            },
            CommandOutput::Deferred(deferred) => {
                let placeholder = RecordOutput::Loading(deferred.placeholder.clone());
                let sequence_index = scrollback.push(input, placeholder);
                let pending = self.spawn(&name, deferred, sequence_index, scrollback);
                Dispatch::Recorded {
                    sequence_index,
                    pending,
                }
            },
            CommandOutput::Text(text) => record(scrollback, input, RecordOutput::Text(text)),
            CommandOutput::Table { headers, rows } => {
                record(scrollback, input, RecordOutput::Table { headers, rows })
            },
            CommandOutput::None => record(scrollback, input, RecordOutput::Empty),
        }
    }

    fn run_command(
        &mut self,
        name: &str,
        args: &[&str],
        input: &str,
        records: &[HistoryRecord],
    ) -> CommandOutput {
        let cmd = match self.registry.lookup(name) {
            Ok(cmd) => cmd,
            Err(TermError::CommandNotFound(name)) => {
                return CommandOutput::Text(format!(
                    "Command not found: {name}. Type 'help' for a list of commands."
                ));
            },
            Err(e) => return CommandOutput::Text(format!("{name}: {e}")),
        };
        let mut env = Environment {
            registry: &self.registry,
            input,
            theme: self.theme.as_mut(),
            scrollback: records,
            config: &self.config,
            network: self.network.as_ref(),
            monitor: self.monitor.as_deref(),
            started_at: self.started_at,
        };
        match panic::catch_unwind(AssertUnwindSafe(|| cmd.execute(args, &mut env))) {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                log::warn!("Command '{name}' failed: {e}");
                CommandOutput::Text(format!("{name}: {e}"))
            },
            Err(_) => {
                log::error!("Command '{name}' panicked");
                CommandOutput::Text(format!("{name}: command failed"))
            },
        }
    }

    /// Start `deferred` on a worker thread. Returns whether it is running.
    fn spawn(
        &mut self,
        name: &str,
        deferred: Deferred,
        sequence_index: u64,
        scrollback: &mut Scrollback,
    ) -> bool {
        let epoch = scrollback.epoch();
        let tx = self.tx.clone();
        let job_name = name.to_string();
        let spawned = thread::Builder::new()
            .name(format!("termfolio-{name}"))
            .spawn(move || {
                let output = match panic::catch_unwind(AssertUnwindSafe(|| deferred.run())) {
                    Ok(output) => output,
                    Err(_) => {
                        log::error!("Deferred job for '{job_name}' panicked");
                        RecordOutput::Text(format!("{job_name}: command failed"))
                    },
                };
                // The receiver only disappears with the dispatcher.
                let _ = tx.send(Completion {
                    epoch,
                    sequence_index,
                    output,
                });
            });
        match spawned {
            Ok(_) => {
                self.in_flight += 1;
                true
            },
            Err(e) => {
                log::error!("Failed to start worker for '{name}': {e}");
                scrollback.resolve(
                    epoch,
                    sequence_index,
                    RecordOutput::Text(format!("{name}: command failed")),
                );
                false
            },
        }
    }

    /// Apply every finished job without blocking. Returns how many records
    /// were updated.
    pub fn poll(&mut self, scrollback: &mut Scrollback) -> usize {
        let mut applied = 0;
        while let Ok(done) = self.rx.try_recv() {
            if self.apply(done, scrollback) {
                applied += 1;
            }
        }
        applied
    }

    /// Block until every outstanding job has reported or `timeout` elapses.
    /// Returns how many records were updated.
    pub fn wait_pending(&mut self, scrollback: &mut Scrollback, timeout: Duration) -> usize {
        let deadline = Instant::now() + timeout;
        let mut applied = self.poll(scrollback);
        while self.in_flight > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            match self.rx.recv_timeout(remaining) {
                Ok(done) => {
                    if self.apply(done, scrollback) {
                        applied += 1;
                    }
                },
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        applied
    }

    fn apply(&mut self, done: Completion, scrollback: &mut Scrollback) -> bool {
        self.in_flight = self.in_flight.saturating_sub(1);
        let resolved = scrollback.resolve(done.epoch, done.sequence_index, done.output);
        if !resolved {
            log::warn!(
                "Discarding late result for record {} (epoch {}, current {})",
                done.sequence_index,
                done.epoch,
                scrollback.epoch()
            );
        }
        resolved
    }

    /// Jobs started but not yet reported back.
    pub fn pending(&self) -> usize {
        self.in_flight
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn config(&self) -> &TermConfig {
        &self.config
    }

    pub fn theme(&self) -> &dyn ThemeHost {
        self.theme.as_ref()
    }

    pub fn theme_mut(&mut self) -> &mut dyn ThemeHost {
        self.theme.as_mut()
    }
}

fn record(scrollback: &mut Scrollback, input: &str, output: RecordOutput) -> Dispatch {
    Dispatch::Recorded {
        sequence_index: scrollback.push(input, output),
        pending: false,
    }
}
