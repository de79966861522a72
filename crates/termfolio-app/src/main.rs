//! termfolio line-mode entry point.
//!
//! Reads one line at a time from stdin, feeds it to the REPL as a text
//! change followed by Enter, and prints each new record. Background jobs
//! are awaited for a while; ones that outlast the wait are printed before a
//! later prompt once they finish. Ctrl-D quits.

mod console;

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use console::{Console, take_resolved};
use termfolio_terminal::{Dispatch, Repl, welcome_text};
use termfolio_types::config::TermConfig;
use termfolio_types::input::{InputEvent, Key};

/// Environment variable naming the config file when no argument is given.
const ENV_CONFIG: &str = "TERMFOLIO_CONFIG";

/// How long to wait on network-backed commands before giving the prompt back.
const JOB_TIMEOUT: Duration = Duration::from_secs(15);

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    set_panic_hook();

    let config = load_config()?;
    log::info!("Starting termfolio for {}", config.github_username);

    let mut repl = Repl::with_builtins(config).context("registering commands")?;
    log::info!(
        "Registered {} commands, theme '{}'",
        repl.dispatcher().registry().len(),
        repl.theme().current()
    );
    log::warn!("No network service configured; github, projects and weather are unavailable");

    let stdout = io::stdout();
    let mut console = Console::new(stdout.lock());
    console.line(&welcome_text())?;

    // Records still loading after their wait timed out.
    let mut waiting: Vec<u64> = Vec::new();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        if !waiting.is_empty() {
            repl.poll();
            for record in take_resolved(repl.records(), &mut waiting) {
                console.record(record)?;
            }
        }
        console.prompt(repl.prompt())?;
        let Some(line) = lines.next() else {
            console.line("")?;
            break;
        };
        let line = line.context("reading stdin")?;

        repl.handle_event(InputEvent::SetText(line));
        match repl.handle_event(InputEvent::Key(Key::Enter)) {
            None | Some(Dispatch::Ignored) => {},
            Some(Dispatch::Cleared) => {
                // Indices restart after a clear; old jobs are discarded.
                waiting.clear();
                console.clear_screen()?;
            },
            Some(Dispatch::Recorded {
                sequence_index,
                pending,
            }) => {
                if let Some(record) = repl.records().last() {
                    console.record(record)?;
                }
                if pending {
                    waiting.push(sequence_index);
                    repl.wait_pending(JOB_TIMEOUT);
                    for record in take_resolved(repl.records(), &mut waiting) {
                        console.record(record)?;
                    }
                    if waiting.contains(&sequence_index) {
                        console.line("(still loading, will print when ready)")?;
                    }
                }
            },
        }
    }
    log::info!("Session ended after {} records", repl.records().len());
    Ok(())
}

/// Route panic messages through the logger instead of raw stderr.
fn set_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        log::error!("{info}");
    }));
}

/// Config from the first CLI argument, then `TERMFOLIO_CONFIG`, else defaults.
/// Environment overrides apply in every case.
fn load_config() -> Result<TermConfig> {
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var(ENV_CONFIG).ok())
        .map(PathBuf::from);
    let mut config = match path {
        Some(path) => TermConfig::load(&path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => TermConfig::default(),
    };
    config.apply_env_overrides();
    Ok(config)
}
