//! REPL state machine: input line, scrollback, history recall, completion.
//!
//! "Browsing" and "suggesting" are derived from the fields, not tracked as
//! a separate mode. Every mutation goes through [`Repl::handle_event`] or
//! one of the named transitions it forwards to.

use std::time::Duration;

use termfolio_types::config::TermConfig;
use termfolio_types::error::Result;
use termfolio_types::input::{InputEvent, Key};

use crate::dispatch::{Dispatch, Dispatcher};
use crate::interpreter::CommandRegistry;
use crate::scrollback::{HistoryRecord, Scrollback};
use crate::theme::ThemeHost;

/// Most completion suggestions shown at once.
pub const MAX_SUGGESTIONS: usize = 3;

pub struct Repl {
    dispatcher: Dispatcher,
    scrollback: Scrollback,
    input: String,
    /// Steps back from the newest record; `None` when not browsing.
    history_cursor: Option<usize>,
    suggestions: Vec<String>,
}

impl Repl {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            scrollback: Scrollback::new(),
            input: String::new(),
            history_cursor: None,
            suggestions: Vec::new(),
        }
    }

    /// A session with every built-in command and the configured themes.
    pub fn with_builtins(config: TermConfig) -> Result<Self> {
        let registry = CommandRegistry::with_builtins()?;
        Ok(Self::new(Dispatcher::new(registry, config)))
    }

    /// Apply one input event. Returns the dispatch outcome for submits
    /// that ran a command.
    pub fn handle_event(&mut self, event: InputEvent) -> Option<Dispatch> {
        match event {
            InputEvent::TextInput(c) => self.push_char(c),
            InputEvent::Backspace => self.backspace(),
            InputEvent::SetText(text) => self.set_text(text),
            InputEvent::Key(Key::Enter) => return self.submit(),
            InputEvent::Key(Key::Up) => self.recall_older(),
            InputEvent::Key(Key::Down) => self.recall_newer(),
            InputEvent::Key(Key::Tab) => self.accept_suggestion(),
        }
        None
    }

    // -- text change --------------------------------------------------------

    /// Replace the input line.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.input = text.into();
        self.refresh_suggestions();
    }

    /// Append a typed character. Control characters are ignored.
    pub fn push_char(&mut self, c: char) {
        if c.is_control() {
            return;
        }
        self.input.push(c);
        self.refresh_suggestions();
    }

    pub fn backspace(&mut self) {
        self.input.pop();
        self.refresh_suggestions();
    }

    fn refresh_suggestions(&mut self) {
        self.suggestions = self
            .dispatcher
            .registry()
            .completions(&self.input, MAX_SUGGESTIONS);
    }

    // -- submit -------------------------------------------------------------

    /// Run the input line. A blank line is left in place and nothing runs.
    pub fn submit(&mut self) -> Option<Dispatch> {
        if self.input.trim().is_empty() {
            return None;
        }
        let line = std::mem::take(&mut self.input);
        let outcome = self.dispatcher.execute(&line, &mut self.scrollback);
        self.suggestions.clear();
        self.history_cursor = None;
        Some(outcome)
    }

    // -- recall -------------------------------------------------------------

    /// Step to the next older record. Stops at the oldest one.
    pub fn recall_older(&mut self) {
        let len = self.scrollback.len();
        if len == 0 {
            return;
        }
        let next = self.history_cursor.map_or(0, |c| c + 1);
        if next >= len {
            return;
        }
        self.history_cursor = Some(next);
        self.load_recalled(next);
    }

    /// Step to the next newer record, or back to a blank line past the newest.
    pub fn recall_newer(&mut self) {
        match self.history_cursor {
            Some(0) => {
                self.history_cursor = None;
                self.input.clear();
            },
            Some(c) => {
                self.history_cursor = Some(c - 1);
                self.load_recalled(c - 1);
            },
            None => {},
        }
    }

    fn load_recalled(&mut self, cursor: usize) {
        let idx = self.scrollback.len() - 1 - cursor;
        if let Some(record) = self.scrollback.get(idx) {
            self.input.clone_from(&record.input);
        }
    }

    // -- completion ---------------------------------------------------------

    /// Replace the input with the first suggestion. Does not submit.
    pub fn accept_suggestion(&mut self) {
        if self.suggestions.is_empty() {
            return;
        }
        self.input = self.suggestions.remove(0);
        self.suggestions.clear();
    }

    // -- deferred results ---------------------------------------------------

    /// Apply finished background jobs without blocking.
    pub fn poll(&mut self) -> usize {
        self.dispatcher.poll(&mut self.scrollback)
    }

    /// Block until background jobs finish or `timeout` elapses.
    pub fn wait_pending(&mut self, timeout: Duration) -> usize {
        self.dispatcher.wait_pending(&mut self.scrollback, timeout)
    }

    // -- accessors ----------------------------------------------------------

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    /// Cursor as the classic signed index: -1 when not browsing.
    pub fn history_cursor(&self) -> isize {
        self.history_cursor
            .and_then(|c| isize::try_from(c).ok())
            .unwrap_or(-1)
    }

    pub fn is_browsing(&self) -> bool {
        self.history_cursor.is_some()
    }

    pub fn is_suggesting(&self) -> bool {
        !self.suggestions.is_empty()
    }

    pub fn scrollback(&self) -> &Scrollback {
        &self.scrollback
    }

    pub fn records(&self) -> &[HistoryRecord] {
        self.scrollback.records()
    }

    pub fn prompt(&self) -> &str {
        &self.dispatcher.config().prompt
    }

    pub fn theme(&self) -> &dyn ThemeHost {
        self.dispatcher.theme()
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut Dispatcher {
        &mut self.dispatcher
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repl() -> Repl {
        Repl::with_builtins(TermConfig::default()).unwrap()
    }

    fn submit(repl: &mut Repl, line: &str) -> Option<Dispatch> {
        repl.set_text(line);
        repl.submit()
    }

    #[test]
    fn starts_idle() {
        let r = repl();
        assert_eq!(r.input(), "");
        assert_eq!(r.history_cursor(), -1);
        assert!(r.suggestions().is_empty());
        assert!(r.records().is_empty());
        assert!(!r.is_browsing());
        assert!(!r.is_suggesting());
        assert_eq!(r.prompt(), "guest@termfolio:~$");
    }

    #[test]
    fn typing_updates_suggestions() {
        let mut r = repl();
        r.handle_event(InputEvent::TextInput('h'));
        assert_eq!(r.input(), "h");
        assert_eq!(r.suggestions(), ["help", "history"]);
        r.handle_event(InputEvent::TextInput('E'));
        assert_eq!(r.suggestions(), ["help"]);
        r.handle_event(InputEvent::Backspace);
        r.handle_event(InputEvent::Backspace);
        assert_eq!(r.input(), "");
        assert!(r.suggestions().is_empty());
    }

    #[test]
    fn suggestions_are_capped() {
        let mut r = repl();
        r.set_text("w");
        assert_eq!(r.suggestions(), ["welcome", "whoami", "weather"]);
        r.set_text("W");
        assert_eq!(r.suggestions().len(), MAX_SUGGESTIONS);
    }

    #[test]
    fn control_chars_are_not_typed() {
        let mut r = repl();
        r.handle_event(InputEvent::TextInput('\u{7}'));
        assert_eq!(r.input(), "");
    }

    #[test]
    fn tab_accepts_first_suggestion_without_submitting() {
        let mut r = repl();
        r.set_text("th");
        assert_eq!(r.handle_event(InputEvent::Key(Key::Tab)), None);
        assert_eq!(r.input(), "theme");
        assert!(r.suggestions().is_empty());
        assert!(r.records().is_empty());
    }

    #[test]
    fn tab_without_suggestions_is_noop() {
        let mut r = repl();
        r.set_text("zz");
        r.accept_suggestion();
        assert_eq!(r.input(), "zz");
    }

    #[test]
    fn blank_submit_is_noop() {
        let mut r = repl();
        r.set_text("   ");
        assert_eq!(r.handle_event(InputEvent::Key(Key::Enter)), None);
        assert_eq!(r.input(), "   ");
        assert!(r.records().is_empty());
    }

    #[test]
    fn submit_resets_line_state() {
        let mut r = repl();
        submit(&mut r, "echo one");
        r.recall_older();
        r.set_text("ec");
        assert!(r.is_browsing());
        assert!(r.is_suggesting());
        let out = r.handle_event(InputEvent::Key(Key::Enter));
        assert!(matches!(out, Some(Dispatch::Recorded { .. })));
        assert_eq!(r.input(), "");
        assert!(r.suggestions().is_empty());
        assert_eq!(r.history_cursor(), -1);
    }

    #[test]
    fn text_change_keeps_cursor() {
        let mut r = repl();
        submit(&mut r, "whoami");
        r.recall_older();
        r.push_char('!');
        assert_eq!(r.history_cursor(), 0);
        assert_eq!(r.input(), "whoami!");
    }

    #[test]
    fn recall_walks_back_and_forward() {
        let mut r = repl();
        for line in ["echo a", "echo b", "echo c"] {
            submit(&mut r, line);
        }
        r.handle_event(InputEvent::Key(Key::Up));
        assert_eq!(r.input(), "echo c");
        r.handle_event(InputEvent::Key(Key::Up));
        assert_eq!(r.input(), "echo b");
        r.handle_event(InputEvent::Key(Key::Down));
        assert_eq!(r.input(), "echo c");
        assert_eq!(r.history_cursor(), 0);
        r.handle_event(InputEvent::Key(Key::Down));
        assert_eq!(r.input(), "");
        assert_eq!(r.history_cursor(), -1);
        r.handle_event(InputEvent::Key(Key::Down));
        assert_eq!(r.history_cursor(), -1);
    }

    #[test]
    fn recall_on_empty_scrollback_is_noop() {
        let mut r = repl();
        r.set_text("draft");
        r.recall_older();
        assert_eq!(r.input(), "draft");
        assert_eq!(r.history_cursor(), -1);
    }

    #[test]
    fn clear_resets_cursor() {
        let mut r = repl();
        submit(&mut r, "echo a");
        submit(&mut r, "echo b");
        r.recall_older();
        r.set_text("clear");
        assert_eq!(r.submit(), Some(Dispatch::Cleared));
        assert!(r.records().is_empty());
        assert_eq!(r.history_cursor(), -1);
        r.recall_older();
        assert_eq!(r.history_cursor(), -1);
    }

    #[test]
    fn theme_is_visible_through_repl() {
        let mut r = repl();
        submit(&mut r, "theme solarized");
        assert_eq!(r.theme().current(), "solarized");
    }
}
