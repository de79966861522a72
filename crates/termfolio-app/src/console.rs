//! Plain-text rendering of the prompt and scrollback records.

use std::io::{self, Write};

use termfolio_terminal::HistoryRecord;

/// ANSI: erase screen and home the cursor.
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

pub struct Console<W: Write> {
    out: W,
}

impl<W: Write> Console<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Print the prompt without a newline.
    pub fn prompt(&mut self, prompt: &str) -> io::Result<()> {
        write!(self.out, "{prompt} ")?;
        self.out.flush()
    }

    /// Print a record's rendered output. Empty outputs print nothing.
    pub fn record(&mut self, record: &HistoryRecord) -> io::Result<()> {
        let text = record.output.render();
        if !text.is_empty() {
            writeln!(self.out, "{text}")?;
        }
        self.out.flush()
    }

    pub fn line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")?;
        self.out.flush()
    }

    pub fn clear_screen(&mut self) -> io::Result<()> {
        write!(self.out, "{CLEAR_SCREEN}")?;
        self.out.flush()
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

/// Remove from `waiting` every sequence index whose record has finished
/// loading, and return those records in scrollback order. Indices with no
/// matching record are dropped.
pub fn take_resolved<'a>(records: &'a [HistoryRecord], waiting: &mut Vec<u64>) -> Vec<&'a HistoryRecord> {
    let mut resolved = Vec::new();
    waiting.retain(|&idx| match records.iter().find(|r| r.sequence_index == idx) {
        Some(record) if record.output.is_loading() => true,
        Some(record) => {
            resolved.push(record);
            false
        },
        None => false,
    });
    resolved.sort_by_key(|r| r.sequence_index);
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use termfolio_terminal::{RecordOutput, Scrollback};

    fn written(f: impl FnOnce(&mut Console<Vec<u8>>) -> io::Result<()>) -> String {
        let mut console = Console::new(Vec::new());
        f(&mut console).unwrap();
        String::from_utf8(console.into_inner()).unwrap()
    }

    #[test]
    fn prompt_has_trailing_space() {
        assert_eq!(written(|c| c.prompt("guest@termfolio:~$")), "guest@termfolio:~$ ");
    }

    #[test]
    fn records_render_text_and_skip_empty() {
        let mut sb = Scrollback::new();
        sb.push("echo hi", RecordOutput::Text("hi".into()));
        sb.push("echo", RecordOutput::Empty);
        assert_eq!(written(|c| c.record(&sb.records()[0])), "hi\n");
        assert_eq!(written(|c| c.record(&sb.records()[1])), "");
    }

    #[test]
    fn clear_screen_emits_escape() {
        assert_eq!(written(|c| c.clear_screen()), CLEAR_SCREEN);
    }

    #[test]
    fn take_resolved_keeps_loading_records() {
        let mut sb = Scrollback::new();
        let slow = sb.push("weather paris", RecordOutput::Loading("Loading weather...".into()));
        let fast = sb.push("github", RecordOutput::Loading("Loading GitHub stats...".into()));
        let mut waiting = vec![fast, slow];

        assert!(take_resolved(sb.records(), &mut waiting).is_empty());
        assert_eq!(waiting, vec![fast, slow]);

        let epoch = sb.epoch();
        assert!(sb.resolve(epoch, fast, RecordOutput::Text("stats".into())));
        let done = take_resolved(sb.records(), &mut waiting);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].input, "github");
        assert_eq!(waiting, vec![slow]);
    }

    #[test]
    fn take_resolved_drops_missing_records() {
        let mut sb = Scrollback::new();
        let idx = sb.push("projects", RecordOutput::Loading("Loading projects...".into()));
        sb.truncate();
        let mut waiting = vec![idx];
        assert!(take_resolved(sb.records(), &mut waiting).is_empty());
        assert!(waiting.is_empty());
    }
}
