//! Scrollback: the ordered record of executed command lines.
//!
//! Records are append-only. The only other mutations are truncation by
//! `clear` and the one-time replacement of a loading placeholder when a
//! deferred command finishes.

use chrono::{DateTime, Local};

/// What a history record displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutput {
    /// Plain text lines.
    Text(String),
    /// Tabular data (header row + data rows).
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    /// Command produced no visible output.
    Empty,
    /// Placeholder shown while a deferred command is still running.
    Loading(String),
}

impl RecordOutput {
    /// Whether this output is still waiting on a deferred job.
    pub fn is_loading(&self) -> bool {
        matches!(self, RecordOutput::Loading(_))
    }

    /// Render as plain text. Table columns are padded to their widest cell.
    pub fn render(&self) -> String {
        match self {
            RecordOutput::Text(text) | RecordOutput::Loading(text) => text.clone(),
            RecordOutput::Empty => String::new(),
            RecordOutput::Table { headers, rows } => render_table(headers, rows),
        }
    }
}

fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let cols = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(cols) {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let fmt_row = |cells: &[String]| -> String {
        let mut line = String::new();
        for (i, &width) in widths.iter().enumerate() {
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            if i + 1 == cols {
                line.push_str(cell);
            } else {
                line.push_str(&format!("{cell:<width$} | "));
            }
        }
        line.trim_end().to_string()
    };

    let mut out = fmt_row(headers);
    for row in rows {
        out.push('\n');
        out.push_str(&fmt_row(row.as_slice()));
    }
    out
}

/// One executed command line and its result.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRecord {
    /// The submitted line, trimmed.
    pub input: String,
    pub output: RecordOutput,
    /// Position since the last truncation, starting at 0.
    pub sequence_index: u64,
    pub timestamp: DateTime<Local>,
}

/// Ordered, append-only list of [`HistoryRecord`]s.
///
/// Every truncation starts a new epoch. Deferred results carry the epoch they
/// were dispatched in, so a result that outlives a `clear` can never land on
/// a newer record that happens to reuse its sequence index.
#[derive(Debug, Default)]
pub struct Scrollback {
    records: Vec<HistoryRecord>,
    epoch: u64,
}

impl Scrollback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record and return its sequence index.
    pub fn push(&mut self, input: impl Into<String>, output: RecordOutput) -> u64 {
        let sequence_index = self.next_index();
        self.records.push(HistoryRecord {
            input: input.into(),
            output,
            sequence_index,
            timestamp: Local::now(),
        });
        sequence_index
    }

    /// Remove every record and start a new epoch.
    pub fn truncate(&mut self) {
        self.records.clear();
        self.epoch += 1;
    }

    /// Replace the loading placeholder of record `sequence_index`.
    ///
    /// Returns `false` (and changes nothing) when the record is gone, belongs
    /// to an older epoch, or has already been resolved.
    pub fn resolve(&mut self, epoch: u64, sequence_index: u64, output: RecordOutput) -> bool {
        if epoch != self.epoch {
            return false;
        }
        let Some(record) = self
            .records
            .iter_mut()
            .find(|r| r.sequence_index == sequence_index)
        else {
            return false;
        };
        if !record.output.is_loading() {
            return false;
        }
        record.output = output;
        true
    }

    fn next_index(&self) -> u64 {
        self.records.last().map_or(0, |r| r.sequence_index + 1)
    }

    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    pub fn get(&self, idx: usize) -> Option<&HistoryRecord> {
        self.records.get(idx)
    }

    pub fn last(&self) -> Option<&HistoryRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Current truncation epoch.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Number of records still showing a loading placeholder.
    pub fn loading_count(&self) -> usize {
        self.records.iter().filter(|r| r.output.is_loading()).count()
    }
}
