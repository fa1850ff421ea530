//! Append-only JSONL journal of notified alerts and their outcomes.
//!
//! Each line is one [`JournalEntry`], tagged by `kind`. Outcome lines are
//! re-appended as checkpoints settle; readers keep the last one per alert.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::{ScoredResult, SignalOutcome};
use crate::error::Result;
use crate::port::outbound::journal::SignalJournal;

pub const DEFAULT_JOURNAL_PATH: &str = "data/signals.jsonl";

/// A notified alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalRecord {
    pub id: Uuid,
    pub recorded_at: DateTime<Utc>,
    pub result: ScoredResult,
}

impl JournalRecord {
    #[must_use]
    pub fn new(result: ScoredResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            recorded_at: Utc::now(),
            result,
        }
    }
}

/// Outcome state of an alert at `recorded_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeRecord {
    pub recorded_at: DateTime<Utc>,
    pub outcome: SignalOutcome,
}

/// One line of the journal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JournalEntry {
    Alert(JournalRecord),
    Outcome(OutcomeRecord),
}

impl JournalEntry {
    #[must_use]
    pub const fn as_alert(&self) -> Option<&JournalRecord> {
        match self {
            Self::Alert(record) => Some(record),
            Self::Outcome(_) => None,
        }
    }

    #[must_use]
    pub const fn as_outcome(&self) -> Option<&OutcomeRecord> {
        match self {
            Self::Outcome(record) => Some(record),
            Self::Alert(_) => None,
        }
    }

    /// Parse a line, accepting untagged alert records from older journals.
    fn parse(line: &str) -> serde_json::Result<Self> {
        serde_json::from_str::<Self>(line)
            .or_else(|e| serde_json::from_str::<JournalRecord>(line).map(Self::Alert).map_err(|_| e))
    }
}

/// File-backed journal. Writes are serialized by an internal lock.
pub struct JsonlJournal {
    path: PathBuf,
    file: Mutex<File>,
}

impl JsonlJournal {
    /// Open `path` for appending, creating it and its parent directories.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        debug!(path = %path.display(), "Signal journal opened");
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, entry: &JournalEntry) -> Result<()> {
        let mut line = serde_json::to_string(entry)?;
        line.push('\n');

        let mut file = self.file.lock();
        file.write_all(line.as_bytes())?;
        file.flush()?;
        Ok(())
    }
}

impl SignalJournal for JsonlJournal {
    fn record(&self, result: &ScoredResult) -> Result<Uuid> {
        let record = JournalRecord::new(result.clone());
        let id = record.id;
        self.append(&JournalEntry::Alert(record))?;
        Ok(id)
    }

    fn record_outcome(&self, outcome: &SignalOutcome) -> Result<()> {
        self.append(&JournalEntry::Outcome(OutcomeRecord {
            recorded_at: Utc::now(),
            outcome: outcome.clone(),
        }))
    }
}

/// Read every parsable entry from `path`, in file order.
///
/// Blank lines are ignored; malformed lines are skipped with a warning.
pub fn read_all(path: &Path) -> Result<Vec<JournalEntry>> {
    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match JournalEntry::parse(&line) {
            Ok(entry) => records.push(entry),
            Err(e) => warn!(
                path = %path.display(),
                line = index + 1,
                error = %e,
                "Skipping malformed journal line"
            ),
        }
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::domain::scored;

    #[test]
    fn records_append_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/signals.jsonl");

        let journal = JsonlJournal::open(&path).unwrap();
        journal.record(&scored("PEPEUSDT", 82.0, 3)).unwrap();
        journal.record(&scored("WIFUSDT", 70.0, 2)).unwrap();

        let entries = read_all(&path).unwrap();
        let records: Vec<_> = entries.iter().filter_map(JournalEntry::as_alert).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].result.symbol, "PEPEUSDT");
        assert_eq!(records[1].result.signals.len(), 2);
        assert_ne!(records[0].id, records[1].id);
    }

    #[test]
    fn outcomes_reference_the_alert_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("signals.jsonl");
        let journal = JsonlJournal::open(&path).unwrap();

        let id = journal.record(&scored("PEPEUSDT", 82.0, 1)).unwrap();
        let mut outcome = SignalOutcome::new(id, "PEPEUSDT", 1.0, Utc::now());
        outcome.record(crate::domain::Checkpoint::M5, 1.05, Utc::now(), 3.0);
        journal.record_outcome(&outcome).unwrap();

        let entries = read_all(&path).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].as_alert().unwrap().id, id);
        let stored = &entries[1].as_outcome().unwrap().outcome;
        assert_eq!(stored, &outcome);

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.lines().next().unwrap().contains("\"kind\":\"alert\""));
        assert!(raw.lines().nth(1).unwrap().contains("\"kind\":\"outcome\""));
    }

    #[test]
    fn untagged_alert_lines_still_parse() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("signals.jsonl");
        let legacy = JournalRecord::new(scored("WIFUSDT", 70.0, 1));
        fs::write(&path, format!("{}\n", serde_json::to_string(&legacy).unwrap())).unwrap();

        let entries = read_all(&path).unwrap();
        assert_eq!(entries, vec![JournalEntry::Alert(legacy)]);
    }

    #[test]
    fn reopening_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("signals.jsonl");

        JsonlJournal::open(&path)
            .unwrap()
            .record(&scored("A", 70.0, 1))
            .unwrap();
        JsonlJournal::open(&path)
            .unwrap()
            .record(&scored("B", 70.0, 1))
            .unwrap();

        assert_eq!(read_all(&path).unwrap().len(), 2);
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("signals.jsonl");
        let journal = JsonlJournal::open(&path).unwrap();
        journal.record(&scored("A", 70.0, 1)).unwrap();
        {
            let mut file = OpenOptions::new().append(true).open(&path).unwrap();
            writeln!(file, "{{not json").unwrap();
            writeln!(file).unwrap();
        }
        journal.record(&scored("B", 75.0, 1)).unwrap();

        let symbols: Vec<_> = read_all(&path)
            .unwrap()
            .iter()
            .filter_map(JournalEntry::as_alert)
            .map(|r| r.result.symbol.clone())
            .collect();
        assert_eq!(symbols, vec!["A", "B"]);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_all(&dir.path().join("absent.jsonl")).unwrap_err();
        assert!(matches!(err, crate::error::Error::Io(_)));
    }
}
