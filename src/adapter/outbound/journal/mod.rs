//! JSON-lines signal journal.
//!
//! Implements the `port::SignalJournal` trait with an append-only file and
//! provides the read side used by the `report` command and by outcome
//! tracking on restart.

mod jsonl;
mod report;

pub use jsonl::{read_all, JournalEntry, JournalRecord, JsonlJournal, OutcomeRecord, DEFAULT_JOURNAL_PATH};
pub use report::{
    latest_outcomes, pending_outcomes, HitRate, Highlight, JournalSummary, OutcomeSummary,
    MIN_BREAKDOWN_SAMPLE,
};
