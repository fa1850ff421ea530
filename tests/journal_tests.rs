use std::fs::OpenOptions;
use std::io::Write;

use chrono::Utc;
use pumpwatch::adapter::outbound::journal::{read_all, JournalEntry, JournalSummary, JsonlJournal};
use pumpwatch::domain::{Checkpoint, SignalOutcome};
use pumpwatch::port::SignalJournal;
use pumpwatch::testkit::domain::scored;

#[test]
fn journal_appends_across_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("signals.jsonl");

    {
        let journal = JsonlJournal::open(&path).expect("open");
        journal.record(&scored("PEPEUSDT", 88.0, 3)).expect("record");
    }
    let journal = JsonlJournal::open(&path).expect("reopen");
    journal.record(&scored("WIFUSDT", 72.0, 2)).expect("record");
    journal.record(&scored("PEPEUSDT", 91.0, 4)).expect("record");

    let entries = read_all(&path).expect("read");
    let records: Vec<_> = entries.iter().filter_map(JournalEntry::as_alert).collect();
    let symbols: Vec<_> = records.iter().map(|r| r.result.symbol.as_str()).collect();
    assert_eq!(symbols, ["PEPEUSDT", "WIFUSDT", "PEPEUSDT"]);
    assert_ne!(records[0].id, records[2].id);
}

#[test]
fn summary_survives_corrupt_lines() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("signals.jsonl");
    let journal = JsonlJournal::open(&path).expect("open");
    journal.record(&scored("PEPEUSDT", 80.0, 1)).expect("record");

    let mut file = OpenOptions::new().append(true).open(&path).expect("append");
    writeln!(file, "{{not json").expect("write");
    writeln!(file).expect("write");
    drop(file);
    journal.record(&scored("PEPEUSDT", 90.0, 1)).expect("record");

    let entries = read_all(&path).expect("read");
    assert_eq!(entries.len(), 2);

    let summary = JournalSummary::from_entries(&entries);
    assert_eq!(summary.alerts, 2);
    assert!((summary.average_score - 85.0).abs() < 1e-9);
    assert_eq!(summary.top_symbols(5), vec![("PEPEUSDT", 2)]);
}

#[test]
fn outcome_updates_feed_the_summary() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("signals.jsonl");
    let journal = JsonlJournal::open(&path).expect("open");

    let winner = journal.record(&scored("PEPEUSDT", 90.0, 2)).expect("record");
    let loser = journal.record(&scored("WIFUSDT", 70.0, 1)).expect("record");
    let untracked = journal.record(&scored("DOGEUSDT", 66.0, 1)).expect("record");

    let now = Utc::now();
    let mut up = SignalOutcome::new(winner, "PEPEUSDT", 1.0, now);
    up.record(Checkpoint::M5, 1.02, now, 3.0);
    journal.record_outcome(&up).expect("outcome");
    up.record(Checkpoint::H1, 1.08, now, 3.0);
    journal.record_outcome(&up).expect("outcome");

    let mut down = SignalOutcome::new(loser, "WIFUSDT", 1.0, now);
    down.record(Checkpoint::H1, 0.97, now, 3.0);
    journal.record_outcome(&down).expect("outcome");

    let entries = read_all(&path).expect("read");
    assert_eq!(entries.len(), 6);

    let summary = JournalSummary::from_entries(&entries);
    assert_eq!(summary.alerts, 3);
    assert_eq!(summary.outcomes.tracked, 2);
    assert_eq!(summary.outcomes.overall.completed, 2);
    assert_eq!(summary.outcomes.overall.successful, 1);
    assert_eq!(summary.outcomes.best[0].symbol, "PEPEUSDT");
    assert!((summary.outcomes.best[0].change_pct - 8.0).abs() < 1e-6);
    assert_eq!(summary.outcomes.worst[0].symbol, "WIFUSDT");
    assert!(entries
        .iter()
        .filter_map(JournalEntry::as_outcome)
        .all(|o| o.outcome.alert_id != untracked));
}
