//! Aggregates over journal entries for the `report` command.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{DateTime, Duration, Timelike, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::jsonl::{JournalEntry, JournalRecord};
use crate::domain::{Checkpoint, Confidence, SignalOutcome};

/// Breakdowns with fewer completed alerts than this are not worth printing.
pub const MIN_BREAKDOWN_SAMPLE: usize = 3;

/// How many best and worst alerts are kept.
const HIGHLIGHTS: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JournalSummary {
    pub alerts: usize,
    pub average_score: f64,
    pub first_at: Option<DateTime<Utc>>,
    pub last_at: Option<DateTime<Utc>>,
    /// Alerts per symbol.
    pub by_symbol: BTreeMap<String, usize>,
    /// Occurrences of each signal type across all alerts.
    pub by_signal: BTreeMap<String, usize>,
    pub outcomes: OutcomeSummary,
}

/// Completed alerts and how many of them reached the success threshold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HitRate {
    pub completed: usize,
    pub successful: usize,
}

impl HitRate {
    fn add(&mut self, success: bool) {
        self.completed += 1;
        if success {
            self.successful += 1;
        }
    }

    /// Success rate in percent; 0 when nothing completed.
    #[must_use]
    pub fn rate_pct(&self) -> f64 {
        if self.completed == 0 {
            0.0
        } else {
            self.successful as f64 / self.completed as f64 * 100.0
        }
    }
}

/// One alert singled out for its best gain or worst loss.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Highlight {
    pub symbol: String,
    pub score: f64,
    pub confidence: Confidence,
    pub entry_price: f64,
    pub alerted_at: DateTime<Utc>,
    /// `max_gain` for the best list, `max_loss` for the worst.
    pub change_pct: f64,
}

/// What happened after the alerts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OutcomeSummary {
    /// Alerts with at least one outcome entry.
    pub tracked: usize,
    /// Alerts whose 1h checkpoint was sampled.
    pub overall: HitRate,
    pub avg_change_1h: Option<f64>,
    pub avg_change_4h: Option<f64>,
    pub avg_max_gain: Option<f64>,
    pub avg_max_loss: Option<f64>,
    pub best: Vec<Highlight>,
    pub worst: Vec<Highlight>,
    pub by_confidence: BTreeMap<String, HitRate>,
    /// Each signal type counts once per alert.
    pub by_signal: BTreeMap<String, HitRate>,
    /// Keyed by UTC hour of the alert.
    pub by_hour: BTreeMap<u32, HitRate>,
}

impl OutcomeSummary {
    /// Signal types with at least `min_completed` completed alerts, best
    /// rate first.
    #[must_use]
    pub fn reliable_signals(&self, min_completed: usize) -> Vec<(&str, HitRate)> {
        let mut rows: Vec<_> = self
            .by_signal
            .iter()
            .filter(|(_, hit)| hit.completed >= min_completed)
            .map(|(name, hit)| (name.as_str(), *hit))
            .collect();
        rows.sort_by(|a, b| {
            b.1.rate_pct()
                .total_cmp(&a.1.rate_pct())
                .then_with(|| a.0.cmp(b.0))
        });
        rows
    }
}

impl JournalSummary {
    #[must_use]
    pub fn from_entries(entries: &[JournalEntry]) -> Self {
        let records: Vec<&JournalRecord> = entries.iter().filter_map(JournalEntry::as_alert).collect();
        let outcomes = latest_outcomes(entries);

        let mut summary = Self::from_alerts(&records);
        summary.outcomes = summarize_outcomes(&records, &outcomes);
        summary
    }

    #[must_use]
    pub fn from_records(records: &[JournalRecord]) -> Self {
        Self::from_alerts(&records.iter().collect::<Vec<_>>())
    }

    fn from_alerts(records: &[&JournalRecord]) -> Self {
        let mut summary = Self {
            alerts: records.len(),
            ..Self::default()
        };
        if records.is_empty() {
            return summary;
        }

        let mut total = 0.0;
        for record in records {
            let result = &record.result;
            total += result.score;
            *summary.by_symbol.entry(result.symbol.clone()).or_default() += 1;
            for signal in &result.signals {
                *summary
                    .by_signal
                    .entry(signal.signal_type.as_str().to_string())
                    .or_default() += 1;
            }
        }
        summary.average_score = total / records.len() as f64;
        summary.first_at = records.iter().map(|r| r.recorded_at).min();
        summary.last_at = records.iter().map(|r| r.recorded_at).max();
        summary
    }

    /// Symbols with the most alerts, ties broken alphabetically.
    #[must_use]
    pub fn top_symbols(&self, limit: usize) -> Vec<(&str, usize)> {
        let mut symbols: Vec<_> = self
            .by_symbol
            .iter()
            .map(|(symbol, count)| (symbol.as_str(), *count))
            .collect();
        symbols.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        symbols.truncate(limit);
        symbols
    }
}

/// Last outcome entry per alert id.
#[must_use]
pub fn latest_outcomes(entries: &[JournalEntry]) -> HashMap<Uuid, &SignalOutcome> {
    entries
        .iter()
        .filter_map(JournalEntry::as_outcome)
        .map(|record| (record.outcome.alert_id, &record.outcome))
        .collect()
}

/// Alerts younger than `horizon` whose outcome is not complete yet, with
/// their latest known state.
#[must_use]
pub fn pending_outcomes(
    entries: &[JournalEntry],
    now: DateTime<Utc>,
    horizon: Duration,
) -> Vec<SignalOutcome> {
    let latest = latest_outcomes(entries);
    entries
        .iter()
        .filter_map(JournalEntry::as_alert)
        .filter(|record| now - record.recorded_at < horizon)
        .map(|record| match latest.get(&record.id) {
            Some(outcome) => (*outcome).clone(),
            None => SignalOutcome::new(
                record.id,
                record.result.symbol.clone(),
                record.result.last_price,
                record.recorded_at,
            ),
        })
        .filter(|outcome| !outcome.is_complete())
        .collect()
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

fn summarize_outcomes(
    records: &[&JournalRecord],
    outcomes: &HashMap<Uuid, &SignalOutcome>,
) -> OutcomeSummary {
    let tracked: Vec<(&JournalRecord, &SignalOutcome)> = records
        .iter()
        .filter_map(|record| outcomes.get(&record.id).map(|outcome| (*record, *outcome)))
        .collect();

    let mut summary = OutcomeSummary {
        tracked: tracked.len(),
        avg_change_1h: mean(tracked.iter().filter_map(|(_, o)| o.change_at(Checkpoint::H1))),
        avg_change_4h: mean(tracked.iter().filter_map(|(_, o)| o.change_at(Checkpoint::H4))),
        avg_max_gain: mean(tracked.iter().filter_map(|(_, o)| o.max_gain)),
        avg_max_loss: mean(tracked.iter().filter_map(|(_, o)| o.max_loss)),
        ..OutcomeSummary::default()
    };

    for (record, outcome) in &tracked {
        let Some(success) = outcome.success else {
            continue;
        };
        let result = &record.result;
        summary.overall.add(success);
        summary
            .by_confidence
            .entry(result.confidence.as_str().to_string())
            .or_default()
            .add(success);
        let types: BTreeSet<&str> = result.signals.iter().map(|s| s.signal_type.as_str()).collect();
        for signal_type in types {
            summary
                .by_signal
                .entry(signal_type.to_string())
                .or_default()
                .add(success);
        }
        summary
            .by_hour
            .entry(outcome.alerted_at.hour())
            .or_default()
            .add(success);
    }

    let highlight = |(record, outcome): &(&JournalRecord, &SignalOutcome), change_pct: f64| Highlight {
        symbol: record.result.symbol.clone(),
        score: record.result.score,
        confidence: record.result.confidence,
        entry_price: outcome.entry_price,
        alerted_at: outcome.alerted_at,
        change_pct,
    };

    let mut best: Vec<Highlight> = tracked
        .iter()
        .filter_map(|pair| pair.1.max_gain.map(|gain| highlight(pair, gain)))
        .collect();
    best.sort_by(|a, b| b.change_pct.total_cmp(&a.change_pct));
    best.truncate(HIGHLIGHTS);

    let mut worst: Vec<Highlight> = tracked
        .iter()
        .filter_map(|pair| pair.1.max_loss.map(|loss| highlight(pair, loss)))
        .collect();
    worst.sort_by(|a, b| a.change_pct.total_cmp(&b.change_pct));
    worst.truncate(HIGHLIGHTS);

    summary.best = best;
    summary.worst = worst;
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::journal::jsonl::OutcomeRecord;
    use crate::domain::SignalType;
    use crate::testkit::domain::{scored, signal};

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn alert(symbol: &str, score: f64, at: DateTime<Utc>) -> JournalRecord {
        let mut record = JournalRecord::new(scored(symbol, score, 1));
        record.recorded_at = at;
        record
    }

    /// Outcome for `record` with the given price path (entry 1.0).
    fn outcome(record: &JournalRecord, prices: &[(Checkpoint, f64)]) -> JournalEntry {
        let mut outcome = SignalOutcome::new(record.id, &record.result.symbol, 1.0, record.recorded_at);
        for (checkpoint, price) in prices {
            outcome.record(*checkpoint, *price, record.recorded_at, 3.0);
        }
        JournalEntry::Outcome(OutcomeRecord {
            recorded_at: record.recorded_at,
            outcome,
        })
    }

    #[test]
    fn empty_journal_summary() {
        let summary = JournalSummary::from_entries(&[]);
        assert_eq!(summary.alerts, 0);
        assert_eq!(summary.average_score, 0.0);
        assert!(summary.first_at.is_none());
        assert_eq!(summary.outcomes, OutcomeSummary::default());
    }

    #[test]
    fn summary_counts_symbols_and_signal_types() {
        let records = vec![
            JournalRecord::new(scored("PEPEUSDT", 80.0, 2)),
            JournalRecord::new(scored("PEPEUSDT", 70.0, 1)),
            JournalRecord::new(scored("WIFUSDT", 90.0, 3)),
        ];
        let summary = JournalSummary::from_records(&records);

        assert_eq!(summary.alerts, 3);
        assert_eq!(summary.average_score, 80.0);
        assert_eq!(summary.by_symbol["PEPEUSDT"], 2);
        assert_eq!(summary.by_signal["VOLUME_SPIKE"], 6);
        assert_eq!(summary.top_symbols(1), vec![("PEPEUSDT", 2)]);
        assert!(summary.first_at <= summary.last_at);
    }

    #[test]
    fn outcome_stats_use_latest_entry_per_alert() {
        let a = alert("PEPEUSDT", 90.0, t0());
        let b = alert("WIFUSDT", 70.0, t0() + Duration::hours(1));
        let c = alert("DOGEUSDT", 66.0, t0() + Duration::hours(2));
        let entries = vec![
            JournalEntry::Alert(a.clone()),
            JournalEntry::Alert(b.clone()),
            JournalEntry::Alert(c.clone()),
            outcome(&a, &[(Checkpoint::M5, 1.02)]),
            outcome(&a, &[(Checkpoint::M5, 1.02), (Checkpoint::H1, 1.10), (Checkpoint::H4, 1.20)]),
            outcome(&b, &[(Checkpoint::M5, 0.95), (Checkpoint::H1, 0.99)]),
        ];

        let summary = JournalSummary::from_entries(&entries);
        let outcomes = &summary.outcomes;

        assert_eq!(summary.alerts, 3);
        assert_eq!(outcomes.tracked, 2);
        assert_eq!(outcomes.overall, HitRate { completed: 2, successful: 1 });
        assert!((outcomes.overall.rate_pct() - 50.0).abs() < 1e-9);
        assert!((outcomes.avg_change_1h.unwrap() - 4.5).abs() < 1e-6);
        assert!((outcomes.avg_change_4h.unwrap() - 20.0).abs() < 1e-6);
        assert!((outcomes.avg_max_gain.unwrap() - 9.5).abs() < 1e-6);
        assert!((outcomes.avg_max_loss.unwrap() + 1.5).abs() < 1e-6);

        assert_eq!(outcomes.best[0].symbol, "PEPEUSDT");
        assert!((outcomes.best[0].change_pct - 20.0).abs() < 1e-6);
        assert_eq!(outcomes.worst[0].symbol, "WIFUSDT");
        assert!((outcomes.worst[0].change_pct + 5.0).abs() < 1e-6);

        assert_eq!(outcomes.by_confidence["VERY_HIGH"].successful, 1);
        assert_eq!(outcomes.by_confidence["MEDIUM"].successful, 0);
        assert_eq!(outcomes.by_hour.len(), 2);
        assert_eq!(outcomes.by_hour[&t0().hour()].completed, 1);
    }

    #[test]
    fn signal_breakdown_counts_each_type_once_per_alert() {
        let mut entries = Vec::new();
        for (i, price) in [1.05, 1.04, 0.98].into_iter().enumerate() {
            let mut record = alert("PEPEUSDT", 80.0, t0() + Duration::minutes(i as i64));
            record
                .result
                .signals
                .push(signal("PEPEUSDT", SignalType::StrongBuyPressure, 60.0));
            entries.push(outcome(&record, &[(Checkpoint::H1, price)]));
            entries.push(JournalEntry::Alert(record));
        }
        let lone = alert("WIFUSDT", 80.0, t0());
        entries.push(outcome(&lone, &[(Checkpoint::H1, 1.5)]));
        entries.push(JournalEntry::Alert(lone));

        let outcomes = JournalSummary::from_entries(&entries).outcomes;
        assert_eq!(outcomes.by_signal["VOLUME_SPIKE"], HitRate { completed: 4, successful: 3 });
        assert_eq!(
            outcomes.by_signal["STRONG_BUY_PRESSURE"],
            HitRate { completed: 3, successful: 2 }
        );

        let reliable = outcomes.reliable_signals(MIN_BREAKDOWN_SAMPLE);
        assert_eq!(reliable[0].0, "VOLUME_SPIKE");
        assert_eq!(reliable.len(), 2);
        assert!(outcomes.reliable_signals(4).iter().all(|(name, _)| *name == "VOLUME_SPIKE"));
    }

    #[test]
    fn pending_outcomes_resume_open_alerts() {
        let fresh = alert("PEPEUSDT", 80.0, t0());
        let stale = alert("WIFUSDT", 80.0, t0() - Duration::hours(30));
        let partial = alert("DOGEUSDT", 80.0, t0() - Duration::minutes(20));
        let entries = vec![
            JournalEntry::Alert(fresh.clone()),
            JournalEntry::Alert(stale),
            JournalEntry::Alert(partial.clone()),
            outcome(&partial, &[(Checkpoint::M5, 1.1), (Checkpoint::M15, 1.2)]),
        ];

        let pending = pending_outcomes(&entries, t0() + Duration::minutes(1), Duration::hours(25));
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].alert_id, fresh.id);
        assert!(pending[0].samples.is_empty());
        assert_eq!(pending[0].entry_price, fresh.result.last_price);
        assert_eq!(pending[1].alert_id, partial.id);
        assert_eq!(pending[1].samples.len(), 2);
    }
}
