// src/poll/mod.rs

use chrono::{DateTime, Local};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{
    fetch::CsvSource,
    process::{parse_csv, Record, RecordSet},
};

mod run;

pub use run::{spawn_command_reader, Command, Watcher, COMMAND_HELP};

/// A record that is new relative to the previous poll.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent {
    /// Position of the record in the RecordSet it was detected in.
    pub index: usize,
    pub record: Record,
    pub detected_at: DateTime<Local>,
}

impl ChangeEvent {
    pub fn title(&self) -> &'static str {
        "New Order Received!"
    }

    pub fn message(&self) -> String {
        format!(
            "{} ordered {}",
            self.record.get_or("Name", "A customer"),
            self.record.get_or("Product name", "a product")
        )
    }

    pub fn time_label(&self) -> String {
        self.detected_at.format("%H:%M:%S").to_string()
    }
}

/// Events for rows that appeared since the last poll.
///
/// The sheet is sorted newest-first, so the new rows are taken from the
/// *front* of `records`. Nothing is reported on the first poll
/// (`previous_count == 0`) or when the count did not grow, even if content
/// changed.
pub fn detect_changes(previous_count: usize, records: &RecordSet) -> Vec<ChangeEvent> {
    if previous_count == 0 || records.len() <= previous_count {
        return Vec::new();
    }

    let now = Local::now();
    let added = records.len() - previous_count;
    records
        .iter()
        .take(added)
        .enumerate()
        .map(|(index, record)| ChangeEvent {
            index,
            record: record.clone(),
            detected_at: now,
        })
        .collect()
}

/// The latest good RecordSet and the count seen at the previous poll.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PollState {
    records: Arc<RecordSet>,
    last_count: usize,
}

impl PollState {
    pub fn records(&self) -> &Arc<RecordSet> {
        &self.records
    }

    pub fn last_count(&self) -> usize {
        self.last_count
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollPhase {
    Idle,
    Fetching,
}

/// Result of a poll that produced data.
#[derive(Debug, Clone)]
pub struct Cycle {
    pub records: Arc<RecordSet>,
    pub events: Vec<ChangeEvent>,
}

/// Owns the poll state; `poll` takes `&mut self`, so at most one fetch is
/// ever in flight per poller.
pub struct Poller<S> {
    source: S,
    state: PollState,
    phase: PollPhase,
}

impl<S: CsvSource> Poller<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: PollState::default(),
            phase: PollPhase::Idle,
        }
    }

    pub fn state(&self) -> &PollState {
        &self.state
    }

    pub fn phase(&self) -> PollPhase {
        self.phase
    }

    /// Run one fetch → parse → diff → update cycle.
    ///
    /// Returns `None` when the fetch failed or parsed to nothing; the state is
    /// left exactly as it was in that case.
    pub async fn poll(&mut self) -> Option<Cycle> {
        self.phase = PollPhase::Fetching;
        let fetched = self.source.fetch_text().await;
        self.phase = PollPhase::Idle;

        let text = match fetched {
            Ok(t) => t,
            Err(e) => {
                warn!(source = %self.source.describe(), "error fetching csv: {:#}", e);
                return None;
            }
        };

        let records = parse_csv(&text);
        if records.is_empty() {
            warn!(
                source = %self.source.describe(),
                bytes = text.len(),
                "csv had no records; keeping previous data"
            );
            return None;
        }

        let events = detect_changes(self.state.last_count, &records);
        debug!(
            previous = self.state.last_count,
            current = records.len(),
            new = events.len(),
            "diffed poll"
        );

        let records = Arc::new(records);
        self.state = PollState {
            last_count: records.len(),
            records: Arc::clone(&records),
        };
        info!(rows = records.len(), new = events.len(), "poll complete");

        Some(Cycle { records, events })
    }
}
