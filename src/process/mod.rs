// src/process/mod.rs
use serde::Serialize;
use std::{
    collections::BTreeMap,
    ops::{Deref, Index},
};
use tracing::debug;

mod fields;

pub use fields::split_fields;

/// One data row: column name → cell text.
///
/// Values are never coerced; quantities and counts stay strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, String>,
}

impl Record {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Value for `key`, or `fallback` when the column is missing or blank.
    pub fn get_or<'a>(&'a self, key: &str, fallback: &'a str) -> &'a str {
        match self.get(key) {
            Some(v) if !v.is_empty() => v,
            _ => fallback,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn insert(&mut self, key: &str, value: &str) {
        self.fields.insert(key.to_string(), value.to_string());
    }
}

impl<const N: usize> From<[(&str, &str); N]> for Record {
    fn from(pairs: [(&str, &str); N]) -> Self {
        let mut record = Record::default();
        for (k, v) in pairs {
            record.insert(k, v);
        }
        record
    }
}

/// Records from one parse, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RecordSet(Vec<Record>);

impl Deref for RecordSet {
    type Target = [Record];

    fn deref(&self) -> &[Record] {
        &self.0
    }
}

impl Index<usize> for RecordSet {
    type Output = Record;

    fn index(&self, idx: usize) -> &Record {
        &self.0[idx]
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Parse CSV text into records keyed by the header line.
///
/// Returns an empty set when there is no header or no data line. Zero-length
/// lines are skipped, short rows are padded with `""`, long rows are cut to
/// the header width, and a repeated header name keeps its last column.
pub fn parse_csv(text: &str) -> RecordSet {
    let lines: Vec<&str> = text.split('\n').collect();
    if lines.len() < 2 {
        return RecordSet::default();
    }

    let headers = split_fields(lines[0]);
    let mut records = Vec::with_capacity(lines.len() - 1);
    let mut skipped = 0usize;

    for line in &lines[1..] {
        if line.is_empty() {
            skipped += 1;
            continue;
        }
        let values = split_fields(line);
        let mut record = Record::default();
        for (i, header) in headers.iter().enumerate() {
            let value = values.get(i).map(String::as_str).unwrap_or("");
            record.insert(header, value);
        }
        records.push(record);
    }

    debug!(
        columns = headers.len(),
        rows = records.len(),
        skipped,
        "parsed csv"
    );
    RecordSet(records)
}
