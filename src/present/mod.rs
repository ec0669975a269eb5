// src/present/mod.rs

use std::sync::Arc;

use crate::{
    poll::ChangeEvent,
    process::{Record, RecordSet},
};

mod console;
mod notifications;
mod summary;
mod views;

pub use console::ConsolePresenter;
pub use notifications::NotificationQueue;
pub use summary::{product_volume, Summary, CHART_LABEL, MAX_CHART_PRODUCTS};
pub use views::{CustomerDetails, LeadRow, OrderRow};

/// Which table a RecordSet is shown in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Leads,
    Orders,
}

impl RecordKind {
    pub fn as_str(&self) -> &str {
        match self {
            RecordKind::Leads => "leads",
            RecordKind::Orders => "orders",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "leads" => Some(RecordKind::Leads),
            "orders" => Some(RecordKind::Orders),
            _ => None,
        }
    }
}

/// Read-only view of the latest data, as handed to the presentation layer.
///
/// The sheet feeds both tables, so leads and orders share one RecordSet.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    leads: Arc<RecordSet>,
    orders: Arc<RecordSet>,
}

impl Snapshot {
    pub fn from_records(records: Arc<RecordSet>) -> Self {
        Self {
            leads: Arc::clone(&records),
            orders: records,
        }
    }

    pub fn leads(&self) -> &RecordSet {
        &self.leads
    }

    pub fn orders(&self) -> &RecordSet {
        &self.orders
    }

    pub fn records(&self, kind: RecordKind) -> &RecordSet {
        match kind {
            RecordKind::Leads => &self.leads,
            RecordKind::Orders => &self.orders,
        }
    }

    pub fn record(&self, kind: RecordKind, index: usize) -> Option<&Record> {
        self.records(kind).get(index)
    }

    pub fn summary(&self) -> Summary {
        Summary::new(&self.leads, &self.orders)
    }
}

/// The presentation side of the dashboard.
///
/// Only `render_records` and `notify` are required; the rest default to
/// doing nothing so a headless or test presenter stays small.
pub trait Presenter {
    fn render_records(&mut self, kind: RecordKind, records: &RecordSet);

    fn notify(&mut self, event: &ChangeEvent);

    fn render_summary(&mut self, _summary: &Summary) {}

    fn render_notifications(&mut self, _queue: &NotificationQueue) {}

    fn show_details(&mut self, _kind: RecordKind, _details: &CustomerDetails) {}

    fn show_status(&mut self, _status: &str) {}

    /// Narrow rendered rows to those matching `query`; `None` shows all.
    fn set_filter(&mut self, _query: Option<String>) {}
}
